mod workout;
pub use workout::*;

mod diet;
pub use diet::*;
