mod workout;
pub use workout::*;

mod diet;
pub use diet::*;

mod run;
pub use run::*;
