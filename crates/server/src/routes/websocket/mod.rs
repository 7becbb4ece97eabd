mod handler;
pub use handler::*;

mod task;
pub use task::*;
