pub mod db;

mod utils;
pub use utils::*;

mod errors;
pub use errors::*;

mod cli;
pub use cli::*;

mod constants;
pub use constants::*;

mod identity;
pub use identity::*;

mod state;
pub use state::*;

pub mod routes;
