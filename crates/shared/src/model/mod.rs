mod service_version;
pub use service_version::*;

mod user;
pub use user::*;

mod template;
pub use template::*;

pub mod constants;

use sea_query::SelectStatement;

use crate::api::error::ValidationError;

pub trait ValidateModel {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Persisted models expose a select covering every column so reads stay
/// in sync with the fields exemplar maps
pub trait Model {
    type Iden;

    fn select_star() -> SelectStatement;
}
