use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::error::{Nothing, ServerError};

macro_rules! response_error {
    ($name:ident {
        $(
            #[code($variant_code:expr)]
            $variant:ident
            $({ $($var_struct_body_tt:tt)* })?
        ,)*
    }) => {

        #[derive(Debug, Clone, Serialize, Deserialize, Error)]
        pub enum $name {
            $(
                #[error("{}::{}: {:?}", stringify!($name), stringify!($variant), self)]
                $variant $({
                    $($var_struct_body_tt)*
                })?,
            )*
        }

        impl From<$name> for ServerError<$name> {
            fn from(inner: $name) -> Self {
                let code = match &inner {
                    $( $name::$variant { .. } => $variant_code, )*
                };
                Self::Inner { code, inner }
            }
        }
    };
}

response_error!(TemplateError {
    #[code(StatusCode::NOT_FOUND)]
    NotFound,
    #[code(StatusCode::CONFLICT)]
    InUse { active_runs: u64 },
});

response_error!(StartTemplateError {
    #[code(StatusCode::NOT_FOUND)]
    TemplateNotFound,
    #[code(StatusCode::NOT_FOUND)]
    UserNotFound,
});

response_error!(UserError {
    #[code(StatusCode::NOT_FOUND)]
    NotFound,
});

response_error!(RoomError {
    #[code(StatusCode::NOT_FOUND)]
    NotFound,
    #[code(StatusCode::FORBIDDEN)]
    RoomFull,
});

// Alias used to allow future expansion of the errors without having to go back
// and update all routes that use it
pub type FetchError = Nothing;
