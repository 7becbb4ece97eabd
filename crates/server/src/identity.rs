use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use shared::{api::USER_ID_HEADER, types::Uuid};

/// Identity of the caller as asserted by the proxy in front of this
/// service. Routes that take this extractor reject unidentified
/// requests with a 401
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UserState {
    pub id: Uuid,
}

#[async_trait]
impl<S> FromRequestParts<S> for UserState
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    format!("Missing {USER_ID_HEADER} header"),
                )
            })?;

        let id = Uuid::parse(value).map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                format!("Invalid {USER_ID_HEADER} header"),
            )
        })?;

        Ok(UserState { id })
    }
}
