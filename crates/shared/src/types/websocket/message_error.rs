#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("de/serialize error: {0:?}")]
    Json(serde_json::Error),
    #[error("{0:?}")]
    Other(String),
}

impl From<serde_json::Error> for MessageError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
