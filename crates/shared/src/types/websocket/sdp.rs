use serde::{Deserialize, Serialize};

use super::SdpType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sdp {
    #[serde(rename = "type")]
    pub type_: SdpType,
    pub sdp: String,
}
