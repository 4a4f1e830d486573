//! The uniform success/failure wrapper returned by every feed endpoint.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Envelope<T> {
    pub status: bool,
    #[serde(default)]
    pub message: Vec<String>,
    pub data: Option<T>,
    #[serde(default)]
    pub request_url: String,
    #[serde(default)]
    pub http_status_code: u16,
}

impl<T> Envelope<T> {
    /// Splits the envelope into the payload (only when the business status is
    /// OK) and the messages to surface to the user.
    pub fn into_parts(self) -> (Option<T>, Vec<String>) {
        if self.status {
            (self.data, Vec::new())
        } else {
            (None, self.message)
        }
    }
}
