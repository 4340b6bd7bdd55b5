//! Request/response types for the play endpoint
//!
//! Wire format:
//!
//! ```text
//! POST /  {"url": "http://host/video.mp4"}
//!
//! {"status":"success","player":"mpv"}
//! {"status":"error","message":"no player available"}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

/// Message returned when none of the candidate players could be started
pub const NO_PLAYER_MESSAGE: &str = "no player available";

/// Body of a play request
///
/// `url` may be absent or `null`; both decode to an empty string. No URL
/// validation happens here, the player decides what it can open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlayRequest {
    #[serde(default)]
    url: Option<String>,
}

impl PlayRequest {
    /// Decode a raw request body
    ///
    /// The body must be a JSON object. A non-string `url` is rejected.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| Error::InvalidInput(format!("invalid JSON body: {}", e)))?;

        if !value.is_object() {
            return Err(Error::InvalidInput(
                "request body must be a JSON object".to_string(),
            ));
        }

        serde_json::from_value(value)
            .map_err(|e| Error::InvalidInput(format!("invalid play request: {}", e)))
    }

    /// Target URL, empty when the request carried none
    pub fn url(&self) -> &str {
        self.url.as_deref().unwrap_or("")
    }
}

/// Response of a play request
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PlayResponse {
    /// A player was started
    Success { player: String },
    /// Nothing was started, or the request could not be processed
    Error { message: String },
}

impl PlayResponse {
    pub fn success(player: impl Into<String>) -> Self {
        PlayResponse::Success {
            player: player.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        PlayResponse::Error {
            message: message.into(),
        }
    }

    pub fn no_player() -> Self {
        Self::error(NO_PLAYER_MESSAGE)
    }
}
