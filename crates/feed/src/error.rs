use reqwest::StatusCode;
use thiserror::Error;

/// A failed poll. Every variant is handled the same way by the poller: logged
/// and otherwise ignored, the board keeps whatever it showed before.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    Status(StatusCode),
    #[error("malformed signal payload: {0}")]
    Decode(#[from] serde_json::Error),
}
