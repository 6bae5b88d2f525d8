use std::fmt;

use chrono::{DateTime, Local};
use serde::Deserialize;

use super::timestamp;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum SignalId {
    Number(i64),
    Text(String),
}

impl fmt::Display for SignalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Recommendation attached to a signal. Values the board does not know about
/// are kept verbatim in `Other` so they can still be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "Option<String>")]
pub enum Action {
    Buy,
    Sell,
    Hold,
    Other(String),
}

impl Action {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Hold => "HOLD",
            Self::Other(raw) => raw,
        }
    }
}

impl From<Option<String>> for Action {
    fn from(raw: Option<String>) -> Self {
        match raw.as_deref() {
            Some("BUY") => Self::Buy,
            Some("SELL") => Self::Sell,
            Some("HOLD") => Self::Hold,
            Some(other) => Self::Other(other.to_string()),
            None => Self::Other(String::new()),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Signal {
    pub id: SignalId,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default = "default_action")]
    pub action: Action,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub timestamp: Option<DateTime<Local>>,
}

fn default_action() -> Action {
    Action::Other(String::new())
}

/// Response envelope of `GET /api/whale-signals`. `signals` arrives oldest first.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SignalPage {
    pub signals: Vec<Signal>,
    pub total: u64,
}
