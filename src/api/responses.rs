//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{state::ActionOutcome, timer::{CustomInput, TimerSnapshot}};

/// Optional body of POST /start carrying the custom duration fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartRequest {
    #[serde(default, deserialize_with = "text_or_integer")]
    pub minutes: String,
    #[serde(default, deserialize_with = "text_or_integer")]
    pub seconds: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrInteger {
    Text(String),
    Integer(i64),
}

/// Accept a duration field typed either as `"90"` or `90`
fn text_or_integer<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match TextOrInteger::deserialize(deserializer)? {
        TextOrInteger::Text(text) => text,
        TextOrInteger::Integer(value) => value.to_string(),
    })
}

impl From<StartRequest> for CustomInput {
    fn from(request: StartRequest) -> Self {
        CustomInput::new(request.minutes, request.seconds)
    }
}

/// Body of POST /mute
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MuteRequest {
    pub muted: bool,
}

/// API response structure for timer control endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerSnapshot,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, timer: TimerSnapshot) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            timer,
        }
    }

    /// Build a response from an action outcome; rejected actions report "ignored"
    pub fn from_outcome(action: &str, outcome: ActionOutcome) -> Self {
        if outcome.changed {
            Self::new("ok".to_string(), format!("{} applied", action), outcome.snapshot)
        } else {
            let message = format!("{} ignored in phase {:?}", action, outcome.snapshot.phase);
            Self::new("ignored".to_string(), message, outcome.snapshot)
        }
    }
}

/// Status response with session metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerSnapshot,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
