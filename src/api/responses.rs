//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{Effect, TimerSnapshot};

/// API response structure for keypad and control endpoints
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

    /// Create an applied response
    pub fn applied(message: String, timer: TimerSnapshot) -> Self {
        Self::new("applied".to_string(), message, timer)
    }

    /// Create an ignored response
    pub fn ignored(message: String, timer: TimerSnapshot) -> Self {
        Self::new("ignored".to_string(), message, timer)
    }

    /// Pick applied or ignored from what the intent did
    pub fn from_effect(effect: Effect, action: &str, timer: TimerSnapshot) -> Self {
        match effect {
            Effect::Ignored => Self::ignored(
                format!("{} has no effect while {:?}", action, timer.state).to_lowercase(),
                timer,
            ),
            Effect::Transitioned(transition) => Self::applied(
                format!("Countdown {:?}", transition.kind).to_lowercase(),
                timer,
            ),
            Effect::InputChanged | Effect::Ticked => {
                Self::applied(format!("{} applied", action), timer)
            }
        }
    }
}

/// Status response with session information
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
            version: crate::VERSION.to_string(),
        }
    }
}
