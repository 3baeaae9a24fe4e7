//! Countdown Pad - A keypad-driven countdown timer
//!
//! Digits are keyed in as `HHMMSS`, then a countdown is started, paused,
//! resumed or stopped. Every change is published as a [`state::TimerSnapshot`]
//! to synchronous observers, a watch channel and the HTTP event stream.

pub mod api;
pub mod codec;
pub mod config;
pub mod error;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::{CountdownError, Result};
pub use state::AppState;
pub use tasks::spawn_countdown_ticker;
pub use utils::signals::shutdown_signal;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
