//! State management module
//!
//! This module contains the countdown state machine, its observable snapshot
//! and the session controller that owns them.

pub mod app_state;
pub mod countdown_state;
pub mod input_digits;
pub mod machine;
pub mod observer;
pub mod snapshot;

// Re-export main types
pub use app_state::AppState;
pub use countdown_state::{CountdownState, Transition, TransitionKind};
pub use input_digits::{Digit, InputDigits, MAX_DIGITS};
pub use machine::{Effect, TimerStateMachine};
pub use observer::{TimerObserver, TracingObserver};
pub use snapshot::{Controls, TimerSnapshot, ToggleAction};
