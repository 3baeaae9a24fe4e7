//! Countdown state and the transitions between states

use serde::{Deserialize, Serialize};

/// Where the countdown currently is in its cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownState {
    /// Initial and terminal state; the keypad is shown
    #[default]
    Stopped,
    Running,
    Paused,
}

impl CountdownState {
    pub fn is_running(&self) -> bool {
        matches!(self, CountdownState::Running)
    }

    /// Running or paused: a countdown is in progress
    pub fn is_active(&self) -> bool {
        !matches!(self, CountdownState::Stopped)
    }
}

/// Why the state changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    Started,
    Paused,
    Resumed,
    /// Explicit stop by the user
    Stopped,
    /// The countdown reached zero
    Finished,
}

/// A change of [`CountdownState`], tagged with the run epoch it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub kind: TransitionKind,
    pub state: CountdownState,
    pub epoch: u64,
}
