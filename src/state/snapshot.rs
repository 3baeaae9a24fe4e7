//! Observable view of the timer

use serde::{Deserialize, Serialize};

use super::CountdownState;

/// What the play/pause button does when pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleAction {
    Start,
    Pause,
    Resume,
}

/// Which controls a presentation layer should offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    /// Digit, backspace and clear keys
    pub keypad: bool,
    /// Absent while there is no digit input
    pub toggle: Option<ToggleAction>,
    pub stop: bool,
}

impl Controls {
    pub fn for_state(state: CountdownState, has_input: bool) -> Self {
        let toggle = has_input.then_some(match state {
            CountdownState::Stopped => ToggleAction::Start,
            CountdownState::Running => ToggleAction::Pause,
            CountdownState::Paused => ToggleAction::Resume,
        });

        Self {
            keypad: state == CountdownState::Stopped,
            toggle,
            stop: state.is_active(),
        }
    }
}

/// Everything a consumer needs to redraw the timer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub state: CountdownState,
    /// Input echo while stopped, remaining time otherwise
    pub display: String,
    pub input: String,
    pub remaining_seconds: u64,
    pub controls: Controls,
}

impl Default for TimerSnapshot {
    fn default() -> Self {
        Self {
            state: CountdownState::Stopped,
            display: "00h 00m 00s".to_string(),
            input: String::new(),
            remaining_seconds: 0,
            controls: Controls::for_state(CountdownState::Stopped, false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopped_without_input_only_shows_keypad() {
        let controls = Controls::for_state(CountdownState::Stopped, false);
        assert!(controls.keypad);
        assert_eq!(controls.toggle, None);
        assert!(!controls.stop);
    }

    #[test]
    fn toggle_follows_state() {
        assert_eq!(
            Controls::for_state(CountdownState::Stopped, true).toggle,
            Some(ToggleAction::Start)
        );
        let running = Controls::for_state(CountdownState::Running, true);
        assert_eq!(running.toggle, Some(ToggleAction::Pause));
        assert!(running.stop);
        assert!(!running.keypad);
        assert_eq!(
            Controls::for_state(CountdownState::Paused, true).toggle,
            Some(ToggleAction::Resume)
        );
    }

    #[test]
    fn serializes_lowercase() {
        let value = serde_json::to_value(TimerSnapshot::default()).unwrap();
        assert_eq!(value["state"], "stopped");
        assert_eq!(value["display"], "00h 00m 00s");
        assert!(value["controls"]["toggle"].is_null());
    }
}
