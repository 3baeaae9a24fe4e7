//! The countdown state machine
//!
//! Pure and synchronous: it knows nothing about clocks or tasks. The session
//! controller feeds it user intents and ticks, and the countdown ticker
//! decides when ticks happen.

use tracing::debug;

use crate::codec;
use super::{
    input_digits::{Digit, InputDigits},
    snapshot::{Controls, TimerSnapshot},
    CountdownState, Transition, TransitionKind,
};

/// What an operation did to the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Not applicable in the current state; nothing changed
    Ignored,
    InputChanged,
    /// One second was taken off a running countdown
    Ticked,
    Transitioned(Transition),
}

impl Effect {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Effect::Ignored)
    }

    pub fn transition(&self) -> Option<Transition> {
        match self {
            Effect::Transitioned(t) => Some(*t),
            _ => None,
        }
    }
}

/// Digit input, countdown state and remaining seconds of one session
#[derive(Debug, Clone, Default)]
pub struct TimerStateMachine {
    input: InputDigits,
    state: CountdownState,
    remaining_seconds: u64,
    /// Bumped on every entry into Running; stale ticks carry an older value
    run_epoch: u64,
}

impl TimerStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CountdownState {
        self.state
    }

    pub fn input(&self) -> &InputDigits {
        &self.input
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn run_epoch(&self) -> u64 {
        self.run_epoch
    }

    pub fn append_digit(&mut self, digit: Digit) -> Effect {
        if self.state != CountdownState::Stopped || !self.input.push(digit) {
            return Effect::Ignored;
        }
        Effect::InputChanged
    }

    pub fn backspace(&mut self) -> Effect {
        if self.state != CountdownState::Stopped || !self.input.pop() {
            return Effect::Ignored;
        }
        Effect::InputChanged
    }

    pub fn clear(&mut self) -> Effect {
        if self.state != CountdownState::Stopped {
            return Effect::Ignored;
        }
        self.input.clear();
        Effect::InputChanged
    }

    /// Start, pause or resume depending on the current state
    pub fn toggle(&mut self) -> Effect {
        match self.state {
            CountdownState::Stopped => {
                if self.input.is_empty() {
                    return Effect::Ignored;
                }
                self.remaining_seconds = self.input.total_seconds();
                self.run_epoch += 1;
                if self.remaining_seconds == 0 {
                    debug!("Countdown started with nothing to count");
                    return self.reset(TransitionKind::Finished);
                }
                self.state = CountdownState::Running;
                self.transitioned(TransitionKind::Started)
            }
            CountdownState::Running => {
                self.state = CountdownState::Paused;
                self.transitioned(TransitionKind::Paused)
            }
            CountdownState::Paused => {
                self.run_epoch += 1;
                self.state = CountdownState::Running;
                self.transitioned(TransitionKind::Resumed)
            }
        }
    }

    pub fn stop(&mut self) -> Effect {
        if !self.state.is_active() {
            return Effect::Ignored;
        }
        self.reset(TransitionKind::Stopped)
    }

    /// Apply one tick scheduled for `epoch`
    pub fn tick(&mut self, epoch: u64) -> Effect {
        if self.state != CountdownState::Running
            || epoch != self.run_epoch
            || self.remaining_seconds == 0
        {
            return Effect::Ignored;
        }
        self.remaining_seconds -= 1;
        if self.remaining_seconds == 0 {
            return self.reset(TransitionKind::Finished);
        }
        Effect::Ticked
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        let display = match self.state {
            CountdownState::Stopped => codec::format_digits_as_clock(&self.input),
            _ => codec::format_seconds_as_clock(self.remaining_seconds),
        };

        TimerSnapshot {
            state: self.state,
            display,
            input: self.input.as_str().to_string(),
            remaining_seconds: self.remaining_seconds,
            controls: Controls::for_state(self.state, !self.input.is_empty()),
        }
    }

    fn reset(&mut self, kind: TransitionKind) -> Effect {
        self.state = CountdownState::Stopped;
        self.input.clear();
        self.remaining_seconds = 0;
        self.transitioned(kind)
    }

    fn transitioned(&self, kind: TransitionKind) -> Effect {
        Effect::Transitioned(Transition {
            kind,
            state: self.state,
            epoch: self.run_epoch,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn with_input(s: &str) -> TimerStateMachine {
        let mut machine = TimerStateMachine::new();
        for c in s.chars() {
            machine.append_digit(Digit::try_from(c).unwrap());
        }
        machine
    }

    fn started(s: &str) -> TimerStateMachine {
        let mut machine = with_input(s);
        assert!(machine.toggle().transition().is_some());
        machine
    }

    #[test]
    fn starts_stopped_and_empty() {
        let machine = TimerStateMachine::new();
        assert_eq!(machine.state(), CountdownState::Stopped);
        assert!(machine.input().is_empty());
        assert_eq!(machine.snapshot(), TimerSnapshot::default());
    }

    #[test]
    fn seventh_digit_is_ignored() {
        let mut machine = with_input("123456");
        assert_eq!(machine.append_digit(Digit::try_from('9').unwrap()), Effect::Ignored);
        assert_eq!(machine.input().as_str(), "123456");
    }

    #[test]
    fn backspace_and_clear() {
        let mut machine = with_input("42");
        assert_eq!(machine.backspace(), Effect::InputChanged);
        assert_eq!(machine.input().as_str(), "4");
        assert_eq!(machine.clear(), Effect::InputChanged);
        assert!(machine.input().is_empty());
        assert_eq!(machine.backspace(), Effect::Ignored);
    }

    #[test]
    fn toggle_with_empty_input_is_ignored() {
        let mut machine = TimerStateMachine::new();
        assert_eq!(machine.toggle(), Effect::Ignored);
        assert_eq!(machine.state(), CountdownState::Stopped);
    }

    #[test]
    fn start_loads_remaining_seconds() {
        let mut machine = with_input("130");
        let transition = machine.toggle().transition().unwrap();
        assert_eq!(transition.kind, TransitionKind::Started);
        assert_eq!(transition.state, CountdownState::Running);
        assert_eq!(machine.remaining_seconds(), 90);
        assert_eq!(machine.snapshot().display, "00h 01m 30s");
    }

    #[test]
    fn three_ticks_finish_a_three_second_countdown() {
        let mut machine = started("3");
        let epoch = machine.run_epoch();
        assert_eq!(machine.tick(epoch), Effect::Ticked);
        assert_eq!(machine.tick(epoch), Effect::Ticked);
        let finished = machine.tick(epoch).transition().unwrap();
        assert_eq!(finished.kind, TransitionKind::Finished);
        assert_eq!(machine.state(), CountdownState::Stopped);
        assert!(machine.input().is_empty());
        assert_eq!(machine.remaining_seconds(), 0);
    }

    #[test]
    fn pause_freezes_remaining_seconds() {
        let mut machine = started("10");
        let epoch = machine.run_epoch();
        machine.tick(epoch);
        assert_eq!(machine.remaining_seconds(), 9);

        assert_eq!(
            machine.toggle().transition().map(|t| t.kind),
            Some(TransitionKind::Paused)
        );
        assert_eq!(machine.tick(epoch), Effect::Ignored);
        assert_eq!(machine.remaining_seconds(), 9);

        let resumed = machine.toggle().transition().unwrap();
        assert_eq!(resumed.kind, TransitionKind::Resumed);
        assert_eq!(machine.remaining_seconds(), 9);
        // ticks from before the pause stay dead after resuming
        assert_eq!(machine.tick(epoch), Effect::Ignored);
        assert_eq!(machine.tick(resumed.epoch), Effect::Ticked);
        assert_eq!(machine.remaining_seconds(), 8);
    }

    #[test]
    fn stop_resets_everything() {
        let mut machine = started("100");
        machine.toggle();
        let stopped = machine.stop().transition().unwrap();
        assert_eq!(stopped.kind, TransitionKind::Stopped);
        assert_eq!(machine.state(), CountdownState::Stopped);
        assert!(machine.input().is_empty());
        assert_eq!(machine.remaining_seconds(), 0);
        assert_eq!(machine.stop(), Effect::Ignored);
    }

    #[test]
    fn zero_duration_finishes_immediately() {
        let mut machine = with_input("000");
        let transition = machine.toggle().transition().unwrap();
        assert_eq!(transition.kind, TransitionKind::Finished);
        assert_eq!(machine.state(), CountdownState::Stopped);
        assert!(machine.input().is_empty());
    }

    #[test]
    fn editing_is_ignored_while_counting() {
        let mut machine = started("5");
        assert_eq!(machine.append_digit(Digit::try_from('1').unwrap()), Effect::Ignored);
        assert_eq!(machine.backspace(), Effect::Ignored);
        assert_eq!(machine.clear(), Effect::Ignored);
        assert_eq!(machine.input().as_str(), "5");
    }

    #[test]
    fn snapshot_while_paused() {
        let mut machine = started("0199");
        machine.toggle();
        let snapshot = machine.snapshot();
        assert_eq!(snapshot.state, CountdownState::Paused);
        assert_eq!(snapshot.remaining_seconds, 159);
        assert_eq!(snapshot.display, "00h 02m 39s");
        assert_eq!(snapshot.input, "0199");
        assert!(snapshot.controls.stop);
    }

    proptest! {
        #[test]
        fn prop_full_input_ignores_digits(full in "[0-9]{6}", extra in "[0-9]") {
            let mut machine = with_input(&full);
            let digit = Digit::try_from(extra.chars().next().unwrap()).unwrap();
            prop_assert_eq!(machine.append_digit(digit), Effect::Ignored);
            prop_assert_eq!(machine.input().as_str(), full.as_str());
        }

        #[test]
        fn prop_backspace_drops_exactly_last_digit(s in "[0-9]{1,6}") {
            let mut machine = with_input(&s);
            prop_assert_eq!(machine.backspace(), Effect::InputChanged);
            prop_assert_eq!(machine.input().as_str(), &s[..s.len() - 1]);
        }
    }
}
