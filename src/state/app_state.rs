//! Session controller: owns the timer and publishes every change

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use crate::error::{CountdownError, Result};
use super::{
    input_digits::Digit,
    machine::{Effect, TimerStateMachine},
    observer::TimerObserver,
    CountdownState, TimerSnapshot, Transition,
};

/// Application state for one timer session
pub struct AppState {
    /// The countdown itself; every mutation goes through this lock
    machine: Mutex<TimerStateMachine>,
    observers: Mutex<Vec<Arc<dyn TimerObserver>>>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Channel for state transitions, consumed by the countdown ticker
    pub transition_tx: broadcast::Sender<Transition>,
    /// Channel for snapshot updates
    pub snapshot_tx: watch::Sender<TimerSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    pub _snapshot_rx: watch::Receiver<TimerSnapshot>,
}

impl AppState {
    /// Create a new session with a stopped, empty timer
    pub fn new(port: u16, host: String) -> Self {
        let (transition_tx, _) = broadcast::channel(100);
        let (snapshot_tx, snapshot_rx) = watch::channel(TimerSnapshot::default());

        Self {
            machine: Mutex::new(TimerStateMachine::new()),
            observers: Mutex::new(Vec::new()),
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            transition_tx,
            snapshot_tx,
            _snapshot_rx: snapshot_rx,
        }
    }

    /// Register an observer notified synchronously on every change
    pub fn add_observer(&self, observer: Arc<dyn TimerObserver>) -> Result<()> {
        self.observers
            .lock()
            .map_err(|_| CountdownError::LockPoisoned("observers"))?
            .push(observer);
        Ok(())
    }

    /// Watch the latest snapshot
    pub fn watch(&self) -> watch::Receiver<TimerSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Subscribe to state transitions
    pub fn subscribe_transitions(&self) -> broadcast::Receiver<Transition> {
        self.transition_tx.subscribe()
    }

    /// Apply a mutation and publish the result if anything changed
    fn apply<F>(&self, updater: F) -> Result<(Effect, TimerSnapshot)>
    where
        F: FnOnce(&mut TimerStateMachine) -> Effect,
    {
        let mut machine = self.machine.lock()
            .map_err(|_| CountdownError::LockPoisoned("timer state"))?;

        let effect = updater(&mut *machine);
        let snapshot = machine.snapshot();
        if effect.is_ignored() {
            return Ok((effect, snapshot));
        }

        // Publish while still holding the lock so observers see mutation order
        match self.observers.lock() {
            Ok(observers) => {
                for observer in observers.iter() {
                    observer.on_update(&snapshot);
                }
            }
            Err(_) => warn!("Observer list poisoned, skipping notifications"),
        }

        if let Err(e) = self.snapshot_tx.send(snapshot.clone()) {
            warn!("Failed to send snapshot update: {}", e);
        }

        if let Some(transition) = effect.transition() {
            info!("Countdown {:?}: now {:?}", transition.kind, transition.state);
            if self.transition_tx.send(transition).is_err() {
                debug!("No transition subscribers");
            }
        }
        drop(machine);

        Ok((effect, snapshot))
    }

    /// Apply a user intent and record it as the last action
    fn apply_action<F>(&self, action: &str, updater: F) -> Result<(Effect, TimerSnapshot)>
    where
        F: FnOnce(&mut TimerStateMachine) -> Effect,
    {
        let result = self.apply(updater)?;
        if result.0.is_ignored() {
            debug!("Ignored {} in state {:?}", action, result.1.state);
        }

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        Ok(result)
    }

    pub fn press_digit(&self, digit: Digit) -> Result<(Effect, TimerSnapshot)> {
        self.apply_action("digit", |m| m.append_digit(digit))
    }

    pub fn backspace(&self) -> Result<(Effect, TimerSnapshot)> {
        self.apply_action("backspace", |m| m.backspace())
    }

    pub fn clear(&self) -> Result<(Effect, TimerSnapshot)> {
        self.apply_action("clear", |m| m.clear())
    }

    /// Start, pause or resume the countdown
    pub fn toggle(&self) -> Result<(Effect, TimerSnapshot)> {
        self.apply_action("toggle", |m| m.toggle())
    }

    pub fn stop(&self) -> Result<(Effect, TimerSnapshot)> {
        self.apply_action("stop", |m| m.stop())
    }

    /// Apply a tick for the run identified by `epoch`.
    ///
    /// Checked under the same lock as pause and stop, so a tick racing
    /// either of them is ignored instead of decrementing.
    pub fn tick(&self, epoch: u64) -> Result<Effect> {
        self.apply(|m| m.tick(epoch)).map(|(effect, _)| effect)
    }

    /// Get current snapshot
    pub fn snapshot(&self) -> Result<TimerSnapshot> {
        self.machine.lock()
            .map(|machine| machine.snapshot())
            .map_err(|_| CountdownError::LockPoisoned("timer state"))
    }

    /// Epoch of the live run, if the countdown is running
    pub fn current_run(&self) -> Result<Option<u64>> {
        let machine = self.machine.lock()
            .map_err(|_| CountdownError::LockPoisoned("timer state"))?;
        Ok((machine.state() == CountdownState::Running).then(|| machine.run_epoch()))
    }

    /// Tear down the session, stopping any countdown in progress
    pub fn end_session(&self) -> Result<()> {
        let (effect, _) = self.apply(|m| m.stop())?;
        if !effect.is_ignored() {
            info!("Session ended with a countdown in progress");
        }
        Ok(())
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::TransitionKind;

    fn state() -> AppState {
        AppState::new(8640, "127.0.0.1".to_string())
    }

    fn digit(c: char) -> Digit {
        Digit::try_from(c).unwrap()
    }

    #[test]
    fn observers_see_every_change_in_order() {
        let state = state();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        state
            .add_observer(Arc::new(move |s: &TimerSnapshot| {
                sink.lock().unwrap().push(s.display.clone());
            }))
            .unwrap();

        state.press_digit(digit('1')).unwrap();
        state.press_digit(digit('3')).unwrap();
        state.backspace().unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec!["00h 00m 01s", "00h 00m 13s", "00h 00m 01s"]
        );
    }

    #[test]
    fn ignored_intents_publish_nothing() {
        let state = state();
        let count = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&count);
        state
            .add_observer(Arc::new(move |_: &TimerSnapshot| {
                *sink.lock().unwrap() += 1;
            }))
            .unwrap();

        let (effect, _) = state.backspace().unwrap();
        assert_eq!(effect, Effect::Ignored);
        state.toggle().unwrap();
        state.stop().unwrap();
        assert_eq!(*count.lock().unwrap(), 0);
        assert_eq!(state.get_last_action().0.as_deref(), Some("stop"));
    }

    #[test]
    fn watch_channel_tracks_latest_snapshot() {
        let state = state();
        let rx = state.watch();
        state.press_digit(digit('2')).unwrap();
        state.toggle().unwrap();
        let latest = rx.borrow().clone();
        assert_eq!(latest.state, CountdownState::Running);
        assert_eq!(latest.remaining_seconds, 2);
    }

    #[test]
    fn transitions_are_broadcast() {
        let state = state();
        let mut rx = state.subscribe_transitions();
        state.press_digit(digit('5')).unwrap();
        state.toggle().unwrap();
        state.toggle().unwrap();

        assert_eq!(rx.try_recv().unwrap().kind, TransitionKind::Started);
        assert_eq!(rx.try_recv().unwrap().kind, TransitionKind::Paused);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn stale_tick_is_rejected_after_pause() {
        let state = state();
        state.press_digit(digit('4')).unwrap();
        state.toggle().unwrap();
        let epoch = state.current_run().unwrap().unwrap();

        state.toggle().unwrap();
        assert_eq!(state.current_run().unwrap(), None);
        assert_eq!(state.tick(epoch).unwrap(), Effect::Ignored);
        assert_eq!(state.snapshot().unwrap().remaining_seconds, 4);
    }

    #[test]
    fn end_session_stops_countdown() {
        let state = state();
        state.press_digit(digit('9')).unwrap();
        state.toggle().unwrap();
        state.end_session().unwrap();

        let snapshot = state.snapshot().unwrap();
        assert_eq!(snapshot.state, CountdownState::Stopped);
        assert!(snapshot.input.is_empty());
    }

    #[test]
    fn uptime_starts_in_seconds() {
        assert!(state().get_uptime().ends_with('s'));
    }
}
