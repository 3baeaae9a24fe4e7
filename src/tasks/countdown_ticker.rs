//! Countdown ticker background task

use std::{sync::Arc, time::Duration};
use tokio::{
    sync::broadcast::{self, error::RecvError},
    task::JoinHandle,
    time::{interval_at, Instant},
};
use tracing::{debug, error, info, warn};

use crate::state::{AppState, Effect, Transition};

/// Fixed cadence of the countdown
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Subscribe to transitions and spawn the ticker.
///
/// The subscription is taken before spawning so a start issued right after
/// this call is never missed.
pub fn spawn_countdown_ticker(state: Arc<AppState>) -> JoinHandle<()> {
    let transitions = state.subscribe_transitions();
    tokio::spawn(countdown_ticker_task(state, transitions))
}

/// Background task that ticks the countdown once a second while it runs
pub async fn countdown_ticker_task(
    state: Arc<AppState>,
    mut transitions: broadcast::Receiver<Transition>,
) {
    info!("Starting countdown ticker task");

    loop {
        let epoch = match transitions.recv().await {
            Ok(transition) if transition.state.is_running() => transition.epoch,
            Ok(transition) => {
                debug!("Ticker idle after {:?}", transition.kind);
                continue;
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Ticker lagged by {} transitions, re-reading state", skipped);
                match state.current_run() {
                    Ok(Some(epoch)) => epoch,
                    Ok(None) => continue,
                    Err(e) => {
                        error!("Failed to read timer state: {}", e);
                        continue;
                    }
                }
            }
            Err(RecvError::Closed) => {
                info!("Transition channel closed, stopping ticker");
                return;
            }
        };

        // A run can hand over directly to a newer one
        let mut next = Some(epoch);
        while let Some(epoch) = next {
            next = run_countdown(&state, &mut transitions, epoch).await;
        }
    }
}

/// Tick one run until it leaves Running.
///
/// Returns the epoch of a newer run if one was observed while ticking.
async fn run_countdown(
    state: &AppState,
    transitions: &mut broadcast::Receiver<Transition>,
    epoch: u64,
) -> Option<u64> {
    debug!("Ticking run {}", epoch);
    let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match state.tick(epoch) {
                    Ok(Effect::Ticked) => {}
                    Ok(Effect::Transitioned(transition)) => {
                        debug!("Run {} ended by {:?}", epoch, transition.kind);
                        return None;
                    }
                    Ok(_) => {
                        debug!("Run {} is stale, cancelling", epoch);
                        return None;
                    }
                    Err(e) => {
                        error!("Failed to apply tick: {}", e);
                        return None;
                    }
                }
            }

            received = transitions.recv() => {
                match received {
                    Ok(transition) if transition.epoch == epoch && transition.state.is_running() => {}
                    Ok(transition) if transition.state.is_running() => return Some(transition.epoch),
                    Ok(transition) => {
                        debug!("Run {} cancelled by {:?}", epoch, transition.kind);
                        return None;
                    }
                    Err(RecvError::Lagged(_)) => match state.current_run() {
                        Ok(Some(current)) if current == epoch => {}
                        Ok(current) => return current,
                        Err(e) => {
                            error!("Failed to read timer state: {}", e);
                            return None;
                        }
                    },
                    Err(RecvError::Closed) => return None,
                }
            }
        }
    }
}
