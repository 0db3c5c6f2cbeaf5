use std::time::Duration;

use dash_logging::{dash_debug, dash_info};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Polling,
    Stopped,
}

/// One iteration of the refresh timer, numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollTick(pub u64);

/// Fixed-interval refresh timer.
///
/// `start` emits the first tick immediately and then one per interval until
/// `stop` is called or the shared cancellation token fires. A stopped driver
/// never restarts.
pub struct PollingDriver {
    interval: Duration,
    state: PollState,
    cancel: CancellationToken,
}

impl PollingDriver {
    pub fn new(interval: Duration, cancel: CancellationToken) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            state: PollState::Idle,
            cancel,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn state(&self) -> PollState {
        if self.state == PollState::Polling && self.cancel.is_cancelled() {
            PollState::Stopped
        } else {
            self.state
        }
    }

    /// Transitions `Idle -> Polling`. Returns `None` if the driver was already started.
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self) -> Option<mpsc::UnboundedReceiver<PollTick>> {
        if self.state != PollState::Idle || self.cancel.is_cancelled() {
            return None;
        }
        self.state = PollState::Polling;

        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        let interval = self.interval;
        let cancel = self.cancel.clone();
        dash_info!("polling every {:?}", interval);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut count = 0u64;
            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        count += 1;
                        if tick_tx.send(PollTick(count)).is_err() {
                            break;
                        }
                    }
                }
            }
            dash_debug!("polling stopped after {} ticks", count);
        });

        Some(tick_rx)
    }

    pub fn stop(&mut self) {
        self.cancel.cancel();
        self.state = PollState::Stopped;
    }
}
