//! Polling trackers that turn repeated venue snapshots into events.
//!
//! Each tracker owns its state and a broadcast sender. Run it by hand with
//! `poll_once`, or move it onto a task with `spawn` and stop it through the
//! returned [`TrackerHandle`].

use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

pub mod book;
pub mod fills;

pub use book::{BookEvent, L1BookTracker, L1State, DEFAULT_REFRESH_INTERVAL};
pub use fills::{FillTracker, OrderEvent};

/// Buffered events per subscriber before the oldest are dropped
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// One fetch-and-diff cycle of a tracker
///
/// The future returned by `poll` must not touch tracker state until the
/// fetch has completed, so dropping it mid-flight leaves state untouched.
#[async_trait]
pub(crate) trait Poller: Send + 'static {
    type Event: Clone + Send + 'static;

    async fn poll(&mut self) -> Vec<Self::Event>;

    fn interval(&self) -> Duration;

    fn label(&self) -> &'static str;
}

/// Owner's side of a spawned tracker
///
/// Dropping the handle without calling `shutdown` also stops the task at
/// its next wake-up.
pub struct TrackerHandle<E> {
    shutdown: watch::Sender<bool>,
    events: broadcast::Sender<E>,
    task: JoinHandle<()>,
}

impl<E: Clone> TrackerHandle<E> {
    /// Receive every event emitted from now on
    pub fn subscribe(&self) -> broadcast::Receiver<E> {
        self.events.subscribe()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the timer, drop any fetch still in flight, and wait for the task
    pub async fn shutdown(self) {
        // the task may already be gone; nothing to signal then
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            warn!(error = %e, "tracker task ended abnormally");
        }
    }
}

pub(crate) fn spawn_poller<P: Poller>(
    mut poller: P,
    events: broadcast::Sender<P::Event>,
) -> TrackerHandle<P::Event> {
    let (shutdown_tx, mut shutdown) = watch::channel(false);

    let task = tokio::spawn(async move {
        let label = poller.label();
        let period = poller.interval();
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(tracker = label, interval_ms = period.as_millis() as u64, "tracker started");

        loop {
            tokio::select! {
                biased;
                _ = shutdown.changed() => break,
                _ = ticker.tick() => {
                    tokio::select! {
                        biased;
                        _ = shutdown.changed() => {
                            debug!(tracker = label, "discarding in-flight fetch");
                            break;
                        }
                        emitted = poller.poll() => {
                            debug!(tracker = label, events = emitted.len(), "poll complete");
                        }
                    }
                }
            }
        }

        info!(tracker = label, "tracker stopped");
    });

    TrackerHandle {
        shutdown: shutdown_tx,
        events,
        task,
    }
}

/// Send to whoever is listening; no subscribers is not an error
pub(crate) fn publish<E>(events: &broadcast::Sender<E>, emitted: &[E])
where
    E: Clone,
{
    for event in emitted {
        let _ = events.send(event.clone());
    }
}
