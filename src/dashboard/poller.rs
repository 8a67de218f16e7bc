//! Stats poller
//!
//! A single tokio task that fetches `/stats`, forwards the outcome to the UI
//! and sleeps for the poll interval, forever, until its handle is stopped.
//! Failures are forwarded like successes; they never end the loop.

use super::client::DashboardEvent;
use crate::backend::ProfileBackend;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Handle to a running poller. Dropping it also stops the task.
pub struct PollerHandle {
    cancel_tx: watch::Sender<bool>,
    join: Option<JoinHandle<u64>>,
}

impl PollerHandle {
    /// Signal the task and wait for it to exit. Returns the number of
    /// completed poll cycles.
    pub async fn stop(mut self) -> u64 {
        let _ = self.cancel_tx.send(true);
        match self.join.take() {
            Some(join) => match join.await {
                Ok(cycles) => cycles,
                Err(e) => {
                    log::warn!("[STATS] Poller task ended abnormally: {}", e);
                    0
                }
            },
            None => 0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.join.as_ref().map_or(true, |j| j.is_finished())
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        let _ = self.cancel_tx.send(true);
    }
}

pub struct StatsPoller;

impl StatsPoller {
    /// Start polling immediately, then every `interval` after each response.
    pub fn spawn(
        backend: Arc<dyn ProfileBackend>,
        interval: Duration,
        events_tx: mpsc::Sender<DashboardEvent>,
    ) -> PollerHandle {
        let (cancel_tx, mut cancel_rx) = watch::channel(false);

        let join = tokio::spawn(async move {
            log::info!("[STATS] Poller started (interval={}ms)", interval.as_millis());
            let mut cycles = 0u64;

            loop {
                let result = tokio::select! {
                    result = backend.fetch_stats() => result,
                    _ = cancel_rx.changed() => break,
                };

                if let Err(ref e) = result {
                    log::warn!("[STATS] Poll failed, keeping previous samples: {}", e);
                }
                cycles += 1;

                // A full channel must not keep the task from seeing the cancel
                let sent = tokio::select! {
                    sent = events_tx.send(DashboardEvent::StatsSampled(result)) => sent,
                    _ = cancel_rx.changed() => break,
                };
                if sent.is_err() {
                    log::debug!("[STATS] Event receiver dropped, stopping poller");
                    break;
                }

                if *cancel_rx.borrow() {
                    break;
                }
                tokio::select! {
                    _ = tokio::time::sleep(interval) => {}
                    _ = cancel_rx.changed() => break,
                }
            }

            log::info!("[STATS] Poller stopped after {} cycles", cycles);
            cycles
        });

        PollerHandle {
            cancel_tx,
            join: Some(join),
        }
    }
}
