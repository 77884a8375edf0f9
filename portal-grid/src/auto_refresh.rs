//! Timer-driven refresh of a grid's base rows.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::error::CommandError;
use crate::grid::Grid;

/// Background task that calls [`Grid::refresh`] on an interval.
///
/// Ticks that find a refresh already in flight are skipped, so a slow host
/// never sees overlapping fetches. The task stops when the handle is
/// dropped, when [`stop`](AutoRefresh::stop) is called, or once the grid is
/// disposed.
///
/// # Example
///
/// ```ignore
/// let refresher = AutoRefresh::spawn(grid.clone(), Duration::from_secs(30));
/// // ... later, on screen teardown
/// grid.dispose();
/// drop(refresher);
/// ```
#[derive(Debug)]
pub struct AutoRefresh {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl AutoRefresh {
    /// Spawn the refresh loop on the current tokio runtime.
    pub fn spawn(grid: Grid, interval: Duration) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately; the initial load is the host's job
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        if !grid.is_alive() {
                            break;
                        }
                        match grid.refresh().await {
                            Ok(_) => {}
                            Err(CommandError::Busy) => log::debug!("Auto-refresh tick skipped"),
                            Err(CommandError::Disposed) => break,
                            Err(err) => log::warn!("Auto-refresh failed: {err}"),
                        }
                    }
                }
            }
            log::debug!("Auto-refresh stopped");
        });
        Self { cancel, handle }
    }

    /// Spawn using the grid's configured interval, if it has one.
    pub fn from_config(grid: &Grid) -> Option<Self> {
        let interval = grid.config().auto_refresh?;
        Some(Self::spawn(grid.clone(), interval))
    }

    /// Stop the loop.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Check if the loop has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for AutoRefresh {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
