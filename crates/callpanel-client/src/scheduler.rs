use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::event::{RefreshOutcome, RefreshTrigger};
use crate::panel::Panel;
use crate::transport::Transport;
use crate::Result;

/// Shortest period the timer will run at.
pub const MIN_PERIOD: Duration = Duration::from_secs(1);

/// Keeps the panel fresh on a fixed interval, independent of clicks.
pub struct RefreshScheduler<T> {
    panel: Panel<T>,
    period: Duration,
}

/// A running timer. Dropping the handle stops it too.
#[derive(Debug)]
pub struct SchedulerHandle {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    pub fn stop(self) {
        let _ = self.shutdown.send(());
    }

    /// Stop and wait for the timer task to exit.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(());
        let _ = self.task.await;
    }
}

impl<T: Transport> RefreshScheduler<T> {
    /// Scheduler using the panel's configured refresh interval.
    pub fn new(panel: Panel<T>) -> Self {
        let period = panel.config().refresh_interval();
        Self::with_period(panel, period)
    }

    /// Periods below [`MIN_PERIOD`] are raised to it.
    pub fn with_period(panel: Panel<T>, period: Duration) -> Self {
        if period < MIN_PERIOD {
            warn!(
                requested_ms = period.as_millis() as u64,
                "refresh period below one second, using one second"
            );
        }
        let period = period.max(MIN_PERIOD);
        Self { panel, period }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Arm the repeating timer. The first tick fires one period from now.
    ///
    /// Each tick runs its refresh on its own task so a slow fetch never
    /// delays the clock; overlapping ticks are skipped by the panel.
    pub fn start(&self) -> SchedulerHandle {
        let (shutdown, mut stop_rx) = oneshot::channel();
        let panel = self.panel.clone();
        let period = self.period;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(period_ms = period.as_millis() as u64, "refresh timer started");

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let panel = panel.clone();
                        tokio::spawn(async move {
                            if let Err(e) = panel.refresh(RefreshTrigger::Timer).await {
                                debug!(error = %e, "timer refresh failed");
                            }
                        });
                    }
                    _ = &mut stop_rx => break,
                }
            }
            info!("refresh timer stopped");
        });

        SchedulerHandle { shutdown, task }
    }

    pub fn stop(&self, handle: SchedulerHandle) {
        handle.stop();
    }

    /// Refresh right away without touching the timer.
    pub fn trigger_now(&self) -> JoinHandle<Result<RefreshOutcome>> {
        let panel = self.panel.clone();
        tokio::spawn(async move { panel.refresh(RefreshTrigger::Forced).await })
    }
}
