//! Timer task driving periodic sync cycles

use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// A running periodic loop.
///
/// Stopping only prevents future ticks: a cycle already running when
/// [`PeriodicHandle::stop`] is called runs to completion. Dropping the
/// handle stops the loop as well.
pub(crate) struct PeriodicHandle {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl PeriodicHandle {
    /// Run `tick` every `period`, first after one full period.
    ///
    /// The loop also ends when `tick` returns `ControlFlow::Break`.
    pub(crate) fn spawn<F, Fut>(period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send + 'static,
    {
        let (shutdown, mut shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {}
                }
                if tick().await.is_break() {
                    break;
                }
            }
            tracing::debug!("Periodic sync loop finished");
        });

        Self { shutdown, task }
    }

    pub(crate) fn stop(self) {
        // Err only means the loop already ended
        let _ = self.shutdown.send(());
    }

    pub(crate) fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}
