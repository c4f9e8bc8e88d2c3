use std::ops::ControlFlow;
use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior, interval};
use tracing::debug;

/// Nominal refresh period of the countdown view
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Periodic callback tied to the lifetime of its handle.
///
/// The first tick fires immediately. The loop ends when the callback returns
/// `ControlFlow::Break`, when `stop` is called, or when the handle is dropped,
/// so a torn-down view never receives another tick.
#[derive(Debug)]
pub struct Ticker {
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Must be called from within a tokio runtime
    pub fn start<F>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut(u64) -> ControlFlow<()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut timer = interval(period);
            // a slow frame should not cause a burst of catch-up frames
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

            let mut tick = 0u64;
            loop {
                timer.tick().await;
                if on_tick(tick).is_break() {
                    debug!("Ticker finished after {} ticks", tick + 1);
                    break;
                }
                tick += 1;
            }
        });

        Self {
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Waits until the callback breaks the loop or the ticker is stopped
    pub async fn wait(&mut self) {
        if let Some(handle) = self.handle.as_mut() {
            let _ = handle.await;
            self.handle = None;
        }
    }

    /// Cancels the loop; no tick runs after this returns to the runtime
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("Ticker stopped");
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}
