//! Background thread that publishes the passage of time.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::events::{Event, EventBus};

/// Publishes [`Event::TimePass`] on a fixed real-time interval.
///
/// The ticker runs on its own thread concurrently with foreground requests.
/// It stops when [`stop`](Self::stop) is called or the handle is dropped.
pub struct TimeTicker {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<u64>>,
}

impl TimeTicker {
    pub fn spawn(events: EventBus, interval: Duration, years_per_tick: u32) -> Self {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            info!(
                target: "runtime::ticker",
                interval_ms = interval.as_millis() as u64,
                years_per_tick,
                "time ticker started"
            );

            let mut ticks = 0u64;
            loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        let results = events.publish(&Event::TimePass {
                            years: years_per_tick,
                        });
                        ticks += 1;
                        debug!(
                            target: "runtime::ticker",
                            tick = ticks,
                            listeners = results.len(),
                            "time passed"
                        );
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }

            info!(target: "runtime::ticker", ticks, "time ticker stopped");
            ticks
        });

        Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        }
    }

    /// Stops the ticker and returns the number of ticks it published.
    pub fn stop(mut self) -> u64 {
        self.shutdown()
    }

    fn shutdown(&mut self) -> u64 {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        match self.handle.take().map(JoinHandle::join) {
            Some(Ok(ticks)) => ticks,
            Some(Err(_)) => {
                warn!(target: "runtime::ticker", "time ticker thread panicked");
                0
            }
            None => 0,
        }
    }
}

impl Drop for TimeTicker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
