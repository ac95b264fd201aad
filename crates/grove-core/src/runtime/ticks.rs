//! Wall-clock tick schedule backed by tokio timers.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

use crate::timer::{TickSchedule, TickToken};

/// Spawns one interval task per armed schedule. Each task pushes its token
/// into a channel that the driver drains alongside user commands.
///
/// Must be armed from within a tokio runtime.
pub struct TokioTicks {
    tx: mpsc::UnboundedSender<TickToken>,
    next_id: u64,
    tasks: HashMap<TickToken, JoinHandle<()>>,
}

impl TokioTicks {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TickToken>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let ticks = Self {
            tx,
            next_id: 0,
            tasks: HashMap::new(),
        };
        (ticks, rx)
    }

    /// Number of schedules currently running.
    pub fn live(&self) -> usize {
        self.tasks.len()
    }
}

impl TickSchedule for TokioTicks {
    fn arm(&mut self, interval: Duration) -> TickToken {
        self.next_id += 1;
        let token = TickToken::new(self.next_id);
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            let mut timer = interval_at(Instant::now() + interval, interval);
            loop {
                timer.tick().await;
                if tx.send(token).is_err() {
                    break;
                }
            }
        });
        self.tasks.insert(token, handle);
        token
    }

    fn cancel(&mut self, token: TickToken) {
        if let Some(handle) = self.tasks.remove(&token) {
            handle.abort();
        }
    }
}

impl Drop for TokioTicks {
    fn drop(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn delivers_token_every_interval() {
        let (mut ticks, mut rx) = TokioTicks::new();
        let token = ticks.arm(Duration::from_secs(1));
        for _ in 0..3 {
            assert_eq!(rx.recv().await, Some(token));
        }
        assert_eq!(ticks.live(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_delivery() {
        let (mut ticks, mut rx) = TokioTicks::new();
        let first = ticks.arm(Duration::from_secs(1));
        assert_eq!(rx.recv().await, Some(first));
        ticks.cancel(first);
        let second = ticks.arm(Duration::from_secs(1));
        // Anything still queued from the first schedule predates the cancel.
        while let Some(token) = rx.recv().await {
            if token == second {
                break;
            }
        }
        assert_eq!(ticks.live(), 1);
    }
}
