use std::time::Duration;

use tokio::time::Instant;

/// Keeps a fixed idle gap between consecutive requests.
///
/// The gap runs from the moment a request finishes, whatever its outcome,
/// to the start of the next one. The first request never waits.
#[derive(Debug)]
pub struct RequestPacer {
    interval: Duration,
    last_finished: Option<Instant>,
}

impl RequestPacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_finished: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until the next request is allowed
    pub async fn wait(&mut self) {
        if let Some(finished) = self.last_finished {
            tokio::time::sleep_until(finished + self.interval).await;
        }
    }

    /// Mark the current request as finished
    pub fn finish(&mut self) {
        self.last_finished = Some(Instant::now());
    }
}
