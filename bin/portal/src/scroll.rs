//! Timer-driven stand-in for a viewport: the sentinel scrolls into view
//! and back out once per tick.

use std::time::Duration;

use async_trait::async_trait;
use futures::stream;

use portal_core::error::{VisibilityError, VisibilityResult};
use portal_core::ports::{VisibilityEvent, VisibilitySource, VisibilityStream};

/// Simulated scrolling at a fixed pace.
#[derive(Debug, Clone, Copy)]
pub struct ScrollSimulator {
    interval: Duration,
}

impl ScrollSimulator {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

#[async_trait]
impl VisibilitySource for ScrollSimulator {
    async fn observe(&self) -> VisibilityResult<VisibilityStream> {
        if self.interval.is_zero() {
            return Err(VisibilityError::ObserverUnavailable(
                "scroll interval must be greater than zero".to_string(),
            ));
        }

        let interval = self.interval;
        let events = stream::unfold(false, move |visible| async move {
            tokio::time::sleep(interval).await;
            let event = if visible {
                VisibilityEvent::hidden()
            } else {
                VisibilityEvent::visible()
            };
            Some((event, !visible))
        });
        Ok(Box::pin(events))
    }
}
