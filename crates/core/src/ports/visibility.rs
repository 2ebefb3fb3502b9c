//! Port trait for visibility observation.
//!
//! Abstracts the platform's intersection primitive (a DOM observer in a
//! browser, a viewport tracker in a terminal UI, a timer in tests). The
//! sentinel only ever sees a stream of visibility ratios.

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

use crate::error::VisibilityResult;

/// One observation of the sentinel element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityEvent {
    /// Visible fraction of the element, in `0.0..=1.0`.
    pub ratio: f64,
}

impl VisibilityEvent {
    pub fn visible() -> Self {
        Self { ratio: 1.0 }
    }

    pub fn hidden() -> Self {
        Self { ratio: 0.0 }
    }
}

/// Stream of visibility observations. Dropping it detaches the observer.
pub type VisibilityStream = Pin<Box<dyn Stream<Item = VisibilityEvent> + Send>>;

/// Source of visibility observations for one sentinel element.
#[async_trait]
pub trait VisibilitySource: Send + Sync {
    /// Attach an observer and return its event stream.
    async fn observe(&self) -> VisibilityResult<VisibilityStream>;
}
