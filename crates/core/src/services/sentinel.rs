//! Scroll sentinel: turns visibility observations into load-more calls.
//!
//! The sentinel is an invisible marker after the last rendered item. When
//! it becomes at least [`DEFAULT_VISIBILITY_THRESHOLD`] visible, and the
//! list has more pages and is idle, one `load_more` is issued. Staying
//! visible does not re-fire; the sentinel must leave the viewport first.

use std::sync::Arc;

use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::error::{ListError, VisibilityResult};
use crate::ports::{VisibilityEvent, VisibilitySource, VisibilityStream};

use super::list::{LoadMore, LoadOutcome};

/// Visible fraction at which the sentinel triggers.
pub const DEFAULT_VISIBILITY_THRESHOLD: f64 = 0.1;

/// Edge detector over visibility ratios.
#[derive(Debug, Clone)]
pub struct ScrollSentinel {
    threshold: f64,
    visible: bool,
}

impl ScrollSentinel {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            visible: false,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Feed one observation. Returns `true` on a hidden → visible transition.
    pub fn observe(&mut self, event: VisibilityEvent) -> bool {
        let now_visible = event.ratio > 0.0 && event.ratio >= self.threshold;
        let rising = now_visible && !self.visible;
        self.visible = now_visible;
        rising
    }
}

impl Default for ScrollSentinel {
    fn default() -> Self {
        Self::new(DEFAULT_VISIBILITY_THRESHOLD)
    }
}

/// Counters from a finished sentinel run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SentinelReport {
    /// Hidden → visible transitions seen.
    pub triggers: u64,
    /// Load-more calls issued.
    pub loads: u64,
    /// Triggers ignored because the list had no more pages or was loading.
    pub gated: u64,
}

/// Drive `loader` from `events` until the list unmounts or the stream ends.
///
/// Load-more failures are already surfaced by the list; the sentinel just
/// keeps observing so the next scroll retries.
pub async fn run_sentinel<L>(
    loader: Arc<L>,
    mut events: VisibilityStream,
    mut sentinel: ScrollSentinel,
) -> SentinelReport
where
    L: LoadMore + ?Sized,
{
    let mut guard = loader.mount_guard();
    let mut report = SentinelReport::default();

    loop {
        let event = tokio::select! {
            biased;
            _ = guard.unmounted() => {
                debug!("Sentinel detached on unmount");
                break;
            }
            next = events.next() => match next {
                Some(event) => event,
                None => {
                    debug!("Visibility stream ended");
                    break;
                }
            },
        };

        if !sentinel.observe(event) {
            continue;
        }
        report.triggers += 1;

        if !loader.has_more() || loader.is_loading() {
            trace!("Sentinel visible but list is exhausted or busy");
            report.gated += 1;
            continue;
        }

        report.loads += 1;
        match loader.load_more().await {
            Ok(LoadOutcome::Loaded { appended, .. }) => {
                trace!(appended, "Sentinel load applied");
            }
            Ok(outcome) => trace!(?outcome, "Sentinel load had no effect"),
            Err(ListError::Unmounted) => break,
            Err(e) => debug!(error = %e, "Sentinel load failed"),
        }
    }

    report
}

/// Attach a sentinel to `loader` and run it on a background task.
///
/// The task ends on its own when the list unmounts.
pub async fn attach_sentinel<L>(
    loader: Arc<L>,
    source: &dyn VisibilitySource,
    threshold: f64,
) -> VisibilityResult<JoinHandle<SentinelReport>>
where
    L: LoadMore + 'static,
{
    let events = source.observe().await.inspect_err(|e| {
        warn!(error = %e, "⚠️  Visibility observer unavailable, infinite scroll disabled");
    })?;
    info!(threshold, "👀 Scroll sentinel attached");
    Ok(tokio::spawn(run_sentinel(
        loader,
        events,
        ScrollSentinel::new(threshold),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use futures::channel::mpsc;
    use futures::stream;

    use crate::error::ListResult;
    use crate::services::{Lifecycle, MountGuard};

    struct MockLoader {
        lifecycle: Lifecycle,
        has_more: AtomicBool,
        loading: AtomicBool,
        calls: AtomicUsize,
    }

    impl MockLoader {
        fn new(has_more: bool) -> Self {
            Self {
                lifecycle: Lifecycle::new(),
                has_more: AtomicBool::new(has_more),
                loading: AtomicBool::new(false),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl LoadMore for MockLoader {
        fn has_more(&self) -> bool {
            self.has_more.load(Ordering::SeqCst)
        }

        fn is_loading(&self) -> bool {
            self.loading.load(Ordering::SeqCst)
        }

        fn mount_guard(&self) -> MountGuard {
            self.lifecycle.guard()
        }

        async fn load_more(&self) -> ListResult<LoadOutcome> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(LoadOutcome::Loaded {
                appended: 1,
                replaced: 0,
            })
        }
    }

    fn ratios(values: &[f64]) -> VisibilityStream {
        let events: Vec<_> = values
            .iter()
            .map(|&ratio| VisibilityEvent { ratio })
            .collect();
        Box::pin(stream::iter(events))
    }

    #[test]
    fn test_threshold_edge() {
        let mut s = ScrollSentinel::default();
        assert!(!s.observe(VisibilityEvent { ratio: 0.05 }));
        assert!(s.observe(VisibilityEvent { ratio: 0.1 }));
        assert!(!s.observe(VisibilityEvent { ratio: 0.5 }));
        assert!(!s.observe(VisibilityEvent::hidden()));
        assert!(s.observe(VisibilityEvent::visible()));
    }

    // Test critique: rester visible ne déclenche qu'un seul chargement
    #[tokio::test]
    async fn test_fires_once_per_transition() {
        let loader = Arc::new(MockLoader::new(true));
        let events = ratios(&[0.0, 0.2, 0.3, 1.0, 1.0, 0.0, 0.5, 0.5]);

        let report = run_sentinel(loader.clone(), events, ScrollSentinel::default()).await;

        assert_eq!(report.triggers, 2);
        assert_eq!(report.loads, 2);
        assert_eq!(loader.calls.load(Ordering::SeqCst), 2);
    }

    // Pas de page suivante ou chargement en cours: aucun appel
    #[tokio::test]
    async fn test_gated_when_exhausted_or_loading() {
        let exhausted = Arc::new(MockLoader::new(false));
        let report = run_sentinel(exhausted.clone(), ratios(&[1.0, 0.0, 1.0]), ScrollSentinel::default()).await;
        assert_eq!(report, SentinelReport { triggers: 2, loads: 0, gated: 2 });
        assert_eq!(exhausted.calls.load(Ordering::SeqCst), 0);

        let busy = Arc::new(MockLoader::new(true));
        busy.loading.store(true, Ordering::SeqCst);
        let report = run_sentinel(busy.clone(), ratios(&[1.0]), ScrollSentinel::default()).await;
        assert_eq!(report.gated, 1);
        assert_eq!(busy.calls.load(Ordering::SeqCst), 0);
    }

    // Test critique: l'observer est détaché au démontage
    #[tokio::test]
    async fn test_detaches_on_unmount() {
        let loader = Arc::new(MockLoader::new(true));
        let (tx, rx) = mpsc::unbounded();
        let events: VisibilityStream = Box::pin(rx);

        let task = tokio::spawn(run_sentinel(loader.clone(), events, ScrollSentinel::default()));
        tx.unbounded_send(VisibilityEvent::visible()).unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        loader.lifecycle.unmount();
        let report = tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(report.loads, 1);
        // Le sender voit le stream fermé une fois la tâche terminée
        assert!(tx.unbounded_send(VisibilityEvent::hidden()).is_err());
    }
}
