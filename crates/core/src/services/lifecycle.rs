//! Mount lifecycle of a list view.
//!
//! A list is mounted from creation until `unmount()` is called or its
//! owner drops it. Async work started while mounted checks the guard
//! before applying results.

use tokio::sync::watch;

/// Owning side of a mount lifecycle.
#[derive(Debug)]
pub struct Lifecycle {
    tx: watch::Sender<bool>,
}

impl Lifecycle {
    /// Create a mounted lifecycle.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(true);
        Self { tx }
    }

    /// Mark as unmounted. Idempotent.
    pub fn unmount(&self) {
        // `send_replace` updates the value even with no live guards.
        self.tx.send_replace(false);
    }

    pub fn is_mounted(&self) -> bool {
        *self.tx.borrow()
    }

    /// Create an observing guard.
    pub fn guard(&self) -> MountGuard {
        MountGuard {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

/// Observing side of a mount lifecycle.
#[derive(Debug, Clone)]
pub struct MountGuard {
    rx: watch::Receiver<bool>,
}

impl MountGuard {
    /// Whether the owner is still mounted.
    ///
    /// Returns `false` once the owning [`Lifecycle`] has been dropped.
    pub fn is_mounted(&self) -> bool {
        *self.rx.borrow() && self.rx.has_changed().is_ok()
    }

    /// Resolve once the owner unmounts or is dropped.
    pub async fn unmounted(&mut self) {
        loop {
            if !*self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn unmount_is_visible_to_guards() {
        let lifecycle = Lifecycle::new();
        let guard = lifecycle.guard();
        assert!(guard.is_mounted());

        lifecycle.unmount();
        assert!(!lifecycle.is_mounted());
        assert!(!guard.is_mounted());
    }

    #[test]
    fn dropping_owner_unmounts_guard() {
        let lifecycle = Lifecycle::new();
        let guard = lifecycle.guard();
        drop(lifecycle);
        assert!(!guard.is_mounted());
    }

    #[tokio::test]
    async fn unmounted_future_resolves_on_unmount() {
        let lifecycle = Lifecycle::new();
        let mut guard = lifecycle.guard();

        let waiter = tokio::spawn(async move { guard.unmounted().await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());

        lifecycle.unmount();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("guard should observe unmount")
            .unwrap();
    }
}
