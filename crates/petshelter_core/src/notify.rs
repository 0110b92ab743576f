//! In-process change observers keyed by content address.
//!
//! # Responsibility
//! - Keep an explicit registry of observers per address prefix.
//! - Fan out "this address may have changed" signals after a write commits.
//!
//! # Invariants
//! - Notifications carry only the changed address, never row data.
//! - Observers are invoked without holding the registry lock, so an observer
//!   may register or unregister from inside its callback.

use crate::provider::ContentUri;
use log::debug;
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Receiver of change signals.
pub trait ContentObserver: Send + Sync {
    fn on_change(&self, uri: &ContentUri);
}

impl<F> ContentObserver for F
where
    F: Fn(&ContentUri) + Send + Sync,
{
    fn on_change(&self, uri: &ContentUri) {
        self(uri)
    }
}

/// Handle returned by [`ChangeNotifier::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObserverId(u64);

struct Registration {
    uri: ContentUri,
    notify_for_descendants: bool,
    observer: Arc<dyn ContentObserver>,
}

impl Registration {
    fn wants(&self, changed: &ContentUri) -> bool {
        self.uri == *changed
            || changed.is_ancestor_of(&self.uri)
            || (self.notify_for_descendants && self.uri.is_ancestor_of(changed))
    }
}

/// Registry of change observers.
#[derive(Default)]
pub struct ChangeNotifier {
    next_id: AtomicU64,
    observers: RwLock<BTreeMap<ObserverId, Registration>>,
}

impl Debug for ChangeNotifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("observers", &self.len())
            .finish()
    }
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `observer` for changes on `uri`.
    ///
    /// An observer always hears about changes to `uri` itself and to any of
    /// its ancestors. With `notify_for_descendants` it also hears about
    /// changes beneath `uri`.
    pub fn register(
        &self,
        uri: ContentUri,
        notify_for_descendants: bool,
        observer: Arc<dyn ContentObserver>,
    ) -> ObserverId {
        let id = ObserverId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                id,
                Registration {
                    uri,
                    notify_for_descendants,
                    observer,
                },
            );
        id
    }

    /// Removes a registration. Returns `false` when `id` was not registered.
    pub fn unregister(&self, id: ObserverId) -> bool {
        self.observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .is_some()
    }

    /// Signals every interested observer and returns how many were called.
    pub fn notify_change(&self, uri: &ContentUri) -> usize {
        let targets: Vec<Arc<dyn ContentObserver>> = self
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|registration| registration.wants(uri))
            .map(|registration| Arc::clone(&registration.observer))
            .collect();

        for observer in &targets {
            observer.on_change(uri);
        }
        debug!(
            "event=change_notify module=notify status=ok observers={}",
            targets.len()
        );
        targets.len()
    }

    pub fn len(&self) -> usize {
        self.observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::ChangeNotifier;
    use crate::provider::ContentUri;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counter_observer(counter: &Arc<AtomicUsize>) -> Arc<dyn super::ContentObserver> {
        let counter = Arc::clone(counter);
        Arc::new(move |_: &ContentUri| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn collection_change_reaches_item_observers() {
        let notifier = ChangeNotifier::new();
        let hits = Arc::new(AtomicUsize::new(0));
        notifier.register(
            ContentUri::pets().with_appended_id(3),
            false,
            counter_observer(&hits),
        );

        assert_eq!(notifier.notify_change(&ContentUri::pets()), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn item_change_needs_descendant_flag_on_collection_observer() {
        let notifier = ChangeNotifier::new();
        let exact = Arc::new(AtomicUsize::new(0));
        let deep = Arc::new(AtomicUsize::new(0));
        notifier.register(ContentUri::pets(), false, counter_observer(&exact));
        notifier.register(ContentUri::pets(), true, counter_observer(&deep));

        notifier.notify_change(&ContentUri::pets().with_appended_id(9));

        assert_eq!(exact.load(Ordering::SeqCst), 0);
        assert_eq!(deep.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unregister_stops_delivery() {
        let notifier = ChangeNotifier::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let id = notifier.register(ContentUri::pets(), true, counter_observer(&hits));
        assert_eq!(notifier.len(), 1);

        assert!(notifier.unregister(id));
        assert!(!notifier.unregister(id));
        assert!(notifier.is_empty());
        assert_eq!(notifier.notify_change(&ContentUri::pets()), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unrelated_authority_is_ignored() {
        let notifier = ChangeNotifier::new();
        let hits = Arc::new(AtomicUsize::new(0));
        notifier.register(ContentUri::pets(), true, counter_observer(&hits));

        notifier.notify_change(&ContentUri::new("other.authority", ["pets"]));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
