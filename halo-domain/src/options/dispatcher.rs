//! Dependency-scoped change dispatch.
//!
//! [`set_handler`] attaches one callback to every leaf below any of a set of
//! dependency paths. The callback is told nothing about which cell changed
//! and is expected to recompute everything it derives.

use std::sync::Arc;

use tracing::trace;

use super::cell::Subscription;
use super::paths::OptionPath;
use super::tree::OptionsTree;

/// The set of cell subscriptions created by one [`set_handler`] call.
#[must_use = "dropping a HandlerSubscription keeps the handler attached; keep it to unsubscribe later"]
#[derive(Debug)]
pub struct HandlerSubscription {
    subscriptions: Vec<Subscription>,
}

impl HandlerSubscription {
    /// Detaches the handler from every cell. Safe to call more than once.
    pub fn unsubscribe(&self) {
        for subscription in &self.subscriptions {
            subscription.unsubscribe();
        }
    }

    /// Number of cells the handler was attached to.
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

/// Subscribes `callback` to every leaf whose path starts, segment-wise, with
/// one of `deps`. A leaf matched by several dependencies is subscribed once.
pub fn set_handler<F>(tree: &OptionsTree, deps: &[OptionPath], callback: F) -> HandlerSubscription
where
    F: Fn() + Send + Sync + 'static,
{
    let callback: Arc<dyn Fn() + Send + Sync> = Arc::new(callback);
    let subscriptions = tree
        .entries()
        .into_iter()
        .filter(|(path, _)| deps.iter().any(|dep| path.starts_with(dep)))
        .map(|(_, cell)| {
            let callback = Arc::clone(&callback);
            cell.subscribe(move || callback())
        })
        .collect::<Vec<_>>();
    trace!("Handler attached to {} option(s) for {:?}", subscriptions.len(), deps);
    HandlerSubscription { subscriptions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn tree() -> OptionsTree {
        OptionsTree::build(&json!({
            "theme": { "dark": { "bg": "#000000", "fg": "#ffffff" }, "light": { "bg": "#fffffa" } },
            "themeX": { "bg": "#123456" },
            "bar": { "position": "top" }
        }))
    }

    fn count_handler(tree: &OptionsTree, deps: &[&str]) -> (Arc<AtomicUsize>, HandlerSubscription) {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        let deps: Vec<OptionPath> = deps.iter().map(|d| OptionPath::parse(d)).collect();
        let sub = set_handler(tree, &deps, move || {
            h.fetch_add(1, Ordering::SeqCst);
        });
        (hits, sub)
    }

    #[test]
    fn handler_fires_for_dependent_cells_only() {
        let tree = tree();
        let (hits, sub) = count_handler(&tree, &["theme"]);
        assert_eq!(sub.len(), 3);

        tree.get_str("theme.dark.bg").unwrap().set(json!("#111111"));
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        tree.get_str("bar.position").unwrap().set(json!("bottom"));
        tree.get_str("themeX.bg").unwrap().set(json!("#654321"));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn overlapping_dependencies_subscribe_once() {
        let tree = tree();
        let (hits, sub) = count_handler(&tree, &["theme", "theme.dark", "theme.dark.bg"]);
        assert_eq!(sub.len(), 3);
        tree.get_str("theme.dark.bg").unwrap().set(json!("#222222"));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribe_detaches_from_every_cell() {
        let tree = tree();
        let (hits, sub) = count_handler(&tree, &["theme.dark", "bar"]);
        sub.unsubscribe();
        sub.unsubscribe();
        tree.get_str("theme.dark.fg").unwrap().set(json!("#eeeeee"));
        tree.get_str("bar.position").unwrap().set(json!("bottom"));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        for cell in tree.leaves() {
            assert_eq!(cell.subscriber_count(), 0);
        }
    }

    #[test]
    fn unknown_dependency_attaches_nothing() {
        let tree = tree();
        let (_hits, sub) = count_handler(&tree, &["osd"]);
        assert!(sub.is_empty());
    }
}
