//! The options tree.
//!
//! [`OptionsTree::build`] turns a nested JSON schema of defaults into a tree
//! of [`Opt<Value>`] cells. Objects become branches, every other value
//! (including arrays and `null`) becomes a leaf whose id is the dot-joined
//! path from the root. Branch keys are kept sorted, so building the same
//! schema twice yields the same ids in the same order.

use std::collections::BTreeMap;
use std::time::Duration;

use halo_core::utils::async_utils::sleep;
use serde_json::{Map, Value};
use tracing::debug;

use super::cell::Opt;
use super::dispatcher::{set_handler, HandlerSubscription};
use super::paths::OptionPath;

/// A node of the options tree.
#[derive(Debug, Clone)]
pub enum OptionNode {
    Leaf(Opt<Value>),
    Branch(BTreeMap<String, OptionNode>),
}

impl OptionNode {
    fn build(value: &Value, path: &OptionPath) -> Self {
        match value {
            Value::Object(fields) => OptionNode::Branch(
                fields
                    .iter()
                    .map(|(key, child)| (key.clone(), OptionNode::build(child, &path.child(key.as_str()))))
                    .collect(),
            ),
            leaf => OptionNode::Leaf(Opt::new(path.to_string(), leaf.clone())),
        }
    }

    pub fn as_leaf(&self) -> Option<&Opt<Value>> {
        match self {
            OptionNode::Leaf(cell) => Some(cell),
            OptionNode::Branch(_) => None,
        }
    }

    fn collect<'a>(&'a self, path: OptionPath, out: &mut Vec<(OptionPath, &'a Opt<Value>)>) {
        match self {
            OptionNode::Leaf(cell) => out.push((path, cell)),
            OptionNode::Branch(children) => {
                for (key, child) in children {
                    child.collect(path.child(key.as_str()), out);
                }
            }
        }
    }
}

/// Reactive tree of shell options.
#[derive(Debug, Clone)]
pub struct OptionsTree {
    root: OptionNode,
}

impl OptionsTree {
    pub fn build(schema: &Value) -> Self {
        Self { root: OptionNode::build(schema, &OptionPath::root()) }
    }

    pub fn root(&self) -> &OptionNode {
        &self.root
    }

    pub fn get(&self, path: &OptionPath) -> Option<&OptionNode> {
        path.segments().iter().try_fold(&self.root, |node, segment| match node {
            OptionNode::Branch(children) => children.get(segment),
            OptionNode::Leaf(_) => None,
        })
    }

    /// Returns the leaf cell at `path`, `None` for branches and unknown paths.
    pub fn cell(&self, path: &OptionPath) -> Option<&Opt<Value>> {
        self.get(path).and_then(OptionNode::as_leaf)
    }

    /// Looks a leaf up by its dotted id.
    pub fn get_str(&self, id: &str) -> Option<&Opt<Value>> {
        self.cell(&OptionPath::parse(id))
    }

    /// Leaves with their paths, depth-first in key order.
    pub fn entries(&self) -> Vec<(OptionPath, &Opt<Value>)> {
        let mut out = Vec::new();
        self.root.collect(OptionPath::root(), &mut out);
        out
    }

    pub fn leaves(&self) -> Vec<&Opt<Value>> {
        self.entries().into_iter().map(|(_, cell)| cell).collect()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Subscribes `callback` to every leaf below any of `deps`. See [`set_handler`].
    pub fn handler<F>(&self, deps: &[OptionPath], callback: F) -> HandlerSubscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        set_handler(self, deps, callback)
    }

    /// Current values of every leaf, keyed by id.
    pub fn export_flat(&self) -> Map<String, Value> {
        self.leaves().into_iter().map(|cell| (cell.id().to_string(), cell.get())).collect()
    }

    /// Values of the leaves that differ from their default, keyed by id.
    pub fn overrides(&self) -> Map<String, Value> {
        self.leaves()
            .into_iter()
            .filter(|cell| !cell.is_default())
            .map(|cell| (cell.id().to_string(), cell.get()))
            .collect()
    }

    /// Applies an id → value document, setting only cells whose value differs.
    /// Unknown ids are ignored. Returns the ids that were set.
    pub fn apply_flat(&self, document: &Map<String, Value>) -> Vec<String> {
        let mut changed = Vec::new();
        for (id, value) in document {
            match self.get_str(id) {
                Some(cell) if cell.get() != *value => {
                    cell.set(value.clone());
                    changed.push(id.clone());
                }
                Some(_) => {}
                None => debug!("Ignoring unknown option id '{}'", id),
            }
        }
        changed
    }

    /// Resets every cell that is not at its default, pausing `step` between
    /// resets so observers can catch up. Returns the ids that were reset.
    pub async fn reset_all(&self, step: Duration) -> Vec<String> {
        let pending: Vec<Opt<Value>> = self.leaves().into_iter().filter(|c| !c.is_default()).cloned().collect();
        let mut reset = Vec::with_capacity(pending.len());
        for (index, cell) in pending.iter().enumerate() {
            if index > 0 {
                if step.is_zero() {
                    tokio::task::yield_now().await;
                } else {
                    sleep(step).await;
                }
            }
            cell.reset();
            reset.push(cell.id().to_string());
        }
        reset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample() -> OptionsTree {
        OptionsTree::build(&json!({
            "bar": { "position": "top", "layout": { "start": ["launcher", "workspaces"] } },
            "theme": { "dark": { "bg": "#171717", "primary": { "bg": "#51a4e7" } }, "radius": 11 },
            "empty": {},
            "autotheme": false,
            "nothing": null
        }))
    }

    #[test]
    fn leaf_ids_equal_dotted_paths() {
        let tree = sample();
        for (path, cell) in tree.entries() {
            assert_eq!(cell.id(), path.to_string());
        }
        let ids: Vec<&str> = tree.leaves().into_iter().map(|c| c.id()).collect();
        assert_eq!(
            ids,
            vec![
                "autotheme",
                "bar.layout.start",
                "bar.position",
                "nothing",
                "theme.dark.bg",
                "theme.dark.primary.bg",
                "theme.radius",
            ]
        );
    }

    #[test]
    fn arrays_are_leaves_and_empty_objects_are_branches() {
        let tree = sample();
        assert_eq!(tree.get_str("bar.layout.start").unwrap().get(), json!(["launcher", "workspaces"]));
        assert!(matches!(tree.get(&OptionPath::parse("empty")), Some(OptionNode::Branch(b)) if b.is_empty()));
        assert!(tree.get_str("empty").is_none());
        assert!(tree.get_str("bar.layout.start.0").is_none());
    }

    #[test]
    fn scalar_schema_yields_root_leaf() {
        let tree = OptionsTree::build(&json!(42));
        assert_eq!(tree.len(), 1);
        let cell = tree.cell(&OptionPath::root()).unwrap();
        assert_eq!(cell.id(), "");
        assert_eq!(cell.get(), json!(42));
    }

    #[test]
    fn build_is_deterministic() {
        let a = sample();
        let b = sample();
        let ids = |t: &OptionsTree| t.leaves().into_iter().map(|c| c.id().to_string()).collect::<Vec<_>>();
        assert_eq!(ids(&a), ids(&b));
        assert_eq!(a.export_flat(), b.export_flat());
    }

    #[test]
    fn overrides_and_apply_flat() {
        let tree = sample();
        assert!(tree.overrides().is_empty());
        tree.get_str("theme.radius").unwrap().set(json!(4));
        assert_eq!(tree.overrides(), json!({ "theme.radius": 4 }).as_object().cloned().unwrap());

        let other = sample();
        let doc = json!({ "theme.radius": 4, "bar.position": "top", "ghost.option": 1 });
        let changed = other.apply_flat(doc.as_object().unwrap());
        assert_eq!(changed, vec!["theme.radius".to_string()]);
        assert_eq!(other.export_flat(), tree.export_flat());
    }

    #[tokio::test(start_paused = true)]
    async fn reset_all_resets_only_changed_cells() {
        let tree = sample();
        tree.get_str("bar.position").unwrap().set(json!("bottom"));
        tree.get_str("autotheme").unwrap().set(json!(true));

        let reset = tree.reset_all(Duration::from_millis(5)).await;
        assert_eq!(reset, vec!["autotheme".to_string(), "bar.position".to_string()]);
        assert!(tree.overrides().is_empty());
    }
}
