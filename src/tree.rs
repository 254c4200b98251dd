//! The source tree abstraction consumed by filtering views.

use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use crate::event::{SubscriptionId, TreeViewListener};

/// An externally owned, mutable hierarchical data source.
///
/// Nodes are opaque copyable identities; a filtering view never looks inside
/// them and never mutates the tree. Implementations fire a notification to
/// every subscribed listener whenever their content or structure changes,
/// before the mutating call returns.
pub trait SourceTree {
    /// Opaque node identity.
    type Node: Copy + Eq + Hash + fmt::Debug;

    /// The root node. Always present, even for an otherwise empty tree.
    fn root(&self) -> Self::Node;

    /// Number of children under `node`.
    fn child_count(&self, node: Self::Node) -> usize;

    /// The child of `node` at `index`, or `None` when out of range.
    fn child_at(&self, node: Self::Node, index: usize) -> Option<Self::Node>;

    /// Registers a change listener.
    fn subscribe(&self, listener: Rc<dyn TreeViewListener<Self::Node>>) -> SubscriptionId;

    /// Removes a previously registered listener.
    fn unsubscribe(&self, id: SubscriptionId);

    /// Forwards an edited node value into the source.
    ///
    /// This is the single write path a deriving view passes through without
    /// interpreting. Read-only sources may leave the default no-op.
    fn value_changed(&self, node: Self::Node, new_value: &str) {
        let _ = (node, new_value);
    }

    /// Collects the children of `node` in source order.
    fn children(&self, node: Self::Node) -> Vec<Self::Node> {
        (0..self.child_count(node))
            .filter_map(|index| self.child_at(node, index))
            .collect()
    }
}
