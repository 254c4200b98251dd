//! The filtered tree view: lazy, memoized visibility over a source tree.
//!
//! A [`FilteredTreeView`] exposes the subset of a [`SourceTree`] whose nodes
//! match (or have a descendant that matches) a pattern specification.
//! Answers are computed on first query and memoized in two caches:
//!
//! - visibility: per node, "this node or a descendant matches"
//! - children: per node, its visible children in source order
//!
//! Invalidation is coarse: any notification from the source drops both
//! caches in full before it is forwarded to the view's own subscribers, so a
//! listener that re-queries always observes freshly computed results.

use std::cell::RefCell;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use fnv::FnvHashMap;

use crate::event::{ListenerSet, SubscriptionId, TreeEvent, TreeViewListener};
use crate::extract::PathExtractor;
use crate::pattern::PatternSpec;
use crate::tree::SourceTree;

/// Cached answers plus the view's own subscribers.
///
/// Shared between the view and the listener it registers on the source.
/// `RefCell` is sound here: the engine is single-threaded cooperative, so a
/// notification is never delivered while a query computation is in flight.
struct ViewState<N> {
    visibility: RefCell<FnvHashMap<N, bool>>,
    children: RefCell<FnvHashMap<N, Vec<N>>>,
    listeners: RefCell<ListenerSet<N>>,
}

impl<N: Copy + Eq + Hash> ViewState<N> {
    fn new() -> Self {
        Self {
            visibility: RefCell::new(FnvHashMap::default()),
            children: RefCell::new(FnvHashMap::default()),
            listeners: RefCell::new(ListenerSet::new()),
        }
    }

    fn clear_caches(&self) {
        self.visibility.borrow_mut().clear();
        self.children.borrow_mut().clear();
    }

    fn notify(&self, event: &TreeEvent<N>) {
        let snapshot = self.listeners.borrow().snapshot();
        for listener in snapshot {
            listener.tree_changed(event);
        }
    }
}

/// The listener a view registers on its source: every cached answer is
/// dropped before the notification reaches the view's own subscribers.
struct InvalidateAndForward<N> {
    state: Rc<ViewState<N>>,
}

impl<N: Copy + Eq + Hash + fmt::Debug> TreeViewListener<N> for InvalidateAndForward<N> {
    fn tree_changed(&self, event: &TreeEvent<N>) {
        log::debug!("source changed ({:?}); dropping filter caches", event.kind);
        self.state.clear_caches();
        self.state.notify(event);
    }
}

/// A read-only filtered projection of a source tree.
///
/// The view holds the source (shared, never mutated), an owned pattern
/// specification for its lifetime, and a path extractor. One view serves one
/// pattern; construct a new view when the pattern changes.
pub struct FilteredTreeView<S: SourceTree, E: PathExtractor<S::Node>> {
    source: Rc<S>,
    extractor: E,
    pattern: PatternSpec,
    state: Rc<ViewState<S::Node>>,
    source_subscription: SubscriptionId,
}

impl<S, E> FilteredTreeView<S, E>
where
    S: SourceTree,
    E: PathExtractor<S::Node>,
    S::Node: 'static,
{
    /// Attaches a filtered view to `source` with the given raw pattern
    /// specification. The view subscribes to the source immediately.
    pub fn new(source: Rc<S>, extractor: E, raw_pattern: &str) -> Self {
        let pattern = PatternSpec::parse(raw_pattern);
        let state = Rc::new(ViewState::new());
        let source_subscription = source.subscribe(Rc::new(InvalidateAndForward {
            state: Rc::clone(&state),
        }));
        log::debug!("filter view attached: {}", pattern.describe());
        Self {
            source,
            extractor,
            pattern,
            state,
            source_subscription,
        }
    }

    /// The pattern specification this view filters by.
    pub fn pattern(&self) -> &PatternSpec {
        &self.pattern
    }

    /// The underlying source tree.
    pub fn source(&self) -> &Rc<S> {
        &self.source
    }

    /// The root node, exposed whether or not it is itself visible.
    pub fn root(&self) -> S::Node {
        self.source.root()
    }

    /// True when `node` or any of its descendants matches the pattern.
    pub fn is_visible(&self, node: S::Node) -> bool {
        if let Some(&cached) = self.state.visibility.borrow().get(&node) {
            return cached;
        }
        let visible = self.compute_visibility(node);
        self.state.visibility.borrow_mut().insert(node, visible);
        visible
    }

    fn compute_visibility(&self, node: S::Node) -> bool {
        // A blank pattern keeps the whole tree visible without consulting
        // the extractor.
        if self.pattern.matches_everything() {
            return true;
        }

        let paths = self.extractor.extract_paths(node);
        if paths.iter().any(|path| self.pattern.matches(path)) {
            return true;
        }

        // Visibility propagates up from descendants. The recursion walks the
        // unfiltered child list and stops at the first visible child.
        for index in 0..self.source.child_count(node) {
            if let Some(child) = self.source.child_at(node, index) {
                if self.is_visible(child) {
                    return true;
                }
            }
        }
        false
    }

    /// Runs `f` over the filtered child list of `parent`, computing and
    /// caching the list on first use.
    fn with_filtered_children<R>(&self, parent: S::Node, f: impl FnOnce(&[S::Node]) -> R) -> R {
        if let Some(children) = self.state.children.borrow().get(&parent) {
            return f(children);
        }
        let mut kept = Vec::new();
        for index in 0..self.source.child_count(parent) {
            if let Some(child) = self.source.child_at(parent, index) {
                if self.is_visible(child) {
                    kept.push(child);
                }
            }
        }
        let result = f(&kept);
        self.state.children.borrow_mut().insert(parent, kept);
        result
    }

    /// The children of `parent` that are visible under the pattern, in
    /// source order. Filtering removes elements, never reorders them.
    pub fn filtered_children(&self, parent: S::Node) -> Vec<S::Node> {
        self.with_filtered_children(parent, |children| children.to_vec())
    }

    /// Number of visible children under `parent`.
    pub fn child_count(&self, parent: S::Node) -> usize {
        self.with_filtered_children(parent, |children| children.len())
    }

    /// The visible child of `parent` at `index`.
    pub fn child_at(&self, parent: S::Node, index: usize) -> Option<S::Node> {
        self.with_filtered_children(parent, |children| children.get(index).copied())
    }

    /// Position of `child` among the visible children of `parent`, or `None`
    /// when `child` is not visible there.
    pub fn index_of_child(&self, parent: S::Node, child: S::Node) -> Option<usize> {
        self.with_filtered_children(parent, |children| {
            children.iter().position(|&candidate| candidate == child)
        })
    }

    /// A node is a leaf of the filtered view when it has no visible children.
    pub fn is_leaf(&self, node: S::Node) -> bool {
        self.with_filtered_children(node, |children| children.is_empty())
    }

    /// Registers a listener for this view's forwarded notifications.
    pub fn subscribe(&self, listener: Rc<dyn TreeViewListener<S::Node>>) -> SubscriptionId {
        self.state.listeners.borrow_mut().add(listener)
    }

    /// Removes a listener registered with [`subscribe`](Self::subscribe).
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.state.listeners.borrow_mut().remove(id);
    }

    /// Forwards an edited node value to the source, uninterpreted.
    pub fn value_changed(&self, node: S::Node, new_value: &str) {
        self.source.value_changed(node, new_value);
    }

    /// Drops every cached answer and tells subscribers the whole structure
    /// changed. Queries after this recompute from the live source.
    pub fn refresh(&self) {
        log::debug!("filter view refresh: {}", self.pattern.describe());
        self.state.clear_caches();
        let event = TreeEvent::structure_changed(self.source.root());
        self.state.notify(&event);
    }
}

impl<S: SourceTree, E: PathExtractor<S::Node>> Drop for FilteredTreeView<S, E> {
    fn drop(&mut self) {
        self.source.unsubscribe(self.source_subscription);
    }
}
