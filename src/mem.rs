//! An in-memory mutable source tree.
//!
//! Reference implementation of [`SourceTree`] for hosts without a native
//! tree model, and the mutation stream this crate's own tests filter
//! against. Nodes live in a slot vector and are addressed by index handles;
//! removed slots are tombstoned, never reused.

use std::cell::RefCell;
use std::rc::Rc;

use thin_vec::ThinVec;

use crate::event::{ListenerSet, SubscriptionId, TreeEvent, TreeEventKind, TreeViewListener};
use crate::extract::{NodeContent, PathExtractor};
use crate::tree::SourceTree;

/// Handle to a node within a [`MemTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

#[derive(Debug)]
struct Slot {
    content: NodeContent,
    parent: Option<NodeId>,
    children: ThinVec<NodeId>,
}

/// An in-memory mutable tree of [`NodeContent`] nodes.
///
/// Every mutation fires the matching notification kind to subscribers
/// before the mutating call returns.
pub struct MemTree {
    slots: RefCell<Vec<Option<Slot>>>,
    listeners: RefCell<ListenerSet<NodeId>>,
}

impl MemTree {
    /// Creates a tree whose root is a label node.
    pub fn new(root_label: impl Into<String>) -> Rc<Self> {
        Self::with_root(NodeContent::Label(root_label.into()))
    }

    /// Creates a tree with the given root content.
    pub fn with_root(content: NodeContent) -> Rc<Self> {
        let root = Slot {
            content,
            parent: None,
            children: ThinVec::new(),
        };
        Rc::new(Self {
            slots: RefCell::new(vec![Some(root)]),
            listeners: RefCell::new(ListenerSet::new()),
        })
    }

    /// Appends a child under `parent` and notifies subscribers.
    ///
    /// # Panics
    /// Panics when `parent` is not a live node of this tree.
    pub fn insert_child(&self, parent: NodeId, content: NodeContent) -> NodeId {
        let (child, index) = {
            let mut slots = self.slots.borrow_mut();
            assert!(
                slot_ref(&slots, parent).is_some(),
                "insert under a removed node"
            );
            let child = NodeId(slots.len() as u32);
            slots.push(Some(Slot {
                content,
                parent: Some(parent),
                children: ThinVec::new(),
            }));
            let parent_slot = slots[parent.0 as usize]
                .as_mut()
                .expect("parent checked above");
            parent_slot.children.push(child);
            (child, parent_slot.children.len() - 1)
        };
        self.notify(TreeEvent::for_child(
            TreeEventKind::NodesInserted,
            parent,
            index,
            child,
        ));
        child
    }

    /// Detaches `node` and its whole subtree, then notifies subscribers.
    ///
    /// # Panics
    /// Panics when `node` is the root or not a live node of this tree.
    pub fn remove(&self, node: NodeId) {
        let (parent, index) = {
            let mut slots = self.slots.borrow_mut();
            let parent = slot_ref(&slots, node)
                .expect("remove of a node that is not live")
                .parent
                .expect("the root cannot be removed");
            let parent_slot = slots[parent.0 as usize]
                .as_mut()
                .expect("parent of a live node is live");
            let index = parent_slot
                .children
                .iter()
                .position(|&child| child == node)
                .expect("child link present for a live node");
            parent_slot.children.remove(index);
            detach_subtree(&mut slots, node);
            (parent, index)
        };
        self.notify(TreeEvent::for_child(
            TreeEventKind::NodesRemoved,
            parent,
            index,
            node,
        ));
    }

    /// Replaces the content of `node` and notifies subscribers.
    ///
    /// # Panics
    /// Panics when `node` is not a live node of this tree.
    pub fn set_content(&self, node: NodeId, content: NodeContent) {
        let event = {
            let mut slots = self.slots.borrow_mut();
            let parent = slot_ref(&slots, node)
                .expect("set_content on a node that is not live")
                .parent;
            let event = match parent {
                Some(parent) => {
                    let index = slots[parent.0 as usize]
                        .as_ref()
                        .expect("parent of a live node is live")
                        .children
                        .iter()
                        .position(|&child| child == node)
                        .expect("child link present for a live node");
                    TreeEvent::for_child(TreeEventKind::NodesChanged, parent, index, node)
                }
                None => TreeEvent::new(TreeEventKind::NodesChanged, node),
            };
            slots[node.0 as usize].as_mut().expect("checked above").content = content;
            event
        };
        self.notify(event);
    }

    /// The content of `node`, or `None` when it was removed.
    pub fn content(&self, node: NodeId) -> Option<NodeContent> {
        slot_ref(&self.slots.borrow(), node).map(|slot| slot.content.clone())
    }

    /// The parent of `node` (`None` for the root or removed nodes).
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        slot_ref(&self.slots.borrow(), node).and_then(|slot| slot.parent)
    }

    /// Number of currently registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn notify(&self, event: TreeEvent<NodeId>) {
        let snapshot = self.listeners.borrow().snapshot();
        for listener in snapshot {
            listener.tree_changed(&event);
        }
    }
}

fn slot_ref(slots: &[Option<Slot>], node: NodeId) -> Option<&Slot> {
    slots.get(node.0 as usize).and_then(Option::as_ref)
}

fn detach_subtree(slots: &mut [Option<Slot>], node: NodeId) {
    if let Some(slot) = slots[node.0 as usize].take() {
        for child in slot.children {
            detach_subtree(slots, child);
        }
    }
}

impl SourceTree for MemTree {
    type Node = NodeId;

    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn child_count(&self, node: NodeId) -> usize {
        slot_ref(&self.slots.borrow(), node).map_or(0, |slot| slot.children.len())
    }

    fn child_at(&self, node: NodeId, index: usize) -> Option<NodeId> {
        slot_ref(&self.slots.borrow(), node).and_then(|slot| slot.children.get(index).copied())
    }

    fn subscribe(&self, listener: Rc<dyn TreeViewListener<NodeId>>) -> SubscriptionId {
        self.listeners.borrow_mut().add(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.listeners.borrow_mut().remove(id);
    }

    /// Edits a node's display text in place. Change records have no single
    /// editable value and are left untouched.
    fn value_changed(&self, node: NodeId, new_value: &str) {
        let updated = match self.content(node) {
            Some(NodeContent::Label(_)) => NodeContent::Label(new_value.to_string()),
            Some(NodeContent::Text(_)) => NodeContent::Text(new_value.to_string()),
            Some(NodeContent::Change { .. }) | None => return,
        };
        self.set_content(node, updated);
    }
}

/// Extracts candidate paths from a [`MemTree`] node's content.
#[derive(Clone)]
pub struct ContentExtractor {
    tree: Rc<MemTree>,
}

impl ContentExtractor {
    pub fn new(tree: Rc<MemTree>) -> Self {
        Self { tree }
    }
}

impl PathExtractor<NodeId> for ContentExtractor {
    fn extract_paths(&self, node: NodeId) -> Vec<String> {
        self.tree
            .content(node)
            .map(|content| content.candidate_paths())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Recorder {
        events: RefCell<Vec<TreeEvent<NodeId>>>,
    }

    impl Recorder {
        fn new() -> Rc<Self> {
            Rc::new(Self {
                events: RefCell::new(Vec::new()),
            })
        }

        fn kinds(&self) -> Vec<TreeEventKind> {
            self.events.borrow().iter().map(|event| event.kind).collect()
        }
    }

    impl TreeViewListener<NodeId> for Recorder {
        fn tree_changed(&self, event: &TreeEvent<NodeId>) {
            self.events.borrow_mut().push(event.clone());
        }
    }

    fn change(path: &str) -> NodeContent {
        NodeContent::change(Some(path), Some(path))
    }

    #[test]
    fn children_keep_insertion_order() {
        let tree = MemTree::new("Changes");
        let root = tree.root();
        let a = tree.insert_child(root, change("a.cs"));
        let b = tree.insert_child(root, change("b.cs"));
        let c = tree.insert_child(root, change("c.cs"));

        assert_eq!(tree.child_count(root), 3);
        assert_eq!(tree.children(root), vec![a, b, c]);
        assert_eq!(tree.child_at(root, 1), Some(b));
        assert_eq!(tree.child_at(root, 3), None);
    }

    #[test]
    fn insert_notifies_with_parent_and_position() {
        let tree = MemTree::new("Changes");
        let recorder = Recorder::new();
        tree.subscribe(recorder.clone());

        let root = tree.root();
        let child = tree.insert_child(root, change("a.cs"));

        let events = recorder.events.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, TreeEventKind::NodesInserted);
        assert_eq!(events[0].node, root);
        assert_eq!(events[0].child_indices, vec![0]);
        assert_eq!(events[0].children, vec![child]);
    }

    #[test]
    fn remove_detaches_the_whole_subtree() {
        let tree = MemTree::new("Changes");
        let root = tree.root();
        let dir = tree.insert_child(root, NodeContent::Label("src".to_string()));
        let file = tree.insert_child(dir, change("src/a.cs"));
        let sibling = tree.insert_child(root, change("b.cs"));

        let recorder = Recorder::new();
        tree.subscribe(recorder.clone());
        tree.remove(dir);

        assert_eq!(recorder.kinds(), vec![TreeEventKind::NodesRemoved]);
        assert_eq!(tree.children(root), vec![sibling]);
        assert!(tree.content(dir).is_none());
        assert!(tree.content(file).is_none());
        assert_eq!(tree.child_count(dir), 0);
    }

    #[test]
    fn set_content_notifies_the_parent() {
        let tree = MemTree::new("Changes");
        let root = tree.root();
        let child = tree.insert_child(root, change("a.cs"));

        let recorder = Recorder::new();
        tree.subscribe(recorder.clone());
        tree.set_content(child, change("renamed.cs"));

        let events = recorder.events.borrow();
        assert_eq!(events[0].kind, TreeEventKind::NodesChanged);
        assert_eq!(events[0].node, root);
        assert_eq!(events[0].children, vec![child]);
        assert_eq!(tree.content(child), Some(change("renamed.cs")));
    }

    #[test]
    fn value_changed_edits_labels_only() {
        let tree = MemTree::new("Changes");
        let root = tree.root();
        let dir = tree.insert_child(root, NodeContent::Label("src".to_string()));
        let file = tree.insert_child(dir, change("src/a.cs"));

        tree.value_changed(dir, "source");
        assert_eq!(
            tree.content(dir),
            Some(NodeContent::Label("source".to_string()))
        );

        let recorder = Recorder::new();
        tree.subscribe(recorder.clone());
        tree.value_changed(file, "ignored");
        assert!(recorder.events.borrow().is_empty());
        assert_eq!(tree.content(file), Some(change("src/a.cs")));
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let tree = MemTree::new("Changes");
        let recorder = Recorder::new();
        let id = tree.subscribe(recorder.clone());
        assert_eq!(tree.listener_count(), 1);

        tree.unsubscribe(id);
        assert_eq!(tree.listener_count(), 0);
        tree.insert_child(tree.root(), change("a.cs"));
        assert!(recorder.events.borrow().is_empty());
    }

    #[test]
    fn content_extractor_reads_candidate_paths() {
        let tree = MemTree::new("Changes");
        let root = tree.root();
        let moved = tree.insert_child(
            root,
            NodeContent::change(Some("src/Old.cs"), Some("src/New.cs")),
        );

        let extractor = ContentExtractor::new(tree.clone());
        assert_eq!(
            extractor.extract_paths(moved),
            vec!["src/Old.cs", "src/New.cs"]
        );
        assert_eq!(extractor.extract_paths(root), vec!["Changes"]);
    }
}
