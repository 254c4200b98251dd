//! Wildcard filtering for hierarchical change views.
//!
//! This crate provides a filtered, read-only projection over a mutable tree
//! of nodes (files and directories within a changeset). A node is visible if
//! it, or any of its descendants, matches a user-supplied wildcard pattern
//! set such as `Shop*.*;*.cs;*.json`.
//!
//! Core pieces:
//! - Pattern specification parsing and matching (`*`/`?` wildcards,
//!   semicolon-separated, case-insensitive, blank means "match everything")
//! - A lazy, memoized filtering view over any [`SourceTree`], with wholesale
//!   cache invalidation driven by the source's change notifications
//! - An in-memory source tree implementation for hosts without a native
//!   tree model
//!
//! The engine is single-threaded by design: queries, cache updates, and
//! notification dispatch all run on one logical thread and never suspend.

pub mod config;
pub mod event;
pub mod extract;
pub mod mem;
pub mod pattern;
pub mod session;
pub mod tree;
pub mod view;

// Re-export main types
pub use config::FilterConfig;
pub use event::{ListenerSet, SubscriptionId, TreeEvent, TreeEventKind, TreeViewListener};
pub use extract::{NodeContent, PathExtractor};
pub use mem::{ContentExtractor, MemTree, NodeId};
pub use pattern::{describe, matches, PatternSpec};
pub use session::FilterSession;
pub use tree::SourceTree;
pub use view::FilteredTreeView;
