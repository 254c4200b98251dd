//! Applying and clearing filters over one source tree.
//!
//! A session keeps the unfiltered source as the fallback: committing a
//! pattern swaps in a freshly constructed [`FilteredTreeView`] (one view
//! instance per pattern change), and committing a blank pattern drops the
//! view so callers fall back to querying the source directly.

use std::rc::Rc;

use crate::config::FilterConfig;
use crate::extract::PathExtractor;
use crate::pattern;
use crate::tree::SourceTree;
use crate::view::FilteredTreeView;

/// Owns the filter lifecycle for one source tree.
pub struct FilterSession<S, E>
where
    S: SourceTree,
    E: PathExtractor<S::Node> + Clone,
{
    source: Rc<S>,
    extractor: E,
    config: FilterConfig,
    view: Option<FilteredTreeView<S, E>>,
}

impl<S, E> FilterSession<S, E>
where
    S: SourceTree,
    E: PathExtractor<S::Node> + Clone,
    S::Node: 'static,
{
    /// Starts a session with no filter applied.
    pub fn new(source: Rc<S>, extractor: E) -> Self {
        Self {
            source,
            extractor,
            config: FilterConfig::default(),
            view: None,
        }
    }

    /// Starts a session and re-applies the pattern a previous session
    /// committed, if the config still has one enabled.
    pub fn with_config(source: Rc<S>, extractor: E, config: FilterConfig) -> Self {
        let mut session = Self::new(source, extractor);
        let restored = config.effective_pattern().to_string();
        session.config = config;
        if !restored.is_empty() {
            session.view = Some(FilteredTreeView::new(
                Rc::clone(&session.source),
                session.extractor.clone(),
                &restored,
            ));
        }
        session
    }

    /// Commits a pattern: records it in the config and swaps in a freshly
    /// constructed filtered view. A blank pattern restores the unfiltered
    /// source.
    pub fn apply(&mut self, raw_pattern: &str) {
        self.config.set_pattern(raw_pattern);
        if self.config.enabled {
            log::debug!("applying filter: {}", pattern::describe(&self.config.pattern));
            self.view = Some(FilteredTreeView::new(
                Rc::clone(&self.source),
                self.extractor.clone(),
                &self.config.pattern,
            ));
        } else {
            log::debug!("clearing filter");
            self.view = None;
        }
    }

    /// Clears the active filter, restoring the unfiltered source.
    pub fn clear(&mut self) {
        self.apply("");
    }

    /// The active filtered view, or `None` while no pattern is applied.
    pub fn view(&self) -> Option<&FilteredTreeView<S, E>> {
        self.view.as_ref()
    }

    /// True while a pattern is applied.
    pub fn is_filtered(&self) -> bool {
        self.view.is_some()
    }

    /// The session's configuration, which a host persists between sessions.
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// The underlying source tree.
    pub fn source(&self) -> &Rc<S> {
        &self.source
    }

    /// User-facing description of the active filter.
    pub fn describe(&self) -> String {
        pattern::describe(self.config.effective_pattern())
    }

    /// Single-path visibility check gated by the session's enabled flag.
    pub fn path_visible(&self, path: &str) -> bool {
        self.config.path_visible(path)
    }
}
