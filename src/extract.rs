//! Path extraction: deriving filterable strings from opaque nodes.
//!
//! What a tree node "is" differs per host: a change record with before and
//! after revisions, a directory label, a plain caption. That dispatch lives
//! entirely here, behind a one-method collaborator trait: the filtering view
//! only ever sees path strings.

/// What a tree node represents, as seen by the path extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeContent {
    /// A changed file, with the revision paths that exist for it. A created
    /// file has no `before`; a deleted file has no `after`.
    Change {
        before: Option<String>,
        after: Option<String>,
    },
    /// A grouping label such as a directory name or module header.
    Label(String),
    /// Anything else, carried as its display text.
    Text(String),
}

impl NodeContent {
    /// A change record from whichever revision paths exist.
    pub fn change(before: Option<&str>, after: Option<&str>) -> Self {
        Self::Change {
            before: before.map(str::to_string),
            after: after.map(str::to_string),
        }
    }

    /// The path-like strings worth testing against a filter pattern.
    /// Blank strings are dropped.
    pub fn candidate_paths(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            Self::Change { before, after } => [before.as_deref(), after.as_deref()]
                .into_iter()
                .flatten()
                .collect(),
            Self::Label(label) => vec![label.as_str()],
            Self::Text(text) => vec![text.as_str()],
        };
        raw.into_iter()
            .filter(|candidate| !candidate.trim().is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Derives zero or more path-like strings from a node for pattern matching.
///
/// Implementations are pure reads: extraction must not mutate the tree the
/// node came from.
pub trait PathExtractor<N> {
    fn extract_paths(&self, node: N) -> Vec<String>;
}

/// Any `Fn(node) -> Vec<String>` closure is an extractor, so hosts can adapt
/// their own node types without a newtype.
impl<N, F> PathExtractor<N> for F
where
    F: Fn(N) -> Vec<String>,
{
    fn extract_paths(&self, node: N) -> Vec<String> {
        self(node)
    }
}
