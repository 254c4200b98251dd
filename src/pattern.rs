//! Pattern specifications: semicolon-separated wildcard sub-patterns.
//!
//! A specification like `Shop*.*;*.cs;*.json` is split on `;`, trimmed, and
//! compiled into sub-patterns. A path matches the specification when any
//! sub-pattern matches it; a blank specification matches everything.

mod glob;

pub use glob::GlobPattern;

/// A parsed pattern specification.
///
/// Sub-patterns compile once at parse time and are reused for the lifetime
/// of the specification.
#[derive(Debug, Clone)]
pub struct PatternSpec {
    raw: String,
    globs: Vec<GlobPattern>,
}

impl PatternSpec {
    /// Parses a raw specification string.
    ///
    /// The string is split on `;`; each part is trimmed and empty parts are
    /// discarded. Blank input (or input that trims away to nothing) yields a
    /// specification that matches every path.
    pub fn parse(raw: &str) -> Self {
        let globs = raw
            .split(';')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(GlobPattern::new)
            .collect();
        Self {
            raw: raw.to_string(),
            globs,
        }
    }

    /// The specification as originally written.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The compiled sub-patterns, in specification order.
    pub fn sub_patterns(&self) -> &[GlobPattern] {
        &self.globs
    }

    /// True when the specification places no restriction on paths.
    pub fn matches_everything(&self) -> bool {
        self.globs.is_empty()
    }

    /// Tests a path-like string against the specification.
    ///
    /// Each sub-pattern is tried against both the final path segment and the
    /// full path with separators normalized to `/`, so `*.cs` works on file
    /// names while `src/*.cs` still sees the whole path.
    pub fn matches(&self, path: &str) -> bool {
        if self.globs.is_empty() {
            return true;
        }
        let normalized = path.replace('\\', "/");
        let file_name = match normalized.rsplit_once('/') {
            Some((_, name)) => name,
            None => normalized.as_str(),
        };
        self.globs
            .iter()
            .any(|glob| glob.matches(file_name) || glob.matches(&normalized))
    }

    /// A user-facing description of the specification.
    pub fn describe(&self) -> String {
        if self.globs.is_empty() {
            return "All files".to_string();
        }
        let parts: Vec<&str> = self.globs.iter().map(GlobPattern::raw).collect();
        format!("Files matching: {}", parts.join(", "))
    }
}

/// Tests a path against a raw specification in one shot.
///
/// Parses per call; callers matching many paths against one specification
/// should hold a [`PatternSpec`] instead.
pub fn matches(path: &str, raw_spec: &str) -> bool {
    PatternSpec::parse(raw_spec).matches(path)
}

/// Describes a raw specification in one shot.
pub fn describe(raw_spec: &str) -> String {
    PatternSpec::parse(raw_spec).describe()
}
