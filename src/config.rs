//! Filter configuration carried between sessions.

use serde::{Deserialize, Serialize};

use crate::pattern;

/// The last-committed filter pattern and whether filtering is active.
///
/// Hosts persist this through their own settings mechanism; the engine only
/// ever receives it as an explicitly passed value, never through a global.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Raw pattern specification as last committed.
    #[serde(default)]
    pub pattern: String,
    /// Whether the pattern should be applied.
    #[serde(default)]
    pub enabled: bool,
}

impl FilterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a committed pattern. Committing a blank pattern disables
    /// filtering.
    pub fn set_pattern(&mut self, raw: &str) {
        let trimmed = raw.trim();
        self.pattern = trimmed.to_string();
        self.enabled = !trimmed.is_empty();
    }

    /// Disables filtering and forgets the stored pattern.
    pub fn clear(&mut self) {
        self.pattern.clear();
        self.enabled = false;
    }

    /// The pattern to apply right now: blank while filtering is disabled.
    pub fn effective_pattern(&self) -> &str {
        if self.enabled {
            &self.pattern
        } else {
            ""
        }
    }

    /// Tests a single path against the configured pattern, honoring the
    /// enabled flag. A disabled filter shows every path.
    pub fn path_visible(&self, path: &str) -> bool {
        !self.enabled || pattern::matches(path, &self.pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn committing_a_pattern_enables_filtering() {
        let mut config = FilterConfig::new();
        assert!(!config.enabled);

        config.set_pattern("  *.cs ");
        assert_eq!(config.pattern, "*.cs");
        assert!(config.enabled);
        assert_eq!(config.effective_pattern(), "*.cs");
    }

    #[test]
    fn committing_a_blank_pattern_disables_filtering() {
        let mut config = FilterConfig::new();
        config.set_pattern("*.cs");
        config.set_pattern("   ");
        assert!(!config.enabled);
        assert_eq!(config.pattern, "");
        assert_eq!(config.effective_pattern(), "");
    }

    #[test]
    fn clear_resets_both_fields() {
        let mut config = FilterConfig::new();
        config.set_pattern("*.cs");
        config.clear();
        assert_eq!(config, FilterConfig::default());
    }

    #[test]
    fn path_visibility_is_gated_by_the_enabled_flag() {
        let mut config = FilterConfig::new();
        assert!(config.path_visible("anything.md"));

        config.set_pattern("*.cs");
        assert!(config.path_visible("Shop.cs"));
        assert!(!config.path_visible("readme.md"));

        config.enabled = false;
        assert!(config.path_visible("readme.md"));
    }

    #[test]
    fn round_trips_through_serde() {
        let mut config = FilterConfig::new();
        config.set_pattern("*.cs;*.json");

        let json = serde_json::to_string(&config).unwrap();
        let restored: FilterConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let restored: FilterConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(restored, FilterConfig::default());
    }
}
