//! Single wildcard sub-pattern compilation and matching.

use regex::{Regex, RegexBuilder};

/// A compiled wildcard sub-pattern.
///
/// `*` matches any run of characters (including none), `?` matches exactly
/// one character, everything else matches literally. Matching is anchored at
/// both ends and case-insensitive.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    raw: String,
    matcher: Matcher,
}

#[derive(Debug, Clone)]
enum Matcher {
    /// Anchored, case-insensitive regex translated from the wildcard.
    Anchored(Regex),
    /// Case-insensitive containment of the pattern with `*` stripped.
    /// Matching degrades to this when translation fails; it never errors.
    Contains(String),
}

impl GlobPattern {
    /// Compiles a wildcard sub-pattern.
    ///
    /// Never fails: a pattern the regex engine rejects degrades to substring
    /// containment, so a malformed pattern is at worst too permissive.
    pub fn new(raw: &str) -> Self {
        let matcher = match translate(raw) {
            Ok(regex) => Matcher::Anchored(regex),
            Err(error) => {
                log::warn!("wildcard {raw:?} did not compile ({error}); degrading to substring match");
                Matcher::Contains(raw.replace('*', "").to_lowercase())
            }
        };
        Self {
            raw: raw.to_string(),
            matcher,
        }
    }

    /// The sub-pattern as written.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Tests a candidate string against this sub-pattern.
    pub fn matches(&self, candidate: &str) -> bool {
        match &self.matcher {
            Matcher::Anchored(regex) => regex.is_match(candidate),
            Matcher::Contains(needle) => candidate.to_lowercase().contains(needle),
        }
    }
}

/// Translates a wildcard into an anchored regular expression and compiles it
/// case-insensitively. Literal runs are escaped, so regex metacharacters in
/// the pattern match themselves.
fn translate(pattern: &str) -> Result<Regex, regex::Error> {
    let mut source = String::with_capacity(pattern.len() + 4);
    let mut literal = String::new();
    source.push('^');
    for c in pattern.chars() {
        match c {
            '*' | '?' => {
                if !literal.is_empty() {
                    source.push_str(&regex::escape(&literal));
                    literal.clear();
                }
                source.push_str(if c == '*' { ".*" } else { "." });
            }
            other => literal.push(other),
        }
    }
    if !literal.is_empty() {
        source.push_str(&regex::escape(&literal));
    }
    source.push('$');
    RegexBuilder::new(&source).case_insensitive(true).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a sub-pattern forced onto the degraded containment path.
    fn degraded(raw: &str) -> GlobPattern {
        GlobPattern {
            raw: raw.to_string(),
            matcher: Matcher::Contains(raw.replace('*', "").to_lowercase()),
        }
    }

    #[test]
    fn star_matches_any_run_of_characters() {
        let glob = GlobPattern::new("*.cs");
        assert!(glob.matches("Shop.cs"));
        assert!(glob.matches(".cs"));
        assert!(!glob.matches("Shop.json"));
    }

    #[test]
    fn matching_is_anchored_at_both_ends() {
        let glob = GlobPattern::new("Shop");
        assert!(glob.matches("Shop"));
        assert!(!glob.matches("Shop.cs"));
        assert!(!glob.matches("MyShop"));
    }

    #[test]
    fn question_mark_matches_exactly_one_character() {
        let glob = GlobPattern::new("Sho?.cs");
        assert!(glob.matches("Shop.cs"));
        assert!(!glob.matches("Sho.cs"));
        assert!(!glob.matches("Shoop.cs"));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let glob = GlobPattern::new("*.CS");
        assert!(glob.matches("shop.cs"));
        assert!(glob.matches("SHOP.CS"));
    }

    #[test]
    fn regex_metacharacters_match_literally() {
        let glob = GlobPattern::new("file(1)+x.txt");
        assert!(glob.matches("file(1)+x.txt"));
        assert!(!glob.matches("file1+x.txt"));

        // `.` in the pattern is a literal dot, not "any character".
        let glob = GlobPattern::new("a.b");
        assert!(!glob.matches("axb"));
    }

    #[test]
    fn infix_wildcards_compose() {
        let glob = GlobPattern::new("Shop*Builder.cs");
        assert!(glob.matches("ShopBuilder.cs"));
        assert!(glob.matches("ShopCartBuilder.cs"));
        assert!(!glob.matches("Builder.cs"));
    }

    #[test]
    fn degraded_matcher_uses_substring_containment() {
        let glob = degraded("Shop*.cs");
        assert!(glob.matches("myshop.csv"));
        assert!(glob.matches("SHOP.CS"));
        assert!(!glob.matches("readme.md"));
    }
}
