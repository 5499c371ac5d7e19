//! Process-name filtering.

use regex::Regex;

/// Compiled process-name filter.
///
/// Matching is regex *search*: a name is included when any pattern matches
/// anywhere in it, so a plain-text pattern behaves as substring containment
/// while an anchored pattern (`^foo$`) selects an exact name. Matching is
/// case-sensitive. An empty pattern set includes every process.
#[derive(Debug, Clone, Default)]
pub struct NameFilter {
    patterns: Vec<Regex>,
}

impl NameFilter {
    /// Compiles the pattern set. Invalid patterns are rejected here, once,
    /// rather than on every match.
    pub fn new(patterns: &[String]) -> Result<Self, regex::Error> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// A filter that includes every process.
    pub fn match_all() -> Self {
        Self::default()
    }

    pub fn matches(&self, name: &str) -> bool {
        self.patterns.is_empty() || self.patterns.iter().any(|p| p.is_match(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(patterns: &[&str]) -> NameFilter {
        let patterns: Vec<String> = patterns.iter().map(|s| s.to_string()).collect();
        NameFilter::new(&patterns).unwrap()
    }

    #[test]
    fn empty_pattern_set_matches_everything() {
        let f = NameFilter::match_all();
        assert!(f.matches("foo"));
        assert!(f.matches(""));
        assert!(f.matches("Web Content"));
    }

    #[test]
    fn plain_pattern_is_substring_containment() {
        let f = filter(&["fo"]);
        assert!(f.matches("foo"));
        assert!(f.matches("barfoo"));
        assert!(!f.matches("bar"));
    }

    #[test]
    fn anchored_pattern_is_exact_match() {
        let f = filter(&["^foo$"]);
        assert!(f.matches("foo"));
        assert!(!f.matches("barfoo"));
        assert!(!f.matches("foobar"));
    }

    #[test]
    fn any_pattern_suffices() {
        let f = filter(&["^systemd$", "bash"]);
        assert!(f.matches("systemd"));
        assert!(f.matches("bash"));
        assert!(f.matches("rbash"));
        assert!(!f.matches("cat"));
    }

    #[test]
    fn matching_is_case_sensitive() {
        let f = filter(&["bash"]);
        assert!(!f.matches("Bash"));
    }

    #[test]
    fn invalid_pattern_is_rejected_at_construction() {
        assert!(NameFilter::new(&["(".to_string()]).is_err());
    }
}
