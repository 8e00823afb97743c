//! Glob filtering of discovered paths.
//!
//! Patterns are matched against the canonical POSIX relative path, so the
//! same pattern behaves identically on every platform. The filter runs after
//! discovery; it can only narrow the discovered set, never widen it.

use glob::{MatchOptions, Pattern};
use serde::{Deserialize, Serialize};

use crate::error::RepobundleError;
use crate::source::walker::DiscoveredEntry;
use crate::Result;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Configuration for file filtering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Glob patterns to include (if empty, include everything)
    #[serde(with = "patterns")]
    pub include: Vec<Pattern>,
    /// Glob patterns to exclude
    #[serde(with = "patterns")]
    pub exclude: Vec<Pattern>,
}

impl FilterConfig {
    /// Create a new empty filter config (matches every path).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an include pattern.
    pub fn include(mut self, pattern: &str) -> Result<Self> {
        self.include.push(compile(pattern)?);
        Ok(self)
    }

    /// Add an exclude pattern.
    pub fn exclude(mut self, pattern: &str) -> Result<Self> {
        self.exclude.push(compile(pattern)?);
        Ok(self)
    }

    /// Add multiple include patterns.
    pub fn include_many(mut self, patterns: &[&str]) -> Result<Self> {
        for pattern in patterns {
            self = self.include(pattern)?;
        }
        Ok(self)
    }

    /// Add multiple exclude patterns.
    pub fn exclude_many(mut self, patterns: &[&str]) -> Result<Self> {
        for pattern in patterns {
            self = self.exclude(pattern)?;
        }
        Ok(self)
    }

    /// Whether no patterns are configured.
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    /// Check if a relative path matches the filter criteria.
    ///
    /// A path matches if it matches at least one include pattern (or include
    /// is empty) and does not match any exclude pattern.
    pub fn matches(&self, relative_path: &str) -> bool {
        if self
            .exclude
            .iter()
            .any(|p| p.matches_with(relative_path, MATCH_OPTIONS))
        {
            return false;
        }

        self.include.is_empty()
            || self
                .include
                .iter()
                .any(|p| p.matches_with(relative_path, MATCH_OPTIONS))
    }

    /// Keep only the entries that match, preserving their order.
    pub fn apply(&self, entries: Vec<DiscoveredEntry>) -> Vec<DiscoveredEntry> {
        if self.is_empty() {
            return entries;
        }
        entries
            .into_iter()
            .filter(|e| self.matches(&e.relative_path))
            .collect()
    }
}

fn compile(pattern: &str) -> Result<Pattern> {
    Pattern::new(pattern).map_err(|e| RepobundleError::InvalidGlob {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

mod patterns {
    use glob::Pattern;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(patterns: &[Pattern], s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(patterns.iter().map(Pattern::as_str))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Pattern>, D::Error> {
        Vec::<String>::deserialize(d)?
            .iter()
            .map(|p| Pattern::new(p).map_err(D::Error::custom))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = FilterConfig::new();

        assert!(filter.is_empty());
        assert!(filter.matches("src/main.ts"));
        assert!(filter.matches("README.md"));
        assert!(filter.matches(".github/workflows/ci.yml"));
    }

    #[test]
    fn test_filter_with_include_pattern() {
        let filter = FilterConfig::new().include("src/**/*.ts").unwrap();

        assert!(filter.matches("src/main.ts"));
        assert!(filter.matches("src/utils/helper.ts"));
        assert!(!filter.matches("src/style.css"));
        assert!(!filter.matches("lib/main.ts"));
    }

    #[test]
    fn test_filter_with_exclude_pattern() {
        let filter = FilterConfig::new().exclude("**/fixtures/**").unwrap();

        assert!(filter.matches("src/main.ts"));
        assert!(!filter.matches("tests/fixtures/data.json"));
    }

    #[test]
    fn test_star_does_not_cross_directories() {
        let filter = FilterConfig::new().include("*.md").unwrap();

        assert!(filter.matches("README.md"));
        assert!(!filter.matches("docs/guide.md"));
    }

    #[test]
    fn test_filter_with_multiple_patterns() {
        let filter = FilterConfig::new()
            .include_many(&["src/**", "tests/**"])
            .unwrap()
            .exclude("**/generated/**")
            .unwrap();

        assert!(filter.matches("src/main.ts"));
        assert!(filter.matches("tests/a.test.ts"));
        assert!(!filter.matches("src/generated/api.ts"));
        assert!(!filter.matches("docs/index.md"));
    }

    #[test]
    fn test_apply_preserves_order() {
        let filter = FilterConfig::new().exclude("*.lock").unwrap();
        let entries = vec![
            DiscoveredEntry::new("a.ts"),
            DiscoveredEntry::new("b.lock"),
            DiscoveredEntry::new("c.ts"),
        ];

        let kept = filter.apply(entries);
        assert_eq!(
            kept,
            vec![DiscoveredEntry::new("a.ts"), DiscoveredEntry::new("c.ts")]
        );
    }

    #[test]
    fn test_invalid_glob_pattern() {
        let result = FilterConfig::new().include("[invalid");

        assert!(result.is_err());
        if let Err(RepobundleError::InvalidGlob { pattern, .. }) = result {
            assert_eq!(pattern, "[invalid");
        } else {
            panic!("Expected InvalidGlob error");
        }
    }

    #[test]
    fn test_serde_round_trip_keeps_patterns() {
        let filter = FilterConfig::new().include("src/**").unwrap();
        let json = serde_json::to_string(&filter).unwrap();
        assert_eq!(json, r#"{"include":["src/**"],"exclude":[]}"#);

        let back: FilterConfig = serde_json::from_str(&json).unwrap();
        assert!(back.matches("src/a.ts"));
        assert!(!back.matches("lib/a.ts"));
    }
}
