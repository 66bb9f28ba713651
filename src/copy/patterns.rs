//! Glob-style exclusion patterns matched against page titles.
//!
//! Patterns support `*` (any run of characters) and `?` (exactly one
//! character); everything else is literal. Matching is case-insensitive and
//! anchored to the whole title, so `temp*` excludes "Temp Notes" but not
//! "My temp notes".

use regex::Regex;

/// A compiled title exclusion pattern.
#[derive(Debug, Clone)]
pub struct ExclusionPattern {
  raw: String,
  regex: Regex,
}

impl ExclusionPattern {
  /// Compile a glob-style pattern into a matcher.
  ///
  /// Every regex metacharacter in the input is escaped except the two
  /// wildcard tokens, so a title filter containing `.`, `(`, or `[` matches
  /// those characters literally. Compilation cannot fail: the translated
  /// pattern contains only escaped literals, `.*`, and `.`.
  pub fn compile(pattern: &str) -> Self {
    let mut translated = String::with_capacity(pattern.len() + 8);
    translated.push_str("(?i)^");
    for c in pattern.chars() {
      match c {
        '*' => translated.push_str(".*"),
        '?' => translated.push('.'),
        _ => translated.push_str(&regex::escape(&c.to_string())),
      }
    }
    translated.push('$');

    let regex = Regex::new(&translated).expect("escaped glob translation always compiles");

    Self {
      raw: pattern.to_string(),
      regex,
    }
  }

  /// Whether `title` matches this pattern.
  pub fn matches(&self, title: &str) -> bool {
    self.regex.is_match(title)
  }

  /// The original glob string this pattern was compiled from.
  pub fn as_str(&self) -> &str {
    &self.raw
  }
}

/// Whether `title` matches any pattern in the active set.
///
/// An empty set excludes nothing.
pub fn matches_any(title: &str, patterns: &[ExclusionPattern]) -> bool {
  patterns.iter().any(|p| p.matches(title))
}

/// Compile a comma-separated list of glob patterns, skipping empty entries.
pub fn parse_patterns(list: &str) -> Vec<ExclusionPattern> {
  list
    .split(',')
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(ExclusionPattern::compile)
    .collect()
}
