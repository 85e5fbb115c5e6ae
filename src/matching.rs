//! Record matching
//!
//! A matcher scans a whole document and yields one [`RecordCaptures`] per
//! record-shaped block, in document order, in a single pass. Blocks missing
//! a required field are not matched at all; nothing is reported for them.
//!
//! Two matchers are available:
//!
//! - [`PatternMatcher`]: one regular expression over the raw text. It has no
//!   escape handling, so quotes or braces inside string values corrupt the
//!   match.
//! - [`GrammarMatcher`]: a logos token stream parsed with chumsky
//!   combinators. Strings may contain escaped quotes, and commas or colons
//!   inside strings are not mistaken for separators.
//!
//! Both produce the same capture shape, so the record builder does not care
//! which one ran.

pub mod grammar;
pub mod pattern;

pub use grammar::GrammarMatcher;
pub use pattern::{split_flat_block, PatternMatcher};

use serde::Deserialize;
use std::fmt;
use std::sync::Arc;

/// Value side of a flat-map pair, tagged with how it was written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// Written inside quotes; the quotes are already stripped
    Quoted(String),
    /// Written bare (numbers, words)
    Bare(String),
}

impl RawValue {
    pub fn text(&self) -> &str {
        match self {
            RawValue::Quoted(text) | RawValue::Bare(text) => text,
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Quoted(text) => write!(f, "\"{text}\""),
            RawValue::Bare(text) => f.write_str(text),
        }
    }
}

/// One comma-separated piece of an `aspects` or `xtriggers` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlatEntry {
    Pair { key: String, value: RawValue },
    /// A piece that is not a `key: value` pair, kept as text for diagnostics
    Malformed(String),
}

impl FlatEntry {
    pub fn pair(key: impl Into<String>, value: RawValue) -> Self {
        FlatEntry::Pair {
            key: key.into(),
            value,
        }
    }
}

/// Capture set for one matched record block
///
/// Optional fields are `None` when the block did not carry them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordCaptures {
    pub id: String,
    pub label: String,
    pub aspects: Vec<FlatEntry>,
    pub description: String,
    pub triggers: Vec<FlatEntry>,
    pub uniqueness_group: String,
    pub anim_frame: Option<String>,
    pub comments: Option<String>,
    pub decay_to: Option<String>,
    pub lifetime: Option<String>,
    pub icon: Option<String>,
}

/// Iterator of record captures borrowed from a source document
pub type Matches<'src> = Box<dyn Iterator<Item = RecordCaptures> + Send + 'src>;

/// A strategy for finding record blocks in a document
pub trait RecordMatcher: Send + Sync {
    /// Short name used in configuration and logs
    fn name(&self) -> &str;

    /// Lazily scan `source` for record blocks
    fn matches<'src>(&self, source: &'src str) -> Matches<'src>;
}

/// Matcher selection, as written in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatcherKind {
    Pattern,
    #[default]
    Grammar,
}

impl MatcherKind {
    pub fn matcher(self) -> Arc<dyn RecordMatcher> {
        match self {
            MatcherKind::Pattern => Arc::new(PatternMatcher),
            MatcherKind::Grammar => Arc::new(GrammarMatcher),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MatcherKind::Pattern => "pattern",
            MatcherKind::Grammar => "grammar",
        }
    }
}

impl std::str::FromStr for MatcherKind {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "pattern" => Ok(MatcherKind::Pattern),
            "grammar" => Ok(MatcherKind::Grammar),
            other => Err(format!(
                "unknown matcher '{other}' (expected 'pattern' or 'grammar')"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const SEED: &str = r#"{"id":"f1","label":"Seed","aspects":{"growth":3},"description":"d","xtriggers":{"grow":"f2"},"uniquenessgroup":"g"}"#;

    #[rstest(kind => [MatcherKind::Pattern, MatcherKind::Grammar])]
    fn test_both_matchers_capture_the_seed_block(kind: MatcherKind) {
        let captures: Vec<_> = kind.matcher().matches(SEED).collect();
        assert_eq!(captures.len(), 1);

        let seed = &captures[0];
        assert_eq!(seed.id, "f1");
        assert_eq!(seed.label, "Seed");
        assert_eq!(
            seed.aspects,
            vec![FlatEntry::pair("growth", RawValue::Bare("3".into()))]
        );
        assert_eq!(
            seed.triggers,
            vec![FlatEntry::pair("grow", RawValue::Quoted("f2".into()))]
        );
        assert_eq!(seed.uniqueness_group, "g");
        assert_eq!(seed.lifetime, None);
        assert_eq!(seed.icon, None);
    }

    #[rstest(kind => [MatcherKind::Pattern, MatcherKind::Grammar])]
    fn test_missing_required_field_is_not_matched(kind: MatcherKind) {
        let source = r#"{"id":"f1","label":"Seed","aspects":{"growth":3},"xtriggers":{},"uniquenessgroup":"g"}"#;
        assert_eq!(kind.matcher().matches(source).count(), 0);
    }

    #[rstest(kind => [MatcherKind::Pattern, MatcherKind::Grammar])]
    fn test_optional_fields_are_captured(kind: MatcherKind) {
        let source = r#"{"id":"f1","label":"Seed","aspects":{},"description":"d","xtriggers":{},"uniquenessgroup":"g","comments":"c","lifetime":12,"icon":"seed.png"}"#;
        let captures: Vec<_> = kind.matcher().matches(source).collect();
        assert_eq!(captures.len(), 1);
        assert_eq!(captures[0].anim_frame, None);
        assert_eq!(captures[0].comments.as_deref(), Some("c"));
        assert_eq!(captures[0].decay_to, None);
        assert_eq!(captures[0].lifetime.as_deref(), Some("12"));
        assert_eq!(captures[0].icon.as_deref(), Some("seed.png"));
    }

    #[rstest(kind => [MatcherKind::Pattern, MatcherKind::Grammar])]
    fn test_explicit_signs_read_the_same(kind: MatcherKind) {
        let source = r#"{"id":"f1","label":"Seed","aspects":{"a": +3, "b": -2},"description":"","xtriggers":{},"uniquenessgroup":"","lifetime": +5}"#;
        let captures = kind.matcher().matches(source).next().unwrap();
        let follower = crate::building::RecordBuilder::default().build(captures).unwrap();
        let aspects: Vec<_> = follower.aspects.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        assert_eq!(aspects, vec![("a", 3), ("b", -2)]);
        assert_eq!(follower.lifetime, 5);
    }

    #[test]
    fn test_matcher_kind_from_str() {
        assert_eq!("pattern".parse::<MatcherKind>(), Ok(MatcherKind::Pattern));
        assert_eq!("grammar".parse::<MatcherKind>(), Ok(MatcherKind::Grammar));
        assert!("regex".parse::<MatcherKind>().is_err());
        assert_eq!(MatcherKind::default(), MatcherKind::Grammar);
    }
}
