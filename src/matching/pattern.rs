//! Regular-expression record matcher
//!
//! One expression recognizes a whole record block: required fields in fixed
//! order, then the optional trailing fields, then the closing brace. The map
//! blocks are captured as raw text and split afterwards by
//! [`split_flat_block`].
//!
//! Limitations: no escape handling. A quote or brace inside a string value
//! ends the capture early and the block usually stops matching.

use super::{FlatEntry, Matches, RawValue, RecordCaptures, RecordMatcher};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static RECORD_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#"\{\s*"id":\s*"([^"]*)","#,
        r#"\s*"label":\s*"([^"]*)","#,
        r#"\s*"aspects":\s*\{([^}]*)\},"#,
        r#"\s*"description":\s*"([^"]*)","#,
        r#"\s*"x?triggers":\s*\{([^}]*)\},"#,
        r#"\s*"uniquenessgroup":\s*"([^"]*)""#,
        r#"(?:,\s*"animFrame":\s*"([^"]*)")?"#,
        r#"(?:,\s*"comments":\s*"([^"]*)")?"#,
        r#"(?:,\s*"decayto":\s*"([^"]*)")?"#,
        r#"(?:,\s*"lifetime":\s*([+-]?\d+))?"#,
        r#"(?:,\s*"icon":\s*"([^"]*)")?"#,
        r#"\s*\}"#,
    ))
    .unwrap()
});

/// Matches record blocks with a single regular expression
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternMatcher;

impl RecordMatcher for PatternMatcher {
    fn name(&self) -> &str {
        "pattern"
    }

    fn matches<'src>(&self, source: &'src str) -> Matches<'src> {
        Box::new(RECORD_PATTERN.captures_iter(source).map(|caps| captures_to_record(&caps)))
    }
}

fn group(caps: &Captures<'_>, index: usize) -> Option<String> {
    caps.get(index).map(|m| m.as_str().to_string())
}

fn captures_to_record(caps: &Captures<'_>) -> RecordCaptures {
    let required = |index| group(caps, index).unwrap_or_default();
    RecordCaptures {
        id: required(1),
        label: required(2),
        aspects: split_flat_block(caps.get(3).map_or("", |m| m.as_str())),
        description: required(4),
        triggers: split_flat_block(caps.get(5).map_or("", |m| m.as_str())),
        uniqueness_group: required(6),
        anim_frame: group(caps, 7),
        comments: group(caps, 8),
        decay_to: group(caps, 9),
        lifetime: group(caps, 10),
        icon: group(caps, 11),
    }
}

/// Split the inside of a map block into entries.
///
/// The text is split on commas, and each piece on its first colon. Keys
/// lose surrounding whitespace and quotes; values lose surrounding
/// whitespace and are tagged quoted or bare. Whitespace-only pieces (left
/// by trailing commas) are skipped; pieces without a colon are malformed.
pub fn split_flat_block(block: &str) -> Vec<FlatEntry> {
    let block = block.trim_matches(|c: char| c == '{' || c == '}' || c.is_whitespace());
    block
        .split(',')
        .filter(|piece| !piece.trim().is_empty())
        .map(|piece| match piece.split_once(':') {
            Some((key, value)) => {
                let key = key.trim().trim_matches('"');
                let value = value.trim();
                let value = if value.starts_with('"') {
                    RawValue::Quoted(value.trim_matches('"').to_string())
                } else {
                    RawValue::Bare(value.to_string())
                };
                FlatEntry::pair(key, value)
            }
            None => FlatEntry::Malformed(piece.trim().to_string()),
        })
        .collect()
}
