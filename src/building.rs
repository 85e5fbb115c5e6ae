//! Record building
//!
//! Turns one [`RecordCaptures`] into one [`Follower`]. Required fields are
//! copied through, the two map blocks are parsed pair by pair, and the
//! optional fields fall back to their defaults (`""`, or `0` for
//! `lifetime`).
//!
//! What happens to values that do not parse is decided by the
//! [`FieldPolicy`]. Under the default lenient policy they are dropped and a
//! `debug!` line is logged; under the strict policy the first one becomes a
//! [`RecordError`].

use crate::error::RecordError;
use crate::matching::{FlatEntry, RawValue, RecordCaptures};
use crate::model::{Aspects, Follower, Triggers};
use serde::Deserialize;
use tracing::debug;

/// How unparsable field values are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldPolicy {
    /// Drop the offending pair (or default the lifetime) and carry on
    #[default]
    Lenient,
    /// Fail the record
    Strict,
}

impl FieldPolicy {
    /// Apply the policy to one rejected value
    fn reject(self, error: RecordError) -> Result<(), RecordError> {
        match self {
            FieldPolicy::Lenient => {
                debug!(%error, "dropping field value");
                Ok(())
            }
            FieldPolicy::Strict => Err(error),
        }
    }
}

impl std::str::FromStr for FieldPolicy {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "lenient" => Ok(FieldPolicy::Lenient),
            "strict" => Ok(FieldPolicy::Strict),
            other => Err(format!(
                "unknown field policy '{other}' (expected 'lenient' or 'strict')"
            )),
        }
    }
}

/// Builds followers from capture sets
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordBuilder {
    policy: FieldPolicy,
}

impl RecordBuilder {
    pub fn new(policy: FieldPolicy) -> Self {
        Self { policy }
    }

    pub fn build(&self, captures: RecordCaptures) -> Result<Follower, RecordError> {
        let RecordCaptures {
            id,
            label,
            aspects,
            description,
            triggers,
            uniqueness_group,
            anim_frame,
            comments,
            decay_to,
            lifetime,
            icon,
        } = captures;

        let aspects = parse_aspects(&id, aspects, self.policy)?;
        let triggers = parse_triggers(&id, triggers, self.policy)?;
        let lifetime = parse_lifetime(&id, lifetime, self.policy)?;

        Ok(Follower {
            id,
            label,
            aspects,
            description,
            triggers,
            uniqueness_group,
            anim_frame: anim_frame.unwrap_or_default(),
            comments: comments.unwrap_or_default(),
            decay_to: decay_to.unwrap_or_default(),
            lifetime,
            icon: icon.unwrap_or_default(),
        })
    }
}

/// Parse the entries of an `aspects` block.
///
/// Only bare integer values are kept; a quoted value such as `"x"` is
/// rejected even when its text would parse.
pub fn parse_aspects(
    record: &str,
    entries: Vec<FlatEntry>,
    policy: FieldPolicy,
) -> Result<Aspects, RecordError> {
    let mut aspects = Aspects::new();
    for entry in entries {
        match entry {
            FlatEntry::Pair { key, value } => match aspect_level(&value) {
                Some(level) => {
                    aspects.insert(key, level);
                }
                None => policy.reject(RecordError::InvalidAspect {
                    record: record.to_string(),
                    key,
                    value: value.to_string(),
                })?,
            },
            FlatEntry::Malformed(text) => policy.reject(RecordError::MalformedEntry {
                record: record.to_string(),
                block: "aspects",
                text,
            })?,
        }
    }
    Ok(aspects)
}

fn aspect_level(value: &RawValue) -> Option<i32> {
    match value {
        RawValue::Bare(text) => text.trim().parse().ok(),
        RawValue::Quoted(_) => None,
    }
}

/// Parse the entries of an `xtriggers` block.
///
/// Both sides are kept as text; pairs with an empty key or target are
/// rejected.
pub fn parse_triggers(
    record: &str,
    entries: Vec<FlatEntry>,
    policy: FieldPolicy,
) -> Result<Triggers, RecordError> {
    let mut triggers = Triggers::new();
    for entry in entries {
        match entry {
            FlatEntry::Pair { key, value } => {
                let target = value.text().trim().to_string();
                if key.trim().is_empty() || target.is_empty() {
                    policy.reject(RecordError::EmptyTrigger {
                        record: record.to_string(),
                        key,
                        target,
                    })?;
                } else {
                    triggers.insert(key, target);
                }
            }
            FlatEntry::Malformed(text) => policy.reject(RecordError::MalformedEntry {
                record: record.to_string(),
                block: "xtriggers",
                text,
            })?,
        }
    }
    Ok(triggers)
}

fn parse_lifetime(
    record: &str,
    lifetime: Option<String>,
    policy: FieldPolicy,
) -> Result<i32, RecordError> {
    let Some(text) = lifetime else {
        return Ok(0);
    };
    match text.trim().parse() {
        Ok(value) => Ok(value),
        Err(_) => {
            policy.reject(RecordError::InvalidLifetime {
                record: record.to_string(),
                value: text,
            })?;
            Ok(0)
        }
    }
}
