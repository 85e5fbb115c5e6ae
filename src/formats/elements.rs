//! The `elements` document layout
//!
//! One key per line, no indentation, and a trailing comma after every map
//! entry:
//!
//! ```text
//! { "elements": [
//! {
//! "id": "f1",
//! "label": "Seed",
//! "aspects": {
//! "growth": 3,
//! },
//! ...
//! "icon": ""
//! }
//! ]}
//! ```
//!
//! All optional fields are always written. The output is not strict JSON
//! but both matchers read it back. Quotes and backslashes inside strings
//! are escaped with a backslash.

use super::Formatter;
use crate::error::FormatError;
use crate::model::{Follower, FollowerSet};
use std::borrow::Cow;
use std::fmt::Write;

pub struct ElementsFormat;

impl Formatter for ElementsFormat {
    fn name(&self) -> &str {
        "elements"
    }

    fn description(&self) -> &str {
        "Line-oriented follower document (default)"
    }

    fn serialize(&self, set: &FollowerSet) -> Result<String, FormatError> {
        let mut out = String::new();
        write_document(&mut out, set)
            .map_err(|err| FormatError::SerializationError(err.to_string()))?;
        Ok(out)
    }
}

fn write_document(out: &mut String, set: &FollowerSet) -> std::fmt::Result {
    writeln!(out, "{{ \"elements\": [")?;
    let last = set.len().saturating_sub(1);
    for (index, follower) in set.iter().enumerate() {
        write_follower(out, follower)?;
        writeln!(out, "{}", if index == last { "}" } else { "}," })?;
    }
    writeln!(out, "]}}")
}

fn write_follower(out: &mut String, follower: &Follower) -> std::fmt::Result {
    writeln!(out, "{{")?;
    writeln!(out, "\"id\": \"{}\",", escape(&follower.id))?;
    writeln!(out, "\"label\": \"{}\",", escape(&follower.label))?;

    writeln!(out, "\"aspects\": {{")?;
    for (name, level) in follower.aspects.iter() {
        writeln!(out, "\"{}\": {},", escape(name), level)?;
    }
    writeln!(out, "}},")?;

    writeln!(out, "\"description\": \"{}\",", escape(&follower.description))?;

    writeln!(out, "\"xtriggers\": {{")?;
    for (name, target) in follower.triggers.iter() {
        writeln!(out, "\"{}\": \"{}\",", escape(name), escape(target))?;
    }
    writeln!(out, "}},")?;

    writeln!(out, "\"uniquenessgroup\": \"{}\",", escape(&follower.uniqueness_group))?;
    writeln!(out, "\"animFrame\": \"{}\",", escape(&follower.anim_frame))?;
    writeln!(out, "\"comments\": \"{}\",", escape(&follower.comments))?;
    writeln!(out, "\"decayto\": \"{}\",", escape(&follower.decay_to))?;
    writeln!(out, "\"lifetime\": {},", follower.lifetime)?;
    writeln!(out, "\"icon\": \"{}\"", escape(&follower.icon))
}

fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['"', '\\']) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 2);
    for c in text.chars() {
        if matches!(c, '"' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    Cow::Owned(escaped)
}
