//! Closed registry of follower fields
//!
//! Filtering, sorting and display code address follower fields by name.
//! Every name resolves to a [`Field`], and every field has a typed getter
//! ([`Follower::value`]) and a string setter ([`Follower::set`]).
//!
//! Names are the document keys (`id`, `label`, `aspects`, `description`,
//! `xtriggers`, `uniquenessgroup`, `animFrame`, `comments`, `decayto`,
//! `lifetime`, `icon`). Lookup ignores ASCII case, and `triggers` is
//! accepted for `xtriggers`.

use super::follower::{Aspects, Follower, Triggers};
use crate::building::{parse_aspects, parse_triggers, FieldPolicy};
use crate::error::FieldError;
use crate::matching::split_flat_block;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    Label,
    Aspects,
    Description,
    Triggers,
    UniquenessGroup,
    AnimFrame,
    Comments,
    DecayTo,
    Lifetime,
    Icon,
}

impl Field {
    /// All fields, in document order
    pub const ALL: [Field; 11] = [
        Field::Id,
        Field::Label,
        Field::Aspects,
        Field::Description,
        Field::Triggers,
        Field::UniquenessGroup,
        Field::AnimFrame,
        Field::Comments,
        Field::DecayTo,
        Field::Lifetime,
        Field::Icon,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Label => "label",
            Field::Aspects => "aspects",
            Field::Description => "description",
            Field::Triggers => "xtriggers",
            Field::UniquenessGroup => "uniquenessgroup",
            Field::AnimFrame => "animFrame",
            Field::Comments => "comments",
            Field::DecayTo => "decayto",
            Field::Lifetime => "lifetime",
            Field::Icon => "icon",
        }
    }

    /// Fields holding a flat map rather than a scalar
    pub fn is_map(self) -> bool {
        matches!(self, Field::Aspects | Field::Triggers)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = FieldError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        if name.eq_ignore_ascii_case("triggers") {
            return Ok(Field::Triggers);
        }
        Field::ALL
            .into_iter()
            .find(|field| field.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| FieldError::UnknownField(name.to_string()))
    }
}

/// A borrowed, typed view of one field of a follower
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Integer(i32),
    Aspects(&'a Aspects),
    Triggers(&'a Triggers),
}

impl FieldValue<'_> {
    /// Ordering used by sorting: integers numerically, everything else by
    /// rendered text.
    pub fn compare(&self, other: &FieldValue<'_>) -> Ordering {
        match (self, other) {
            (FieldValue::Integer(a), FieldValue::Integer(b)) => a.cmp(b),
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            _ => self.to_string().cmp(&other.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.is_empty(),
            FieldValue::Integer(_) => false,
            FieldValue::Aspects(map) => map.is_empty(),
            FieldValue::Triggers(map) => map.is_empty(),
        }
    }
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Integer(value) => write!(f, "{value}"),
            FieldValue::Aspects(map) => write_pairs(f, map.iter()),
            FieldValue::Triggers(map) => write_pairs(f, map.iter()),
        }
    }
}

fn write_pairs<'a, V: fmt::Display + 'a>(
    f: &mut fmt::Formatter<'_>,
    pairs: impl Iterator<Item = (&'a String, &'a V)>,
) -> fmt::Result {
    for (i, (key, value)) in pairs.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{key}: {value}")?;
    }
    Ok(())
}

impl Follower {
    /// Names of all fields, in document order
    pub fn list_fields() -> impl Iterator<Item = &'static str> {
        Field::ALL.into_iter().map(Field::name)
    }

    pub fn value(&self, field: Field) -> FieldValue<'_> {
        match field {
            Field::Id => FieldValue::Text(&self.id),
            Field::Label => FieldValue::Text(&self.label),
            Field::Aspects => FieldValue::Aspects(&self.aspects),
            Field::Description => FieldValue::Text(&self.description),
            Field::Triggers => FieldValue::Triggers(&self.triggers),
            Field::UniquenessGroup => FieldValue::Text(&self.uniqueness_group),
            Field::AnimFrame => FieldValue::Text(&self.anim_frame),
            Field::Comments => FieldValue::Text(&self.comments),
            Field::DecayTo => FieldValue::Text(&self.decay_to),
            Field::Lifetime => FieldValue::Integer(self.lifetime),
            Field::Icon => FieldValue::Text(&self.icon),
        }
    }

    /// Set a field from its string form.
    ///
    /// Map fields take the flat pair syntax of the document
    /// (`"key": value, ...`) and drop pairs that do not parse.
    pub fn set(&mut self, field: Field, value: &str) -> Result<(), FieldError> {
        match field {
            Field::Id => self.id = value.to_string(),
            Field::Label => self.label = value.to_string(),
            Field::Description => self.description = value.to_string(),
            Field::UniquenessGroup => self.uniqueness_group = value.to_string(),
            Field::AnimFrame => self.anim_frame = value.to_string(),
            Field::Comments => self.comments = value.to_string(),
            Field::DecayTo => self.decay_to = value.to_string(),
            Field::Icon => self.icon = value.to_string(),
            Field::Lifetime => {
                self.lifetime = value
                    .trim()
                    .parse()
                    .map_err(|_| FieldError::InvalidValue {
                        field,
                        value: value.to_string(),
                    })?;
            }
            Field::Aspects => {
                let entries = split_flat_block(value);
                self.aspects = parse_aspects(&self.id, entries, FieldPolicy::Lenient)
                    .unwrap_or_default();
            }
            Field::Triggers => {
                let entries = split_flat_block(value);
                self.triggers = parse_triggers(&self.id, entries, FieldPolicy::Lenient)
                    .unwrap_or_default();
            }
        }
        Ok(())
    }

    /// Render a field by name
    pub fn get_field(&self, name: &str) -> Result<String, FieldError> {
        let field: Field = name.parse()?;
        Ok(self.value(field).to_string())
    }

    /// Assign a field by name
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), FieldError> {
        let field: Field = name.parse()?;
        self.set(field, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Follower {
        Follower::new("f1", "Seed")
            .with_aspect("growth", 3)
            .with_aspect("heart", 7)
            .with_trigger("grow", "f2")
            .with_lifetime(12)
    }

    #[test]
    fn test_list_fields_in_document_order() {
        let names: Vec<_> = Follower::list_fields().collect();
        assert_eq!(names.first(), Some(&"id"));
        assert_eq!(names.last(), Some(&"icon"));
        assert_eq!(names.len(), 11);
    }

    #[test]
    fn test_get_field_renders_values() {
        let follower = sample();
        assert_eq!(follower.get_field("label").unwrap(), "Seed");
        assert_eq!(follower.get_field("lifetime").unwrap(), "12");
        assert_eq!(follower.get_field("aspects").unwrap(), "growth: 3, heart: 7");
        assert_eq!(follower.get_field("xtriggers").unwrap(), "grow: f2");
    }

    #[test]
    fn test_field_names_are_case_insensitive() {
        let follower = sample();
        assert_eq!(follower.get_field("LABEL").unwrap(), "Seed");
        assert_eq!(follower.get_field("Triggers").unwrap(), "grow: f2");
        assert_eq!("animframe".parse::<Field>().unwrap(), Field::AnimFrame);
    }

    #[test]
    fn test_unknown_field_is_an_error() {
        let follower = sample();
        assert_eq!(
            follower.get_field("colour"),
            Err(FieldError::UnknownField("colour".to_string()))
        );
    }

    #[test]
    fn test_set_lifetime_rejects_non_integer() {
        let mut follower = sample();
        let err = follower.set_field("lifetime", "forever").unwrap_err();
        assert!(matches!(err, FieldError::InvalidValue { field: Field::Lifetime, .. }));
        assert_eq!(follower.lifetime, 12);

        follower.set_field("lifetime", " 40 ").unwrap();
        assert_eq!(follower.lifetime, 40);
    }

    #[test]
    fn test_set_map_field_parses_pairs() {
        let mut follower = sample();
        follower
            .set_field("aspects", r#""lantern": 2, "moth": "x", "edge": 5"#)
            .unwrap();
        assert_eq!(follower.get_field("aspects").unwrap(), "lantern: 2, edge: 5");

        follower
            .set_field("triggers", r#""dawn": "f9", "dusk": """#)
            .unwrap();
        assert_eq!(follower.get_field("xtriggers").unwrap(), "dawn: f9");
    }

    #[test]
    fn test_compare_lifetime_numerically() {
        let a = FieldValue::Integer(9);
        let b = FieldValue::Integer(10);
        assert_eq!(a.compare(&b), Ordering::Less);
        assert_eq!(
            FieldValue::Text("9").compare(&FieldValue::Text("10")),
            Ordering::Greater
        );
    }
}
