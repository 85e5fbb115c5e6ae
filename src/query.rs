//! Filtering and sorting of follower sets
//!
//! Both produce a new set and leave the source untouched.

use crate::error::FieldError;
use crate::model::{Field, Follower, FollowerSet};

/// Conjunction of per-field substring tests
///
/// A follower passes when, for every criterion, the rendered field value
/// contains the needle. Map fields named by a criterion must also be
/// non-empty, so an empty needle on `aspects` keeps only followers that
/// have aspects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    criteria: Vec<(Field, String)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: Field, needle: impl Into<String>) -> Self {
        self.criteria.push((field, needle.into()));
        self
    }

    /// Add a `field=needle` criterion
    pub fn with_criterion(self, criterion: &str) -> Result<Self, FieldError> {
        let (field, needle) = parse_criterion(criterion)?;
        Ok(self.with(field, needle))
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn matches(&self, follower: &Follower) -> bool {
        self.criteria.iter().all(|(field, needle)| {
            let value = follower.value(*field);
            if field.is_map() && value.is_empty() {
                return false;
            }
            needle.is_empty() || value.to_string().contains(needle.as_str())
        })
    }
}

/// Split `field=needle`; the needle keeps everything after the first `=`
pub fn parse_criterion(criterion: &str) -> Result<(Field, String), FieldError> {
    let (name, needle) = criterion
        .split_once('=')
        .ok_or_else(|| FieldError::InvalidCriterion(criterion.to_string()))?;
    let field = name.trim().parse()?;
    Ok((field, needle.trim().to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl FollowerSet {
    /// Followers passing `filter`, in their current order
    pub fn filter(&self, filter: &Filter) -> FollowerSet {
        self.iter()
            .filter(|follower| filter.matches(follower))
            .cloned()
            .collect()
    }

    /// Stable sort by one field; `lifetime` compares numerically
    pub fn sorted_by(&self, field: Field, order: SortOrder) -> FollowerSet {
        let mut followers = self.as_slice().to_vec();
        followers.sort_by(|a, b| {
            let ordering = a.value(field).compare(&b.value(field));
            match order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        });
        FollowerSet::from(followers)
    }
}
