//! Ordered collection of followers
//!
//! The set is the unit of ingestion and serialization. It preserves
//! insertion order and does not enforce unique ids: lookups return the first
//! follower carrying the id.

use super::follower::Follower;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FollowerSet {
    #[serde(rename = "elements")]
    followers: Vec<Follower>,
}

impl FollowerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a follower at the end of the set
    pub fn push(&mut self, follower: Follower) {
        self.followers.push(follower);
    }

    /// First follower whose id equals `id`
    pub fn find(&self, id: &str) -> Option<&Follower> {
        self.followers.iter().find(|follower| follower.id == id)
    }

    pub fn len(&self) -> usize {
        self.followers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.followers.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Follower> {
        self.followers.iter()
    }

    pub fn as_slice(&self) -> &[Follower] {
        &self.followers
    }
}

impl From<Vec<Follower>> for FollowerSet {
    fn from(followers: Vec<Follower>) -> Self {
        Self { followers }
    }
}

impl FromIterator<Follower> for FollowerSet {
    fn from_iter<I: IntoIterator<Item = Follower>>(iter: I) -> Self {
        Self {
            followers: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for FollowerSet {
    type Item = Follower;
    type IntoIter = std::vec::IntoIter<Follower>;

    fn into_iter(self) -> Self::IntoIter {
        self.followers.into_iter()
    }
}

impl<'a> IntoIterator for &'a FollowerSet {
    type Item = &'a Follower;
    type IntoIter = std::slice::Iter<'a, Follower>;

    fn into_iter(self) -> Self::IntoIter {
        self.followers.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_returns_first_match() {
        let set: FollowerSet = vec![
            Follower::new("twin", "First"),
            Follower::new("other", "Other"),
            Follower::new("twin", "Second"),
        ]
        .into();

        assert_eq!(set.find("twin").map(|f| f.label.as_str()), Some("First"));
    }

    #[test]
    fn test_find_missing_id() {
        let set: FollowerSet = vec![Follower::new("a", "A")].into();
        assert!(set.find("b").is_none());
        assert!(FollowerSet::new().find("a").is_none());
    }

    #[test]
    fn test_push_preserves_order() {
        let mut set = FollowerSet::new();
        set.push(Follower::new("c", "C"));
        set.push(Follower::new("a", "A"));
        let ids: Vec<_> = set.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);
        assert_eq!(set.len(), 2);
    }
}
