//! Data model: followers, their ordered maps, the follower set and the
//! field registry

pub mod fields;
pub mod follower;
pub mod follower_set;
pub mod ordered_map;

pub use fields::{Field, FieldValue};
pub use follower::{Aspects, Follower, Triggers};
pub use follower_set::FollowerSet;
pub use ordered_map::OrderedMap;
