//! Reference graph traversal
//!
//! The graph is never materialized. Nodes are the followers of a
//! [`FollowerSet`](crate::model::FollowerSet), and every trigger
//! `id --[key]--> target` is an edge. Targets missing from the set are
//! dangling ends; cycles and self-loops are allowed.
//!
//! [`Walk`] produces a depth-first sequence of [`Visit`] events from a start
//! id. Renderers consume the events:
//!
//! - [`render_tree`]: indented text tree.
//! - [`layout()`]: box and edge positions for drawing.

pub mod layout;
pub mod tree;
pub mod walk;

pub use layout::{layout, Layout, PlacedEdge, PlacedNode, Point};
pub use tree::render_tree;
pub use walk::{EdgeTarget, Visit, Walk};
