//! Box layout for drawing the reference tree
//!
//! Positions are computed from the walk, independent of any renderer. The
//! start node sits at the origin. Children of a node start one box height
//! plus `level_offset` below it, shifted right by `horizontal_offset`.
//! Every trigger moves the next sibling slot down by `trigger_advance`,
//! and a trigger that placed a child moves it a further `child_advance`.
//!
//! Boxes of deep subtrees may overlap later siblings; the spacing is fixed
//! rather than measured.

use super::walk::{EdgeTarget, Visit};
use crate::config::LayoutConfig;
use crate::model::FollowerSet;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedNode {
    pub id: String,
    pub label: String,
    pub depth: usize,
    /// Top-left corner
    pub position: Point,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedEdge {
    pub from: String,
    pub label: String,
    pub target: String,
    /// Whether `target` names a follower in the set
    pub resolved: bool,
    /// Bottom centre of the source box
    pub start: Point,
    /// Top centre of the slot the edge points at
    pub end: Point,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    pub nodes: Vec<PlacedNode>,
    pub edges: Vec<PlacedEdge>,
}

struct Frame {
    depth: usize,
    position: Point,
    next_y: f32,
}

/// Lay out the tree reachable from `start`, or `None` if `start` is unknown
pub fn layout(set: &FollowerSet, start: &str, config: &LayoutConfig) -> Option<Layout> {
    set.find(start)?;

    let mut result = Layout::default();
    let mut frames: Vec<Frame> = Vec::new();
    let mut placed: HashSet<&str> = HashSet::new();
    let mut child_slot = Point {
        x: config.origin_x,
        y: config.origin_y,
    };

    for visit in set.walk(start) {
        match visit {
            Visit::Enter { node, depth, .. } => {
                placed.insert(node.id.as_str());
                frames.push(Frame {
                    depth,
                    position: child_slot,
                    next_y: child_slot.y + config.box_height + config.level_offset,
                });
                result.nodes.push(PlacedNode {
                    id: node.id.clone(),
                    label: node.label.clone(),
                    depth,
                    position: child_slot,
                    width: config.box_width,
                    height: config.box_height,
                });
            }
            Visit::Edge {
                from,
                label,
                target,
                depth,
                ..
            } => {
                while frames.last().is_some_and(|frame| frame.depth > depth) {
                    frames.pop();
                }
                let Some(frame) = frames.last_mut() else {
                    continue;
                };

                let slot = Point {
                    x: frame.position.x + config.horizontal_offset,
                    y: frame.next_y,
                };
                let opens_child =
                    matches!(target, EdgeTarget::Resolved(next) if !placed.contains(next.id.as_str()));

                result.edges.push(PlacedEdge {
                    from: from.id.clone(),
                    label: label.to_string(),
                    target: target.id().to_string(),
                    resolved: matches!(target, EdgeTarget::Resolved(_)),
                    start: Point {
                        x: frame.position.x + config.box_width / 2.0,
                        y: frame.position.y + config.box_height,
                    },
                    end: Point {
                        x: slot.x + config.box_width / 2.0,
                        y: slot.y,
                    },
                });

                frame.next_y += config.trigger_advance;
                if opens_child {
                    frame.next_y += config.child_advance;
                    child_slot = slot;
                }
            }
            Visit::Leaf { .. } => {}
        }
    }
    Some(result)
}

impl Layout {
    pub fn node(&self, id: &str) -> Option<&PlacedNode> {
        self.nodes.iter().find(|node| node.id == id)
    }
}
