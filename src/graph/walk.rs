//! Depth-first traversal
//!
//! From the start node, each node is entered at most once (by id). Entering
//! a node emits [`Visit::Enter`] followed by one [`Visit::Edge`] per
//! trigger, in stored order. An edge whose target resolves to a node not
//! yet entered is followed immediately, so that node's events come before
//! the next sibling edge. A node without triggers emits [`Visit::Leaf`]
//! after its `Enter`.
//!
//! The walk keeps an explicit stack, so depth is bounded only by memory.

use crate::model::{Follower, FollowerSet};
use std::collections::HashSet;

/// Where an edge leads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeTarget<'a> {
    /// First follower in the set with the target id
    Resolved(&'a Follower),
    /// Raw target id with no follower behind it
    Dangling(&'a str),
}

impl EdgeTarget<'_> {
    pub fn id(&self) -> &str {
        match self {
            EdgeTarget::Resolved(node) => &node.id,
            EdgeTarget::Dangling(id) => id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit<'a> {
    /// First arrival at a node. `via` is the trigger key that led here
    /// (`None` for the start node).
    Enter {
        node: &'a Follower,
        via: Option<&'a str>,
        depth: usize,
    },
    /// One trigger of `from`, which sits at `depth`
    Edge {
        from: &'a Follower,
        label: &'a str,
        target: EdgeTarget<'a>,
        depth: usize,
        /// Whether this is the last trigger of `from`
        last: bool,
    },
    /// `node` has no triggers
    Leaf { node: &'a Follower, depth: usize },
}

impl Visit<'_> {
    pub fn depth(&self) -> usize {
        match self {
            Visit::Enter { depth, .. } | Visit::Edge { depth, .. } | Visit::Leaf { depth, .. } => {
                *depth
            }
        }
    }
}

struct Frame<'a> {
    node: &'a Follower,
    depth: usize,
    next_trigger: usize,
}

/// Iterator of [`Visit`] events
pub struct Walk<'a> {
    set: &'a FollowerSet,
    visited: HashSet<&'a str>,
    stack: Vec<Frame<'a>>,
    pending: Option<(&'a Follower, Option<&'a str>, usize)>,
}

impl<'a> Walk<'a> {
    /// Start a walk at `start`; yields nothing if no follower has that id
    pub fn new(set: &'a FollowerSet, start: &str) -> Self {
        Self {
            set,
            visited: HashSet::new(),
            stack: Vec::new(),
            pending: set.find(start).map(|node| (node, None, 0)),
        }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = Visit<'a>;

    fn next(&mut self) -> Option<Visit<'a>> {
        if let Some((node, via, depth)) = self.pending.take() {
            if self.visited.insert(node.id.as_str()) {
                self.stack.push(Frame {
                    node,
                    depth,
                    next_trigger: 0,
                });
                return Some(Visit::Enter { node, via, depth });
            }
        }

        loop {
            let frame = self.stack.last_mut()?;
            let node = frame.node;
            let depth = frame.depth;

            let Some((label, target)) = node.triggers.get_index(frame.next_trigger) else {
                self.stack.pop();
                if node.is_leaf() {
                    return Some(Visit::Leaf { node, depth });
                }
                continue;
            };
            frame.next_trigger += 1;
            let last = frame.next_trigger == node.triggers.len();

            let target = match self.set.find(target) {
                Some(next) => {
                    if !self.visited.contains(next.id.as_str()) {
                        self.pending = Some((next, Some(label.as_str()), depth + 1));
                    }
                    EdgeTarget::Resolved(next)
                }
                None => EdgeTarget::Dangling(target.as_str()),
            };
            return Some(Visit::Edge {
                from: node,
                label,
                target,
                depth,
                last,
            });
        }
    }
}

impl FollowerSet {
    /// Depth-first walk of the reference graph from `start`
    pub fn walk(&self, start: &str) -> Walk<'_> {
        Walk::new(self, start)
    }
}
