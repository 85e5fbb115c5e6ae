//! Indented text tree
//!
//! ```text
//! └── Seed (f1)
//! ├── grow --> Sprout (f2)
//! │   ├── Sprout (f2)
//! │   └── wilt --> f9
//! └── rest --> Seed (f1)
//! ```
//!
//! Each depth level adds one `│   ` column. Node lines use `└── ` for the
//! start node and `├── ` below it; edge lines use `└── ` for the last
//! trigger of a node. A node already printed is named on its edge line but
//! not expanded again.

use super::walk::{EdgeTarget, Visit};
use crate::model::FollowerSet;

const INDENT: &str = "│   ";
const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";

/// Render the tree reachable from `start`, or `None` if `start` is unknown
pub fn render_tree(set: &FollowerSet, start: &str) -> Option<String> {
    set.find(start)?;

    let mut out = String::new();
    for visit in set.walk(start) {
        let indent = INDENT.repeat(visit.depth());
        let line = match visit {
            Visit::Enter { node, depth, .. } => {
                format!("{}{}", node_prefix(depth), node.display_name())
            }
            Visit::Edge {
                label,
                target,
                last,
                ..
            } => {
                let prefix = if last { LAST_BRANCH } else { BRANCH };
                match target {
                    EdgeTarget::Resolved(next) => {
                        format!("{prefix}{label} --> {}", next.display_name())
                    }
                    EdgeTarget::Dangling(raw) => format!("{prefix}{label} --> {raw}"),
                }
            }
            Visit::Leaf { node, depth } => {
                format!("{}No triggers for {}", node_prefix(depth), node.display_name())
            }
        };
        out.push_str(&indent);
        out.push_str(&line);
        out.push('\n');
    }
    Some(out)
}

fn node_prefix(depth: usize) -> &'static str {
    if depth == 0 {
        LAST_BRANCH
    } else {
        BRANCH
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Follower;

    #[test]
    fn test_tree_with_cycle_and_dangling_edge() {
        let set = FollowerSet::from(vec![
            Follower::new("f1", "Seed")
                .with_trigger("grow", "f2")
                .with_trigger("rest", "f1"),
            Follower::new("f2", "Sprout").with_trigger("wilt", "f9"),
        ]);
        let tree = render_tree(&set, "f1").unwrap();
        insta::assert_snapshot!(tree, @r"
└── Seed (f1)
├── grow --> Sprout (f2)
│   ├── Sprout (f2)
│   └── wilt --> f9
└── rest --> Seed (f1)
");
    }

    #[test]
    fn test_leaf_line() {
        let set = FollowerSet::from(vec![
            Follower::new("a", "Alpha").with_trigger("go", "b"),
            Follower::new("b", "Beta"),
        ]);
        let tree = render_tree(&set, "a").unwrap();
        assert_eq!(
            tree,
            "└── Alpha (a)\n└── go --> Beta (b)\n│   ├── Beta (b)\n│   ├── No triggers for Beta (b)\n"
        );
    }

    #[test]
    fn test_single_node() {
        let set = FollowerSet::from(vec![Follower::new("a", "Alpha")]);
        assert_eq!(
            render_tree(&set, "a").unwrap(),
            "└── Alpha (a)\n└── No triggers for Alpha (a)\n"
        );
    }

    #[test]
    fn test_unknown_start() {
        let set = FollowerSet::from(vec![Follower::new("a", "Alpha")]);
        assert_eq!(render_tree(&set, "zz"), None);
        assert_eq!(render_tree(&FollowerSet::new(), "a"), None);
    }
}
