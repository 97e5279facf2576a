//! Depth-limited reply walk
//!
//! Walks a group's reply tree from its root and records the visit order. Uses an
//! explicit stack and a visited set, so reply graphs that contain cycles or run
//! arbitrarily deep still terminate.

use std::collections::{HashMap, HashSet};

/// Result of walking one reply tree
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReplyWalk {
    /// Table indices in depth-first visit order
    pub order: Vec<usize>,

    /// Children skipped because they were already visited (cycle edges)
    pub revisited: Vec<usize>,

    /// Whether some node at the depth limit still had children
    pub depth_limited: bool,
}

/// Walk the reply tree below `root`
///
/// ## Arguments
///
/// * `root` - Table index to start from (depth 0)
/// * `children` - parent index → child indices, already in chain order
/// * `max_depth` - Deepest level that is still visited; children of nodes at
///   this depth are not descended into
///
/// Children are visited left to right, matching the order of each list in
/// `children`.
pub fn walk_reply_tree(
    root: usize,
    children: &HashMap<usize, Vec<usize>>,
    max_depth: usize,
) -> ReplyWalk {
    let mut walk = ReplyWalk::default();
    let mut visited = HashSet::new();

    // Stack for iterative DFS: (table index, depth in tree)
    let mut traversal_stack = vec![(root, 0usize)];

    while let Some((current, depth)) = traversal_stack.pop() {
        if !visited.insert(current) {
            walk.revisited.push(current);
            continue;
        }
        walk.order.push(current);

        let Some(replies) = children.get(&current) else {
            continue;
        };

        if depth >= max_depth {
            if !replies.is_empty() {
                walk.depth_limited = true;
            }
            continue;
        }

        // Reverse so the first child is popped first
        for &child in replies.iter().rev() {
            if visited.contains(&child) {
                walk.revisited.push(child);
                continue;
            }
            traversal_stack.push((child, depth + 1));
        }
    }

    walk
}
