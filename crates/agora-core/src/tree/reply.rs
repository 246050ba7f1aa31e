use serde::Serialize;

use super::{Threaded, TreeNode};
use crate::value_objects::Snowflake;

/// Where a reply may be attached when viewing a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyAffordance {
    pub can_reply: bool,
    /// The node itself when it accepts replies, otherwise its deepest ancestor that does
    pub reply_target_id: Option<Snowflake>,
}

/// Presentation cap on reply nesting. Storage depth is unbounded; past the cap
/// replies are redirected to the deepest ancestor that still accepts them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyDepthPolicy {
    pub max_depth: usize,
}

impl Default for ReplyDepthPolicy {
    fn default() -> Self {
        Self { max_depth: 4 }
    }
}

impl ReplyDepthPolicy {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// `depth` is 0 for top-level nodes
    #[inline]
    pub fn can_reply(&self, depth: usize) -> bool {
        depth < self.max_depth
    }

    /// Fill in [`TreeNode::reply`] across a forest
    pub fn annotate<T: Threaded>(&self, forest: &mut [TreeNode<T>]) {
        let mut stack: Vec<(&mut TreeNode<T>, Option<Snowflake>)> =
            forest.iter_mut().map(|root| (root, None)).collect();

        while let Some((entry, inherited)) = stack.pop() {
            let can_reply = self.can_reply(entry.depth);
            let target = if can_reply {
                Some(entry.item.id())
            } else {
                inherited
            };
            entry.reply = Some(ReplyAffordance {
                can_reply,
                reply_target_id: target,
            });
            stack.extend(entry.children.iter_mut().map(|child| (child, target)));
        }
    }
}
