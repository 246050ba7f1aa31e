//! Denormalized counters and the tallies they are recomputed from.
//!
//! Counters are never incremented in place. The aggregate engine tallies the
//! current rows and overwrites the stored counters with [`TopicCounters::recompute`]
//! or [`NodeCounters::recompute`], which makes every recomputation idempotent.

use serde::{Deserialize, Serialize};

use super::{NodeType, ReactionKind};

/// Live nodes of one topic grouped by stance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StanceTally {
    pub agree: i32,
    pub disagree: i32,
    pub neutral: i32,
}

impl StanceTally {
    pub fn add(&mut self, node_type: NodeType, count: i32) {
        match node_type {
            NodeType::Agree => self.agree += count,
            NodeType::Disagree => self.disagree += count,
            NodeType::Neutral => self.neutral += count,
        }
    }

    pub fn total(&self) -> i32 {
        self.agree + self.disagree + self.neutral
    }
}

impl FromIterator<NodeType> for StanceTally {
    fn from_iter<I: IntoIterator<Item = NodeType>>(iter: I) -> Self {
        let mut tally = Self::default();
        for node_type in iter {
            tally.add(node_type, 1);
        }
        tally
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReactionTally {
    pub likes: i32,
    pub dislikes: i32,
}

impl ReactionTally {
    pub fn add(&mut self, kind: ReactionKind, count: i32) {
        match kind {
            ReactionKind::Like => self.likes += count,
            ReactionKind::Dislike => self.dislikes += count,
        }
    }
}

impl FromIterator<ReactionKind> for ReactionTally {
    fn from_iter<I: IntoIterator<Item = ReactionKind>>(iter: I) -> Self {
        let mut tally = Self::default();
        for kind in iter {
            tally.add(kind, 1);
        }
        tally
    }
}

/// Direct children of one node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChildTally {
    /// Every direct child, tombstones included
    pub total: i32,
    /// Live direct children by stance
    pub live: StanceTally,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicCounters {
    pub agree: i32,
    pub disagree: i32,
    pub like: i32,
    pub dislike: i32,
    pub node: i32,
}

impl TopicCounters {
    pub fn recompute(nodes: StanceTally, reactions: ReactionTally) -> Self {
        Self {
            agree: nodes.agree,
            disagree: nodes.disagree,
            like: reactions.likes,
            dislike: reactions.dislikes,
            node: nodes.total(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeCounters {
    pub agree: i32,
    pub disagree: i32,
    pub like: i32,
    pub dislike: i32,
    pub reply: i32,
}

impl NodeCounters {
    pub fn recompute(children: ChildTally, reactions: ReactionTally) -> Self {
        Self {
            agree: children.live.agree,
            disagree: children.live.disagree,
            like: reactions.likes,
            dislike: reactions.dislikes,
            reply: children.total,
        }
    }
}
