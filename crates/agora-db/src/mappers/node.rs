//! Node entity <-> model mapper

use agora_core::{ChildTally, DomainError, Node, NodeCounters, NodeType, Snowflake, StanceTally};

use super::{narrow_count, parse_column};
use crate::models::{NodeModel, StanceCountModel};

impl TryFrom<NodeModel> for Node {
    type Error = DomainError;

    fn try_from(model: NodeModel) -> Result<Self, Self::Error> {
        Ok(Node {
            id: Snowflake::new(model.id),
            topic_id: Snowflake::new(model.topic_id),
            parent_id: model.parent_id.map(Snowflake::new),
            author_id: model.author_id.map(Snowflake::new),
            node_type: parse_column("nodes.node_type", &model.node_type)?,
            content: model.content,
            image_url: model.image_url,
            counters: NodeCounters {
                agree: model.agree_count,
                disagree: model.disagree_count,
                like: model.like_count,
                dislike: model.dislike_count,
                reply: model.reply_count,
            },
            is_deleted: model.is_deleted,
            edited_at: model.edited_at,
            created_at: model.created_at,
        })
    }
}

/// Live rows only
pub fn stance_tally(rows: &[StanceCountModel]) -> Result<StanceTally, DomainError> {
    let mut tally = StanceTally::default();
    for row in rows.iter().filter(|row| !row.is_deleted) {
        let node_type: NodeType = parse_column("nodes.node_type", &row.node_type)?;
        tally.add(node_type, narrow_count(row.count));
    }
    Ok(tally)
}

/// Every row counts toward the total; live rows also by stance
pub fn child_tally(rows: &[StanceCountModel]) -> Result<ChildTally, DomainError> {
    Ok(ChildTally {
        total: narrow_count(rows.iter().map(|row| row.count).sum()),
        live: stance_tally(rows)?,
    })
}
