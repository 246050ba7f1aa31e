//! Reaction entity <-> model mapper

use agora_core::{DomainError, Reaction, ReactionKind, ReactionTally, ReactionTarget, Snowflake};

use super::{narrow_count, parse_column};
use crate::models::{ReactionCountModel, ReactionModel};

impl TryFrom<ReactionModel> for Reaction {
    type Error = DomainError;

    fn try_from(model: ReactionModel) -> Result<Self, Self::Error> {
        Ok(Reaction {
            id: Snowflake::new(model.id),
            user_id: Snowflake::new(model.user_id),
            topic_id: Snowflake::new(model.topic_id),
            target: ReactionTarget::from_node_id(model.node_id.map(Snowflake::new)),
            kind: parse_column("reactions.reaction_type", &model.reaction_type)?,
            created_at: model.created_at,
        })
    }
}

pub fn reaction_tally(rows: &[ReactionCountModel]) -> Result<ReactionTally, DomainError> {
    let mut tally = ReactionTally::default();
    for row in rows {
        let kind: ReactionKind = parse_column("reactions.reaction_type", &row.reaction_type)?;
        tally.add(kind, narrow_count(row.count));
    }
    Ok(tally)
}
