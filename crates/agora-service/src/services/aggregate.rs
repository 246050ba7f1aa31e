//! Aggregate engine
//!
//! Recomputes denormalized counters from the rows they summarize. Every
//! recomputation tallies current state and overwrites the stored counters, so
//! running one twice without an intervening write changes nothing.
//!
//! - Topic: `agree`/`disagree`/`node` over live nodes, `like`/`dislike` over
//!   topic-level reactions
//! - Node: `reply` over every direct child (tombstones stay in the thread),
//!   `agree`/`disagree` over live direct children, `like`/`dislike` over the
//!   node's reactions

use agora_core::{DomainError, NodeCounters, ReactionTarget, Snowflake, TopicCounters};
use tracing::{debug, instrument};

use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct AggregateService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AggregateService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self))]
    pub async fn recompute_topic_counters(&self, topic_id: Snowflake) -> ServiceResult<TopicCounters> {
        let nodes = self.ctx.node_repo().tally_by_topic(topic_id).await?;
        let reactions = self
            .ctx
            .reaction_repo()
            .tally(topic_id, ReactionTarget::Topic)
            .await?;

        let counters = TopicCounters::recompute(nodes, reactions);
        self.ctx.topic_repo().update_counters(topic_id, &counters).await?;

        debug!(topic_id = %topic_id, ?counters, "Topic counters recomputed");
        Ok(counters)
    }

    #[instrument(skip(self))]
    pub async fn recompute_node_counters(&self, node_id: Snowflake) -> ServiceResult<NodeCounters> {
        let node = self
            .ctx
            .node_repo()
            .find_by_id(node_id)
            .await?
            .ok_or(DomainError::NodeNotFound(node_id))?;

        let children = self.ctx.node_repo().tally_children(node_id).await?;
        let reactions = self
            .ctx
            .reaction_repo()
            .tally(node.topic_id, ReactionTarget::Node(node_id))
            .await?;

        let counters = NodeCounters::recompute(children, reactions);
        self.ctx.node_repo().update_counters(node_id, &counters).await?;

        debug!(node_id = %node_id, ?counters, "Node counters recomputed");
        Ok(counters)
    }

    /// Recompute whichever entity a reaction target names
    pub async fn recompute_target(&self, topic_id: Snowflake, target: ReactionTarget) -> ServiceResult<()> {
        match target {
            ReactionTarget::Topic => self.recompute_topic_counters(topic_id).await.map(|_| ()),
            ReactionTarget::Node(node_id) => self.recompute_node_counters(node_id).await.map(|_| ()),
        }
    }
}
