//! Thread view: a topic with its nodes assembled into an ordered reply forest

use agora_core::{build_tree, ReplyDepthPolicy, Snowflake, SortOption};
use tracing::{debug, instrument};

use crate::dto::ThreadResponse;

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::node::NodeService;
use super::reaction::ReactionService;
use super::topic::TopicService;

pub struct ThreadService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ThreadService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Build the thread for `topic_id`. `viewer` adds the caller's own reactions.
    #[instrument(skip(self))]
    pub async fn thread(
        &self,
        topic_id: Snowflake,
        sort: SortOption,
        viewer: Option<Snowflake>,
    ) -> ServiceResult<ThreadResponse> {
        let topic = TopicService::new(self.ctx).get_topic(topic_id).await?;
        let nodes = NodeService::new(self.ctx).topic_nodes(topic_id).await?;
        let total = nodes.len();

        let mut forest = build_tree(nodes, sort);
        ReplyDepthPolicy::new(self.ctx.discussion().max_reply_depth).annotate(&mut forest);
        debug!(topic_id = %topic_id, total, roots = forest.len(), "Thread assembled");

        let my_reactions = match viewer {
            Some(user_id) => Some(
                ReactionService::new(self.ctx)
                    .user_reactions(user_id, topic_id)
                    .await?,
            ),
            None => None,
        };

        Ok(ThreadResponse {
            topic,
            sort,
            nodes: forest,
            my_reactions,
        })
    }
}
