//! Node service
//!
//! Typed replies inside a topic. Every write that changes the thread
//! recomputes the counters of the nodes and topic it touched.

use agora_cache::FeedKey;
use agora_core::{DeleteOutcome, DomainError, Node, ReactionTarget, Snowflake, Topic};
use tracing::{info, instrument};

use crate::dto::{
    CreateNodeRequest, DeleteResponse, NodeResponse, NodeWithAuthor, PromoteNodeRequest,
    TopicResponse, UpdateNodeRequest,
};

use super::aggregate::AggregateService;
use super::context::ServiceContext;
use super::error::ServiceResult;
use super::topic::TopicService;
use super::user::UserService;

pub struct NodeService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> NodeService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Every node of a topic as a flat list, tombstones included
    #[instrument(skip(self))]
    pub async fn topic_nodes(&self, topic_id: Snowflake) -> ServiceResult<Vec<NodeResponse>> {
        TopicService::new(self.ctx).find(topic_id).await?;

        let key = FeedKey::nodes(topic_id);
        if let Some(cache) = self.ctx.cache() {
            if let Some(hit) = cache.get(&key).await {
                return Ok(hit);
            }
        }

        let nodes = self.ctx.node_repo().find_by_topic(topic_id).await?;
        let responses = self.with_authors(nodes).await?;

        if let Some(cache) = self.ctx.cache() {
            cache.put(&key, &responses).await;
        }
        Ok(responses)
    }

    #[instrument(skip(self))]
    pub async fn get_node(&self, node_id: Snowflake) -> ServiceResult<NodeResponse> {
        let node = self.find(node_id).await?;
        self.with_author(node).await
    }

    #[instrument(skip(self, request), fields(topic_id = %request.topic_id))]
    pub async fn create_node(
        &self,
        author_id: Snowflake,
        request: CreateNodeRequest,
    ) -> ServiceResult<NodeResponse> {
        let topic = TopicService::new(self.ctx).find_live(request.topic_id).await?;

        if let Some(parent_id) = request.parent_id {
            let parent = self.find(parent_id).await?;
            if parent.topic_id != topic.id {
                return Err(DomainError::ParentOutsideTopic {
                    parent_id,
                    topic_id: topic.id,
                }
                .into());
            }
            if parent.is_deleted {
                return Err(DomainError::ParentDeleted.into());
            }
        }

        let node = Node::new(
            self.ctx.generate_id(),
            topic.id,
            request.parent_id,
            author_id,
            request.node_type,
            request.content,
        )
        .with_image_url(request.image_url.filter(|url| !url.is_empty()));

        self.ctx.node_repo().create(&node).await?;
        info!(node_id = %node.id, node_type = %node.node_type, "Node created");

        self.recompute_around(topic.id, node.parent_id).await?;
        self.ctx.invalidate_topic(topic.id).await;
        self.with_author(node).await
    }

    #[instrument(skip(self, request))]
    pub async fn update_node(
        &self,
        node_id: Snowflake,
        user_id: Snowflake,
        request: UpdateNodeRequest,
    ) -> ServiceResult<NodeResponse> {
        let mut node = self.find_live(node_id).await?;
        if !node.is_authored_by(user_id) {
            return Err(DomainError::NotNodeAuthor.into());
        }

        node.edit(request.content);
        self.ctx.node_repo().update(&node).await?;
        info!(node_id = %node_id, "Node updated");

        self.ctx.invalidate_topic(node.topic_id).await;
        self.with_author(node).await
    }

    /// Remove a node according to the configured deletion policy. A soft
    /// delete keeps its replies attached to the tombstone.
    #[instrument(skip(self))]
    pub async fn delete_node(
        &self,
        node_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<DeleteResponse> {
        let node = self.find_live(node_id).await?;
        if !node.is_authored_by(user_id) {
            return Err(DomainError::NotNodeAuthor.into());
        }

        let policy = self.ctx.discussion().deletion_policy;
        let outcome = if policy.keeps_row(self.is_untouched(&node).await?) {
            self.ctx.node_repo().soft_delete(node_id).await?;
            DeleteOutcome::SOFT
        } else {
            self.ctx.node_repo().hard_delete(node_id).await?;
            DeleteOutcome::HARD
        };
        info!(node_id = %node_id, soft = outcome.soft_deleted, "Node deleted");

        self.recompute_around(node.topic_id, node.parent_id).await?;
        self.ctx.invalidate_topic(node.topic_id).await;
        Ok(DeleteResponse {
            success: true,
            deleted: true,
            soft_deleted: outcome.soft_deleted,
        })
    }

    /// Start a new topic from a node's content. The source thread is untouched.
    #[instrument(skip(self, request))]
    pub async fn promote_node(
        &self,
        node_id: Snowflake,
        user_id: Snowflake,
        request: PromoteNodeRequest,
    ) -> ServiceResult<TopicResponse> {
        let node = self.find_live(node_id).await?;
        let topic = Topic::promote(self.ctx.generate_id(), user_id, request.title, &node);

        self.ctx.topic_repo().create(&topic).await?;
        info!(
            topic_id = %topic.id,
            node_id = %node_id,
            source_topic_id = %node.topic_id,
            "Node promoted to topic"
        );

        self.ctx.invalidate_topic(topic.id).await;
        TopicService::new(self.ctx).with_author(topic).await
    }

    /// Refresh the parent's counters (when it still exists) and the topic's
    async fn recompute_around(
        &self,
        topic_id: Snowflake,
        parent_id: Option<Snowflake>,
    ) -> ServiceResult<()> {
        let aggregates = AggregateService::new(self.ctx);
        if let Some(parent_id) = parent_id {
            match aggregates.recompute_node_counters(parent_id).await {
                Ok(_) => {}
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e),
            }
        }
        aggregates.recompute_topic_counters(topic_id).await?;
        Ok(())
    }

    /// No child rows (tombstones included) and no reactions, read from storage
    /// rather than the node's possibly stale counters
    async fn is_untouched(&self, node: &Node) -> ServiceResult<bool> {
        if self.ctx.node_repo().tally_children(node.id).await?.total > 0 {
            return Ok(false);
        }
        let reactions = self
            .ctx
            .reaction_repo()
            .tally(node.topic_id, ReactionTarget::Node(node.id))
            .await?;
        Ok(reactions.likes == 0 && reactions.dislikes == 0)
    }

    async fn find(&self, node_id: Snowflake) -> ServiceResult<Node> {
        Ok(self
            .ctx
            .node_repo()
            .find_by_id(node_id)
            .await?
            .ok_or(DomainError::NodeNotFound(node_id))?)
    }

    async fn find_live(&self, node_id: Snowflake) -> ServiceResult<Node> {
        let node = self.find(node_id).await?;
        if node.is_deleted {
            return Err(DomainError::NodeNotFound(node_id).into());
        }
        Ok(node)
    }

    async fn with_author(&self, node: Node) -> ServiceResult<NodeResponse> {
        let author = match node.author_id {
            Some(id) => self.ctx.user_repo().find_by_id(id).await?,
            None => None,
        };
        Ok(NodeResponse::from(NodeWithAuthor { node, author }))
    }

    pub(crate) async fn with_authors(&self, nodes: Vec<Node>) -> ServiceResult<Vec<NodeResponse>> {
        let authors = UserService::new(self.ctx)
            .authors(nodes.iter().map(|n| n.author_id))
            .await?;
        Ok(nodes
            .into_iter()
            .map(|node| {
                let author = node.author_id.and_then(|id| authors.get(&id).cloned());
                NodeResponse::from(NodeWithAuthor { node, author })
            })
            .collect())
    }
}
