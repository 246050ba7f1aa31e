//! Topic service
//!
//! Handles the topic feed, search, single-topic reads and the author-gated
//! create/edit/delete flow.

use agora_cache::FeedKey;
use agora_core::{
    DeleteOutcome, DomainError, ReactionTarget, Snowflake, Topic, TopicQuery, TopicSort,
};
use tracing::{info, instrument};

use crate::dto::{
    CreateTopicRequest, DeleteResponse, TopicResponse, TopicWithAuthor, UpdateTopicRequest,
};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::user::UserService;

pub struct TopicService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TopicService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Live topics in feed order, optionally for one country
    #[instrument(skip(self))]
    pub async fn list_topics(
        &self,
        sort: TopicSort,
        country: Option<String>,
    ) -> ServiceResult<Vec<TopicResponse>> {
        let country = country.filter(|c| !c.trim().is_empty());
        let key = FeedKey::feed(sort, country.as_deref());
        if let Some(cache) = self.ctx.cache() {
            if let Some(hit) = cache.get(&key).await {
                return Ok(hit);
            }
        }

        let query = TopicQuery {
            sort,
            country,
            limit: self.ctx.discussion().feed_limit,
        };
        let topics = self.ctx.topic_repo().list(&query).await?;
        let responses = self.with_authors(topics).await?;

        if let Some(cache) = self.ctx.cache() {
            cache.put(&key, &responses).await;
        }
        Ok(responses)
    }

    /// Case-insensitive match on title or content; blank queries match nothing
    #[instrument(skip(self))]
    pub async fn search_topics(&self, query: &str) -> ServiceResult<Vec<TopicResponse>> {
        let needle = query.trim();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let topics = self
            .ctx
            .topic_repo()
            .search(needle, self.ctx.discussion().feed_limit)
            .await?;
        self.with_authors(topics).await
    }

    /// A single topic, deleted ones included
    #[instrument(skip(self))]
    pub async fn get_topic(&self, topic_id: Snowflake) -> ServiceResult<TopicResponse> {
        let key = FeedKey::topic(topic_id);
        if let Some(cache) = self.ctx.cache() {
            if let Some(hit) = cache.get(&key).await {
                return Ok(hit);
            }
        }

        let topic = self.find(topic_id).await?;
        let response = self.with_author(topic).await?;

        if let Some(cache) = self.ctx.cache() {
            cache.put(&key, &response).await;
        }
        Ok(response)
    }

    /// Every topic the user wrote, newest first. Not capped like the feed.
    #[instrument(skip(self))]
    pub async fn user_topics(&self, user_id: Snowflake) -> ServiceResult<Vec<TopicResponse>> {
        let topics = self.ctx.topic_repo().find_by_author(user_id).await?;
        self.with_authors(topics).await
    }

    #[instrument(skip(self, request))]
    pub async fn create_topic(
        &self,
        author_id: Snowflake,
        request: CreateTopicRequest,
    ) -> ServiceResult<TopicResponse> {
        let topic = Topic::new(self.ctx.generate_id(), author_id, request.title, request.content)
            .with_image_url(request.image_url.filter(|url| !url.is_empty()))
            .with_country(request.country.filter(|c| !c.trim().is_empty()));

        self.ctx.topic_repo().create(&topic).await?;
        info!(topic_id = %topic.id, author_id = %author_id, "Topic created");

        self.ctx.invalidate_topic(topic.id).await;
        self.with_author(topic).await
    }

    #[instrument(skip(self, request))]
    pub async fn update_topic(
        &self,
        topic_id: Snowflake,
        user_id: Snowflake,
        request: UpdateTopicRequest,
    ) -> ServiceResult<TopicResponse> {
        let mut topic = self.find_live(topic_id).await?;
        if !topic.is_authored_by(user_id) {
            return Err(DomainError::NotTopicAuthor.into());
        }

        topic.edit(request.title, request.content);
        self.ctx.topic_repo().update(&topic).await?;
        info!(topic_id = %topic_id, "Topic updated");

        self.ctx.invalidate_topic(topic_id).await;
        self.with_author(topic).await
    }

    /// Remove a topic according to the configured deletion policy
    #[instrument(skip(self))]
    pub async fn delete_topic(
        &self,
        topic_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<DeleteResponse> {
        let topic = self.find_live(topic_id).await?;
        if !topic.is_authored_by(user_id) {
            return Err(DomainError::NotTopicAuthor.into());
        }

        let policy = self.ctx.discussion().deletion_policy;
        let outcome = if policy.keeps_row(self.is_untouched(topic_id).await?) {
            self.ctx.topic_repo().soft_delete(topic_id).await?;
            DeleteOutcome::SOFT
        } else {
            self.ctx.topic_repo().hard_delete(topic_id).await?;
            DeleteOutcome::HARD
        };
        info!(topic_id = %topic_id, soft = outcome.soft_deleted, "Topic deleted");

        self.ctx.invalidate_topic(topic_id).await;
        Ok(DeleteResponse {
            success: true,
            deleted: true,
            soft_deleted: outcome.soft_deleted,
        })
    }

    /// No nodes at all (tombstones included) and no topic reactions
    async fn is_untouched(&self, topic_id: Snowflake) -> ServiceResult<bool> {
        if self.ctx.node_repo().count_by_topic(topic_id).await? > 0 {
            return Ok(false);
        }
        let reactions = self
            .ctx
            .reaction_repo()
            .tally(topic_id, ReactionTarget::Topic)
            .await?;
        Ok(reactions.likes == 0 && reactions.dislikes == 0)
    }

    pub(crate) async fn find(&self, topic_id: Snowflake) -> ServiceResult<Topic> {
        Ok(self
            .ctx
            .topic_repo()
            .find_by_id(topic_id)
            .await?
            .ok_or(DomainError::TopicNotFound(topic_id))?)
    }

    /// Deleted topics are invisible to writes
    pub(crate) async fn find_live(&self, topic_id: Snowflake) -> ServiceResult<Topic> {
        let topic = self.find(topic_id).await?;
        if topic.is_deleted {
            return Err(DomainError::TopicNotFound(topic_id).into());
        }
        Ok(topic)
    }

    pub(crate) async fn with_author(&self, topic: Topic) -> ServiceResult<TopicResponse> {
        let author = match topic.author_id {
            Some(id) => self.ctx.user_repo().find_by_id(id).await?,
            None => None,
        };
        Ok(TopicResponse::from(TopicWithAuthor { topic, author }))
    }

    async fn with_authors(&self, topics: Vec<Topic>) -> ServiceResult<Vec<TopicResponse>> {
        let authors = UserService::new(self.ctx)
            .authors(topics.iter().map(|t| t.author_id))
            .await?;
        Ok(topics
            .into_iter()
            .map(|topic| {
                let author = topic.author_id.and_then(|id| authors.get(&id).cloned());
                TopicResponse::from(TopicWithAuthor { topic, author })
            })
            .collect())
    }
}
