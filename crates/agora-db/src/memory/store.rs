use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use agora_core::{
    ChildTally, DomainError, Node, NodeCounters, NodeRepository, Reaction, ReactionKind,
    ReactionRepository, ReactionTally, ReactionTarget, RepoResult, Snowflake, StanceTally, Topic,
    TopicCounters, TopicQuery, TopicRepository, TopicSort, User, UserRepository,
};

#[derive(Debug, Default)]
struct Tables {
    topics: HashMap<Snowflake, Topic>,
    nodes: HashMap<Snowflake, Node>,
    reactions: HashMap<Snowflake, Reaction>,
    users: HashMap<Snowflake, User>,
}

impl Tables {
    /// A node and every reply below it
    fn subtree(&self, root: Snowflake) -> HashSet<Snowflake> {
        let mut found = HashSet::from([root]);
        let mut frontier = vec![root];
        while let Some(parent) = frontier.pop() {
            for node in self.nodes.values() {
                if node.parent_id == Some(parent) && found.insert(node.id) {
                    frontier.push(node.id);
                }
            }
        }
        found
    }
}

/// In-memory implementation of every repository trait.
///
/// Clones share the same tables, so one store can be handed out as all four
/// repositories.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sort_feed(topics: &mut [Topic], sort: TopicSort) {
    match sort {
        TopicSort::Latest => topics.sort_by_key(|t| Reverse((t.created_at, t.id))),
        TopicSort::Top => topics.sort_by_key(|t| Reverse((t.counters.like, t.created_at, t.id))),
        TopicSort::Trending => {
            topics.sort_by_key(|t| Reverse((t.trending_score(), t.created_at, t.id)));
        }
    }
}

fn clamp_limit(limit: i64) -> usize {
    usize::try_from(limit.max(0)).unwrap_or(usize::MAX)
}

#[async_trait]
impl TopicRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Topic>> {
        Ok(self.tables.read().topics.get(&id).cloned())
    }

    async fn list(&self, query: &TopicQuery) -> RepoResult<Vec<Topic>> {
        let mut topics: Vec<Topic> = self
            .tables
            .read()
            .topics
            .values()
            .filter(|t| !t.is_deleted)
            .filter(|t| query.country.is_none() || t.country == query.country)
            .cloned()
            .collect();
        sort_feed(&mut topics, query.sort);
        topics.truncate(clamp_limit(query.limit));
        Ok(topics)
    }

    async fn search(&self, needle: &str, limit: i64) -> RepoResult<Vec<Topic>> {
        let needle = needle.to_lowercase();
        let mut topics: Vec<Topic> = self
            .tables
            .read()
            .topics
            .values()
            .filter(|t| !t.is_deleted && t.matches(&needle))
            .cloned()
            .collect();
        sort_feed(&mut topics, TopicSort::Latest);
        topics.truncate(clamp_limit(limit));
        Ok(topics)
    }

    async fn find_by_author(&self, author_id: Snowflake) -> RepoResult<Vec<Topic>> {
        let mut topics: Vec<Topic> = self
            .tables
            .read()
            .topics
            .values()
            .filter(|t| t.author_id == Some(author_id))
            .cloned()
            .collect();
        sort_feed(&mut topics, TopicSort::Latest);
        Ok(topics)
    }

    async fn create(&self, topic: &Topic) -> RepoResult<()> {
        let mut tables = self.tables.write();
        if tables.topics.contains_key(&topic.id) {
            return Err(DomainError::DatabaseError(format!("duplicate topic id {}", topic.id)));
        }
        tables.topics.insert(topic.id, topic.clone());
        Ok(())
    }

    async fn update(&self, topic: &Topic) -> RepoResult<()> {
        let mut tables = self.tables.write();
        let stored = tables
            .topics
            .get_mut(&topic.id)
            .filter(|t| !t.is_deleted)
            .ok_or(DomainError::TopicNotFound(topic.id))?;
        stored.title.clone_from(&topic.title);
        stored.content.clone_from(&topic.content);
        stored.edited_at = topic.edited_at;
        Ok(())
    }

    async fn soft_delete(&self, id: Snowflake) -> RepoResult<()> {
        let mut tables = self.tables.write();
        let stored = tables
            .topics
            .get_mut(&id)
            .filter(|t| !t.is_deleted)
            .ok_or(DomainError::TopicNotFound(id))?;
        stored.tombstone();
        Ok(())
    }

    async fn hard_delete(&self, id: Snowflake) -> RepoResult<()> {
        let mut tables = self.tables.write();
        if tables.topics.remove(&id).is_none() {
            return Err(DomainError::TopicNotFound(id));
        }
        tables.nodes.retain(|_, n| n.topic_id != id);
        tables.reactions.retain(|_, r| r.topic_id != id);
        Ok(())
    }

    async fn update_counters(&self, id: Snowflake, counters: &TopicCounters) -> RepoResult<()> {
        if let Some(topic) = self.tables.write().topics.get_mut(&id) {
            topic.counters = *counters;
        }
        Ok(())
    }
}

#[async_trait]
impl NodeRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Node>> {
        Ok(self.tables.read().nodes.get(&id).cloned())
    }

    async fn find_by_topic(&self, topic_id: Snowflake) -> RepoResult<Vec<Node>> {
        let mut nodes: Vec<Node> = self
            .tables
            .read()
            .nodes
            .values()
            .filter(|n| n.topic_id == topic_id)
            .cloned()
            .collect();
        nodes.sort_by(|a, b| {
            b.counters
                .like
                .cmp(&a.counters.like)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });
        Ok(nodes)
    }

    async fn create(&self, node: &Node) -> RepoResult<()> {
        let mut tables = self.tables.write();
        if !tables.topics.contains_key(&node.topic_id) {
            return Err(DomainError::DatabaseError(format!(
                "node {} references missing topic {}",
                node.id, node.topic_id
            )));
        }
        if let Some(parent_id) = node.parent_id {
            if !tables.nodes.contains_key(&parent_id) {
                return Err(DomainError::DatabaseError(format!(
                    "node {} references missing parent {parent_id}",
                    node.id
                )));
            }
        }
        if tables.nodes.contains_key(&node.id) {
            return Err(DomainError::DatabaseError(format!("duplicate node id {}", node.id)));
        }
        tables.nodes.insert(node.id, node.clone());
        Ok(())
    }

    async fn update(&self, node: &Node) -> RepoResult<()> {
        let mut tables = self.tables.write();
        let stored = tables
            .nodes
            .get_mut(&node.id)
            .filter(|n| !n.is_deleted)
            .ok_or(DomainError::NodeNotFound(node.id))?;
        stored.content.clone_from(&node.content);
        stored.edited_at = node.edited_at;
        Ok(())
    }

    async fn soft_delete(&self, id: Snowflake) -> RepoResult<()> {
        let mut tables = self.tables.write();
        let stored = tables
            .nodes
            .get_mut(&id)
            .filter(|n| !n.is_deleted)
            .ok_or(DomainError::NodeNotFound(id))?;
        stored.tombstone();
        Ok(())
    }

    async fn hard_delete(&self, id: Snowflake) -> RepoResult<()> {
        let mut tables = self.tables.write();
        if !tables.nodes.contains_key(&id) {
            return Err(DomainError::NodeNotFound(id));
        }
        let doomed = tables.subtree(id);
        tables.nodes.retain(|node_id, _| !doomed.contains(node_id));
        tables
            .reactions
            .retain(|_, r| !r.node_id().is_some_and(|node_id| doomed.contains(&node_id)));
        Ok(())
    }

    async fn count_by_topic(&self, topic_id: Snowflake) -> RepoResult<i64> {
        let count = self
            .tables
            .read()
            .nodes
            .values()
            .filter(|n| n.topic_id == topic_id)
            .count();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }

    async fn tally_by_topic(&self, topic_id: Snowflake) -> RepoResult<StanceTally> {
        Ok(self
            .tables
            .read()
            .nodes
            .values()
            .filter(|n| n.topic_id == topic_id && !n.is_deleted)
            .map(|n| n.node_type)
            .collect())
    }

    async fn tally_children(&self, parent_id: Snowflake) -> RepoResult<ChildTally> {
        let tables = self.tables.read();
        let children: Vec<&Node> = tables
            .nodes
            .values()
            .filter(|n| n.parent_id == Some(parent_id))
            .collect();
        Ok(ChildTally {
            total: i32::try_from(children.len()).unwrap_or(i32::MAX),
            live: children
                .iter()
                .filter(|n| !n.is_deleted)
                .map(|n| n.node_type)
                .collect(),
        })
    }

    async fn update_counters(&self, id: Snowflake, counters: &NodeCounters) -> RepoResult<()> {
        if let Some(node) = self.tables.write().nodes.get_mut(&id) {
            node.counters = *counters;
        }
        Ok(())
    }
}

#[async_trait]
impl ReactionRepository for MemoryStore {
    async fn find(
        &self,
        user_id: Snowflake,
        topic_id: Snowflake,
        target: ReactionTarget,
    ) -> RepoResult<Option<Reaction>> {
        Ok(self
            .tables
            .read()
            .reactions
            .values()
            .find(|r| r.user_id == user_id && r.topic_id == topic_id && r.target == target)
            .cloned())
    }

    async fn find_by_user_in_topic(
        &self,
        user_id: Snowflake,
        topic_id: Snowflake,
    ) -> RepoResult<Vec<Reaction>> {
        let mut reactions: Vec<Reaction> = self
            .tables
            .read()
            .reactions
            .values()
            .filter(|r| r.user_id == user_id && r.topic_id == topic_id)
            .cloned()
            .collect();
        reactions.sort_by_key(|r| (r.created_at, r.id));
        Ok(reactions)
    }

    async fn create(&self, reaction: &Reaction) -> RepoResult<()> {
        let mut tables = self.tables.write();
        let taken = tables.reactions.values().any(|r| {
            r.user_id == reaction.user_id
                && r.topic_id == reaction.topic_id
                && r.target == reaction.target
        });
        if taken {
            return Err(DomainError::ReactionAlreadyExists);
        }
        tables.reactions.insert(reaction.id, reaction.clone());
        Ok(())
    }

    async fn update_kind(&self, id: Snowflake, kind: ReactionKind) -> RepoResult<()> {
        if let Some(reaction) = self.tables.write().reactions.get_mut(&id) {
            reaction.kind = kind;
        }
        Ok(())
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        self.tables.write().reactions.remove(&id);
        Ok(())
    }

    async fn tally(&self, topic_id: Snowflake, target: ReactionTarget) -> RepoResult<ReactionTally> {
        Ok(self
            .tables
            .read()
            .reactions
            .values()
            .filter(|r| r.topic_id == topic_id && r.target == target)
            .map(|r| r.kind)
            .collect())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        Ok(self.tables.read().users.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<User>> {
        let tables = self.tables.read();
        Ok(ids.iter().filter_map(|id| tables.users.get(id).cloned()).collect())
    }

    async fn upsert(&self, user: &User) -> RepoResult<User> {
        let mut tables = self.tables.write();
        let mut stored = user.clone();
        if let Some(existing) = tables.users.get(&user.id) {
            stored.created_at = existing.created_at;
        }
        tables.users.insert(stored.id, stored.clone());
        Ok(stored)
    }
}
