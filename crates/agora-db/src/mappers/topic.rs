//! Topic entity <-> model mapper

use agora_core::{Promotion, Snowflake, Topic, TopicCounters};

use crate::models::TopicModel;

impl From<TopicModel> for Topic {
    fn from(model: TopicModel) -> Self {
        let promoted_from = match (model.promoted_from_node_id, model.promoted_from_topic_id) {
            (Some(node_id), Some(topic_id)) => Some(Promotion {
                node_id: Snowflake::new(node_id),
                topic_id: Snowflake::new(topic_id),
            }),
            _ => None,
        };

        Topic {
            id: Snowflake::new(model.id),
            title: model.title,
            content: model.content,
            author_id: model.author_id.map(Snowflake::new),
            image_url: model.image_url,
            country: model.country,
            promoted_from,
            counters: TopicCounters {
                agree: model.agree_count,
                disagree: model.disagree_count,
                like: model.like_count,
                dislike: model.dislike_count,
                node: model.node_count,
            },
            is_deleted: model.is_deleted,
            edited_at: model.edited_at,
            created_at: model.created_at,
        }
    }
}
