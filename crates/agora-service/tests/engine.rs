//! End-to-end service scenarios against the in-memory store

use std::sync::Arc;

use agora_common::{DiscussionConfig, JwtService};
use agora_core::{
    DeletionPolicy, Node, NodeType, ReactionKind, Snowflake, SortOption, TopicSort, User,
    UserRepository,
};
use agora_db::MemoryStore;
use agora_service::{
    AggregateService, CreateNodeRequest, CreateTopicRequest, NodeResponse, NodeService,
    PromoteNodeRequest, ReactionService, ServiceContext, ThreadService, ToggleReactionRequest,
    TopicResponse, TopicService, UpdateNodeRequest, UpdateTopicRequest,
};

const ALICE: Snowflake = Snowflake::new(1_001);
const BOB: Snowflake = Snowflake::new(1_002);

async fn context(policy: DeletionPolicy) -> ServiceContext {
    context_with(DiscussionConfig {
        deletion_policy: policy,
        ..DiscussionConfig::default()
    })
    .await
}

async fn context_with(discussion: DiscussionConfig) -> ServiceContext {
    let store = MemoryStore::new();
    for (id, name) in [(ALICE, "Alice"), (BOB, "Bob")] {
        let mut user = User::new(id);
        user.first_name = Some(name.to_string());
        store.upsert(&user).await.unwrap();
    }

    ServiceContext::builder()
        .store(store)
        .jwt_service(Arc::new(JwtService::new("engine-test-secret", 900)))
        .discussion(discussion)
        .build()
        .unwrap()
}

async fn topic(ctx: &ServiceContext, author: Snowflake, title: &str) -> TopicResponse {
    TopicService::new(ctx)
        .create_topic(
            author,
            CreateTopicRequest {
                title: title.to_string(),
                content: format!("{title} body"),
                image_url: None,
                country: Some("NZ".to_string()),
            },
        )
        .await
        .unwrap()
}

async fn node(
    ctx: &ServiceContext,
    author: Snowflake,
    topic_id: Snowflake,
    parent_id: Option<Snowflake>,
    node_type: NodeType,
) -> NodeResponse {
    NodeService::new(ctx)
        .create_node(
            author,
            CreateNodeRequest {
                topic_id,
                parent_id,
                node_type,
                content: "a reply".to_string(),
                image_url: None,
            },
        )
        .await
        .unwrap()
}

async fn toggle(
    ctx: &ServiceContext,
    user: Snowflake,
    topic_id: Option<Snowflake>,
    node_id: Option<Snowflake>,
    kind: ReactionKind,
) -> Option<agora_service::ReactionResponse> {
    ReactionService::new(ctx)
        .toggle_reaction(
            user,
            ToggleReactionRequest {
                topic_id,
                node_id,
                kind,
            },
        )
        .await
        .unwrap()
}

async fn reload_topic(ctx: &ServiceContext, id: Snowflake) -> TopicResponse {
    TopicService::new(ctx).get_topic(id).await.unwrap()
}

async fn reload_node(ctx: &ServiceContext, id: Snowflake) -> NodeResponse {
    NodeService::new(ctx).get_node(id).await.unwrap()
}

#[tokio::test]
async fn test_new_node_updates_topic_counters() {
    let ctx = context(DeletionPolicy::Soft).await;
    let t = topic(&ctx, ALICE, "Cities").await;
    assert_eq!(t.author.as_ref().unwrap().display_name, "Alice");

    node(&ctx, BOB, t.id, None, NodeType::Agree).await;
    node(&ctx, BOB, t.id, None, NodeType::Neutral).await;

    let t = reload_topic(&ctx, t.id).await;
    assert_eq!(t.agree_count, 1);
    assert_eq!(t.disagree_count, 0);
    assert_eq!(t.node_count, 2);
}

#[tokio::test]
async fn test_reply_updates_parent_counters() {
    let ctx = context(DeletionPolicy::Soft).await;
    let t = topic(&ctx, ALICE, "Parks").await;
    let root = node(&ctx, ALICE, t.id, None, NodeType::Neutral).await;

    node(&ctx, BOB, t.id, Some(root.id), NodeType::Disagree).await;
    node(&ctx, BOB, t.id, Some(root.id), NodeType::Disagree).await;
    node(&ctx, ALICE, t.id, Some(root.id), NodeType::Agree).await;

    let root = reload_node(&ctx, root.id).await;
    assert_eq!(root.reply_count, 3);
    assert_eq!(root.agree_count, 1);
    assert_eq!(root.disagree_count, 2);
}

#[tokio::test]
async fn test_like_twice_restores_count() {
    let ctx = context(DeletionPolicy::Soft).await;
    let t = topic(&ctx, ALICE, "Trams").await;

    let first = toggle(&ctx, BOB, Some(t.id), None, ReactionKind::Like).await;
    assert_eq!(first.unwrap().kind, ReactionKind::Like);
    assert_eq!(reload_topic(&ctx, t.id).await.like_count, 1);

    let second = toggle(&ctx, BOB, Some(t.id), None, ReactionKind::Like).await;
    assert!(second.is_none());
    let t = reload_topic(&ctx, t.id).await;
    assert_eq!(t.like_count, 0);
    assert_eq!(t.dislike_count, 0);
}

#[tokio::test]
async fn test_switching_reaction_kind_moves_the_count() {
    let ctx = context(DeletionPolicy::Soft).await;
    let t = topic(&ctx, ALICE, "Bridges").await;
    let n = node(&ctx, ALICE, t.id, None, NodeType::Agree).await;

    let liked = toggle(&ctx, BOB, None, Some(n.id), ReactionKind::Like).await.unwrap();
    let disliked = toggle(&ctx, BOB, None, Some(n.id), ReactionKind::Dislike).await.unwrap();
    assert_eq!(liked.id, disliked.id);
    assert_eq!(disliked.topic_id, t.id);
    assert_eq!(disliked.node_id, Some(n.id));

    let n = reload_node(&ctx, n.id).await;
    assert_eq!(n.like_count, 0);
    assert_eq!(n.dislike_count, 1);

    // node reactions never touch the topic's own reaction counters
    assert_eq!(reload_topic(&ctx, t.id).await.dislike_count, 0);
}

#[tokio::test]
async fn test_node_reaction_ignores_mismatched_topic_id() {
    let ctx = context(DeletionPolicy::Soft).await;
    let home = topic(&ctx, ALICE, "Home").await;
    let other = topic(&ctx, ALICE, "Other").await;
    let n = node(&ctx, ALICE, home.id, None, NodeType::Agree).await;

    let reaction = toggle(&ctx, BOB, Some(other.id), Some(n.id), ReactionKind::Like)
        .await
        .unwrap();
    assert_eq!(reaction.topic_id, home.id);
}

#[tokio::test]
async fn test_delete_with_replies_keeps_thread_shape() {
    let ctx = context(DeletionPolicy::HardWhenUntouched).await;
    let t = topic(&ctx, ALICE, "Libraries").await;
    let root = node(&ctx, ALICE, t.id, None, NodeType::Agree).await;
    let a = node(&ctx, BOB, t.id, Some(root.id), NodeType::Agree).await;
    let b = node(&ctx, BOB, t.id, Some(root.id), NodeType::Disagree).await;

    let outcome = NodeService::new(&ctx).delete_node(root.id, ALICE).await.unwrap();
    assert!(outcome.success);
    assert!(outcome.soft_deleted);

    let tombstone = reload_node(&ctx, root.id).await;
    assert!(tombstone.is_deleted);
    assert_eq!(tombstone.author_id, None);
    assert!(tombstone.author.is_none());
    assert_eq!(tombstone.reply_count, 2);

    for reply in [a.id, b.id] {
        assert_eq!(reload_node(&ctx, reply).await.parent_id, Some(root.id));
    }

    let t = reload_topic(&ctx, t.id).await;
    assert_eq!(t.node_count, 2);
    assert_eq!(t.agree_count, 1);
    assert_eq!(t.disagree_count, 1);
}

#[tokio::test]
async fn test_untouched_node_is_removed_under_hard_policy() {
    let ctx = context(DeletionPolicy::HardWhenUntouched).await;
    let t = topic(&ctx, ALICE, "Ferries").await;
    let root = node(&ctx, ALICE, t.id, None, NodeType::Agree).await;
    let leaf = node(&ctx, BOB, t.id, Some(root.id), NodeType::Neutral).await;

    let outcome = NodeService::new(&ctx).delete_node(leaf.id, BOB).await.unwrap();
    assert!(!outcome.soft_deleted);

    let err = NodeService::new(&ctx).get_node(leaf.id).await.unwrap_err();
    assert_eq!(err.status_code(), 404);
    assert_eq!(reload_node(&ctx, root.id).await.reply_count, 0);
}

#[tokio::test]
async fn test_hard_policy_reads_replies_from_storage_not_counters() {
    let ctx = context(DeletionPolicy::HardWhenUntouched).await;
    let t = topic(&ctx, ALICE, "Tramways").await;
    let root = node(&ctx, ALICE, t.id, None, NodeType::Agree).await;

    // a reply whose parent recompute has not run yet
    let reply = Node::new(
        ctx.generate_id(),
        t.id,
        Some(root.id),
        BOB,
        NodeType::Disagree,
        "late reply".to_string(),
    );
    ctx.node_repo().create(&reply).await.unwrap();
    assert_eq!(reload_node(&ctx, root.id).await.reply_count, 0);

    let outcome = NodeService::new(&ctx).delete_node(root.id, ALICE).await.unwrap();
    assert!(outcome.soft_deleted);

    let survivor = reload_node(&ctx, reply.id).await;
    assert!(!survivor.is_deleted);
    assert_eq!(survivor.parent_id, Some(root.id));
    assert!(reload_node(&ctx, root.id).await.is_deleted);
}

#[tokio::test]
async fn test_hard_policy_keeps_node_with_reactions() {
    let ctx = context(DeletionPolicy::HardWhenUntouched).await;
    let t = topic(&ctx, ALICE, "Harbour").await;
    let leaf = node(&ctx, ALICE, t.id, None, NodeType::Neutral).await;
    toggle(&ctx, BOB, Some(t.id), Some(leaf.id), ReactionKind::Dislike).await;

    let outcome = NodeService::new(&ctx).delete_node(leaf.id, ALICE).await.unwrap();
    assert!(outcome.soft_deleted);
    assert!(reload_node(&ctx, leaf.id).await.is_deleted);
}

#[tokio::test]
async fn test_soft_policy_always_tombstones() {
    let ctx = context(DeletionPolicy::Soft).await;
    let t = topic(&ctx, ALICE, "Markets").await;
    let leaf = node(&ctx, BOB, t.id, None, NodeType::Neutral).await;

    let outcome = NodeService::new(&ctx).delete_node(leaf.id, BOB).await.unwrap();
    assert!(outcome.soft_deleted);
    assert!(reload_node(&ctx, leaf.id).await.is_deleted);
    assert_eq!(reload_topic(&ctx, t.id).await.node_count, 0);
}

#[tokio::test]
async fn test_deleting_twice_is_not_found() {
    let ctx = context(DeletionPolicy::Soft).await;
    let t = topic(&ctx, ALICE, "Museums").await;
    let n = node(&ctx, ALICE, t.id, None, NodeType::Agree).await;

    NodeService::new(&ctx).delete_node(n.id, ALICE).await.unwrap();
    let err = NodeService::new(&ctx).delete_node(n.id, ALICE).await.unwrap_err();
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn test_non_author_cannot_edit_or_delete() {
    let ctx = context(DeletionPolicy::Soft).await;
    let t = topic(&ctx, ALICE, "Stadiums").await;
    let n = node(&ctx, ALICE, t.id, None, NodeType::Agree).await;

    let err = NodeService::new(&ctx)
        .update_node(
            n.id,
            BOB,
            UpdateNodeRequest {
                content: "hijacked".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 403);
    assert_eq!(reload_node(&ctx, n.id).await.content, "a reply");

    let err = NodeService::new(&ctx).delete_node(n.id, BOB).await.unwrap_err();
    assert_eq!(err.status_code(), 403);

    let err = TopicService::new(&ctx)
        .update_topic(
            t.id,
            BOB,
            UpdateTopicRequest {
                title: Some("mine now".to_string()),
                content: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 403);
    assert_eq!(reload_topic(&ctx, t.id).await.title, "Stadiums");
}

#[tokio::test]
async fn test_author_edit_sets_edited_at() {
    let ctx = context(DeletionPolicy::Soft).await;
    let t = topic(&ctx, ALICE, "Harbours").await;
    assert!(t.edited_at.is_none());

    let updated = TopicService::new(&ctx)
        .update_topic(
            t.id,
            ALICE,
            UpdateTopicRequest {
                title: None,
                content: Some("rewritten".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Harbours");
    assert_eq!(updated.content, "rewritten");
    assert!(updated.edited_at.is_some());
}

#[tokio::test]
async fn test_reply_rules() {
    let ctx = context(DeletionPolicy::Soft).await;
    let t = topic(&ctx, ALICE, "Roads").await;
    let elsewhere = topic(&ctx, ALICE, "Rail").await;
    let foreign = node(&ctx, ALICE, elsewhere.id, None, NodeType::Agree).await;
    let gone = node(&ctx, ALICE, t.id, None, NodeType::Agree).await;
    NodeService::new(&ctx).delete_node(gone.id, ALICE).await.unwrap();

    let attempt = |parent_id: Snowflake| CreateNodeRequest {
        topic_id: t.id,
        parent_id: Some(parent_id),
        node_type: NodeType::Neutral,
        content: "reply".to_string(),
        image_url: None,
    };
    let service = NodeService::new(&ctx);

    let err = service.create_node(BOB, attempt(foreign.id)).await.unwrap_err();
    assert_eq!(err.status_code(), 400);
    let err = service.create_node(BOB, attempt(gone.id)).await.unwrap_err();
    assert_eq!(err.status_code(), 400);
    let err = service
        .create_node(BOB, attempt(Snowflake::new(404)))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn test_reacting_to_deleted_content_is_rejected() {
    let ctx = context(DeletionPolicy::Soft).await;
    let t = topic(&ctx, ALICE, "Piers").await;
    let n = node(&ctx, ALICE, t.id, None, NodeType::Agree).await;
    NodeService::new(&ctx).delete_node(n.id, ALICE).await.unwrap();

    let err = ReactionService::new(&ctx)
        .toggle_reaction(
            BOB,
            ToggleReactionRequest {
                topic_id: None,
                node_id: Some(n.id),
                kind: ReactionKind::Like,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);
    assert_eq!(err.error_code(), "TARGET_DELETED");
}

#[tokio::test]
async fn test_promote_node_creates_linked_topic() {
    let ctx = context(DeletionPolicy::Soft).await;
    let t = topic(&ctx, ALICE, "Housing").await;
    let n = node(&ctx, ALICE, t.id, None, NodeType::Disagree).await;

    let promoted = NodeService::new(&ctx)
        .promote_node(
            n.id,
            BOB,
            PromoteNodeRequest {
                title: "Housing, the sequel".to_string(),
            },
        )
        .await
        .unwrap();

    assert_ne!(promoted.id, t.id);
    assert_eq!(promoted.title, "Housing, the sequel");
    assert_eq!(promoted.content, "a reply");
    assert_eq!(promoted.author_id, Some(BOB));
    assert_eq!(promoted.promoted_from_node_id, Some(n.id));
    assert_eq!(promoted.promoted_from_topic_id, Some(t.id));
    assert_eq!(promoted.node_count, 0);

    // the source thread is left alone
    assert_eq!(reload_topic(&ctx, t.id).await.node_count, 1);
    assert!(!reload_node(&ctx, n.id).await.is_deleted);
}

#[tokio::test]
async fn test_recompute_is_idempotent() {
    let ctx = context(DeletionPolicy::Soft).await;
    let t = topic(&ctx, ALICE, "Tunnels").await;
    let root = node(&ctx, ALICE, t.id, None, NodeType::Agree).await;
    node(&ctx, BOB, t.id, Some(root.id), NodeType::Disagree).await;
    toggle(&ctx, BOB, Some(t.id), None, ReactionKind::Dislike).await;

    let aggregates = AggregateService::new(&ctx);
    let first = aggregates.recompute_topic_counters(t.id).await.unwrap();
    let second = aggregates.recompute_topic_counters(t.id).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first.dislike, 1);
    assert_eq!(first.node, 2);

    let first = aggregates.recompute_node_counters(root.id).await.unwrap();
    let second = aggregates.recompute_node_counters(root.id).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first.reply, 1);
}

#[tokio::test]
async fn test_topic_delete_policy() {
    let ctx = context(DeletionPolicy::HardWhenUntouched).await;
    let quiet = topic(&ctx, ALICE, "Quiet").await;
    let busy = topic(&ctx, ALICE, "Busy").await;
    toggle(&ctx, BOB, Some(busy.id), None, ReactionKind::Like).await;

    let service = TopicService::new(&ctx);
    assert!(!service.delete_topic(quiet.id, ALICE).await.unwrap().soft_deleted);
    assert_eq!(service.get_topic(quiet.id).await.unwrap_err().status_code(), 404);

    assert!(service.delete_topic(busy.id, ALICE).await.unwrap().soft_deleted);
    let tombstone = service.get_topic(busy.id).await.unwrap();
    assert!(tombstone.is_deleted);
    assert!(tombstone.author_id.is_none());

    let feed = service.list_topics(TopicSort::Latest, None).await.unwrap();
    assert!(feed.is_empty());
}

#[tokio::test]
async fn test_feed_search_and_profile() {
    let ctx = context(DeletionPolicy::Soft).await;
    let service = TopicService::new(&ctx);
    let a = topic(&ctx, ALICE, "Bicycle lanes").await;
    let b = topic(&ctx, BOB, "Night buses").await;
    toggle(&ctx, BOB, Some(a.id), None, ReactionKind::Like).await;

    let top = service.list_topics(TopicSort::Top, None).await.unwrap();
    assert_eq!(top.iter().map(|t| t.id).collect::<Vec<_>>(), vec![a.id, b.id]);

    let latest = service.list_topics(TopicSort::Latest, Some("NZ".to_string())).await.unwrap();
    assert_eq!(latest.iter().map(|t| t.id).collect::<Vec<_>>(), vec![b.id, a.id]);
    assert!(service
        .list_topics(TopicSort::Latest, Some("FR".to_string()))
        .await
        .unwrap()
        .is_empty());

    let found = service.search_topics("  BICYCLE ").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, a.id);
    assert!(service.search_topics("   ").await.unwrap().is_empty());

    let mine = service.user_topics(BOB).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].author.as_ref().unwrap().display_name, "Bob");
}

#[tokio::test]
async fn test_user_topics_are_not_capped_by_feed_limit() {
    let ctx = context_with(DiscussionConfig {
        feed_limit: 2,
        ..DiscussionConfig::default()
    })
    .await;
    for title in ["Parks", "Libraries", "Pools"] {
        topic(&ctx, BOB, title).await;
    }

    let service = TopicService::new(&ctx);
    assert_eq!(service.list_topics(TopicSort::Latest, None).await.unwrap().len(), 2);
    let mine = service.user_topics(BOB).await.unwrap();
    assert_eq!(
        mine.iter().map(|t| t.title.as_str()).collect::<Vec<_>>(),
        vec!["Pools", "Libraries", "Parks"]
    );
}

#[tokio::test]
async fn test_thread_view() {
    let ctx = context(DeletionPolicy::Soft).await;
    let t = topic(&ctx, ALICE, "Waterfront").await;
    let quiet = node(&ctx, ALICE, t.id, None, NodeType::Neutral).await;
    let loud = node(&ctx, BOB, t.id, None, NodeType::Agree).await;
    let mut parent = loud.id;
    let mut chain = Vec::new();
    for _ in 0..5 {
        let reply = node(&ctx, ALICE, t.id, Some(parent), NodeType::Disagree).await;
        chain.push(reply.id);
        parent = reply.id;
    }
    toggle(&ctx, ALICE, None, Some(loud.id), ReactionKind::Like).await;

    let anonymous = ThreadService::new(&ctx)
        .thread(t.id, SortOption::Likes, None)
        .await
        .unwrap();
    assert!(anonymous.my_reactions.is_none());
    assert_eq!(anonymous.topic.id, t.id);
    assert_eq!(
        anonymous.nodes.iter().map(|n| n.item.id).collect::<Vec<_>>(),
        vec![loud.id, quiet.id]
    );
    assert_eq!(anonymous.nodes[0].size(), 6);

    // default cap: depth 4 and below redirect to the depth-3 ancestor
    let deepest = anonymous.reply_affordance(chain[4]).unwrap();
    assert!(!deepest.can_reply);
    assert_eq!(deepest.reply_target_id, Some(chain[2]));
    let shallow = anonymous.reply_affordance(chain[0]).unwrap();
    assert!(shallow.can_reply);
    assert_eq!(shallow.reply_target_id, Some(chain[0]));

    let viewer = ThreadService::new(&ctx)
        .thread(t.id, SortOption::Newest, Some(ALICE))
        .await
        .unwrap();
    let mine = viewer.my_reactions.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].node_id, Some(loud.id));
    assert_eq!(viewer.nodes[0].item.id, loud.id);
}

#[tokio::test]
async fn test_thread_of_unknown_topic_is_not_found() {
    let ctx = context(DeletionPolicy::Soft).await;
    let err = ThreadService::new(&ctx)
        .thread(Snowflake::new(9), SortOption::Likes, None)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}
