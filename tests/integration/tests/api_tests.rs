//! API integration tests
//!
//! Each test spawns its own server on the in-memory store, so no external
//! services are needed.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_error, assert_json, assert_status, fixtures::*, TestServer, TestUser,
};
use reqwest::StatusCode;

async fn create_topic(server: &TestServer, user: &TestUser, request: &CreateTopic) -> Topic {
    let response = server.post_auth("/api/topics", &user.token, request).await.unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

async fn create_node(server: &TestServer, user: &TestUser, request: &CreateNode) -> Node {
    let response = server.post_auth("/api/nodes", &user.token, request).await.unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

async fn fetch_topic(server: &TestServer, id: &str) -> Topic {
    let response = server.get(&format!("/api/topics/{id}")).await.unwrap();
    assert_json(response, StatusCode::OK).await.unwrap()
}

async fn fetch_nodes(server: &TestServer, topic_id: &str) -> Vec<Node> {
    let response = server.get(&format!("/api/nodes/{topic_id}")).await.unwrap();
    assert_json(response, StatusCode::OK).await.unwrap()
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.unwrap();
    let response = server.get("/health").await.unwrap();
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_readiness_without_dependencies() {
    let server = TestServer::start().await.unwrap();
    let response = server.get("/health/ready").await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));

    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"]["database"], "disabled");
    assert_eq!(body["checks"]["cache"], "disabled");
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn test_current_user_syncs_profile() {
    let server = TestServer::start().await.unwrap();
    let user = server.user("Ada").unwrap();

    let response = server.get_auth("/api/auth/user", &user.token).await.unwrap();
    let profile: Profile = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(profile.id, user.id.to_string());
    assert_eq!(profile.email.as_deref(), Some("ada@example.com"));
    assert_eq!(profile.display_name, "Ada");
}

#[tokio::test]
async fn test_mutations_require_auth() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post("/api/topics", &CreateTopic::titled("Anonymous"))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "MISSING_AUTHORIZATION");

    let response = server
        .post_auth("/api/topics", "not-a-jwt", &CreateTopic::titled("Forged"))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "INVALID_TOKEN");
}

// ============================================================================
// Topics
// ============================================================================

#[tokio::test]
async fn test_create_and_get_topic() {
    let server = TestServer::start().await.unwrap();
    let alice = server.signed_in("Alice").await.unwrap();

    let topic = create_topic(&server, &alice, &CreateTopic::titled("Urban gardens")).await;
    assert_eq!(topic.title, "Urban gardens");
    assert_eq!(topic.author_id, Some(alice.id.to_string()));
    assert_eq!(topic.author.as_ref().unwrap().display_name, "Alice");
    assert_eq!(topic.node_count, 0);

    let fetched = fetch_topic(&server, &topic.id).await;
    assert_eq!(fetched.id, topic.id);
    assert_eq!(fetched.content, "Thoughts on Urban gardens");
}

#[tokio::test]
async fn test_topic_validation() {
    let server = TestServer::start().await.unwrap();
    let alice = server.user("Alice").unwrap();

    let response = server
        .post_auth("/api/topics", &alice.token, &CreateTopic::titled(""))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "VALIDATION_ERROR");

    let response = server
        .post_auth("/api/topics", &alice.token, &serde_json::json!({ "content": "no title" }))
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_unknown_and_malformed_topic_ids() {
    let server = TestServer::start().await.unwrap();

    let response = server.get("/api/topics/424242").await.unwrap();
    let code = assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(code, "UNKNOWN_TOPIC");

    let response = server.get("/api/topics/not-a-number").await.unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_PATH_PARAMETER");
}

#[tokio::test]
async fn test_feed_sort_country_and_search() {
    let server = TestServer::start().await.unwrap();
    let alice = server.signed_in("Alice").await.unwrap();
    let bob = server.signed_in("Bob").await.unwrap();

    let older = create_topic(&server, &alice, &CreateTopic::titled("Cycle lanes").in_country("NZ")).await;
    let newer = create_topic(&server, &alice, &CreateTopic::titled("Ferry timetable")).await;
    let response = server
        .post_auth("/api/reactions", &bob.token, &ToggleReaction::on_topic(&older.id, "like"))
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let latest: Vec<Topic> = assert_json(server.get("/api/topics").await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_eq!(
        latest.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(),
        vec![newer.id.as_str(), older.id.as_str()]
    );

    let top: Vec<Topic> = assert_json(
        server.get("/api/topics?sort=top").await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(top[0].id, older.id);
    assert_eq!(top[0].like_count, 1);

    let nz: Vec<Topic> = assert_json(
        server.get("/api/topics?country=NZ").await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(nz.len(), 1);
    assert_eq!(nz[0].country.as_deref(), Some("NZ"));

    let found: Vec<Topic> = assert_json(
        server.get("/api/topics/search?q=ferry").await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, newer.id);

    let blank: Vec<Topic> = assert_json(
        server.get("/api/topics/search?q=%20%20").await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert!(blank.is_empty());

    let fallback: Vec<Topic> = assert_json(
        server.get("/api/topics?sort=hottest").await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(
        fallback.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(),
        vec![newer.id.as_str(), older.id.as_str()]
    );

    let response = server
        .get(&format!("/api/topics/{}/thread?sort=loudest", older.id))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_QUERY_PARAMETER");
}

#[tokio::test]
async fn test_topic_ownership() {
    let server = TestServer::start().await.unwrap();
    let alice = server.signed_in("Alice").await.unwrap();
    let mallory = server.signed_in("Mallory").await.unwrap();
    let topic = create_topic(&server, &alice, &CreateTopic::titled("Library hours")).await;
    let path = format!("/api/topics/{}", topic.id);

    let response = server
        .patch_auth(&path, &mallory.token, &serde_json::json!({ "title": "Mine" }))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "NOT_TOPIC_AUTHOR");

    let response = server.delete_auth(&path, &mallory.token).await.unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server
        .patch_auth(&path, &alice.token, &serde_json::json!({ "title": "Library opening hours" }))
        .await
        .unwrap();
    let updated: Topic = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(updated.title, "Library opening hours");
}

#[tokio::test]
async fn test_delete_topic_soft_by_default() {
    let server = TestServer::start().await.unwrap();
    let alice = server.signed_in("Alice").await.unwrap();
    let topic = create_topic(&server, &alice, &CreateTopic::titled("Short lived")).await;
    let path = format!("/api/topics/{}", topic.id);

    let response = server.delete_auth(&path, &alice.token).await.unwrap();
    let result: DeleteResult = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(result.success);
    assert!(result.soft_deleted);

    let tombstone = fetch_topic(&server, &topic.id).await;
    assert!(tombstone.is_deleted);
    assert!(tombstone.author_id.is_none());
    assert!(tombstone.author.is_none());

    let feed: Vec<Topic> = assert_json(server.get("/api/topics").await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert!(feed.is_empty());

    let response = server.delete_auth(&path, &alice.token).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_hard_delete_policy_removes_untouched_topic() {
    let server = TestServer::start_with(&[("DELETION_POLICY", "hard_when_untouched")])
        .await
        .unwrap();
    let alice = server.signed_in("Alice").await.unwrap();
    let topic = create_topic(&server, &alice, &CreateTopic::titled("Typo")).await;

    let response = server
        .delete_auth(&format!("/api/topics/{}", topic.id), &alice.token)
        .await
        .unwrap();
    let result: DeleteResult = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!result.soft_deleted);

    let response = server.get(&format!("/api/topics/{}", topic.id)).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_my_topics() {
    let server = TestServer::start().await.unwrap();
    let alice = server.signed_in("Alice").await.unwrap();
    let bob = server.signed_in("Bob").await.unwrap();
    create_topic(&server, &alice, &CreateTopic::titled("Alice's")).await;
    let bobs = create_topic(&server, &bob, &CreateTopic::titled("Bob's")).await;

    let response = server.get_auth("/api/users/me/topics", &bob.token).await.unwrap();
    let mine: Vec<Topic> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, bobs.id);

    let response = server.get("/api/users/me/topics").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Nodes
// ============================================================================

#[tokio::test]
async fn test_agree_node_updates_topic_counters() {
    let server = TestServer::start().await.unwrap();
    let alice = server.signed_in("Alice").await.unwrap();
    let bob = server.signed_in("Bob").await.unwrap();
    let topic = create_topic(&server, &alice, &CreateTopic::titled("Four day week")).await;

    let node = create_node(&server, &bob, &CreateNode::new(&topic.id, "agree")).await;
    assert_eq!(node.topic_id, topic.id);
    assert_eq!(node.node_type, "agree");
    assert_eq!(node.author.as_ref().unwrap().display_name, "Bob");

    let topic = fetch_topic(&server, &topic.id).await;
    assert_eq!(topic.agree_count, 1);
    assert_eq!(topic.disagree_count, 0);
    assert_eq!(topic.node_count, 1);
}

#[tokio::test]
async fn test_node_validation_and_reply_rules() {
    let server = TestServer::start().await.unwrap();
    let alice = server.signed_in("Alice").await.unwrap();
    let topic = create_topic(&server, &alice, &CreateTopic::titled("Speed limits")).await;
    let other = create_topic(&server, &alice, &CreateTopic::titled("Parking")).await;
    let foreign = create_node(&server, &alice, &CreateNode::new(&other.id, "neutral")).await;

    let response = server
        .post_auth("/api/nodes", &alice.token, &CreateNode::new(&topic.id, "maybe"))
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let mut empty = CreateNode::new(&topic.id, "agree");
    empty.content = String::new();
    let response = server.post_auth("/api/nodes", &alice.token, &empty).await.unwrap();
    assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();

    let response = server
        .post_auth(
            "/api/nodes",
            &alice.token,
            &CreateNode::new(&topic.id, "agree").reply_to(&foreign.id),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "PARENT_OUTSIDE_TOPIC");

    let response = server
        .post_auth("/api/nodes", &alice.token, &CreateNode::new("987654321", "agree"))
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_non_author_cannot_edit_node() {
    let server = TestServer::start().await.unwrap();
    let alice = server.signed_in("Alice").await.unwrap();
    let carol = server.signed_in("Carol").await.unwrap();
    let topic = create_topic(&server, &alice, &CreateTopic::titled("Night markets")).await;
    let node = create_node(&server, &alice, &CreateNode::new(&topic.id, "agree")).await;

    let response = server
        .patch_auth(
            &format!("/api/nodes/{}", node.id),
            &carol.token,
            &serde_json::json!({ "content": "edited by someone else" }),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "NOT_NODE_AUTHOR");

    let nodes = fetch_nodes(&server, &topic.id).await;
    assert_eq!(nodes[0].content, "An agree response");

    let response = server
        .patch_auth(
            &format!("/api/nodes/{}", node.id),
            &alice.token,
            &serde_json::json!({ "content": "Clarified" }),
        )
        .await
        .unwrap();
    let edited: Node = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(edited.content, "Clarified");
}

#[tokio::test]
async fn test_delete_node_with_replies_keeps_them_attached() {
    let server = TestServer::start().await.unwrap();
    let alice = server.signed_in("Alice").await.unwrap();
    let bob = server.signed_in("Bob").await.unwrap();
    let topic = create_topic(&server, &alice, &CreateTopic::titled("School zones")).await;
    let root = create_node(&server, &alice, &CreateNode::new(&topic.id, "agree")).await;
    for stance in ["agree", "disagree"] {
        create_node(&server, &bob, &CreateNode::new(&topic.id, stance).reply_to(&root.id)).await;
    }

    let response = server
        .delete_auth(&format!("/api/nodes/{}", root.id), &alice.token)
        .await
        .unwrap();
    let result: DeleteResult = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(result.soft_deleted);

    let nodes = fetch_nodes(&server, &topic.id).await;
    assert_eq!(nodes.len(), 3);
    let tombstone = nodes.iter().find(|n| n.id == root.id).unwrap();
    assert!(tombstone.is_deleted);
    assert!(tombstone.author_id.is_none());
    assert!(tombstone.author.is_none());
    assert_eq!(tombstone.reply_count, 2);
    assert_eq!(
        nodes
            .iter()
            .filter(|n| n.parent_id.as_deref() == Some(root.id.as_str()))
            .count(),
        2
    );

    let topic = fetch_topic(&server, &topic.id).await;
    assert_eq!(topic.node_count, 2);

    let response = server
        .post_auth(
            "/api/nodes",
            &bob.token,
            &CreateNode::new(&topic.id, "neutral").reply_to(&root.id),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "PARENT_DELETED");
}

#[tokio::test]
async fn test_promote_node() {
    let server = TestServer::start().await.unwrap();
    let alice = server.signed_in("Alice").await.unwrap();
    let bob = server.signed_in("Bob").await.unwrap();
    let topic = create_topic(&server, &alice, &CreateTopic::titled("Rent caps")).await;
    let node = create_node(&server, &alice, &CreateNode::new(&topic.id, "disagree")).await;

    let response = server
        .post_auth(
            &format!("/api/nodes/{}/promote", node.id),
            &bob.token,
            &serde_json::json!({ "title": "Should rent caps be regional?" }),
        )
        .await
        .unwrap();
    let promoted: Topic = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_ne!(promoted.id, topic.id);
    assert_eq!(promoted.title, "Should rent caps be regional?");
    assert_eq!(promoted.content, node.content);
    assert_eq!(promoted.author_id, Some(bob.id.to_string()));
    assert_eq!(promoted.promoted_from_node_id.as_deref(), Some(node.id.as_str()));
    assert_eq!(promoted.promoted_from_topic_id.as_deref(), Some(topic.id.as_str()));

    let response = server
        .post_auth(
            &format!("/api/nodes/{}/promote", node.id),
            &bob.token,
            &serde_json::json!({ "title": "" }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

// ============================================================================
// Reactions
// ============================================================================

#[tokio::test]
async fn test_like_toggle_round_trip() {
    let server = TestServer::start().await.unwrap();
    let alice = server.signed_in("Alice").await.unwrap();
    let bob = server.signed_in("Bob").await.unwrap();
    let topic = create_topic(&server, &alice, &CreateTopic::titled("Bus lanes")).await;
    let like = ToggleReaction::on_topic(&topic.id, "like");

    let response = server.post_auth("/api/reactions", &bob.token, &like).await.unwrap();
    let reaction: Option<Reaction> = assert_json(response, StatusCode::OK).await.unwrap();
    let reaction = reaction.unwrap();
    assert_eq!(reaction.kind, "like");
    assert!(reaction.node_id.is_none());
    assert_eq!(fetch_topic(&server, &topic.id).await.like_count, 1);

    let response = server.post_auth("/api/reactions", &bob.token, &like).await.unwrap();
    let cleared: Option<Reaction> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(cleared.is_none());
    assert_eq!(fetch_topic(&server, &topic.id).await.like_count, 0);
}

#[tokio::test]
async fn test_node_reactions_and_my_reactions() {
    let server = TestServer::start().await.unwrap();
    let alice = server.signed_in("Alice").await.unwrap();
    let bob = server.signed_in("Bob").await.unwrap();
    let topic = create_topic(&server, &alice, &CreateTopic::titled("Heritage sites")).await;
    let node = create_node(&server, &alice, &CreateNode::new(&topic.id, "agree")).await;

    let like = ToggleReaction::on_node(&topic.id, &node.id, "like");
    server.post_auth("/api/reactions", &bob.token, &like).await.unwrap();
    let dislike = ToggleReaction::on_node(&topic.id, &node.id, "dislike");
    let response = server.post_auth("/api/reactions", &bob.token, &dislike).await.unwrap();
    let switched: Option<Reaction> = assert_json(response, StatusCode::OK).await.unwrap();
    let switched = switched.unwrap();
    assert_eq!(switched.kind, "dislike");
    assert_eq!(switched.topic_id, topic.id);

    let response = server
        .get_auth(&format!("/api/reactions/{}", topic.id), &bob.token)
        .await
        .unwrap();
    let mine: Vec<Reaction> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, switched.id);
    assert_eq!(mine[0].node_id.as_deref(), Some(node.id.as_str()));

    let response = server
        .post_auth("/api/reactions", &bob.token, &serde_json::json!({ "type": "like" }))
        .await
        .unwrap();
    assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
}

// ============================================================================
// Thread view
// ============================================================================

#[tokio::test]
async fn test_thread_view() {
    let server = TestServer::start().await.unwrap();
    let alice = server.signed_in("Alice").await.unwrap();
    let bob = server.signed_in("Bob").await.unwrap();
    let topic = create_topic(&server, &alice, &CreateTopic::titled("Waterfront plan")).await;

    let quiet = create_node(&server, &alice, &CreateNode::new(&topic.id, "neutral")).await;
    let popular = create_node(&server, &bob, &CreateNode::new(&topic.id, "agree")).await;
    let mut parent = popular.id.clone();
    for _ in 0..5 {
        let reply = create_node(
            &server,
            &alice,
            &CreateNode::new(&topic.id, "disagree").reply_to(&parent),
        )
        .await;
        parent = reply.id;
    }
    server
        .post_auth(
            "/api/reactions",
            &alice.token,
            &ToggleReaction::on_node(&topic.id, &popular.id, "like"),
        )
        .await
        .unwrap();

    let response = server
        .get(&format!("/api/topics/{}/thread?sort=likes", topic.id))
        .await
        .unwrap();
    let thread: Thread = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(thread.topic.id, topic.id);
    assert_eq!(thread.sort, "likes");
    assert!(thread.my_reactions.is_none());
    assert_eq!(
        thread
            .nodes
            .iter()
            .filter(|n| n.depth == 0)
            .map(|n| n.id.as_str())
            .collect::<Vec<_>>(),
        vec![popular.id.as_str(), quiet.id.as_str()]
    );

    // display order: the popular chain, then the quiet root
    assert_eq!(thread.nodes.len(), 7);
    assert_eq!(thread.nodes[6].id, quiet.id);
    let chain = &thread.nodes[..6];
    for (depth, pair) in chain.windows(2).enumerate() {
        assert_eq!(pair[1].parent_id.as_deref(), Some(pair[0].id.as_str()));
        assert_eq!(pair[1].depth, depth + 1);
    }
    assert!(chain[3].can_reply);
    assert_eq!(chain[3].depth, 3);
    for deep in &chain[4..] {
        assert!(!deep.can_reply);
        assert_eq!(deep.reply_target_id.as_deref(), Some(chain[3].id.as_str()));
    }

    let response = server
        .get_auth(&format!("/api/topics/{}/thread", topic.id), &alice.token)
        .await
        .unwrap();
    let thread: Thread = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(thread.my_reactions.map(|r| r.len()), Some(1));
}
