//! Route definitions
//!
//! API routes are mounted under /api; health probes live at the root.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{auth, health, nodes, reactions, topics, users};
use crate::state::AppState;

/// Main router: API plus health probes
pub fn create_router() -> Router<AppState> {
    Router::new()
        .nest("/api", api_routes())
        .merge(health_routes())
}

pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(topic_routes())
        .merge(node_routes())
        .merge(reaction_routes())
        .merge(user_routes())
}

fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth/user", get(auth::current_user))
}

fn topic_routes() -> Router<AppState> {
    Router::new()
        .route("/topics", get(topics::list_topics).post(topics::create_topic))
        .route("/topics/search", get(topics::search_topics))
        .route(
            "/topics/:id",
            get(topics::get_topic)
                .patch(topics::update_topic)
                .delete(topics::delete_topic),
        )
        .route("/topics/:id/thread", get(topics::get_thread))
}

fn node_routes() -> Router<AppState> {
    Router::new()
        .route("/nodes", post(nodes::create_node))
        .route(
            "/nodes/:id",
            get(nodes::get_topic_nodes)
                .patch(nodes::update_node)
                .delete(nodes::delete_node),
        )
        .route("/nodes/:id/promote", post(nodes::promote_node))
}

fn reaction_routes() -> Router<AppState> {
    Router::new()
        .route("/reactions", post(reactions::toggle_reaction))
        .route("/reactions/:id", get(reactions::get_my_reactions))
}

fn user_routes() -> Router<AppState> {
    Router::new().route("/users/me/topics", get(users::get_my_topics))
}
