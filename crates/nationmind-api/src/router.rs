//! Axum router construction for the REST API.
//!
//! Assembles every resource's routes into a single [`Router`] with CORS
//! open to any origin and a request span per call.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, patch, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{self, events, game, nations, relations, turns};
use crate::state::AppState;

/// Build the complete Axum router.
///
/// Fixed segments such as `/api/nations/summary` take precedence over
/// `/api/nations/{id}`, so registration order does not matter.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/api/health", get(handlers::health))
        .merge(nation_routes())
        .merge(turn_routes())
        .merge(event_routes())
        .merge(relation_routes())
        .merge(game_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn nation_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/nations",
            get(nations::list_nations).post(nations::create_nation),
        )
        .route("/api/nations/summary", get(nations::nations_summary))
        .route("/api/nations/player", get(nations::player_nation))
        .route("/api/nations/ai", get(nations::ai_nations))
        .route(
            "/api/nations/{id}",
            get(nations::get_nation)
                .put(nations::update_nation)
                .delete(nations::delete_nation),
        )
        .route(
            "/api/nations/{id}/resources",
            patch(nations::adjust_resources),
        )
}

fn turn_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/turns", get(turns::list_turns))
        .route("/api/turns/current", get(turns::current_turn))
        .route("/api/turns/number/{turn_number}", get(turns::get_turn_by_number))
        .route("/api/turns/{id}", get(turns::get_turn))
}

fn event_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/events",
            get(events::list_events).post(events::create_event),
        )
        .route("/api/events/recent", get(events::recent_events))
        .route("/api/events/important", get(events::important_events))
        .route("/api/events/turn/{turn_id}", get(events::events_by_turn))
        .route("/api/events/nation/{nation_id}", get(events::events_by_nation))
        .route("/api/events/type/{event_type}", get(events::events_by_type))
        .route("/api/events/{id}", get(events::get_event))
}

fn relation_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/relations",
            get(relations::list_relations).post(relations::create_relation),
        )
        .route(
            "/api/relations/update-or-create",
            post(relations::upsert_relation),
        )
        .route(
            "/api/relations/nation/{nation_id}",
            get(relations::nation_relations),
        )
        .route(
            "/api/relations/nation/{nation_id}/allies",
            get(relations::nation_allies),
        )
        .route(
            "/api/relations/nation/{nation_id}/enemies",
            get(relations::nation_enemies),
        )
        .route(
            "/api/relations/between/{a}/{b}",
            get(relations::relation_between),
        )
        .route(
            "/api/relations/{id}",
            get(relations::get_relation).put(relations::update_relation),
        )
}

fn game_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/game/initialize", post(game::initialize))
        .route("/api/game/state", get(game::game_state))
        .route("/api/game/action", post(game::perform_action))
        .route("/api/game/next-turn", post(game::next_turn))
}
