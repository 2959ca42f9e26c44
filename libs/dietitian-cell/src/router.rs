use axum::{
    middleware,
    routing::{get, put},
    Router,
};

use shared_utils::extractor::identity_middleware;
use shared_utils::state::AppState;

use crate::handlers;

pub fn dietitian_routes(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(handlers::list_dietitians))
        .route("/{dietitian_id}", get(handlers::get_dietitian))
        .route("/{dietitian_id}/available-slots", get(handlers::get_available_slots));

    // Routes for the dietitian's own profile
    let protected_routes = Router::new()
        .route("/profile", put(handlers::update_profile))
        .route("/dashboard/me", get(handlers::get_dashboard))
        .layer(middleware::from_fn(identity_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
