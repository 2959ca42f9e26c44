use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use shared_utils::extractor::identity_middleware;
use shared_utils::state::AppState;

use crate::handlers;

pub fn booking_routes(state: AppState) -> Router {
    // All booking operations require a caller identity
    let protected_routes = Router::new()
        .route("/", post(handlers::create_booking))
        .route("/my-bookings", get(handlers::get_my_bookings))
        .route("/{booking_id}/status", patch(handlers::update_booking_status))
        .layer(middleware::from_fn(identity_middleware));

    Router::new()
        .merge(protected_routes)
        .with_state(state)
}
