use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use booking_cell::router::booking_routes;
use dietitian_cell::router::dietitian_routes;
use shared_utils::state::AppState;

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "OK",
        "message": "NutriNexus API is running",
        "store": state.store.backend_name(),
        "aiEnabled": state.config.ai.is_enabled()
    }))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .with_state(state.clone())
        .nest("/api/dietitian", dietitian_routes(state.clone()))
        .nest("/api/booking", booking_routes(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use shared_utils::test_utils::{monday_rule, TestContext};
    use tower::ServiceExt;

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn health_reports_store_and_ai() {
        let context = TestContext::new();
        let (status, json) = get_json(create_router(context.state.clone()), "/api/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "OK");
        assert_eq!(json["store"], "memory");
        assert_eq!(json["aiEnabled"], false);
    }

    #[tokio::test]
    async fn cells_are_mounted_under_api() {
        let context = TestContext::new();
        let (_, dietitian) = context.seed_dietitian(vec![monday_rule("09:00", "10:00")]).await;
        let app = create_router(context.state.clone());

        let (status, json) = get_json(
            app.clone(),
            &format!("/api/dietitian/{}/available-slots?date=2024-06-03", dietitian.id),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["availableSlots"].as_array().unwrap().len(), 2);

        let (status, json) = get_json(app, "/api/booking/my-bookings").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(json["error"].is_string());
    }
}
