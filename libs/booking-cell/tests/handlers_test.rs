use axum::{
    body::Body,
    http::{request::Builder, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use booking_cell::router::booking_routes;
use dietitian_cell::router::dietitian_routes;
use shared_utils::test_utils::{monday_rule, TestContext, TestUser};

fn create_test_app(context: &TestContext) -> Router {
    booking_routes(context.state.clone())
}

fn authed(builder: Builder, user: &TestUser) -> Builder {
    user.identity_headers()
        .into_iter()
        .fold(builder, |builder, (name, value)| builder.header(name, value))
}

fn json_request(builder: Builder, body: Value) -> Request<Body> {
    builder
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn booking_body(dietitian: Uuid, start: &str, end: &str) -> Value {
    json!({
        "dietitianId": dietitian,
        "date": "2024-06-03",
        "timeSlot": {"start": start, "end": end},
        "consultationType": "video",
        "goals": ["better sleep"]
    })
}

#[tokio::test]
async fn test_create_booking_returns_created() {
    let context = TestContext::new();
    let (_, dietitian) = context.seed_dietitian(vec![monday_rule("09:00", "11:00")]).await;
    let client = context.seed_client("client@example.com").await;

    let response = create_test_app(&context)
        .oneshot(json_request(
            authed(Request::builder().method("POST").uri("/"), &client),
            booking_body(dietitian.id, "09:00", "09:30"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Booking created");
    assert_eq!(json["booking"]["status"], "pending");
    assert_eq!(json["booking"]["consultationType"], "video");
    assert_eq!(json["booking"]["timeSlot"], json!({"start": "09:00", "end": "09:30"}));
    assert_eq!(json["booking"]["dietitianInfo"]["name"], dietitian.name);
    assert_eq!(json["booking"]["userInfo"]["email"], "client@example.com");
}

#[tokio::test]
async fn test_create_booking_requires_identity() {
    let context = TestContext::new();
    let (_, dietitian) = context.seed_dietitian(vec![monday_rule("09:00", "11:00")]).await;

    let response = create_test_app(&context)
        .oneshot(json_request(
            Request::builder().method("POST").uri("/"),
            booking_body(dietitian.id, "09:00", "09:30"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(context.store.booking_count().await, 0);
}

#[tokio::test]
async fn test_double_booking_is_a_bad_request() {
    let context = TestContext::new();
    let (_, dietitian) = context.seed_dietitian(vec![monday_rule("09:00", "11:00")]).await;
    let first = context.seed_client("first@example.com").await;
    let second = context.seed_client("second@example.com").await;

    let response = create_test_app(&context)
        .oneshot(json_request(
            authed(Request::builder().method("POST").uri("/"), &first),
            booking_body(dietitian.id, "09:00", "09:30"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = create_test_app(&context)
        .oneshot(json_request(
            authed(Request::builder().method("POST").uri("/"), &second),
            booking_body(dietitian.id, "09:00", "09:30"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({"error": "Slot already booked"}));
}

#[tokio::test]
async fn test_create_booking_error_statuses() {
    let context = TestContext::new();
    let client = context.seed_client("client@example.com").await;

    let response = create_test_app(&context)
        .oneshot(json_request(
            authed(Request::builder().method("POST").uri("/"), &client),
            booking_body(Uuid::new_v4(), "09:00", "09:30"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = create_test_app(&context)
        .oneshot(json_request(
            authed(Request::builder().method("POST").uri("/"), &client),
            json!({"date": "2024-06-03"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_status_update_endpoint() {
    let context = TestContext::new();
    let (owner, dietitian) = context.seed_dietitian(vec![monday_rule("09:00", "11:00")]).await;
    let client = context.seed_client("client@example.com").await;

    let response = create_test_app(&context)
        .oneshot(json_request(
            authed(Request::builder().method("POST").uri("/"), &client),
            booking_body(dietitian.id, "10:00", "10:30"),
        ))
        .await
        .unwrap();
    let booking_id = body_json(response).await["booking"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let stranger = context.seed_client("stranger@example.com").await;
    let response = create_test_app(&context)
        .oneshot(json_request(
            authed(
                Request::builder().method("PATCH").uri(format!("/{}/status", booking_id)),
                &stranger,
            ),
            json!({"status": "cancelled"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = create_test_app(&context)
        .oneshot(json_request(
            authed(
                Request::builder().method("PATCH").uri(format!("/{}/status", booking_id)),
                &owner,
            ),
            json!({"status": "confirmed"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Booking status updated");
    assert_eq!(json["booking"]["status"], "confirmed");

    let response = create_test_app(&context)
        .oneshot(json_request(
            authed(
                Request::builder().method("PATCH").uri(format!("/{}/status", booking_id)),
                &owner,
            ),
            json!({"status": "pending"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = create_test_app(&context)
        .oneshot(json_request(
            authed(
                Request::builder().method("PATCH").uri(format!("/{}/status", Uuid::new_v4())),
                &owner,
            ),
            json!({"status": "confirmed"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_my_bookings_endpoint_only_lists_the_caller() {
    let context = TestContext::new();
    let (_, dietitian) = context.seed_dietitian(vec![monday_rule("09:00", "11:00")]).await;
    let client = context.seed_client("client@example.com").await;
    let other = context.seed_client("other@example.com").await;

    for (user, start, end) in [(&client, "09:00", "09:30"), (&other, "09:30", "10:00")] {
        let response = create_test_app(&context)
            .oneshot(json_request(
                authed(Request::builder().method("POST").uri("/"), user),
                booking_body(dietitian.id, start, end),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = create_test_app(&context)
        .oneshot(
            authed(Request::builder().uri("/my-bookings"), &client)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let bookings = json.as_array().unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0]["user"], client.id.to_string());
    assert_eq!(bookings[0]["dietitianInfo"]["id"], dietitian.id.to_string());
}

#[tokio::test]
async fn test_monday_booking_flow_end_to_end() {
    let context = TestContext::new();
    let (owner, dietitian) = context.seed_dietitian(vec![monday_rule("09:00", "11:00")]).await;
    let client = context.seed_client("client@example.com").await;
    let slots_app = dietitian_routes(context.state.clone());
    let slots_uri = format!("/{}/available-slots?date=2024-06-03", dietitian.id);

    let response = slots_app
        .clone()
        .oneshot(Request::builder().uri(&slots_uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(body_json(response).await["availableSlots"].as_array().unwrap().len(), 4);

    let response = create_test_app(&context)
        .oneshot(json_request(
            authed(Request::builder().method("POST").uri("/"), &client),
            booking_body(dietitian.id, "09:30", "10:00"),
        ))
        .await
        .unwrap();
    let booking_id = body_json(response).await["booking"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = create_test_app(&context)
        .oneshot(json_request(
            authed(
                Request::builder().method("PATCH").uri(format!("/{}/status", booking_id)),
                &owner,
            ),
            json!({"status": "confirmed"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = slots_app
        .clone()
        .oneshot(Request::builder().uri(&slots_uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let starts: Vec<Value> = body_json(response).await["availableSlots"]
        .as_array()
        .unwrap()
        .iter()
        .map(|slot| slot["start"].clone())
        .collect();
    assert_eq!(starts, vec![json!("09:00"), json!("10:00"), json!("10:30")]);

    let response = create_test_app(&context)
        .oneshot(json_request(
            authed(
                Request::builder().method("PATCH").uri(format!("/{}/status", booking_id)),
                &client,
            ),
            json!({"status": "cancelled"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = slots_app
        .oneshot(Request::builder().uri(&slots_uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(body_json(response).await["availableSlots"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_malformed_booking_body_is_a_json_validation_error() {
    let context = TestContext::new();
    let (_, dietitian) = context.seed_dietitian(vec![monday_rule("09:00", "11:00")]).await;
    let client = context.seed_client("client@example.com").await;

    for body in [
        json!({
            "dietitianId": dietitian.id,
            "date": "2024-06-03",
            "timeSlot": {"start": "09:00", "end": "09:30"},
            "consultationType": "phone"
        }),
        json!({
            "dietitianId": dietitian.id,
            "date": "2024-06-03",
            "timeSlot": {"start": "09:00", "end": "09:30"},
            "goals": "eat more greens"
        }),
    ] {
        let response = create_test_app(&context)
            .oneshot(json_request(
                authed(Request::builder().method("POST").uri("/"), &client),
                body,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());
    }

    assert_eq!(context.store.booking_count().await, 0);
}

#[tokio::test]
async fn test_status_update_with_malformed_booking_id_is_not_found() {
    let context = TestContext::new();
    let client = context.seed_client("client@example.com").await;

    let response = create_test_app(&context)
        .oneshot(json_request(
            authed(
                Request::builder().method("PATCH").uri("/not-a-booking/status"),
                &client,
            ),
            json!({"status": "cancelled"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_json(response).await["error"].is_string());
}
