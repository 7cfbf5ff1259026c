//! End-to-end API flow through the full router (auth middleware, role
//! gate, booking engine, review gate, payment tracker).
//! Run: cargo test -p lodge-server --test api_flow

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use lodge_server::auth::{JwtConfig, JwtService};
use lodge_server::core::{Config, ServerState, build_app_with_state};
use lodge_server::db::DbService;
use lodge_server::db::models::{UserCreate, UserRole};
use lodge_server::db::repository::UserRepository;

struct TestApp {
    _tmp: TempDir,
    app: Router,
}

async fn test_app() -> TestApp {
    let tmp = tempfile::tempdir().unwrap();
    let config = Config {
        work_dir: tmp.path().to_string_lossy().to_string(),
        http_port: 0,
        jwt: JwtConfig {
            secret: "integration-test-secret-32-bytes-min!".to_string(),
            expiration_minutes: 60,
            issuer: "lodge-server".to_string(),
            audience: "lodge-clients".to_string(),
        },
        environment: "test".to_string(),
        admin_username: "admin".to_string(),
        admin_password: None,
    };
    config.ensure_work_dir_structure().unwrap();

    let db_service = DbService::new(&config.database_dir()).await.unwrap();
    let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
    let state = ServerState::new(config, db_service.db, jwt_service);

    // Seed an admin account directly; registration only produces members
    UserRepository::new(state.get_db())
        .create(UserCreate {
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            password: "admin-password-123".to_string(),
            full_name: Some("Administrator".to_string()),
            role: UserRole::Admin,
        })
        .await
        .unwrap();

    let app = build_app_with_state(state);
    TestApp { _tmp: tmp, app }
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&v).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn login(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["token"].as_str().unwrap().to_string()
}

async fn register_member(app: &Router, username: &str, password: &str) {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": password,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "register failed: {}", body);
    assert_eq!(body["role"], "member");
}

async fn create_room(app: &Router, admin_token: &str, number: &str, price: f64) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/admin/rooms",
        Some(admin_token),
        Some(json!({
            "room_number": number,
            "type": "double",
            "price": price,
            "capacity": 2,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "room create failed: {}", body);
    body["id"].as_str().unwrap().to_string()
}

fn booking_payload(room_id: &str, check_in: &str, check_out: &str) -> Value {
    json!({
        "room": room_id,
        "check_in": check_in,
        "check_out": check_out,
        "guest_name": "Test Guest",
        "guest_email": "guest@example.com",
        "num_guests": 2,
    })
}

#[tokio::test]
async fn auth_and_role_gates() {
    let t = test_app().await;

    // Public routes are reachable without a token
    let (status, _) = send(&t.app, "GET", "/api/rooms", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&t.app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);

    // Member routes require a token
    let (status, _) = send(&t.app, "GET", "/api/member/bookings", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Garbage tokens are rejected
    let (status, _) = send(
        &t.app,
        "GET",
        "/api/member/bookings",
        Some("not-a-jwt"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Members cannot reach admin routes
    register_member(&t.app, "mallory", "mallory-password").await;
    let member_token = login(&t.app, "mallory", "mallory-password").await;
    let (status, _) = send(
        &t.app,
        "GET",
        "/api/admin/bookings",
        Some(&member_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Admins can
    let admin_token = login(&t.app, "admin", "admin-password-123").await;
    let (status, _) = send(
        &t.app,
        "GET",
        "/api/admin/bookings",
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Wrong password is a 400 with a uniform message
    let (status, body) = send(
        &t.app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "mallory", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid username or password");
}

#[tokio::test]
async fn booking_lifecycle_over_http() {
    let t = test_app().await;
    register_member(&t.app, "alice", "alice-password-1").await;
    let member = login(&t.app, "alice", "alice-password-1").await;
    let admin = login(&t.app, "admin", "admin-password-123").await;
    let room_id = create_room(&t.app, &admin, "101", 100.0).await;

    // Two nights at 100/night totals 200, with deterministic defaults
    let (status, booking) = send(
        &t.app,
        "POST",
        "/api/member/bookings",
        Some(&member),
        Some(booking_payload(&room_id, "2025-01-01", "2025-01-03")),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "booking failed: {}", booking);
    assert_eq!(booking["total_price"], 200.0);
    assert_eq!(booking["booking_status"], "confirmed");
    assert_eq!(booking["payment_status"], "pending");
    let booking_id = booking["id"].as_str().unwrap().to_string();

    // Overlapping request is refused with 409
    let (status, _) = send(
        &t.app,
        "POST",
        "/api/member/bookings",
        Some(&member),
        Some(booking_payload(&room_id, "2025-01-02", "2025-01-04")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // check_out <= check_in is refused with 400
    let (status, _) = send(
        &t.app,
        "POST",
        "/api/member/bookings",
        Some(&member),
        Some(booking_payload(&room_id, "2025-01-03", "2025-01-03")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Back-to-back stay is accepted
    let (status, _) = send(
        &t.app,
        "POST",
        "/api/member/bookings",
        Some(&member),
        Some(booking_payload(&room_id, "2025-01-03", "2025-01-05")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Cancel once: ok. Cancel twice: business rule violation.
    let cancel_uri = format!("/api/member/bookings/{}/cancel", booking_id);
    let (status, cancelled) = send(&t.app, "PUT", &cancel_uri, Some(&member), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["booking_status"], "cancelled");
    let (status, _) = send(&t.app, "PUT", &cancel_uri, Some(&member), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Cancelled + unpaid bookings can be deleted
    let (status, _) = send(
        &t.app,
        "DELETE",
        &format!("/api/member/bookings/{}", booking_id),
        Some(&member),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Booking a room that does not exist is a 404
    let (status, _) = send(
        &t.app,
        "POST",
        "/api/member/bookings",
        Some(&member),
        Some(booking_payload("room:doesnotexist", "2025-02-01", "2025-02-03")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn strangers_cannot_touch_other_bookings() {
    let t = test_app().await;
    register_member(&t.app, "owner", "owner-password-1").await;
    register_member(&t.app, "intruder", "intruder-pass-1").await;
    let owner = login(&t.app, "owner", "owner-password-1").await;
    let intruder = login(&t.app, "intruder", "intruder-pass-1").await;
    let admin = login(&t.app, "admin", "admin-password-123").await;
    let room_id = create_room(&t.app, &admin, "202", 90.0).await;

    let (_, booking) = send(
        &t.app,
        "POST",
        "/api/member/bookings",
        Some(&owner),
        Some(booking_payload(&room_id, "2025-04-01", "2025-04-03")),
    )
    .await;
    let booking_id = booking["id"].as_str().unwrap();

    let (status, _) = send(
        &t.app,
        "PUT",
        &format!("/api/member/bookings/{}/cancel", booking_id),
        Some(&intruder),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn review_gate_over_http() {
    let t = test_app().await;
    register_member(&t.app, "bob", "bob-password-12").await;
    let member = login(&t.app, "bob", "bob-password-12").await;
    let admin = login(&t.app, "admin", "admin-password-123").await;
    let room_id = create_room(&t.app, &admin, "303", 110.0).await;

    let (_, booking) = send(
        &t.app,
        "POST",
        "/api/member/bookings",
        Some(&member),
        Some(booking_payload(&room_id, "2025-06-01", "2025-06-04")),
    )
    .await;
    let booking_id = booking["id"].as_str().unwrap().to_string();

    // Reviews require a completed stay
    let review = json!({ "booking": booking_id, "rating": 5, "comment": "Great stay" });
    let (status, _) = send(
        &t.app,
        "POST",
        "/api/member/reviews",
        Some(&member),
        Some(review.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Admin marks the stay completed
    let (status, _) = send(
        &t.app,
        "PUT",
        &format!("/api/admin/bookings/{}/status", booking_id),
        Some(&admin),
        Some(json!({ "status": "completed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Out-of-range ratings are refused
    for rating in [0, 6] {
        let (status, _) = send(
            &t.app,
            "POST",
            "/api/member/reviews",
            Some(&member),
            Some(json!({ "booking": booking_id, "rating": rating })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "rating {}", rating);
    }

    // First review lands, second one is a duplicate
    let (status, created) = send(
        &t.app,
        "POST",
        "/api/member/reviews",
        Some(&member),
        Some(review.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["rating"], 5);
    let (status, _) = send(
        &t.app,
        "POST",
        "/api/member/reviews",
        Some(&member),
        Some(review),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // The review shows up on the room's public listing
    let (status, listed) = send(
        &t.app,
        "GET",
        &format!("/api/reviews/room/{}", room_id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    // Completed bookings can no longer be cancelled
    let (status, _) = send(
        &t.app,
        "PUT",
        &format!("/api/member/bookings/{}/cancel", booking_id),
        Some(&member),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn payment_flow_over_http() {
    let t = test_app().await;
    register_member(&t.app, "carol", "carol-password-1").await;
    let member = login(&t.app, "carol", "carol-password-1").await;
    let admin = login(&t.app, "admin", "admin-password-123").await;
    let room_id = create_room(&t.app, &admin, "404", 100.0).await;

    let (_, booking) = send(
        &t.app,
        "POST",
        "/api/member/bookings",
        Some(&member),
        Some(booking_payload(&room_id, "2025-07-01", "2025-07-03")),
    )
    .await;
    let booking_id = booking["id"].as_str().unwrap().to_string();

    // Payment snapshots the booking's total
    let (status, payment) = send(
        &t.app,
        "POST",
        "/api/member/payments",
        Some(&member),
        Some(json!({ "booking": booking_id, "method": "card" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "payment create failed: {}", payment);
    assert_eq!(payment["amount"], 200.0);
    assert_eq!(payment["status"], "pending");
    assert!(payment["transaction_id"].as_str().unwrap().starts_with("TRX-"));
    let payment_id = payment["id"].as_str().unwrap().to_string();

    // Processing settles payment and booking together
    let (status, settled) = send(
        &t.app,
        "POST",
        &format!("/api/member/payments/{}/process", payment_id),
        Some(&member),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settled["status"], "success");

    let (status, fetched) = send(
        &t.app,
        "GET",
        &format!("/api/admin/bookings/{}", booking_id),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["payment_status"], "paid");

    // A settled payment cannot be processed twice
    let (status, _) = send(
        &t.app,
        "POST",
        &format!("/api/member/payments/{}/process", payment_id),
        Some(&member),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Paid bookings cannot be deleted even after cancellation attempts
    let (status, _) = send(
        &t.app,
        "DELETE",
        &format!("/api/member/bookings/{}", booking_id),
        Some(&member),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn availability_search_over_http() {
    let t = test_app().await;
    register_member(&t.app, "dave", "dave-password-12").await;
    let member = login(&t.app, "dave", "dave-password-12").await;
    let admin = login(&t.app, "admin", "admin-password-123").await;
    let room_a = create_room(&t.app, &admin, "501", 100.0).await;
    let _room_b = create_room(&t.app, &admin, "502", 100.0).await;

    send(
        &t.app,
        "POST",
        "/api/member/bookings",
        Some(&member),
        Some(booking_payload(&room_a, "2025-09-10", "2025-09-12")),
    )
    .await;

    // Overlapping window: only the free room is listed (public route)
    let (status, body) = send(
        &t.app,
        "POST",
        "/api/rooms/available",
        None,
        Some(json!({ "check_in": "2025-09-11", "check_out": "2025-09-13" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["room_number"], "502");

    // Inverted range is refused
    let (status, _) = send(
        &t.app,
        "POST",
        "/api/rooms/available",
        None,
        Some(json!({ "check_in": "2025-09-13", "check_out": "2025-09-11" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
