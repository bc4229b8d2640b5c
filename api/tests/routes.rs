use std::sync::Arc;

use api::route::v1;
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Local};
use http_body_util::BodyExt;
use kernel::{
    gateway::{PaymentGateway, PaymentHandle},
    model::id::{BookingId, UserId},
};
use registry::AppRegistry;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use shared::{
    config::{BookingConfig, PaymentConfig},
    error::AppResult,
};
use tower::ServiceExt;

struct AcceptingGateway;

#[async_trait]
impl PaymentGateway for AcceptingGateway {
    async fn initiate_payment(&self, booking_id: BookingId, _amount: Decimal) -> AppResult<PaymentHandle> {
        Ok(PaymentHandle {
            payment_id: format!("pay_{booking_id}"),
            redirect_url: format!("https://pay.example/checkout/{booking_id}"),
        })
    }
}

fn app() -> Router {
    let registry = AppRegistry::in_memory_with_gateway(
        Arc::new(AcceptingGateway),
        BookingConfig::default(),
        &PaymentConfig::default(),
    );
    v1::routes().with_state(registry)
}

struct Caller {
    id: UserId,
    role: &'static str,
}

impl Caller {
    fn mentor() -> Self {
        Self {
            id: UserId::new(),
            role: "mentor",
        }
    }

    fn mentee() -> Self {
        Self {
            id: UserId::new(),
            role: "mentee",
        }
    }
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    caller: Option<&Caller>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(caller) = caller {
        builder = builder
            .header("X-User-Id", caller.id.to_string())
            .header("X-User-Role", caller.role);
    }
    let req = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn in_two_days() -> String {
    (Local::now().date_naive() + Duration::days(2)).to_string()
}

async fn create_schedule(app: &Router, mentor: &Caller) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/schedules",
        Some(mentor),
        Some(json!({ "date": in_two_days(), "price": "500000", "slotIds": [2] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["scheduleId"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_and_catalog_are_served() {
    let app = app();

    let (status, _) = send(&app, Method::GET, "/api/v1/health", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, "/api/v1/time-slots", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 15);
    assert_eq!(items[0]["label"], "08:00-09:00");
}

#[tokio::test]
async fn identity_headers_are_required() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/v1/bookings", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthenticated");
}

#[tokio::test]
async fn mentees_cannot_publish_schedules() {
    let app = app();
    let mentee = Caller::mentee();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/schedules",
        Some(&mentee),
        Some(json!({ "date": in_two_days(), "price": "500000", "slotIds": [2] })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "authorization");
}

#[tokio::test]
async fn empty_slot_list_is_rejected() {
    let app = app();
    let mentor = Caller::mentor();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/schedules",
        Some(&mentor),
        Some(json!({ "date": in_two_days(), "price": "500000", "slotIds": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation");
}

#[tokio::test]
async fn booking_lifecycle_over_http() {
    let app = app();
    let mentor = Caller::mentor();
    let first = Caller::mentee();
    let second = Caller::mentee();
    let schedule_id = create_schedule(&app, &mentor).await;
    let reserve_uri = format!("/api/v1/schedules/{schedule_id}/bookings");
    let reserve_body = json!({
        "description": "I want to discuss visa options",
        "service": "PROCEDURES",
    });

    let (status, body) = send(
        &app,
        Method::POST,
        &reserve_uri,
        Some(&first),
        Some(reserve_body.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["booking"]["status"], "PENDING");
    assert!(body["payment"]["redirectUrl"]
        .as_str()
        .unwrap()
        .starts_with("https://pay.example/checkout/"));
    let booking_id = body["booking"]["bookingId"].as_str().unwrap().to_string();

    let (status, body) =
        send(&app, Method::POST, &reserve_uri, Some(&second), Some(reserve_body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "already_booked");
    assert_eq!(body["retryable"], true);

    let status_uri = format!("/api/v1/bookings/{booking_id}/status");
    let (status, _) = send(
        &app,
        Method::PUT,
        &status_uri,
        Some(&first),
        Some(json!({ "status": "CONFIRMED" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    for target in ["CONFIRMED", "COMPLETED"] {
        let (status, body) = send(
            &app,
            Method::PUT,
            &status_uri,
            Some(&mentor),
            Some(json!({ "status": target })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], target);
    }

    let (status, body) = send(
        &app,
        Method::PUT,
        &status_uri,
        Some(&mentor),
        Some(json!({ "status": "CANCELLED", "reason": "too late" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invalid_transition");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/bookings/{booking_id}/review"),
        Some(&first),
        Some(json!({ "rating": 5, "comment": "Very helpful session" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["review"]["rating"], 5);

    let (status, body) = send(&app, Method::GET, "/api/v1/activity", Some(&mentor), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["completed"].as_array().unwrap().len(), 1);
    assert!(body["pending"].as_array().unwrap().is_empty());

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/api/v1/bookings/{booking_id}"),
        Some(&second),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn booked_schedules_leave_the_availability_listing() {
    let app = app();
    let mentor = Caller::mentor();
    let mentee = Caller::mentee();
    let schedule_id = create_schedule(&app, &mentor).await;
    let availability_uri = format!("/api/v1/mentors/{}/availability?horizonDays=7", mentor.id);

    let (status, body) = send(&app, Method::GET, &availability_uri, Some(&mentee), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["days"][0]["schedules"][0]["scheduleId"], schedule_id);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/v1/schedules/{schedule_id}/bookings"),
        Some(&mentee),
        Some(json!({
            "description": "Preparing for a job interview",
            "service": "CAREER",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(&app, Method::GET, &availability_uri, Some(&mentee), None).await;
    assert!(body["days"].as_array().unwrap().is_empty());

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/schedules/{schedule_id}"),
        Some(&mentor),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn unknown_service_category_is_a_validation_error() {
    let app = app();
    let mentor = Caller::mentor();
    let mentee = Caller::mentee();
    let schedule_id = create_schedule(&app, &mentor).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/v1/schedules/{schedule_id}/bookings"),
        Some(&mentee),
        Some(json!({
            "description": "I want to discuss visa options",
            "service": "ASTROLOGY",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation");
}
