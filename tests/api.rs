use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use fleetbook::engine::Engine;
use fleetbook::entities::{Booking, Vehicle};
use fleetbook::error::{storage_error, Error};
use fleetbook::server::router;
use fleetbook::store::{MemoryStore, Store};

fn app() -> Router {
    router(Arc::new(Engine::new(MemoryStore::new())))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);

    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();

    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn create_vehicle(app: &Router, name: &str, capacity_kg: u64) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/vehicles",
        Some(json!({ "name": name, "capacityKg": capacity_kg, "tyres": 10 })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    body["data"].clone()
}

#[tokio::test]
async fn vehicle_registration_and_listing() {
    let app = app();

    let vehicle = create_vehicle(&app, "Truck A", 1000).await;
    assert_eq!(vehicle["name"], "Truck A");
    assert_eq!(vehicle["capacityKg"], 1000.0);

    let (status, body) = send(&app, Method::GET, "/api/vehicles", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], json!([vehicle]));
}

#[tokio::test]
async fn vehicle_registration_rejects_bad_input() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/vehicles",
        Some(json!({ "name": "Truck A", "capacityKg": "heavy", "tyres": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("capacityKg"));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/vehicles",
        Some(json!({ "name": "Truck A", "capacityKg": 1000, "tyres": true })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn booking_lifecycle() {
    let app = app();
    let vehicle = create_vehicle(&app, "Truck A", 1000).await;
    let vehicle_id = vehicle["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/booking",
        Some(json!({
            "vehicleId": vehicle_id,
            "fromPincode": "110001",
            "toPincode": 110003,
            "startTime": "2025-08-20T09:00:00Z",
            "customerId": "dummy"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);

    let booking: Booking = serde_json::from_value(body["data"].clone()).unwrap();
    assert_eq!(booking.end_time.to_rfc3339(), "2025-08-20T11:00:00+00:00");

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/vehicles/available?capacity=500&fromPincode=110001&toPincode=110002&startTime=2025-08-20T10:00:00Z",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));

    let (status, body) = send(&app, Method::GET, "/api/booking", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let uri = format!("/api/booking/{}", booking.id);
    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], booking.id.to_string());

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/vehicles/available?capacity=500&fromPincode=110001&toPincode=110002&startTime=2025-08-20T10:00:00Z",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let available: Vec<Vehicle> = serde_json::from_value(body["data"].clone()).unwrap();
    assert_eq!(available.len(), 1);
}

#[tokio::test]
async fn overlapping_booking_is_a_conflict() {
    let app = app();
    let vehicle = create_vehicle(&app, "Truck A", 1000).await;
    let vehicle_id = vehicle["id"].as_str().unwrap();

    let booking = |start: &str| {
        json!({
            "vehicleId": vehicle_id,
            "fromPincode": "110001",
            "toPincode": "560001",
            "startTime": start,
            "customerId": "dummy"
        })
    };

    let (status, _) = send(&app, Method::POST, "/api/booking", Some(booking("2025-08-20T10:00:00Z"))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, Method::POST, "/api/booking", Some(booking("2025-08-20T10:30:00Z"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);

    let (status, _) = send(&app, Method::POST, "/api/booking", Some(booking("2025-08-20T11:00:00Z"))).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn minute_precision_booking_conflicts_with_covering_ride() {
    let app = app();
    let vehicle = create_vehicle(&app, "Truck A", 1000).await;
    let vehicle_id = vehicle["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/booking",
        Some(json!({
            "vehicleId": vehicle_id,
            "fromPincode": "110001",
            "toPincode": "110003",
            "startTime": "2025-08-20T09:00Z",
            "customerId": "dummy"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let booking: Booking = serde_json::from_value(body["data"].clone()).unwrap();
    assert_eq!(booking.start_time.to_rfc3339(), "2025-08-20T09:00:00+00:00");
    assert_eq!(booking.end_time.to_rfc3339(), "2025-08-20T11:00:00+00:00");

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/vehicles/available?capacity=500&fromPincode=110001&toPincode=560001&startTime=2025-08-20T10:00Z",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/booking",
        Some(json!({
            "vehicleId": vehicle_id,
            "fromPincode": "110001",
            "toPincode": "560001",
            "startTime": "2025-08-20T10:00Z",
            "customerId": "dummy"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn booking_unknown_vehicle_is_not_found() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/booking",
        Some(json!({
            "vehicleId": Uuid::new_v4().to_string(),
            "fromPincode": "110001",
            "toPincode": "560001",
            "startTime": "2025-08-20T10:00:00Z",
            "customerId": "dummy"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn booking_with_missing_fields_is_rejected() {
    let app = app();

    let (status, body) = send(&app, Method::POST, "/api/booking", Some(json!({ "vehicleId": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("vehicleId"));
}

#[tokio::test]
async fn availability_requires_every_parameter() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/vehicles/available?capacity=500&fromPincode=110001&toPincode=110002",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("startTime"));
}

struct BrokenStore;

#[async_trait]
impl Store for BrokenStore {
    async fn insert_vehicle(&self, _: &Vehicle) -> Result<(), Error> {
        Err(storage_error("connection refused"))
    }

    async fn list_vehicles(&self) -> Result<Vec<Vehicle>, Error> {
        Err(storage_error("connection refused"))
    }

    async fn vehicles_with_capacity(&self, _: f64) -> Result<Vec<Vehicle>, Error> {
        Err(storage_error("connection refused"))
    }

    async fn list_bookings(&self) -> Result<Vec<Booking>, Error> {
        Err(storage_error("connection refused"))
    }

    async fn bookings_for_vehicle(&self, _: Uuid) -> Result<Vec<Booking>, Error> {
        Err(storage_error("connection refused"))
    }

    async fn insert_booking(&self, _: &Booking) -> Result<(), Error> {
        Err(storage_error("connection refused"))
    }

    async fn delete_booking(&self, _: Uuid) -> Result<Option<Booking>, Error> {
        Err(storage_error("connection refused"))
    }
}

#[tokio::test]
async fn storage_failures_are_server_errors() {
    let app = router(Arc::new(Engine::new(BrokenStore)));

    let (status, body) = send(&app, Method::GET, "/api/booking", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("connection refused"));

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/booking",
        Some(json!({
            "vehicleId": Uuid::new_v4().to_string(),
            "fromPincode": "110001",
            "toPincode": "560001",
            "startTime": "2025-08-20T10:00:00Z",
            "customerId": "dummy"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn malformed_booking_id_never_reaches_the_store() {
    let app = router(Arc::new(Engine::new(BrokenStore)));

    let (status, body) = send(&app, Method::DELETE, "/api/booking/64e0c1f2a9b8", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}
