//! End-to-end tests driving the router in-process against the in-memory
//! store.

#![allow(clippy::panic)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use babylog_gateway::api;
use babylog_gateway::app_state::AppState;
use babylog_gateway::config::ApiSettings;
use babylog_gateway::persistence::{ChildStore, EventStore, MemoryStore, PhotoStore};

const CHILD: &str = "7d1c3f0e-52a4-4c1b-9a57-2f4be0f6a001";

fn app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(
        Arc::clone(&store) as Arc<dyn ChildStore>,
        Arc::clone(&store) as Arc<dyn EventStore>,
        Arc::clone(&store) as Arc<dyn PhotoStore>,
        ApiSettings::default(),
    );
    (api::build_router().with_state(state), store)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    };
    let Ok(request) = request else {
        panic!("bad request for {uri}");
    };
    let Ok(response) = app.clone().oneshot(request).await else {
        panic!("router failed for {uri}");
    };
    let status = response.status();
    let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
        panic!("unreadable body for {uri}");
    };
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

async fn create(app: &Router, body: Value) -> String {
    let uri = format!("/api/v1/children/{CHILD}/events");
    let (status, created) = send(app, Method::POST, &uri, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    let Some(id) = created["id"].as_str() else {
        panic!("no id in {created}");
    };
    id.to_string()
}

async fn attach(app: &Router, category: &str, id: &str, url: &str) {
    let uri = format!("/api/v1/events/{category}/{id}/photos");
    let (status, body) =
        send(app, Method::POST, &uri, Some(json!({ "photoUrls": [url] }))).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
}

/// A feeding at 11:00 and a sleep at 10:00, one photo each.
async fn seeded() -> (Router, Arc<MemoryStore>) {
    let (app, store) = app();
    let feeding = create(
        &app,
        json!({
            "category": "feeding",
            "kind": "bottle",
            "amountMl": 120,
            "timestamp": "2024-06-01T11:00:00Z"
        }),
    )
    .await;
    let sleep = create(
        &app,
        json!({
            "category": "sleep",
            "startTime": "2024-06-01T10:00:00Z",
            "notes": "morning nap"
        }),
    )
    .await;
    attach(&app, "feeding", &feeding, "/uploads/feed.jpg").await;
    attach(&app, "sleep", &sleep, "/uploads/nap.jpg").await;
    (app, store)
}

fn error_code(body: &Value) -> Option<u64> {
    body["error"]["code"].as_u64()
}

#[tokio::test]
async fn all_categories_timeline() {
    let (app, _) = seeded().await;
    let (status, body) = get(
        &app,
        &format!("/api/v1/children/{CHILD}/timeline?page=1&limit=10&category=all"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let Some(entries) = body["entries"].as_array() else {
        panic!("no entries in {body}");
    };
    let categories: Vec<&str> = entries
        .iter()
        .filter_map(|e| e["category"].as_str())
        .collect();
    assert_eq!(categories, vec!["feeding", "sleep"]);
    for entry in entries {
        assert_eq!(entry["photoUrls"].as_array().map(Vec::len), Some(1));
    }
    assert_eq!(body["entries"][0]["occurredAt"], json!("2024-06-01T11:00:00Z"));
    assert_eq!(body["entries"][1]["notes"], json!("morning nap"));
    assert_eq!(
        body["pagination"],
        json!({ "page": 1, "limit": 10, "totalCount": 2, "totalPages": 1 })
    );
}

#[tokio::test]
async fn single_category_timeline_pages() {
    let (app, _) = seeded().await;
    let base = format!("/api/v1/children/{CHILD}/timeline?category=sleep&limit=1");

    let (status, first) = get(&app, &format!("{base}&page=1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["entries"].as_array().map(Vec::len), Some(1));
    assert_eq!(first["entries"][0]["category"], json!("sleep"));
    assert_eq!(first["pagination"]["totalCount"], json!(1));
    assert_eq!(first["pagination"]["totalPages"], json!(1));

    let (status, second) = get(&app, &format!("{base}&page=2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["entries"], json!([]));
    assert_eq!(second["pagination"]["totalCount"], json!(1));
}

#[tokio::test]
async fn window_filters_inclusively() {
    let (app, _) = seeded().await;
    let uri = format!(
        "/api/v1/children/{CHILD}/timeline?startDate=2024-06-01T10:00:00Z&endDate=2024-06-01T10:59:59Z"
    );
    let (status, body) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["totalCount"], json!(1));
    assert_eq!(body["entries"][0]["category"], json!("sleep"));

    let empty = format!(
        "/api/v1/children/{CHILD}/timeline?startDate=2024-05-01&endDate=2024-05-02"
    );
    let (_, body) = get(&app, &empty).await;
    assert_eq!(
        body["pagination"],
        json!({ "page": 1, "limit": 10, "totalCount": 0, "totalPages": 0 })
    );
}

#[tokio::test]
async fn invalid_inputs_are_rejected() {
    let (app, _) = seeded().await;
    let timeline = format!("/api/v1/children/{CHILD}/timeline");

    let (status, body) = get(&app, &format!("{timeline}?category=naps")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), Some(1002));

    let (status, body) = get(
        &app,
        &format!("{timeline}?startDate=2024-06-02&endDate=2024-06-01"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), Some(1003));

    let (status, body) = get(&app, &format!("{timeline}?startDate=yesterday")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), Some(1001));
}

#[tokio::test]
async fn limit_is_clamped() {
    let (app, _) = seeded().await;
    let (_, body) = get(
        &app,
        &format!("/api/v1/children/{CHILD}/timeline?limit=5000"),
    )
    .await;
    assert_eq!(body["pagination"]["limit"], json!(100));

    let (_, body) = get(&app, &format!("/api/v1/children/{CHILD}/timeline?limit=0")).await;
    assert_eq!(body["pagination"]["limit"], json!(1));
    assert_eq!(body["pagination"]["totalPages"], json!(2));
}

#[tokio::test]
async fn delete_cascades_photos() {
    let (app, store) = app();
    let id = create(
        &app,
        json!({ "category": "milestone", "area": "social", "title": "First smile",
                "achievedAt": "2024-06-01T09:00:00Z" }),
    )
    .await;
    attach(&app, "milestone", &id, "/uploads/smile.jpg").await;

    let uri = format!("/api/v1/events/milestone/{id}");
    let (status, body) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["photoUrls"], json!(["/uploads/smile.jpg"]));

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), Some(2001));

    let Ok(uuid) = id.parse() else {
        panic!("id is a uuid");
    };
    let Ok(left) = store
        .find_by_item(babylog_gateway::domain::EventId::from_uuid(uuid), "milestone")
        .await
    else {
        panic!("lookup failed");
    };
    assert!(left.is_empty());
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn writes_record_user_and_derive_sleep_duration() {
    let (app, _) = app();
    let user = "0b7e0f52-8e39-4d4e-bd1e-6f4f8a0c9b11";
    let Ok(request) = Request::builder()
        .method(Method::POST)
        .uri(format!("/api/v1/children/{CHILD}/events"))
        .header("content-type", "application/json")
        .header("x-user-id", user)
        .body(Body::from(
            json!({
                "category": "sleep",
                "startTime": "2024-06-01T13:00:00Z",
                "endTime": "2024-06-01T14:30:00Z"
            })
            .to_string(),
        ))
    else {
        panic!("bad request");
    };
    let Ok(response) = app.clone().oneshot(request).await else {
        panic!("router failed");
    };
    assert_eq!(response.status(), StatusCode::CREATED);
    let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
        panic!("unreadable body");
    };
    let Ok(body) = serde_json::from_slice::<Value>(&bytes) else {
        panic!("not json");
    };
    assert_eq!(body["recordedBy"], json!(user));
    assert_eq!(body["payload"]["durationMinutes"], json!(90));

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/v1/children/{CHILD}/events"),
        Some(json!({
            "category": "sleep",
            "startTime": "2024-06-01T15:00:00Z",
            "endTime": "2024-06-01T14:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), Some(1001));
}

#[tokio::test]
async fn update_keeps_category() {
    let (app, _) = app();
    let id = create(
        &app,
        json!({ "category": "diaper", "timestamp": "2024-06-01T08:00:00Z" }),
    )
    .await;
    let uri = format!("/api/v1/events/diaper/{id}");

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "category": "feeding", "timestamp": "2024-06-01T08:00:00Z" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), Some(1001));

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "category": "diaper", "kind": "dirty",
                     "timestamp": "2024-06-01T08:05:00Z", "notes": "blowout" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payload"]["kind"], json!("dirty"));
    assert_eq!(body["notes"], json!("blowout"));
}

#[tokio::test]
async fn statistics_group_by_day() {
    let (app, _) = seeded().await;
    create(
        &app,
        json!({ "category": "feeding", "timestamp": "2024-06-02T07:00:00Z" }),
    )
    .await;

    let (status, body) = get(
        &app,
        &format!(
            "/api/v1/children/{CHILD}/statistics?category=feeding&startDate=2024-06-01&endDate=2024-06-03"
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "date": "2024-06-01", "count": 1, "totalDuration": 0 },
            { "date": "2024-06-02", "count": 1, "totalDuration": 0 },
        ])
    );

    let (status, body) = get(
        &app,
        &format!("/api/v1/children/{CHILD}/statistics?category=all"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), Some(1002));
}

#[tokio::test]
async fn system_endpoints() {
    let (app, _) = app();
    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("healthy"));

    let (status, body) = get(&app, "/config/categories").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|c| c["category"].as_str())
        .collect();
    assert_eq!(
        names,
        vec![
            "diaper",
            "feeding",
            "nursing",
            "sleep",
            "medication",
            "milestone",
            "measurement",
            "photo"
        ]
    );
}

#[tokio::test]
async fn child_lifecycle_accepts_future_birth_date() {
    let (app, store) = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/children",
        Some(json!({ "name": "Bean", "birthDate": "2099-01-01", "gender": "unknown" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["birthDate"], json!("2099-01-01T00:00:00Z"));
    assert_eq!(body["ageDays"], Value::Null);
    let Some(id) = body["id"].as_str().map(str::to_string) else {
        panic!("no id in {body}");
    };

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/children",
        Some(json!({ "name": " ", "birthDate": "2024-01-01", "gender": "girl" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), Some(1001));

    let child_uri = format!("/api/v1/children/{id}");
    let (status, body) = send(
        &app,
        Method::PUT,
        &child_uri,
        Some(json!({ "name": "Ada", "birthDate": "2024-01-01", "gender": "girl" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["name"], json!("Ada"));
    assert!(body["ageDays"].as_i64().is_some_and(|days| days > 0));

    let (status, body) = get(&app, "/api/v1/children").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/v1/children/{id}/events"),
        Some(json!({ "category": "diaper", "kind": "wet", "timestamp": "2024-06-01T08:00:00Z" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&app, Method::DELETE, &child_uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = get(&app, &child_uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), Some(2002));
    assert!(store.is_empty().await);

    let (_, body) = get(&app, &format!("/api/v1/children/{id}/timeline")).await;
    assert_eq!(body["pagination"]["totalCount"], json!(0));
}
