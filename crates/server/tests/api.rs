use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use server::{ServerState, router};

fn app() -> Router {
    let engine = Engine::builder().build().unwrap();
    router(ServerState::new(engine))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

async fn spending(app: &Router, id: &str) -> (StatusCode, Value) {
    send(app, Method::GET, &format!("/dispenser/{id}/spending"), None).await
}

async fn create(app: &Router, flow_volume: f64) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/dispenser",
        Some(json!({ "flow_volume": flow_volume })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["id"].as_str().unwrap().to_string()
}

async fn set_status(app: &Router, id: &str, status: &str, updated_at: &str) -> (StatusCode, Value) {
    send(
        app,
        Method::PUT,
        &format!("/dispenser/{id}/status"),
        Some(json!({ "status": status, "updated_at": updated_at })),
    )
    .await
}

#[tokio::test]
async fn create_dispenser_returns_id_and_flow_volume() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/dispenser",
        Some(json!({ "flow_volume": 0.0653 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["flow_volume"], 0.0653);
    assert!(body["id"].as_str().is_some());
}

#[tokio::test]
async fn create_dispenser_rejects_bad_flow_volume() {
    let app = app();

    for body in [
        json!({}),
        json!({ "flow_volume": "fast" }),
        json!({ "flow_volume": 0 }),
        json!({ "flow_volume": -1.5 }),
    ] {
        let (status, body) = send(&app, Method::POST, "/dispenser", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn open_close_and_spending() {
    let app = app();
    let id = create(&app, 0.5).await;

    let (status, body) = set_status(&app, &id, "open", "2022-01-01T02:00:00Z").await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body, Value::Null);

    let (status, _) = set_status(&app, &id, "close", "2022-01-01T02:01:00Z").await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let (status, body) = spending(&app, &id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["amount"], 367.5);
    assert_eq!(
        body["usages"],
        json!([{
            "opened_at": "2022-01-01T02:00:00Z",
            "closed_at": "2022-01-01T02:01:00Z",
            "flow_volume": 0.5,
            "total_spent": 367.5,
        }])
    );
}

#[tokio::test]
async fn same_status_answers_conflict() {
    let app = app();
    let id = create(&app, 1.0).await;

    let (status, body) = set_status(&app, &id, "close", "2022-01-01T02:00:00Z").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].is_string());

    let (_, body) = spending(&app, &id).await;
    assert_eq!(body, json!({ "amount": 0.0, "usages": [] }));
}

#[tokio::test]
async fn status_update_validation() {
    let app = app();
    let id = create(&app, 1.0).await;

    let (status, _) = set_status(&app, &id, "sideways", "2022-01-01T02:00:00Z").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = set_status(&app, &id, "open", "yesterday").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/dispenser/{id}/status"),
        Some(json!({ "status": "open" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    set_status(&app, &id, "open", "2022-01-01T02:00:00Z").await;
    let (status, body) = set_status(&app, &id, "close", "2022-01-01T01:59:00Z").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("date order"));

    let (_, body) = send(&app, Method::GET, &format!("/dispenser/{id}"), None).await;
    assert_eq!(body["status"], "open");
    assert_eq!(body["updated_at"], "2022-01-01T02:00:00Z");
}

#[tokio::test]
async fn unknown_dispenser_answers_not_found() {
    let app = app();
    let missing = "4c4e7a57-7d0c-4a53-9e15-6f3f1f7ce6a1";

    let (status, body) = set_status(&app, missing, "open", "2022-01-01T02:00:00Z").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    let (status, _) = spending(&app, missing).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, "/dispenser/nope/spending", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn open_dispenser_spending_is_live() {
    let app = app();
    let id = create(&app, 0.1).await;
    let opened_at = (chrono::Utc::now() - chrono::Duration::seconds(10)).to_rfc3339();

    set_status(&app, &id, "open", &opened_at).await;
    let (status, body) = spending(&app, &id).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["amount"].as_f64().unwrap() > 0.0);
    assert!(body["usages"][0]["closed_at"].is_null());
    assert_eq!(body["usages"][0]["total_spent"], body["amount"]);
}

#[tokio::test]
async fn list_dispensers_in_creation_order() {
    let app = app();
    let first = create(&app, 1.0).await;
    let second = create(&app, 2.0).await;

    let (status, body) = send(&app, Method::GET, "/dispenser", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dispensers"][0]["id"], first.as_str());
    assert_eq!(body["dispensers"][1]["id"], second.as_str());
    assert_eq!(body["dispensers"][1]["status"], "close");
}
