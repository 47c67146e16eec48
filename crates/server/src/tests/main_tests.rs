use super::*;
use axum::{body, body::Body, http::Request, response::Response};
use tower::ServiceExt;

const BODY_LIMIT: usize = 4 * 1024;

async fn test_app() -> (Router, Storage) {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let app = build_router(
        Arc::new(AppState {
            api: ApiContext {
                storage: storage.clone(),
            },
        }),
        BODY_LIMIT,
    );
    (app, storage)
}

fn fixture(timestamp: &str, severity: &str) -> serde_json::Value {
    serde_json::json!({
        "timestamp": timestamp,
        "source_ip": "192.168.1.100",
        "severity": severity,
        "type": "malware",
        "status": "open",
        "description": "Test incident"
    })
}

fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

async fn seed_fixtures(app: &Router) -> Vec<Incident> {
    let mut created = Vec::new();
    for (timestamp, severity) in [
        ("2026-02-11 08:00:00", "critical"),
        ("2026-02-11 09:00:00", "high"),
        ("2026-02-11 10:00:00", "medium"),
        ("2026-02-11 11:00:00", "low"),
    ] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/incidents",
                &fixture(timestamp, severity),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);
        created.push(read_json::<Incident>(response).await);
    }
    created
}

#[tokio::test]
async fn health_reports_ok_when_storage_is_ready() {
    let (app, _storage) = test_app().await;
    let request = Request::get("/api/health")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let health: HealthResponse = read_json(response).await;
    assert_eq!(health.status, "ok");
}

#[tokio::test]
async fn lists_all_incidents_newest_first() {
    let (app, _storage) = test_app().await;
    seed_fixtures(&app).await;

    let response = app
        .oneshot(Request::get("/api/incidents").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let incidents: Vec<Incident> = read_json(response).await;
    assert_eq!(incidents.len(), 4);
    assert!(incidents
        .windows(2)
        .all(|pair| pair[0].occurred_at >= pair[1].occurred_at));
}

#[tokio::test]
async fn missing_incident_returns_not_found_json() {
    let (app, _storage) = test_app().await;
    let response = app
        .oneshot(
            Request::get("/api/incidents/99999")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let error: ApiError = read_json(response).await;
    assert_eq!(error, ApiError::not_found());
}

#[tokio::test]
async fn put_to_missing_incident_with_empty_body_is_not_found() {
    let (app, _storage) = test_app().await;
    let response = app
        .oneshot(json_request(
            "PUT",
            "/api/incidents/99999",
            &serde_json::json!({}),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let error: ApiError = read_json(response).await;
    assert_eq!(error, ApiError::not_found());
}

#[tokio::test]
async fn create_without_required_fields_is_bad_request() {
    let (app, _storage) = test_app().await;
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/incidents",
            &serde_json::json!({ "description": "Missing required fields" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: ApiError = read_json(response).await;
    assert_eq!(error.message, "Missing required fields");
}

#[tokio::test]
async fn create_with_unknown_severity_is_bad_request() {
    let (app, _storage) = test_app().await;
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/incidents",
            &fixture("2026-02-11 08:00:00", "apocalyptic"),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: ApiError = read_json(response).await;
    assert_eq!(error.code, ErrorCode::Validation);
}

#[tokio::test]
async fn create_increases_count_and_defaults_status() {
    let (app, storage) = test_app().await;
    seed_fixtures(&app).await;

    let mut body = fixture("2026-02-11 12:00:00", "high");
    body.as_object_mut().expect("object").remove("status");
    let response = app
        .oneshot(json_request("POST", "/api/incidents", &body))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);

    let created: Incident = read_json(response).await;
    assert_eq!(created.status, shared::domain::Status::Open);
    assert_eq!(storage.count_incidents().await.expect("count"), 5);
}

#[tokio::test]
async fn update_persists_and_unknown_id_is_not_found() {
    let (app, _storage) = test_app().await;
    let created = seed_fixtures(&app).await;
    let target = created[0].id;

    let mut update = fixture("2026-02-11 13:00:00", "critical");
    update["status"] = serde_json::json!("resolved");
    update["description"] = serde_json::json!("Updated: Incident has been resolved");

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/incidents/{target}"),
            &update,
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let reloaded = app
        .clone()
        .oneshot(
            Request::get(format!("/api/incidents/{target}"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    let reloaded: Incident = read_json(reloaded).await;
    assert_eq!(reloaded.status, shared::domain::Status::Resolved);
    assert_eq!(
        reloaded.description.as_deref(),
        Some("Updated: Incident has been resolved")
    );

    let missing = app
        .oneshot(json_request("PUT", "/api/incidents/99999", &update))
        .await
        .expect("response");
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_removes_incident() {
    let (app, storage) = test_app().await;
    let created = seed_fixtures(&app).await;
    let target = created[1].id;

    let response = app
        .clone()
        .oneshot(
            Request::delete(format!("/api/incidents/{target}"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let deleted: DeleteResponse = read_json(response).await;
    assert_eq!(deleted.message, "Incident deleted successfully");
    assert_eq!(storage.count_incidents().await.expect("count"), 3);

    let again = app
        .oneshot(
            Request::delete(format!("/api/incidents/{target}"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_numeric_id_is_bad_request() {
    let (app, _storage) = test_app().await;
    let response = app
        .oneshot(
            Request::get("/api/incidents/abc")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let (app, _storage) = test_app().await;
    let mut body = fixture("2026-02-11 08:00:00", "low");
    body["description"] = serde_json::json!("x".repeat(BODY_LIMIT * 2));
    let body = body.to_string();
    let request = Request::post("/api/incidents")
        .header("content-type", "application/json")
        .header("content-length", body.len())
        .body(Body::from(body))
        .expect("request");
    let response = app
        .oneshot(request)
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
