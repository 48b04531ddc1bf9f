//! End-to-end tests for the HTTP API, driven through the router without a socket.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use contacts_api::repositories::{ContactRepository, InMemoryContactRepository};
use contacts_api::services::{ContactService, ContactServiceImpl};
use contacts_api::{build_app, AppState, Config, Metrics};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "contacts-api-test-boundary";

fn test_app(upload_dir: &TempDir) -> Router {
    let config = Config {
        upload_dir: upload_dir.path().to_path_buf(),
        max_upload_bytes: 1024,
        ..Config::default()
    };
    let metrics = Metrics::new();
    let repo = Arc::new(InMemoryContactRepository::new()) as Arc<dyn ContactRepository>;
    let service = Arc::new(ContactServiceImpl::new(
        repo,
        config.favorite_limit,
        config.max_sync_batch,
        metrics.clone(),
    )) as Arc<dyn ContactService>;
    build_app(AppState::new(config, service, metrics))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn multipart_body(field: &str, filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

async fn upload(app: &Router, body: Vec<u8>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/contacts/upload")
        .header(header::HOST, "localhost:5000")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    (status, serde_json::from_slice(&bytes).expect("json"))
}

#[tokio::test]
async fn test_contact_lifecycle() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/contacts",
        Some(json!({"name": "Test User", "phone": "+62 812-3456-7890"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["phone"], "081234567890");
    assert_eq!(body["data"]["isFavorite"], false);
    assert_eq!(body["data"]["group"], "");
    assert!(body["data"]["avatar"]
        .as_str()
        .unwrap()
        .contains("name=Test+User"));
    let id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(id.len(), 24);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/contacts",
        Some(json!({"name": "Other User", "phone": "081234567890"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/api/contacts/{}/favorite", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isFavorite"], true);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/contacts/{}", id),
        Some(json!({"address": "Jl. Sudirman 5", "group": "Work"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["address"], "Jl. Sudirman 5");
    assert_eq!(body["data"]["group"], "Work");
    assert_eq!(body["data"]["name"], "Test User");
    assert_eq!(body["data"]["isFavorite"], true);

    let (status, body) = send(&app, Method::DELETE, &format!("/api/contacts/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({"id": id, "name": "Test User"}));

    let (status, body) = send(&app, Method::GET, &format!("/api/contacts/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Contact not found");
}

#[tokio::test]
async fn test_list_is_sorted_with_count() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    for (name, phone) in [
        ("Citra", "081200000003"),
        ("Andi", "081200000001"),
        ("Budi", "081200000002"),
    ] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/contacts",
            Some(json!({"name": name, "phone": phone})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, Method::GET, "/api/contacts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Andi", "Budi", "Citra"]);
}

#[tokio::test]
async fn test_validation_errors_are_listed() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/contacts",
        Some(json!({"name": "A", "phone": "12345", "email": "nope", "group": "Enemy"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["errors"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_malformed_requests() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let (status, body) = send(&app, Method::GET, "/api/contacts/not-an-id", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid contact ID");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/contacts")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/contacts/65a1f0c2b3d4e5f601234567",
        Some(json!({"name": "Nobody"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_sync_endpoint() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let batch = json!({"contacts": [
        {"name": "Andi", "phone": "081200000001"},
        {"name": "", "phone": "081200000002"},
        {"name": "Citra", "phone": "6281200000003"}
    ]});

    let (status, body) = send(&app, Method::POST, "/api/contacts/sync", Some(batch.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["processed"], 3);
    assert_eq!(body["data"]["added"], 2);
    assert_eq!(body["data"]["skipped"], 1);
    assert!(body["data"]["errors"][0]
        .as_str()
        .unwrap()
        .starts_with("Item 1:"));

    let (status, body) = send(&app, Method::POST, "/api/contacts/sync", Some(batch)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["added"], 0);
    assert_eq!(body["data"]["skipped"], 3);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/contacts/sync",
        Some(json!({"contacts": []})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, Method::GET, "/api/contacts", None).await;
    assert_eq!(body["count"], 2);
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let (status, body) = send(&app, Method::GET, "/api/does-not-exist", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"success": false, "message": "Endpoint not found"}));
}

#[tokio::test]
async fn test_status_and_health() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    send(
        &app,
        Method::POST,
        "/api/contacts",
        Some(json!({"name": "Budi", "phone": "081234567890"})),
    )
    .await;

    let (status, body) = send(&app, Method::GET, "/api/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["store"], "connected");
    assert_eq!(body["contacts"], 1);
    assert_eq!(body["metrics"]["contactsCreatedTotal"], 1);
    assert!(body["metrics"]["httpRequestsTotal"].as_u64().unwrap() >= 1);

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn test_avatar_upload_is_served() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let png = b"\x89PNG\r\n\x1a\nfake image data";
    let (status, body) = upload(&app, multipart_body("avatar", "me.png", "image/png", png)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["mimetype"], "image/png");
    assert_eq!(body["data"]["size"], png.len());

    let filename = body["data"]["filename"].as_str().unwrap().to_string();
    assert!(filename.starts_with("avatar-"));
    assert!(filename.ends_with(".png"));
    assert_eq!(
        body["data"]["url"],
        format!("http://localhost:5000/uploads/{}", filename)
    );
    assert!(dir.path().join(&filename).exists());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/uploads/{}", filename))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], &png[..]);
}

#[tokio::test]
async fn test_avatar_upload_rejections() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let (status, body) = upload(
        &app,
        multipart_body("avatar", "notes.txt", "text/plain", b"hello"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Only JPEG, PNG and GIF images are allowed");

    let (status, _) = upload(
        &app,
        multipart_body("picture", "me.png", "image/png", b"data"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Test config caps uploads at 1024 bytes
    let big = vec![0u8; 2048];
    let (status, _) = upload(&app, multipart_body("avatar", "big.png", "image/png", &big)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
