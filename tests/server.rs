//! HTTP API tests against a router served on an ephemeral port.

use std::path::PathBuf;

use clausease::config::{Config, DbConfig, HistoryConfig, NlpConfig, ServerConfig, UploadsConfig};
use clausease::server::build_app;
use serde_json::{json, Value};
use tempfile::TempDir;

struct TestServer {
    base: String,
    uploads: PathBuf,
    _tmp: TempDir,
}

async fn start_server(max_bytes: usize) -> TestServer {
    let tmp = TempDir::new().unwrap();
    let uploads = tmp.path().join("uploads");
    let config = Config {
        db: DbConfig {
            path: tmp.path().join("data/clausease.sqlite"),
        },
        server: ServerConfig {
            bind: "127.0.0.1:0".to_string(),
        },
        uploads: UploadsConfig {
            dir: uploads.clone(),
            max_bytes,
        },
        nlp: NlpConfig::default(),
        history: HistoryConfig { preview_chars: 20 },
    };

    let app = build_app(&config).await.unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base: format!("http://{}", addr),
        uploads,
        _tmp: tmp,
    }
}

async fn register(client: &reqwest::Client, base: &str, email: &str) -> reqwest::Response {
    client
        .post(format!("{}/api/register", base))
        .json(&json!({"name": "Ada", "email": email, "password": "secret1"}))
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn health_reports_version() {
    let server = start_server(1024 * 1024).await;
    let body: Value = reqwest::get(format!("{}/health", server.base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["annotator"], "tagger");
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let server = start_server(1024 * 1024).await;
    let resp = reqwest::get(format!("{}/api/nope", server.base)).await.unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn register_and_login() {
    let server = start_server(1024 * 1024).await;
    let client = reqwest::Client::new();

    let resp = register(&client, &server.base, " Ada@Example.com ").await;
    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["user"]["email"], "ada@example.com");

    let resp = register(&client, &server.base, "ada@example.com").await;
    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "conflict");

    let resp = client
        .post(format!("{}/api/login", server.base))
        .json(&json!({"email": "ADA@example.com", "password": "secret1"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["user"]["name"], "Ada");
    assert!(body["message"].is_string());

    let resp = client
        .post(format!("{}/api/login", server.base))
        .json(&json!({"email": "ada@example.com", "password": "wrong-pass"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn register_validates_fields() {
    let server = start_server(1024 * 1024).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/api/register", server.base))
        .json(&json!({"name": "Ada", "email": "ada@example.com", "password": "123"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = client
        .post(format!("{}/api/register", server.base))
        .json(&json!({"email": "ada@example.com"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn analyze_json_text() {
    let server = start_server(1024 * 1024).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/api/analyze", server.base))
        .json(&json!({"text": "cat dog run"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["word_count"], 3);
    assert_eq!(body["original_text"], "cat dog run");
    assert_eq!(body["file_saved"], false);
    assert!(body.get("saved_filename").is_none());
    assert_eq!(body["word_analysis"][0]["complexity"], "simple");
}

#[tokio::test]
async fn analyze_empty_is_bad_request() {
    let server = start_server(1024 * 1024).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/api/analyze", server.base))
        .json(&json!({"text": "  "}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["message"], "No text provided or file is empty");
}

#[tokio::test]
async fn analyze_multipart_upload_is_saved() {
    let server = start_server(1024 * 1024).await;
    let client = reqwest::Client::new();

    let part = reqwest::multipart::Part::bytes(b"The tenant pays rent.".to_vec())
        .file_name("my lease.txt");
    let form = reqwest::multipart::Form::new().part("file", part);
    let resp = client
        .post(format!("{}/api/analyze", server.base))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["file_saved"], true);
    let saved = body["saved_filename"].as_str().unwrap();
    assert!(saved.ends_with("_my_lease.txt"));
    assert!(server.uploads.join(saved).exists());
    assert_eq!(body["word_count"], 4);
}

#[tokio::test]
async fn oversized_body_rejected() {
    let server = start_server(1024).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/api/analyze", server.base))
        .json(&json!({"text": "word ".repeat(1000)}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 413);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "payload_too_large");
}

#[tokio::test]
async fn analysis_recorded_in_history() {
    let server = start_server(1024 * 1024).await;
    let client = reqwest::Client::new();
    register(&client, &server.base, "ada@example.com").await;

    for text in ["The cat sat on the mat today.", "Second text."] {
        let resp = client
            .post(format!("{}/api/analyze", server.base))
            .header("X-User-Email", "ada@example.com")
            .json(&json!({ "text": text }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
    }

    // unknown users are analyzed but not recorded
    let resp = client
        .post(format!("{}/api/analyze", server.base))
        .header("X-User-Email", "ghost@example.com")
        .json(&json!({"text": "Ghost text."}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = client
        .get(format!("{}/api/history?email=ada@example.com", server.base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let history = body["history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["text_preview"], "Second text.");
    assert_eq!(history[1]["text_preview"], "The cat sat on the m...");
    assert!(history[0]["flesch_score"].is_number());

    let resp = client
        .get(format!("{}/api/history", server.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn export_pdf_writes_report() {
    let server = start_server(1024 * 1024).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/api/export-pdf", server.base))
        .json(&json!({"text": "The lessee shall pay rent.", "flesch": 70.5, "fog": 8.2}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let filename = body["filename"].as_str().unwrap();
    let bytes = std::fs::read(server.uploads.join(filename)).unwrap();
    assert!(bytes.starts_with(b"%PDF"));

    let resp = client
        .post(format!("{}/api/export-pdf", server.base))
        .json(&json!({"text": ""}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}
