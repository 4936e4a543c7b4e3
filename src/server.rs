//! HTTP API server.
//!
//! Exposes the analysis pipeline, accounts, per-user history and PDF report
//! export as a JSON API for the browser client.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check (version and annotator strategy) |
//! | `POST` | `/api/register` | Create an account |
//! | `POST` | `/api/login` | Check credentials |
//! | `POST` | `/api/analyze` | Analyze JSON `{text}` or a multipart `file` upload |
//! | `GET`  | `/api/history?email=` | Analysis history for a user, newest first |
//! | `POST` | `/api/export-pdf` | Render a one-page PDF report |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "No text provided or file is empty" } }
//! ```
//!
//! Error codes: `bad_request` (400), `unauthorized` (401), `not_found` (404),
//! `conflict` (409), `payload_too_large` (413), `internal` (500).
//!
//! # History
//!
//! An analyze request carrying an `X-User-Email` header for a registered
//! user stores a preview of the text with its scores. Failing to store it is
//! logged and does not fail the request.

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, FromRequest, Multipart, Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::accounts::{self, AccountError};
use crate::analyze::{AnalysisError, Analyzer};
use crate::config::Config;
use crate::db;
use crate::extract::acquire_text;
use crate::history::{self, make_preview, HistoryError};
use crate::migrate::migrate;
use crate::models::{AnalysisResult, ContentKind, HistoryEntry, RawInput, User};
use crate::report::write_report;
use crate::uploads::save_upload;

pub const USER_EMAIL_HEADER: &str = "x-user-email";

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    analyzer: Arc<Analyzer>,
    pool: sqlx::SqlitePool,
}

impl AppState {
    pub fn new(config: Arc<Config>, analyzer: Arc<Analyzer>, pool: sqlx::SqlitePool) -> Self {
        Self {
            config,
            analyzer,
            pool,
        }
    }
}

/// Connect to the database, run migrations, build the analyzer and return
/// the configured router.
pub async fn build_app(config: &Config) -> anyhow::Result<Router> {
    let pool = db::connect(config).await?;
    migrate(&pool).await?;
    let analyzer = Analyzer::from_config(&config.nlp)?;
    log::info!("Annotator strategy: {}", analyzer.annotator_name());
    Ok(build_router(AppState::new(
        Arc::new(config.clone()),
        Arc::new(analyzer),
        pool,
    )))
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/api/register", post(handle_register))
        .route("/api/login", post(handle_login))
        .route("/api/analyze", post(handle_analyze))
        .route("/api/history", get(handle_history))
        .route("/api/export-pdf", post(handle_export_pdf))
        .fallback(handle_not_found)
        .layer(DefaultBodyLimit::max(state.config.uploads.max_bytes))
        .layer(cors)
        .with_state(state)
}

/// Starts the HTTP server on `[server].bind`. Runs until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let app = build_app(config).await?;

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    log::info!("ClauseEase server listening on http://{}", config.server.bind);
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

#[derive(Debug)]
struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code.to_string(),
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError::new(StatusCode::BAD_REQUEST, "bad_request", message)
}

fn unauthorized(message: impl Into<String>) -> AppError {
    AppError::new(StatusCode::UNAUTHORIZED, "unauthorized", message)
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError::new(StatusCode::NOT_FOUND, "not_found", message)
}

fn conflict(message: impl Into<String>) -> AppError {
    AppError::new(StatusCode::CONFLICT, "conflict", message)
}

fn payload_too_large(message: impl Into<String>) -> AppError {
    AppError::new(StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large", message)
}

/// Logs the cause and hides it from the client.
fn internal(err: impl std::fmt::Display) -> AppError {
    log::error!("Internal error: {}", err);
    AppError::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal",
        "Internal server error",
    )
}

/// Maps a body rejection, keeping 413 distinct from malformed input.
fn rejection(status: StatusCode, message: String) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        payload_too_large("Request body too large")
    } else {
        bad_request(message)
    }
}

impl From<JsonRejection> for AppError {
    fn from(err: JsonRejection) -> Self {
        rejection(err.status(), err.body_text())
    }
}

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::MissingFields | AccountError::PasswordTooShort => {
                bad_request(err.to_string())
            }
            AccountError::EmailTaken => conflict(err.to_string()),
            AccountError::InvalidCredentials => unauthorized(err.to_string()),
            AccountError::Database(e) => internal(e),
        }
    }
}

impl From<HistoryError> for AppError {
    fn from(err: HistoryError) -> Self {
        match err {
            HistoryError::MissingEmail => bad_request(err.to_string()),
            HistoryError::Database(e) => internal(e),
        }
    }
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        bad_request(err.to_string())
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    /// Segmentation strategy chosen at startup (`tagger` or `basic`).
    annotator: String,
}

async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        annotator: state.analyzer.annotator_name().to_string(),
    })
}

async fn handle_not_found() -> AppError {
    not_found("No such endpoint")
}

// ============ Accounts ============

#[derive(Deserialize)]
struct RegisterRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Deserialize)]
struct LoginRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Serialize)]
struct UserResponse {
    message: String,
    user: User,
}

async fn handle_register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let Json(req) = body?;
    let user = accounts::register(&state.pool, &req.name, &req.email, &req.password).await?;
    log::info!("Registered user {}", user.email);

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            message: "Registration successful".to_string(),
            user,
        }),
    ))
}

async fn handle_login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, AppError> {
    let Json(req) = body?;
    let user = accounts::login(&state.pool, &req.email, &req.password).await?;

    Ok(Json(UserResponse {
        message: "Login successful".to_string(),
        user,
    }))
}

// ============ POST /api/analyze ============

#[derive(Deserialize)]
struct AnalyzeRequest {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
struct AnalyzeResponse {
    #[serde(flatten)]
    result: AnalysisResult,
    original_text: String,
    file_saved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    saved_filename: Option<String>,
}

/// Analyzed input plus what happened to the upload, if any.
struct Submission {
    input: RawInput,
    saved_filename: Option<String>,
}

async fn handle_analyze(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let user_email = header_value(request.headers(), USER_EMAIL_HEADER);

    let submission = if is_multipart(request.headers()) {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| rejection(e.status(), e.body_text()))?;
        read_upload(&state, multipart).await?
    } else {
        let Json(req) = Json::<AnalyzeRequest>::from_request(request, &state).await?;
        Submission {
            input: RawInput::Text(req.text),
            saved_filename: None,
        }
    };

    let analyzer = state.analyzer.clone();
    let input = submission.input;
    let (original_text, result) = tokio::task::spawn_blocking(move || {
        let text = acquire_text(&input);
        let result = analyzer.analyze(&text);
        (text, result)
    })
    .await
    .map_err(internal)?;
    let result = result?;

    if let Some(email) = user_email {
        let preview = make_preview(&original_text, state.config.history.preview_chars);
        match history::record_analysis(
            &state.pool,
            &email,
            &preview,
            result.readability.flesch_reading_ease,
            result.readability.gunning_fog,
        )
        .await
        {
            Ok(true) => {}
            Ok(false) => log::warn!("History not saved: no user registered as {}", email),
            Err(e) => log::warn!("History not saved for {}: {}", email, e),
        }
    }

    Ok(Json(AnalyzeResponse {
        result,
        original_text,
        file_saved: submission.saved_filename.is_some(),
        saved_filename: submission.saved_filename,
    }))
}

/// Reads the `file` part (or a `text` part) of a multipart body. The file is
/// stored in the upload directory; a failed save is logged and analysis
/// proceeds from memory.
async fn read_upload(state: &AppState, mut multipart: Multipart) -> Result<Submission, AppError> {
    let mut text = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| rejection(e.status(), e.body_text()))?
    {
        let part = field.name().unwrap_or_default().to_string();
        match part.as_str() {
            "file" => {
                let name = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| rejection(e.status(), e.body_text()))?;
                if name.is_empty() && bytes.is_empty() {
                    continue;
                }

                let saved_filename = match save_upload(&state.config.uploads.dir, &name, &bytes) {
                    Ok(saved) => Some(saved),
                    Err(e) => {
                        log::warn!("Failed to save upload {}: {:#}", name, e);
                        None
                    }
                };
                return Ok(Submission {
                    input: RawInput::Bytes {
                        bytes: bytes.to_vec(),
                        kind: ContentKind::from_filename(&name),
                    },
                    saved_filename,
                });
            }
            "text" => {
                text = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| rejection(e.status(), e.body_text()))?,
                );
            }
            _ => {}
        }
    }

    Ok(Submission {
        input: RawInput::Text(text.unwrap_or_default()),
        saved_filename: None,
    })
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"))
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// ============ GET /api/history ============

#[derive(Deserialize)]
struct HistoryQuery {
    email: Option<String>,
}

#[derive(Serialize)]
struct HistoryResponse {
    history: Vec<HistoryEntry>,
}

async fn handle_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, AppError> {
    let email = query.email.unwrap_or_default();
    let history = history::list_history(&state.pool, &email).await?;
    Ok(Json(HistoryResponse { history }))
}

// ============ POST /api/export-pdf ============

#[derive(Deserialize)]
struct ExportRequest {
    #[serde(default)]
    text: String,
    flesch: Option<f64>,
    fog: Option<f64>,
}

#[derive(Serialize)]
struct ExportResponse {
    message: String,
    filename: String,
}

async fn handle_export_pdf(
    State(state): State<AppState>,
    body: Result<Json<ExportRequest>, JsonRejection>,
) -> Result<Json<ExportResponse>, AppError> {
    let Json(req) = body?;
    if req.text.trim().is_empty() {
        return Err(bad_request("No text provided"));
    }

    let dir = state.config.uploads.dir.clone();
    let filename =
        tokio::task::spawn_blocking(move || write_report(&dir, &req.text, req.flesch, req.fog))
            .await
            .map_err(internal)?
            .map_err(|e| internal(format!("{:#}", e)))?;

    Ok(Json(ExportResponse {
        message: "PDF report generated".to_string(),
        filename,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn multipart_detected_from_content_type() {
        let mut headers = HeaderMap::new();
        assert!(!is_multipart(&headers));
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("multipart/form-data; boundary=xyz"),
        );
        assert!(is_multipart(&headers));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        assert!(!is_multipart(&headers));
    }

    #[test]
    fn blank_email_header_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_EMAIL_HEADER, HeaderValue::from_static("   "));
        assert_eq!(header_value(&headers, USER_EMAIL_HEADER), None);
        headers.insert(USER_EMAIL_HEADER, HeaderValue::from_static(" ada@example.com "));
        assert_eq!(
            header_value(&headers, USER_EMAIL_HEADER).as_deref(),
            Some("ada@example.com")
        );
    }

    #[test]
    fn account_errors_map_to_status() {
        assert_eq!(AppError::from(AccountError::EmailTaken).status, StatusCode::CONFLICT);
        assert_eq!(
            AppError::from(AccountError::InvalidCredentials).status,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::from(AccountError::PasswordTooShort).status,
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn oversized_body_is_413() {
        let err = rejection(StatusCode::PAYLOAD_TOO_LARGE, "length limit exceeded".into());
        assert_eq!(err.code, "payload_too_large");
        let err = rejection(StatusCode::UNPROCESSABLE_ENTITY, "missing field".into());
        assert_eq!(err.code, "bad_request");
    }
}
