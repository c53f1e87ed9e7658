//! Route handlers.
//!
//! `POST /api/intakes` is public; everything else requires the reviewer
//! gate, enforced by the [`Reviewer`] extractor before the handler runs.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use triage_core::query::{self, QueueFilter};
use triage_core::{classify, lifecycle, IntakeRecord};

use crate::auth::Reviewer;
use crate::error::ApiError;
use crate::validation::{self, CreateIntakeRequest, UpdateIntakeRequest};
use crate::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/intakes", post(create_intake).get(list_intakes))
        .route("/api/intakes/:id", get(get_intake).patch(update_intake))
        .with_state(state)
}

#[derive(Serialize)]
struct Envelope<T> {
    message: &'static str,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<usize>,
}

impl<T> Envelope<T> {
    fn new(message: &'static str, data: T) -> Self {
        Self {
            message,
            data,
            count: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListParams {
    status: Option<String>,
    category: Option<String>,
    sort: Option<String>,
    dir: Option<String>,
}

/// Create a new intake (public). Classification runs exactly once, before
/// the record exists, so the stored and returned category are identical.
async fn create_intake(
    State(state): State<AppState>,
    Json(req): Json<CreateIntakeRequest>,
) -> Result<(StatusCode, Json<Envelope<IntakeRecord>>), ApiError> {
    let intake = validation::validate_create(&req)?;
    let category = classify(&intake.description);

    let record = state
        .store
        .insert_intake(&intake, category)
        .map_err(|e| ApiError::internal("Failed to create intake", e))?;

    tracing::info!(id = record.id, category = category.as_str(), "intake created");
    Ok((
        StatusCode::CREATED,
        Json(Envelope::new("Intake created successfully", record)),
    ))
}

/// List intakes (reviewer only), filtered and sorted by the query engine.
async fn list_intakes(
    _reviewer: Reviewer,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Envelope<Vec<IntakeRecord>>>, ApiError> {
    // An explicitly empty param (`?status=`) means unfiltered, same as an
    // absent one.
    let sort = validation::parse_sort(
        params.sort.as_deref().filter(|s| !s.is_empty()),
        params.dir.as_deref().filter(|s| !s.is_empty()),
    )?;
    let filter = QueueFilter {
        status: params.status.filter(|s| !s.is_empty()),
        category: params.category.filter(|s| !s.is_empty()),
    };

    let records = state
        .store
        .list_intakes()
        .map_err(|e| ApiError::internal("Failed to fetch intakes", e))?;
    let rows = query::query(&records, &filter, sort);

    let count = rows.len();
    let mut envelope = Envelope::new("Intakes retrieved successfully", rows);
    envelope.count = Some(count);
    Ok(Json(envelope))
}

/// Fetch a single intake (reviewer only).
async fn get_intake(
    _reviewer: Reviewer,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Envelope<IntakeRecord>>, ApiError> {
    let record = state
        .store
        .get_intake(id)
        .map_err(|e| ApiError::internal("Failed to fetch intake", e))?
        .ok_or(ApiError::IntakeNotFound)?;

    Ok(Json(Envelope::new("Intake retrieved successfully", record)))
}

/// Update an intake's mutable fields (reviewer only).
async fn update_intake(
    _reviewer: Reviewer,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateIntakeRequest>,
) -> Result<Json<Envelope<IntakeRecord>>, ApiError> {
    let patch = validation::validate_update(&req)?;
    let record = lifecycle::update_intake(&state.store, id, &patch)?;

    Ok(Json(Envelope::new("Intake updated successfully", record)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::PasswordGate;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use base64::prelude::{Engine as _, BASE64_STANDARD};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;
    use triage_core::IntakeStore;

    const PASSWORD: &str = "hunter2";

    fn app() -> Router {
        app_with_password(Some(PASSWORD.to_string()))
    }

    fn app_with_password(password: Option<String>) -> Router {
        router(AppState {
            store: IntakeStore::memory().unwrap(),
            gate: Arc::new(PasswordGate::new(password)),
        })
    }

    /// Fire one request at the router; auth is the Basic password to send,
    /// if any. Returns the status plus the decoded JSON body.
    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        auth: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(password) = auth {
            let encoded = BASE64_STANDARD.encode(format!("admin:{password}"));
            builder = builder.header(header::AUTHORIZATION, format!("Basic {encoded}"));
        }
        let request = match body {
            Some(v) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(v.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn submit(app: &Router, name: &str, description: &str, urgency: i64) -> i64 {
        let (status, body) = send(
            app,
            "POST",
            "/api/intakes",
            None,
            Some(json!({
                "name": name,
                "email": format!("{name}@example.com"),
                "description": description,
                "urgency": urgency,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["data"]["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn submission_returns_201_with_classified_record() {
        let app = app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/intakes",
            None,
            Some(json!({
                "name": "Ada",
                "email": "ada@example.com",
                "description": "problem with my invoice",
                "urgency": 5,
            })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Intake created successfully");
        assert_eq!(body["data"]["category"], "billing");
        assert_eq!(body["data"]["status"], "new");
        assert_eq!(body["data"]["internal_notes"], "");
        assert_eq!(body["data"]["urgency"], 5);
    }

    #[tokio::test]
    async fn invalid_submission_gets_the_validation_envelope() {
        let app = app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/intakes",
            None,
            Some(json!({ "name": 5, "email": "ada@example.com", "description": "x", "urgency": 9 })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Validation Error");
        assert_eq!(body["message"], "Invalid input");
        let errors = body["errors"].as_array().unwrap();
        assert!(errors.contains(&json!("name is required and must be a non-empty string")));
        assert!(errors.contains(&json!("urgency must be an integer between 1 and 5")));
    }

    #[tokio::test]
    async fn queue_requires_credentials() {
        let app = app();

        let (status, body) = send(&app, "GET", "/api/intakes", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Unauthorized");
        assert_eq!(body["message"], "Authentication required. Use HTTP Basic Auth.");

        let (status, body) = send(&app, "GET", "/api/intakes", Some("wrong"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid credentials");
    }

    #[tokio::test]
    async fn missing_password_config_is_only_visible_with_credentials() {
        let app = app_with_password(None);

        // No credential at all: still the caller's 401, not a 500.
        let (status, body) = send(&app, "GET", "/api/intakes", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Authentication required. Use HTTP Basic Auth.");

        let (status, body) = send(&app, "GET", "/api/intakes", Some(PASSWORD), None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Server Error");
        assert_eq!(body["message"], "Admin password not configured");
    }

    #[tokio::test]
    async fn list_returns_count_and_honors_filters() {
        let app = app();
        let billing_id = submit(&app, "ada", "problem with my invoice", 5).await;
        submit(&app, "bob", "hello there", 1).await;

        let (status, body) = send(&app, "GET", "/api/intakes", Some(PASSWORD), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Intakes retrieved successfully");
        assert_eq!(body["count"], 2);
        assert_eq!(body["data"].as_array().unwrap().len(), 2);

        let (status, body) = send(
            &app,
            "GET",
            "/api/intakes?category=billing&sort=urgency&dir=desc",
            Some(PASSWORD),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);
        assert_eq!(body["data"][0]["id"], billing_id);
    }

    #[tokio::test]
    async fn empty_filter_params_impose_no_constraint() {
        let app = app();
        submit(&app, "ada", "problem with my invoice", 5).await;
        submit(&app, "bob", "hello there", 1).await;

        let (status, body) = send(
            &app,
            "GET",
            "/api/intakes?status=&category=&sort=&dir=",
            Some(PASSWORD),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 2);
    }

    #[tokio::test]
    async fn fetch_unknown_intake_is_404() {
        let app = app();
        let (status, body) = send(&app, "GET", "/api/intakes/999", Some(PASSWORD), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not Found");
        assert_eq!(body["message"], "Intake not found");
    }

    #[tokio::test]
    async fn patch_updates_status_and_notes() {
        let app = app();
        let id = submit(&app, "ada", "problem with my invoice", 3).await;

        let (status, body) = send(
            &app,
            "PATCH",
            &format!("/api/intakes/{id}"),
            Some(PASSWORD),
            Some(json!({ "status": "in_review", "internal_notes": "checking" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Intake updated successfully");
        assert_eq!(body["data"]["status"], "in_review");
        assert_eq!(body["data"]["internal_notes"], "checking");
    }

    #[tokio::test]
    async fn patch_with_non_string_notes_gets_field_message() {
        let app = app();
        let id = submit(&app, "ada", "problem with my invoice", 3).await;

        let (status, body) = send(
            &app,
            "PATCH",
            &format!("/api/intakes/{id}"),
            Some(PASSWORD),
            Some(json!({ "internal_notes": 5 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Validation Error");
        assert_eq!(body["errors"], json!(["internal_notes must be a string"]));
    }

    #[tokio::test]
    async fn patch_with_no_fields_is_rejected() {
        let app = app();
        let id = submit(&app, "ada", "problem with my invoice", 3).await;

        let (status, body) = send(
            &app,
            "PATCH",
            &format!("/api/intakes/{id}"),
            Some(PASSWORD),
            Some(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Bad Request");
        assert_eq!(body["message"], "No fields to update");
    }

    #[tokio::test]
    async fn auth_runs_before_the_body_is_parsed() {
        let app = app();
        // Garbage body plus no credential: the 401 wins, proving the gate
        // short-circuits ahead of any body handling.
        let request = Request::builder()
            .method("PATCH")
            .uri("/api/intakes/1")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("not json"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
