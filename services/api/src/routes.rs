use crate::infra::{content_disposition, sort_state, AppState};
use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use resume_screen::error::AppError;
use resume_screen::evaluation::{
    EvaluationBackend, EvaluationRequest, EvaluationResponse, EvaluationSummary, ExportArtifact,
    ExportFormat, LoadingStatus, RankedRow, ResumeUpload, ScoreBand, ScreeningSession,
    SessionError, SortDirection, SortField, SortState,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

/// Upper bound for one multipart evaluation form.
const MAX_FORM_BYTES: usize = 25 * 1024 * 1024;

const JD_FIELD: &str = "jd_text";
const RESUME_FIELD: &str = "resumes";

#[derive(Debug, Deserialize)]
pub(crate) struct RankRequest {
    pub(crate) response: EvaluationResponse,
    #[serde(default)]
    pub(crate) sort: Option<SortField>,
    #[serde(default)]
    pub(crate) direction: Option<SortDirection>,
}

impl RankRequest {
    fn sort_state(&self) -> SortState {
        sort_state(self.sort, self.direction)
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct RankedRowView {
    pub(crate) rank: usize,
    pub(crate) candidate_id: String,
    pub(crate) final_match_score: f64,
    pub(crate) skill_match_score: f64,
    pub(crate) semantic_similarity_score: f64,
    pub(crate) matched_count: usize,
    pub(crate) missing_count: usize,
    pub(crate) score_band: ScoreBand,
    pub(crate) short_reason: String,
}

impl From<&RankedRow<'_>> for RankedRowView {
    fn from(row: &RankedRow<'_>) -> Self {
        let record = row.record;
        Self {
            rank: row.rank,
            candidate_id: record.candidate_id.clone(),
            final_match_score: record.final_match_score,
            skill_match_score: record.skill_match_score,
            semantic_similarity_score: record.semantic_similarity_score,
            matched_count: record.matched_skills.len(),
            missing_count: record.missing_skills.len(),
            score_band: record.score_band(),
            short_reason: record.short_reason.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct RankResponse {
    pub(crate) sort: SortField,
    pub(crate) direction: SortDirection,
    pub(crate) summary: EvaluationSummary,
    pub(crate) rows: Vec<RankedRowView>,
}

impl RankResponse {
    fn build(response: &EvaluationResponse, sort: SortState) -> Self {
        Self {
            sort: sort.field,
            direction: sort.direction,
            summary: response.summary(),
            rows: sort
                .apply(&response.results)
                .iter()
                .map(RankedRowView::from)
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SortRequest {
    pub(crate) field: SortField,
}

#[derive(Debug, Serialize)]
pub(crate) struct SessionSnapshot {
    pub(crate) status: LoadingStatus,
    pub(crate) completed_at: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) last_error: Option<String>,
    #[serde(flatten)]
    pub(crate) ranking: RankResponse,
}

impl SessionSnapshot {
    fn capture<B>(session: &ScreeningSession<B>) -> Result<Self, AppError>
    where
        B: EvaluationBackend + 'static,
    {
        let view = session.view().ok_or(SessionError::NoResults)?;
        Ok(Self {
            status: session.status(),
            completed_at: view.completed_at,
            last_error: session.last_error(),
            ranking: RankResponse::build(&view.response, view.sort),
        })
    }
}

/// Health, readiness and metrics alongside the stateless result endpoints
/// and the service's screening session.
pub(crate) fn with_result_routes<B>(session: Arc<ScreeningSession<B>>) -> Router
where
    B: EvaluationBackend + 'static,
{
    Router::new()
        .route("/api/v1/session", get(session_endpoint::<B>))
        .route("/api/v1/session/sort", post(sort_endpoint::<B>))
        .route(
            "/api/v1/evaluations",
            post(evaluate_endpoint::<B>).layer(DefaultBodyLimit::max(MAX_FORM_BYTES)),
        )
        .with_state(session)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/results/rank", post(rank_endpoint))
        .route("/api/v1/results/export/:format", post(export_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn rank_endpoint(
    Json(payload): Json<RankRequest>,
) -> Result<Json<RankResponse>, AppError> {
    let sort = payload.sort_state();
    Ok(Json(RankResponse::build(&payload.response, sort)))
}

pub(crate) async fn export_endpoint(
    Path(format): Path<String>,
    Json(payload): Json<RankRequest>,
) -> Result<impl IntoResponse, AppError> {
    let format: ExportFormat = format.parse()?;
    let artifact = match format {
        ExportFormat::Json => ExportArtifact::structured(&payload.response)?,
        ExportFormat::Csv => {
            let rows = payload.sort_state().apply(&payload.response.results);
            ExportArtifact::delimited(&payload.response, &rows)?
        }
    };

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, artifact.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                content_disposition(&artifact.file_name),
            ),
        ],
        artifact.payload,
    ))
}

pub(crate) async fn session_endpoint<B>(
    State(session): State<Arc<ScreeningSession<B>>>,
) -> Result<Json<SessionSnapshot>, AppError>
where
    B: EvaluationBackend + 'static,
{
    SessionSnapshot::capture(&session).map(Json)
}

/// Header click: toggles direction on the active column, otherwise switches
/// to the new column sorted descending.
pub(crate) async fn sort_endpoint<B>(
    State(session): State<Arc<ScreeningSession<B>>>,
    Json(payload): Json<SortRequest>,
) -> Result<Json<SessionSnapshot>, AppError>
where
    B: EvaluationBackend + 'static,
{
    let sort = session.select_sort(payload.field);
    info!(field = %sort.field, direction = %sort.direction, "session sort selected");
    SessionSnapshot::capture(&session).map(Json)
}

/// Accepts a `jd_text` field plus one `resumes` file part per résumé and
/// runs them through the session's backend.
pub(crate) async fn evaluate_endpoint<B>(
    State(session): State<Arc<ScreeningSession<B>>>,
    multipart: Multipart,
) -> Result<Json<SessionSnapshot>, AppError>
where
    B: EvaluationBackend + 'static,
{
    let (job_description, uploads) = read_evaluation_form(multipart).await?;
    let request = EvaluationRequest::new(job_description, uploads)?;
    session.evaluate(&request).await?;
    SessionSnapshot::capture(&session).map(Json)
}

async fn read_evaluation_form(
    mut multipart: Multipart,
) -> Result<(String, Vec<ResumeUpload>), AppError> {
    let mut job_description = String::new();
    let mut uploads = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            JD_FIELD => {
                job_description = field.text().await.map_err(upload_error)?;
            }
            RESUME_FIELD => {
                let file_name = field.file_name().unwrap_or("resume").to_string();
                let bytes = field.bytes().await.map_err(upload_error)?;
                uploads.push(ResumeUpload::new(file_name, bytes.to_vec()));
            }
            _ => debug!(field = %name, "ignoring unknown form field"),
        }
    }

    Ok((job_description, uploads))
}

fn upload_error(err: MultipartError) -> AppError {
    AppError::Upload(err.body_text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use resume_screen::evaluation::{EvaluationError, EvaluationRequest, ResultRecord};
    use serde_json::Value;
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicBool;
    use std::sync::Mutex;
    use tokio::sync::Notify;
    use tower::ServiceExt;

    const BOUNDARY: &str = "screening-form-boundary";

    struct OfflineBackend;

    #[async_trait]
    impl EvaluationBackend for OfflineBackend {
        async fn evaluate(
            &self,
            _request: &EvaluationRequest,
        ) -> Result<EvaluationResponse, EvaluationError> {
            Err(EvaluationError::Connect {
                url: "http://127.0.0.1:9/api/evaluate".to_string(),
            })
        }
    }

    /// Answers with queued outcomes, optionally holding each call until the
    /// gate is opened, and remembers which files it was sent.
    #[derive(Default)]
    struct ScriptedBackend {
        outcomes: Mutex<VecDeque<Result<EvaluationResponse, EvaluationError>>>,
        gate: Option<Arc<Notify>>,
        received: Mutex<Vec<String>>,
    }

    impl ScriptedBackend {
        fn new(outcomes: Vec<Result<EvaluationResponse, EvaluationError>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                ..Self::default()
            }
        }

        fn gated(mut self, gate: Arc<Notify>) -> Self {
            self.gate = Some(gate);
            self
        }

        fn received(&self) -> Vec<String> {
            self.received.lock().expect("received mutex poisoned").clone()
        }
    }

    #[async_trait]
    impl EvaluationBackend for ScriptedBackend {
        async fn evaluate(
            &self,
            request: &EvaluationRequest,
        ) -> Result<EvaluationResponse, EvaluationError> {
            self.received
                .lock()
                .expect("received mutex poisoned")
                .extend(request.resumes().iter().map(|r| r.file_name.clone()));
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.outcomes
                .lock()
                .expect("outcome mutex poisoned")
                .pop_front()
                .expect("scripted outcome available")
        }
    }

    fn evaluation_form(jd_text: &str, files: &[(&str, &[u8])]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"jd_text\"\r\n\r\n{jd_text}\r\n"
            )
            .as_bytes(),
        );
        for (file_name, bytes) in files {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"resumes\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/v1/evaluations")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("request")
    }

    fn fresh_response() -> EvaluationResponse {
        EvaluationResponse {
            job_id: "fresh1".to_string(),
            total_candidates: 1,
            processing_time_ms: 800.0,
            results: vec![ResultRecord {
                candidate_id: "resume_new.pdf".to_string(),
                final_match_score: 77.0,
                ..ResultRecord::default()
            }],
        }
    }

    fn get_session() -> Request<Body> {
        Request::get("/api/v1/session")
            .body(Body::empty())
            .expect("request")
    }

    fn sample_response() -> EvaluationResponse {
        let record = |id: &str, final_score: f64, skill: f64, reason: &str| ResultRecord {
            candidate_id: id.to_string(),
            final_match_score: final_score,
            skill_match_score: skill,
            short_reason: reason.to_string(),
            matched_skills: vec!["python".to_string()],
            ..ResultRecord::default()
        };

        EvaluationResponse {
            job_id: "abc123".to_string(),
            total_candidates: 3,
            processing_time_ms: 2450.0,
            results: vec![
                record("resume_a.pdf", 55.0, 90.0, "solid, \"quick\" learner"),
                record("resume_b.pdf", 88.0, 40.0, "excellent fit"),
                record("resume_c.pdf", 12.0, 65.0, "little overlap"),
            ],
        }
    }

    fn router<B>(session: Arc<ScreeningSession<B>>, ready: bool) -> Router
    where
        B: EvaluationBackend + 'static,
    {
        let recorder = PrometheusBuilder::new().build_recorder();
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(recorder.handle()),
        };
        with_result_routes(session).layer(Extension(state))
    }

    fn empty_session() -> Arc<ScreeningSession<OfflineBackend>> {
        Arc::new(ScreeningSession::new(Arc::new(OfflineBackend)))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).expect("serialize body")))
            .expect("request")
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        serde_json::from_slice(&body).expect("json")
    }

    #[tokio::test]
    async fn health_and_readiness_report_status() {
        let app = router(empty_session(), false);

        let health = app
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
            .await
            .expect("router dispatch");
        assert_eq!(health.status(), StatusCode::OK);

        let ready = app
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("router dispatch");
        assert_eq!(ready.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(read_json(ready).await["status"], "initializing");
    }

    #[tokio::test]
    async fn rank_endpoint_orders_rows_by_requested_column() {
        let app = router(empty_session(), true);
        let body = json!({
            "response": sample_response(),
            "sort": "skill",
            "direction": "asc"
        });

        let response = app
            .oneshot(post_json("/api/v1/results/rank", body))
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);

        let payload = read_json(response).await;
        assert_eq!(payload["sort"], "skill");
        assert_eq!(payload["direction"], "asc");
        assert_eq!(payload["summary"]["top_score"], 88.0);
        let ids: Vec<&str> = payload["rows"]
            .as_array()
            .expect("rows")
            .iter()
            .filter_map(|row| row["candidate_id"].as_str())
            .collect();
        assert_eq!(ids, vec!["resume_b.pdf", "resume_c.pdf", "resume_a.pdf"]);
        assert_eq!(payload["rows"][0]["rank"], 1);
        assert_eq!(payload["rows"][0]["score_band"], "high");
    }

    #[tokio::test]
    async fn rank_endpoint_defaults_to_final_descending() {
        let app = router(empty_session(), true);
        let response = app
            .oneshot(post_json(
                "/api/v1/results/rank",
                json!({ "response": sample_response() }),
            ))
            .await
            .expect("router dispatch");

        let payload = read_json(response).await;
        assert_eq!(payload["sort"], "final");
        assert_eq!(payload["direction"], "desc");
        assert_eq!(payload["rows"][0]["candidate_id"], "resume_b.pdf");
        assert_eq!(payload["rows"][2]["score_band"], "low");
    }

    #[tokio::test]
    async fn csv_export_is_an_attachment_in_display_order() {
        let app = router(empty_session(), true);
        let response = app
            .oneshot(post_json(
                "/api/v1/results/export/csv",
                json!({ "response": sample_response(), "sort": "final", "direction": "asc" }),
            ))
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE].to_str().expect("ascii"),
            "text/csv"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION]
                .to_str()
                .expect("ascii"),
            "attachment; filename=\"evaluation_results_abc123.csv\""
        );

        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let text = String::from_utf8(body.to_vec()).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Rank,Candidate ID,"));
        assert!(lines[1].starts_with("1,resume_c.pdf,12.0,"));
        assert!(lines[2].ends_with(",\"solid, \"\"quick\"\" learner\""));
    }

    #[tokio::test]
    async fn json_export_returns_the_response_unchanged() {
        let app = router(empty_session(), true);
        let response = app
            .oneshot(post_json(
                "/api/v1/results/export/json",
                json!({ "response": sample_response(), "sort": "skill" }),
            ))
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let parsed: EvaluationResponse = serde_json::from_slice(&body).expect("json");
        assert_eq!(parsed, sample_response());
    }

    #[tokio::test]
    async fn unknown_export_format_is_rejected() {
        let app = router(empty_session(), true);
        let response = app
            .oneshot(post_json(
                "/api/v1/results/export/xlsx",
                json!({ "response": sample_response() }),
            ))
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload = read_json(response).await;
        assert!(payload["error"]
            .as_str()
            .expect("error message")
            .contains("xlsx"));
    }

    #[tokio::test]
    async fn session_endpoint_reports_missing_results() {
        let app = router(empty_session(), true);
        let response = app
            .oneshot(
                Request::get("/api/v1/session")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn session_endpoint_returns_seeded_ranking() {
        let session =
            ScreeningSession::with_response(Arc::new(OfflineBackend), sample_response());
        session.select_sort(SortField::Final);
        let app = router(Arc::new(session), true);

        let response = app
            .oneshot(
                Request::get("/api/v1/session")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);

        let payload = read_json(response).await;
        assert_eq!(payload["status"], "idle");
        assert_eq!(payload["direction"], "asc");
        assert_eq!(payload["summary"]["job_id"], "abc123");
        assert_eq!(payload["rows"][0]["candidate_id"], "resume_c.pdf");
        assert!(payload.get("completed_at").is_some());
    }

    #[tokio::test]
    async fn multipart_evaluation_replaces_session_results() {
        let backend = Arc::new(ScriptedBackend::new(vec![Ok(fresh_response())]));
        let session = ScreeningSession::with_response(backend.clone(), sample_response());
        let app = router(Arc::new(session), true);

        let response = app
            .clone()
            .oneshot(evaluation_form(
                "Backend engineer, Rust and Postgres",
                &[
                    ("resume_new.pdf", b"%PDF-1.7 new".as_slice()),
                    ("cover_letter.txt", b"hello".as_slice()),
                ],
            ))
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);

        let payload = read_json(response).await;
        assert_eq!(payload["status"], "idle");
        assert_eq!(payload["summary"]["job_id"], "fresh1");
        assert_eq!(payload["rows"][0]["candidate_id"], "resume_new.pdf");
        assert!(payload.get("last_error").is_none());
        assert_eq!(backend.received(), vec!["resume_new.pdf".to_string()]);

        let current = app.oneshot(get_session()).await.expect("router dispatch");
        assert_eq!(read_json(current).await["summary"]["job_id"], "fresh1");
    }

    #[tokio::test]
    async fn second_evaluation_while_first_is_pending_conflicts() {
        let gate = Arc::new(Notify::new());
        let backend =
            Arc::new(ScriptedBackend::new(vec![Ok(fresh_response())]).gated(gate.clone()));
        let session = Arc::new(ScreeningSession::new(backend));
        let app = router(session.clone(), true);

        let first = tokio::spawn(
            app.clone()
                .oneshot(evaluation_form("Rust engineer", &[("a.pdf", b"%PDF".as_slice())])),
        );
        while !session.is_busy() {
            tokio::task::yield_now().await;
        }

        let second = app
            .clone()
            .oneshot(evaluation_form("Rust engineer", &[("b.pdf", b"%PDF".as_slice())]))
            .await
            .expect("router dispatch");
        assert_eq!(second.status(), StatusCode::CONFLICT);
        assert!(read_json(second).await["error"]
            .as_str()
            .expect("error message")
            .contains("already in progress"));

        gate.notify_one();
        let first = first
            .await
            .expect("first request task")
            .expect("router dispatch");
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(read_json(first).await["summary"]["job_id"], "fresh1");
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn backend_failure_is_bad_gateway_and_keeps_previous_results() {
        let backend = Arc::new(ScriptedBackend::new(vec![Err(EvaluationError::Backend {
            status: 500,
            message: "model offline".to_string(),
        })]));
        let session = ScreeningSession::with_response(backend, sample_response());
        let app = router(Arc::new(session), true);

        let response = app
            .clone()
            .oneshot(evaluation_form("Rust engineer", &[("a.pdf", b"%PDF".as_slice())]))
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(read_json(response).await["error"], "model offline");

        let current = app.oneshot(get_session()).await.expect("router dispatch");
        assert_eq!(current.status(), StatusCode::OK);
        let payload = read_json(current).await;
        assert_eq!(payload["summary"]["job_id"], "abc123");
        assert_eq!(payload["last_error"], "model offline");
        assert_eq!(payload["rows"].as_array().expect("rows").len(), 3);
    }

    #[tokio::test]
    async fn evaluation_form_without_job_description_is_rejected() {
        let backend = Arc::new(ScriptedBackend::new(Vec::new()));
        let app = router(Arc::new(ScreeningSession::new(backend.clone())), true);

        let response = app
            .oneshot(evaluation_form("   ", &[("a.pdf", b"%PDF".as_slice())]))
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(response).await["error"], "Enter a job description");
        assert!(backend.received().is_empty());
    }

    #[tokio::test]
    async fn sort_endpoint_toggles_the_session_ordering() {
        let session =
            ScreeningSession::with_response(Arc::new(OfflineBackend), sample_response());
        let app = router(Arc::new(session), true);

        let flipped = app
            .clone()
            .oneshot(post_json("/api/v1/session/sort", json!({ "field": "final" })))
            .await
            .expect("router dispatch");
        assert_eq!(flipped.status(), StatusCode::OK);
        let payload = read_json(flipped).await;
        assert_eq!(payload["sort"], "final");
        assert_eq!(payload["direction"], "asc");
        assert_eq!(payload["rows"][0]["candidate_id"], "resume_c.pdf");

        let switched = app
            .clone()
            .oneshot(post_json("/api/v1/session/sort", json!({ "field": "skill" })))
            .await
            .expect("router dispatch");
        let payload = read_json(switched).await;
        assert_eq!(payload["sort"], "skill");
        assert_eq!(payload["direction"], "desc");
        assert_eq!(payload["rows"][0]["candidate_id"], "resume_a.pdf");

        let current = app.oneshot(get_session()).await.expect("router dispatch");
        assert_eq!(read_json(current).await["sort"], "skill");
    }

    #[tokio::test]
    async fn sort_endpoint_without_results_is_not_found() {
        let app = router(empty_session(), true);
        let response = app
            .oneshot(post_json("/api/v1/session/sort", json!({ "field": "missing" })))
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
