use super::client::{EvaluationBackend, EvaluationError, EvaluationRequest};
use super::domain::{EvaluationResponse, EvaluationSummary, LoadingStatus};
use super::export::{ExportArtifact, ExportError};
use super::ranking::{RankedRow, SortField, SortState};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("an evaluation is already in progress")]
    EvaluationInFlight,
    #[error("no evaluation results are available yet")]
    NoResults,
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Results of the most recent successful evaluation as seen by a renderer.
#[derive(Debug, Clone)]
pub struct RankingView {
    pub response: Arc<EvaluationResponse>,
    pub sort: SortState,
    pub completed_at: DateTime<Utc>,
}

impl RankingView {
    pub fn rows(&self) -> Vec<RankedRow<'_>> {
        self.sort.apply(&self.response.results)
    }

    pub fn summary(&self) -> EvaluationSummary {
        self.response.summary()
    }

    pub fn export_structured(&self) -> Result<ExportArtifact, ExportError> {
        ExportArtifact::structured(&self.response)
    }

    /// CSV rows follow the order currently on screen.
    pub fn export_delimited(&self) -> Result<ExportArtifact, ExportError> {
        ExportArtifact::delimited(&self.response, &self.rows())
    }
}

#[derive(Debug, Clone)]
struct Completed {
    response: Arc<EvaluationResponse>,
    completed_at: DateTime<Utc>,
}

#[derive(Debug)]
struct SessionState {
    status: LoadingStatus,
    sort: SortState,
    latest: Option<Completed>,
    last_error: Option<String>,
}

/// One screening console: at most one evaluation in flight, the latest
/// response, and the table sort selection.
pub struct ScreeningSession<B> {
    backend: Arc<B>,
    in_flight: AtomicBool,
    state: Mutex<SessionState>,
}

impl<B> ScreeningSession<B>
where
    B: EvaluationBackend + 'static,
{
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            in_flight: AtomicBool::new(false),
            state: Mutex::new(SessionState {
                status: LoadingStatus::Idle,
                sort: SortState::default(),
                latest: None,
                last_error: None,
            }),
        }
    }

    /// Starts a session from a previously exported response.
    pub fn with_response(backend: Arc<B>, response: EvaluationResponse) -> Self {
        let session = Self::new(backend);
        session.store(response);
        session
    }

    pub fn status(&self) -> LoadingStatus {
        self.lock().status
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn sort(&self) -> SortState {
        self.lock().sort
    }

    /// Applies the header-click toggle and returns the new selection.
    pub fn select_sort(&self, field: SortField) -> SortState {
        let mut state = self.lock();
        state.sort.select(field);
        state.sort
    }

    pub fn set_sort(&self, sort: SortState) {
        self.lock().sort = sort;
    }

    pub fn last_error(&self) -> Option<String> {
        self.lock().last_error.clone()
    }

    pub fn view(&self) -> Option<RankingView> {
        let state = self.lock();
        state.latest.as_ref().map(|completed| RankingView {
            response: Arc::clone(&completed.response),
            sort: state.sort,
            completed_at: completed.completed_at,
        })
    }

    pub fn export_structured(&self) -> Result<ExportArtifact, SessionError> {
        let view = self.view().ok_or(SessionError::NoResults)?;
        Ok(view.export_structured()?)
    }

    pub fn export_delimited(&self) -> Result<ExportArtifact, SessionError> {
        let view = self.view().ok_or(SessionError::NoResults)?;
        Ok(view.export_delimited()?)
    }

    /// Runs one evaluation. A second call while one is outstanding fails
    /// immediately; a failed call leaves the previous results in place.
    pub async fn evaluate(
        &self,
        request: &EvaluationRequest,
    ) -> Result<Arc<EvaluationResponse>, SessionError> {
        let _guard = InFlightGuard::acquire(self)?;
        {
            let mut state = self.lock();
            state.status = LoadingStatus::Parsing;
            state.last_error = None;
        }

        let started = Instant::now();
        info!(files = request.resumes().len(), "evaluation started");

        match self.backend.evaluate(request).await {
            Ok(response) => {
                info!(
                    job_id = %response.job_id,
                    candidates = response.results.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "evaluation complete"
                );
                Ok(self.store(response))
            }
            Err(err) => {
                warn!(error = %err, "evaluation failed");
                self.lock().last_error = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    fn store(&self, response: EvaluationResponse) -> Arc<EvaluationResponse> {
        let response = Arc::new(response);
        self.lock().latest = Some(Completed {
            response: Arc::clone(&response),
            completed_at: Utc::now(),
        });
        response
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct InFlightGuard<'a, B>
where
    B: EvaluationBackend + 'static,
{
    session: &'a ScreeningSession<B>,
}

impl<'a, B> InFlightGuard<'a, B>
where
    B: EvaluationBackend + 'static,
{
    fn acquire(session: &'a ScreeningSession<B>) -> Result<Self, SessionError> {
        session
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SessionError::EvaluationInFlight)?;
        Ok(Self { session })
    }
}

impl<B> Drop for InFlightGuard<'_, B>
where
    B: EvaluationBackend + 'static,
{
    fn drop(&mut self) {
        self.session.lock().status = LoadingStatus::Idle;
        self.session.in_flight.store(false, Ordering::Release);
    }
}
