use super::domain::EvaluationResponse;
use crate::config::BackendConfig;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Job descriptions longer than this are truncated before submission.
pub const MAX_JD_LENGTH: usize = 10_000;

const PDF_CONTENT_TYPE: &str = "application/pdf";

#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error("Enter a job description")]
    MissingJobDescription,
    #[error("Upload at least one resume")]
    NoResumes,
    #[error("failed to read resume '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Cannot connect to backend server. Make sure the backend is running at {url}")]
    Connect { url: String },
    #[error("{message}")]
    Backend { status: u16, message: String },
    #[error("request to evaluation backend failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl EvaluationError {
    /// Errors caused by the caller's input rather than the backend.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingJobDescription | Self::NoResumes)
    }
}

/// One résumé file selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ResumeUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, EvaluationError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| EvaluationError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self::new(file_name, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_pdf(&self) -> bool {
        mime_guess::from_path(&self.file_name)
            .first()
            .is_some_and(|guess| guess == mime::APPLICATION_PDF)
    }
}

/// Validated input for one evaluation run.
#[derive(Debug, Clone)]
pub struct EvaluationRequest {
    job_description: String,
    resumes: Vec<ResumeUpload>,
}

impl EvaluationRequest {
    /// Truncates the job description and drops non-PDF uploads.
    pub fn new(
        job_description: impl Into<String>,
        uploads: Vec<ResumeUpload>,
    ) -> Result<Self, EvaluationError> {
        let mut job_description = job_description.into();
        if job_description.trim().is_empty() {
            return Err(EvaluationError::MissingJobDescription);
        }
        if let Some((cut, _)) = job_description.char_indices().nth(MAX_JD_LENGTH) {
            job_description.truncate(cut);
        }

        let resumes: Vec<ResumeUpload> = uploads
            .into_iter()
            .filter(|upload| {
                let keep = upload.is_pdf();
                if !keep {
                    warn!(file = %upload.file_name, "skipping non-PDF upload");
                }
                keep
            })
            .collect();

        if resumes.is_empty() {
            return Err(EvaluationError::NoResumes);
        }

        Ok(Self {
            job_description,
            resumes,
        })
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }

    pub fn resumes(&self) -> &[ResumeUpload] {
        &self.resumes
    }
}

/// Anything able to turn a request into an evaluation response.
#[async_trait]
pub trait EvaluationBackend: Send + Sync {
    async fn evaluate(
        &self,
        request: &EvaluationRequest,
    ) -> Result<EvaluationResponse, EvaluationError>;
}

/// Multipart client for the `/api/evaluate` endpoint. No retries.
#[derive(Debug, Clone)]
pub struct HttpEvaluationClient {
    client: Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: serde_json::Value,
}

impl HttpEvaluationClient {
    pub fn new(config: &BackendConfig) -> Result<Self, EvaluationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.evaluate_url(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn form(request: &EvaluationRequest) -> Result<Form, EvaluationError> {
        let mut form = Form::new().text("jd_text", request.job_description().to_string());
        for upload in request.resumes() {
            let part = Part::bytes(upload.bytes.clone())
                .file_name(upload.file_name.clone())
                .mime_str(PDF_CONTENT_TYPE)?;
            form = form.part("resumes", part);
        }
        Ok(form)
    }
}

#[async_trait]
impl EvaluationBackend for HttpEvaluationClient {
    async fn evaluate(
        &self,
        request: &EvaluationRequest,
    ) -> Result<EvaluationResponse, EvaluationError> {
        debug!(
            endpoint = %self.endpoint,
            jd_chars = request.job_description().chars().count(),
            files = request.resumes().len(),
            "submitting evaluation"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(Self::form(request)?)
            .send()
            .await
            .map_err(|err| {
                if err.is_connect() {
                    EvaluationError::Connect {
                        url: self.endpoint.clone(),
                    }
                } else {
                    EvaluationError::Transport(err)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => backend_detail(body.detail)
                    .unwrap_or_else(|| format!("API Error: {}", status.as_u16())),
                Err(_) => "Unknown error".to_string(),
            };
            return Err(EvaluationError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<EvaluationResponse>().await?)
    }
}

fn backend_detail(detail: serde_json::Value) -> Option<String> {
    match detail {
        serde_json::Value::Null => None,
        serde_json::Value::String(text) if text.is_empty() => None,
        serde_json::Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}
