use crate::config::ConfigError;
use crate::evaluation::{EvaluationError, ExportError, RankingParseError, SessionError};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Evaluation(EvaluationError),
    Session(SessionError),
    Export(ExportError),
    Ranking(RankingParseError),
    /// A submitted form could not be read.
    Upload(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Ranking(_)
            | AppError::Upload(_)
            | AppError::Export(ExportError::UnknownFormat(_)) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Evaluation(err) | AppError::Session(SessionError::Evaluation(err))
                if err.is_validation() =>
            {
                StatusCode::BAD_REQUEST
            }
            AppError::Evaluation(_) | AppError::Session(SessionError::Evaluation(_)) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Session(SessionError::EvaluationInFlight) => StatusCode::CONFLICT,
            AppError::Session(SessionError::NoResults) => StatusCode::NOT_FOUND,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Export(_)
            | AppError::Session(SessionError::Export(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Evaluation(err) => write!(f, "{}", err),
            AppError::Session(err) => write!(f, "{}", err),
            AppError::Export(err) => write!(f, "export error: {}", err),
            AppError::Ranking(err) => write!(f, "{}", err),
            AppError::Upload(reason) => write!(f, "invalid upload: {}", reason),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Evaluation(err) => Some(err),
            AppError::Session(err) => Some(err),
            AppError::Export(err) => Some(err),
            AppError::Ranking(err) => Some(err),
            AppError::Upload(_) => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<EvaluationError> for AppError {
    fn from(value: EvaluationError) -> Self {
        Self::Evaluation(value)
    }
}

impl From<SessionError> for AppError {
    fn from(value: SessionError) -> Self {
        Self::Session(value)
    }
}

impl From<ExportError> for AppError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}

impl From<RankingParseError> for AppError {
    fn from(value: RankingParseError) -> Self {
        Self::Ranking(value)
    }
}
