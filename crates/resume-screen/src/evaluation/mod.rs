//! Candidate evaluation results: data model, display formatting, client-side
//! ranking, and export to JSON and CSV.
//!
//! Ranking and export are pure and synchronous. The only asynchronous
//! boundary is [`EvaluationBackend::evaluate`], driven one call at a time by
//! [`ScreeningSession`].

pub mod client;
pub mod domain;
pub mod export;
pub mod format;
pub mod ranking;
pub mod session;

pub use client::{
    EvaluationBackend, EvaluationError, EvaluationRequest, HttpEvaluationClient, ResumeUpload,
    MAX_JD_LENGTH,
};
pub use domain::{
    EvaluationResponse, EvaluationSummary, LoadingStatus, NamedEntitySet, ResultRecord, ScoreBand,
};
pub use export::{
    parse_structured_payload, to_delimited_payload, to_structured_payload, ExportArtifact,
    ExportError, ExportFormat, DELIMITED_HEADER,
};
pub use format::{
    format_entities, format_file_size, format_joined, format_processing_time, format_score,
    format_single, ContactView, NamedEntityView, DEFAULT_SEPARATOR, NOT_AVAILABLE,
};
pub use ranking::{rank, RankedRow, RankingParseError, SortDirection, SortField, SortState};
pub use session::{RankingView, ScreeningSession, SessionError};
