use super::domain::EvaluationResponse;
use super::format::{format_joined, format_score, format_single};
use super::ranking::RankedRow;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DELIMITED_HEADER: [&str; 10] = [
    "Rank",
    "Candidate ID",
    "Final Score (%)",
    "Skill Match (%)",
    "Semantic Similarity (%)",
    "Matched Skills",
    "Missing Skills",
    "Emails",
    "Phones",
    "Short Reason",
];

const SKILL_SEPARATOR: &str = "; ";
const FILE_STEM: &str = "evaluation_results";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }

    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Csv => "text/csv",
        }
    }

    /// `evaluation_results_<job_id>.<ext>`, using the job id verbatim.
    pub fn file_name(self, job_id: &str) -> String {
        format!("{FILE_STEM}_{job_id}.{}", self.extension())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(ExportError::UnknownFormat(value.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("unknown export format '{0}' (expected json or csv)")]
    UnknownFormat(String),
    #[error("failed to encode structured export: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to decode structured export: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("failed to encode delimited export: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush delimited export: {0}")]
    Io(#[from] std::io::Error),
}

/// Serializes the whole response, preserving backend result order.
pub fn to_structured_payload(response: &EvaluationResponse) -> Result<Vec<u8>, ExportError> {
    serde_json::to_vec_pretty(response).map_err(ExportError::Encode)
}

pub fn parse_structured_payload(payload: &[u8]) -> Result<EvaluationResponse, ExportError> {
    serde_json::from_slice(payload).map_err(ExportError::Decode)
}

/// Writes the ranking as it is currently displayed.
///
/// Only the short reason is quoted (internal quotes doubled); every other
/// value is written as-is. Each row, the last included, ends with `\n`.
pub fn to_delimited_payload(rows: &[RankedRow<'_>]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(DELIMITED_HEADER)?;

    for row in rows {
        let record = row.record;
        writer.write_record([
            row.rank.to_string(),
            record.candidate_id.clone(),
            format_score(record.final_match_score),
            format_score(record.skill_match_score),
            format_score(record.semantic_similarity_score),
            format_joined(&record.matched_skills, SKILL_SEPARATOR),
            format_joined(&record.missing_skills, SKILL_SEPARATOR),
            format_single(&record.emails),
            format_single(&record.phones),
            quote_field(&record.short_reason),
        ])?;
    }

    writer.flush()?;
    writer
        .into_inner()
        .map_err(|err| std::io::Error::new(err.error().kind(), err.to_string()).into())
}

fn quote_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// In-memory download payload plus the metadata needed to deliver it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub format: ExportFormat,
    pub file_name: String,
    pub content_type: &'static str,
    pub payload: Vec<u8>,
}

impl ExportArtifact {
    pub fn structured(response: &EvaluationResponse) -> Result<Self, ExportError> {
        Ok(Self::new(
            ExportFormat::Json,
            &response.job_id,
            to_structured_payload(response)?,
        ))
    }

    pub fn delimited(
        response: &EvaluationResponse,
        displayed: &[RankedRow<'_>],
    ) -> Result<Self, ExportError> {
        Ok(Self::new(
            ExportFormat::Csv,
            &response.job_id,
            to_delimited_payload(displayed)?,
        ))
    }

    fn new(format: ExportFormat, job_id: &str, payload: Vec<u8>) -> Self {
        Self {
            format,
            file_name: format.file_name(job_id),
            content_type: format.content_type(),
            payload,
        }
    }
}
