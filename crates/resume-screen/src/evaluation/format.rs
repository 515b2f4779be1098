use super::domain::{NamedEntitySet, ResultRecord};
use serde::Serialize;

/// Sentinel rendered wherever a multi-valued field is empty.
pub const NOT_AVAILABLE: &str = "NA";

pub const DEFAULT_SEPARATOR: &str = ", ";

/// First value of a sequence, or `NA` when empty. Values are not validated.
pub fn format_single<S: AsRef<str>>(values: &[S]) -> String {
    values
        .first()
        .map(|value| value.as_ref().to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// All values joined by `separator`, or `NA` when empty.
pub fn format_joined<S: AsRef<str>>(values: &[S], separator: &str) -> String {
    if values.is_empty() {
        return NOT_AVAILABLE.to_string();
    }

    let mut joined = String::new();
    for (idx, value) in values.iter().enumerate() {
        if idx > 0 {
            joined.push_str(separator);
        }
        joined.push_str(value.as_ref());
    }
    joined
}

/// Fixed one-decimal rendering with `.` as the decimal separator.
pub fn format_score(score: f64) -> String {
    format!("{score:.1}")
}

pub fn format_processing_time(milliseconds: f64) -> String {
    format!("{:.2}", milliseconds / 1000.0)
}

pub fn format_file_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;

    if bytes < KIB {
        format!("{bytes} B")
    } else if bytes < MIB {
        format!("{:.1} KB", bytes as f64 / KIB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    }
}

/// Entity slots flattened for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedEntityView {
    pub person: String,
    pub org: String,
    pub gpe: String,
    pub date: String,
}

pub fn format_entities(entities: &NamedEntitySet) -> NamedEntityView {
    NamedEntityView {
        person: format_joined(&entities.person, DEFAULT_SEPARATOR),
        org: format_joined(&entities.org, DEFAULT_SEPARATOR),
        gpe: format_joined(&entities.gpe, DEFAULT_SEPARATOR),
        date: format_joined(&entities.date, DEFAULT_SEPARATOR),
    }
}

/// Single-value contact fields for a candidate detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactView {
    pub email: String,
    pub phone: String,
    pub github: String,
    pub linkedin: String,
}

impl ContactView {
    pub fn from_record(record: &ResultRecord) -> Self {
        Self {
            email: format_single(&record.emails),
            phone: format_single(&record.phones),
            github: format_single(&record.github),
            linkedin: format_single(&record.linkedin),
        }
    }
}
