use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Named entities extracted upstream, kept in extraction order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamedEntitySet {
    #[serde(rename = "PERSON", deserialize_with = "null_as_default")]
    pub person: Vec<String>,
    #[serde(rename = "ORG", deserialize_with = "null_as_default")]
    pub org: Vec<String>,
    #[serde(rename = "GPE", deserialize_with = "null_as_default")]
    pub gpe: Vec<String>,
    #[serde(rename = "DATE", deserialize_with = "null_as_default")]
    pub date: Vec<String>,
}

/// One evaluated candidate as returned by the evaluation backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultRecord {
    #[serde(deserialize_with = "lenient_text")]
    pub candidate_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub emails: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub phones: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub github: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub linkedin: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub extracted_skills: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub matched_skills: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub missing_skills: Vec<String>,
    #[serde(deserialize_with = "lenient_score")]
    pub skill_match_score: f64,
    #[serde(deserialize_with = "lenient_score")]
    pub semantic_similarity_score: f64,
    #[serde(deserialize_with = "lenient_score")]
    pub final_match_score: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub ner_entities: NamedEntitySet,
    #[serde(deserialize_with = "null_as_default")]
    pub short_reason: String,
}

impl ResultRecord {
    pub fn score_band(&self) -> ScoreBand {
        ScoreBand::for_score(self.final_match_score)
    }
}

/// Output of one evaluation run. Treated as immutable once received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationResponse {
    #[serde(deserialize_with = "lenient_text")]
    pub job_id: String,
    #[serde(deserialize_with = "lenient_count")]
    pub total_candidates: u64,
    #[serde(deserialize_with = "lenient_score")]
    pub processing_time_ms: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub results: Vec<ResultRecord>,
}

impl EvaluationResponse {
    pub fn summary(&self) -> EvaluationSummary {
        let scores = self.results.iter().map(|record| record.final_match_score);
        let (top_score, average_score) = if self.results.is_empty() {
            (0.0, 0.0)
        } else {
            (
                scores.clone().fold(f64::NEG_INFINITY, f64::max),
                scores.sum::<f64>() / self.results.len() as f64,
            )
        };

        EvaluationSummary {
            job_id: self.job_id.clone(),
            total_candidates: self.total_candidates,
            top_score,
            average_score,
            processing_time_ms: self.processing_time_ms,
        }
    }

    pub fn find(&self, candidate_id: &str) -> Option<&ResultRecord> {
        self.results
            .iter()
            .find(|record| record.candidate_id == candidate_id)
    }
}

/// Headline metrics for a results dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationSummary {
    pub job_id: String,
    pub total_candidates: u64,
    pub top_score: f64,
    pub average_score: f64,
    pub processing_time_ms: f64,
}

/// Badge bucket for a match score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    High,
    Medium,
    Low,
}

impl ScoreBand {
    pub fn for_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::High
        } else if score >= 50.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

/// Progress phases shown while an evaluation is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadingStatus {
    Idle,
    Parsing,
    Extracting,
    Calculating,
    Complete,
}

impl LoadingStatus {
    pub const fn message(self) -> &'static str {
        match self {
            Self::Idle => "",
            Self::Parsing => "Parsing PDFs...",
            Self::Extracting => "Extracting skills...",
            Self::Calculating => "Calculating scores...",
            Self::Complete => "Complete!",
        }
    }

    pub const fn is_busy(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// Treats an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScore {
    Number(f64),
    Text(String),
}

/// Accepts numbers, numeric strings, and null; anything unparseable becomes 0.0.
fn lenient_score<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawScore>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawScore::Number(value)) => value,
        Some(RawScore::Text(text)) => text.trim().parse().unwrap_or(0.0),
        None => 0.0,
    })
}

/// Identifiers may arrive as strings or bare numbers; anything else is empty.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        _ => String::new(),
    })
}

/// Counts accept integers, integral floats and numeric strings; anything else is 0.
fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let count = match Value::deserialize(deserializer)? {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_f64().and_then(whole_count)),
        Value::String(text) => {
            let text = text.trim();
            text.parse::<u64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().and_then(whole_count))
        }
        _ => None,
    };
    Ok(count.unwrap_or(0))
}

fn whole_count(value: f64) -> Option<u64> {
    (value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64)
        .then_some(value as u64)
}
