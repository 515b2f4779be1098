use super::domain::ResultRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Columns a ranking table can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// Positional; ordering by it keeps the current sequence.
    Rank,
    #[default]
    Final,
    Skill,
    Semantic,
    Matched,
    Missing,
}

impl SortField {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Rank,
            Self::Final,
            Self::Skill,
            Self::Semantic,
            Self::Matched,
            Self::Missing,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rank => "rank",
            Self::Final => "final",
            Self::Skill => "skill",
            Self::Semantic => "semantic",
            Self::Matched => "matched",
            Self::Missing => "missing",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Rank => "Rank",
            Self::Final => "Final Score",
            Self::Skill => "Skill Match",
            Self::Semantic => "Semantic",
            Self::Matched => "Matched",
            Self::Missing => "Missing",
        }
    }

    fn compare(self, left: &ResultRecord, right: &ResultRecord) -> Ordering {
        match self {
            Self::Rank => Ordering::Equal,
            Self::Final => compare_scores(left.final_match_score, right.final_match_score),
            Self::Skill => compare_scores(left.skill_match_score, right.skill_match_score),
            Self::Semantic => compare_scores(
                left.semantic_similarity_score,
                right.semantic_similarity_score,
            ),
            Self::Matched => left.matched_skills.len().cmp(&right.matched_skills.len()),
            Self::Missing => left.missing_skills.len().cmp(&right.missing_skills.len()),
        }
    }
}

/// Numeric order where `-0.0 == 0.0`; NaN falls back to the total order.
fn compare_scores(left: f64, right: f64) -> Ordering {
    left.partial_cmp(&right).unwrap_or_else(|| left.total_cmp(&right))
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = RankingParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ordered()
            .into_iter()
            .find(|field| field.as_str() == normalized)
            .ok_or_else(|| RankingParseError::UnknownField(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "asc")]
    Ascending,
    #[default]
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }

    pub const fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = RankingParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            _ => Err(RankingParseError::UnknownDirection(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RankingParseError {
    #[error("unknown sort field '{0}' (expected rank, final, skill, semantic, matched, or missing)")]
    UnknownField(String),
    #[error("unknown sort direction '{0}' (expected asc or desc)")]
    UnknownDirection(String),
}

/// Interactive sort selection owned by whatever renders the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortState {
    pub const fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Re-selecting the active field flips direction; a new field starts descending.
    pub fn select(&mut self, field: SortField) {
        if self.field == field {
            self.direction = self.direction.flipped();
        } else {
            self.field = field;
            self.direction = SortDirection::Descending;
        }
    }

    pub fn apply<'a>(&self, records: &'a [ResultRecord]) -> Vec<RankedRow<'a>> {
        rank(records, self.field, self.direction)
    }
}

/// A record paired with its 1-based position in a ranked sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedRow<'a> {
    pub rank: usize,
    pub record: &'a ResultRecord,
}

/// Orders records for display without touching the input slice.
///
/// The sort is stable in both directions so tied records keep their input
/// order. Display ranks are assigned from the returned order.
pub fn rank(
    records: &[ResultRecord],
    field: SortField,
    direction: SortDirection,
) -> Vec<RankedRow<'_>> {
    let mut ordered: Vec<&ResultRecord> = records.iter().collect();

    match direction {
        SortDirection::Ascending => ordered.sort_by(|a, b| field.compare(a, b)),
        SortDirection::Descending => ordered.sort_by(|a, b| field.compare(b, a)),
    }

    ordered
        .into_iter()
        .enumerate()
        .map(|(idx, record)| RankedRow {
            rank: idx + 1,
            record,
        })
        .collect()
}
