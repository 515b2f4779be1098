use resume_screen::evaluation::{
    format_entities, format_file_size, format_joined, format_processing_time, format_score,
    ContactView, EvaluationSummary, RankedRow, ResultRecord, ResumeUpload, SortDirection,
    SortField, SortState, DEFAULT_SEPARATOR,
};
use std::fmt;

const CANDIDATE_WIDTH: usize = 28;
const SCORE_WIDTH: usize = 12;

pub(crate) struct UploadList<'a>(pub(crate) &'a [ResumeUpload]);

impl fmt::Display for UploadList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Resumes ({})", self.0.len())?;
        for upload in self.0 {
            writeln!(
                f,
                "- {} ({})",
                upload.file_name,
                format_file_size(upload.size())
            )?;
        }
        Ok(())
    }
}

pub(crate) struct SummaryCards<'a>(pub(crate) &'a EvaluationSummary);

impl fmt::Display for SummaryCards<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.0;
        writeln!(f, "Evaluation {}", summary.job_id)?;
        writeln!(f, "- Total candidates: {}", summary.total_candidates)?;
        writeln!(f, "- Top score: {}%", format_score(summary.top_score))?;
        writeln!(f, "- Average score: {}%", format_score(summary.average_score))?;
        writeln!(
            f,
            "- Processing time: {}s",
            format_processing_time(summary.processing_time_ms)
        )
    }
}

fn column_heading(field: SortField, sort: SortState) -> String {
    if field == sort.field {
        let arrow = match sort.direction {
            SortDirection::Ascending => "^",
            SortDirection::Descending => "v",
        };
        format!("{} {arrow}", field.label())
    } else {
        field.label().to_string()
    }
}

fn percent(score: f64) -> String {
    format!("{}%", format_score(score))
}

/// Ranking table in display order, one line per candidate.
pub(crate) struct RankingTable<'a> {
    pub(crate) rows: &'a [RankedRow<'a>],
    pub(crate) sort: SortState,
}

impl fmt::Display for RankingTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headings: Vec<String> = SortField::ordered()
            .into_iter()
            .map(|field| column_heading(field, self.sort))
            .collect();

        writeln!(
            f,
            "{:<6} {:<CANDIDATE_WIDTH$} {:>SCORE_WIDTH$} {:>SCORE_WIDTH$} {:>SCORE_WIDTH$} {:>9} {:>9}  Band",
            headings[0], "Candidate", headings[1], headings[2], headings[3], headings[4], headings[5],
        )?;

        if self.rows.is_empty() {
            return writeln!(f, "(no candidates)");
        }

        for row in self.rows {
            let record = row.record;
            writeln!(
                f,
                "{:<6} {:<CANDIDATE_WIDTH$} {:>SCORE_WIDTH$} {:>SCORE_WIDTH$} {:>SCORE_WIDTH$} {:>9} {:>9}  {}",
                format!("#{}", row.rank),
                record.candidate_id,
                percent(record.final_match_score),
                percent(record.skill_match_score),
                percent(record.semantic_similarity_score),
                record.matched_skills.len(),
                record.missing_skills.len(),
                record.score_band().label(),
            )?;
        }
        Ok(())
    }
}

/// Expanded view of a single candidate.
pub(crate) struct CandidateDetail<'a>(pub(crate) &'a ResultRecord);

impl fmt::Display for CandidateDetail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.0;
        let contact = ContactView::from_record(record);
        let entities = format_entities(&record.ner_entities);

        writeln!(f, "Candidate {}", record.candidate_id)?;
        writeln!(
            f,
            "Final {} ({}) | Skill {} | Semantic {}",
            percent(record.final_match_score),
            record.score_band().label(),
            percent(record.skill_match_score),
            percent(record.semantic_similarity_score)
        )?;

        writeln!(f, "\nContact")?;
        writeln!(f, "- Email: {}", contact.email)?;
        writeln!(f, "- Phone: {}", contact.phone)?;
        writeln!(f, "- GitHub: {}", contact.github)?;
        writeln!(f, "- LinkedIn: {}", contact.linkedin)?;

        writeln!(f, "\nSkills")?;
        for (label, skills) in [
            ("Matched", &record.matched_skills),
            ("Missing", &record.missing_skills),
            ("Extracted", &record.extracted_skills),
        ] {
            writeln!(f, "- {label}: {}", format_joined(skills, DEFAULT_SEPARATOR))?;
        }

        writeln!(f, "\nEntities")?;
        writeln!(f, "- Person: {}", entities.person)?;
        writeln!(f, "- Organizations: {}", entities.org)?;
        writeln!(f, "- Locations: {}", entities.gpe)?;
        writeln!(f, "- Dates: {}", entities.date)?;

        writeln!(f, "\nReason")?;
        writeln!(f, "{}", record.short_reason)
    }
}
