use metrics_exporter_prometheus::PrometheusHandle;
use resume_screen::error::AppError;
use resume_screen::evaluation::{
    parse_structured_payload, EvaluationResponse, ExportArtifact, HttpEvaluationClient,
    ScreeningSession, SortDirection, SortField, SortState,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

pub(crate) type HttpSession = ScreeningSession<HttpEvaluationClient>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn sort_state(field: Option<SortField>, direction: Option<SortDirection>) -> SortState {
    SortState::new(field.unwrap_or_default(), direction.unwrap_or_default())
}

/// Loads a structured export written by a previous run.
pub(crate) async fn read_response(path: &Path) -> Result<EvaluationResponse, AppError> {
    let payload = tokio::fs::read(path).await?;
    Ok(parse_structured_payload(&payload)?)
}

/// The job id ends up in export file names, so it must not escape the output directory.
fn safe_file_name(file_name: &str) -> Result<&str, AppError> {
    let plain = !file_name.is_empty()
        && !file_name.contains(['/', '\\'])
        && file_name != "."
        && file_name != "..";
    if plain {
        Ok(file_name)
    } else {
        Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("refusing to write export with unsafe file name '{file_name}'"),
        )
        .into())
    }
}

/// Writes the artifact under `dir` using its own file name.
pub(crate) async fn write_artifact(
    dir: &Path,
    artifact: &ExportArtifact,
) -> Result<PathBuf, AppError> {
    let file_name = safe_file_name(&artifact.file_name)?;
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(file_name);
    tokio::fs::write(&path, &artifact.payload).await?;
    info!(
        path = %path.display(),
        format = %artifact.format,
        bytes = artifact.payload.len(),
        "export written"
    );
    Ok(path)
}

pub(crate) fn content_disposition(file_name: &str) -> String {
    format!("attachment; filename=\"{file_name}\"")
}
