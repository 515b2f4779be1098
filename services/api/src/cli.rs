use crate::infra::{read_response, sort_state, write_artifact, HttpSession};
use crate::report::{CandidateDetail, RankingTable, SummaryCards, UploadList};
use crate::server;
use clap::{Args, Parser, Subcommand};
use resume_screen::config::AppConfig;
use resume_screen::error::AppError;
use resume_screen::evaluation::{
    EvaluationRequest, EvaluationResponse, ExportArtifact, ExportFormat, HttpEvaluationClient,
    LoadingStatus, RankingView, ResumeUpload, SessionError, SortDirection, SortField, SortState,
};
use resume_screen::telemetry;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

const PROGRESS_INTERVAL: Duration = Duration::from_secs(3);
const PROGRESS_STEPS: [LoadingStatus; 3] = [
    LoadingStatus::Parsing,
    LoadingStatus::Extracting,
    LoadingStatus::Calculating,
];

#[derive(Parser, Debug)]
#[command(
    name = "Resume Screening Console",
    about = "Submit resumes for AI screening, then rank and export the results",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Send a job description and PDF resumes to the evaluation backend
    Evaluate(EvaluateArgs),
    /// Render a saved structured export as a ranking table
    Rank(RankArgs),
    /// Convert a saved structured export into a download file
    Export(ExportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Structured export to expose through the session endpoint
    #[arg(long)]
    pub(crate) seed: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Copy, Default)]
pub(crate) struct SortArgs {
    /// Column to order by (rank, final, skill, semantic, matched, missing)
    #[arg(long)]
    pub(crate) sort: Option<SortField>,
    /// Sort direction (asc or desc)
    #[arg(long)]
    pub(crate) direction: Option<SortDirection>,
}

impl SortArgs {
    fn state(self) -> SortState {
        sort_state(self.sort, self.direction)
    }
}

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Text file holding the job description
    #[arg(long)]
    pub(crate) jd: PathBuf,
    /// PDF resume to evaluate; repeat for multiple files
    #[arg(long = "resume", required = true)]
    pub(crate) resumes: Vec<PathBuf>,
    #[command(flatten)]
    pub(crate) sort: SortArgs,
    /// Write the structured export into this directory
    #[arg(long)]
    pub(crate) json_out: Option<PathBuf>,
    /// Write the delimited export into this directory
    #[arg(long)]
    pub(crate) csv_out: Option<PathBuf>,
    /// Show the expanded view for this candidate id
    #[arg(long)]
    pub(crate) details: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// Structured export produced by `evaluate --json-out`
    #[arg(long)]
    pub(crate) input: PathBuf,
    #[command(flatten)]
    pub(crate) sort: SortArgs,
    /// Show the expanded view for this candidate id
    #[arg(long)]
    pub(crate) details: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// Structured export produced by `evaluate --json-out`
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Output format (json or csv)
    #[arg(long)]
    pub(crate) format: ExportFormat,
    #[command(flatten)]
    pub(crate) sort: SortArgs,
    /// Output directory (defaults to SCREEN_EXPORT_DIR)
    #[arg(long)]
    pub(crate) out: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Evaluate(args) => run_evaluate(args).await,
        Command::Rank(args) => run_rank(args).await,
        Command::Export(args) => run_export(args).await,
    }
}

async fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let job_description = tokio::fs::read_to_string(&args.jd).await?;
    let mut uploads = Vec::with_capacity(args.resumes.len());
    for path in &args.resumes {
        uploads.push(ResumeUpload::from_path(path).await?);
    }
    print!("{}", UploadList(&uploads));

    let request = EvaluationRequest::new(job_description, uploads)?;
    let client = HttpEvaluationClient::new(&config.backend)?;
    let session = HttpSession::new(Arc::new(client));
    session.set_sort(args.sort.state());

    evaluate_with_progress(&session, &request).await?;
    eprintln!("{}", LoadingStatus::Complete.message());

    let view = session.view().ok_or(SessionError::NoResults)?;
    render_view(&view, args.details.as_deref());

    if let Some(dir) = args.json_out {
        let path = write_artifact(&dir, &view.export_structured()?).await?;
        println!("\nSaved {}", path.display());
    }
    if let Some(dir) = args.csv_out {
        let path = write_artifact(&dir, &view.export_delimited()?).await?;
        println!("Saved {}", path.display());
    }

    Ok(())
}

async fn evaluate_with_progress(
    session: &HttpSession,
    request: &EvaluationRequest,
) -> Result<Arc<EvaluationResponse>, AppError> {
    let evaluation = session.evaluate(request);
    tokio::pin!(evaluation);

    let mut ticker = tokio::time::interval(PROGRESS_INTERVAL);
    let mut step = 0;
    loop {
        tokio::select! {
            outcome = &mut evaluation => return Ok(outcome?),
            _ = ticker.tick() => {
                let status = PROGRESS_STEPS[step.min(PROGRESS_STEPS.len() - 1)];
                eprintln!("{}", status.message());
                step += 1;
            }
        }
    }
}

async fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let response = read_response(&args.input).await?;
    let view = RankingView {
        response: Arc::new(response),
        sort: args.sort.state(),
        completed_at: chrono::Utc::now(),
    };
    render_view(&view, args.details.as_deref());
    Ok(())
}

async fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let response = read_response(&args.input).await?;
    let sort = args.sort.state();

    let artifact = match args.format {
        ExportFormat::Json => ExportArtifact::structured(&response)?,
        ExportFormat::Csv => ExportArtifact::delimited(&response, &sort.apply(&response.results))?,
    };

    let dir = args.out.unwrap_or(config.export.output_dir);
    let path = write_artifact(&dir, &artifact).await?;
    println!("Saved {}", path.display());
    Ok(())
}

fn render_view(view: &RankingView, details: Option<&str>) {
    print!("{}", SummaryCards(&view.summary()));
    println!();
    let rows = view.rows();
    print!(
        "{}",
        RankingTable {
            rows: &rows,
            sort: view.sort,
        }
    );

    if let Some(candidate_id) = details {
        println!();
        match view.response.find(candidate_id) {
            Some(record) => print!("{}", CandidateDetail(record)),
            None => println!("No candidate with id '{candidate_id}'"),
        }
    }
}
