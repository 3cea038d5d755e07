use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use reports::{
    CheckInSource, CompetitionExport, Config, ExportSource, Session, collect_check_ins,
    render::render_table, validator::ExportValidator,
};
use scoring::{CheckInFetch, LeaderboardBuilder, LeaderboardSnapshot, MissingDataPolicy};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "report")]
#[command(about = "Competition leaderboard reports", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a leaderboard from a competition export
    Build {
        file: PathBuf,

        #[command(flatten)]
        output: OutputArgs,

        /// Refuse to build when any participant's check-ins are unavailable
        #[arg(long)]
        strict: bool,
    },
    /// Validate a competition export without scoring it
    Validate { file: PathBuf },
    /// Recompute one participant against a previously saved snapshot
    Update {
        snapshot: PathBuf,

        file: PathBuf,

        #[arg(long)]
        participant: Uuid,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(clap::Args)]
struct OutputArgs {
    /// Print the snapshot as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Also write the snapshot JSON to this file
    #[arg(long)]
    save: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "report={},reports={},scoring={}",
                    log_level, log_level, log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Build {
            file,
            output,
            strict,
        } => {
            let config = Config::from_env().context("Failed to load report configuration")?;
            handle_build(&config, &file, &output, strict).await?;
        }
        Commands::Validate { file } => {
            load_validated(&file).await?;
        }
        Commands::Update {
            snapshot,
            file,
            participant,
            output,
        } => {
            let config = Config::from_env().context("Failed to load report configuration")?;
            handle_update(&config, &snapshot, &file, participant, &output).await?;
        }
    }

    Ok(())
}

async fn load_validated(file: &Path) -> anyhow::Result<CompetitionExport> {
    tracing::info!("Loading competition export from: {}", file.display());

    let export = CompetitionExport::load(file)
        .await
        .with_context(|| format!("Failed to load {}", file.display()))?;

    tracing::info!(
        "Loaded competition {} (v{}, {} participants, {} check-ins)",
        export.competition.competition_id,
        export.competition.version,
        export.competition.participant_ids.len(),
        export.check_ins.len()
    );

    let validation_report = ExportValidator::validate(&export)?;
    validation_report.log_warnings();
    tracing::info!("Validation successful");

    Ok(export)
}

async fn handle_build(
    config: &Config,
    file: &Path,
    output: &OutputArgs,
    strict: bool,
) -> anyhow::Result<()> {
    let export = load_validated(file).await?;
    let definition = &export.competition;

    let source = ExportSource::new(&export);
    let session = Session::new(config.session_user_id);
    let fetches =
        collect_check_ins(&source, &session, definition, config.fetch_concurrency).await?;

    let policy = if strict {
        MissingDataPolicy::Refuse
    } else {
        config.missing_data
    };
    let snapshot = LeaderboardBuilder::new(policy).build(definition, &fetches, Utc::now())?;

    tracing::info!(
        "Built leaderboard: {} ranked, {} unranked",
        snapshot.total_participants,
        snapshot.stale_participants.len()
    );

    emit(&snapshot, output).await
}

async fn handle_update(
    config: &Config,
    snapshot_path: &Path,
    file: &Path,
    participant_id: Uuid,
    output: &OutputArgs,
) -> anyhow::Result<()> {
    let prior_json = tokio::fs::read_to_string(snapshot_path)
        .await
        .with_context(|| format!("Failed to read snapshot {}", snapshot_path.display()))?;
    let prior: LeaderboardSnapshot = serde_json::from_str(&prior_json)?;

    let export = load_validated(file).await?;
    let definition = &export.competition;

    let source = ExportSource::new(&export);
    let session = Session::new(config.session_user_id);
    let fetch = match source
        .fetch_check_ins(&session, definition, participant_id)
        .await
    {
        Ok(check_ins) => CheckInFetch::complete(check_ins),
        Err(e) if e.is_fatal() => return Err(e.into()),
        Err(e) => {
            tracing::warn!("Could not fetch check-ins of participant {}: {}", participant_id, e);
            CheckInFetch::failed(e.to_string())
        }
    };

    let snapshot = LeaderboardBuilder::new(config.missing_data).update(
        &prior,
        definition,
        participant_id,
        &fetch,
        Utc::now(),
    )?;

    if let Some(entry) = snapshot.entry(participant_id) {
        tracing::info!(
            "Participant {} now ranked {} with {} points",
            participant_id,
            entry.rank,
            entry.score.total_score
        );
    }

    emit(&snapshot, output).await
}

async fn emit(snapshot: &LeaderboardSnapshot, output: &OutputArgs) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(snapshot)?;

    if let Some(path) = &output.save {
        tokio::fs::write(path, &json)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Snapshot saved to: {}", path.display());
    }

    if output.json {
        println!("{}", json);
    } else {
        print!("{}", render_table(snapshot));
    }

    Ok(())
}
