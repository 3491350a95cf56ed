//! sowtrack CLI - stakeholder dashboard for a GitHub project board.

mod render;

use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use sowtrack_ai::{AzureOpenAiClient, AzureOpenAiConfig, Dashboard, LoadState, SummaryState, SOW_DOCUMENT};
use sowtrack_core::{FeatureStatus, PhaseCatalog, PhaseId, Time};
use sowtrack_github::{GitHubClient, GitHubConfig, SnapshotFile, GITHUB_GRAPHQL_URL};
use sowtrack_progress::{FeatureFilter, FilterOptions, ProjectProfile};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sowtrack")]
#[command(about = "Read-only progress dashboard for a statement-of-work project board", long_about = None)]
struct Cli {
    /// GitHub token; without it (and without --snapshot) the dashboard runs in demo mode
    #[arg(long, env = "GITHUB_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    /// Board owner login
    #[arg(long, env = "SOWTRACK_OWNER", default_value = "buddahb88", global = true)]
    owner: String,

    /// Repository name used in fallback titles
    #[arg(long, env = "SOWTRACK_REPO", default_value = "EllaCap_EQ", global = true)]
    repo: String,

    /// Board number
    #[arg(long, env = "SOWTRACK_PROJECT", default_value = "3", global = true)]
    project: u32,

    /// GraphQL endpoint
    #[arg(long, default_value = GITHUB_GRAPHQL_URL, global = true)]
    graphql_url: String,

    /// Read a saved GraphQL response instead of calling the API
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// Pin the current time (RFC 3339)
    #[arg(long, global = true)]
    now: Option<String>,

    /// Azure OpenAI resource endpoint
    #[arg(long, env = "AZURE_OPENAI_ENDPOINT", global = true)]
    azure_endpoint: Option<String>,

    /// Azure OpenAI deployment name
    #[arg(long, env = "AZURE_OPENAI_DEPLOYMENT", global = true)]
    azure_deployment: Option<String>,

    /// Azure OpenAI api-version
    #[arg(long, env = "AZURE_OPENAI_API_VERSION", global = true)]
    azure_api_version: Option<String>,

    /// Azure OpenAI key
    #[arg(long, env = "AZURE_OPENAI_KEY", global = true, hide_env_values = true)]
    azure_key: Option<String>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Headline metrics, phases, timeline and recent activity
    Overview,
    /// Phase breakdown
    Phases {
        /// Show one phase in detail
        #[arg(long)]
        phase: Option<String>,
    },
    /// Feature list
    Features {
        /// Only this phase
        #[arg(long)]
        phase: Option<String>,
        /// Only this status (completed, in-progress)
        #[arg(long)]
        status: Option<FeatureStatus>,
        /// Only this assignee
        #[arg(long)]
        assignee: Option<String>,
        /// Case-insensitive text in title or description
        #[arg(long)]
        search: Option<String>,
    },
    /// Full project view as JSON
    Json,
    /// Narrative executive summary
    Summary,
    /// Statement of work
    Sow,
    /// Phase catalog
    Catalog,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    let catalog = PhaseCatalog::sow();

    match &cli.command {
        Commands::Sow => {
            println!("{}", SOW_DOCUMENT.trim());
            return Ok(());
        }
        Commands::Catalog => {
            print!("{}", render::catalog(&catalog));
            return Ok(());
        }
        _ => {}
    }

    let now = parse_now(cli.now.as_deref())?;
    let mut dashboard = build_dashboard(&cli, catalog);

    match dashboard.refresh(now).await {
        LoadState::Loaded { items, .. } => debug!("Loaded {} items", items),
        LoadState::Demo => {
            println!("Demo mode: set GITHUB_TOKEN (or pass --snapshot) to load live project data.");
            return Ok(());
        }
        LoadState::Failed { message, kind } => bail!("Failed to load project ({:?}): {}", kind, message),
        LoadState::Idle => bail!("Project was not loaded"),
    }

    if let Commands::Summary = cli.command {
        return match dashboard.generate_summary().await {
            SummaryState::Ready(text) => {
                println!("{}", text);
                Ok(())
            }
            SummaryState::Failed(message) => bail!("{}", message),
            SummaryState::Idle => bail!("Summary was not requested"),
        };
    }

    let view = dashboard.view().ok_or_else(|| anyhow!("No project data loaded"))?;

    match cli.command {
        Commands::Overview => print!("{}", render::overview(view, now)),
        Commands::Phases { phase: None } => print!("{}", render::phase_table(view)),
        Commands::Phases { phase: Some(id) } => {
            let id = PhaseId::new(id);
            let phase = dashboard
                .catalog()
                .get(&id)
                .ok_or_else(|| anyhow!("Unknown phase: {}", id))?;
            print!("{}", render::phase_detail(phase, view.phase_metrics.get(id.as_str())));
        }
        Commands::Features {
            phase,
            status,
            assignee,
            search,
        } => {
            let filter = FeatureFilter {
                phase: phase.map(PhaseId::new),
                status,
                assignee,
                search,
            };
            let shown = filter.apply(&view.features);
            print!(
                "{}",
                render::feature_table(&shown, view.features.len(), filter.is_active())
            );
            if shown.is_empty() && filter.is_active() {
                print!("{}", render::filter_options(&FilterOptions::from_features(&view.features)));
            }
        }
        Commands::Json => println!("{}", serde_json::to_string_pretty(view)?),
        Commands::Summary | Commands::Sow | Commands::Catalog => {}
    }

    Ok(())
}

fn parse_now(now: Option<&str>) -> Result<Time> {
    match now {
        Some(raw) => Ok(DateTime::parse_from_rfc3339(raw)
            .map_err(|e| anyhow!("Invalid --now value {:?}: {}", raw, e))?
            .with_timezone(&Utc)),
        None => Ok(Utc::now()),
    }
}

fn build_dashboard(cli: &Cli, catalog: PhaseCatalog) -> Dashboard {
    let profile = ProjectProfile {
        owner: cli.owner.clone(),
        repo: cli.repo.clone(),
        ..Default::default()
    };
    let mut dashboard = Dashboard::new(catalog, profile);

    if let Some(path) = &cli.snapshot {
        info!("Using snapshot {}", path.display());
        dashboard = dashboard.with_source(Arc::new(SnapshotFile::new(path, &cli.owner, cli.project)));
    } else if let Some(token) = cli.token.as_deref().filter(|t| !t.trim().is_empty()) {
        let mut config = GitHubConfig::new(token, &cli.owner, cli.project);
        config.graphql_url = cli.graphql_url.clone();
        dashboard = dashboard.with_source(Arc::new(GitHubClient::new(config)));
    }

    let azure = AzureOpenAiConfig::from_parts(
        cli.azure_endpoint.clone(),
        cli.azure_deployment.clone(),
        cli.azure_api_version.clone(),
        cli.azure_key.clone(),
    );
    if let Some(config) = azure {
        dashboard = dashboard.with_narrator(Arc::new(AzureOpenAiClient::new(config)));
    }

    dashboard
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_now() {
        let now = parse_now(Some("2025-02-01T12:00:00+02:00")).unwrap();
        assert_eq!(now, Utc.with_ymd_and_hms(2025, 2, 1, 10, 0, 0).unwrap());
        assert!(parse_now(Some("yesterday")).is_err());
    }

    #[test]
    fn test_cli_parses_feature_filters() {
        let cli = Cli::try_parse_from([
            "sowtrack",
            "features",
            "--phase",
            "phase1b",
            "--status",
            "in-progress",
            "--owner",
            "acme",
        ])
        .unwrap();
        assert_eq!(cli.owner, "acme");
        match cli.command {
            Commands::Features { phase, status, .. } => {
                assert_eq!(phase.as_deref(), Some("phase1b"));
                assert_eq!(status, Some(FeatureStatus::InProgress));
            }
            _ => panic!("expected features"),
        }
    }

    #[test]
    fn test_demo_without_token_or_snapshot() {
        let cli = Cli::try_parse_from(["sowtrack", "--token", "", "overview"]).unwrap();
        let dashboard = build_dashboard(&cli, PhaseCatalog::sow());
        assert!(dashboard.view().is_none());
        assert_eq!(dashboard.profile().repo, "EllaCap_EQ");
    }
}
