use std::path::PathBuf;
use std::sync::Arc;

use analysis::SummaryReporter;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use collector::{IssueState, RepoFetcher, RepoName, RestGithubClient};
use common::{config::AppConfig, logging};
use tracing::info;

#[derive(Parser)]
#[command(name = "repo-miner")]
#[command(about = "Fetch GitHub commits/issues and summarize them")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch commits and save them to CSV
    FetchCommits {
        #[arg(long, help = "Repository in owner/repo format")]
        repo: RepoName,

        #[arg(
            long = "max",
            help = "Max number of commits to fetch",
            value_parser = clap::value_parser!(u64).range(1..)
        )]
        max_commits: Option<u64>,

        #[arg(long, help = "Path to output commits CSV")]
        out: PathBuf,
    },
    /// Fetch issues (pull requests excluded) and save them to CSV
    FetchIssues {
        #[arg(long, help = "Repository in owner/repo format")]
        repo: RepoName,

        #[arg(long, value_enum, default_value_t = IssueState::All, help = "Issue state filter")]
        state: IssueState,

        #[arg(
            long = "max",
            help = "Max number of issues to fetch",
            value_parser = clap::value_parser!(u64).range(1..)
        )]
        max_issues: Option<u64>,

        #[arg(long, help = "Path to output issues CSV")]
        out: PathBuf,
    },
    /// Print summary statistics from saved commits and issues
    Summarize {
        #[arg(long, help = "Path to commits CSV")]
        commits: PathBuf,

        #[arg(long, help = "Path to issues CSV")]
        issues: PathBuf,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    logging::init_logging("info");
    let cli = Cli::parse();

    match cli.command {
        Commands::FetchCommits {
            repo,
            max_commits,
            out,
        } => {
            let fetcher = build_fetcher()?;
            let commits = fetcher
                .fetch_commits(&repo, max_commits.map(|max| max as usize))
                .await?;
            dataset::write_commits(&out, &commits)?;
            println!("Saved {} commits to {}", commits.len(), out.display());
        }
        Commands::FetchIssues {
            repo,
            state,
            max_issues,
            out,
        } => {
            let fetcher = build_fetcher()?;
            let issues = fetcher
                .fetch_issues(&repo, state, max_issues.map(|max| max as usize))
                .await?;
            dataset::write_issues(&out, &issues)?;
            println!("Saved {} issues to {}", issues.len(), out.display());
        }
        Commands::Summarize { commits, issues } => {
            let commit_rows = dataset::read_commits(&commits)?;
            let issue_rows = dataset::read_issues(&issues)?;
            let report = SummaryReporter::default()
                .summarize(&commit_rows, &issue_rows)
                .context("summarizing datasets")?;
            info!(merged_rows = report.merged.len(), "merged commits and issues by day");
            println!("{}", report.summary);
        }
    }
    Ok(())
}

/// The credential check happens here, before any request is sent.
fn build_fetcher() -> Result<RepoFetcher> {
    let config = AppConfig::load()?;
    let per_page = config.github.per_page;
    let client = RestGithubClient::from_config(&config)?;
    Ok(RepoFetcher::new(Arc::new(client), per_page))
}
