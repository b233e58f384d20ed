//! Recap CLI - render your recent GitHub activity from the terminal.

mod commands;
mod config;

use clap::{Parser, Subcommand};
use console::Term;
use tracing_subscriber::EnvFilter;

use crate::commands::OutputFormat;

#[derive(Parser)]
#[command(name = "recap")]
#[command(version)]
#[command(about = "Aggregate your recent GitHub activity")]
#[command(
    long_about = "Recap collects your GitHub activity - organizations, repositories, closed \
issues, and commits - by fanning out over the GitHub REST API and joining the \
results. Slow-changing values (profile, organization names, repositories) are \
cached in a local JSON file."
)]
#[command(after_long_help = r#"EXAMPLES
    Show your profile:
        $ recap user

    List every repository you own or can push to:
        $ recap repos

    Closed issues across two repositories in the last two weeks:
        $ recap issues --days 14 --repo acme/widgets --repo acme/gears

    Your commits from the last week, as JSON:
        $ recap commits --output json

CONFIGURATION
    Recap reads configuration from:
      1. ~/.config/recap/config.toml (or $XDG_CONFIG_HOME/recap/config.toml)
      2. ./recap.toml
      3. Environment variables (RECAP_* prefix)
      4. .env file in current directory

ENVIRONMENT VARIABLES
    RECAP_GITHUB_TOKEN    GitHub personal access token
    RECAP_CACHE_PATH      Path of the JSON cache file
"#)]
struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    output: OutputFormat,

    /// Skip the on-disk cache for this run
    #[arg(long, global = true)]
    no_cache: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the authenticated user's profile
    User,
    /// List your organization memberships
    Orgs,
    /// List every repository you own or can push to
    Repos,
    /// List recently closed issues
    Issues {
        /// Look back this many days
        #[arg(short, long, default_value_t = 7)]
        days: i64,

        /// Restrict to these repositories (owner/name); repeatable.
        /// Without this, one query covers every accessible repository.
        #[arg(short, long)]
        repo: Vec<String>,
    },
    /// List your commits across all repositories
    Commits {
        /// Commit author login (defaults to the authenticated user)
        #[arg(short, long)]
        author: Option<String>,

        /// Look back this many days
        #[arg(short, long, default_value_t = 7)]
        days: i64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing for non-TTY mode (structured logging)
    if !Term::stdout().is_term() {
        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::new("recap=info,recap_cli=info"),
        };

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }

    // Load configuration (config file -> env vars -> defaults)
    let config = config::Config::load();

    let cli = Cli::parse();

    let client = commands::build_client(&config, cli.no_cache)?;

    match cli.command {
        Commands::User => commands::handle_user(&client, cli.output).await?,
        Commands::Orgs => commands::handle_orgs(&client, cli.output).await?,
        Commands::Repos => commands::handle_repos(&client, cli.output).await?,
        Commands::Issues { days, repo } => {
            commands::handle_issues(&client, days, repo, cli.output).await?;
        }
        Commands::Commits { author, days } => {
            commands::handle_commits(&client, author, days, cli.output).await?;
        }
    }

    Ok(())
}
