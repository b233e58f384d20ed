//! Subcommand handlers: build the client, run an aggregation, render it.

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use clap::ValueEnum;
use recap::cache::{Cache, FileCache, MemoryCache};
use recap::github::GitHubClient;
use recap::http::reqwest_transport::ReqwestTransport;
use serde_json::Value;

use crate::config::Config;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable lines
    Table,
    /// Pretty-printed JSON
    Json,
}

pub(crate) fn build_client(
    config: &Config,
    no_cache: bool,
) -> Result<GitHubClient, Box<dyn Error>> {
    let token = config.github_token().ok_or(
        "no GitHub token configured; set RECAP_GITHUB_TOKEN or [github] token in config.toml",
    )?;

    let transport = Arc::new(ReqwestTransport::with_timeout(HTTP_TIMEOUT)?);
    let cache: Arc<dyn Cache> = if no_cache {
        Arc::new(MemoryCache::new())
    } else {
        Arc::new(FileCache::open(config.cache_path()))
    };

    let mut client = GitHubClient::new(transport, cache, &token);
    if let Some(api_url) = config.api_url() {
        client = client.with_api_url(api_url);
    }
    Ok(client)
}

fn render_records(
    records: &[Value],
    output: OutputFormat,
    line: impl Fn(&Value) -> String,
) -> Result<(), Box<dyn Error>> {
    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(records)?),
        OutputFormat::Table => {
            for record in records {
                println!("{}", line(record));
            }
            println!("{} total", records.len());
        }
    }
    Ok(())
}

pub(crate) async fn handle_user(
    client: &GitHubClient,
    output: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    let user = client.get_user().await?;
    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&user)?),
        OutputFormat::Table => {
            println!("{} ({})", user.login, user.name.as_deref().unwrap_or("-"));
            println!("profile: {}", user.html_url);
            println!("avatar:  {}", user.avatar_url);
        }
    }
    Ok(())
}

pub(crate) async fn handle_orgs(
    client: &GitHubClient,
    output: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    let names = client.get_org_names().await?;
    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&names)?),
        OutputFormat::Table => {
            for name in &names {
                println!("{name}");
            }
            println!("{} total", names.len());
        }
    }
    Ok(())
}

pub(crate) async fn handle_repos(
    client: &GitHubClient,
    output: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    let repos = client.get_repos().await?;
    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&repos)?),
        OutputFormat::Table => {
            for repo in &repos {
                let marker = if repo.private { " (private)" } else { "" };
                println!("{}{marker}", repo.full_name);
            }
            println!("{} total", repos.len());
        }
    }
    Ok(())
}

pub(crate) async fn handle_issues(
    client: &GitHubClient,
    days: i64,
    repos: Vec<String>,
    output: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    let since = Utc::now() - chrono::Duration::days(days);

    // Without an explicit repository list, one user-wide query covers every
    // accessible repository; otherwise fan out per repository.
    let issues = if repos.is_empty() {
        client.get_user_issues(since).await?
    } else {
        client.get_all_repo_issues(&repos, since).await
    };

    render_records(&issues, output, |issue| {
        let full_name = issue.get("full_name").and_then(Value::as_str).unwrap_or("-");
        let number = issue.get("number").and_then(Value::as_u64).unwrap_or(0);
        let title = issue.get("title").and_then(Value::as_str).unwrap_or("");
        format!("{full_name}#{number}: {title}")
    })
}

pub(crate) async fn handle_commits(
    client: &GitHubClient,
    author: Option<String>,
    days: i64,
    output: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    let author = match author {
        Some(author) => author,
        None => client.get_user().await?.login,
    };

    let until = Utc::now();
    let since = until - chrono::Duration::days(days);

    let repos = client.get_repos().await?;
    let commits = client
        .get_commits_from_repos(&repos, &author, since, until)
        .await;

    render_records(&commits, output, |commit| {
        let full_name = commit.get("full_name").and_then(Value::as_str).unwrap_or("-");
        let sha: String = commit
            .get("sha")
            .and_then(Value::as_str)
            .unwrap_or("")
            .chars()
            .take(7)
            .collect();
        let message = commit
            .pointer("/commit/message")
            .and_then(Value::as_str)
            .and_then(|m| m.lines().next())
            .unwrap_or("");
        format!("{sha} {full_name}: {message}")
    })
}
