//! Issue and commit aggregation over a time window.
//!
//! Window bounds pass through verbatim as RFC 3339 strings; inclusivity at
//! each end is whatever the API defines for the parameter.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use super::aggregate::fan_out_join;
use super::client::GitHubClient;
use super::error::Result;
use super::types::RepoSummary;

/// Render a window bound the way the API expects it.
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Tag each record with the repository it came from.
fn tag_with_repo(mut records: Vec<Value>, full_name: &str) -> Vec<Value> {
    for record in &mut records {
        if let Value::Object(fields) = record {
            fields.insert(
                "full_name".to_string(),
                Value::String(full_name.to_string()),
            );
        }
    }
    records
}

impl GitHubClient {
    /// Closed issues across every repository the user has access to.
    pub async fn get_user_issues(&self, since: DateTime<Utc>) -> Result<Vec<Value>> {
        let path = format!(
            "/user/issues?filter=all&state=closed&since={}",
            timestamp(since)
        );
        self.get_paginated(&path, &[]).await
    }

    /// Closed issues of one repository, most recently updated first.
    pub async fn get_repo_issues(
        &self,
        full_name: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<Value>> {
        let path = format!(
            "/repos/{full_name}/issues?state=closed&since={}&sort=updated",
            timestamp(since)
        );
        self.get_paginated(&path, &[]).await
    }

    /// Fan out over repositories, collecting each one's closed issues.
    ///
    /// Every issue carries an injected `full_name` field identifying its
    /// source repository. A repository whose fetch fails contributes
    /// nothing.
    pub async fn get_all_repo_issues(
        &self,
        full_names: &[String],
        since: DateTime<Utc>,
    ) -> Vec<Value> {
        fan_out_join(full_names.to_vec(), |full_name| {
            let client = self.clone();
            async move {
                let issues = client.get_repo_issues(&full_name, since).await?;
                Ok::<_, super::error::GitHubError>(tag_with_repo(issues, &full_name))
            }
        })
        .await
    }

    /// Commits authored by `author` in one repository within the window.
    pub async fn get_commits(
        &self,
        full_name: &str,
        author: &str,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<Value>> {
        let path = format!(
            "/repos/{full_name}/commits?author={}&since={}&until={}",
            urlencoding::encode(author),
            timestamp(since),
            timestamp(until),
        );
        self.get_paginated(&path, &[]).await
    }

    /// Fan out over repositories, collecting the window's commits from each.
    ///
    /// Every commit carries an injected `full_name` field identifying its
    /// source repository. A repository whose fetch fails contributes
    /// nothing.
    pub async fn get_commits_from_repos(
        &self,
        repos: &[RepoSummary],
        author: &str,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Vec<Value> {
        let full_names: Vec<String> = repos.iter().map(|r| r.full_name.clone()).collect();
        let author = author.to_string();

        fan_out_join(full_names, |full_name| {
            let client = self.clone();
            let author = author.clone();
            async move {
                let commits = client
                    .get_commits(&full_name, &author, since, until)
                    .await?;
                Ok::<_, super::error::GitHubError>(tag_with_repo(commits, &full_name))
            }
        })
        .await
    }
}
