//! Cache-fronted organization and repository fetchers.
//!
//! Each fetcher consults the external cache by literal key name before
//! touching the network, and writes the projected result back on first
//! success. The check-then-fetch sequence is not atomic against concurrent
//! callers; a redundant fetch of an idempotent read is acceptable.

use serde_json::Value;

use super::aggregate::fan_out_join;
use super::client::GitHubClient;
use super::error::Result;
use super::types::{EXTENDED_REPOS_MEDIA_TYPE, RepoSummary, User, cache_keys};

/// Project raw repository records down to `{full_name, private}`.
fn project_repos(raw: Vec<Value>) -> Vec<RepoSummary> {
    raw.into_iter()
        .filter_map(|record| serde_json::from_value(record).ok())
        .collect()
}

impl GitHubClient {
    /// The authenticated user, projected down to the profile fields callers
    /// render. Only the projection is cached, never the raw payload.
    pub async fn get_user(&self) -> Result<User> {
        if let Some(cached) = self.cache().get(cache_keys::USER) {
            if let Ok(user) = serde_json::from_value::<User>(cached) {
                return Ok(user);
            }
        }

        let response = self.get_json("/user", &[]).await?;
        let user: User = serde_json::from_value(response.body)?;
        self.cache()
            .set(cache_keys::USER, serde_json::to_value(&user)?);
        Ok(user)
    }

    /// Raw organization membership records for the authenticated user.
    pub async fn get_orgs(&self) -> Result<Vec<Value>> {
        self.get_paginated("/user/orgs", &[]).await
    }

    /// Organization login names, cache-fronted under `orgNames`.
    pub async fn get_org_names(&self) -> Result<Vec<String>> {
        if let Some(cached) = self.cache().get(cache_keys::ORG_NAMES) {
            if let Ok(names) = serde_json::from_value::<Vec<String>>(cached) {
                return Ok(names);
            }
        }

        let orgs = self.get_orgs().await?;
        let names: Vec<String> = orgs
            .iter()
            .filter_map(|org| org.get("login").and_then(Value::as_str))
            .map(str::to_string)
            .collect();
        self.cache()
            .set(cache_keys::ORG_NAMES, serde_json::to_value(&names)?);
        Ok(names)
    }

    /// Repositories the user owns or can push to, cache-fronted under
    /// `repos`. Requests the extended listing media type so organization
    /// repositories with push access are included.
    pub async fn get_user_repos(&self) -> Result<Vec<RepoSummary>> {
        if let Some(cached) = self.cache().get(cache_keys::REPOS) {
            if let Ok(repos) = serde_json::from_value::<Vec<RepoSummary>>(cached) {
                return Ok(repos);
            }
        }

        let extra = vec![(
            "Accept".to_string(),
            EXTENDED_REPOS_MEDIA_TYPE.to_string(),
        )];
        let raw = self.get_paginated("/user/repos?sort=pushed", &extra).await?;
        let repos = project_repos(raw);
        self.cache()
            .set(cache_keys::REPOS, serde_json::to_value(&repos)?);
        Ok(repos)
    }

    /// All repositories of one organization.
    pub async fn get_org_repos(&self, org: &str) -> Result<Vec<RepoSummary>> {
        let raw = self.get_paginated(&format!("/orgs/{org}/repos"), &[]).await?;
        Ok(project_repos(raw))
    }

    /// Fan out over organizations, one branch per login.
    ///
    /// An organization whose fetch fails is dropped from the result.
    pub async fn get_all_org_repos(&self, org_names: &[String]) -> Vec<RepoSummary> {
        fan_out_join(org_names.to_vec(), |org| {
            let client = self.clone();
            async move { client.get_org_repos(&org).await }
        })
        .await
    }

    /// Every repository the user can see: their own repositories followed by
    /// each organization's. The combined listing is never itself cached.
    pub async fn get_repos(&self) -> Result<Vec<RepoSummary>> {
        let mut repos = self.get_user_repos().await?;
        let org_names = self.get_org_names().await?;
        let org_repos = self.get_all_org_repos(&org_names).await;
        repos.extend(org_repos);
        Ok(repos)
    }
}
