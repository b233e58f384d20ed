//! Data types produced by the aggregation engine.

use serde::{Deserialize, Serialize};

/// Base URL for the GitHub REST API.
pub const API_URL: &str = "https://api.github.com";

/// Page size injected when a paginated request does not specify one.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Media type requesting the extended repository listing for `/user/repos`:
/// includes organization repositories the user can push to.
pub(crate) const EXTENDED_REPOS_MEDIA_TYPE: &str = "application/vnd.github.moondragon+json";

/// Names under which the fetchers store results in the external cache.
pub mod cache_keys {
    pub const USER: &str = "user";
    pub const ORG_NAMES: &str = "orgNames";
    pub const REPOS: &str = "repos";
}

/// The authenticated user, projected down to the fields callers render.
///
/// Only this projection is ever cached, never the raw profile payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub html_url: String,
    pub avatar_url: String,
    pub login: String,
    pub name: Option<String>,
}

/// A repository, projected down to its identity and visibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSummary {
    pub full_name: String,
    pub private: bool,
}
