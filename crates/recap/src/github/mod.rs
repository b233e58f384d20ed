//! GitHub activity aggregation engine.
//!
//! This module drives the GitHub REST API to aggregate a user's activity:
//! organizations, repositories, closed issues, and commits.
//!
//! # Module Structure
//!
//! - `error` - Error types for GitHub API operations
//! - `types` - Projected data types and shared constants
//! - `client` - Request construction, authorization, JSON fetching
//! - `pagination` - `Link`-header cursor following
//! - `aggregate` - Fan-out/join over independent keys
//! - `repo` - Cache-fronted organization and repository fetchers
//! - `activity` - Issue and commit aggregation over a time window
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use recap::cache::MemoryCache;
//! use recap::github::GitHubClient;
//! use recap::http::reqwest_transport::ReqwestTransport;
//!
//! let transport = Arc::new(ReqwestTransport::new(reqwest::Client::new()));
//! let client = GitHubClient::new(transport, Arc::new(MemoryCache::new()), &token);
//! let repos = client.get_repos().await?;
//! ```

mod activity;
mod aggregate;
mod client;
mod error;
mod pagination;
mod repo;
mod types;

pub use aggregate::fan_out_join;
pub use client::{GitHubClient, JsonResponse};
pub use error::{GitHubError, Result};
pub use pagination::next_page_url;
pub use types::{API_URL, DEFAULT_PAGE_SIZE, RepoSummary, User, cache_keys};
