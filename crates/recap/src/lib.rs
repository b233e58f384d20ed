//! Recap - aggregate a user's GitHub activity.
//!
//! This library drives the GitHub REST API to collect a user's
//! organizations, repositories, closed issues, and commits. The interesting
//! machinery is the aggregation engine: cursor-based pagination that follows
//! `Link` headers until exhaustion, and a fan-out/join aggregator that runs
//! one branch per organization or repository concurrently, isolating each
//! branch's failure from the combined result.
//!
//! Network I/O flows through the [`http::HttpTransport`] seam and simple
//! already-fetched values live behind the [`cache::Cache`] seam, so the
//! engine itself owns no sockets and no storage.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use recap::{GitHubClient, MemoryCache};
//! use recap::http::reqwest_transport::ReqwestTransport;
//!
//! let transport = Arc::new(ReqwestTransport::with_timeout(Duration::from_secs(30))?);
//! let client = GitHubClient::new(transport, Arc::new(MemoryCache::new()), &token);
//!
//! let user = client.get_user().await?;
//! let repos = client.get_repos().await?;
//! ```

pub mod cache;
pub mod github;
pub mod http;

pub use cache::{Cache, FileCache, MemoryCache};
pub use github::{GitHubClient, GitHubError, RepoSummary, User};
pub use http::{HttpError, HttpTransport};
