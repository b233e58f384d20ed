//! GitHub API client: authorization, request construction, JSON fetching.

use std::sync::Arc;

use serde_json::Value;

use crate::cache::Cache;
use crate::http::HttpTransport;

use super::error::{GitHubError, Result};
use super::types::API_URL;

/// One JSON response together with its pagination metadata.
#[derive(Debug, Clone)]
pub struct JsonResponse {
    /// Decoded response body.
    pub body: Value,
    /// Raw `Link` header, when the server sent one.
    pub link: Option<String>,
}

/// GitHub API client.
///
/// Cheap to clone; clones share the transport, the cache, and the token.
/// The client owns no retry, rate-limiting, or timeout behavior; those are
/// properties of the transport it is given.
#[derive(Clone)]
pub struct GitHubClient {
    transport: Arc<dyn HttpTransport>,
    cache: Arc<dyn Cache>,
    token: Arc<str>,
    api_url: String,
}

impl GitHubClient {
    pub fn new(transport: Arc<dyn HttpTransport>, cache: Arc<dyn Cache>, token: &str) -> Self {
        Self {
            transport,
            cache,
            token: Arc::from(token),
            api_url: API_URL.to_string(),
        }
    }

    /// Override the API base URL (GitHub Enterprise instances, test servers).
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub(crate) fn cache(&self) -> &dyn Cache {
        self.cache.as_ref()
    }

    /// Headers sent with every request, before per-call extras are merged in.
    fn auth_headers(&self) -> Vec<(String, String)> {
        vec![
            ("Authorization".to_string(), format!("token {}", self.token)),
            (
                "Accept".to_string(),
                "application/vnd.github+json".to_string(),
            ),
            ("User-Agent".to_string(), "recap".to_string()),
        ]
    }

    /// Merge per-call headers into the computed base headers.
    ///
    /// An extra header replaces a same-named base header, otherwise it is
    /// appended.
    fn merged_headers(&self, extra: &[(String, String)]) -> Vec<(String, String)> {
        let mut headers = self.auth_headers();
        for (name, value) in extra {
            match headers
                .iter_mut()
                .find(|(base, _)| base.eq_ignore_ascii_case(name))
            {
                Some(slot) => slot.1 = value.clone(),
                None => headers.push((name.clone(), value.clone())),
            }
        }
        headers
    }

    /// Resolve a request target: absolute URLs pass through verbatim,
    /// anything else is joined onto the API base URL.
    fn resolve_url(&self, path_or_url: &str) -> String {
        if path_or_url.starts_with("http") {
            path_or_url.to_string()
        } else {
            format!("{}{}", self.api_url, path_or_url)
        }
    }

    /// Fetch one JSON document.
    pub async fn get_json(
        &self,
        path_or_url: &str,
        extra_headers: &[(String, String)],
    ) -> Result<JsonResponse> {
        let url = self.resolve_url(path_or_url);
        let headers = self.merged_headers(extra_headers);

        let response = self.transport.get(&url, &headers).await?;

        match response.status {
            200 => {
                let link = response.header("link").map(str::to_string);
                let body: Value = serde_json::from_slice(&response.body)?;
                Ok(JsonResponse { body, link })
            }
            401 | 403 => Err(GitHubError::AuthRequired),
            404 => Err(GitHubError::NotFound(url)),
            status => Err(GitHubError::Status { status, url }),
        }
    }
}
