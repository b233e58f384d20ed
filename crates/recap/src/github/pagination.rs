//! Cursor-based pagination over the GitHub REST API.
//!
//! GitHub paginates list endpoints through the `Link` response header. This
//! module follows `rel="next"` cursors until exhaustion and concatenates the
//! pages into one ordered sequence.

use serde_json::Value;

use super::client::GitHubClient;
use super::error::Result;
use super::types::DEFAULT_PAGE_SIZE;

/// Extract the `rel="next"` URL from a `Link` header.
///
/// Headers look like:
///
/// ```text
/// <https://api.github.com/user/repos?per_page=100&page=2>; rel="next",
/// <https://api.github.com/user/repos?per_page=100&page=4>; rel="last"
/// ```
///
/// The returned URL is opaque: callers pass it back verbatim as the next
/// request target. A missing or garbled header means no next page, never an
/// error.
#[must_use]
pub fn next_page_url(link_header: &str) -> Option<String> {
    for segment in link_header.split(',') {
        let mut url = None;
        let mut is_next = false;

        for part in segment.split(';') {
            let part = part.trim();
            if part.starts_with('<') && part.ends_with('>') {
                url = Some(&part[1..part.len() - 1]);
            } else if let Some(rel) = part.strip_prefix("rel=") {
                if rel.trim_matches('"') == "next" {
                    is_next = true;
                }
            }
        }

        if is_next {
            return url.map(str::to_string);
        }
    }

    None
}

/// Inject the default page size unless the path already specifies one.
fn with_default_page_size(path: &str) -> String {
    if path.contains("per_page=") {
        path.to_string()
    } else if path.contains('?') {
        format!("{path}&per_page={DEFAULT_PAGE_SIZE}")
    } else {
        format!("{path}?per_page={DEFAULT_PAGE_SIZE}")
    }
}

impl GitHubClient {
    /// Fetch every page of a paginated endpoint.
    ///
    /// Pages are requested strictly sequentially (the follow-up request is
    /// only issued once the previous response has been observed) and the
    /// extra headers are reused on every follow-up. Any page failing aborts
    /// the whole fetch with that error; already-accumulated pages are
    /// discarded.
    pub async fn get_paginated(
        &self,
        path: &str,
        extra_headers: &[(String, String)],
    ) -> Result<Vec<Value>> {
        let mut records = Vec::new();
        let mut target = Some(with_default_page_size(path));
        let mut page = 1u32;

        while let Some(url) = target {
            let response = self.get_json(&url, extra_headers).await?;

            match response.body {
                Value::Array(items) => records.extend(items),
                // Non-list payloads are appended whole.
                other => records.push(other),
            }
            tracing::debug!(page, total = records.len(), "fetched page");

            target = response.link.as_deref().and_then(next_page_url);
            page += 1;
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::http::MockTransport;
    use serde_json::json;
    use std::sync::Arc;

    fn client(transport: &MockTransport) -> GitHubClient {
        GitHubClient::new(
            Arc::new(transport.clone()),
            Arc::new(MemoryCache::new()),
            "secret-token",
        )
    }

    #[test]
    fn next_page_url_extracts_the_next_relation() {
        let header = r#"<https://api.github.com/user/repos?per_page=100&page=2>; rel="next", <https://api.github.com/user/repos?per_page=100&page=4>; rel="last""#;
        assert_eq!(
            next_page_url(header).as_deref(),
            Some("https://api.github.com/user/repos?per_page=100&page=2")
        );
    }

    #[test]
    fn next_page_url_returns_none_without_a_next_relation() {
        let header = r#"<https://api.github.com/user/repos?per_page=100&page=4>; rel="last""#;
        assert_eq!(next_page_url(header), None);
    }

    #[test]
    fn next_page_url_tolerates_garbled_headers() {
        assert_eq!(next_page_url(""), None);
        assert_eq!(next_page_url("garbage"), None);
        assert_eq!(next_page_url(r#"no-brackets; rel="next""#), None);
    }

    #[test]
    fn next_page_url_keeps_cursor_urls_opaque() {
        // The cursor's internal structure is irrelevant; whatever sits
        // between the brackets comes back verbatim.
        let header = r#"<https://example.com/opaque?cursor=abc%3D%3D&x=1>; rel="next""#;
        assert_eq!(
            next_page_url(header).as_deref(),
            Some("https://example.com/opaque?cursor=abc%3D%3D&x=1")
        );
    }

    #[test]
    fn with_default_page_size_injects_only_when_absent() {
        assert_eq!(with_default_page_size("/user/orgs"), "/user/orgs?per_page=100");
        assert_eq!(
            with_default_page_size("/user/repos?sort=pushed"),
            "/user/repos?sort=pushed&per_page=100"
        );
        assert_eq!(
            with_default_page_size("/user/repos?per_page=50"),
            "/user/repos?per_page=50"
        );
    }

    #[tokio::test]
    async fn follows_next_cursors_and_concatenates_pages_in_request_order() {
        let transport = MockTransport::new();
        let page2 = "https://api.github.com/user/orgs?per_page=100&page=2";
        transport.push_json(
            "https://api.github.com/user/orgs?per_page=100",
            &json!([{"id": 1}, {"id": 2}]),
            Some(&format!(r#"<{page2}>; rel="next""#)),
        );
        transport.push_json(page2, &json!([{"id": 3}]), None);

        let records = client(&transport).get_paginated("/user/orgs", &[]).await.unwrap();
        assert_eq!(records, vec![json!({"id": 1}), json!({"id": 2}), json!({"id": 3})]);
        assert_eq!(transport.request_urls().len(), 2);
    }

    #[tokio::test]
    async fn no_link_header_terminates_after_one_request() {
        let transport = MockTransport::new();
        transport.push_json(
            "https://api.github.com/user/orgs?per_page=100",
            &json!([{"login": "acme"}]),
            None,
        );

        let records = client(&transport).get_paginated("/user/orgs", &[]).await.unwrap();
        assert_eq!(records, vec![json!({"login": "acme"})]);
        assert_eq!(transport.request_urls().len(), 1);
    }

    #[tokio::test]
    async fn link_header_without_next_terminates_after_one_request() {
        let transport = MockTransport::new();
        transport.push_json(
            "https://api.github.com/user/orgs?per_page=100",
            &json!([{"login": "acme"}]),
            Some(r#"<https://api.github.com/user/orgs?per_page=100&page=1>; rel="last""#),
        );

        let records = client(&transport).get_paginated("/user/orgs", &[]).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(transport.request_urls().len(), 1);
    }

    #[tokio::test]
    async fn a_failing_page_aborts_the_whole_fetch() {
        let transport = MockTransport::new();
        let page2 = "https://api.github.com/user/orgs?per_page=100&page=2";
        transport.push_json(
            "https://api.github.com/user/orgs?per_page=100",
            &json!([{"id": 1}]),
            Some(&format!(r#"<{page2}>; rel="next""#)),
        );
        transport.push_status(page2, 500);

        let result = client(&transport).get_paginated("/user/orgs", &[]).await;
        assert!(result.is_err());
        // Page 2 was requested, so the failure was observed, not predicted.
        assert_eq!(transport.request_urls().len(), 2);
    }

    #[tokio::test]
    async fn extra_headers_are_reused_on_follow_up_requests() {
        let transport = MockTransport::new();
        let page2 = "https://api.github.com/user/repos?per_page=100&page=2";
        transport.push_json(
            "https://api.github.com/user/repos?sort=pushed&per_page=100",
            &json!([]),
            Some(&format!(r#"<{page2}>; rel="next""#)),
        );
        transport.push_json(page2, &json!([]), None);

        let extra = vec![("Accept".to_string(), "application/vnd.custom+json".to_string())];
        client(&transport)
            .get_paginated("/user/repos?sort=pushed", &extra)
            .await
            .unwrap();

        for (_, headers) in transport.requests() {
            assert_eq!(
                crate::http::header_get(&headers, "accept"),
                Some("application/vnd.custom+json")
            );
        }
    }

    #[tokio::test]
    async fn existing_page_size_parameter_is_left_alone() {
        let transport = MockTransport::new();
        transport.push_json("https://api.github.com/user/orgs?per_page=5", &json!([]), None);

        client(&transport)
            .get_paginated("/user/orgs?per_page=5", &[])
            .await
            .unwrap();

        assert_eq!(
            transport.request_urls(),
            vec!["https://api.github.com/user/orgs?per_page=5".to_string()]
        );
    }
}
