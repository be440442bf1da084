//! DuckDuckGo instant answers
//!
//! One GET per query. The answer resolves to a summary, a short list of
//! related links, or nothing.

use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "https://api.duckduckgo.com/";

/// Related links shown at most
pub const MAX_RELATED: usize = 5;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Please enter a search term")]
    EmptyQuery,

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Search service returned HTTP {0}")]
    Status(u16),

    #[error("Malformed search response: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedLink {
    pub text: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchOutcome {
    Summary { text: String },
    Related { links: Vec<RelatedLink> },
    NoResults,
}

pub struct SearchClient {
    endpoint: String,
    client: reqwest::Client,
}

impl SearchClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub async fn search(&self, query: &str) -> Result<SearchOutcome> {
        let query = validate_query(query)?;
        tracing::debug!(query, "searching");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_redirect", "1"),
                ("no_html", "1"),
            ])
            .send()
            .await
            .map_err(|e| SearchError::ConnectionFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SearchError::Status(response.status().as_u16()));
        }

        // DuckDuckGo answers with a javascript content type, so decode by hand
        let body = response
            .text()
            .await
            .map_err(|e| SearchError::ConnectionFailed(e.to_string()))?;
        let value: Value =
            serde_json::from_str(&body).map_err(|e| SearchError::Parse(e.to_string()))?;

        Ok(resolve(&value))
    }
}

/// Trimmed query, or `EmptyQuery` for blank input
pub fn validate_query(query: &str) -> Result<&str> {
    let query = query.trim();
    if query.is_empty() {
        return Err(SearchError::EmptyQuery);
    }
    Ok(query)
}

/// Resolve an instant-answer document into an outcome
pub fn resolve(body: &Value) -> SearchOutcome {
    let summary = body
        .get("Abstract")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default();
    if !summary.is_empty() {
        return SearchOutcome::Summary {
            text: summary.to_string(),
        };
    }

    let links: Vec<RelatedLink> = body
        .get("RelatedTopics")
        .and_then(Value::as_array)
        .map(|topics| {
            topics
                .iter()
                .filter_map(|topic| {
                    let text = topic.get("Text")?.as_str()?;
                    let url = topic.get("FirstURL")?.as_str()?;
                    Some(RelatedLink {
                        text: text.to_string(),
                        url: url.to_string(),
                    })
                })
                .take(MAX_RELATED)
                .collect()
        })
        .unwrap_or_default();

    if links.is_empty() {
        SearchOutcome::NoResults
    } else {
        SearchOutcome::Related { links }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_abstract_wins() {
        let body = json!({
            "Abstract": "  Composting is the decomposition of organic matter.  ",
            "RelatedTopics": [{ "Text": "Compost", "FirstURL": "https://duckduckgo.com/Compost" }]
        });
        assert_eq!(
            resolve(&body),
            SearchOutcome::Summary {
                text: "Composting is the decomposition of organic matter.".into()
            }
        );
    }

    #[test]
    fn test_related_links_filtered_and_capped() {
        let mut topics = vec![
            json!({ "Name": "Category", "Topics": [] }),
            json!({ "Text": "No url here" }),
        ];
        for i in 0..7 {
            topics.push(json!({
                "Text": format!("Topic {}", i),
                "FirstURL": format!("https://duckduckgo.com/t{}", i)
            }));
        }
        let body = json!({ "Abstract": "", "RelatedTopics": topics });

        match resolve(&body) {
            SearchOutcome::Related { links } => {
                assert_eq!(links.len(), MAX_RELATED);
                assert_eq!(links[0].text, "Topic 0");
                assert_eq!(links[4].url, "https://duckduckgo.com/t4");
            }
            other => panic!("expected related links, got {:?}", other),
        }
    }

    #[test]
    fn test_no_usable_entries() {
        let body = json!({
            "Abstract": "   ",
            "RelatedTopics": [{ "Name": "Only a category" }, "string entry"]
        });
        assert_eq!(resolve(&body), SearchOutcome::NoResults);
        assert_eq!(resolve(&json!({})), SearchOutcome::NoResults);
    }

    #[test]
    fn test_blank_query_rejected() {
        assert!(matches!(validate_query("   "), Err(SearchError::EmptyQuery)));
        assert_eq!(validate_query(" solar panels ").unwrap(), "solar panels");
    }

    #[test]
    fn test_outcome_json_shape() {
        let json = serde_json::to_value(SearchOutcome::NoResults).unwrap();
        assert_eq!(json, json!({ "kind": "no_results" }));
    }
}
