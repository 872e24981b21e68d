//! Catalog API client
//!
//! Thin HTTP wrapper over the external dataset catalog: listing, per-dataset
//! detail, and per-dataset commit history. Each operation is a single
//! request; there is no retry, caching, or pagination state. Failures carry
//! the raw response body so handlers can surface it.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Network(String),

    #[error("catalog returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to parse catalog response: {0}")]
    Parse(String),
}

/// Dataset record as served by the catalog listing and detail endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogDataset {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "lastModified")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(default)]
    pub size_bytes: Option<i64>,
}

impl CatalogDataset {
    /// Display name, falling back to the catalog id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// One commit from the catalog's history endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogCommit {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub date: DateTime<Utc>,
}

/// Client for the external dataset catalog
#[derive(Clone)]
pub struct CatalogClient {
    base_url: String,
    api_token: Option<String>,
    http_client: reqwest::Client,
}

impl CatalogClient {
    /// Create a new catalog client
    pub fn new(base_url: &str, api_token: Option<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
            http_client,
        }
    }

    /// Fetch one page of public datasets
    pub async fn list_datasets(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<CatalogDataset>, CatalogError> {
        let url = format!(
            "{}/datasets?limit={}&offset={}",
            self.base_url, limit, offset
        );
        self.get_json(&url).await
    }

    /// Fetch detailed metadata for one dataset
    pub async fn get_dataset(&self, catalog_id: &str) -> Result<CatalogDataset, CatalogError> {
        let url = format!("{}/datasets/{}", self.base_url, catalog_id);
        self.get_json(&url).await
    }

    /// Fetch the commit history for one dataset
    pub async fn get_history(&self, catalog_id: &str) -> Result<Vec<CatalogCommit>, CatalogError> {
        let url = format!("{}/datasets/{}/commits", self.base_url, catalog_id);
        self.get_json(&url).await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, CatalogError> {
        let mut request = self.http_client.get(url);
        if let Some(token) = &self.api_token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_listing_records() {
        let body = r#"[
            {"id": "squad", "description": "Reading comprehension QA pairs", "lastModified": "2024-05-01T12:00:00.000Z"},
            {"id": "glue/mrpc", "name": "MRPC", "size_bytes": 1048576}
        ]"#;
        let records: Vec<CatalogDataset> = serde_json::from_str(body).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].display_name(), "squad");
        assert!(records[0].last_modified.is_some());
        assert_eq!(records[1].display_name(), "MRPC");
        assert_eq!(records[1].size_bytes, Some(1048576));
        assert!(records[1].description.is_none());
    }

    #[test]
    fn parses_commit_records() {
        let body = r#"[{"id": "abc123", "title": "Update README", "date": "2024-03-02T08:30:00Z"}]"#;
        let commits: Vec<CatalogCommit> = serde_json::from_str(body).unwrap();

        assert_eq!(commits[0].id, "abc123");
        assert_eq!(commits[0].title.as_deref(), Some("Update README"));
    }

    #[test]
    fn trims_trailing_slash_from_base_url() {
        let client = CatalogClient::new("https://catalog.test/api/", None);
        assert_eq!(client.base_url, "https://catalog.test/api");
    }

    #[test]
    fn api_error_carries_response_body() {
        let err = CatalogError::Api {
            status: 404,
            body: "dataset does not exist".to_string(),
        };
        assert!(err.to_string().contains("404"));
        assert!(err.to_string().contains("dataset does not exist"));
    }
}
