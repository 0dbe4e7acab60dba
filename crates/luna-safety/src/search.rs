use async_trait::async_trait;
use luna_core::{LunaError, LunaResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default SerpApi endpoint root.
pub const SERPAPI_BASE_URL: &str = "https://serpapi.com";

/// One organic web result. Either field may be absent upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganicResult {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
}

impl OrganicResult {
    pub fn new(title: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            snippet: Some(snippet.into()),
        }
    }
}

/// Web search used to enrich safety replies with helpline listings.
#[async_trait]
pub trait HelplineSearch: Send + Sync {
    async fn search(&self, query: &str, location: &str) -> LunaResult<Vec<OrganicResult>>;
}

/// SerpApi Google engine client.
pub struct SerpApiSearch {
    api_key: String,
    base_url: String,
    http: reqwest::Client,
}

#[derive(Deserialize)]
struct SerpApiResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
    #[serde(default)]
    error: Option<String>,
}

impl SerpApiSearch {
    pub fn new(api_key: String, base_url: Option<String>) -> Self {
        let base_url = base_url
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| SERPAPI_BASE_URL.to_string());
        Self {
            api_key,
            base_url,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl HelplineSearch for SerpApiSearch {
    async fn search(&self, query: &str, location: &str) -> LunaResult<Vec<OrganicResult>> {
        let url = format!("{}/search.json", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[
                ("engine", "google"),
                ("q", query),
                ("location", location),
                ("api_key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| LunaError::Search(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(LunaError::Search(format!("SerpApi returned {status}")));
        }

        let body: SerpApiResponse = resp
            .json()
            .await
            .map_err(|e| LunaError::Search(e.to_string()))?;
        if let Some(error) = body.error {
            return Err(LunaError::Search(error));
        }

        debug!(results = body.organic_results.len(), "helpline search complete");
        Ok(body.organic_results)
    }
}

/// Stand-in used when no search key is configured; every lookup fails so the
/// static helpline list is used.
pub struct UnconfiguredSearch;

#[async_trait]
impl HelplineSearch for UnconfiguredSearch {
    async fn search(&self, _query: &str, _location: &str) -> LunaResult<Vec<OrganicResult>> {
        Err(LunaError::Search("helpline search is not configured".into()))
    }
}
