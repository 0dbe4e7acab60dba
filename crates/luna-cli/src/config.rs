use luna_agent::ModelConfig;
use luna_core::Credential;
use luna_orchestrator::OrchestratorConfig;
use luna_safety::{HelplineQuery, DEFAULT_MAX_MESSAGE_LENGTH};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct LunaConfig {
    pub model: ModelConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub conversation: ConversationConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Empty allows any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    File,
    Memory,
}

#[derive(Debug, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_backend")]
    pub backend: StoreBackend,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            data_dir: default_data_dir(),
        }
    }
}

/// Helpline search. Without an `api_key` the static helpline list is always used.
#[derive(Debug, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub api_key: Option<Credential>,
    #[serde(default = "default_query")]
    pub query: String,
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            query: default_query(),
            location: default_location(),
            base_url: None,
            max_results: default_max_results(),
        }
    }
}

/// Safety replies never list more helplines than this.
const MAX_HELPLINE_RESULTS: usize = 3;

impl SearchConfig {
    /// `max_results` is clamped to at most three listings.
    pub fn helpline_query(&self) -> HelplineQuery {
        HelplineQuery {
            query: self.query.clone(),
            location: self.location.clone(),
            max_results: self.max_results.min(MAX_HELPLINE_RESULTS),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ConversationConfig {
    #[serde(default = "default_summary_threshold")]
    pub summary_threshold: u32,
    #[serde(default = "default_max_message_length")]
    pub max_message_length: usize,
    #[serde(default = "default_llm_timeout")]
    pub llm_timeout_secs: u64,
    #[serde(default = "default_search_timeout")]
    pub search_timeout_secs: u64,
    #[serde(default = "default_store_timeout")]
    pub store_timeout_secs: u64,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            summary_threshold: default_summary_threshold(),
            max_message_length: default_max_message_length(),
            llm_timeout_secs: default_llm_timeout(),
            search_timeout_secs: default_search_timeout(),
            store_timeout_secs: default_store_timeout(),
        }
    }
}

impl ConversationConfig {
    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            summary_threshold: self.summary_threshold,
            llm_timeout: Duration::from_secs(self.llm_timeout_secs),
            store_timeout: Duration::from_secs(self.store_timeout_secs),
        }
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8000
}
fn default_backend() -> StoreBackend {
    StoreBackend::File
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}
fn default_query() -> String {
    HelplineQuery::default().query
}
fn default_location() -> String {
    HelplineQuery::default().location
}
fn default_max_results() -> usize {
    HelplineQuery::default().max_results
}
fn default_summary_threshold() -> u32 {
    luna_orchestrator::compactor::DEFAULT_SUMMARY_THRESHOLD
}
fn default_max_message_length() -> usize {
    DEFAULT_MAX_MESSAGE_LENGTH
}
fn default_llm_timeout() -> u64 {
    30
}
fn default_search_timeout() -> u64 {
    5
}
fn default_store_timeout() -> u64 {
    10
}
