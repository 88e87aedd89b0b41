//! # Configuration Types
//!
//! Configuration structures for every repo-scout component.
//!
//! Each section can be omitted from the configuration file, in which case
//! its defaults apply. Loading, environment substitution and validation
//! live in the `scout-config` crate.

use serde::{Deserialize, Serialize};

/// Root configuration object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoutConfig {
	/// HTTP service and logging settings
	#[serde(default)]
	pub service: ServiceSettings,
	/// Upstream GitHub API settings
	#[serde(default)]
	pub github: GitHubConfig,
	/// Discovery engine settings
	#[serde(default)]
	pub discovery: DiscoveryConfig,
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	#[default]
	Pretty,
	Json,
}

/// HTTP service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSettings {
	/// Name of this service instance
	#[serde(default = "default_service_name")]
	pub name: String,
	/// Address the HTTP server binds to
	#[serde(default = "default_http_address")]
	pub http_address: String,
	/// Port the HTTP server binds to
	#[serde(default = "default_http_port")]
	pub http_port: u16,
	/// Logging level for the service
	#[serde(default = "default_log_level")]
	pub log_level: String,
	#[serde(default)]
	pub log_format: LogFormat,
	/// Deadline for a single discovery request
	#[serde(default = "default_request_timeout_secs")]
	pub request_timeout_secs: u64,
}

impl ServiceSettings {
	pub fn server_address(&self) -> String {
		format!("{}:{}", self.http_address, self.http_port)
	}
}

impl Default for ServiceSettings {
	fn default() -> Self {
		Self {
			name: default_service_name(),
			http_address: default_http_address(),
			http_port: default_http_port(),
			log_level: default_log_level(),
			log_format: LogFormat::default(),
			request_timeout_secs: default_request_timeout_secs(),
		}
	}
}

/// GitHub REST API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
	/// Base URL of the API, with a trailing slash
	#[serde(default = "default_github_url")]
	pub api_url: String,
	/// Bearer token sent when `use_credentials` is set
	#[serde(default)]
	pub token: String,
	#[serde(default)]
	pub use_credentials: bool,
	/// Value of the `X-GitHub-Api-Version` header, omitted when empty
	#[serde(default = "default_github_version")]
	pub api_version: String,
	#[serde(default = "default_user_agent")]
	pub user_agent: String,
	/// Attempts at finding the latest repository creation event
	#[serde(default = "default_latest_id_retries")]
	pub latest_id_retries: u32,
	/// Initial delay between latest-id attempts in milliseconds
	#[serde(default = "default_retry_interval_ms")]
	pub retry_interval_ms: u64,
	/// HTTP timeout in milliseconds
	#[serde(default = "default_timeout_ms")]
	pub timeout_ms: u64,
}

impl Default for GitHubConfig {
	fn default() -> Self {
		Self {
			api_url: default_github_url(),
			token: String::new(),
			use_credentials: false,
			api_version: default_github_version(),
			user_agent: default_user_agent(),
			latest_id_retries: default_latest_id_retries(),
			retry_interval_ms: default_retry_interval_ms(),
			timeout_ms: default_timeout_ms(),
		}
	}
}

/// Discovery engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
	/// Number of repositories returned per request
	#[serde(default = "default_output_size")]
	pub output_size: usize,
	/// Maximum candidates enriched from a single upstream page
	#[serde(default = "default_batch_size")]
	pub batch_size: usize,
	/// Maximum enrichment tasks in flight at once
	#[serde(default = "default_max_concurrent_enrichments")]
	pub max_concurrent_enrichments: usize,
	/// Maximum upstream pages per request, 0 for no limit
	#[serde(default)]
	pub max_batches: usize,
}

impl Default for DiscoveryConfig {
	fn default() -> Self {
		Self {
			output_size: default_output_size(),
			batch_size: default_batch_size(),
			max_concurrent_enrichments: default_max_concurrent_enrichments(),
			max_batches: 0,
		}
	}
}

fn default_service_name() -> String {
	"repo-scout".to_string()
}

fn default_http_address() -> String {
	"0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
	5000
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_request_timeout_secs() -> u64 {
	60
}

fn default_github_url() -> String {
	"https://api.github.com/".to_string()
}

fn default_github_version() -> String {
	"2022-11-28".to_string()
}

fn default_user_agent() -> String {
	concat!("repo-scout/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_latest_id_retries() -> u32 {
	3
}

fn default_retry_interval_ms() -> u64 {
	500
}

fn default_timeout_ms() -> u64 {
	10_000
}

fn default_output_size() -> usize {
	10
}

fn default_batch_size() -> usize {
	100
}

fn default_max_concurrent_enrichments() -> usize {
	16
}
