// scout-config/src/lib.rs

use regex::Regex;
use scout_types::ScoutConfig;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("File not found: {0}")]
	FileNotFound(String),

	#[error("Parse error: {0}")]
	ParseError(String),

	#[error("Validation error: {0}")]
	ValidationError(String),

	#[error("Environment variable not found: {0}")]
	EnvVarNotFound(String),

	#[error("IO error: {0}")]
	IoError(#[from] std::io::Error),
}

/// Configuration loader with environment variable substitution
pub struct ConfigLoader {
	file_path: Option<PathBuf>,
	env_prefix: String,
}

impl Default for ConfigLoader {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigLoader {
	pub fn new() -> Self {
		Self {
			file_path: None,
			env_prefix: "SCOUT_".to_string(),
		}
	}

	pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
		self.file_path = Some(path.as_ref().to_path_buf());
		self
	}

	pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.env_prefix = prefix.into();
		self
	}

	pub async fn load(&self) -> Result<ScoutConfig, ConfigError> {
		let mut config = match &self.file_path {
			Some(file_path) => self.load_from_file(file_path).await?,
			None => {
				return Err(ConfigError::FileNotFound(
					"No configuration file specified".to_string(),
				))
			}
		};

		self.apply_env_overrides(&mut config)?;
		Self::validate_config(&config)?;

		Ok(config)
	}

	async fn load_from_file(&self, file_path: &Path) -> Result<ScoutConfig, ConfigError> {
		info!("Loading configuration from {:?}", file_path);

		let content = match tokio::fs::read_to_string(file_path).await {
			Ok(content) => content,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
				return Err(ConfigError::FileNotFound(file_path.display().to_string()))
			}
			Err(e) => return Err(e.into()),
		};

		let substituted = self.substitute_env_vars(&content)?;

		match file_path.extension().and_then(|s| s.to_str()) {
			Some("toml") => toml::from_str(&substituted)
				.map_err(|e| ConfigError::ParseError(format!("Failed to parse TOML: {}", e))),
			Some("json") => serde_json::from_str(&substituted)
				.map_err(|e| ConfigError::ParseError(format!("Failed to parse JSON: {}", e))),
			Some("yaml") | Some("yml") => serde_yaml::from_str(&substituted)
				.map_err(|e| ConfigError::ParseError(format!("Failed to parse YAML: {}", e))),
			_ => Err(ConfigError::ParseError(format!(
				"Unsupported config format: {:?}",
				file_path
			))),
		}
	}

	fn substitute_env_vars(&self, content: &str) -> Result<String, ConfigError> {
		let mut result = content.to_string();

		// ${VAR_NAME}
		let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ConfigError::ParseError(e.to_string()))?;

		for cap in re.captures_iter(content) {
			let full_match = &cap[0];
			let var_name = &cap[1];

			let env_value = env::var(var_name)
				.map_err(|_| ConfigError::EnvVarNotFound(var_name.to_string()))?;

			result = result.replace(full_match, &env_value);
		}

		Ok(result)
	}

	fn env(&self, name: &str) -> Option<String> {
		env::var(format!("{}{}", self.env_prefix, name)).ok()
	}

	fn apply_env_overrides(&self, config: &mut ScoutConfig) -> Result<(), ConfigError> {
		if let Some(log_level) = self.env("LOG_LEVEL") {
			config.service.log_level = log_level;
		}

		if let Some(http_port) = self.env("HTTP_PORT") {
			config.service.http_port = http_port
				.parse()
				.map_err(|e| ConfigError::ValidationError(format!("Invalid HTTP port: {}", e)))?;
		}

		if let Some(http_address) = self.env("HTTP_ADDRESS") {
			config.service.http_address = http_address;
		}

		if let Some(token) = self.env("GITHUB_TOKEN") {
			debug!("Overriding GitHub token from environment");
			config.github.token = token;
			config.github.use_credentials = true;
		}

		if let Some(output_size) = self.env("OUTPUT_SIZE") {
			config.discovery.output_size = output_size
				.parse()
				.map_err(|e| ConfigError::ValidationError(format!("Invalid output size: {}", e)))?;
		}

		if let Some(batch_size) = self.env("BATCH_SIZE") {
			config.discovery.batch_size = batch_size
				.parse()
				.map_err(|e| ConfigError::ValidationError(format!("Invalid batch size: {}", e)))?;
		}

		Ok(())
	}

	pub fn validate_config(config: &ScoutConfig) -> Result<(), ConfigError> {
		let discovery = &config.discovery;
		if discovery.output_size == 0 {
			return Err(ConfigError::ValidationError(
				"discovery.output_size must be at least 1".to_string(),
			));
		}
		if discovery.batch_size == 0 {
			return Err(ConfigError::ValidationError(
				"discovery.batch_size must be at least 1".to_string(),
			));
		}
		if discovery.max_concurrent_enrichments == 0 {
			return Err(ConfigError::ValidationError(
				"discovery.max_concurrent_enrichments must be at least 1".to_string(),
			));
		}

		let github = &config.github;
		if github.latest_id_retries == 0 {
			return Err(ConfigError::ValidationError(
				"github.latest_id_retries must be at least 1".to_string(),
			));
		}
		if github.api_url.is_empty() {
			return Err(ConfigError::ValidationError(
				"github.api_url must be set".to_string(),
			));
		}
		let http_url =
			Regex::new(r"^https?://[^\s/]+").map_err(|e| ConfigError::ParseError(e.to_string()))?;
		if !http_url.is_match(&github.api_url) {
			return Err(ConfigError::ValidationError(format!(
				"Invalid github.api_url '{}': expected an http(s) URL",
				github.api_url
			)));
		}
		if github.use_credentials && github.token.is_empty() {
			return Err(ConfigError::ValidationError(
				"github.token is required when use_credentials is enabled".to_string(),
			));
		}

		Ok(())
	}
}
