//! Configuration settings structures

use intel_types::constants::limits::{DEFAULT_PAGE_SIZE, MAX_IN_QUERY_VALUES, MAX_PAGE_SIZE};
use intel_types::ResolutionStrategy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
	#[error("engine.default_page_size must be at least 1")]
	ZeroDefaultPageSize,
	#[error("engine.default_page_size ({default}) exceeds engine.max_page_size ({max})")]
	DefaultPageSizeTooLarge { default: usize, max: usize },
	#[error("engine.in_query_limit must be between 1 and {max}, got {value}")]
	InQueryLimitOutOfRange { value: usize, max: usize },
	#[error("engine.max_staleness_secs must be positive")]
	ZeroStaleness,
	#[error("logging.level must not be empty")]
	EmptyLogLevel,
}

/// Main application settings
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Settings {
	pub engine: EngineSettings,
	pub scoring: ScoringSettings,
	pub environment: EnvironmentSettings,
	pub logging: LoggingSettings,
}

/// Fetch and resolution settings
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct EngineSettings {
	pub default_page_size: usize,
	pub max_page_size: usize,
	/// Values allowed in one "in" / "array-contains-any" store predicate
	pub in_query_limit: usize,
	pub intelligence_strategy: ResolutionStrategy,
	/// Precomputed records older than this are recomputed; unset keeps them forever
	pub max_staleness_secs: Option<u64>,
}

impl Default for EngineSettings {
	fn default() -> Self {
		Self {
			default_page_size: DEFAULT_PAGE_SIZE,
			max_page_size: MAX_PAGE_SIZE,
			in_query_limit: MAX_IN_QUERY_VALUES,
			intelligence_strategy: ResolutionStrategy::default(),
			max_staleness_secs: None,
		}
	}
}

/// Scoring settings
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ScoringSettings {
	/// Seed for the market signal; unset seeds from the operating system
	pub seed: Option<u64>,
}

/// Environment-specific settings
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct EnvironmentSettings {
	pub profile: EnvironmentProfile,
	/// JSON snapshot loaded into the in-memory store at startup
	pub seed_path: Option<PathBuf>,
}

impl Default for EnvironmentSettings {
	fn default() -> Self {
		Self {
			profile: EnvironmentProfile::Development,
			seed_path: None,
		}
	}
}

/// Environment profiles
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentProfile {
	Development,
	Staging,
	Production,
}

/// Logging configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingSettings {
	pub level: String,
	pub format: LogFormat,
	pub structured: bool,
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			format: LogFormat::Pretty,
			structured: false,
		}
	}
}

/// Log format options
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	Json,
	Pretty,
	Compact,
}

impl Settings {
	/// Check if running in production
	pub fn is_production(&self) -> bool {
		self.environment.profile == EnvironmentProfile::Production
	}

	/// Staleness bound as a duration, if configured
	pub fn max_staleness(&self) -> Option<chrono::Duration> {
		self.engine
			.max_staleness_secs
			.and_then(|secs| i64::try_from(secs).ok())
			.map(chrono::Duration::seconds)
	}

	pub fn validate(&self) -> Result<(), ConfigValidationError> {
		let engine = &self.engine;

		if engine.default_page_size == 0 {
			return Err(ConfigValidationError::ZeroDefaultPageSize);
		}
		if engine.default_page_size > engine.max_page_size {
			return Err(ConfigValidationError::DefaultPageSizeTooLarge {
				default: engine.default_page_size,
				max: engine.max_page_size,
			});
		}
		if engine.in_query_limit == 0 || engine.in_query_limit > MAX_IN_QUERY_VALUES {
			return Err(ConfigValidationError::InQueryLimitOutOfRange {
				value: engine.in_query_limit,
				max: MAX_IN_QUERY_VALUES,
			});
		}
		if engine.max_staleness_secs == Some(0) {
			return Err(ConfigValidationError::ZeroStaleness);
		}
		if self.logging.level.trim().is_empty() {
			return Err(ConfigValidationError::EmptyLogLevel);
		}

		Ok(())
	}
}
