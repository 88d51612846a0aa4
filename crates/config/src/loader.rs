//! Configuration loading utilities

use crate::{ConfigValidationError, Settings};
use config::{Config, ConfigError, Environment, File};
use thiserror::Error;
use tracing::debug;

/// Prefix of environment overrides, e.g. `MARKET_INTEL__ENGINE__MAX_PAGE_SIZE=50`
pub const ENV_PREFIX: &str = "MARKET_INTEL";

const DEFAULT_CONFIG_PATH: &str = "config/config";

#[derive(Debug, Error)]
pub enum ConfigLoadError {
	#[error("failed to read configuration: {0}")]
	Source(#[from] ConfigError),
	#[error("invalid configuration: {0}")]
	Invalid(#[from] ConfigValidationError),
}

/// Load configuration from `config/config.*` (optional) and `MARKET_INTEL__*` variables
pub fn load_config() -> Result<Settings, ConfigLoadError> {
	load_config_from(DEFAULT_CONFIG_PATH)
}

/// Load configuration from the given file stem, overlaid with environment variables
pub fn load_config_from(path: &str) -> Result<Settings, ConfigLoadError> {
	let s = Config::builder()
		.add_source(File::with_name(path).required(false))
		.add_source(
			Environment::with_prefix(ENV_PREFIX)
				.prefix_separator("__")
				.separator("__")
				.try_parsing(true),
		)
		.build()?;

	let settings: Settings = s.try_deserialize()?;
	settings.validate()?;
	debug!("Loaded configuration from {}", path);
	Ok(settings)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::settings::LogFormat;
	use intel_types::ResolutionStrategy;
	use std::io::Write;

	fn write_config(contents: &str) -> (std::path::PathBuf, String) {
		let dir = std::env::temp_dir().join(format!("market-intel-config-{}", std::process::id()));
		std::fs::create_dir_all(&dir).unwrap();
		let file = dir.join(format!("config-{}.json", contents.len()));
		let mut handle = std::fs::File::create(&file).unwrap();
		handle.write_all(contents.as_bytes()).unwrap();
		let stem = file.with_extension("").to_string_lossy().into_owned();
		(file, stem)
	}

	#[test]
	fn test_missing_file_yields_defaults() {
		let settings = load_config_from("does/not/exist").unwrap();
		assert_eq!(settings.engine.default_page_size, 20);
	}

	#[test]
	fn test_file_values_are_applied() {
		let (file, stem) = write_config(
			r#"{
				"engine": { "default_page_size": 10, "intelligence_strategy": "precomputed_only" },
				"logging": { "level": "debug", "format": "compact" }
			}"#,
		);

		let settings = load_config_from(&stem).unwrap();
		assert_eq!(settings.engine.default_page_size, 10);
		assert_eq!(
			settings.engine.intelligence_strategy,
			ResolutionStrategy::PrecomputedOnly
		);
		assert_eq!(settings.logging.level, "debug");
		assert_eq!(settings.logging.format, LogFormat::Compact);

		std::fs::remove_file(file).unwrap();
	}

	#[test]
	fn test_invalid_file_is_rejected() {
		let (file, stem) = write_config(r#"{ "engine": { "default_page_size": 0 } }"#);
		let result = load_config_from(&stem);
		assert!(matches!(
			result,
			Err(ConfigLoadError::Invalid(ConfigValidationError::ZeroDefaultPageSize))
		));
		std::fs::remove_file(file).unwrap();
	}
}
