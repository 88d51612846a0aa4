//! Market Intel Configuration
//!
//! Configuration management and startup utilities for the market intelligence engine.

pub mod loader;
pub mod settings;
pub mod startup_logger;

pub use loader::{load_config, load_config_from, ConfigLoadError, ENV_PREFIX};
pub use settings::{
	ConfigValidationError, EngineSettings, EnvironmentProfile, EnvironmentSettings, LogFormat,
	LoggingSettings, ScoringSettings, Settings,
};
pub use startup_logger::{log_service_info, log_service_shutdown, log_startup_complete};
