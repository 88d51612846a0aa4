//! Startup logging for the market intelligence engine

use crate::Settings;
use std::env;
use tracing::info;

/// Logs service and environment information at startup
pub fn log_service_info(settings: &Settings) {
	let service_name = "market-intel";
	let service_version = env!("CARGO_PKG_VERSION");

	info!("=== Market Intelligence Engine Starting ===");
	info!("🚀 Service: {} v{}", service_name, service_version);
	info!("🌍 Profile: {:?}", settings.environment.profile);

	info!("💻 Platform: {}", env::consts::OS);
	info!("🏗️ Architecture: {}", env::consts::ARCH);

	if let Ok(cwd) = env::current_dir() {
		info!("📁 Working Directory: {}", cwd.display());
	}

	if let Ok(rust_log) = env::var("RUST_LOG") {
		info!("🔧 Log Level: {}", rust_log);
	}

	info!(
		"📄 Page size: default {}, max {}",
		settings.engine.default_page_size, settings.engine.max_page_size
	);
	info!(
		"🧠 Intelligence strategy: {:?}",
		settings.engine.intelligence_strategy
	);
	if let Some(secs) = settings.engine.max_staleness_secs {
		info!("⏳ Precomputed records expire after {}s", secs);
	}
	match settings.scoring.seed {
		Some(seed) => info!("🎲 Market signal seed: {}", seed),
		None => info!("🎲 Market signal seeded from entropy"),
	}
	if let Some(path) = &settings.environment.seed_path {
		info!("📋 Seed snapshot: {}", path.display());
	}

	info!(
		"🕒 Started at: {}",
		chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
	);
}

/// Logs engine readiness with the loaded store size
pub fn log_startup_complete(requests: usize, quotes: usize, precomputed: usize) {
	info!("✅ Market Intelligence Engine ready");
	info!(
		"📦 Store: {} requests, {} quotes, {} precomputed records",
		requests, quotes, precomputed
	);
}

/// Logs shutdown information
pub fn log_service_shutdown() {
	info!("🛑 Market Intelligence Engine Shutting Down");
	info!(
		"🕒 Shutdown at: {}",
		chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
	);
}
