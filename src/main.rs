//! Market Intel CLI
//!
//! Loads configuration, seeds an in-memory store from an optional JSON snapshot and
//! prints the first page of open requests as JSON.

use market_intel::{
	config::log_service_shutdown, init_tracing_from_settings, load_config, log_service_info,
	log_startup_complete, DataFilters, IntelligenceFilters, MarketIntelBuilder, MemoryStore,
	SortKey, StoreSnapshot,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let settings = load_config()?;
	init_tracing_from_settings(&settings)?;
	log_service_info(&settings);

	let store = MemoryStore::new();
	if let Some(path) = &settings.environment.seed_path {
		StoreSnapshot::from_path(path)?.load_into(&store).await?;
	}

	let engine = MarketIntelBuilder::with_storage(store)
		.with_settings(settings)
		.build()?;

	if !engine.health_check().await? {
		warn!("Storage reported unhealthy at startup");
	}

	let stats = engine.stats().await?;
	log_startup_complete(
		stats.total_requests,
		stats.total_quotes,
		stats.precomputed_records,
	);

	let page = engine
		.fetch_service_requests(
			DataFilters::default(),
			IntelligenceFilters::default(),
			SortKey::Newest,
			None,
			None,
		)
		.await;
	info!(
		"Fetched {} requests (has_more={})",
		page.requests.len(),
		page.has_more
	);
	println!("{}", serde_json::to_string_pretty(&page)?);

	log_service_shutdown();
	Ok(())
}
