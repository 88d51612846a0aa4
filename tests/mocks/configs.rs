//! Settings and engine fixtures for testing

use market_intel::config::Settings;
use market_intel::models::{IntelligenceCacheTrait, QuoteStorageTrait, RequestStorageTrait};
use market_intel::{
	FixedMarketSignal, MarketIntelBuilder, MarketIntelligenceEngine, MemoryStore,
	PrecomputedIntelligence, Quote, ResolutionStrategy, ServiceRequest,
};
use std::sync::Arc;

#[allow(dead_code)]
pub struct MockConfigs;

#[allow(dead_code)]
impl MockConfigs {
	/// Default settings with a fixed seed
	pub fn settings() -> Settings {
		let mut settings = Settings::default();
		settings.scoring.seed = Some(42);
		settings
	}

	pub fn settings_with_strategy(strategy: ResolutionStrategy) -> Settings {
		let mut settings = Self::settings();
		settings.engine.intelligence_strategy = strategy;
		settings
	}

	/// Engine over `store` with a neutral, deterministic market signal
	pub fn engine(store: MemoryStore, settings: Settings) -> MarketIntelligenceEngine {
		MarketIntelBuilder::with_storage(store)
			.with_settings(settings)
			.with_signal(Arc::new(FixedMarketSignal::neutral()))
			.build()
			.expect("test settings are valid")
	}

	/// Memory store pre-loaded with the given entities
	pub async fn seeded_store(
		requests: Vec<ServiceRequest>,
		quotes: Vec<Quote>,
		precomputed: Vec<PrecomputedIntelligence>,
	) -> MemoryStore {
		let store = MemoryStore::new();
		for request in requests {
			store.create_request(request).await.expect("request stored");
		}
		for quote in quotes {
			store.add_quote(quote).await.expect("quote stored");
		}
		for record in precomputed {
			store
				.upsert_intelligence(record)
				.await
				.expect("precomputed record stored");
		}
		store
	}
}
