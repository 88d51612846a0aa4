//! Market Intel Library
//!
//! Quote aggregation and market intelligence for a services marketplace: paginated,
//! filtered feeds of open service requests enriched with competition and pricing
//! signals for providers.

use std::sync::Arc;
use tracing::info;

// Core domain types
pub use intel_types::{
	chrono, Budget, BudgetFilter, CompetitionFilter, CompetitionLevel, CompetitivePosition,
	DataFilters, DemandLevel, EnrichedServiceRequest, GeoPoint, IntelligenceFilters,
	IntelligenceSource, LocationFilter, MarketIntelligence, PageCursor, PrecomputedIntelligence,
	PriceDirection, PriceGapFilter, Quote, QuoteAggregation, ResolutionStrategy, ScoreRange,
	ServiceRequest, SortKey, Urgency,
};

// Service layer
pub use intel_service::{
	FetchError, FetchPage, FetchQuery, FixedMarketSignal, MarketIntelligenceScorer,
	MarketSignal, PaginatedFetchOrchestrator, QuoteAggregator, RequestFilterEngine,
	SeededMarketSignal, UnlockError, UnlockService,
};

// Storage layer
pub use intel_storage::{
	traits::{StorageError, StorageResult, StorageStats},
	MemoryStore, Storage,
};

// Config
pub use intel_config::{load_config, log_service_info, log_startup_complete, Settings};

pub mod snapshot;

pub use snapshot::{SnapshotError, SnapshotSummary, StoreSnapshot};

pub mod models {
	pub use intel_types::*;
}

pub mod storage {
	pub use intel_storage::*;
}

pub mod config {
	pub use intel_config::*;
}

pub mod service {
	pub use intel_service::*;
}

/// Builder for a [`MarketIntelligenceEngine`]
pub struct MarketIntelBuilder<S = MemoryStore>
where
	S: Storage + Clone + 'static,
{
	settings: Option<Settings>,
	storage: S,
	signal: Option<Arc<dyn MarketSignal>>,
}

impl<S> MarketIntelBuilder<S>
where
	S: Storage + Clone + 'static,
{
	/// Create a builder over the provided storage
	pub fn with_storage(storage: S) -> Self {
		Self {
			settings: None,
			storage,
			signal: None,
		}
	}

	/// Set custom settings
	pub fn with_settings(mut self, settings: Settings) -> Self {
		self.settings = Some(settings);
		self
	}

	/// Override the market signal; by default it is seeded from `scoring.seed`
	pub fn with_signal(mut self, signal: Arc<dyn MarketSignal>) -> Self {
		self.signal = Some(signal);
		self
	}

	/// Get the current settings
	pub fn settings(&self) -> Option<&Settings> {
		self.settings.as_ref()
	}

	/// Wire the services over the storage
	pub fn build(self) -> Result<MarketIntelligenceEngine, intel_config::ConfigValidationError> {
		let settings = self.settings.unwrap_or_default();
		settings.validate()?;

		let signal: Arc<dyn MarketSignal> = match (self.signal, settings.scoring.seed) {
			(Some(signal), _) => signal,
			(None, Some(seed)) => Arc::new(SeededMarketSignal::new(seed)),
			(None, None) => Arc::new(SeededMarketSignal::from_entropy()),
		};
		let scorer = Arc::new(MarketIntelligenceScorer::new(signal));
		let store = Arc::new(self.storage);

		let resolver = intel_service::IntelligenceResolver::new(
			store.clone(),
			store.clone(),
			Arc::clone(&scorer),
		)
		.with_strategy(settings.engine.intelligence_strategy)
		.with_batch_limit(settings.engine.in_query_limit)
		.with_max_staleness(settings.max_staleness());

		let fetcher = PaginatedFetchOrchestrator::new(
			store.clone(),
			store.clone(),
			Arc::new(resolver),
			Arc::new(RequestFilterEngine::new()),
		)
		.with_max_page_size(settings.engine.max_page_size)
		.with_in_query_limit(settings.engine.in_query_limit);

		let unlocks = UnlockService::new(store.clone(), scorer);
		let storage: Arc<dyn Storage> = store;

		info!(
			"Market intelligence engine built: strategy={:?}, max_page_size={}",
			settings.engine.intelligence_strategy, settings.engine.max_page_size
		);

		Ok(MarketIntelligenceEngine {
			settings,
			storage,
			fetcher,
			unlocks,
		})
	}
}

impl MarketIntelBuilder<MemoryStore> {
	/// Create a builder with default memory storage
	pub fn new() -> Self {
		Self::with_storage(MemoryStore::new())
	}

	/// Create a builder from configuration using default memory storage
	pub fn from_config(settings: Settings) -> Self {
		Self::new().with_settings(settings)
	}
}

impl Default for MarketIntelBuilder<MemoryStore> {
	fn default() -> Self {
		Self::new()
	}
}

/// Entry point for provider-facing request feeds and unlocks
pub struct MarketIntelligenceEngine {
	settings: Settings,
	storage: Arc<dyn Storage>,
	fetcher: PaginatedFetchOrchestrator,
	unlocks: UnlockService,
}

impl MarketIntelligenceEngine {
	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	pub fn storage(&self) -> Arc<dyn Storage> {
		Arc::clone(&self.storage)
	}

	/// One page of open requests. `page_size` defaults to `engine.default_page_size`.
	pub async fn fetch_service_requests(
		&self,
		data_filters: DataFilters,
		intelligence_filters: IntelligenceFilters,
		sort: SortKey,
		page_size: Option<usize>,
		cursor: Option<PageCursor>,
	) -> FetchPage {
		let query = self.query(data_filters, intelligence_filters, sort, page_size, cursor);
		self.fetcher.fetch(&query).await
	}

	/// Same as [`Self::fetch_service_requests`] with the provider's unlock state attached
	pub async fn fetch_for_provider(
		&self,
		provider_id: &str,
		data_filters: DataFilters,
		intelligence_filters: IntelligenceFilters,
		sort: SortKey,
		page_size: Option<usize>,
		cursor: Option<PageCursor>,
	) -> FetchPage {
		let query = self
			.query(data_filters, intelligence_filters, sort, page_size, cursor)
			.with_provider(provider_id);
		self.fetcher.fetch(&query).await
	}

	/// Run a prepared query, surfacing failures instead of an empty page
	pub async fn try_fetch(&self, query: &FetchQuery) -> Result<FetchPage, FetchError> {
		self.fetcher.try_fetch(query).await
	}

	pub async fn unlock_service_request(
		&self,
		request_id: &str,
		provider_id: &str,
	) -> Result<EnrichedServiceRequest, UnlockError> {
		self.unlocks
			.unlock_service_request(request_id, provider_id)
			.await
	}

	pub async fn stats(&self) -> StorageResult<StorageStats> {
		self.storage.stats().await
	}

	/// Whether the backing store is reachable
	pub async fn health_check(&self) -> StorageResult<bool> {
		self.storage.health_check().await
	}

	fn query(
		&self,
		data_filters: DataFilters,
		intelligence_filters: IntelligenceFilters,
		sort: SortKey,
		page_size: Option<usize>,
		cursor: Option<PageCursor>,
	) -> FetchQuery {
		FetchQuery::new()
			.with_data_filters(data_filters)
			.with_intelligence_filters(intelligence_filters)
			.with_sort(sort)
			.with_page_size(page_size.unwrap_or(self.settings.engine.default_page_size))
			.with_cursor(cursor)
	}
}

/// Initialize tracing with configuration-based settings
pub fn init_tracing_from_settings(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
	use intel_config::LogFormat;

	// RUST_LOG wins over the configured level
	let log_level = &settings.logging.level;
	let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.or_else(|_| tracing_subscriber::EnvFilter::try_new(log_level))?;

	match settings.logging.format {
		LogFormat::Json => {
			let subscriber = tracing_subscriber::fmt().json().with_env_filter(env_filter);

			if settings.logging.structured {
				subscriber.with_target(true).with_thread_ids(true).try_init().map_err(|e| -> Box<dyn std::error::Error> { e })?;
			} else {
				subscriber.try_init().map_err(|e| -> Box<dyn std::error::Error> { e })?;
			}
		},
		LogFormat::Pretty => {
			let subscriber = tracing_subscriber::fmt()
				.pretty()
				.with_env_filter(env_filter);

			if settings.logging.structured {
				subscriber.with_target(true).with_thread_ids(true).try_init().map_err(|e| -> Box<dyn std::error::Error> { e })?;
			} else {
				subscriber.try_init().map_err(|e| -> Box<dyn std::error::Error> { e })?;
			}
		},
		LogFormat::Compact => {
			let subscriber = tracing_subscriber::fmt()
				.compact()
				.with_env_filter(env_filter);

			if settings.logging.structured {
				subscriber.with_target(true).with_thread_ids(true).try_init().map_err(|e| -> Box<dyn std::error::Error> { e })?;
			} else {
				subscriber.try_init().map_err(|e| -> Box<dyn std::error::Error> { e })?;
			}
		},
	}

	info!(
		"Logging configuration applied: level={}, format={:?}, structured={}",
		settings.logging.level, settings.logging.format, settings.logging.structured
	);

	Ok(())
}
