//! Market Intel Types
//!
//! Shared models and traits for the market intelligence engine.
//! This crate contains the domain models organized by business entity.

pub mod constants;
pub mod intelligence;
pub mod quotes;
pub mod requests;
pub mod storage;

// Re-export chrono for convenience
pub use chrono;

pub use quotes::{
	AggregationError, CostBreakdown, Quote, QuoteAggregation, QuoteValidationError,
	QuoteValidationResult, StatRange, TimelineRange,
};

pub use intelligence::{
	classify_quote_volume, CompetitionLevel, CompetitivePosition, DemandLevel,
	IntelligenceSource, MarketIntelligence, MarketTrends, PrecomputedIntelligence,
	PriceDirection, RecommendedPriceRange, ResolutionStrategy, ResolvedIntelligence,
	VolumeTier,
};

pub use requests::{
	Budget, BudgetFilter, CompetitionFilter, DataFilters, EnrichedServiceRequest, GeoPoint,
	IntelligenceFilters, LocationFilter, PageCursor, PriceGapFilter, RequestPage,
	RequestPredicate, RequestQuery, RequestStatus, ScoreRange, ServiceRequest, SortKey,
	SortValue, StoreOrder, UnlockRecord, Urgency,
};

pub use storage::{
	IntelligenceCacheTrait, QuoteStorageTrait, RequestStorageTrait, StorageError,
	StorageResult, StorageStats, StorageTrait, UnlockStorageTrait,
};
