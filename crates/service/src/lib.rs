//! Market Intel Service
//!
//! Core logic for quote aggregation, intelligence scoring, filtering and paginated fetch.

pub mod aggregator;
pub mod fetch;
pub mod market_signal;
pub mod request_filter;
pub mod resolver;
pub mod scorer;
pub mod unlock;

pub use aggregator::QuoteAggregator;
pub use fetch::{FetchError, FetchPage, FetchQuery, PaginatedFetchOrchestrator};
pub use market_signal::{FixedMarketSignal, MarketSignal, SeededMarketSignal};
pub use request_filter::{RequestFilterEngine, RequestFilterTrait};
pub use resolver::{IntelligenceResolver, IntelligenceResolverTrait, ResolverError};
pub use scorer::MarketIntelligenceScorer;
pub use unlock::{UnlockError, UnlockService};
