//! Market intelligence derived from a request's quote aggregation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::quotes::QuoteAggregation;

pub mod tiers;

pub use tiers::{classify_quote_volume, VolumeTier};

/// How crowded a request is with quotes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompetitionLevel {
	Low,
	Medium,
	High,
}

/// How well placed a new entrant is against the existing quotes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompetitivePosition {
	Strong,
	Moderate,
	Weak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceDirection {
	Up,
	Down,
	Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemandLevel {
	Low,
	Medium,
	High,
}

/// Suggested price band for a new quote
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendedPriceRange {
	pub min: f64,
	pub max: f64,
	pub optimal: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketTrends {
	pub price_direction: PriceDirection,
	pub demand_level: DemandLevel,
}

/// Opportunity assessment for a provider considering a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketIntelligence {
	pub request_id: String,
	/// Heuristic ranking in `20..=100`
	pub opportunity_score: u32,
	pub competitive_position: CompetitivePosition,
	pub recommended_price_range: RecommendedPriceRange,
	/// Estimated chance of winning in `0.2..=0.9`
	pub win_probability: f64,
	pub market_trends: MarketTrends,
}

impl MarketIntelligence {
	/// Optimistic default for a request with no quotes and no precomputed record
	pub fn fallback(request_id: impl Into<String>) -> Self {
		Self {
			request_id: request_id.into(),
			opportunity_score: 80,
			competitive_position: CompetitivePosition::Strong,
			recommended_price_range: RecommendedPriceRange::default(),
			win_probability: 0.8,
			market_trends: MarketTrends {
				price_direction: PriceDirection::Stable,
				demand_level: DemandLevel::Low,
			},
		}
	}
}

/// Cache record maintained by an offline job, keyed by request id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrecomputedIntelligence {
	pub request_id: String,
	pub quotes: QuoteAggregation,
	pub intelligence: MarketIntelligence,
	pub computed_at: DateTime<Utc>,
}

impl PrecomputedIntelligence {
	pub fn new(quotes: QuoteAggregation, intelligence: MarketIntelligence) -> Self {
		Self {
			request_id: quotes.request_id.clone(),
			quotes,
			intelligence,
			computed_at: Utc::now(),
		}
	}

	/// Whether the record is older than `max_age` at `now`
	pub fn is_stale(&self, now: DateTime<Utc>, max_age: chrono::Duration) -> bool {
		now - self.computed_at > max_age
	}
}

/// Where the intelligence attached to a request came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntelligenceSource {
	Precomputed,
	Computed,
	Fallback,
}

/// Aggregation and intelligence for one request, as produced by a resolver
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedIntelligence {
	pub quotes: QuoteAggregation,
	pub intelligence: MarketIntelligence,
	pub source: IntelligenceSource,
}

impl ResolvedIntelligence {
	pub fn fallback(request_id: &str) -> Self {
		Self {
			quotes: QuoteAggregation::empty(request_id),
			intelligence: MarketIntelligence::fallback(request_id),
			source: IntelligenceSource::Fallback,
		}
	}
}

impl From<PrecomputedIntelligence> for ResolvedIntelligence {
	fn from(record: PrecomputedIntelligence) -> Self {
		Self {
			quotes: record.quotes,
			intelligence: record.intelligence,
			source: IntelligenceSource::Precomputed,
		}
	}
}

/// Strategy used to attach intelligence to fetched requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStrategy {
	/// Use the precomputed cache, compute from quotes when a record is missing
	#[default]
	PrecomputedFirst,
	/// Use the precomputed cache only; missing records get the fallback
	PrecomputedOnly,
	/// Always compute from the quote set
	ComputedOnly,
}
