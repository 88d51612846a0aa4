//! Statistical summary of the quotes submitted against one request

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::intelligence::CompetitionLevel;

/// Min / max / average over one numeric quote field
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatRange {
	pub min: f64,
	pub max: f64,
	pub average: f64,
}

impl StatRange {
	/// Distance between the highest and the lowest value
	pub fn spread(&self) -> f64 {
		self.max - self.min
	}
}

/// Timeline statistics in days; the average keeps one decimal place
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineRange {
	pub min_days: u32,
	pub max_days: u32,
	pub average_days: f64,
}

/// Materials / labor split of the submitted prices
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
	pub materials: StatRange,
	pub labor: StatRange,
}

/// Aggregated view of a request's quotes.
///
/// Always derived from the quote set (or read from a precomputed cache copy); never the
/// authoritative state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteAggregation {
	pub request_id: String,
	pub total_quotes: usize,
	pub price_range: StatRange,
	pub timeline_range: TimelineRange,
	pub breakdown: CostBreakdown,
	pub competition_level: CompetitionLevel,
	pub last_quote_at: Option<DateTime<Utc>>,
}

impl QuoteAggregation {
	/// Aggregation of a request nobody has quoted yet: all zeros, low competition
	pub fn empty(request_id: impl Into<String>) -> Self {
		Self {
			request_id: request_id.into(),
			total_quotes: 0,
			price_range: StatRange::default(),
			timeline_range: TimelineRange::default(),
			breakdown: CostBreakdown::default(),
			competition_level: CompetitionLevel::Low,
			last_quote_at: None,
		}
	}

	pub fn is_empty(&self) -> bool {
		self.total_quotes == 0
	}

	/// Spread between the highest and the lowest total price
	pub fn price_spread(&self) -> f64 {
		self.price_range.spread()
	}
}
