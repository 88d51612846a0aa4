//! Market intelligence scoring
//!
//! Turns a quote aggregation into an opportunity score, competitive position, price band,
//! win probability and trend labels.

use crate::aggregator::QuoteAggregator;
use crate::market_signal::MarketSignal;
use intel_types::constants::limits::{
	LARGE_PRICE_GAP, MAX_OPPORTUNITY_SCORE, MAX_WIN_PROBABILITY, MIN_OPPORTUNITY_SCORE,
	MIN_WIN_PROBABILITY,
};
use intel_types::{
	classify_quote_volume, AggregationError, CompetitivePosition, DemandLevel,
	IntelligenceSource, MarketIntelligence, MarketTrends, Quote, QuoteAggregation,
	RecommendedPriceRange, ResolvedIntelligence, VolumeTier,
};
use std::sync::Arc;

/// Score bonus when the price spread exceeds the large-gap threshold
const PRICE_GAP_BONUS: u32 = 30;

/// Quote count below which the request counts as lightly quoted
const LIGHTLY_QUOTED_BELOW: usize = 5;

const LIGHTLY_QUOTED_BONUS: u32 = 40;

const HEAVILY_QUOTED_BONUS: u32 = 20;

pub struct MarketIntelligenceScorer {
	aggregator: QuoteAggregator,
	signal: Arc<dyn MarketSignal>,
}

impl MarketIntelligenceScorer {
	pub fn new(signal: Arc<dyn MarketSignal>) -> Self {
		Self {
			aggregator: QuoteAggregator::new(),
			signal,
		}
	}

	/// Score an aggregation. A request without quotes gets the optimistic fallback.
	pub fn score(&self, aggregation: &QuoteAggregation) -> MarketIntelligence {
		if aggregation.is_empty() {
			return MarketIntelligence::fallback(aggregation.request_id.clone());
		}

		let total_quotes = aggregation.total_quotes;
		let average = aggregation.price_range.average;

		MarketIntelligence {
			request_id: aggregation.request_id.clone(),
			opportunity_score: self.opportunity_score(aggregation),
			competitive_position: CompetitivePosition::from_quote_count(total_quotes),
			recommended_price_range: RecommendedPriceRange {
				min: (average * 0.9).round(),
				max: (average * 1.1).round(),
				optimal: (average * 0.95).round(),
			},
			win_probability: self.win_probability(total_quotes),
			market_trends: MarketTrends {
				price_direction: self.signal.price_direction(),
				demand_level: DemandLevel::from_quote_count(total_quotes),
			},
		}
	}

	/// Aggregate a raw quote list and score it; agrees with `score` on the aggregation
	pub fn score_quotes(
		&self,
		request_id: &str,
		quotes: &[Quote],
	) -> Result<ResolvedIntelligence, AggregationError> {
		let aggregation = self.aggregator.aggregate(request_id, quotes)?;
		let intelligence = self.score(&aggregation);
		let source = if aggregation.is_empty() {
			IntelligenceSource::Fallback
		} else {
			IntelligenceSource::Computed
		};

		Ok(ResolvedIntelligence {
			quotes: aggregation,
			intelligence,
			source,
		})
	}

	fn opportunity_score(&self, aggregation: &QuoteAggregation) -> u32 {
		let gap_bonus = if aggregation.price_spread() > LARGE_PRICE_GAP {
			PRICE_GAP_BONUS
		} else {
			0
		};
		let volume_bonus = if aggregation.total_quotes < LIGHTLY_QUOTED_BELOW {
			LIGHTLY_QUOTED_BONUS
		} else {
			HEAVILY_QUOTED_BONUS
		};

		(gap_bonus + volume_bonus + self.signal.opportunity_noise())
			.clamp(MIN_OPPORTUNITY_SCORE, MAX_OPPORTUNITY_SCORE)
	}

	fn win_probability(&self, total_quotes: usize) -> f64 {
		let base = match classify_quote_volume(total_quotes) {
			VolumeTier::Few => 0.8,
			VolumeTier::Several => 0.6,
			VolumeTier::Many => 0.4,
		};

		(base + self.signal.win_probability_noise()).clamp(MIN_WIN_PROBABILITY, MAX_WIN_PROBABILITY)
	}
}
