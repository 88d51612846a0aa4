//! Quote aggregation
//!
//! Reduces the quotes submitted against one request into price, timeline and cost
//! breakdown statistics plus a competition level.

use intel_types::{
	AggregationError, CompetitionLevel, CostBreakdown, Quote, QuoteAggregation, StatRange,
	TimelineRange,
};
use tracing::debug;

/// Stateless reducer from a quote set to a [`QuoteAggregation`]
#[derive(Debug, Clone, Copy, Default)]
pub struct QuoteAggregator;

impl QuoteAggregator {
	pub fn new() -> Self {
		Self
	}

	/// Aggregate the quotes of one request.
	///
	/// An empty slice is the normal state of an un-quoted request and yields the zero
	/// aggregation. A quote carrying a non-finite or negative amount aborts the whole
	/// aggregation, since a single NaN would poison every derived score.
	pub fn aggregate(
		&self,
		request_id: &str,
		quotes: &[Quote],
	) -> Result<QuoteAggregation, AggregationError> {
		if quotes.is_empty() {
			return Ok(QuoteAggregation::empty(request_id));
		}

		for quote in quotes {
			quote
				.validate()
				.map_err(|source| AggregationError::MalformedQuote {
					request_id: request_id.to_string(),
					quote_id: quote.quote_id.clone(),
					source,
				})?;
		}

		let total_quotes = quotes.len();
		let price_range = stat_range(quotes.iter().map(|q| q.total_price));
		let breakdown = CostBreakdown {
			materials: stat_range(quotes.iter().map(|q| q.materials_cost)),
			labor: stat_range(quotes.iter().map(|q| q.labor_cost)),
		};
		let timeline_range = timeline_range(quotes);
		let last_quote_at = quotes.iter().map(|q| q.submitted_at).max();

		debug!(
			"Aggregated {} quotes for request {}: price {}..{}",
			total_quotes, request_id, price_range.min, price_range.max
		);

		Ok(QuoteAggregation {
			request_id: request_id.to_string(),
			total_quotes,
			price_range,
			timeline_range,
			breakdown,
			competition_level: CompetitionLevel::from_quote_count(total_quotes),
			last_quote_at,
		})
	}
}

/// Min, max and whole-unit rounded mean. The mean stays inside `[min, max]` even when
/// rounding would push it across a fractional bound.
fn stat_range(values: impl Iterator<Item = f64>) -> StatRange {
	let mut min = f64::INFINITY;
	let mut max = f64::NEG_INFINITY;
	let mut sum = 0.0;
	let mut count = 0usize;

	for value in values {
		min = min.min(value);
		max = max.max(value);
		sum += value;
		count += 1;
	}

	if count == 0 {
		return StatRange::default();
	}

	let average = (sum / count as f64).round().clamp(min, max);
	StatRange { min, max, average }
}

fn timeline_range(quotes: &[Quote]) -> TimelineRange {
	let min_days = quotes.iter().map(|q| q.timeline_days).min().unwrap_or(0);
	let max_days = quotes.iter().map(|q| q.timeline_days).max().unwrap_or(0);
	let total_days: u64 = quotes.iter().map(|q| u64::from(q.timeline_days)).sum();
	let mean = total_days as f64 / quotes.len() as f64;

	TimelineRange {
		min_days,
		max_days,
		average_days: (mean * 10.0).round() / 10.0,
	}
}
