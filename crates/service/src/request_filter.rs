//! Request filtering
//!
//! Decides whether an enriched request survives the caller's data filters (trade,
//! urgency, budget, location, recency) and intelligence filters (competition, opportunity
//! band, win rate, price gap).
//!
//! Every predicate is pure and independent of the others, so evaluation order never
//! changes the outcome and evaluation stops at the first failing check.

use chrono::{DateTime, Duration, Utc};
use intel_types::{DataFilters, EnrichedServiceRequest, IntelligenceFilters};
use tracing::debug;

/// Tolerance when comparing a win probability percentage against an integer threshold
const WIN_RATE_EPSILON: f64 = 1e-9;

/// Trait for request filtering
#[cfg_attr(test, mockall::automock)]
pub trait RequestFilterTrait: Send + Sync {
	fn matches(
		&self,
		candidate: &EnrichedServiceRequest,
		data_filters: &DataFilters,
		intelligence_filters: &IntelligenceFilters,
		now: DateTime<Utc>,
	) -> bool;

	/// Retain the matching candidates, preserving their order
	fn filter(
		&self,
		candidates: Vec<EnrichedServiceRequest>,
		data_filters: &DataFilters,
		intelligence_filters: &IntelligenceFilters,
		now: DateTime<Utc>,
	) -> Vec<EnrichedServiceRequest> {
		let before = candidates.len();
		let kept: Vec<EnrichedServiceRequest> = candidates
			.into_iter()
			.filter(|candidate| self.matches(candidate, data_filters, intelligence_filters, now))
			.collect();
		debug!("Request filtering kept {} of {}", kept.len(), before);
		kept
	}
}

/// Default filter engine
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestFilterEngine;

impl RequestFilterEngine {
	pub fn new() -> Self {
		Self
	}

	fn matches_trades(candidate: &EnrichedServiceRequest, filters: &DataFilters) -> bool {
		filters.trades.is_empty()
			|| candidate
				.request
				.trades
				.iter()
				.any(|trade| filters.trades.contains(trade))
	}

	fn matches_urgency(candidate: &EnrichedServiceRequest, filters: &DataFilters) -> bool {
		filters.urgency.is_empty() || filters.urgency.contains(&candidate.request.urgency)
	}

	/// An active bound requires the request to state a budget
	fn matches_budget(candidate: &EnrichedServiceRequest, filters: &DataFilters) -> bool {
		if !filters.budget.is_active() {
			return true;
		}
		candidate
			.request
			.budget
			.as_ref()
			.is_some_and(|budget| filters.budget.admits(budget))
	}

	/// A positive radius requires the request to carry a location
	fn matches_location(candidate: &EnrichedServiceRequest, filters: &DataFilters) -> bool {
		let Some(location) = filters.location.filter(|l| l.is_bounded()) else {
			return true;
		};
		candidate
			.request
			.location
			.as_ref()
			.is_some_and(|point| point.distance_km(&location.center) <= location.radius_km)
	}

	fn matches_recency(
		candidate: &EnrichedServiceRequest,
		filters: &DataFilters,
		now: DateTime<Utc>,
	) -> bool {
		match filters.posted_within_hours {
			Some(hours) => candidate.request.created_at >= now - Duration::hours(i64::from(hours)),
			None => true,
		}
	}

	fn matches_competition(
		candidate: &EnrichedServiceRequest,
		filters: &IntelligenceFilters,
	) -> bool {
		filters
			.competition_level
			.matches(candidate.quotes.competition_level)
	}

	fn matches_opportunity(
		candidate: &EnrichedServiceRequest,
		filters: &IntelligenceFilters,
	) -> bool {
		filters
			.opportunity_score
			.contains(candidate.intelligence.opportunity_score)
	}

	fn matches_win_rate(candidate: &EnrichedServiceRequest, filters: &IntelligenceFilters) -> bool {
		filters.win_rate_threshold == 0
			|| candidate.intelligence.win_probability * 100.0
				>= f64::from(filters.win_rate_threshold) - WIN_RATE_EPSILON
	}

	fn matches_price_gap(
		candidate: &EnrichedServiceRequest,
		filters: &IntelligenceFilters,
	) -> bool {
		filters.price_gap.matches(candidate.quotes.price_spread())
	}
}

impl RequestFilterTrait for RequestFilterEngine {
	fn matches(
		&self,
		candidate: &EnrichedServiceRequest,
		data_filters: &DataFilters,
		intelligence_filters: &IntelligenceFilters,
		now: DateTime<Utc>,
	) -> bool {
		Self::matches_trades(candidate, data_filters)
			&& Self::matches_urgency(candidate, data_filters)
			&& Self::matches_budget(candidate, data_filters)
			&& Self::matches_location(candidate, data_filters)
			&& Self::matches_recency(candidate, data_filters, now)
			&& Self::matches_competition(candidate, intelligence_filters)
			&& Self::matches_opportunity(candidate, intelligence_filters)
			&& Self::matches_win_rate(candidate, intelligence_filters)
			&& Self::matches_price_gap(candidate, intelligence_filters)
	}
}
