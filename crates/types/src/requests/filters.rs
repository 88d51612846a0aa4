//! Filter value objects applied to candidate requests
//!
//! Every filter's `Default` means "no restriction".

use serde::{Deserialize, Serialize};

use super::{Budget, GeoPoint, Urgency};
use crate::constants::limits::{LARGE_PRICE_GAP, MAX_OPPORTUNITY_SCORE, MEDIUM_PRICE_GAP};
use crate::intelligence::CompetitionLevel;

/// Budget bounds; either side may be open
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetFilter {
	pub min: Option<f64>,
	pub max: Option<f64>,
}

impl BudgetFilter {
	pub fn is_active(&self) -> bool {
		self.min.is_some() || self.max.is_some()
	}

	/// A request budget passes when it overlaps the filter bounds
	pub fn admits(&self, budget: &Budget) -> bool {
		if let Some(min) = self.min {
			if budget.max < min {
				return false;
			}
		}
		if let Some(max) = self.max {
			if budget.min > max {
				return false;
			}
		}
		true
	}
}

/// Radius around a centre point.
///
/// The centre is also the reference for distances; a non-positive radius keeps the
/// reference without bounding the results.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationFilter {
	pub center: GeoPoint,
	pub radius_km: f64,
}

impl LocationFilter {
	pub fn is_bounded(&self) -> bool {
		self.radius_km > 0.0
	}
}

/// Filters on the request record itself
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataFilters {
	pub trades: Vec<String>,
	pub urgency: Vec<Urgency>,
	pub budget: BudgetFilter,
	pub location: Option<LocationFilter>,
	pub posted_within_hours: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompetitionFilter {
	#[default]
	All,
	Low,
	Medium,
	High,
}

impl CompetitionFilter {
	pub fn matches(&self, level: CompetitionLevel) -> bool {
		match self {
			Self::All => true,
			Self::Low => level == CompetitionLevel::Low,
			Self::Medium => level == CompetitionLevel::Medium,
			Self::High => level == CompetitionLevel::High,
		}
	}
}

/// Bucket for the spread between the highest and lowest quote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceGapFilter {
	#[default]
	All,
	/// Spread below $100
	Small,
	/// Spread between $100 and $200 inclusive
	Medium,
	/// Spread above $200
	Large,
}

impl PriceGapFilter {
	pub fn matches(&self, spread: f64) -> bool {
		match self {
			Self::All => true,
			Self::Small => spread < MEDIUM_PRICE_GAP,
			Self::Medium => (MEDIUM_PRICE_GAP..=LARGE_PRICE_GAP).contains(&spread),
			Self::Large => spread > LARGE_PRICE_GAP,
		}
	}
}

/// Inclusive opportunity score band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRange {
	pub min: u32,
	pub max: u32,
}

impl Default for ScoreRange {
	fn default() -> Self {
		Self {
			min: 0,
			max: MAX_OPPORTUNITY_SCORE,
		}
	}
}

impl ScoreRange {
	pub fn contains(&self, score: u32) -> bool {
		(self.min..=self.max).contains(&score)
	}
}

/// Filters on the derived market intelligence
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntelligenceFilters {
	pub competition_level: CompetitionFilter,
	/// Minimum win rate in percent; `0` disables the check
	pub win_rate_threshold: u32,
	pub opportunity_score: ScoreRange,
	pub price_gap: PriceGapFilter,
}
