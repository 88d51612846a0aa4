//! Quote-volume classification shared by competition level, competitive position and demand
//!
//! The `< 3` / `3..=6` / `>= 7` breakpoints exist only here.

use super::{CompetitionLevel, CompetitivePosition, DemandLevel};

/// Upper bound (exclusive) of the "few quotes" tier
pub const FEW_QUOTES_BELOW: usize = 3;

/// Lower bound (inclusive) of the "many quotes" tier
pub const MANY_QUOTES_FROM: usize = 7;

/// Coarse bucket for how many quotes a request has received
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeTier {
	Few,
	Several,
	Many,
}

/// Classify a quote count into its volume tier
pub fn classify_quote_volume(count: usize) -> VolumeTier {
	if count < FEW_QUOTES_BELOW {
		VolumeTier::Few
	} else if count < MANY_QUOTES_FROM {
		VolumeTier::Several
	} else {
		VolumeTier::Many
	}
}

impl From<VolumeTier> for CompetitionLevel {
	fn from(tier: VolumeTier) -> Self {
		match tier {
			VolumeTier::Few => Self::Low,
			VolumeTier::Several => Self::Medium,
			VolumeTier::Many => Self::High,
		}
	}
}

impl From<VolumeTier> for CompetitivePosition {
	fn from(tier: VolumeTier) -> Self {
		match tier {
			VolumeTier::Few => Self::Strong,
			VolumeTier::Several => Self::Moderate,
			VolumeTier::Many => Self::Weak,
		}
	}
}

impl CompetitionLevel {
	pub fn from_quote_count(count: usize) -> Self {
		classify_quote_volume(count).into()
	}
}

impl CompetitivePosition {
	pub fn from_quote_count(count: usize) -> Self {
		classify_quote_volume(count).into()
	}
}

impl DemandLevel {
	/// Demand is `high` above 7 quotes and `medium` above 3, i.e. the volume tiers
	/// shifted up by one quote.
	pub fn from_quote_count(count: usize) -> Self {
		match classify_quote_volume(count.saturating_sub(1)) {
			VolumeTier::Few => Self::Low,
			VolumeTier::Several => Self::Medium,
			VolumeTier::Many => Self::High,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_competition_level_boundaries() {
		for count in 0..3 {
			assert_eq!(CompetitionLevel::from_quote_count(count), CompetitionLevel::Low);
		}
		for count in 3..=6 {
			assert_eq!(
				CompetitionLevel::from_quote_count(count),
				CompetitionLevel::Medium
			);
		}
		for count in [7, 8, 50] {
			assert_eq!(CompetitionLevel::from_quote_count(count), CompetitionLevel::High);
		}
	}

	#[test]
	fn test_position_mirrors_competition() {
		assert_eq!(
			CompetitivePosition::from_quote_count(2),
			CompetitivePosition::Strong
		);
		assert_eq!(
			CompetitivePosition::from_quote_count(3),
			CompetitivePosition::Moderate
		);
		assert_eq!(
			CompetitivePosition::from_quote_count(6),
			CompetitivePosition::Moderate
		);
		assert_eq!(
			CompetitivePosition::from_quote_count(7),
			CompetitivePosition::Weak
		);
	}

	#[test]
	fn test_demand_uses_strict_thresholds() {
		assert_eq!(DemandLevel::from_quote_count(0), DemandLevel::Low);
		assert_eq!(DemandLevel::from_quote_count(3), DemandLevel::Low);
		assert_eq!(DemandLevel::from_quote_count(4), DemandLevel::Medium);
		assert_eq!(DemandLevel::from_quote_count(7), DemandLevel::Medium);
		assert_eq!(DemandLevel::from_quote_count(8), DemandLevel::High);
	}
}
