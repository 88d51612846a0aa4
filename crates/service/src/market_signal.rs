//! Market signal sources feeding the noise and trend terms of the scorer
//!
//! Scoring stays a pure function of its inputs: every non-deterministic term is pulled
//! from a [`MarketSignal`] the caller injects.

use intel_types::PriceDirection;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Range (half-open) of the opportunity noise term
pub const OPPORTUNITY_NOISE_RANGE: std::ops::Range<u32> = 20..50;

/// Half-width of the win probability noise term
pub const WIN_PROBABILITY_NOISE: f64 = 0.1;

/// Source of the noise and trend terms used by the scorer
#[cfg_attr(test, mockall::automock)]
pub trait MarketSignal: Send + Sync {
	/// Additive opportunity term in `20..50`
	fn opportunity_noise(&self) -> u32;

	/// Additive win probability term in `[-0.1, 0.1)`
	fn win_probability_noise(&self) -> f64;

	/// Current price direction for the request's market
	fn price_direction(&self) -> PriceDirection;
}

/// Pseudo-random signal with the same ranges as live noise; reproducible when seeded
pub struct SeededMarketSignal {
	rng: Mutex<StdRng>,
}

impl SeededMarketSignal {
	pub fn new(seed: u64) -> Self {
		Self {
			rng: Mutex::new(StdRng::seed_from_u64(seed)),
		}
	}

	/// Seed from the operating system
	pub fn from_entropy() -> Self {
		Self {
			rng: Mutex::new(StdRng::from_os_rng()),
		}
	}

	fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
		let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
		f(&mut rng)
	}
}

impl MarketSignal for SeededMarketSignal {
	fn opportunity_noise(&self) -> u32 {
		self.with_rng(|rng| rng.random_range(OPPORTUNITY_NOISE_RANGE))
	}

	fn win_probability_noise(&self) -> f64 {
		self.with_rng(|rng| rng.random_range(-WIN_PROBABILITY_NOISE..WIN_PROBABILITY_NOISE))
	}

	fn price_direction(&self) -> PriceDirection {
		self.with_rng(|rng| match rng.random_range(0..3u8) {
			0 => PriceDirection::Up,
			1 => PriceDirection::Stable,
			_ => PriceDirection::Down,
		})
	}
}

/// Constant signal; stands in for a real trend feed until one exists
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedMarketSignal {
	pub opportunity_noise: u32,
	pub win_probability_noise: f64,
	pub price_direction: PriceDirection,
}

impl FixedMarketSignal {
	/// Midpoint noise, no win probability adjustment, stable prices
	pub fn neutral() -> Self {
		Self {
			opportunity_noise: 35,
			win_probability_noise: 0.0,
			price_direction: PriceDirection::Stable,
		}
	}
}

impl Default for FixedMarketSignal {
	fn default() -> Self {
		Self::neutral()
	}
}

impl MarketSignal for FixedMarketSignal {
	fn opportunity_noise(&self) -> u32 {
		self.opportunity_noise
	}

	fn win_probability_noise(&self) -> f64 {
		self.win_probability_noise
	}

	fn price_direction(&self) -> PriceDirection {
		self.price_direction
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_seeded_signal_is_reproducible() {
		let a = SeededMarketSignal::new(42);
		let b = SeededMarketSignal::new(42);
		for _ in 0..20 {
			assert_eq!(a.opportunity_noise(), b.opportunity_noise());
			assert_eq!(a.win_probability_noise(), b.win_probability_noise());
			assert_eq!(a.price_direction(), b.price_direction());
		}
	}

	#[test]
	fn test_seeded_signal_stays_in_range() {
		let signal = SeededMarketSignal::new(7);
		for _ in 0..1_000 {
			assert!(OPPORTUNITY_NOISE_RANGE.contains(&signal.opportunity_noise()));
			let noise = signal.win_probability_noise();
			assert!((-WIN_PROBABILITY_NOISE..WIN_PROBABILITY_NOISE).contains(&noise));
		}
	}
}
