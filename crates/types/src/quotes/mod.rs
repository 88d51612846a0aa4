//! Core Quote domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod aggregation;
pub mod errors;

pub use aggregation::{CostBreakdown, QuoteAggregation, StatRange, TimelineRange};
pub use errors::{AggregationError, QuoteValidationError};

/// Result type for quote validation operations
pub type QuoteValidationResult<T> = Result<T, QuoteValidationError>;

/// One provider's priced, timed bid against one request.
///
/// Quotes are immutable once created; a provider who changes their mind submits a new
/// quote rather than editing the old one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
	/// Unique identifier for the quote
	pub quote_id: String,

	/// Request this quote was submitted against
	pub request_id: String,

	/// Provider that submitted the quote
	pub provider_id: String,

	/// Materials plus labor, as submitted
	pub total_price: f64,

	pub materials_cost: f64,

	pub labor_cost: f64,

	/// Estimated duration of the job in whole days
	pub timeline_days: u32,

	pub submitted_at: DateTime<Utc>,
}

impl Quote {
	/// Create a new quote; the total is the sum of materials and labor
	pub fn new(
		request_id: String,
		provider_id: String,
		materials_cost: f64,
		labor_cost: f64,
		timeline_days: u32,
	) -> Self {
		Self {
			quote_id: Uuid::new_v4().to_string(),
			request_id,
			provider_id,
			total_price: materials_cost + labor_cost,
			materials_cost,
			labor_cost,
			timeline_days,
			submitted_at: Utc::now(),
		}
	}

	/// Override the submission timestamp
	pub fn with_submitted_at(mut self, submitted_at: DateTime<Utc>) -> Self {
		self.submitted_at = submitted_at;
		self
	}

	/// Override the total price (the total is not re-derived from the breakdown)
	pub fn with_total_price(mut self, total_price: f64) -> Self {
		self.total_price = total_price;
		self
	}

	/// Validate the quote before it is accepted into a store
	pub fn validate(&self) -> QuoteValidationResult<()> {
		if self.request_id.trim().is_empty() {
			return Err(QuoteValidationError::MissingRequiredField {
				field: "request_id",
			});
		}
		if self.provider_id.trim().is_empty() {
			return Err(QuoteValidationError::MissingRequiredField {
				field: "provider_id",
			});
		}

		for (field, value) in [
			("total_price", self.total_price),
			("materials_cost", self.materials_cost),
			("labor_cost", self.labor_cost),
		] {
			if !value.is_finite() || value < 0.0 {
				return Err(QuoteValidationError::InvalidAmount { field, value });
			}
		}

		if self.timeline_days == 0 {
			return Err(QuoteValidationError::InvalidTimeline {
				days: self.timeline_days,
			});
		}

		Ok(())
	}
}
