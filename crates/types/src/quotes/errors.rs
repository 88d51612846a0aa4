//! Error types for quote operations

use thiserror::Error;

/// Validation errors raised when a quote is ingested
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuoteValidationError {
	#[error("Invalid amount: {field} = {value} (must be a finite, non-negative number)")]
	InvalidAmount { field: &'static str, value: f64 },

	#[error("Invalid timeline: {days} days (must be at least 1)")]
	InvalidTimeline { days: u32 },

	#[error("Missing required field: {field}")]
	MissingRequiredField { field: &'static str },
}

/// Errors raised while reducing a quote set
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AggregationError {
	#[error("Malformed quote {quote_id} for request {request_id}: {source}")]
	MalformedQuote {
		request_id: String,
		quote_id: String,
		#[source]
		source: QuoteValidationError,
	},
}
