//! Error types for storage operations

use thiserror::Error;

use crate::quotes::QuoteValidationError;

/// Storage error type
#[derive(Debug, Error)]
pub enum StorageError {
	#[error("Item not found: {id}")]
	NotFound { id: String },
	#[error("Connection error: {message}")]
	Connection { message: String },
	#[error("Serialization error: {message}")]
	Serialization { message: String },
	#[error("Query limit exceeded: {requested} values requested, at most {limit} allowed")]
	QueryLimitExceeded { limit: usize, requested: usize },
	#[error("Rejected invalid quote: {0}")]
	InvalidQuote(#[from] QuoteValidationError),
	#[error("Storage operation failed: {message}")]
	Operation { message: String },
}
