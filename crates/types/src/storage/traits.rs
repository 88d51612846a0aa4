//! Storage traits for pluggable storage implementations

use async_trait::async_trait;
use std::collections::HashSet;

use super::StorageResult;
use crate::intelligence::PrecomputedIntelligence;
use crate::quotes::Quote;
use crate::requests::{RequestPage, RequestQuery, ServiceRequest, UnlockRecord};

/// Statistics about storage usage
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StorageStats {
	pub total_requests: usize,
	pub total_quotes: usize,
	pub precomputed_records: usize,
	pub total_unlocks: usize,
}

/// Trait for request document operations
#[async_trait]
pub trait RequestStorageTrait: Send + Sync {
	/// Insert or replace a request document
	async fn create_request(&self, request: ServiceRequest) -> StorageResult<()>;

	/// Get a request by ID
	async fn get_request(&self, request_id: &str) -> StorageResult<Option<ServiceRequest>>;

	/// Run a predicate / order / limit / start-after page query
	async fn query_requests(&self, query: &RequestQuery) -> StorageResult<RequestPage>;

	/// Get request count
	async fn request_count(&self) -> StorageResult<usize>;
}

/// Trait for quote operations; quotes are enumerable per request and never updated
#[async_trait]
pub trait QuoteStorageTrait: Send + Sync {
	/// Validate and add a new quote
	async fn add_quote(&self, quote: Quote) -> StorageResult<()>;

	/// Get all quotes for a request
	async fn get_quotes_by_request(&self, request_id: &str) -> StorageResult<Vec<Quote>>;

	/// Get quote count
	async fn quote_count(&self) -> StorageResult<usize>;
}

/// Trait for the precomputed intelligence cache
#[async_trait]
pub trait IntelligenceCacheTrait: Send + Sync {
	/// Fetch records whose request id is one of `request_ids`.
	///
	/// Fails with `QueryLimitExceeded` when more ids are passed than the store's
	/// "id in" predicate accepts; missing ids are simply absent from the result.
	async fn get_intelligence_by_ids(
		&self,
		request_ids: &[String],
	) -> StorageResult<Vec<PrecomputedIntelligence>>;

	/// Insert or replace a cache record
	async fn upsert_intelligence(&self, record: PrecomputedIntelligence) -> StorageResult<()>;

	/// Get cache record count
	async fn intelligence_count(&self) -> StorageResult<usize>;
}

/// Trait for the unlock ledger
#[async_trait]
pub trait UnlockStorageTrait: Send + Sync {
	/// Record an unlock transaction
	async fn record_unlock(&self, record: UnlockRecord) -> StorageResult<()>;

	/// Subset of `request_ids` the provider has unlocked
	async fn unlocked_request_ids(
		&self,
		provider_id: &str,
		request_ids: &[String],
	) -> StorageResult<HashSet<String>>;

	/// Get unlock count
	async fn unlock_count(&self) -> StorageResult<usize>;
}

/// Main storage trait that combines all storage operations
#[async_trait]
pub trait StorageTrait:
	RequestStorageTrait + QuoteStorageTrait + IntelligenceCacheTrait + UnlockStorageTrait
{
	/// Health check for the storage system
	async fn health_check(&self) -> StorageResult<bool>;

	/// Get overall storage statistics
	async fn stats(&self) -> StorageResult<StorageStats> {
		Ok(StorageStats {
			total_requests: self.request_count().await?,
			total_quotes: self.quote_count().await?,
			precomputed_records: self.intelligence_count().await?,
			total_unlocks: self.unlock_count().await?,
		})
	}
}
