//! Unlock service
//!
//! Records a provider unlocking a request and returns the request with freshly computed
//! intelligence.

use crate::scorer::MarketIntelligenceScorer;
use intel_types::{
	AggregationError, EnrichedServiceRequest, QuoteStorageTrait, RequestStorageTrait, StorageTrait,
	UnlockRecord, UnlockStorageTrait,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum UnlockError {
	#[error("request not found: {0}")]
	RequestNotFound(String),
	#[error("validation error: {0}")]
	Validation(String),
	#[error("storage error: {0}")]
	Storage(String),
	#[error("aggregation error: {0}")]
	Aggregation(#[from] AggregationError),
}

#[derive(Clone)]
pub struct UnlockService {
	storage: Arc<dyn StorageTrait>,
	scorer: Arc<MarketIntelligenceScorer>,
}

impl UnlockService {
	pub fn new(storage: Arc<dyn StorageTrait>, scorer: Arc<MarketIntelligenceScorer>) -> Self {
		Self { storage, scorer }
	}

	/// Unlock a request for a provider.
	///
	/// Intelligence is always computed from the current quote set, never read from the
	/// precomputed cache.
	pub async fn unlock_service_request(
		&self,
		request_id: &str,
		provider_id: &str,
	) -> Result<EnrichedServiceRequest, UnlockError> {
		if provider_id.trim().is_empty() {
			return Err(UnlockError::Validation(
				"provider_id is required to unlock a request".to_string(),
			));
		}

		let request = self
			.storage
			.get_request(request_id)
			.await
			.map_err(|e| UnlockError::Storage(e.to_string()))?
			.ok_or_else(|| UnlockError::RequestNotFound(request_id.to_string()))?;

		let quotes = self
			.storage
			.get_quotes_by_request(request_id)
			.await
			.map_err(|e| UnlockError::Storage(e.to_string()))?;
		let resolved = self.scorer.score_quotes(request_id, &quotes)?;

		// Only a fully scored unlock is persisted
		self.storage
			.record_unlock(UnlockRecord::new(
				request_id.to_string(),
				provider_id.to_string(),
			))
			.await
			.map_err(|e| UnlockError::Storage(e.to_string()))?;

		info!(
			"Provider {} unlocked request {} ({} quotes)",
			provider_id, request_id, resolved.quotes.total_quotes
		);

		Ok(EnrichedServiceRequest::new(request, resolved).with_unlocked(true))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::market_signal::FixedMarketSignal;
	use async_trait::async_trait;
	use intel_storage::MemoryStore;
	use intel_types::{
		IntelligenceCacheTrait, IntelligenceSource, MarketIntelligence, PrecomputedIntelligence,
		Quote, QuoteAggregation, RequestPage, RequestQuery, ServiceRequest, StorageError,
		StorageResult, Urgency,
	};
	use std::collections::HashSet;

	/// Memory store whose quote lookup always fails
	struct QuotelessStore(Arc<MemoryStore>);

	#[async_trait]
	impl RequestStorageTrait for QuotelessStore {
		async fn create_request(&self, request: ServiceRequest) -> StorageResult<()> {
			self.0.create_request(request).await
		}

		async fn get_request(&self, request_id: &str) -> StorageResult<Option<ServiceRequest>> {
			self.0.get_request(request_id).await
		}

		async fn query_requests(&self, query: &RequestQuery) -> StorageResult<RequestPage> {
			self.0.query_requests(query).await
		}

		async fn request_count(&self) -> StorageResult<usize> {
			self.0.request_count().await
		}
	}

	#[async_trait]
	impl QuoteStorageTrait for QuotelessStore {
		async fn add_quote(&self, quote: Quote) -> StorageResult<()> {
			self.0.add_quote(quote).await
		}

		async fn get_quotes_by_request(&self, _request_id: &str) -> StorageResult<Vec<Quote>> {
			Err(StorageError::Connection {
				message: "quote backend unavailable".to_string(),
			})
		}

		async fn quote_count(&self) -> StorageResult<usize> {
			self.0.quote_count().await
		}
	}

	#[async_trait]
	impl IntelligenceCacheTrait for QuotelessStore {
		async fn get_intelligence_by_ids(
			&self,
			request_ids: &[String],
		) -> StorageResult<Vec<PrecomputedIntelligence>> {
			self.0.get_intelligence_by_ids(request_ids).await
		}

		async fn upsert_intelligence(&self, record: PrecomputedIntelligence) -> StorageResult<()> {
			self.0.upsert_intelligence(record).await
		}

		async fn intelligence_count(&self) -> StorageResult<usize> {
			self.0.intelligence_count().await
		}
	}

	#[async_trait]
	impl UnlockStorageTrait for QuotelessStore {
		async fn record_unlock(&self, record: UnlockRecord) -> StorageResult<()> {
			self.0.record_unlock(record).await
		}

		async fn unlocked_request_ids(
			&self,
			provider_id: &str,
			request_ids: &[String],
		) -> StorageResult<HashSet<String>> {
			self.0.unlocked_request_ids(provider_id, request_ids).await
		}

		async fn unlock_count(&self) -> StorageResult<usize> {
			self.0.unlock_count().await
		}
	}

	#[async_trait]
	impl StorageTrait for QuotelessStore {
		async fn health_check(&self) -> StorageResult<bool> {
			self.0.health_check().await
		}
	}

	fn service(store: Arc<MemoryStore>) -> UnlockService {
		let scorer = MarketIntelligenceScorer::new(Arc::new(FixedMarketSignal::neutral()));
		UnlockService::new(store, Arc::new(scorer))
	}

	async fn store_with_request(id: &str) -> Arc<MemoryStore> {
		let store = MemoryStore::new();
		store
			.create_request(
				ServiceRequest::new(
					"customer".to_string(),
					"Fix boiler".to_string(),
					vec!["heating".to_string()],
					Urgency::Urgent,
				)
				.with_id(id),
			)
			.await
			.unwrap();
		Arc::new(store)
	}

	#[tokio::test]
	async fn test_unlock_records_and_scores_fresh() {
		let store = store_with_request("req").await;
		for (materials, labor) in [(100.0, 200.0), (200.0, 300.0)] {
			store
				.add_quote(Quote::new(
					"req".to_string(),
					"other".to_string(),
					materials,
					labor,
					3,
				))
				.await
				.unwrap();
		}
		let mut cached = MarketIntelligence::fallback("req");
		cached.opportunity_score = 21;
		store
			.upsert_intelligence(PrecomputedIntelligence::new(
				QuoteAggregation::empty("req"),
				cached,
			))
			.await
			.unwrap();

		let unlocked = service(store.clone())
			.unlock_service_request("req", "provider-1")
			.await
			.unwrap();

		assert!(unlocked.is_unlocked);
		assert_eq!(unlocked.intelligence_source, IntelligenceSource::Computed);
		assert_eq!(unlocked.quotes.total_quotes, 2);
		assert_ne!(unlocked.intelligence.opportunity_score, 21);
		assert_eq!(store.unlock_count().await.unwrap(), 1);

		let ids = store
			.unlocked_request_ids("provider-1", &["req".to_string()])
			.await
			.unwrap();
		assert!(ids.contains("req"));
	}

	#[tokio::test]
	async fn test_unlock_without_quotes_gets_fallback() {
		let store = store_with_request("req").await;
		let unlocked = service(store)
			.unlock_service_request("req", "provider-1")
			.await
			.unwrap();
		assert_eq!(unlocked.intelligence_source, IntelligenceSource::Fallback);
		assert_eq!(unlocked.intelligence.opportunity_score, 80);
	}

	#[tokio::test]
	async fn test_unknown_request_is_not_found() {
		let store = Arc::new(MemoryStore::new());
		let result = service(store.clone())
			.unlock_service_request("missing", "provider-1")
			.await;
		assert!(matches!(result, Err(UnlockError::RequestNotFound(id)) if id == "missing"));
		assert_eq!(store.unlock_count().await.unwrap(), 0);
	}

	#[tokio::test]
	async fn test_blank_provider_is_rejected() {
		let store = store_with_request("req").await;
		let result = service(store).unlock_service_request("req", "  ").await;
		assert!(matches!(result, Err(UnlockError::Validation(_))));
	}

	#[tokio::test]
	async fn test_failed_quote_lookup_records_nothing() {
		let inner = store_with_request("req").await;
		let scorer = MarketIntelligenceScorer::new(Arc::new(FixedMarketSignal::neutral()));
		let service = UnlockService::new(Arc::new(QuotelessStore(inner.clone())), Arc::new(scorer));

		for _ in 0..2 {
			let result = service.unlock_service_request("req", "provider-1").await;
			assert!(matches!(result, Err(UnlockError::Storage(_))));
		}

		assert_eq!(inner.unlock_count().await.unwrap(), 0);
		let ids = inner
			.unlocked_request_ids("provider-1", &["req".to_string()])
			.await
			.unwrap();
		assert!(ids.is_empty());
	}
}
