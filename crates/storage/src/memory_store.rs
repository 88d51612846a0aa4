//! In-memory storage implementation using DashMap

use crate::traits::{
	IntelligenceCache, QuoteStorage, RequestStorage, Storage, StorageError, StorageResult,
	UnlockStorage,
};
use async_trait::async_trait;
use dashmap::DashMap;
use intel_types::constants::limits::MAX_IN_QUERY_VALUES;
use intel_types::{
	PageCursor, PrecomputedIntelligence, Quote, RequestPage, RequestQuery, ServiceRequest,
	UnlockRecord,
};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// In-memory document store for requests, quotes, precomputed intelligence and unlocks
#[derive(Clone)]
pub struct MemoryStore {
	pub requests: Arc<DashMap<String, ServiceRequest>>,
	pub quotes: Arc<DashMap<String, Quote>>,
	pub intelligence: Arc<DashMap<String, PrecomputedIntelligence>>,
	pub unlocks: Arc<DashMap<String, UnlockRecord>>,
	in_query_limit: usize,
}

impl MemoryStore {
	/// Create a new memory store instance
	pub fn new() -> Self {
		Self::with_in_query_limit(MAX_IN_QUERY_VALUES)
	}

	/// Create a memory store enforcing a custom cap on multi-value predicates
	pub fn with_in_query_limit(in_query_limit: usize) -> Self {
		Self {
			requests: Arc::new(DashMap::new()),
			quotes: Arc::new(DashMap::new()),
			intelligence: Arc::new(DashMap::new()),
			unlocks: Arc::new(DashMap::new()),
			in_query_limit,
		}
	}

	fn check_in_limit(&self, requested: usize) -> StorageResult<()> {
		if requested > self.in_query_limit {
			return Err(StorageError::QueryLimitExceeded {
				limit: self.in_query_limit,
				requested,
			});
		}
		Ok(())
	}

	/// Whether `request` sorts strictly after the cursor position
	fn is_after_cursor(
		query: &RequestQuery,
		cursor: &PageCursor,
		request: &ServiceRequest,
	) -> bool {
		let order = query.order;
		order.compare_keys(
			&order.sort_value(request),
			&request.request_id,
			&cursor.sort_value,
			&cursor.document_id,
		) == Ordering::Greater
	}
}

impl Default for MemoryStore {
	fn default() -> Self {
		Self::new()
	}
}

// Trait implementations for pluggable storage

#[async_trait]
impl RequestStorage for MemoryStore {
	async fn create_request(&self, request: ServiceRequest) -> StorageResult<()> {
		debug!("Storing request {}", request.request_id);
		self.requests.insert(request.request_id.clone(), request);
		Ok(())
	}

	async fn get_request(&self, request_id: &str) -> StorageResult<Option<ServiceRequest>> {
		Ok(self.requests.get(request_id).map(|r| r.clone()))
	}

	async fn query_requests(&self, query: &RequestQuery) -> StorageResult<RequestPage> {
		for predicate in &query.predicates {
			self.check_in_limit(predicate.value_count())?;
		}

		if let Some(cursor) = &query.start_after {
			if cursor.order != query.order {
				return Err(StorageError::Operation {
					message: format!(
						"cursor was issued for {:?} but the query orders by {:?}",
						cursor.order, query.order
					),
				});
			}
		}

		let mut matching: Vec<ServiceRequest> = self
			.requests
			.iter()
			.filter_map(|entry| {
				let request = entry.value();
				if query.predicates.iter().all(|p| p.matches(request)) {
					Some(request.clone())
				} else {
					None
				}
			})
			.collect();

		matching.sort_by(|a, b| query.order.compare(a, b));

		let documents: Vec<ServiceRequest> = matching
			.into_iter()
			.filter(|request| match &query.start_after {
				Some(cursor) => Self::is_after_cursor(query, cursor, request),
				None => true,
			})
			.take(query.limit)
			.collect();

		let last = documents
			.last()
			.map(|request| PageCursor::for_document(request, query.order));

		debug!(
			"Request query returned {} documents (limit {})",
			documents.len(),
			query.limit
		);

		Ok(RequestPage { documents, last })
	}

	async fn request_count(&self) -> StorageResult<usize> {
		Ok(self.requests.len())
	}
}

#[async_trait]
impl QuoteStorage for MemoryStore {
	async fn add_quote(&self, quote: Quote) -> StorageResult<()> {
		quote.validate()?;
		self.quotes.insert(quote.quote_id.clone(), quote);
		Ok(())
	}

	async fn get_quotes_by_request(&self, request_id: &str) -> StorageResult<Vec<Quote>> {
		let mut quotes: Vec<Quote> = self
			.quotes
			.iter()
			.filter_map(|entry| {
				let quote = entry.value();
				if quote.request_id == request_id {
					Some(quote.clone())
				} else {
					None
				}
			})
			.collect();
		quotes.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at));
		Ok(quotes)
	}

	async fn quote_count(&self) -> StorageResult<usize> {
		Ok(self.quotes.len())
	}
}

#[async_trait]
impl IntelligenceCache for MemoryStore {
	async fn get_intelligence_by_ids(
		&self,
		request_ids: &[String],
	) -> StorageResult<Vec<PrecomputedIntelligence>> {
		self.check_in_limit(request_ids.len())?;

		Ok(request_ids
			.iter()
			.filter_map(|id| self.intelligence.get(id).map(|r| r.clone()))
			.collect())
	}

	async fn upsert_intelligence(&self, record: PrecomputedIntelligence) -> StorageResult<()> {
		self.intelligence.insert(record.request_id.clone(), record);
		Ok(())
	}

	async fn intelligence_count(&self) -> StorageResult<usize> {
		Ok(self.intelligence.len())
	}
}

#[async_trait]
impl UnlockStorage for MemoryStore {
	async fn record_unlock(&self, record: UnlockRecord) -> StorageResult<()> {
		info!(
			"Provider {} unlocked request {}",
			record.provider_id, record.request_id
		);
		self.unlocks.insert(record.unlock_id.clone(), record);
		Ok(())
	}

	async fn unlocked_request_ids(
		&self,
		provider_id: &str,
		request_ids: &[String],
	) -> StorageResult<HashSet<String>> {
		Ok(self
			.unlocks
			.iter()
			.filter_map(|entry| {
				let unlock = entry.value();
				if unlock.provider_id == provider_id && request_ids.contains(&unlock.request_id) {
					Some(unlock.request_id.clone())
				} else {
					None
				}
			})
			.collect())
	}

	async fn unlock_count(&self) -> StorageResult<usize> {
		Ok(self.unlocks.len())
	}
}

#[async_trait]
impl Storage for MemoryStore {
	async fn health_check(&self) -> StorageResult<bool> {
		// For in-memory storage, just check if the maps are accessible
		Ok(true)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use intel_types::chrono::{Duration, Utc};
	use intel_types::{
		MarketIntelligence, QuoteAggregation, RequestPredicate, RequestStatus, StoreOrder,
		Urgency,
	};

	fn request(id: &str, minutes_ago: i64) -> ServiceRequest {
		ServiceRequest::new(
			"customer-1".to_string(),
			format!("Job {}", id),
			vec!["plumbing".to_string()],
			Urgency::Standard,
		)
		.with_id(id)
		.with_created_at(Utc::now() - Duration::minutes(minutes_ago))
	}

	async fn seeded_store(count: usize) -> MemoryStore {
		let store = MemoryStore::new();
		for i in 0..count {
			store
				.create_request(request(&format!("req-{:02}", i), i as i64))
				.await
				.unwrap();
		}
		store
	}

	#[tokio::test]
	async fn test_query_pages_with_cursor() {
		let store = seeded_store(5).await;

		let first = store
			.query_requests(&RequestQuery::new(StoreOrder::CreatedAtDesc, 2))
			.await
			.unwrap();
		let ids: Vec<_> = first.documents.iter().map(|r| r.request_id.as_str()).collect();
		assert_eq!(ids, vec!["req-00", "req-01"]);
		assert_eq!(first.last.as_ref().unwrap().document_id, "req-01");

		let second = store
			.query_requests(
				&RequestQuery::new(StoreOrder::CreatedAtDesc, 2).with_start_after(first.last),
			)
			.await
			.unwrap();
		let ids: Vec<_> = second.documents.iter().map(|r| r.request_id.as_str()).collect();
		assert_eq!(ids, vec!["req-02", "req-03"]);

		let third = store
			.query_requests(
				&RequestQuery::new(StoreOrder::CreatedAtDesc, 2).with_start_after(second.last),
			)
			.await
			.unwrap();
		assert_eq!(third.documents.len(), 1);

		let exhausted = store
			.query_requests(
				&RequestQuery::new(StoreOrder::CreatedAtDesc, 2).with_start_after(third.last),
			)
			.await
			.unwrap();
		assert!(exhausted.documents.is_empty());
		assert!(exhausted.last.is_none());
	}

	#[tokio::test]
	async fn test_query_applies_predicates() {
		let store = seeded_store(3).await;
		store
			.create_request(request("closed", 0).with_status(RequestStatus::Completed))
			.await
			.unwrap();

		let page = store
			.query_requests(
				&RequestQuery::new(StoreOrder::CreatedAtDesc, 10)
					.with_predicate(RequestPredicate::StatusEquals(RequestStatus::Open)),
			)
			.await
			.unwrap();
		assert_eq!(page.documents.len(), 3);
		assert!(page.documents.iter().all(|r| r.is_open()));
	}

	#[tokio::test]
	async fn test_query_rejects_oversized_in_predicate() {
		let store = MemoryStore::new();
		let trades = (0..31).map(|i| format!("trade-{}", i)).collect();
		let result = store
			.query_requests(
				&RequestQuery::new(StoreOrder::CreatedAtDesc, 10)
					.with_predicate(RequestPredicate::TradesContainAny(trades)),
			)
			.await;
		assert!(matches!(
			result,
			Err(StorageError::QueryLimitExceeded {
				limit: 30,
				requested: 31
			})
		));
	}

	#[tokio::test]
	async fn test_cursor_order_mismatch_is_rejected() {
		let store = seeded_store(2).await;
		let cursor = PageCursor::for_document(&request("req-00", 0), StoreOrder::BudgetMaxDesc);
		let result = store
			.query_requests(
				&RequestQuery::new(StoreOrder::CreatedAtDesc, 2).with_start_after(Some(cursor)),
			)
			.await;
		assert!(matches!(result, Err(StorageError::Operation { .. })));
	}

	#[tokio::test]
	async fn test_intelligence_lookup_caps_ids() {
		let store = MemoryStore::new();
		let record = PrecomputedIntelligence::new(
			QuoteAggregation::empty("req-1"),
			MarketIntelligence::fallback("req-1"),
		);
		store.upsert_intelligence(record).await.unwrap();

		let found = store
			.get_intelligence_by_ids(&["req-1".to_string(), "missing".to_string()])
			.await
			.unwrap();
		assert_eq!(found.len(), 1);

		let too_many: Vec<String> = (0..31).map(|i| i.to_string()).collect();
		assert!(store.get_intelligence_by_ids(&too_many).await.is_err());
	}

	#[tokio::test]
	async fn test_add_quote_rejects_malformed() {
		let store = MemoryStore::new();
		let quote = Quote::new("req-1".to_string(), "p1".to_string(), f64::NAN, 10.0, 2);
		assert!(matches!(
			store.add_quote(quote).await,
			Err(StorageError::InvalidQuote(_))
		));
		assert_eq!(store.quote_count().await.unwrap(), 0);
	}

	#[tokio::test]
	async fn test_unlocked_ids_are_scoped_to_provider() {
		let store = MemoryStore::new();
		store
			.record_unlock(UnlockRecord::new("req-1".to_string(), "p1".to_string()))
			.await
			.unwrap();
		store
			.record_unlock(UnlockRecord::new("req-2".to_string(), "p2".to_string()))
			.await
			.unwrap();

		let ids = ["req-1".to_string(), "req-2".to_string()];
		let unlocked = store.unlocked_request_ids("p1", &ids).await.unwrap();
		assert_eq!(unlocked, HashSet::from(["req-1".to_string()]));

		let stats = store.stats().await.unwrap();
		assert_eq!(stats.total_unlocks, 2);
	}
}
