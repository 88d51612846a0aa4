//! Paginated fetch
//!
//! Pulls one raw page of open requests from the store, enriches it with intelligence,
//! distance and unlock state, applies the caller's filters and re-sorts by computed
//! fields where the sort key asks for it.

use crate::request_filter::RequestFilterTrait;
use crate::resolver::{IntelligenceResolverTrait, ResolverError};
use chrono::Utc;
use intel_types::constants::limits::{DEFAULT_PAGE_SIZE, MAX_IN_QUERY_VALUES, MAX_PAGE_SIZE};
use intel_types::{
	DataFilters, EnrichedServiceRequest, IntelligenceFilters, PageCursor, RequestPredicate,
	RequestQuery, RequestStatus, RequestStorageTrait, ResolvedIntelligence, ServiceRequest,
	SortKey, UnlockStorageTrait,
};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, warn};

#[derive(Debug, Error)]
pub enum FetchError {
	#[error("storage error: {0}")]
	Storage(String),
	#[error("intelligence resolution failed: {0}")]
	Resolution(#[from] ResolverError),
}

/// Parameters of one page fetch
#[derive(Debug, Clone, PartialEq)]
pub struct FetchQuery {
	pub data_filters: DataFilters,
	pub intelligence_filters: IntelligenceFilters,
	pub sort: SortKey,
	pub page_size: usize,
	/// `last_doc` of the previous page; reset it whenever the filters change
	pub cursor: Option<PageCursor>,
	/// When set, results carry this provider's unlock state
	pub provider_id: Option<String>,
}

impl Default for FetchQuery {
	fn default() -> Self {
		Self {
			data_filters: DataFilters::default(),
			intelligence_filters: IntelligenceFilters::default(),
			sort: SortKey::default(),
			page_size: DEFAULT_PAGE_SIZE,
			cursor: None,
			provider_id: None,
		}
	}
}

impl FetchQuery {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_data_filters(mut self, data_filters: DataFilters) -> Self {
		self.data_filters = data_filters;
		self
	}

	pub fn with_intelligence_filters(mut self, intelligence_filters: IntelligenceFilters) -> Self {
		self.intelligence_filters = intelligence_filters;
		self
	}

	pub fn with_sort(mut self, sort: SortKey) -> Self {
		self.sort = sort;
		self
	}

	pub fn with_page_size(mut self, page_size: usize) -> Self {
		self.page_size = page_size;
		self
	}

	pub fn with_cursor(mut self, cursor: Option<PageCursor>) -> Self {
		self.cursor = cursor;
		self
	}

	pub fn with_provider(mut self, provider_id: impl Into<String>) -> Self {
		self.provider_id = Some(provider_id.into());
		self
	}
}

/// One page of enriched, filtered requests
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchPage {
	pub requests: Vec<EnrichedServiceRequest>,
	/// True when the raw store page was full; may be a false positive on the last page
	pub has_more: bool,
	/// Cursor of the last raw document, before filtering
	pub last_doc: Option<PageCursor>,
}

impl FetchPage {
	pub fn empty() -> Self {
		Self::default()
	}
}

pub struct PaginatedFetchOrchestrator {
	requests: Arc<dyn RequestStorageTrait>,
	unlocks: Arc<dyn UnlockStorageTrait>,
	resolver: Arc<dyn IntelligenceResolverTrait>,
	filter: Arc<dyn RequestFilterTrait>,
	max_page_size: usize,
	in_query_limit: usize,
}

impl PaginatedFetchOrchestrator {
	pub fn new(
		requests: Arc<dyn RequestStorageTrait>,
		unlocks: Arc<dyn UnlockStorageTrait>,
		resolver: Arc<dyn IntelligenceResolverTrait>,
		filter: Arc<dyn RequestFilterTrait>,
	) -> Self {
		Self {
			requests,
			unlocks,
			resolver,
			filter,
			max_page_size: MAX_PAGE_SIZE,
			in_query_limit: MAX_IN_QUERY_VALUES,
		}
	}

	pub fn with_max_page_size(mut self, max_page_size: usize) -> Self {
		self.max_page_size = max_page_size.max(1);
		self
	}

	pub fn with_in_query_limit(mut self, in_query_limit: usize) -> Self {
		self.in_query_limit = in_query_limit.max(1);
		self
	}

	/// Fetch one page, surfacing any store or resolution failure as an empty page
	pub async fn fetch(&self, query: &FetchQuery) -> FetchPage {
		match self.try_fetch(query).await {
			Ok(page) => page,
			Err(e) => {
				error!("Failed to fetch service requests: {}", e);
				FetchPage::empty()
			},
		}
	}

	/// Fetch one page
	pub async fn try_fetch(&self, query: &FetchQuery) -> Result<FetchPage, FetchError> {
		let page_size = query.page_size.clamp(1, self.max_page_size);
		let store_query = self.build_store_query(query, page_size);

		let raw = self
			.requests
			.query_requests(&store_query)
			.await
			.map_err(|e| FetchError::Storage(e.to_string()))?;
		let raw_count = raw.documents.len();

		if raw_count == 0 {
			debug!("Store returned no requests");
			return Ok(FetchPage::empty());
		}

		let mut resolved = self.resolver.resolve(&raw.documents).await?;
		let unlocked = match &query.provider_id {
			Some(provider_id) => self.unlocked_ids(provider_id, &raw.documents).await?,
			None => HashSet::new(),
		};
		let center = query.data_filters.location.as_ref().map(|l| l.center);

		let enriched: Vec<EnrichedServiceRequest> = raw
			.documents
			.into_iter()
			.map(|request| {
				let intelligence = resolved
					.remove(&request.request_id)
					.unwrap_or_else(|| ResolvedIntelligence::fallback(&request.request_id));
				let distance_km = match (center, request.location) {
					(Some(center), Some(location)) => Some(center.distance_km(&location)),
					_ => None,
				};
				let is_unlocked = unlocked.contains(&request.request_id);
				EnrichedServiceRequest::new(request, intelligence)
					.with_distance_km(distance_km)
					.with_unlocked(is_unlocked)
			})
			.collect();

		let mut requests = self.filter.filter(
			enriched,
			&query.data_filters,
			&query.intelligence_filters,
			Utc::now(),
		);
		if query.sort.requires_resort() {
			resort(&mut requests, query.sort);
		}

		debug!(
			"Fetched {} raw requests, {} after filtering",
			raw_count,
			requests.len()
		);

		Ok(FetchPage {
			requests,
			has_more: raw_count == page_size,
			last_doc: raw.last,
		})
	}

	/// Open status plus whichever multi-value predicates the store can evaluate
	fn build_store_query(&self, query: &FetchQuery, page_size: usize) -> RequestQuery {
		let filters = &query.data_filters;
		let mut store_query = RequestQuery::new(query.sort.store_order(), page_size)
			.with_predicate(RequestPredicate::StatusEquals(RequestStatus::Open))
			.with_start_after(query.cursor.clone());

		if !filters.urgency.is_empty() {
			if filters.urgency.len() <= self.in_query_limit {
				store_query = store_query
					.with_predicate(RequestPredicate::UrgencyIn(filters.urgency.clone()));
			} else {
				warn!(
					"Urgency filter has {} values, filtering in memory",
					filters.urgency.len()
				);
			}
		}

		if !filters.trades.is_empty() {
			if filters.trades.len() <= self.in_query_limit {
				store_query = store_query
					.with_predicate(RequestPredicate::TradesContainAny(filters.trades.clone()));
			} else {
				warn!(
					"Trade filter has {} values, filtering in memory",
					filters.trades.len()
				);
			}
		}

		store_query
	}

	async fn unlocked_ids(
		&self,
		provider_id: &str,
		documents: &[ServiceRequest],
	) -> Result<HashSet<String>, FetchError> {
		let ids: Vec<String> = documents.iter().map(|r| r.request_id.clone()).collect();
		let mut unlocked = HashSet::new();
		for chunk in ids.chunks(self.in_query_limit) {
			let found = self
				.unlocks
				.unlocked_request_ids(provider_id, chunk)
				.await
				.map_err(|e| FetchError::Storage(e.to_string()))?;
			unlocked.extend(found);
		}
		Ok(unlocked)
	}
}

/// Stable in-memory re-sort for keys the store cannot order by
fn resort(requests: &mut [EnrichedServiceRequest], sort: SortKey) {
	match sort {
		SortKey::Opportunity => requests.sort_by(|a, b| {
			b.intelligence
				.opportunity_score
				.cmp(&a.intelligence.opportunity_score)
		}),
		SortKey::Closest => requests.sort_by(|a, b| match (a.distance_km, b.distance_km) {
			(Some(a), Some(b)) => a.total_cmp(&b),
			(Some(_), None) => Ordering::Less,
			(None, Some(_)) => Ordering::Greater,
			(None, None) => Ordering::Equal,
		}),
		// Store order already holds
		_ => {},
	}
}
