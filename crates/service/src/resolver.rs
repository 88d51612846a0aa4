//! Intelligence resolution
//!
//! Attaches a quote aggregation and market intelligence to each request of a page, using
//! the precomputed cache, the live quote set, or the optimistic fallback depending on the
//! configured [`ResolutionStrategy`].

use crate::scorer::MarketIntelligenceScorer;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use futures::future::try_join_all;
use intel_types::constants::limits::MAX_IN_QUERY_VALUES;
use intel_types::{
	AggregationError, IntelligenceCacheTrait, PrecomputedIntelligence, QuoteStorageTrait,
	ResolutionStrategy, ResolvedIntelligence, ServiceRequest,
};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ResolverError {
	#[error("storage error: {0}")]
	Storage(String),
	#[error("aggregation error: {0}")]
	Aggregation(#[from] AggregationError),
}

/// Strategy seam for attaching intelligence to fetched requests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IntelligenceResolverTrait: Send + Sync {
	/// Resolve intelligence for every request; the map holds one entry per request id
	async fn resolve(
		&self,
		requests: &[ServiceRequest],
	) -> Result<HashMap<String, ResolvedIntelligence>, ResolverError>;
}

pub struct IntelligenceResolver {
	cache: Arc<dyn IntelligenceCacheTrait>,
	quotes: Arc<dyn QuoteStorageTrait>,
	scorer: Arc<MarketIntelligenceScorer>,
	strategy: ResolutionStrategy,
	batch_limit: usize,
	max_staleness: Option<Duration>,
}

impl IntelligenceResolver {
	pub fn new(
		cache: Arc<dyn IntelligenceCacheTrait>,
		quotes: Arc<dyn QuoteStorageTrait>,
		scorer: Arc<MarketIntelligenceScorer>,
	) -> Self {
		Self {
			cache,
			quotes,
			scorer,
			strategy: ResolutionStrategy::default(),
			batch_limit: MAX_IN_QUERY_VALUES,
			max_staleness: None,
		}
	}

	pub fn with_strategy(mut self, strategy: ResolutionStrategy) -> Self {
		self.strategy = strategy;
		self
	}

	/// Cap on ids per cache lookup; must match the store's "id in" limit
	pub fn with_batch_limit(mut self, batch_limit: usize) -> Self {
		self.batch_limit = batch_limit.max(1);
		self
	}

	/// Treat precomputed records older than `max_staleness` as missing
	pub fn with_max_staleness(mut self, max_staleness: Option<Duration>) -> Self {
		self.max_staleness = max_staleness;
		self
	}

	/// Look up precomputed records, one store query per `batch_limit` ids.
	///
	/// Any failing chunk fails the whole lookup so a page never carries partial
	/// enrichment.
	pub async fn fetch_precomputed(
		&self,
		request_ids: &[String],
	) -> Result<HashMap<String, PrecomputedIntelligence>, ResolverError> {
		let mut records = Vec::with_capacity(request_ids.len());

		for chunk in request_ids.chunks(self.batch_limit) {
			let found = self
				.cache
				.get_intelligence_by_ids(chunk)
				.await
				.map_err(|e| ResolverError::Storage(e.to_string()))?;
			records.extend(found);
		}

		debug!(
			"Precomputed lookup: {} of {} ids found in {} chunk(s)",
			records.len(),
			request_ids.len(),
			request_ids.len().div_ceil(self.batch_limit)
		);

		Ok(records
			.into_iter()
			.map(|record| (record.request_id.clone(), record))
			.collect())
	}

	/// Aggregate and score the live quotes of each request
	async fn compute(
		&self,
		request_ids: &[String],
	) -> Result<HashMap<String, ResolvedIntelligence>, ResolverError> {
		let loads = request_ids.iter().map(|id| {
			let quotes = Arc::clone(&self.quotes);
			async move {
				quotes
					.get_quotes_by_request(id)
					.await
					.map(|quotes| (id, quotes))
					.map_err(|e| ResolverError::Storage(e.to_string()))
			}
		});

		let mut resolved = HashMap::with_capacity(request_ids.len());
		for (id, quotes) in try_join_all(loads).await? {
			resolved.insert(id.clone(), self.scorer.score_quotes(id, &quotes)?);
		}
		Ok(resolved)
	}
}

#[async_trait]
impl IntelligenceResolverTrait for IntelligenceResolver {
	async fn resolve(
		&self,
		requests: &[ServiceRequest],
	) -> Result<HashMap<String, ResolvedIntelligence>, ResolverError> {
		let ids: Vec<String> = requests.iter().map(|r| r.request_id.clone()).collect();
		if ids.is_empty() {
			return Ok(HashMap::new());
		}

		let mut precomputed = match self.strategy {
			ResolutionStrategy::ComputedOnly => HashMap::new(),
			ResolutionStrategy::PrecomputedFirst | ResolutionStrategy::PrecomputedOnly => {
				self.fetch_precomputed(&ids).await?
			},
		};

		if self.strategy == ResolutionStrategy::PrecomputedFirst {
			if let Some(max_age) = self.max_staleness {
				let now = Utc::now();
				precomputed.retain(|_, record| !record.is_stale(now, max_age));
			}
		}

		let missing: Vec<String> = ids
			.iter()
			.filter(|id| !precomputed.contains_key(*id))
			.cloned()
			.collect();

		let mut computed = match self.strategy {
			ResolutionStrategy::PrecomputedOnly => HashMap::new(),
			ResolutionStrategy::PrecomputedFirst | ResolutionStrategy::ComputedOnly => {
				self.compute(&missing).await?
			},
		};

		info!(
			"Resolved intelligence for {} requests: {} precomputed, {} computed, {} fallback",
			ids.len(),
			precomputed.len(),
			computed.len(),
			missing.len() - computed.len()
		);

		Ok(ids
			.into_iter()
			.map(|id| {
				let resolved = match precomputed.remove(&id) {
					Some(record) => record.into(),
					None => computed
						.remove(&id)
						.unwrap_or_else(|| ResolvedIntelligence::fallback(&id)),
				};
				(id, resolved)
			})
			.collect())
	}
}
