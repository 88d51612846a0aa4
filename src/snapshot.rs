//! JSON store snapshots
//!
//! Seeds a store with requests, quotes and precomputed intelligence, e.g. for local runs
//! of the CLI.

use intel_types::{
	IntelligenceCacheTrait, PrecomputedIntelligence, Quote, QuoteStorageTrait, RequestStorageTrait,
	ServiceRequest, StorageError, StorageTrait,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum SnapshotError {
	#[error("failed to read snapshot {path}: {source}")]
	Io {
		path: String,
		#[source]
		source: std::io::Error,
	},
	#[error("failed to parse snapshot: {0}")]
	Parse(#[from] serde_json::Error),
	#[error("failed to load snapshot into storage: {0}")]
	Storage(#[from] StorageError),
}

/// Counts of what a snapshot load wrote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnapshotSummary {
	pub requests: usize,
	pub quotes: usize,
	pub precomputed: usize,
	pub rejected_quotes: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreSnapshot {
	pub requests: Vec<ServiceRequest>,
	pub quotes: Vec<Quote>,
	pub intelligence: Vec<PrecomputedIntelligence>,
}

impl StoreSnapshot {
	pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
		Ok(serde_json::from_str(json)?)
	}

	pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
		let path = path.as_ref();
		let json = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
			path: path.display().to_string(),
			source,
		})?;
		Self::from_json(&json)
	}

	/// Write the snapshot into `storage`.
	///
	/// Malformed quotes are skipped with a warning; any other storage failure aborts.
	pub async fn load_into(
		self,
		storage: &dyn StorageTrait,
	) -> Result<SnapshotSummary, SnapshotError> {
		let mut summary = SnapshotSummary::default();

		for request in self.requests {
			storage.create_request(request).await?;
			summary.requests += 1;
		}

		for quote in self.quotes {
			let quote_id = quote.quote_id.clone();
			match storage.add_quote(quote).await {
				Ok(()) => summary.quotes += 1,
				Err(StorageError::InvalidQuote(e)) => {
					warn!("Skipping quote {}: {}", quote_id, e);
					summary.rejected_quotes += 1;
				},
				Err(e) => return Err(e.into()),
			}
		}

		for record in self.intelligence {
			storage.upsert_intelligence(record).await?;
			summary.precomputed += 1;
		}

		info!(
			"Loaded snapshot: {} requests, {} quotes ({} rejected), {} precomputed records",
			summary.requests, summary.quotes, summary.rejected_quotes, summary.precomputed
		);
		Ok(summary)
	}
}
