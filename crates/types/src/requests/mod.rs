//! Service request domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::intelligence::{IntelligenceSource, MarketIntelligence, ResolvedIntelligence};
use crate::quotes::QuoteAggregation;

pub mod filters;
pub mod query;

pub use filters::{
	BudgetFilter, CompetitionFilter, DataFilters, IntelligenceFilters, LocationFilter,
	PriceGapFilter, ScoreRange,
};
pub use query::{
	PageCursor, RequestPage, RequestPredicate, RequestQuery, SortKey, SortValue, StoreOrder,
};

/// Mean Earth radius used for haversine distances
const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
	Emergency,
	Urgent,
	Standard,
	Flexible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
	Open,
	InProgress,
	Completed,
	Cancelled,
}

/// Customer's stated budget for the job
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Budget {
	pub min: f64,
	pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
	pub latitude: f64,
	pub longitude: f64,
}

impl GeoPoint {
	pub fn new(latitude: f64, longitude: f64) -> Self {
		Self {
			latitude,
			longitude,
		}
	}

	/// Great-circle distance in kilometres
	pub fn distance_km(&self, other: &GeoPoint) -> f64 {
		let lat1 = self.latitude.to_radians();
		let lat2 = other.latitude.to_radians();
		let d_lat = (other.latitude - self.latitude).to_radians();
		let d_lon = (other.longitude - self.longitude).to_radians();

		let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
		2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
	}
}

/// A job posted by a customer and open for provider quotes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
	pub request_id: String,
	pub customer_id: String,
	pub title: String,
	#[serde(default)]
	pub description: String,
	pub trades: Vec<String>,
	pub urgency: Urgency,
	pub budget: Option<Budget>,
	pub location: Option<GeoPoint>,
	pub status: RequestStatus,
	pub created_at: DateTime<Utc>,
}

impl ServiceRequest {
	/// Create a new open request
	pub fn new(customer_id: String, title: String, trades: Vec<String>, urgency: Urgency) -> Self {
		Self {
			request_id: Uuid::new_v4().to_string(),
			customer_id,
			title,
			description: String::new(),
			trades,
			urgency,
			budget: None,
			location: None,
			status: RequestStatus::Open,
			created_at: Utc::now(),
		}
	}

	pub fn with_id(mut self, request_id: impl Into<String>) -> Self {
		self.request_id = request_id.into();
		self
	}

	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = description.into();
		self
	}

	pub fn with_budget(mut self, min: f64, max: f64) -> Self {
		self.budget = Some(Budget { min, max });
		self
	}

	pub fn with_location(mut self, location: GeoPoint) -> Self {
		self.location = Some(location);
		self
	}

	pub fn with_status(mut self, status: RequestStatus) -> Self {
		self.status = status;
		self
	}

	pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
		self.created_at = created_at;
		self
	}

	pub fn is_open(&self) -> bool {
		self.status == RequestStatus::Open
	}
}

/// A request joined with its quote aggregation and market intelligence.
///
/// Built per fetch call and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedServiceRequest {
	#[serde(flatten)]
	pub request: ServiceRequest,
	pub quotes: QuoteAggregation,
	pub intelligence: MarketIntelligence,
	pub intelligence_source: IntelligenceSource,
	pub is_unlocked: bool,
	pub distance_km: Option<f64>,
}

impl EnrichedServiceRequest {
	pub fn new(request: ServiceRequest, resolved: ResolvedIntelligence) -> Self {
		Self {
			request,
			quotes: resolved.quotes,
			intelligence: resolved.intelligence,
			intelligence_source: resolved.source,
			is_unlocked: false,
			distance_km: None,
		}
	}

	pub fn with_unlocked(mut self, is_unlocked: bool) -> Self {
		self.is_unlocked = is_unlocked;
		self
	}

	pub fn with_distance_km(mut self, distance_km: Option<f64>) -> Self {
		self.distance_km = distance_km;
		self
	}

	pub fn request_id(&self) -> &str {
		&self.request.request_id
	}
}

/// Record of a provider paying to unlock a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockRecord {
	pub unlock_id: String,
	pub request_id: String,
	pub provider_id: String,
	pub unlocked_at: DateTime<Utc>,
}

impl UnlockRecord {
	pub fn new(request_id: String, provider_id: String) -> Self {
		Self {
			unlock_id: Uuid::new_v4().to_string(),
			request_id,
			provider_id,
			unlocked_at: Utc::now(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_distance_is_zero_for_same_point() {
		let point = GeoPoint::new(51.5074, -0.1278);
		assert!(point.distance_km(&point).abs() < 1e-9);
	}

	#[test]
	fn test_distance_london_to_paris() {
		let london = GeoPoint::new(51.5074, -0.1278);
		let paris = GeoPoint::new(48.8566, 2.3522);
		let distance = london.distance_km(&paris);
		assert!((distance - 343.5).abs() < 2.0, "got {distance}");
	}

	#[test]
	fn test_new_request_is_open() {
		let request = ServiceRequest::new(
			"customer-1".to_string(),
			"Fix leaking tap".to_string(),
			vec!["plumbing".to_string()],
			Urgency::Urgent,
		);
		assert!(request.is_open());
		assert!(request.budget.is_none());
	}
}
