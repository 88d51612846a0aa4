//! Domain entity mocks for testing

use market_intel::chrono::{Duration, Utc};
use market_intel::{
	GeoPoint, MarketIntelligence, PrecomputedIntelligence, Quote, QuoteAggregation,
	ServiceRequest, Urgency,
};

/// Common test locations and identifiers
pub struct TestConstants;

#[allow(dead_code)]
impl TestConstants {
	pub const PROVIDER_ID: &'static str = "provider-1";
	pub const CUSTOMER_ID: &'static str = "customer-1";
	/// Central London
	pub const CENTER: GeoPoint = GeoPoint {
		latitude: 51.5074,
		longitude: -0.1278,
	};
	/// Roughly 2 km east of the centre
	pub const NEARBY: GeoPoint = GeoPoint {
		latitude: 51.5155,
		longitude: -0.0922,
	};
	/// Roughly 80 km north-west of the centre
	pub const DISTANT: GeoPoint = GeoPoint {
		latitude: 51.752,
		longitude: -1.2577,
	};
}

/// Entity builders for tests
#[allow(dead_code)]
pub struct MockEntities;

#[allow(dead_code)]
impl MockEntities {
	/// Open plumbing request posted `minutes_ago`
	pub fn request(id: &str, minutes_ago: i64) -> ServiceRequest {
		ServiceRequest::new(
			TestConstants::CUSTOMER_ID.to_string(),
			format!("Job {}", id),
			vec!["plumbing".to_string()],
			Urgency::Standard,
		)
		.with_id(id)
		.with_description("Leaking pipe under the sink")
		.with_budget(200.0, 600.0)
		.with_created_at(Utc::now() - Duration::minutes(minutes_ago))
	}

	pub fn request_with(
		id: &str,
		minutes_ago: i64,
		trade: &str,
		urgency: Urgency,
		location: Option<GeoPoint>,
	) -> ServiceRequest {
		let mut request = Self::request(id, minutes_ago);
		request.trades = vec![trade.to_string()];
		request.urgency = urgency;
		request.location = location;
		request
	}

	/// Quote whose total is materials plus labor
	pub fn quote(
		request_id: &str,
		provider_id: &str,
		materials: f64,
		labor: f64,
		days: u32,
	) -> Quote {
		Quote::new(
			request_id.to_string(),
			provider_id.to_string(),
			materials,
			labor,
			days,
		)
	}

	/// The three reference quotes: totals 300/500/400, timelines 3/5/4 days
	pub fn reference_quotes(request_id: &str) -> Vec<Quote> {
		vec![
			Self::quote(request_id, "provider-a", 100.0, 200.0, 3),
			Self::quote(request_id, "provider-b", 200.0, 300.0, 5),
			Self::quote(request_id, "provider-c", 150.0, 250.0, 4),
		]
	}

	/// Precomputed record carrying a fixed opportunity score
	pub fn precomputed(request_id: &str, opportunity_score: u32) -> PrecomputedIntelligence {
		let mut intelligence = MarketIntelligence::fallback(request_id);
		intelligence.opportunity_score = opportunity_score;
		PrecomputedIntelligence::new(QuoteAggregation::empty(request_id), intelligence)
	}
}
