//! Document-store query shapes for paginated request retrieval

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::{RequestStatus, ServiceRequest, Urgency};

/// Caller-facing sort options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
	/// Most recently posted first
	#[default]
	Newest,
	/// Highest budget ceiling first
	Budget,
	/// Highest opportunity score first (re-sorted after enrichment)
	Opportunity,
	/// Nearest first (re-sorted after enrichment)
	Closest,
}

impl SortKey {
	/// Ordering the store can apply natively for this key
	pub fn store_order(&self) -> StoreOrder {
		match self {
			Self::Budget => StoreOrder::BudgetMaxDesc,
			Self::Newest | Self::Opportunity | Self::Closest => StoreOrder::CreatedAtDesc,
		}
	}

	/// Whether the key depends on computed fields and needs an in-memory re-sort
	pub fn requires_resort(&self) -> bool {
		matches!(self, Self::Opportunity | Self::Closest)
	}
}

/// Orderings indexable by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreOrder {
	CreatedAtDesc,
	BudgetMaxDesc,
}

impl StoreOrder {
	/// Sort value of a document under this ordering; a missing budget sorts as zero
	pub fn sort_value(&self, request: &ServiceRequest) -> SortValue {
		match self {
			Self::CreatedAtDesc => SortValue::CreatedAt(request.created_at),
			Self::BudgetMaxDesc => {
				SortValue::BudgetMax(request.budget.map(|b| b.max).unwrap_or(0.0))
			},
		}
	}

	/// Total order over documents: sort value descending, then document id ascending
	pub fn compare(&self, a: &ServiceRequest, b: &ServiceRequest) -> Ordering {
		self.compare_keys(
			&self.sort_value(a),
			&a.request_id,
			&self.sort_value(b),
			&b.request_id,
		)
	}

	/// Same ordering expressed over raw keys, so a cursor can be compared to a document
	pub fn compare_keys(
		&self,
		value_a: &SortValue,
		id_a: &str,
		value_b: &SortValue,
		id_b: &str,
	) -> Ordering {
		value_b
			.partial_cmp(value_a)
			.unwrap_or(Ordering::Equal)
			.then_with(|| id_a.cmp(id_b))
	}
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum SortValue {
	CreatedAt(DateTime<Utc>),
	BudgetMax(f64),
}

/// Field predicates the store evaluates natively
#[derive(Debug, Clone, PartialEq)]
pub enum RequestPredicate {
	/// `status == value`
	StatusEquals(RequestStatus),
	/// `urgency in [values]`
	UrgencyIn(Vec<Urgency>),
	/// `trades array-contains-any [values]`
	TradesContainAny(Vec<String>),
}

impl RequestPredicate {
	pub fn matches(&self, request: &ServiceRequest) -> bool {
		match self {
			Self::StatusEquals(status) => request.status == *status,
			Self::UrgencyIn(values) => values.contains(&request.urgency),
			Self::TradesContainAny(values) => request.trades.iter().any(|t| values.contains(t)),
		}
	}

	/// Number of values carried by a multi-value predicate
	pub fn value_count(&self) -> usize {
		match self {
			Self::StatusEquals(_) => 1,
			Self::UrgencyIn(values) => values.len(),
			Self::TradesContainAny(values) => values.len(),
		}
	}
}

/// Opaque "start after" pointer to the last document of a page.
///
/// Produced by the store; callers hand it back unchanged to continue paginating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageCursor {
	pub document_id: String,
	pub order: StoreOrder,
	pub sort_value: SortValue,
}

impl PageCursor {
	pub fn for_document(request: &ServiceRequest, order: StoreOrder) -> Self {
		Self {
			document_id: request.request_id.clone(),
			order,
			sort_value: order.sort_value(request),
		}
	}
}

/// One page query against the request collection
#[derive(Debug, Clone, PartialEq)]
pub struct RequestQuery {
	pub predicates: Vec<RequestPredicate>,
	pub order: StoreOrder,
	pub limit: usize,
	pub start_after: Option<PageCursor>,
}

impl RequestQuery {
	pub fn new(order: StoreOrder, limit: usize) -> Self {
		Self {
			predicates: Vec::new(),
			order,
			limit,
			start_after: None,
		}
	}

	pub fn with_predicate(mut self, predicate: RequestPredicate) -> Self {
		self.predicates.push(predicate);
		self
	}

	pub fn with_start_after(mut self, cursor: Option<PageCursor>) -> Self {
		self.start_after = cursor;
		self
	}
}

/// Raw page returned by the store, before any enrichment or filtering
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestPage {
	pub documents: Vec<ServiceRequest>,
	/// Pointer to the last document of this page, if any
	pub last: Option<PageCursor>,
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::Duration;

	fn request(id: &str, minutes_ago: i64, budget_max: Option<f64>) -> ServiceRequest {
		let mut request = ServiceRequest::new(
			"customer".to_string(),
			id.to_string(),
			vec!["plumbing".to_string()],
			Urgency::Standard,
		)
		.with_id(id)
		.with_created_at(Utc::now() - Duration::minutes(minutes_ago));
		if let Some(max) = budget_max {
			request = request.with_budget(0.0, max);
		}
		request
	}

	#[test]
	fn test_created_at_desc_order() {
		let newer = request("b", 1, None);
		let older = request("a", 10, None);
		assert_eq!(
			StoreOrder::CreatedAtDesc.compare(&newer, &older),
			Ordering::Less
		);
	}

	#[test]
	fn test_budget_order_ties_break_on_id() {
		let a = request("a", 1, Some(500.0));
		let b = request("b", 2, Some(500.0));
		let none = request("c", 3, None);
		assert_eq!(StoreOrder::BudgetMaxDesc.compare(&a, &b), Ordering::Less);
		assert_eq!(StoreOrder::BudgetMaxDesc.compare(&b, &none), Ordering::Less);
	}

	#[test]
	fn test_sort_key_store_order() {
		assert_eq!(SortKey::Budget.store_order(), StoreOrder::BudgetMaxDesc);
		assert_eq!(SortKey::Closest.store_order(), StoreOrder::CreatedAtDesc);
		assert!(SortKey::Opportunity.requires_resort());
		assert!(!SortKey::Newest.requires_resort());
	}
}
