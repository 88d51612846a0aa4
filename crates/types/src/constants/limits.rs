//! Global limits and defaults for the fetch pipeline and scoring

/// Maximum number of values accepted by a store "in" / "array-contains-any" predicate
pub const MAX_IN_QUERY_VALUES: usize = 30;

/// Default number of requests per page
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Maximum number of requests per page
pub const MAX_PAGE_SIZE: usize = 100;

/// Lower bound of the opportunity score
pub const MIN_OPPORTUNITY_SCORE: u32 = 20;

/// Upper bound of the opportunity score
pub const MAX_OPPORTUNITY_SCORE: u32 = 100;

/// Lower bound of the win probability
pub const MIN_WIN_PROBABILITY: f64 = 0.2;

/// Upper bound of the win probability
pub const MAX_WIN_PROBABILITY: f64 = 0.9;

/// Price spread above which a request counts as a large price gap (and earns a score bonus)
pub const LARGE_PRICE_GAP: f64 = 200.0;

/// Price spread at or above which a request counts as a medium price gap
pub const MEDIUM_PRICE_GAP: f64 = 100.0;
