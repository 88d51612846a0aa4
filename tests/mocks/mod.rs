//! Centralized mocks and fixtures for testing
//!
//! Reusable entities, settings and seeded engines shared by the integration tests.

pub mod configs;
pub mod entities;

#[allow(unused_imports)]
pub use configs::MockConfigs;
#[allow(unused_imports)]
pub use entities::{MockEntities, TestConstants};
