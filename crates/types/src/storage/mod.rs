//! Storage-related types and traits

pub mod errors;
pub mod traits;

pub use errors::*;
pub use traits::*;

pub type StorageResult<T> = Result<T, StorageError>;
