//! Storage traits for pluggable storage implementations

// Re-export the storage traits from types crate
pub use intel_types::storage::{
	IntelligenceCacheTrait as IntelligenceCache, QuoteStorageTrait as QuoteStorage,
	RequestStorageTrait as RequestStorage, StorageError, StorageResult, StorageStats,
	StorageTrait as Storage, UnlockStorageTrait as UnlockStorage,
};
