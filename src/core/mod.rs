//! In-memory storage.

/// Hash-map backed repository.
pub mod store;
