//! In-memory authoritative book store.

/// Authoritative book store and undo/redo history.
pub mod store;
