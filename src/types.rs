//! Shared primitive IDs.

/// Monotonic book identifier.
pub type BookId = u64;
/// Count of mutations applied to a store.
pub type Revision = u64;
