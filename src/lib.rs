//! In-memory book library with newest-first ordering, substring search, and undo.
//!
//! # Examples
//!
//! Direct usage with [`core::store::BookStore`]:
//! ```
//! use booklib::core::store::BookStore;
//!
//! let mut store = BookStore::new();
//! let dune = store.add("Dune", "Frank Herbert").expect("add");
//! store.add("1984", "George Orwell").expect("add");
//!
//! assert_eq!(store.query("DUNE")[0].id, dune.id);
//! assert!(store.add("   ", "Nobody").is_none());
//! assert_eq!(store.len(), 2);
//! ```
//!
//! Runtime usage with the single-writer handle:
//! ```no_run
//! use booklib::{
//!     core::store::BookStore,
//!     runtime::handle::{spawn_library, RuntimeConfig},
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let handle = spawn_library(BookStore::new(), RuntimeConfig::default());
//! let book = handle.add("Dune", "Frank Herbert").await.expect("add");
//! assert!(book.is_some());
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```
#![deny(missing_docs)]

/// Book records, drafts, and the field validation predicate.
pub mod book;
/// Core in-memory store.
pub mod core;
/// Mutation op model.
pub mod op;
/// Single-writer runtime handle and events.
pub mod runtime;
/// Search, add-form, and inline-edit state for a library view.
pub mod session;
/// Shared primitive types.
pub mod types;
