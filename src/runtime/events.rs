//! Runtime event stream payloads.

use crate::types::{BookId, Revision};

/// Events emitted from the single-writer runtime loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryEvent {
    /// A new book was added.
    Added {
        /// Added book id.
        id: BookId,
    },
    /// An existing book was updated.
    Updated {
        /// Updated book id.
        id: BookId,
    },
    /// A book was removed.
    Removed {
        /// Removed book id.
        id: BookId,
    },
    /// One undo step was applied.
    UndoApplied {
        /// Store revision after the undo.
        revision: Revision,
    },
    /// One redo step was applied.
    RedoApplied {
        /// Store revision after the redo.
        revision: Revision,
    },
}
