//! Mutation operation model used for undo/redo.

use serde::{Deserialize, Serialize};

use crate::{
    book::{BookFields, BookRecord},
    types::BookId,
};

/// A store mutation, carrying enough state to be re-applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    /// Insert a fully materialized record at `index` in display order.
    Add {
        /// Inserted record.
        book: BookRecord,
        /// Position from the front of the collection.
        index: usize,
    },
    /// Replace a record's title and author.
    Update {
        /// Book id to mutate.
        id: BookId,
        /// New field values.
        fields: BookFields,
        /// Field values before the update.
        prev: BookFields,
    },
    /// Delete a record previously held at `index`.
    Remove {
        /// Removed record.
        book: BookRecord,
        /// Position the record occupied before removal.
        index: usize,
    },
}

impl Op {
    /// Book id this op touches.
    pub fn book_id(&self) -> BookId {
        match self {
            Op::Add { book, .. } | Op::Remove { book, .. } => book.id,
            Op::Update { id, .. } => *id,
        }
    }

    /// The op that undoes `self`.
    pub fn inverse(&self) -> Op {
        match self {
            Op::Add { book, index } => Op::Remove {
                book: book.clone(),
                index: *index,
            },
            Op::Update { id, fields, prev } => Op::Update {
                id: *id,
                fields: prev.clone(),
                prev: fields.clone(),
            },
            Op::Remove { book, index } => Op::Add {
                book: book.clone(),
                index: *index,
            },
        }
    }
}
