use std::collections::VecDeque;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::{
    book::{BookFields, BookRecord},
    op::Op,
    types::{BookId, Revision},
};

/// Failures surfaced by history and snapshot operations.
///
/// Add, update, remove, and query never return these; invalid input there is
/// a silent no-op.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Referenced book is not in the collection.
    #[error("book {0} not found")]
    MissingBook(BookId),
    /// A book with this id is already held.
    #[error("book {0} already exists")]
    DuplicateId(BookId),
    /// Title or author is blank or untrimmed.
    #[error("book {0} has invalid title or author")]
    InvalidFields(BookId),
    /// Undo stack is empty.
    #[error("nothing to undo")]
    NothingToUndo,
    /// Redo stack is empty.
    #[error("nothing to redo")]
    NothingToRedo,
    /// The id counter cannot advance past every held id.
    #[error("book id space exhausted")]
    IdSpaceExhausted,
}

/// Tunables for a [`BookStore`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Maximum undo depth; oldest entries are dropped first. Zero disables history.
    pub history_limit: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { history_limit: 100 }
    }
}

/// Serializable copy of a store's collection, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibrarySnapshot {
    /// Id the next added book will receive.
    pub next_book_id: BookId,
    /// Records in display order.
    pub books: Vec<BookRecord>,
}

/// Authoritative in-memory book collection.
///
/// Records are kept newest first. Ids come from a counter scoped to the
/// store and are never handed out twice.
#[derive(Debug)]
pub struct BookStore {
    records: HashMap<BookId, BookRecord>,
    order: Vec<BookId>,
    undo: VecDeque<Op>,
    redo: Vec<Op>,
    next_book_id: BookId,
    revision: Revision,
    config: StoreConfig,
}

impl Default for BookStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BookStore {
    /// Empty store with default configuration.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Empty store using `config`.
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            records: HashMap::new(),
            order: Vec::new(),
            undo: VecDeque::new(),
            redo: Vec::new(),
            next_book_id: 1,
            revision: 0,
            config,
        }
    }

    /// Rebuilds a store from `snapshot`, rejecting duplicate ids and invalid fields.
    pub fn from_snapshot(snapshot: LibrarySnapshot) -> Result<Self, StoreError> {
        Self::from_snapshot_with_config(snapshot, StoreConfig::default())
    }

    /// Like [`BookStore::from_snapshot`], using `config` for the restored store.
    ///
    /// Fails with [`StoreError::IdSpaceExhausted`] when no id greater than every
    /// held id (and below `BookId::MAX`) is left to hand out.
    pub fn from_snapshot_with_config(
        snapshot: LibrarySnapshot,
        config: StoreConfig,
    ) -> Result<Self, StoreError> {
        let mut store = Self::with_config(config);
        let mut next_book_id = snapshot.next_book_id.max(1);

        for book in snapshot.books {
            if store.records.contains_key(&book.id) {
                return Err(StoreError::DuplicateId(book.id));
            }
            if BookFields::normalize(&book.title, &book.author).as_ref() != Some(&book.fields()) {
                return Err(StoreError::InvalidFields(book.id));
            }
            let after = book.id.checked_add(1).ok_or(StoreError::IdSpaceExhausted)?;
            next_book_id = next_book_id.max(after);
            store.order.push(book.id);
            store.records.insert(book.id, book);
        }

        if next_book_id == BookId::MAX {
            return Err(StoreError::IdSpaceExhausted);
        }
        store.next_book_id = next_book_id;
        Ok(store)
    }

    /// Copies the collection in display order.
    pub fn export_snapshot(&self) -> LibrarySnapshot {
        LibrarySnapshot {
            next_book_id: self.next_book_id,
            books: self.books().cloned().collect(),
        }
    }

    /// Adds a book at the front of the collection.
    ///
    /// Returns `None` without mutating when either field is blank after trimming,
    /// or once every id below `BookId::MAX` has been issued.
    pub fn add(&mut self, title: &str, author: &str) -> Option<BookRecord> {
        let Some(fields) = BookFields::normalize(title, author) else {
            trace!("add rejected: blank field");
            return None;
        };

        let Some(id) = self.take_next_book_id() else {
            warn!("add rejected: book id space exhausted");
            return None;
        };
        let book = BookRecord {
            id,
            title: fields.title,
            author: fields.author,
        };

        // Counter ids are always above every held id, so the insert is fresh.
        self.insert_at(0, book.clone());
        self.record(Op::Remove {
            book: book.clone(),
            index: 0,
        });
        debug!(book_id = id, "book added");
        Some(book)
    }

    /// Removes the book with `id`. Unknown ids are ignored.
    ///
    /// Returns true when a record was removed.
    pub fn remove(&mut self, id: BookId) -> bool {
        let Some(book) = self.records.get(&id).cloned() else {
            trace!(book_id = id, "remove ignored: unknown id");
            return false;
        };

        let removed = self.commit(Op::Remove { book, index: 0 }).is_ok();
        if removed {
            debug!(book_id = id, "book removed");
        }
        removed
    }

    /// Replaces title and author of `id` in place.
    ///
    /// Unknown ids and blank fields leave the collection untouched. Returns
    /// true when the record was changed.
    pub fn update(&mut self, id: BookId, title: &str, author: &str) -> bool {
        let Some(prev) = self.records.get(&id).map(BookRecord::fields) else {
            trace!(book_id = id, "update ignored: unknown id");
            return false;
        };
        let Some(fields) = BookFields::normalize(title, author) else {
            trace!(book_id = id, "update rejected: blank field");
            return false;
        };

        let updated = self.commit(Op::Update { id, fields, prev }).is_ok();
        if updated {
            debug!(book_id = id, "book updated");
        }
        updated
    }

    /// Books whose title or author contains `needle`, ignoring case.
    ///
    /// An empty needle matches everything. Order follows the collection.
    pub fn query(&self, needle: &str) -> Vec<&BookRecord> {
        let needle = needle.to_lowercase();
        let hits: Vec<&BookRecord> = self.books().filter(|b| b.matches(&needle)).collect();
        trace!(needle = %needle, hits = hits.len(), "query");
        hits
    }

    /// Owned variant of [`BookStore::query`].
    pub fn query_cloned(&self, needle: &str) -> Vec<BookRecord> {
        self.query(needle).into_iter().cloned().collect()
    }

    /// Reverts the most recent mutation, returning the op that was applied.
    pub fn undo(&mut self) -> Result<Op, StoreError> {
        let op = self.undo.pop_back().ok_or(StoreError::NothingToUndo)?;
        let inverse = self.apply_op(op.clone())?;
        self.redo.push(inverse);
        self.revision += 1;
        debug!(book_id = op.book_id(), "undo applied");
        Ok(op)
    }

    /// Re-applies the most recently undone mutation.
    pub fn redo(&mut self) -> Result<Op, StoreError> {
        let op = self.redo.pop().ok_or(StoreError::NothingToRedo)?;
        let inverse = self.apply_op(op.clone())?;
        self.push_undo(inverse);
        self.revision += 1;
        debug!(book_id = op.book_id(), "redo applied");
        Ok(op)
    }

    /// Looks up a book by id.
    pub fn get(&self, id: BookId) -> Option<&BookRecord> {
        self.records.get(&id)
    }

    /// Owned variant of [`BookStore::get`].
    pub fn get_cloned(&self, id: BookId) -> Option<BookRecord> {
        self.get(id).cloned()
    }

    /// Returns true when `id` is held.
    pub fn contains(&self, id: BookId) -> bool {
        self.records.contains_key(&id)
    }

    /// Books in display order, newest first.
    pub fn books(&self) -> impl Iterator<Item = &BookRecord> {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    /// Ids in display order.
    pub fn ordered_ids(&self) -> &[BookId] {
        &self.order
    }

    /// Number of books held.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true when no books are held.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of mutations applied so far, undo and redo included.
    pub fn revision(&self) -> Revision {
        self.revision
    }

    /// Current undo depth.
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    /// Current redo depth.
    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    fn commit(&mut self, op: Op) -> Result<(), StoreError> {
        let inverse = self.apply_op(op)?;
        self.record(inverse);
        Ok(())
    }

    fn record(&mut self, inverse: Op) {
        self.redo.clear();
        self.push_undo(inverse);
        self.revision += 1;
    }

    fn insert_at(&mut self, index: usize, book: BookRecord) {
        let index = index.min(self.order.len());
        self.order.insert(index, book.id);
        self.records.insert(book.id, book);
    }

    /// Applies `op` and returns its inverse.
    fn apply_op(&mut self, op: Op) -> Result<Op, StoreError> {
        match op {
            Op::Add { book, index } => {
                if self.records.contains_key(&book.id) {
                    return Err(StoreError::DuplicateId(book.id));
                }
                let index = index.min(self.order.len());
                self.insert_at(index, book.clone());
                Ok(Op::Remove { book, index })
            }
            Op::Update { id, fields, .. } => {
                let rec = self.records.get_mut(&id).ok_or(StoreError::MissingBook(id))?;
                let prev = rec.fields();
                rec.set_fields(fields.clone());
                Ok(Op::Update {
                    id,
                    fields: prev,
                    prev: fields,
                })
            }
            Op::Remove { book, .. } => {
                let index = self
                    .order
                    .iter()
                    .position(|id| *id == book.id)
                    .ok_or(StoreError::MissingBook(book.id))?;
                self.order.remove(index);
                let book = self
                    .records
                    .remove(&book.id)
                    .ok_or(StoreError::MissingBook(book.id))?;
                Ok(Op::Add { book, index })
            }
        }
    }

    fn push_undo(&mut self, op: Op) {
        if self.config.history_limit == 0 {
            return;
        }
        while self.undo.len() >= self.config.history_limit {
            self.undo.pop_front();
        }
        self.undo.push_back(op);
    }

    /// Hands out the counter value; `BookId::MAX` itself is never issued.
    fn take_next_book_id(&mut self) -> Option<BookId> {
        let id = self.next_book_id;
        self.next_book_id = id.checked_add(1)?;
        Some(id)
    }
}
