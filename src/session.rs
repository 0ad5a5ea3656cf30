//! Presentation state for a single-screen library view.
//!
//! A [`LibrarySession`] holds everything a renderer needs besides the store
//! itself: the search text, the add form, and which record (if any) is being
//! edited inline. Draft text lives here and reaches the store only through
//! [`LibrarySession::submit_add`] and [`LibrarySession::save_edit`].

use crate::{
    book::{BookDraft, BookRecord},
    core::store::{BookStore, StoreError},
    op::Op,
    types::BookId,
};

/// Shown when the search text filters out every book.
pub const NO_MATCHES_MESSAGE: &str = "No books match your search";
/// Shown when the library holds no books at all.
pub const EMPTY_LIBRARY_MESSAGE: &str = "No books in library yet";

/// Inline edit state for at most one record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditState {
    /// No record is being edited.
    #[default]
    NotEditing,
    /// `id` is open for editing with unsaved `draft` text.
    Editing {
        /// Record being edited.
        id: BookId,
        /// Unsaved title and author.
        draft: BookDraft,
    },
}

impl EditState {
    /// Id of the record being edited, if any.
    pub fn editing_id(&self) -> Option<BookId> {
        match self {
            EditState::NotEditing => None,
            EditState::Editing { id, .. } => Some(*id),
        }
    }
}

/// Store plus the transient UI state that drives it.
#[derive(Debug, Default)]
pub struct LibrarySession {
    store: BookStore,
    search: String,
    add_form: BookDraft,
    edit: EditState,
}

impl LibrarySession {
    /// Session over an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Session over an existing store.
    pub fn with_store(store: BookStore) -> Self {
        Self {
            store,
            ..Self::default()
        }
    }

    /// Read access to the underlying store.
    pub fn store(&self) -> &BookStore {
        &self.store
    }

    /// Consumes the session, returning its store.
    pub fn into_store(self) -> BookStore {
        self.store
    }

    /// Current search text.
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Replaces the search text.
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    /// Books matching the current search, in display order.
    pub fn visible_books(&self) -> Vec<&BookRecord> {
        self.store.query(&self.search)
    }

    /// Placeholder text for an empty list, or `None` when books are visible.
    pub fn empty_message(&self) -> Option<&'static str> {
        if !self.visible_books().is_empty() {
            return None;
        }
        if self.search.is_empty() {
            Some(EMPTY_LIBRARY_MESSAGE)
        } else {
            Some(NO_MATCHES_MESSAGE)
        }
    }

    /// Add form contents.
    pub fn add_form(&self) -> &BookDraft {
        &self.add_form
    }

    /// Mutable add form contents.
    pub fn add_form_mut(&mut self) -> &mut BookDraft {
        &mut self.add_form
    }

    /// Submits the add form. The form is cleared only when the book is added.
    pub fn submit_add(&mut self) -> Option<BookId> {
        let book = self.store.add(&self.add_form.title, &self.add_form.author)?;
        self.add_form.clear();
        Some(book.id)
    }

    /// Current edit state.
    pub fn edit_state(&self) -> &EditState {
        &self.edit
    }

    /// Opens `id` for editing with its current values, replacing any open edit.
    ///
    /// Returns false and leaves the edit state alone when `id` is unknown.
    pub fn begin_edit(&mut self, id: BookId) -> bool {
        let Some(rec) = self.store.get(id) else {
            return false;
        };
        self.edit = EditState::Editing {
            id,
            draft: BookDraft::from_record(rec),
        };
        true
    }

    /// Draft of the open edit, if any.
    pub fn edit_draft_mut(&mut self) -> Option<&mut BookDraft> {
        match &mut self.edit {
            EditState::NotEditing => None,
            EditState::Editing { draft, .. } => Some(draft),
        }
    }

    /// Commits the open edit.
    ///
    /// A blank draft keeps the edit open and changes nothing. A valid draft is
    /// written to the store and the edit closes. Returns true when the store
    /// was updated.
    pub fn save_edit(&mut self) -> bool {
        let EditState::Editing { id, draft } = &self.edit else {
            return false;
        };
        let id = *id;
        if !draft.is_valid() {
            return false;
        }
        let updated = self.store.update(id, &draft.title, &draft.author);
        self.edit = EditState::NotEditing;
        updated
    }

    /// Discards the open edit without touching the store.
    pub fn cancel_edit(&mut self) {
        self.edit = EditState::NotEditing;
    }

    /// Removes `id`, closing its edit if open.
    pub fn remove(&mut self, id: BookId) -> bool {
        if self.edit.editing_id() == Some(id) {
            self.edit = EditState::NotEditing;
        }
        self.store.remove(id)
    }

    /// Reverts the last store mutation.
    pub fn undo(&mut self) -> Result<Op, StoreError> {
        let op = self.store.undo()?;
        self.close_stale_edit();
        Ok(op)
    }

    /// Re-applies the last undone mutation.
    pub fn redo(&mut self) -> Result<Op, StoreError> {
        let op = self.store.redo()?;
        self.close_stale_edit();
        Ok(op)
    }

    fn close_stale_edit(&mut self) {
        if let Some(id) = self.edit.editing_id()
            && !self.store.contains(id)
        {
            self.edit = EditState::NotEditing;
        }
    }
}
