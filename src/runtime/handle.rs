use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::info;

use crate::{
    book::BookRecord,
    core::store::{BookStore, LibrarySnapshot, StoreError},
    types::BookId,
};

use super::events::LibraryEvent;

/// Failures returned by [`LibraryHandle`] calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// The store rejected a history operation.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The runtime loop has stopped.
    #[error("library runtime is not running")]
    ChannelClosed,
}

/// Channel sizing for [`spawn_library`].
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Pending commands allowed before callers wait.
    pub command_queue_bound: usize,
    /// Events buffered per subscriber before it lags.
    pub event_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            command_queue_bound: 256,
            event_capacity: 1024,
        }
    }
}

/// Cloneable async front-end to a store owned by the runtime loop.
#[derive(Clone)]
pub struct LibraryHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<LibraryEvent>,
}

enum Command {
    Add {
        title: String,
        author: String,
        resp: oneshot::Sender<Option<BookRecord>>,
    },
    Update {
        id: BookId,
        title: String,
        author: String,
        resp: oneshot::Sender<bool>,
    },
    Remove {
        id: BookId,
        resp: oneshot::Sender<bool>,
    },
    Undo {
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
    Redo {
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
    Get {
        id: BookId,
        resp: oneshot::Sender<Option<BookRecord>>,
    },
    Query {
        needle: String,
        resp: oneshot::Sender<Vec<BookRecord>>,
    },
    Snapshot {
        resp: oneshot::Sender<LibrarySnapshot>,
    },
    Shutdown {
        resp: oneshot::Sender<()>,
    },
}

/// Spawns the single-writer loop owning `store` on the current tokio runtime.
pub fn spawn_library(store: BookStore, config: RuntimeConfig) -> LibraryHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.command_queue_bound.max(1));
    let (events_tx, _) = broadcast::channel::<LibraryEvent>(config.event_capacity.max(1));

    let events_tx_loop = events_tx.clone();

    tokio::spawn(async move {
        let mut store = store;
        info!(books = store.len(), "library runtime started");

        while let Some(cmd) = cmd_rx.recv().await {
            if handle_command(cmd, &mut store, &events_tx_loop) {
                break;
            }
        }

        info!(books = store.len(), "library runtime stopped");
    });

    LibraryHandle { cmd_tx, events_tx }
}

impl LibraryHandle {
    /// Subscribes to change events.
    pub fn subscribe(&self) -> broadcast::Receiver<LibraryEvent> {
        self.events_tx.subscribe()
    }

    /// Adds a book; `None` when either field is blank.
    pub async fn add(
        &self,
        title: impl Into<String>,
        author: impl Into<String>,
    ) -> Result<Option<BookRecord>, RuntimeError> {
        self.request(|resp| Command::Add {
            title: title.into(),
            author: author.into(),
            resp,
        })
        .await
    }

    /// Updates a book; false when the id is unknown or a field is blank.
    pub async fn update(
        &self,
        id: BookId,
        title: impl Into<String>,
        author: impl Into<String>,
    ) -> Result<bool, RuntimeError> {
        self.request(|resp| Command::Update {
            id,
            title: title.into(),
            author: author.into(),
            resp,
        })
        .await
    }

    /// Removes a book; false when the id is unknown.
    pub async fn remove(&self, id: BookId) -> Result<bool, RuntimeError> {
        self.request(|resp| Command::Remove { id, resp }).await
    }

    /// Reverts the last mutation.
    pub async fn undo(&self) -> Result<(), RuntimeError> {
        self.request(|resp| Command::Undo { resp }).await?
    }

    /// Re-applies the last undone mutation.
    pub async fn redo(&self) -> Result<(), RuntimeError> {
        self.request(|resp| Command::Redo { resp }).await?
    }

    /// Fetches one book by id.
    pub async fn get(&self, id: BookId) -> Result<Option<BookRecord>, RuntimeError> {
        self.request(|resp| Command::Get { id, resp }).await
    }

    /// Case-insensitive substring search over title and author.
    pub async fn query(&self, needle: impl Into<String>) -> Result<Vec<BookRecord>, RuntimeError> {
        self.request(|resp| Command::Query {
            needle: needle.into(),
            resp,
        })
        .await
    }

    /// Copies the whole collection.
    pub async fn snapshot(&self) -> Result<LibrarySnapshot, RuntimeError> {
        self.request(|resp| Command::Snapshot { resp }).await
    }

    /// Stops the runtime loop after draining earlier commands.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        self.request(|resp| Command::Shutdown { resp }).await
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(make(tx))
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }
}

fn handle_command(
    cmd: Command,
    store: &mut BookStore,
    events_tx: &broadcast::Sender<LibraryEvent>,
) -> bool {
    match cmd {
        Command::Add { title, author, resp } => {
            let added = store.add(&title, &author);
            if let Some(book) = &added {
                let _ = events_tx.send(LibraryEvent::Added { id: book.id });
            }
            let _ = resp.send(added);
        }
        Command::Update {
            id,
            title,
            author,
            resp,
        } => {
            let updated = store.update(id, &title, &author);
            if updated {
                let _ = events_tx.send(LibraryEvent::Updated { id });
            }
            let _ = resp.send(updated);
        }
        Command::Remove { id, resp } => {
            let removed = store.remove(id);
            if removed {
                let _ = events_tx.send(LibraryEvent::Removed { id });
            }
            let _ = resp.send(removed);
        }
        Command::Undo { resp } => {
            let res = store.undo().map(|_| {
                let _ = events_tx.send(LibraryEvent::UndoApplied {
                    revision: store.revision(),
                });
            });
            let _ = resp.send(res.map_err(RuntimeError::from));
        }
        Command::Redo { resp } => {
            let res = store.redo().map(|_| {
                let _ = events_tx.send(LibraryEvent::RedoApplied {
                    revision: store.revision(),
                });
            });
            let _ = resp.send(res.map_err(RuntimeError::from));
        }
        Command::Get { id, resp } => {
            let _ = resp.send(store.get_cloned(id));
        }
        Command::Query { needle, resp } => {
            let _ = resp.send(store.query_cloned(&needle));
        }
        Command::Snapshot { resp } => {
            let _ = resp.send(store.export_snapshot());
        }
        Command::Shutdown { resp } => {
            let _ = resp.send(());
            return true;
        }
    }

    false
}
