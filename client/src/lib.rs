//! Client for the task manager API: typed remote calls, a synchronized
//! state container, and selectors over that state.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod selectors;
pub mod store;
pub mod sync;

pub use api::{ApiClient, RemoteApi};
pub use config::ClientConfig;
pub use error::{ApiError, SyncError};
pub use models::{CatalogEntry, CatalogKind, Todo, TodoDraft, TodoPatch};
pub use store::{AppState, Collection, Outcome, Status};
pub use sync::SyncStore;
