use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::api::{ApiClient, RemoteApi};
use crate::config::ClientConfig;
use crate::error::{SyncError, SyncResult};
use crate::models::{CatalogEntry, CatalogKind, Todo, TodoDraft, TodoPatch};
use crate::store::{Action, AppState, CatalogAction, Outcome, TodoAction};

/// Owns the client state and keeps it in step with the server.
///
/// Every operation commits its outcome to state before returning it, so
/// callers can both read [`SyncStore::state`] and report the result.
pub struct SyncStore<A> {
    api: Arc<A>,
    owner: Option<String>,
    state: Arc<RwLock<AppState>>,
}

impl<A> Clone for SyncStore<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            owner: self.owner.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

impl SyncStore<ApiClient> {
    pub fn from_config(config: &ClientConfig) -> Self {
        SyncStore::new(ApiClient::from_config(config), config.user_id.clone())
    }
}

impl<A: RemoteApi> SyncStore<A> {
    pub fn new(api: A, owner: Option<String>) -> Self {
        Self {
            api: Arc::new(api),
            owner,
            state: Arc::new(RwLock::new(AppState::default())),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Snapshot of the current state.
    pub async fn state(&self) -> AppState {
        self.state.read().await.clone()
    }

    async fn dispatch(&self, action: Action) -> Outcome {
        debug!("Dispatching {:?}", action);
        let outcome = self.state.write().await.apply(action);
        match outcome {
            Outcome::Applied => {}
            Outcome::Stale => debug!("Dropped stale resolution"),
            Outcome::Orphaned => debug!("Resolved record is not in local state"),
        }
        outcome
    }

    /// Issues a token and dispatches the pending action built from it in one step.
    async fn begin(&self, pending: impl FnOnce(u64) -> Action) -> u64 {
        let mut state = self.state.write().await;
        let token = state.issue_token();
        let action = pending(token);
        debug!("Dispatching {:?}", action);
        state.apply(action);
        token
    }

    pub async fn fetch_todos(&self) -> SyncResult<Vec<Todo>> {
        let token = self
            .begin(|token| Action::Todo(TodoAction::FetchPending { token }))
            .await;

        match self.api.get_todos().await {
            Ok(todos) => {
                self.dispatch(Action::Todo(TodoAction::FetchFulfilled {
                    token,
                    todos: todos.clone(),
                }))
                .await;
                Ok(todos)
            }
            Err(e) => {
                warn!("Fetching todos failed: {}", e);
                self.dispatch(Action::Todo(TodoAction::FetchRejected {
                    token,
                    error: e.to_string(),
                }))
                .await;
                Err(e.into())
            }
        }
    }

    pub async fn create_todo(&self, draft: TodoDraft) -> SyncResult<Todo> {
        if draft.title.trim().is_empty() {
            warn!("Rejected todo without a title");
            return Err(SyncError::Validation("Title is required".to_string()));
        }

        self.dispatch(Action::Todo(TodoAction::CreatePending)).await;
        match self.api.create_todo(&draft).await {
            Ok(todo) => {
                self.dispatch(Action::Todo(TodoAction::CreateFulfilled(todo.clone())))
                    .await;
                Ok(todo)
            }
            Err(e) => {
                warn!("Creating todo failed: {}", e);
                self.dispatch(Action::Todo(TodoAction::CreateRejected(e.to_string())))
                    .await;
                Err(e.into())
            }
        }
    }

    /// The local record is replaced by the server's copy, unless a newer
    /// update for the same id was issued in the meantime. Dropping the
    /// returned future early leaves its token registered until the next
    /// update or removal of `id`.
    pub async fn update_todo(&self, id: &str, patch: TodoPatch) -> SyncResult<Todo> {
        if patch.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            warn!("Rejected update of {} with a blank title", id);
            return Err(SyncError::Validation("Title is required".to_string()));
        }

        let token = self
            .begin(|token| {
                Action::Todo(TodoAction::UpdatePending {
                    id: id.to_string(),
                    token,
                })
            })
            .await;

        match self.api.update_todo(id, &patch).await {
            Ok(todo) => {
                self.dispatch(Action::Todo(TodoAction::UpdateFulfilled {
                    token,
                    todo: todo.clone(),
                }))
                .await;
                Ok(todo)
            }
            Err(e) => {
                warn!("Updating todo {} failed: {}", id, e);
                self.dispatch(Action::Todo(TodoAction::UpdateRejected {
                    id: id.to_string(),
                    token,
                    error: e.to_string(),
                }))
                .await;
                Err(e.into())
            }
        }
    }

    pub async fn toggle_complete(&self, id: &str, completed: bool) -> SyncResult<Todo> {
        self.update_todo(id, TodoPatch::completed(!completed)).await
    }

    pub async fn remove_todo(&self, id: &str) -> SyncResult<()> {
        self.dispatch(Action::Todo(TodoAction::RemovePending)).await;
        match self.api.delete_todo(id).await {
            Ok(()) => {
                self.dispatch(Action::Todo(TodoAction::RemoveFulfilled { id: id.to_string() }))
                    .await;
                Ok(())
            }
            Err(e) => {
                warn!("Deleting todo {} failed: {}", id, e);
                self.dispatch(Action::Todo(TodoAction::RemoveRejected(e.to_string())))
                    .await;
                Err(e.into())
            }
        }
    }

    pub async fn fetch_lists(&self) -> SyncResult<Vec<CatalogEntry>> {
        self.fetch_catalog(CatalogKind::List).await
    }

    pub async fn create_list(&self, name: &str) -> SyncResult<CatalogEntry> {
        self.create_catalog_entry(CatalogKind::List, name).await
    }

    /// Default lists must be filtered out by the caller; the server rejects them.
    pub async fn remove_list(&self, id: &str) -> SyncResult<()> {
        self.remove_catalog_entry(CatalogKind::List, id).await
    }

    pub async fn fetch_tags(&self) -> SyncResult<Vec<CatalogEntry>> {
        self.fetch_catalog(CatalogKind::Tag).await
    }

    pub async fn create_tag(&self, name: &str) -> SyncResult<CatalogEntry> {
        self.create_catalog_entry(CatalogKind::Tag, name).await
    }

    pub async fn remove_tag(&self, id: &str) -> SyncResult<()> {
        self.remove_catalog_entry(CatalogKind::Tag, id).await
    }

    async fn fetch_catalog(&self, kind: CatalogKind) -> SyncResult<Vec<CatalogEntry>> {
        let token = self
            .begin(|token| Action::Catalog(kind, CatalogAction::FetchPending { token }))
            .await;

        match self.api.get_catalog(kind, self.owner()).await {
            Ok(entries) => {
                self.dispatch(Action::Catalog(
                    kind,
                    CatalogAction::FetchFulfilled {
                        token,
                        entries: entries.clone(),
                    },
                ))
                .await;
                Ok(entries)
            }
            Err(e) => {
                warn!("Fetching {} failed: {}", kind.path(), e);
                self.dispatch(Action::Catalog(
                    kind,
                    CatalogAction::FetchRejected {
                        token,
                        error: e.to_string(),
                    },
                ))
                .await;
                Err(e.into())
            }
        }
    }

    async fn create_catalog_entry(&self, kind: CatalogKind, name: &str) -> SyncResult<CatalogEntry> {
        let name = title_case(name);
        if name.is_empty() {
            warn!("Rejected blank {} name", kind.path());
            return Err(SyncError::Validation("Name is required".to_string()));
        }

        self.dispatch(Action::Catalog(kind, CatalogAction::CreatePending))
            .await;
        match self.api.create_catalog_entry(kind, &name, self.owner()).await {
            Ok(entry) => {
                self.dispatch(Action::Catalog(
                    kind,
                    CatalogAction::CreateFulfilled(entry.clone()),
                ))
                .await;
                Ok(entry)
            }
            Err(e) => {
                warn!("Creating {} entry \"{}\" failed: {}", kind.path(), name, e);
                self.dispatch(Action::Catalog(kind, CatalogAction::CreateRejected(e.to_string())))
                    .await;
                Err(e.into())
            }
        }
    }

    async fn remove_catalog_entry(&self, kind: CatalogKind, id: &str) -> SyncResult<()> {
        self.dispatch(Action::Catalog(kind, CatalogAction::RemovePending))
            .await;
        match self.api.delete_catalog_entry(kind, id, self.owner()).await {
            Ok(()) => {
                self.dispatch(Action::Catalog(
                    kind,
                    CatalogAction::RemoveFulfilled { id: id.to_string() },
                ))
                .await;
                Ok(())
            }
            Err(e) => {
                warn!("Deleting {} entry {} failed: {}", kind.path(), id, e);
                self.dispatch(Action::Catalog(kind, CatalogAction::RemoveRejected(e.to_string())))
                    .await;
                Err(e.into())
            }
        }
    }
}

/// Trims, lower-cases, then upper-cases the first letter of each
/// space-separated word: `"  gROCERY list "` becomes `"Grocery List"`.
pub fn title_case(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
