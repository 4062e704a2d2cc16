//! Client-side state and the reducer that mutates it.
//!
//! All changes go through [`AppState::apply`]. Pending actions carry a
//! request token; resolutions whose token is no longer the latest issued
//! for their target are dropped instead of applied. Every applied change is
//! stamped with a fresh token too, so a fetch that was issued before the
//! change cannot undo it when it resolves later.

use std::collections::HashMap;

use crate::models::{CatalogEntry, CatalogKind, Todo};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Loading,
    Ready,
    Error,
}

/// What the reducer did with an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// A newer request for the same target was issued; the resolution was dropped.
    Stale,
    /// The resolved record is not in local state, so there was nothing to replace.
    Orphaned,
}

pub trait Identified {
    fn id(&self) -> &str;
}

impl Identified for Todo {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for CatalogEntry {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone)]
pub struct Collection<T> {
    pub items: Vec<T>,
    pub loading: bool,
    /// Set once a fetch has succeeded
    pub loaded: bool,
    pub error: Option<String>,
    fetch_token: u64,
    /// Token of the last local change per id, kept until a fetch issued after it lands
    touched: HashMap<String, u64>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            loaded: false,
            error: None,
            fetch_token: 0,
            touched: HashMap::new(),
        }
    }
}

impl<T: Identified + Clone> Collection<T> {
    pub fn status(&self) -> Status {
        if self.loading {
            Status::Loading
        } else if self.error.is_some() {
            Status::Error
        } else if self.loaded {
            Status::Ready
        } else {
            Status::Idle
        }
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    fn touch(&mut self, id: &str, at: u64) {
        self.touched.insert(id.to_string(), at);
    }

    fn fetch_pending(&mut self, token: u64) {
        self.fetch_token = token;
        self.loading = true;
        self.error = None;
    }

    /// Replaces the collection with `snapshot`, except for records changed
    /// locally after the fetch was issued: those keep their local version,
    /// removed ones stay removed and newly created ones are kept (in front
    /// when `new_first`).
    fn fetch_fulfilled(&mut self, token: u64, snapshot: Vec<T>, new_first: bool) -> Outcome {
        if token != self.fetch_token {
            return Outcome::Stale;
        }

        let touched = &self.touched;
        let changed_since = |id: &str| touched.get(id).is_some_and(|at| *at > token);

        let mut merged: Vec<T> = Vec::with_capacity(snapshot.len());
        for item in snapshot {
            if !changed_since(item.id()) {
                merged.push(item);
            } else if let Some(local) = self.items.iter().find(|i| i.id() == item.id()) {
                merged.push(local.clone());
            }
        }

        let created: Vec<T> = self
            .items
            .iter()
            .filter(|i| changed_since(i.id()) && !merged.iter().any(|m| m.id() == i.id()))
            .cloned()
            .collect();
        if new_first {
            merged = created.into_iter().chain(merged).collect();
        } else {
            merged.extend(created);
        }

        self.touched.retain(|_, at| *at > token);
        self.items = merged;
        self.loading = false;
        self.loaded = true;
        self.error = None;
        Outcome::Applied
    }

    fn fetch_rejected(&mut self, token: u64, error: String) -> Outcome {
        if token != self.fetch_token {
            return Outcome::Stale;
        }
        self.loading = false;
        self.error = Some(error);
        Outcome::Applied
    }

    /// A record already present (e.g. delivered by a concurrent fetch) is
    /// replaced in place rather than duplicated.
    fn insert(&mut self, item: T, at_front: bool, at: u64) {
        self.touch(item.id(), at);
        if let Some(slot) = self.items.iter_mut().find(|i| i.id() == item.id()) {
            *slot = item;
        } else if at_front {
            self.items.insert(0, item);
        } else {
            self.items.push(item);
        }
    }

    fn replace(&mut self, item: T, at: u64) -> Outcome {
        match self.items.iter().position(|i| i.id() == item.id()) {
            Some(index) => {
                self.touch(item.id(), at);
                self.items[index] = item;
                Outcome::Applied
            }
            None => Outcome::Orphaned,
        }
    }

    fn remove(&mut self, id: &str, at: u64) {
        self.touch(id, at);
        self.items.retain(|item| item.id() != id);
    }
}

#[derive(Debug, Clone)]
pub enum TodoAction {
    FetchPending { token: u64 },
    FetchFulfilled { token: u64, todos: Vec<Todo> },
    FetchRejected { token: u64, error: String },
    CreatePending,
    CreateFulfilled(Todo),
    CreateRejected(String),
    UpdatePending { id: String, token: u64 },
    UpdateFulfilled { token: u64, todo: Todo },
    UpdateRejected { id: String, token: u64, error: String },
    RemovePending,
    RemoveFulfilled { id: String },
    RemoveRejected(String),
}

#[derive(Debug, Clone)]
pub enum CatalogAction {
    FetchPending { token: u64 },
    FetchFulfilled { token: u64, entries: Vec<CatalogEntry> },
    FetchRejected { token: u64, error: String },
    CreatePending,
    CreateFulfilled(CatalogEntry),
    CreateRejected(String),
    RemovePending,
    RemoveFulfilled { id: String },
    RemoveRejected(String),
}

#[derive(Debug, Clone)]
pub enum Action {
    Todo(TodoAction),
    Catalog(CatalogKind, CatalogAction),
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub todos: Collection<Todo>,
    pub lists: Collection<CatalogEntry>,
    pub tags: Collection<CatalogEntry>,
    /// Latest update token issued per todo id. An update future dropped
    /// before it resolves leaves its entry here until the next update or
    /// removal of that id.
    update_tokens: HashMap<String, u64>,
    last_token: u64,
}

impl AppState {
    pub fn catalog(&self, kind: CatalogKind) -> &Collection<CatalogEntry> {
        match kind {
            CatalogKind::List => &self.lists,
            CatalogKind::Tag => &self.tags,
        }
    }

    fn catalog_mut(&mut self, kind: CatalogKind) -> &mut Collection<CatalogEntry> {
        match kind {
            CatalogKind::List => &mut self.lists,
            CatalogKind::Tag => &mut self.tags,
        }
    }

    /// Hands out the next request token. Tokens increase monotonically.
    pub fn issue_token(&mut self) -> u64 {
        self.last_token += 1;
        self.last_token
    }

    pub fn apply(&mut self, action: Action) -> Outcome {
        match action {
            Action::Todo(action) => self.apply_todo(action),
            Action::Catalog(kind, action) => self.apply_catalog(kind, action),
        }
    }

    fn apply_todo(&mut self, action: TodoAction) -> Outcome {
        let at = self.issue_token();
        let todos = &mut self.todos;
        match action {
            TodoAction::FetchPending { token } => todos.fetch_pending(token),
            TodoAction::FetchFulfilled { token, todos: items } => {
                return todos.fetch_fulfilled(token, items, true)
            }
            TodoAction::FetchRejected { token, error } => return todos.fetch_rejected(token, error),
            TodoAction::CreatePending | TodoAction::RemovePending => todos.error = None,
            TodoAction::CreateFulfilled(todo) => todos.insert(todo, true, at),
            TodoAction::CreateRejected(error) | TodoAction::RemoveRejected(error) => {
                todos.error = Some(error)
            }
            TodoAction::UpdatePending { id, token } => {
                self.update_tokens.insert(id, token);
                todos.error = None;
            }
            TodoAction::UpdateFulfilled { token, todo } => {
                if self.update_tokens.get(&todo.id) != Some(&token) {
                    return Outcome::Stale;
                }
                self.update_tokens.remove(&todo.id);
                return todos.replace(todo, at);
            }
            TodoAction::UpdateRejected { id, token, error } => {
                if self.update_tokens.get(&id) != Some(&token) {
                    return Outcome::Stale;
                }
                self.update_tokens.remove(&id);
                todos.error = Some(error);
            }
            TodoAction::RemoveFulfilled { id } => {
                todos.remove(&id, at);
                self.update_tokens.remove(&id);
            }
        }
        Outcome::Applied
    }

    fn apply_catalog(&mut self, kind: CatalogKind, action: CatalogAction) -> Outcome {
        let at = self.issue_token();
        let entries = self.catalog_mut(kind);
        match action {
            CatalogAction::FetchPending { token } => entries.fetch_pending(token),
            CatalogAction::FetchFulfilled { token, entries: items } => {
                return entries.fetch_fulfilled(token, items, false)
            }
            CatalogAction::FetchRejected { token, error } => {
                return entries.fetch_rejected(token, error)
            }
            CatalogAction::CreatePending | CatalogAction::RemovePending => entries.error = None,
            CatalogAction::CreateFulfilled(entry) => entries.insert(entry, false, at),
            CatalogAction::CreateRejected(error) | CatalogAction::RemoveRejected(error) => {
                entries.error = Some(error)
            }
            CatalogAction::RemoveFulfilled { id } => {
                entries.remove(&id, at);
                self.detach(kind, &id, at);
            }
        }
        Outcome::Applied
    }

    /// Mirrors the server's cascade: a deleted list is cleared from its
    /// todos, a deleted tag is removed from every todo.
    fn detach(&mut self, kind: CatalogKind, id: &str, at: u64) {
        let mut changed = Vec::new();
        for todo in self.todos.items.iter_mut() {
            let before = (todo.list.is_some(), todo.tags.len());
            match kind {
                CatalogKind::List => {
                    if todo.list.as_deref() == Some(id) {
                        todo.list = None;
                    }
                }
                CatalogKind::Tag => todo.tags.retain(|tag| tag != id),
            }
            if before != (todo.list.is_some(), todo.tags.len()) {
                changed.push(todo.id.clone());
            }
        }
        for todo_id in changed {
            self.todos.touch(&todo_id, at);
        }
    }
}
