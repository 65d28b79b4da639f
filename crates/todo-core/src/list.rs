//! List View Controller
//!
//! Holds the signed-in user's items and mediates every read and mutation.
//! Each mutation is one store call followed by a full re-read of the owned
//! items. Reads are numbered; only the most recently issued read may replace
//! the list.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, error, info, warn};

use crate::backend::DocumentStore;
use crate::domain::{Item, ItemId, ItemPatch, NewItem, StoreError, StoreResult, UserId};
use crate::listeners::{Listeners, Subscription};

/// Collection holding the to-do documents
pub const TODOS_COLLECTION: &str = "todos";

/// What a caller sees when a store call fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Log the failure, leave the list as it was and report success
    #[default]
    Swallow,
    /// Return the error to the caller
    Propagate,
}

/// Per-item edit mode
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditState {
    #[default]
    Viewing,
    Editing { draft: String },
}

/// An item plus its local edit state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoEntry {
    pub item: Item,
    pub edit: EditState,
}

impl TodoEntry {
    pub fn is_editing(&self) -> bool {
        matches!(self.edit, EditState::Editing { .. })
    }

    pub fn draft(&self) -> Option<&str> {
        match &self.edit {
            EditState::Editing { draft } => Some(draft),
            EditState::Viewing => None,
        }
    }
}

/// Published to subscribers after every change
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListSnapshot {
    pub entries: Vec<TodoEntry>,
    /// Most recent store failure, cleared by the next successful read
    pub last_error: Option<StoreError>,
}

#[derive(Default)]
struct ListState {
    owner: Option<UserId>,
    entries: Vec<TodoEntry>,
    /// Sequence number of the latest read issued
    issued: u64,
    last_error: Option<StoreError>,
}

pub struct ListController {
    store: Rc<dyn DocumentStore>,
    collection: String,
    policy: FailurePolicy,
    state: RefCell<ListState>,
    listeners: Listeners<ListSnapshot>,
}

impl ListController {
    pub fn new(store: Rc<dyn DocumentStore>) -> Self {
        Self {
            store,
            collection: TODOS_COLLECTION.to_string(),
            policy: FailurePolicy::default(),
            state: RefCell::new(ListState::default()),
            listeners: Listeners::new(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn owner(&self) -> Option<UserId> {
        self.state.borrow().owner.clone()
    }

    pub fn entries(&self) -> Vec<TodoEntry> {
        self.state.borrow().entries.clone()
    }

    pub fn items(&self) -> Vec<Item> {
        self.state.borrow().entries.iter().map(|e| e.item.clone()).collect()
    }

    pub fn entry(&self, id: &str) -> Option<TodoEntry> {
        self.state.borrow().entries.iter().find(|e| e.item.id == id).cloned()
    }

    pub fn last_error(&self) -> Option<StoreError> {
        self.state.borrow().last_error.clone()
    }

    pub fn snapshot(&self) -> ListSnapshot {
        let state = self.state.borrow();
        ListSnapshot {
            entries: state.entries.clone(),
            last_error: state.last_error.clone(),
        }
    }

    pub fn subscribe(&self, listener: impl Fn(&ListSnapshot) + 'static) -> Subscription {
        self.listeners.add(listener)
    }

    fn notify(&self) {
        let snapshot = self.snapshot();
        self.listeners.notify(&snapshot);
    }

    // ========================
    // Reads
    // ========================

    /// Switch to another user's items (or none when signed out).
    ///
    /// Clears the list and invalidates reads still in flight for the
    /// previous owner before reading for the new one.
    pub async fn set_owner(&self, owner: Option<UserId>) -> StoreResult<()> {
        {
            let mut state = self.state.borrow_mut();
            if state.owner == owner && owner.is_some() {
                drop(state);
                return self.refresh().await;
            }
            state.owner = owner.clone();
            state.entries.clear();
            state.last_error = None;
            state.issued += 1;
        }
        debug!(owner = ?owner.as_ref().map(UserId::as_str), "list owner changed");
        self.notify();
        self.refresh().await
    }

    /// Re-read all items owned by the current user
    pub async fn refresh(&self) -> StoreResult<()> {
        let Some(owner) = self.owner() else {
            debug!("refresh skipped: no owner");
            return Ok(());
        };
        let sequence = {
            let mut state = self.state.borrow_mut();
            state.issued += 1;
            state.issued
        };
        let read = self.store.query_owned(&self.collection, &owner).await;
        match read {
            Ok(items) => {
                self.apply_read(sequence, &owner, items);
                Ok(())
            }
            Err(err) => {
                if !self.is_current(sequence, &owner) {
                    warn!(sequence, error = %err, "discarding failure of stale read");
                    return Ok(());
                }
                self.settle("refresh", Err(err)).map(|_: Option<()>| ())
            }
        }
    }

    /// Whether a read is still the latest issued for the current owner
    fn is_current(&self, sequence: u64, owner: &UserId) -> bool {
        let state = self.state.borrow();
        sequence == state.issued && state.owner.as_ref() == Some(owner)
    }

    fn apply_read(&self, sequence: u64, owner: &UserId, items: Vec<Item>) {
        if !self.is_current(sequence, owner) {
            warn!(sequence, "discarding stale read");
            return;
        }
        {
            let mut state = self.state.borrow_mut();
            let previous = std::mem::take(&mut state.entries);
            state.entries = items
                .into_iter()
                .map(|item| {
                    let edit = previous
                        .iter()
                        .find(|e| e.item.id == item.id)
                        .map(|e| e.edit.clone())
                        .unwrap_or_default();
                    TodoEntry { item, edit }
                })
                .collect();
            state.last_error = None;
            debug!(sequence, count = state.entries.len(), "list refreshed");
        }
        self.notify();
    }

    /// Apply the failure policy to a store result
    fn settle<T>(&self, operation: &'static str, result: StoreResult<T>) -> StoreResult<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                error!(operation, error = %err, "store call failed");
                self.state.borrow_mut().last_error = Some(err.clone());
                self.notify();
                match self.policy {
                    FailurePolicy::Swallow => Ok(None),
                    FailurePolicy::Propagate => Err(err),
                }
            }
        }
    }

    fn require_owner(&self, operation: &'static str) -> Option<UserId> {
        let owner = self.owner();
        if owner.is_none() {
            warn!(operation, "ignored: not signed in");
        }
        owner
    }

    // ========================
    // Mutations
    // ========================

    /// Create an item from `text`. Blank text is ignored.
    ///
    /// Returns the new id, or `None` when nothing was created.
    pub async fn add(&self, text: &str) -> StoreResult<Option<ItemId>> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        let Some(owner) = self.require_owner("add") else {
            return Ok(None);
        };
        let inserted = self.store.insert(&self.collection, &NewItem::new(owner, text)).await;
        let Some(id) = self.settle("add", inserted)? else {
            return Ok(None);
        };
        info!(item_id = %id, "item added");
        self.refresh().await?;
        Ok(Some(id))
    }

    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        if self.require_owner("delete").is_none() {
            return Ok(());
        }
        let removed = self.store.delete(&self.collection, id).await;
        if self.settle("delete", removed)?.is_none() {
            return Ok(());
        }
        info!(item_id = %id, "item deleted");
        self.refresh().await
    }

    pub async fn toggle_complete(&self, id: &str, completed: bool) -> StoreResult<()> {
        if self.require_owner("toggle").is_none() {
            return Ok(());
        }
        let updated = self
            .store
            .update(&self.collection, id, &ItemPatch::completed(completed))
            .await;
        if self.settle("toggle", updated)?.is_none() {
            return Ok(());
        }
        debug!(item_id = %id, completed, "item toggled");
        self.refresh().await
    }

    // ========================
    // Edit mode
    // ========================

    fn with_entry(&self, id: &str, f: impl FnOnce(&mut TodoEntry) -> bool) -> bool {
        let changed = {
            let mut state = self.state.borrow_mut();
            match state.entries.iter_mut().find(|e| e.item.id == id) {
                Some(entry) => f(entry),
                None => false,
            }
        };
        if changed {
            self.notify();
        }
        changed
    }

    /// Start editing an item, seeding the draft with its content.
    ///
    /// Other items keep their own edit state and drafts.
    pub fn begin_edit(&self, id: &str) -> bool {
        self.with_entry(id, |entry| {
            if entry.is_editing() {
                return false;
            }
            entry.edit = EditState::Editing {
                draft: entry.item.content.clone(),
            };
            true
        })
    }

    /// Replace the draft of an item being edited
    pub fn update_draft(&self, id: &str, text: &str) -> bool {
        self.with_entry(id, |entry| match &mut entry.edit {
            EditState::Editing { draft } => {
                *draft = text.to_string();
                true
            }
            EditState::Viewing => false,
        })
    }

    /// Leave edit mode without writing anything
    pub fn cancel_edit(&self, id: &str) -> bool {
        self.with_entry(id, |entry| {
            if !entry.is_editing() {
                return false;
            }
            entry.edit = EditState::Viewing;
            true
        })
    }

    /// Persist the draft and leave edit mode.
    ///
    /// A blank draft is not saved and the item stays in edit mode, as it does
    /// when the write fails. Returns whether the draft was written.
    pub async fn save_edit(&self, id: &str) -> StoreResult<bool> {
        let Some(draft) = self.entry(id).and_then(|e| e.draft().map(str::to_string)) else {
            return Ok(false);
        };
        if draft.trim().is_empty() {
            debug!(item_id = %id, "blank draft not saved");
            return Ok(false);
        }
        let updated = self
            .store
            .update(&self.collection, id, &ItemPatch::content(draft.clone()))
            .await;
        if self.settle("edit", updated)?.is_none() {
            return Ok(false);
        }
        self.with_entry(id, |entry| {
            entry.item.content = draft;
            entry.edit = EditState::Viewing;
            true
        });
        info!(item_id = %id, "item edited");
        self.refresh().await?;
        Ok(true)
    }
}
