//! Application Context
//!
//! Session and list state provided via Leptos Context API. Both wrap the
//! core controllers and mirror their changes into signals.

use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use todo_core::domain::StoreResult;
use todo_core::{ItemId, ListController, SessionManager, SessionState, TodoEntry, UserId};

fn report<T>(operation: &'static str, result: StoreResult<T>) {
    if let Err(err) = result {
        tracing::error!(operation, error = %err, "list operation failed");
    }
}

/// Current session, readable by any component
#[derive(Clone, Copy)]
pub struct SessionContext {
    manager: StoredValue<Rc<SessionManager>, LocalStorage>,
    /// Latest session state - read
    pub state: ReadSignal<SessionState>,
}

impl SessionContext {
    pub fn new(manager: Rc<SessionManager>) -> Self {
        let (state, set_state) = signal(manager.state());
        let watch = manager.watch(move |next| set_state.set(next.clone()));
        let watch = StoredValue::new_local(Some(watch));
        let manager = StoredValue::new_local(manager);

        on_cleanup(move || {
            watch.update_value(|w| {
                w.take();
            });
            manager.with_value(|m| m.teardown());
        });

        Self { manager, state }
    }

    pub fn manager(&self) -> Rc<SessionManager> {
        self.manager.get_value()
    }

    /// Name to greet the signed-in user with (tracked)
    pub fn greeting_name(&self) -> String {
        self.state.with(|s| {
            s.identity
                .as_ref()
                .map(|i| i.greeting_name().to_string())
                .unwrap_or_default()
        })
    }

    pub fn sign_out(&self) {
        let manager = self.manager();
        spawn_local(async move {
            if let Err(err) = manager.sign_out().await {
                tracing::warn!(error = %err, "sign-out failed");
            }
        });
    }
}

/// The signed-in user's to-do list
#[derive(Clone, Copy)]
pub struct ListContext {
    controller: StoredValue<Rc<ListController>, LocalStorage>,
    /// Items with their edit state - read
    pub entries: ReadSignal<Vec<TodoEntry>>,
}

impl ListContext {
    pub fn new(controller: Rc<ListController>) -> Self {
        let (entries, set_entries) = signal(controller.entries());
        let subscription = controller.subscribe(move |snapshot| set_entries.set(snapshot.entries.clone()));
        let subscription = StoredValue::new_local(Some(subscription));
        on_cleanup(move || {
            subscription.update_value(|s| {
                s.take();
            });
        });

        Self {
            controller: StoredValue::new_local(controller),
            entries,
        }
    }

    fn controller(&self) -> Rc<ListController> {
        self.controller.get_value()
    }

    /// Load the list for a new owner (or clear it on sign-out)
    pub fn follow_owner(&self, owner: Option<UserId>) {
        let controller = self.controller();
        spawn_local(async move { report("load", controller.set_owner(owner).await) });
    }

    /// Add an item; `on_added` runs only when an item was created
    pub fn add(&self, text: String, on_added: impl FnOnce() + 'static) {
        let controller = self.controller();
        spawn_local(async move {
            match controller.add(&text).await {
                Ok(Some(_)) => on_added(),
                Ok(None) => {}
                Err(err) => report::<()>("add", Err(err)),
            }
        });
    }

    pub fn delete(&self, id: ItemId) {
        let controller = self.controller();
        spawn_local(async move { report("delete", controller.delete(&id).await) });
    }

    pub fn toggle(&self, id: ItemId, completed: bool) {
        let controller = self.controller();
        spawn_local(async move { report("toggle", controller.toggle_complete(&id, completed).await) });
    }

    pub fn begin_edit(&self, id: &str) {
        self.controller.with_value(|c| c.begin_edit(id));
    }

    pub fn update_draft(&self, id: &str, text: &str) {
        self.controller.with_value(|c| c.update_draft(id, text));
    }

    pub fn cancel_edit(&self, id: &str) {
        self.controller.with_value(|c| c.cancel_edit(id));
    }

    pub fn save_edit(&self, id: ItemId) {
        let controller = self.controller();
        spawn_local(async move { report("edit", controller.save_edit(&id).await) });
    }
}
