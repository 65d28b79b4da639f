//! Backend Wiring
//!
//! Picks Firebase when the build carries a project config, otherwise the
//! in-memory backend, and persists the Firebase session in localStorage.

use std::rc::{Rc, Weak};

use leptos::prelude::window;
use leptos::task::spawn_local;
use serde::{Deserialize, Serialize};
use todo_core::backend::firebase::{FirebaseAuth, FirestoreStore};
use todo_core::backend::{MemoryIdentityProvider, MemoryStore};
use todo_core::{DocumentStore, FirebaseConfig, IdentityProvider, Subscription, TODOS_COLLECTION};
use tracing::{info, warn};

const SESSION_KEY: &str = "todo.session";

#[derive(Serialize, Deserialize)]
struct PersistedSession {
    refresh_token: String,
}

enum Source {
    Firebase(Rc<FirebaseAuth>),
    Memory(Rc<MemoryIdentityProvider>),
}

pub struct Backend {
    pub identity: Rc<dyn IdentityProvider>,
    pub store: Rc<dyn DocumentStore>,
    pub collection: String,
    source: Source,
}

impl Backend {
    pub fn connect() -> Self {
        match FirebaseConfig::from_build_env() {
            Ok(config) => {
                info!(project = %config.project_id, "using Firebase backend");
                let auth = Rc::new(FirebaseAuth::new(config.clone()));
                let collection = config.collection.clone();
                let store = Rc::new(FirestoreStore::new(config, auth.token_handle()));
                Self {
                    identity: auth.clone(),
                    store,
                    collection,
                    source: Source::Firebase(auth),
                }
            }
            Err(err) => {
                warn!(error = %err, "Firebase not configured, using in-memory backend");
                let provider = Rc::new(MemoryIdentityProvider::new());
                Self {
                    identity: provider.clone(),
                    store: Rc::new(MemoryStore::new()),
                    collection: TODOS_COLLECTION.to_string(),
                    source: Source::Memory(provider),
                }
            }
        }
    }

    /// Produce the first auth event; call after the session manager subscribed.
    ///
    /// For Firebase the returned subscription keeps the refresh token in
    /// localStorage in step with the session.
    pub fn start(&self) -> Option<Subscription> {
        match &self.source {
            Source::Firebase(auth) => {
                let weak: Weak<FirebaseAuth> = Rc::downgrade(auth);
                let persist = auth.subscribe(Box::new(move |_| {
                    if let Some(auth) = weak.upgrade() {
                        save_session(auth.refresh_token());
                    }
                }));
                let auth = Rc::clone(auth);
                spawn_local(async move {
                    let persisted = load_session();
                    auth.restore(persisted.as_deref()).await;
                });
                Some(persist)
            }
            Source::Memory(provider) => {
                provider.emit_current();
                None
            }
        }
    }
}

fn load_session() -> Option<String> {
    let storage = window().local_storage().ok().flatten()?;
    let raw = storage.get_item(SESSION_KEY).ok().flatten()?;
    match serde_json::from_str::<PersistedSession>(&raw) {
        Ok(session) => Some(session.refresh_token),
        Err(err) => {
            warn!(error = %err, "ignoring unreadable stored session");
            None
        }
    }
}

fn save_session(refresh_token: Option<String>) {
    let Some(storage) = window().local_storage().ok().flatten() else {
        return;
    };
    let written = match refresh_token {
        Some(refresh_token) => match serde_json::to_string(&PersistedSession { refresh_token }) {
            Ok(raw) => storage.set_item(SESSION_KEY, &raw),
            Err(err) => {
                warn!(error = %err, "could not encode session");
                return;
            }
        },
        None => storage.remove_item(SESSION_KEY),
    };
    if let Err(err) = written {
        warn!(?err, "could not persist session");
    }
}
