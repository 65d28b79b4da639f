//! To-Do Core
//!
//! Platform-neutral state for the to-do app:
//! - domain: identities, items and errors
//! - backend: identity provider and document store traits and implementations
//! - session / list: the session manager and the list view controller
//! - forms / route: form messages and the route guard used by the UI

pub mod backend;
pub mod config;
pub mod domain;
pub mod forms;
pub mod list;
pub mod listeners;
pub mod route;
pub mod session;

#[cfg(test)]
mod tests;

pub use backend::{DocumentStore, FederatedCredential, IdentityProvider};
pub use config::{ConfigError, FirebaseConfig};
pub use domain::{AuthError, Identity, Item, ItemId, StoreError, UserId};
pub use list::{EditState, FailurePolicy, ListController, ListSnapshot, TodoEntry, TODOS_COLLECTION};
pub use listeners::Subscription;
pub use route::{can_render, route_guard, Route};
pub use session::{SessionManager, SessionState};
