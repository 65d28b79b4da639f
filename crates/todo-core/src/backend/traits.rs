//! Backend Layer - Core Traits
//!
//! The app never talks to a backend directly; the session manager and the
//! list controller go through these traits. All futures are `!Send`: the
//! app runs on the browser's single-threaded event loop.

use async_trait::async_trait;

use crate::domain::{AuthResult, Identity, Item, ItemId, ItemPatch, NewItem, StoreResult, UserId};
use crate::listeners::Subscription;

/// Callback invoked with the new identity (or `None`) on every auth change
pub type AuthListener = Box<dyn Fn(&Option<Identity>)>;

/// Token issued by a federated identity provider (e.g. a Google ID token)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FederatedCredential {
    /// Provider id as understood by the identity service, e.g. `google.com`
    pub provider_id: String,
    pub id_token: String,
}

impl FederatedCredential {
    pub fn google(id_token: impl Into<String>) -> Self {
        Self {
            provider_id: "google.com".to_string(),
            id_token: id_token.into(),
        }
    }
}

/// Identity verification service
#[async_trait(?Send)]
pub trait IdentityProvider {
    /// Register for auth state changes.
    ///
    /// Every sign-in, sign-out and session expiry produces exactly one event.
    fn subscribe(&self, listener: AuthListener) -> Subscription;

    /// Identity of the currently signed-in user, if any
    fn current_identity(&self) -> Option<Identity>;

    async fn sign_in_with_password(&self, email: &str, password: &str) -> AuthResult<Identity>;

    async fn sign_in_with_federated(&self, credential: &FederatedCredential) -> AuthResult<Identity>;

    /// Create an account and sign it in
    async fn create_account(&self, email: &str, password: &str) -> AuthResult<Identity>;

    /// Set the signed-in user's display name.
    ///
    /// Does not emit an auth event; callers that need the new name must use
    /// the returned identity.
    async fn update_display_name(&self, name: &str) -> AuthResult<Identity>;

    async fn sign_out(&self) -> AuthResult<()>;
}

/// Remote document database holding the to-do items
#[async_trait(?Send)]
pub trait DocumentStore {
    /// All items in `collection` whose owner equals `owner`, in store order
    async fn query_owned(&self, collection: &str, owner: &UserId) -> StoreResult<Vec<Item>>;

    /// Insert a document and return its generated id
    async fn insert(&self, collection: &str, item: &NewItem) -> StoreResult<ItemId>;

    /// Write the fields set in `patch`; the document must exist
    async fn update(&self, collection: &str, id: &str, patch: &ItemPatch) -> StoreResult<()>;

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()>;
}
