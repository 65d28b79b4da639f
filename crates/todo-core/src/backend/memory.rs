//! In-Memory Backend
//!
//! Identity provider and document store that live in process memory.
//! Used by the test suite and by the UI when no Firebase project is
//! configured. Both support failure injection.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use async_trait::async_trait;
use tracing::debug;

use super::traits::{AuthListener, DocumentStore, FederatedCredential, IdentityProvider};
use crate::domain::{
    AuthError, AuthResult, Identity, Item, ItemId, ItemPatch, NewItem, StoreError, StoreResult, UserId,
};
use crate::listeners::{Listeners, Subscription};

/// Minimum password length accepted by `create_account`
pub const MIN_PASSWORD_LEN: usize = 6;

/// Consecutive wrong passwords before an account is rate limited
pub const MAX_FAILED_ATTEMPTS: u32 = 5;

#[derive(Debug, Clone)]
struct Account {
    id: UserId,
    password: String,
    display_name: Option<String>,
    failed_attempts: u32,
}

/// Identity provider backed by a local account table
pub struct MemoryIdentityProvider {
    accounts: RefCell<HashMap<String, Account>>,
    current: RefCell<Option<Identity>>,
    listeners: Listeners<Option<Identity>>,
    next_id: Cell<u64>,
    sign_out_failure: RefCell<Option<AuthError>>,
}

impl MemoryIdentityProvider {
    pub fn new() -> Self {
        Self {
            accounts: RefCell::new(HashMap::new()),
            current: RefCell::new(None),
            listeners: Listeners::new(),
            next_id: Cell::new(1),
            sign_out_failure: RefCell::new(None),
        }
    }

    /// Seed an account without signing it in
    pub fn with_account(self, email: &str, password: &str, display_name: Option<&str>) -> Self {
        let id = self.allocate_id();
        self.accounts.borrow_mut().insert(
            email.to_string(),
            Account {
                id,
                password: password.to_string(),
                display_name: display_name.map(str::to_string),
                failed_attempts: 0,
            },
        );
        self
    }

    /// Deliver the current state to listeners, as a provider does on startup
    pub fn emit_current(&self) {
        let current = self.current.borrow().clone();
        self.listeners.notify(&current);
    }

    /// Drop the session as if the provider had expired it
    pub fn expire_session(&self) {
        self.set_current(None);
    }

    /// Make the next `sign_out` fail with `error`
    pub fn fail_next_sign_out(&self, error: AuthError) {
        *self.sign_out_failure.borrow_mut() = Some(error);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn allocate_id(&self) -> UserId {
        let n = self.next_id.get();
        self.next_id.set(n + 1);
        UserId::new(format!("user-{n}"))
    }

    fn set_current(&self, identity: Option<Identity>) {
        *self.current.borrow_mut() = identity.clone();
        self.listeners.notify(&identity);
    }

    fn identity_for(email: &str, account: &Account) -> Identity {
        Identity {
            id: account.id.clone(),
            email: Some(email.to_string()),
            display_name: account.display_name.clone(),
        }
    }
}

impl Default for MemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}

#[async_trait(?Send)]
impl IdentityProvider for MemoryIdentityProvider {
    fn subscribe(&self, listener: AuthListener) -> Subscription {
        self.listeners.add(move |identity| listener(identity))
    }

    fn current_identity(&self) -> Option<Identity> {
        self.current.borrow().clone()
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> AuthResult<Identity> {
        if !looks_like_email(email) {
            return Err(AuthError::InvalidEmail);
        }
        let identity = {
            let mut accounts = self.accounts.borrow_mut();
            let account = accounts.get_mut(email).ok_or(AuthError::NotFound)?;
            if account.failed_attempts >= MAX_FAILED_ATTEMPTS {
                return Err(AuthError::RateLimited);
            }
            if account.password != password {
                account.failed_attempts += 1;
                return Err(AuthError::WrongPassword);
            }
            account.failed_attempts = 0;
            Self::identity_for(email, account)
        };
        debug!(user_id = %identity.id, "memory provider: password sign-in");
        self.set_current(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_in_with_federated(&self, credential: &FederatedCredential) -> AuthResult<Identity> {
        if credential.id_token.trim().is_empty() {
            return Err(AuthError::Unknown("missing federated id token".to_string()));
        }
        let identity = Identity::new(
            format!("{}:{}", credential.provider_id, credential.id_token),
            None,
            None,
        );
        debug!(user_id = %identity.id, "memory provider: federated sign-in");
        self.set_current(Some(identity.clone()));
        Ok(identity)
    }

    async fn create_account(&self, email: &str, password: &str) -> AuthResult<Identity> {
        if !looks_like_email(email) {
            return Err(AuthError::InvalidEmail);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }
        if self.accounts.borrow().contains_key(email) {
            return Err(AuthError::Unknown("EMAIL_EXISTS".to_string()));
        }
        let account = Account {
            id: self.allocate_id(),
            password: password.to_string(),
            display_name: None,
            failed_attempts: 0,
        };
        let identity = Self::identity_for(email, &account);
        self.accounts.borrow_mut().insert(email.to_string(), account);
        self.set_current(Some(identity.clone()));
        Ok(identity)
    }

    async fn update_display_name(&self, name: &str) -> AuthResult<Identity> {
        if name.trim().is_empty() {
            return Err(AuthError::InvalidDisplayName);
        }
        let mut current = self.current.borrow_mut();
        let identity = current
            .as_mut()
            .ok_or_else(|| AuthError::Unknown("no signed-in user".to_string()))?;
        identity.display_name = Some(name.to_string());
        if let Some(email) = &identity.email {
            if let Some(account) = self.accounts.borrow_mut().get_mut(email) {
                account.display_name = Some(name.to_string());
            }
        }
        Ok(identity.clone())
    }

    async fn sign_out(&self) -> AuthResult<()> {
        if let Some(error) = self.sign_out_failure.borrow_mut().take() {
            return Err(error);
        }
        self.set_current(None);
        Ok(())
    }
}

/// Document store keeping every collection in insertion order
pub struct MemoryStore {
    documents: RefCell<Vec<(String, Item)>>,
    next_id: Cell<u64>,
    failure: RefCell<Option<StoreError>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            documents: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
            failure: RefCell::new(None),
        }
    }

    /// Make the next store call fail with `error`
    pub fn fail_next(&self, error: StoreError) {
        *self.failure.borrow_mut() = Some(error);
    }

    /// Number of documents across all collections
    pub fn len(&self) -> usize {
        self.documents.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn take_failure(&self) -> StoreResult<()> {
        match self.failure.borrow_mut().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl DocumentStore for MemoryStore {
    async fn query_owned(&self, collection: &str, owner: &UserId) -> StoreResult<Vec<Item>> {
        self.take_failure()?;
        Ok(self
            .documents
            .borrow()
            .iter()
            .filter(|(c, item)| c == collection && &item.owner == owner)
            .map(|(_, item)| item.clone())
            .collect())
    }

    async fn insert(&self, collection: &str, item: &NewItem) -> StoreResult<ItemId> {
        self.take_failure()?;
        let n = self.next_id.get();
        self.next_id.set(n + 1);
        let id = format!("doc-{n}");
        self.documents
            .borrow_mut()
            .push((collection.to_string(), item.clone().into_item(id.clone())));
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, patch: &ItemPatch) -> StoreResult<()> {
        self.take_failure()?;
        let mut documents = self.documents.borrow_mut();
        let (_, item) = documents
            .iter_mut()
            .find(|(c, item)| c == collection && item.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        patch.apply(item);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        self.take_failure()?;
        let mut documents = self.documents.borrow_mut();
        let before = documents.len();
        documents.retain(|(c, item)| !(c == collection && item.id == id));
        if documents.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
