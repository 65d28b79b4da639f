//! Session Manager
//!
//! Tracks who is signed in. Subscribes to the identity provider on `init`
//! and mirrors every auth event into `{identity, loading}`; components read
//! the state through this object instead of any global.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{info, warn};

use crate::backend::{FederatedCredential, IdentityProvider};
use crate::domain::{AuthResult, Identity};
use crate::listeners::{Listeners, Subscription};

/// Current identity and whether the provider has reported yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub identity: Option<Identity>,
    /// True until the provider's first auth event
    pub loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            identity: None,
            loading: true,
        }
    }
}

impl SessionState {
    pub fn signed_in(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
            loading: false,
        }
    }

    pub fn signed_out() -> Self {
        Self {
            identity: None,
            loading: false,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.identity.is_some()
    }
}

/// Shared state plus the observers watching it
#[derive(Clone)]
struct Shared {
    state: Rc<RefCell<SessionState>>,
    watchers: Listeners<SessionState>,
}

impl Shared {
    fn replace(&self, identity: Option<Identity>) {
        let snapshot = {
            let mut state = self.state.borrow_mut();
            state.identity = identity;
            state.loading = false;
            state.clone()
        };
        match &snapshot.identity {
            Some(identity) => info!(user_id = %identity.id, "session: signed in"),
            None => info!("session: signed out"),
        }
        self.watchers.notify(&snapshot);
    }
}

pub struct SessionManager {
    provider: Rc<dyn IdentityProvider>,
    shared: Shared,
    subscription: RefCell<Option<Subscription>>,
}

impl SessionManager {
    /// Subscribe to `provider` and start in the loading state
    pub fn init(provider: Rc<dyn IdentityProvider>) -> Self {
        let shared = Shared {
            state: Rc::new(RefCell::new(SessionState::default())),
            watchers: Listeners::new(),
        };
        let on_change = shared.clone();
        let subscription = provider.subscribe(Box::new(move |identity| on_change.replace(identity.clone())));
        Self {
            provider,
            shared,
            subscription: RefCell::new(Some(subscription)),
        }
    }

    /// Release the provider subscription; later auth events are ignored
    pub fn teardown(&self) {
        if let Some(subscription) = self.subscription.borrow_mut().take() {
            subscription.unsubscribe();
        }
    }

    pub fn is_active(&self) -> bool {
        self.subscription.borrow().is_some()
    }

    pub fn state(&self) -> SessionState {
        self.shared.state.borrow().clone()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.shared.state.borrow().identity.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.shared.state.borrow().loading
    }

    /// Observe every state change
    pub fn watch(&self, watcher: impl Fn(&SessionState) + 'static) -> Subscription {
        self.shared.watchers.add(watcher)
    }

    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> AuthResult<Identity> {
        self.provider.sign_in_with_password(email, password).await
    }

    pub async fn sign_in_with_federated(&self, credential: &FederatedCredential) -> AuthResult<Identity> {
        self.provider.sign_in_with_federated(credential).await
    }

    /// Create an account and give it a display name.
    ///
    /// The provider reports the new account before the name is set, so the
    /// named identity replaces the local state once the update lands.
    pub async fn register(&self, display_name: &str, email: &str, password: &str) -> AuthResult<Identity> {
        self.provider.create_account(email, password).await?;
        let named = self.provider.update_display_name(display_name).await?;
        self.shared.replace(Some(named.clone()));
        Ok(named)
    }

    /// Ask the provider to end the session.
    ///
    /// Local state is cleared only when the provider confirms; on failure the
    /// session is left as it was and the error is returned.
    pub async fn sign_out(&self) -> AuthResult<()> {
        match self.provider.sign_out().await {
            Ok(()) => {
                self.shared.replace(None);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "sign-out failed, keeping session");
                Err(err)
            }
        }
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryIdentityProvider;
    use crate::domain::AuthError;

    fn setup() -> (Rc<MemoryIdentityProvider>, SessionManager) {
        let provider = Rc::new(
            MemoryIdentityProvider::new().with_account("ada@example.com", "secret1", Some("Ada")),
        );
        let session = SessionManager::init(provider.clone());
        (provider, session)
    }

    #[tokio::test]
    async fn starts_loading_until_first_event() {
        let (provider, session) = setup();
        assert_eq!(session.state(), SessionState::default());

        provider.emit_current();
        assert_eq!(session.state(), SessionState::signed_out());
    }

    #[tokio::test]
    async fn sign_in_replaces_identity() {
        let (_provider, session) = setup();
        let identity = session
            .sign_in_with_password("ada@example.com", "secret1")
            .await
            .unwrap();
        assert_eq!(session.state(), SessionState::signed_in(identity));
    }

    #[tokio::test]
    async fn failed_sign_in_leaves_state() {
        let (provider, session) = setup();
        provider.emit_current();
        let err = session
            .sign_in_with_password("ada@example.com", "nope")
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::WrongPassword);
        assert_eq!(session.state(), SessionState::signed_out());
    }

    #[tokio::test]
    async fn federated_sign_in_replaces_identity() {
        let (provider, session) = setup();
        provider.emit_current();

        let identity = session
            .sign_in_with_federated(&FederatedCredential::google("google-token"))
            .await
            .unwrap();

        assert_eq!(identity.id.as_str(), "google.com:google-token");
        assert_eq!(session.state(), SessionState::signed_in(identity));
    }

    #[tokio::test]
    async fn federated_sign_in_without_token_leaves_state() {
        let (provider, session) = setup();
        provider.emit_current();

        let err = session
            .sign_in_with_federated(&FederatedCredential::google("  "))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::Unknown(_)));
        assert_eq!(session.state(), SessionState::signed_out());
    }

    #[tokio::test]
    async fn register_sets_display_name() {
        let (_provider, session) = setup();
        let identity = session
            .register("Bob", "bob@example.com", "secret1")
            .await
            .unwrap();
        assert_eq!(identity.display_name.as_deref(), Some("Bob"));
        assert_eq!(session.identity(), Some(identity));
    }

    #[tokio::test]
    async fn sign_out_clears_identity() {
        let (_provider, session) = setup();
        session.sign_in_with_password("ada@example.com", "secret1").await.unwrap();

        session.sign_out().await.unwrap();
        assert_eq!(session.state(), SessionState::signed_out());
    }

    #[tokio::test]
    async fn failed_sign_out_keeps_identity() {
        let (provider, session) = setup();
        let identity = session
            .sign_in_with_password("ada@example.com", "secret1")
            .await
            .unwrap();

        provider.fail_next_sign_out(AuthError::Unknown("offline".into()));
        assert!(session.sign_out().await.is_err());
        assert_eq!(session.identity(), Some(identity));
    }

    #[tokio::test]
    async fn session_expiry_is_observed() {
        let (provider, session) = setup();
        session.sign_in_with_password("ada@example.com", "secret1").await.unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_in_cb = Rc::clone(&seen);
        let _watch = session.watch(move |state| seen_in_cb.borrow_mut().push(state.clone()));

        provider.expire_session();
        assert_eq!(*seen.borrow(), vec![SessionState::signed_out()]);
    }

    #[tokio::test]
    async fn teardown_releases_subscription() {
        let (provider, session) = setup();
        assert_eq!(provider.listener_count(), 1);

        session.teardown();
        assert!(!session.is_active());
        assert_eq!(provider.listener_count(), 0);

        provider.sign_in_with_password("ada@example.com", "secret1").await.unwrap();
        assert!(session.is_loading());
        assert!(session.identity().is_none());
    }

    #[tokio::test]
    async fn drop_releases_subscription() {
        let (provider, session) = setup();
        drop(session);
        assert_eq!(provider.listener_count(), 0);
    }
}
