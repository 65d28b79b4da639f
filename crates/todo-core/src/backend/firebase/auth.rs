//! Firebase Authentication
//!
//! Identity Toolkit REST client. Keeps the signed-in session (identity plus
//! id/refresh tokens) and emits an auth event whenever it changes.

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::wire::{
    ErrorEnvelope, IdpRequest, LookupRequest, LookupResponse, PasswordRequest, RefreshResponse,
    SignInResponse, UpdateProfileRequest, UpdateProfileResponse,
};
use crate::backend::traits::{AuthListener, FederatedCredential, IdentityProvider};
use crate::config::FirebaseConfig;
use crate::domain::{AuthError, AuthResult, Identity, UserId};
use crate::listeners::{Listeners, Subscription};

/// Signed-in user and the tokens that authorize store requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub identity: Identity,
    pub id_token: String,
    pub refresh_token: String,
}

/// The current session shared by the auth client and the document store.
///
/// Either side may rotate the id token; clearing the session notifies the
/// auth listeners.
#[derive(Clone)]
pub struct TokenHandle {
    session: Rc<RefCell<Option<AuthSession>>>,
    listeners: Listeners<Option<Identity>>,
    http: Client,
    token_url: String,
}

impl TokenHandle {
    pub fn new(config: &FirebaseConfig) -> Self {
        Self {
            session: Rc::new(RefCell::new(None)),
            listeners: Listeners::new(),
            http: Client::new(),
            token_url: format!("{}/token?key={}", config.endpoints.secure_token, config.api_key),
        }
    }

    pub fn id_token(&self) -> Option<String> {
        self.session.borrow().as_ref().map(|s| s.id_token.clone())
    }

    /// Replace the session and emit an auth event
    pub(super) fn set_session(&self, session: Option<AuthSession>) {
        let identity = session.as_ref().map(|s| s.identity.clone());
        *self.session.borrow_mut() = session;
        self.listeners.notify(&identity);
    }

    /// Exchange a refresh token at the Secure Token endpoint
    async fn exchange(&self, refresh_token: &str) -> AuthResult<RefreshResponse> {
        let response = self
            .http
            .post(self.token_url.as_str())
            .form(&[("grant_type", "refresh_token"), ("refresh_token", refresh_token)])
            .send()
            .await
            .map_err(request_error)?;
        decode(response).await
    }

    /// Get a new id token for the signed-in user.
    ///
    /// The identity is unchanged, so no auth event is emitted. When the
    /// provider rejects the refresh token the session is cleared instead.
    pub async fn refresh(&self) -> AuthResult<String> {
        let current = self
            .session
            .borrow()
            .as_ref()
            .map(|s| (s.identity.id.clone(), s.refresh_token.clone()));
        let Some((user_id, refresh_token)) = current else {
            return Err(AuthError::Unknown("no signed-in user".to_string()));
        };

        let refreshed = match self.exchange(&refresh_token).await {
            Ok(refreshed) => refreshed,
            Err(err) => {
                if err.ends_session() && self.is_signed_in_as(&user_id) {
                    warn!(user_id = %user_id, error = %err, "refresh token rejected, signing out");
                    self.set_session(None);
                }
                return Err(err);
            }
        };

        let mut session = self.session.borrow_mut();
        let Some(current) = session.as_mut().filter(|s| s.identity.id == user_id) else {
            // Signed out or switched user while the exchange was in flight
            return Err(AuthError::Unknown("session changed during token refresh".to_string()));
        };
        current.id_token = refreshed.id_token.clone();
        current.refresh_token = refreshed.refresh_token;
        debug!(user_id = %user_id, "id token refreshed");
        Ok(refreshed.id_token)
    }

    fn is_signed_in_as(&self, user_id: &UserId) -> bool {
        self.session.borrow().as_ref().is_some_and(|s| &s.identity.id == user_id)
    }
}

/// Identity provider backed by Firebase Authentication
pub struct FirebaseAuth {
    http: Client,
    config: FirebaseConfig,
    tokens: TokenHandle,
}

fn request_error(err: reqwest::Error) -> AuthError {
    AuthError::Unknown(err.to_string())
}

async fn decode<R: DeserializeOwned>(response: reqwest::Response) -> AuthResult<R> {
    if response.status().is_success() {
        return response.json::<R>().await.map_err(request_error);
    }
    let status = response.status();
    match response.json::<ErrorEnvelope>().await {
        Ok(envelope) => Err(AuthError::from_provider_code(&envelope.error.message)),
        Err(_) => Err(AuthError::Unknown(format!("identity service returned {status}"))),
    }
}

impl FirebaseAuth {
    pub fn new(config: FirebaseConfig) -> Self {
        let tokens = TokenHandle::new(&config);
        Self {
            http: tokens.http.clone(),
            tokens,
            config,
        }
    }

    /// Handle for the document store to read and refresh the bearer token
    pub fn token_handle(&self) -> TokenHandle {
        self.tokens.clone()
    }

    /// Refresh token to persist between page loads
    pub fn refresh_token(&self) -> Option<String> {
        self.tokens.session.borrow().as_ref().map(|s| s.refresh_token.clone())
    }

    /// Rebuild the session from a persisted refresh token.
    ///
    /// Always emits exactly one auth event: the restored identity, or `None`
    /// when there is no token or it can no longer be exchanged.
    pub async fn restore(&self, refresh_token: Option<&str>) {
        let restored = match refresh_token {
            Some(token) => match self.exchange_refresh_token(token).await {
                Ok(session) => Some(session),
                Err(err) => {
                    warn!(error = %err, "could not restore session");
                    None
                }
            },
            None => None,
        };
        match restored {
            Some(session) => {
                info!(user_id = %session.identity.id, "session restored");
                self.set_session(Some(session));
            }
            None => self.set_session(None),
        }
    }

    async fn exchange_refresh_token(&self, refresh_token: &str) -> AuthResult<AuthSession> {
        let refreshed = self.tokens.exchange(refresh_token).await?;

        let lookup: LookupResponse = self
            .call("lookup", &LookupRequest { id_token: &refreshed.id_token })
            .await?;
        let identity = lookup
            .users
            .iter()
            .find(|u| u.local_id == refreshed.user_id)
            .map(|u| u.identity())
            .ok_or(AuthError::NotFound)?;

        Ok(AuthSession {
            identity,
            id_token: refreshed.id_token,
            refresh_token: refreshed.refresh_token,
        })
    }

    /// POST to `accounts:{method}`
    async fn call<B: Serialize, R: DeserializeOwned>(&self, method: &str, body: &B) -> AuthResult<R> {
        let url = format!(
            "{}/accounts:{}?key={}",
            self.config.endpoints.identity_toolkit, method, self.config.api_key
        );
        debug!(method, "identity toolkit request");
        let response = self.http.post(url).json(body).send().await.map_err(request_error)?;
        decode(response).await
    }

    fn signed_in(&self, response: SignInResponse) -> Identity {
        let identity = response.identity();
        self.set_session(Some(AuthSession {
            identity: identity.clone(),
            id_token: response.id_token,
            refresh_token: response.refresh_token,
        }));
        identity
    }

    fn set_session(&self, session: Option<AuthSession>) {
        self.tokens.set_session(session);
    }
}

#[async_trait(?Send)]
impl IdentityProvider for FirebaseAuth {
    fn subscribe(&self, listener: AuthListener) -> Subscription {
        self.tokens.listeners.add(move |identity| listener(identity))
    }

    fn current_identity(&self) -> Option<Identity> {
        self.tokens.session.borrow().as_ref().map(|s| s.identity.clone())
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> AuthResult<Identity> {
        let response: SignInResponse = self
            .call(
                "signInWithPassword",
                &PasswordRequest {
                    email,
                    password,
                    return_secure_token: true,
                },
            )
            .await?;
        Ok(self.signed_in(response))
    }

    async fn sign_in_with_federated(&self, credential: &FederatedCredential) -> AuthResult<Identity> {
        let post_body = format!(
            "id_token={}&providerId={}",
            credential.id_token, credential.provider_id
        );
        let response: SignInResponse = self
            .call(
                "signInWithIdp",
                &IdpRequest {
                    post_body,
                    request_uri: "http://localhost",
                    return_idp_credential: true,
                    return_secure_token: true,
                },
            )
            .await?;
        Ok(self.signed_in(response))
    }

    async fn create_account(&self, email: &str, password: &str) -> AuthResult<Identity> {
        let response: SignInResponse = self
            .call(
                "signUp",
                &PasswordRequest {
                    email,
                    password,
                    return_secure_token: true,
                },
            )
            .await?;
        Ok(self.signed_in(response))
    }

    async fn update_display_name(&self, name: &str) -> AuthResult<Identity> {
        let current = self.tokens.session.borrow().clone();
        let Some(current) = current else {
            return Err(AuthError::Unknown("no signed-in user".to_string()));
        };
        let response: UpdateProfileResponse = self
            .call(
                "update",
                &UpdateProfileRequest {
                    id_token: &current.id_token,
                    display_name: name,
                    return_secure_token: true,
                },
            )
            .await?;

        let identity = Identity::new(
            response.local_id,
            response.email.or(current.identity.email),
            response.display_name.or_else(|| Some(name.to_string())),
        );
        // Update silently: the name change is not an auth state change.
        *self.tokens.session.borrow_mut() = Some(AuthSession {
            identity: identity.clone(),
            id_token: response.id_token.unwrap_or(current.id_token),
            refresh_token: response.refresh_token.unwrap_or(current.refresh_token),
        });
        Ok(identity)
    }

    async fn sign_out(&self) -> AuthResult<()> {
        // Firebase has no server-side sign-out for REST clients; dropping the
        // tokens ends the session.
        self.set_session(None);
        Ok(())
    }
}
