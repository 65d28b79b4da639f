//! Identity Entity
//!
//! The authenticated user as reported by the identity provider.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Provider-assigned user id
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// The signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Provider-assigned id, used as the owner of every item the user creates
    pub id: UserId,
    pub email: Option<String>,
    /// Profile name; federated accounts may not have one
    pub display_name: Option<String>,
}

impl Identity {
    pub fn new(id: impl Into<String>, email: Option<String>, display_name: Option<String>) -> Self {
        Self {
            id: UserId::new(id),
            email,
            display_name,
        }
    }

    /// Name used to greet the user: display name, falling back to email
    pub fn greeting_name(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("there")
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_prefers_display_name() {
        let named = Identity::new("u1", Some("a@b.c".into()), Some("Ada".into()));
        assert_eq!(named.greeting_name(), "Ada");

        let unnamed = Identity::new("u2", Some("a@b.c".into()), None);
        assert_eq!(unnamed.greeting_name(), "a@b.c");

        let bare = Identity::new("u3", None, None);
        assert_eq!(bare.greeting_name(), "there");
    }
}
