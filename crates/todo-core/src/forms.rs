//! Sign-in Forms
//!
//! Input state for the login and register forms and the field-level
//! messages shown for each auth failure.

use crate::domain::AuthError;

pub const MSG_UNKNOWN: &str = "An unknown error occurred. Please try again.";
pub const MSG_NOT_REGISTERED: &str = "This email address is not registered.";
pub const MSG_INVALID_EMAIL: &str = "Please enter a valid email address.";
pub const MSG_WRONG_PASSWORD: &str = "The password is incorrect.";
pub const MSG_RATE_LIMITED: &str = "Your account has been temporarily disabled due to too many failed login attempts. Please try again later after some time.";
pub const MSG_WEAK_PASSWORD: &str =
    "The password is too weak. Please choose a password that is at least 6 characters long.";
pub const MSG_INVALID_NAME: &str = "Please enter a valid user name.";

/// Per-field error messages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl FieldErrors {
    fn email(message: &str) -> Self {
        Self {
            email: Some(message.to_string()),
            ..Default::default()
        }
    }

    fn password(message: &str) -> Self {
        Self {
            password: Some(message.to_string()),
            ..Default::default()
        }
    }

    /// Messages for a failed email/password sign-in
    pub fn for_login(err: &AuthError) -> Self {
        match err {
            AuthError::NotFound => Self::email(MSG_NOT_REGISTERED),
            AuthError::InvalidEmail => Self::email(MSG_INVALID_EMAIL),
            AuthError::WrongPassword => Self::password(MSG_WRONG_PASSWORD),
            AuthError::RateLimited => Self::password(MSG_RATE_LIMITED),
            _ => Self::for_federated(err),
        }
    }

    /// Messages for a failed federated sign-in
    pub fn for_federated(_err: &AuthError) -> Self {
        Self {
            display_name: None,
            email: Some(MSG_UNKNOWN.to_string()),
            password: Some(MSG_UNKNOWN.to_string()),
        }
    }

    /// Typing in either login field clears both field messages
    pub fn clear_login(&mut self) {
        self.email = None;
        self.password = None;
    }

    /// Messages for a failed registration
    pub fn for_register(err: &AuthError) -> Self {
        match err {
            AuthError::InvalidEmail => Self::email(MSG_INVALID_EMAIL),
            AuthError::WeakPassword => Self::password(MSG_WEAK_PASSWORD),
            AuthError::InvalidDisplayName => Self {
                display_name: Some(MSG_INVALID_NAME.to_string()),
                ..Default::default()
            },
            _ => Self {
                display_name: Some(MSG_UNKNOWN.to_string()),
                email: Some(MSG_UNKNOWN.to_string()),
                password: Some(MSG_UNKNOWN.to_string()),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.email.is_none() && self.password.is_none()
    }

    /// Single line shown under the form
    pub fn summary(&self) -> Option<&str> {
        self.email
            .as_deref()
            .or(self.password.as_deref())
            .or(self.display_name.as_deref())
    }
}

/// Email/password sign-in input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn is_complete(&self) -> bool {
        !self.email.is_empty() && !self.password.is_empty()
    }
}

/// Account creation input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub display_name: String,
    pub email: String,
    pub password: String,
}

impl RegisterForm {
    pub fn is_complete(&self) -> bool {
        !self.display_name.is_empty() && !self.email.is_empty() && !self.password.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_messages_target_one_field() {
        let not_found = FieldErrors::for_login(&AuthError::NotFound);
        assert_eq!(not_found.email.as_deref(), Some(MSG_NOT_REGISTERED));
        assert_eq!(not_found.password, None);

        let wrong = FieldErrors::for_login(&AuthError::WrongPassword);
        assert_eq!(wrong.password.as_deref(), Some(MSG_WRONG_PASSWORD));
        assert_eq!(wrong.email, None);

        let limited = FieldErrors::for_login(&AuthError::RateLimited);
        assert_eq!(limited.password.as_deref(), Some(MSG_RATE_LIMITED));
    }

    #[test]
    fn unknown_login_error_marks_both_fields() {
        let errors = FieldErrors::for_login(&AuthError::Unknown("boom".into()));
        assert_eq!(errors.email.as_deref(), Some(MSG_UNKNOWN));
        assert_eq!(errors.password.as_deref(), Some(MSG_UNKNOWN));
        assert_eq!(errors.display_name, None);
    }

    #[test]
    fn federated_failure_marks_email_and_password() {
        let errors = FieldErrors::for_federated(&AuthError::Unknown("popup closed".into()));
        assert_eq!(errors.email.as_deref(), Some(MSG_UNKNOWN));
        assert_eq!(errors.password.as_deref(), Some(MSG_UNKNOWN));
        assert_eq!(errors.display_name, None);
    }

    #[test]
    fn login_input_clears_both_messages() {
        let mut errors = FieldErrors::for_login(&AuthError::Unknown("boom".into()));
        errors.clear_login();
        assert!(errors.is_empty());
        assert_eq!(errors.summary(), None);
    }

    #[test]
    fn register_messages() {
        assert_eq!(
            FieldErrors::for_register(&AuthError::WeakPassword).summary(),
            Some(MSG_WEAK_PASSWORD)
        );
        assert_eq!(
            FieldErrors::for_register(&AuthError::InvalidDisplayName).summary(),
            Some(MSG_INVALID_NAME)
        );
        let unknown = FieldErrors::for_register(&AuthError::NotFound);
        assert_eq!(unknown.display_name.as_deref(), Some(MSG_UNKNOWN));
        assert_eq!(unknown.email.as_deref(), Some(MSG_UNKNOWN));
    }

    #[test]
    fn incomplete_forms_are_not_submittable() {
        let mut login = LoginForm::default();
        login.email = "a@b.c".into();
        assert!(!login.is_complete());
        login.password = "x".into();
        assert!(login.is_complete());

        let register = RegisterForm {
            display_name: String::new(),
            email: "a@b.c".into(),
            password: "secret1".into(),
        };
        assert!(!register.is_complete());
    }
}
