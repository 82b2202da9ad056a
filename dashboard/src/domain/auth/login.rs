//! Login simulation with field-level validation.
//!
//! There is no backend to authenticate against; any well-formed email plus a
//! password of at least six characters opens a session. A configurable delay
//! stands in for upstream latency so callers exercise the same async shape a
//! real authenticator would have.

use std::time::Duration;

use serde::Serialize;

use super::token::AuthTokenStore;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

const DEFAULT_LOGIN_DELAY: Duration = Duration::from_millis(500);

/// Per-field validation messages for the login form.
///
/// Validation failures are data, not exceptions; an empty value means the
/// field passed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoginValidationErrors {
    /// Message for the email field, when it failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Message for the password field, when it failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl LoginValidationErrors {
    /// Whether every field passed validation.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.email.is_none() && self.password.is_none()
    }
}

/// Validate login form fields, returning per-field messages.
#[must_use]
pub fn validate_login(email: &str, password: &str) -> LoginValidationErrors {
    let email_error = if email.is_empty() {
        Some("Email is required".to_owned())
    } else if !looks_like_email(email) {
        Some("Please enter a valid email address".to_owned())
    } else {
        None
    };

    let password_error = if password.is_empty() {
        Some("Password is required".to_owned())
    } else if password.chars().count() < MIN_PASSWORD_LENGTH {
        Some(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        ))
    } else {
        None
    };

    LoginValidationErrors {
        email: email_error,
        password: password_error,
    }
}

fn looks_like_email(candidate: &str) -> bool {
    if candidate.chars().any(char::is_whitespace) {
        return false;
    }
    match candidate.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

/// Failures reported by [`Authenticator::login`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    /// One or more form fields failed validation; no token was written.
    #[error("login validation failed")]
    Validation {
        /// Per-field messages for the caller to render.
        errors: LoginValidationErrors,
    },
    /// Credentials passed validation but the token could not be stored.
    #[error("failed to open session: {message}")]
    TokenStorage {
        /// Underlying storage failure description.
        message: String,
    },
}

/// Opens and closes sessions against an [`AuthTokenStore`].
#[derive(Clone)]
pub struct Authenticator {
    tokens: AuthTokenStore,
    delay: Duration,
}

impl Authenticator {
    /// Build an authenticator with the default simulated latency.
    #[must_use]
    pub fn new(tokens: AuthTokenStore) -> Self {
        Self {
            tokens,
            delay: DEFAULT_LOGIN_DELAY,
        }
    }

    /// Replace the simulated latency; tests pass [`Duration::ZERO`].
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Validate credentials and, on success, store a session token.
    ///
    /// # Errors
    /// Returns [`LoginError::Validation`] with per-field messages when the
    /// form is invalid (no token is written), or
    /// [`LoginError::TokenStorage`] when persisting the token fails.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), LoginError> {
        let errors = validate_login(email, password);
        if !errors.is_empty() {
            return Err(LoginError::Validation { errors });
        }

        tokio::time::sleep(self.delay).await;

        self.tokens
            .save(email)
            .map_err(|err| LoginError::TokenStorage {
                message: err.to_string(),
            })
    }

    /// Close the current session by clearing the stored token.
    pub fn logout(&self) {
        self.tokens.clear();
    }

    /// The token store this authenticator writes to.
    #[must_use]
    pub const fn tokens(&self) -> &AuthTokenStore {
        &self.tokens
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for validation rules and the login flow.

    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    use super::*;
    use crate::outbound::storage::MemoryStore;
    use crate::test_support::MutableClock;

    fn authenticator() -> Authenticator {
        let clock = Arc::new(MutableClock::new(
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).single().expect("valid instant"),
        ));
        let tokens = AuthTokenStore::new(Arc::new(MemoryStore::new()), clock);
        Authenticator::new(tokens).with_delay(Duration::ZERO)
    }

    #[rstest]
    #[case::valid("grace@lendsqr.com", true)]
    #[case::no_at("gracelendsqr.com", false)]
    #[case::no_dot_in_domain("grace@lendsqr", false)]
    #[case::empty_local("@lendsqr.com", false)]
    #[case::whitespace("grace @lendsqr.com", false)]
    fn email_shape_validation(#[case] email: &str, #[case] ok: bool) {
        let errors = validate_login(email, "secret1");
        assert_eq!(errors.email.is_none(), ok, "email: {email}");
    }

    #[rstest]
    #[case::empty("", "Password is required")]
    #[case::short("12345", "Password must be at least 6 characters")]
    fn password_rules_return_field_messages(#[case] password: &str, #[case] expected: &str) {
        let errors = validate_login("grace@lendsqr.com", password);
        assert_eq!(errors.password.as_deref(), Some(expected));
    }

    #[tokio::test]
    async fn invalid_form_leaves_no_token_stored() {
        let auth = authenticator();
        let err = auth
            .login("", "12345")
            .await
            .expect_err("validation must fail");

        match err {
            LoginError::Validation { errors } => {
                assert!(errors.email.is_some());
                assert!(errors.password.is_some());
            }
            LoginError::TokenStorage { .. } => panic!("expected validation failure"),
        }
        assert!(!auth.tokens().is_valid(), "no token may be written");
    }

    #[tokio::test]
    async fn valid_login_stores_a_retrievable_token() {
        let auth = authenticator();
        auth.login("grace@lendsqr.com", "secret1")
            .await
            .expect("login succeeds");

        assert_eq!(auth.tokens().email().as_deref(), Some("grace@lendsqr.com"));
    }

    #[tokio::test]
    async fn logout_clears_the_session() {
        let auth = authenticator();
        auth.login("grace@lendsqr.com", "secret1")
            .await
            .expect("login succeeds");
        auth.logout();
        assert!(!auth.tokens().is_valid());
    }
}
