//! Session tracker with timer-based auto-logout.
//!
//! Wraps an [`Authenticator`] and keeps observers informed through a watch
//! channel carrying the authenticated email. A logout timer is armed for the
//! token's remaining lifetime and is cancelled and rearmed whenever the
//! authentication state changes, so an expired session closes itself without
//! waiting for the next storage read.

use std::sync::{Arc, Mutex, MutexGuard, Weak};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use super::login::{Authenticator, LoginError};

/// Cloneable handle onto one authentication session.
#[derive(Clone)]
pub struct AuthSession {
    inner: Arc<Inner>,
}

struct Inner {
    auth: Authenticator,
    state: watch::Sender<Option<String>>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl Inner {
    fn close(&self) {
        self.auth.logout();
        self.state.send_replace(None);
    }

    fn timer_slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        match self.timer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl AuthSession {
    /// Track the session currently held by `auth`'s token store.
    ///
    /// Must be called from within a Tokio runtime: when a stored session is
    /// still open, the auto-logout timer is armed immediately.
    #[must_use]
    pub fn new(auth: Authenticator) -> Self {
        let email = auth.tokens().email();
        let authenticated = email.is_some();
        let (state, _) = watch::channel(email);
        let session = Self {
            inner: Arc::new(Inner {
                auth,
                state,
                timer: Mutex::new(None),
            }),
        };
        if authenticated {
            session.arm_timer();
        }
        session
    }

    /// Open a session; on success the watch channel observes the email and
    /// the auto-logout timer is rearmed.
    ///
    /// # Errors
    /// Propagates [`LoginError`] from the underlying authenticator; the
    /// session state is unchanged on failure.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), LoginError> {
        self.inner.auth.login(email, password).await?;
        self.inner.state.send_replace(Some(email.to_owned()));
        self.arm_timer();
        Ok(())
    }

    /// Close the session: cancel the timer, clear the token, notify
    /// observers.
    pub fn logout(&self) {
        self.cancel_timer();
        self.inner.close();
    }

    /// Whether an unexpired session is open.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.auth.tokens().is_valid()
    }

    /// Email of the open session, if any.
    #[must_use]
    pub fn email(&self) -> Option<String> {
        self.inner.auth.tokens().email()
    }

    /// Observe authentication changes; the value is the session email.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.inner.state.subscribe()
    }

    fn cancel_timer(&self) {
        if let Some(handle) = self.inner.timer_slot().take() {
            handle.abort();
        }
    }

    fn arm_timer(&self) {
        self.cancel_timer();

        let remaining = self.inner.auth.tokens().remaining_time();
        if remaining.is_zero() {
            // The stored token already lapsed; close out synchronously.
            self.inner.close();
            return;
        }

        debug!(?remaining, "arming auto-logout timer");
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(remaining).await;
            if let Some(inner) = weak.upgrade() {
                debug!("token lifetime elapsed; logging out");
                inner.close();
            }
        });
        *self.inner.timer_slot() = Some(handle);
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for auto-logout scheduling.

    use std::time::Duration;

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::domain::auth::token::AuthTokenStore;
    use crate::outbound::storage::MemoryStore;
    use crate::test_support::MutableClock;

    fn session() -> AuthSession {
        let clock = Arc::new(MutableClock::new(
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).single().expect("valid instant"),
        ));
        let tokens = AuthTokenStore::new(Arc::new(MemoryStore::new()), clock);
        AuthSession::new(Authenticator::new(tokens).with_delay(Duration::ZERO))
    }

    #[tokio::test(start_paused = true)]
    async fn auto_logout_fires_when_the_token_lifetime_elapses() {
        let session = session();
        session
            .login("grace@lendsqr.com", "secret1")
            .await
            .expect("login succeeds");
        assert!(session.is_authenticated());

        let mut state = session.subscribe();
        state.mark_unchanged();
        // Paused time auto-advances to the timer deadline while we wait.
        state.changed().await.expect("sender alive");

        assert!(state.borrow_and_update().is_none());
        assert!(!session.is_authenticated());
    }

    #[tokio::test(start_paused = true)]
    async fn logout_cancels_the_timer_and_allows_re_login() {
        let session = session();
        session
            .login("grace@lendsqr.com", "secret1")
            .await
            .expect("login succeeds");
        session.logout();
        assert!(!session.is_authenticated());

        session
            .login("debby@irorun.com", "secret2")
            .await
            .expect("second login succeeds");
        assert_eq!(session.email().as_deref(), Some("debby@irorun.com"));
    }

    #[tokio::test]
    async fn observers_see_login_and_logout_transitions() {
        let session = session();
        let state = session.subscribe();
        assert!(state.borrow().is_none());

        session
            .login("grace@lendsqr.com", "secret1")
            .await
            .expect("login succeeds");
        assert_eq!(state.borrow().as_deref(), Some("grace@lendsqr.com"));

        session.logout();
        assert!(state.borrow().is_none());
    }
}
