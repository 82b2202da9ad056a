//! Persistent auth token store.
//!
//! The token is base64-encoded JSON, an opaque encoding and nothing more:
//! there is no signature, and validity rests entirely on the embedded expiry.
//! Expiry is lazy; it is enforced whenever the payload is read, and an
//! expired or undecodable token is purged on that read.

use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::error::Error;
use crate::domain::ports::KeyValueStore;

/// Storage key holding the encoded token.
pub const AUTH_TOKEN_KEY: &str = "lendsqr_auth_token";

/// Default token lifetime in hours.
pub const DEFAULT_EXPIRY_HOURS: i64 = 24;

const MILLIS_PER_HOUR: i64 = 60 * 60 * 1000;

/// Decoded token contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    /// Email the session was opened for.
    pub email: String,
    /// Issued-at timestamp, milliseconds since the Unix epoch.
    pub iat: i64,
    /// Expiry timestamp, milliseconds since the Unix epoch.
    pub exp: i64,
}

/// Token store over a persistent [`KeyValueStore`] and an injected clock.
#[derive(Clone)]
pub struct AuthTokenStore {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl AuthTokenStore {
    /// Build a token store over the given persistent backing.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Save a token for `email` with the default 24-hour lifetime.
    ///
    /// # Errors
    /// Returns [`Error`] when the token cannot be persisted.
    pub fn save(&self, email: &str) -> Result<(), Error> {
        self.save_with_expiry(email, DEFAULT_EXPIRY_HOURS)
    }

    /// Save a token for `email` expiring `expiry_hours` from now.
    ///
    /// # Errors
    /// Returns [`Error`] when the token cannot be persisted.
    pub fn save_with_expiry(&self, email: &str, expiry_hours: i64) -> Result<(), Error> {
        let now = self.now_millis();
        let payload = TokenPayload {
            email: email.to_owned(),
            iat: now,
            exp: now.saturating_add(expiry_hours.saturating_mul(MILLIS_PER_HOUR)),
        };
        let json = serde_json::to_string(&payload)
            .map_err(|err| Error::internal(format!("failed to encode auth token: {err}")))?;
        self.store
            .put(AUTH_TOKEN_KEY, &BASE64.encode(json))
            .map_err(|err| Error::internal(format!("failed to persist auth token: {err}")))
    }

    /// Read the stored payload, purging it when undecodable or expired.
    #[must_use]
    pub fn payload(&self) -> Option<TokenPayload> {
        let token = match self.store.get(AUTH_TOKEN_KEY) {
            Ok(Some(token)) => token,
            Ok(None) => return None,
            Err(err) => {
                warn!(error = %err, "auth token storage unreadable; treating as absent");
                return None;
            }
        };

        let Some(payload) = decode_token(&token) else {
            warn!("auth token undecodable; clearing");
            self.clear();
            return None;
        };

        if self.now_millis() > payload.exp {
            self.clear();
            return None;
        }

        Some(payload)
    }

    /// Whether a decodable, unexpired token is stored.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.payload().is_some()
    }

    /// Email of the current session, when one is open.
    #[must_use]
    pub fn email(&self) -> Option<String> {
        self.payload().map(|payload| payload.email)
    }

    /// Time until the stored token expires; zero when no session is open.
    ///
    /// Used to schedule auto-logout.
    #[must_use]
    pub fn remaining_time(&self) -> Duration {
        let Some(payload) = self.payload() else {
            return Duration::ZERO;
        };
        let remaining = payload.exp.saturating_sub(self.now_millis());
        Duration::from_millis(u64::try_from(remaining).unwrap_or(0))
    }

    /// Remove the stored token unconditionally.
    pub fn clear(&self) {
        if let Err(err) = self.store.remove(AUTH_TOKEN_KEY) {
            warn!(error = %err, "failed to clear auth token");
        }
    }

    fn now_millis(&self) -> i64 {
        self.clock.utc().timestamp_millis()
    }
}

fn decode_token(token: &str) -> Option<TokenPayload> {
    let bytes = BASE64.decode(token).ok()?;
    serde_json::from_slice(&bytes).ok()
}
