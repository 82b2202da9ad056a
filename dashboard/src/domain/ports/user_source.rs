//! Driven port for fetching the canonical user list.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::user::{User, UserStatus};

/// Source of canonical user records.
///
/// Implementations normalise raw records before returning them, so every
/// [`User`] is fully defaulted by the time it crosses this boundary.
#[async_trait]
pub trait UserSource: Send + Sync {
    /// Fetch every user from the backing resource.
    ///
    /// # Errors
    /// Returns [`UserSourceError`] when the resource cannot be reached,
    /// reports a non-success status, or yields undecodable JSON.
    async fn fetch_users(&self) -> Result<Vec<User>, UserSourceError>;

    /// Fetch all users and linear-scan for `user_id`.
    ///
    /// An absent id is not an error; the caller renders it as "not found".
    ///
    /// # Errors
    /// Propagates the fetch failure from [`UserSource::fetch_users`].
    async fn find_user(&self, user_id: &str) -> Result<Option<User>, UserSourceError> {
        let users = self.fetch_users().await?;
        Ok(users.into_iter().find(|user| user.id == user_id))
    }
}

/// Failures reported by [`UserSource`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserSourceError {
    /// The resource could not be reached at the transport level.
    #[error("user data transport failed: {message}")]
    Transport {
        /// Transport failure description.
        message: String,
    },
    /// The resource answered with a non-success HTTP status.
    #[error("user data fetch returned status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body preview or status text.
        message: String,
    },
    /// The response body was not decodable JSON.
    #[error("user data payload undecodable: {message}")]
    Decode {
        /// Decoder failure description.
        message: String,
    },
}

impl UserSourceError {
    /// Construct a [`UserSourceError::Transport`] error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Construct a [`UserSourceError::Status`] error.
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Construct a [`UserSourceError::Decode`] error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

impl From<UserSourceError> for Error {
    fn from(value: UserSourceError) -> Self {
        Self::fetch_failed(value.to_string())
    }
}

/// In-memory source with a small fixed user list, used by tests and demos.
#[derive(Debug, Clone, Default)]
pub struct FixtureUserSource {
    users: Vec<User>,
}

impl FixtureUserSource {
    /// Source holding exactly the provided users.
    #[must_use]
    pub const fn with_users(users: Vec<User>) -> Self {
        Self { users }
    }

    /// Source holding two representative records, one per organisation.
    #[must_use]
    pub fn sample() -> Self {
        let lendsqr = User {
            id: "LSQ001".to_owned(),
            organization: "Lendsqr".to_owned(),
            username: "adedeji".to_owned(),
            email: "adedeji@lendsqr.com".to_owned(),
            phone_number: "08078903721".to_owned(),
            date_joined: "2020-05-15T10:00:00Z".to_owned(),
            created_at: "May 15, 2020 10:00 AM".to_owned(),
            status: UserStatus::Active,
            full_name: "Adedeji Grace".to_owned(),
            account_balance: "200000.00".to_owned(),
            ..User::default()
        };
        let irorun = User {
            id: "IRO001".to_owned(),
            organization: "Irorun".to_owned(),
            username: "debby".to_owned(),
            email: "debby@irorun.com".to_owned(),
            phone_number: "08160780928".to_owned(),
            date_joined: "2020-04-30T19:14:00Z".to_owned(),
            created_at: "Apr 30, 2020 7:14 PM".to_owned(),
            status: UserStatus::Pending,
            full_name: "Debby Ogana".to_owned(),
            ..User::default()
        };
        Self {
            users: vec![lendsqr, irorun],
        }
    }
}

#[async_trait]
impl UserSource for FixtureUserSource {
    async fn fetch_users(&self) -> Result<Vec<User>, UserSourceError> {
        Ok(self.users.clone())
    }
}
