//! Authentication: token storage, login simulation, and session tracking.

pub mod login;
pub mod session;
pub mod token;

pub use self::login::{
    Authenticator, LoginError, LoginValidationErrors, MIN_PASSWORD_LENGTH, validate_login,
};
pub use self::session::AuthSession;
pub use self::token::{AUTH_TOKEN_KEY, AuthTokenStore, DEFAULT_EXPIRY_HOURS, TokenPayload};
