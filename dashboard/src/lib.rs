//! Dashboard core library modules.
//!
//! The crate implements the data and logic layer of the user admin
//! dashboard: the canonical user record and its normalisation, the auth
//! token and status-override stores, and the pure derivation pipeline that
//! turns fetched users plus local state into the view model a renderer
//! consumes.

pub mod domain;
pub mod outbound;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use domain::{Dashboard, DashboardView, Error, ErrorCode, User, UserFilters, UserStatus};
