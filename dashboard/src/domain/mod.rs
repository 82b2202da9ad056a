//! Domain entities, services, and ports.
//!
//! Purpose: strongly typed records and transport-agnostic services for the
//! dashboard. Adapters live under `outbound`; everything here depends only on
//! the port traits, so tests substitute in-memory doubles for storage and the
//! user source.

pub mod auth;
pub mod dashboard;
pub mod error;
pub mod filters;
pub mod overrides;
pub mod ports;
pub mod user;

pub use self::dashboard::{Dashboard, DashboardStats, DashboardView, ViewModel, derive_view_model};
pub use self::error::{Error, ErrorCode};
pub use self::filters::UserFilters;
pub use self::overrides::{STATUS_OVERRIDES_KEY, StatusOverrideStore};
pub use self::user::{
    EducationAndEmployment, Guarantor, PersonalInfo, User, UserStatus, UserStatusParseError,
};
