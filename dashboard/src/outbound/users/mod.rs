//! Reqwest-backed user source adapter and record normalisation.

mod dto;
mod http_source;
mod normalize;

pub use http_source::HttpUserSource;
pub use normalize::normalize_user;
