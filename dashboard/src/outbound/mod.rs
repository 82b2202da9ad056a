//! Outbound adapters: the reqwest user source and key-value store backings.

pub mod storage;
pub mod users;
