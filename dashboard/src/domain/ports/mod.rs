//! Domain ports for the hexagonal boundary.
//!
//! Services depend on these traits only; concrete adapters (reqwest source,
//! file/memory stores) live under `outbound`.

mod key_value_store;
mod user_source;

pub use key_value_store::{KeyValueStore, KeyValueStoreError};
pub use user_source::{FixtureUserSource, UserSource, UserSourceError};
