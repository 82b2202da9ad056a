//! Key-value store adapters.
//!
//! `FileStore` is the persistent backing (the local-storage analogue);
//! `MemoryStore` is session-scoped, living and dying with the process.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;
