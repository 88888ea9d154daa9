//! Storage boundary for the markdown & reservation engine.
//!
//! The engine owns no storage mechanics; it issues read/write intents against
//! a [`Repository`], one transaction per engine operation.

pub mod in_memory;
pub mod repository;

pub use in_memory::{InMemoryStore, MemoryTx};
pub use repository::{Repository, StoreTx};
