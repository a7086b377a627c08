//! Transaction journal adapters
//!
//! [`InMemoryJournal`] for tests and one-off runs, [`JsonlTransactionJournal`]
//! when `[journal] path` is configured.

mod jsonl;
mod memory;

pub use jsonl::JsonlTransactionJournal;
pub use memory::InMemoryJournal;
