//! Persistence for entries, the blacklist, and the prompt-use ledger
//!
//! All shared mutable state sits behind narrow store traits so backends can
//! be swapped freely: [`SqliteStore`] for a single-file database,
//! [`MemoryStore`] for tests and ephemeral runs.

mod memory;
mod sqlite;
mod traits;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{
    BlacklistStore, EntryStore, JournalEntry, PromptLedgerStore, StoreError, StoreResult,
};
