//! Keyed on-chain table walking.
//!
//! # Data Flow
//! ```text
//! root object ──get_object──▶ content fields ──FieldPath──▶ StorageHandle
//!                                                              │
//!                         get_dynamic_fields (paged) ◀─────────┤
//!                         get_dynamic_field_object   ◀─────────┘
//! ```
//!
//! # Design Decisions
//! - The ledger is injected as a [`LedgerClient`](crate::rpc::LedgerClient);
//!   the walker holds no other state
//! - No caching and no retries; every error reaches the caller
//! - A multi-page walk that fails keeps the entries read so far and the cursor to resume from
//! - Values are decoded into caller-chosen types with serde

pub mod error;
pub mod path;
pub mod table;

#[cfg(test)]
pub(crate) mod memory;

pub use error::{WalkError, WalkResult};
pub use path::{FieldPath, FieldPathError};
pub use table::{
    collect_pages, Cursor, EntryPage, PartialWalk, StorageHandle, TableEntry, TableWalker,
};
