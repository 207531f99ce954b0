//! Caller-side resilience.
//!
//! # Data Flow
//! ```text
//! CLI command:
//!     → retries.rs (run one read operation, retry if the error is transient)
//!     → backoff.rs (exponential delay with jitter between attempts)
//!     → walks.rs (table walks that retry each page or read on its own)
//! ```
//!
//! # Design Decisions
//! - The walker and the RPC client never retry on their own; retry policy belongs to the caller
//! - Retries apply to one operation at a time, never to a whole multi-call walk
//! - Only transient failures are retried; NotFound and InvalidCursor are final
//! - Transaction submission is not idempotent and is never retried

pub mod backoff;
pub mod retries;
pub mod walks;

pub use retries::{retry_with_backoff, Retryable};
pub use walks::{collect_entries_with_retries, lookup_with_retries};
