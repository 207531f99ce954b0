//! Full node RPC subsystem.
//!
//! # Data Flow
//! ```text
//! NetworkConfig (rpc_url, failover_urls, timeout)
//!     → client.rs (JSON-RPC over HTTP, failover, timeouts, metrics)
//!     → types.rs (typed response records, validated at the boundary)
//!     → ledger.rs (LedgerClient trait consumed by the walker)
//! ```
//!
//! # Constraints
//! - Every call has a deadline
//! - Transport failures fail over; node-side rejections do not
//! - No caching and no retries at this layer

pub mod client;
pub mod ledger;
pub mod types;

pub use client::RpcClient;
pub use ledger::LedgerClient;
pub use types::{
    Address, DynamicFieldInfo, DynamicFieldName, DynamicFieldPage, ObjectDataOptions, ObjectId,
    ObjectResponse, RpcError, RpcResult,
};
