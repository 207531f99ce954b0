//! Payment-stream toolkit for a Sui full node.
//!
//! Reads keyed on-chain tables over JSON-RPC, derives signing keys from a
//! recovery phrase and submits stream transactions.

pub mod config;
pub mod faucet;
pub mod keys;
pub mod observability;
pub mod resilience;
pub mod rpc;
pub mod stream;
pub mod walker;

pub use config::ToolkitConfig;
pub use rpc::{LedgerClient, RpcClient};
pub use walker::TableWalker;
