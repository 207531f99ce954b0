//! Payment-stream operations on top of the RPC client and table walker.
//!
//! # Data Flow
//! ```text
//! reads:   StreamQuery ──▶ TableWalker ──▶ LedgerClient
//! writes:  StreamCalls ──MoveCall──▶ Submitter ──unsafe_moveCall──▶ sign ──▶ execute
//! ```

pub mod calls;
pub mod query;
pub mod submit;

pub use calls::{CallArg, CreateStream, MoveCall, StreamCalls};
pub use query::StreamQuery;
pub use submit::{SubmissionResult, Submitter};

use thiserror::Error;

use crate::faucet::FaucetError;
use crate::keys::KeyError;
use crate::rpc::types::RpcError;
use crate::walker::WalkError;

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Transaction {0} returned no effects")]
    MissingEffects(String),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error(transparent)]
    Walk(#[from] WalkError),

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Faucet(#[from] FaucetError),
}

pub type StreamResult<T> = Result<T, StreamError>;
