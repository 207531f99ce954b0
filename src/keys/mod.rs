//! Signing keys derived from a recovery phrase.
//!
//! # Security
//! - The recovery phrase is read ONLY from an environment variable
//! - Phrases, seeds and private keys are never logged or serialized
//!
//! # Design Decisions
//! - Ed25519 only, derived with SLIP-0010 along an all-hardened path
//! - Transaction bytes are built by the node; this module only signs them

mod derive;
mod keypair;

pub use derive::{derive_keypair, validate_path, DEFAULT_DERIVATION_PATH};
pub use keypair::SuiKeypair;

use thiserror::Error;

/// Environment variable holding the recovery phrase.
pub const MNEMONIC_ENV_VAR: &str = "STREAM_MNEMONIC";

/// Errors raised while loading keys or signing.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("Environment variable {0} not set")]
    MissingEnv(String),

    #[error("Invalid recovery phrase: {0}")]
    InvalidMnemonic(String),

    #[error("Invalid derivation path: {0}")]
    InvalidDerivationPath(String),

    #[error("Invalid transaction bytes: {0}")]
    InvalidTransaction(String),
}

/// Result type for key operations.
pub type KeyResult<T> = Result<T, KeyError>;
