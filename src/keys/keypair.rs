//! Account keypair and transaction signing.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};

use super::{derive_keypair, KeyError, KeyResult};
use crate::rpc::types::Address;

type Blake2b256 = Blake2b<U32>;

/// Signature scheme flag for Ed25519.
const ED25519_FLAG: u8 = 0x00;

/// Intent prefix for transaction data: scope, version, app id.
const TRANSACTION_INTENT: [u8; 3] = [0, 0, 0];

/// Ed25519 account key.
#[derive(Clone)]
pub struct SuiKeypair {
    signing_key: SigningKey,
    address: Address,
}

impl SuiKeypair {
    pub fn from_signing_key(signing_key: SigningKey) -> Self {
        let address = address_of(&signing_key.verifying_key());
        Self {
            signing_key,
            address,
        }
    }

    /// Load the recovery phrase from `env_var` and derive the key at `path`.
    pub fn from_env(env_var: &str, path: Option<&str>) -> KeyResult<Self> {
        let phrase =
            std::env::var(env_var).map_err(|_| KeyError::MissingEnv(env_var.to_string()))?;
        let keypair = derive_keypair(&phrase, path)?;

        tracing::info!(address = %keypair.address(), "Signing key loaded");
        Ok(keypair)
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Sign base64 transaction bytes as built by the node.
    ///
    /// Returns the serialized signature `flag || signature || public key`, base64 encoded.
    pub fn sign_transaction(&self, tx_bytes_b64: &str) -> KeyResult<String> {
        let tx_bytes = STANDARD
            .decode(tx_bytes_b64)
            .map_err(|e| KeyError::InvalidTransaction(e.to_string()))?;

        let mut hasher = Blake2b256::new();
        hasher.update(TRANSACTION_INTENT);
        hasher.update(&tx_bytes);
        let digest = hasher.finalize();

        let signature = self.signing_key.sign(&digest);

        let mut serialized = Vec::with_capacity(1 + 64 + 32);
        serialized.push(ED25519_FLAG);
        serialized.extend_from_slice(&signature.to_bytes());
        serialized.extend_from_slice(&self.public_key_bytes());
        Ok(STANDARD.encode(serialized))
    }
}

/// Address = Blake2b-256(flag || public key).
fn address_of(public_key: &VerifyingKey) -> Address {
    let mut hasher = Blake2b256::new();
    hasher.update([ED25519_FLAG]);
    hasher.update(public_key.as_bytes());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hasher.finalize());
    Address::from_bytes(bytes)
}

impl std::fmt::Debug for SuiKeypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuiKeypair")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signature, Verifier};

    fn test_keypair() -> SuiKeypair {
        SuiKeypair::from_signing_key(SigningKey::from_bytes(&[7u8; 32]))
    }

    #[test]
    fn test_signature_layout_and_verification() {
        let keypair = test_keypair();
        let tx_bytes = STANDARD.encode(b"transaction data");

        let encoded = keypair.sign_transaction(&tx_bytes).unwrap();
        let raw = STANDARD.decode(encoded).unwrap();
        assert_eq!(raw.len(), 97);
        assert_eq!(raw[0], ED25519_FLAG);
        assert_eq!(&raw[65..], &keypair.public_key_bytes());

        let mut hasher = Blake2b256::new();
        hasher.update(TRANSACTION_INTENT);
        hasher.update(b"transaction data");
        let digest = hasher.finalize();

        let signature = Signature::from_slice(&raw[1..65]).unwrap();
        let verifying = VerifyingKey::from_bytes(&keypair.public_key_bytes()).unwrap();
        assert!(verifying.verify(&digest, &signature).is_ok());
    }

    #[test]
    fn test_rejects_non_base64_tx() {
        let err = test_keypair().sign_transaction("not base64!").unwrap_err();
        assert!(matches!(err, KeyError::InvalidTransaction(_)));
    }

    #[test]
    fn test_missing_env() {
        let err = SuiKeypair::from_env("STREAM_TOOLKIT_TEST_UNSET_VAR", None).unwrap_err();
        assert!(matches!(err, KeyError::MissingEnv(_)));
    }

    #[test]
    fn test_debug_hides_key() {
        let rendered = format!("{:?}", test_keypair());
        assert!(rendered.contains("address"));
        assert!(!rendered.contains("signing_key"));
    }
}
