//! SLIP-0010 Ed25519 derivation from a BIP-39 phrase.

use bip32::{ChildNumber, DerivationPath};
use bip39::{Language, Mnemonic};
use ed25519_dalek::SigningKey;
use slip10_ed25519::derive_ed25519_private_key;

use super::{KeyError, KeyResult, SuiKeypair};

const PURPOSE_ED25519: u32 = 44;
const COIN_TYPE_SUI: u32 = 784;

/// First account of the default wallet.
pub const DEFAULT_DERIVATION_PATH: &str = "m/44'/784'/0'/0'/0'";

/// Parse `path` (or the default) and check it is a five-level, all-hardened
/// `m/44'/784'/...` path.
pub fn validate_path(path: Option<&str>) -> KeyResult<DerivationPath> {
    let raw = path.unwrap_or(DEFAULT_DERIVATION_PATH);
    let parsed: DerivationPath = raw
        .parse()
        .map_err(|_| KeyError::InvalidDerivationPath(format!("cannot parse '{}'", raw)))?;

    let &[purpose, coin_type, account, change, address] = parsed.as_ref() else {
        return Err(KeyError::InvalidDerivationPath(
            "path must have exactly 5 levels".to_string(),
        ));
    };

    if Some(purpose) == ChildNumber::new(PURPOSE_ED25519, true).ok()
        && Some(coin_type) == ChildNumber::new(COIN_TYPE_SUI, true).ok()
        && account.is_hardened()
        && change.is_hardened()
        && address.is_hardened()
    {
        Ok(parsed)
    } else {
        Err(KeyError::InvalidDerivationPath(format!(
            "'{}' must be m/44'/784'/a'/c'/i' with every level hardened",
            raw
        )))
    }
}

/// Derive the Ed25519 keypair for `path` from an English recovery phrase.
pub fn derive_keypair(phrase: &str, path: Option<&str>) -> KeyResult<SuiKeypair> {
    let path = validate_path(path)?;
    let mnemonic = Mnemonic::parse_in(Language::English, phrase.trim())
        .map_err(|e| KeyError::InvalidMnemonic(e.to_string()))?;
    let seed = mnemonic.to_seed("");

    let indexes = path.into_iter().map(u32::from).collect::<Vec<u32>>();
    let derived = derive_ed25519_private_key(&seed, &indexes);
    Ok(SuiKeypair::from_signing_key(SigningKey::from_bytes(&derived)))
}
