//! Test-network faucet client.
//!
//! Asks the faucet service to send gas coins to an address. The service is
//! not part of the ledger RPC, so it gets its own client and error type.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::config::NetworkConfig;
use crate::rpc::types::{Address, ObjectId};

#[derive(Debug, Error)]
pub enum FaucetError {
    #[error("Invalid faucet URL '{0}'")]
    InvalidUrl(String),

    #[error("Faucet unreachable: {0}")]
    Transport(String),

    #[error("Faucet rejected request: {0}")]
    Rejected(String),

    #[error("Malformed faucet response: {0}")]
    Decode(String),
}

pub type FaucetResult<T> = Result<T, FaucetError>;

#[derive(Debug, Serialize)]
enum FaucetRequest {
    FixedAmountRequest { recipient: String },
}

/// One gas coin sent by the faucet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinInfo {
    pub amount: u64,
    pub id: ObjectId,
    pub transfer_tx_digest: String,
}

/// Both the legacy (`transferredGasObjects`) and current (`coins_sent`)
/// response shapes are accepted.
#[derive(Debug, Deserialize)]
struct FaucetResponse {
    #[serde(default, rename = "transferredGasObjects")]
    transferred_gas_objects: Option<Vec<CoinInfo>>,
    #[serde(default)]
    coins_sent: Option<Vec<CoinInfo>>,
    #[serde(default)]
    status: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

impl FaucetResponse {
    fn into_coins(self) -> FaucetResult<Vec<CoinInfo>> {
        if let Some(error) = self.error.filter(|e| !e.is_empty()) {
            return Err(FaucetError::Rejected(error));
        }
        if let Some(serde_json::Value::Object(failure)) = &self.status {
            if let Some(reason) = failure.get("Failure") {
                return Err(FaucetError::Rejected(reason.to_string()));
            }
        }
        self.coins_sent
            .or(self.transferred_gas_objects)
            .ok_or_else(|| FaucetError::Decode("response lists no coins".to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct FaucetClient {
    http: reqwest::Client,
    url: url::Url,
}

impl FaucetClient {
    pub fn new(config: &NetworkConfig) -> FaucetResult<Self> {
        let url = config
            .faucet_url
            .parse()
            .map_err(|_| FaucetError::InvalidUrl(config.faucet_url.clone()))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.rpc_timeout_secs))
            .build()
            .map_err(|e| FaucetError::Transport(e.to_string()))?;
        Ok(Self { http, url })
    }

    /// Request a fixed amount of gas for `recipient`.
    pub async fn request_gas(&self, recipient: &Address) -> FaucetResult<Vec<CoinInfo>> {
        let request = FaucetRequest::FixedAmountRequest {
            recipient: recipient.to_hex(),
        };

        let response = self
            .http
            .post(self.url.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| FaucetError::Transport(e.to_string()))?;

        let status = response.status();
        let body: FaucetResponse = match response.json().await {
            Ok(body) => body,
            Err(e) if status.is_success() => return Err(FaucetError::Decode(e.to_string())),
            Err(_) => return Err(FaucetError::Transport(format!("HTTP {}", status))),
        };

        let coins = body.into_coins()?;
        tracing::info!(
            recipient = %recipient,
            coins = coins.len(),
            total = coins.iter().map(|c| c.amount).sum::<u64>(),
            "Faucet sent gas"
        );
        Ok(coins)
    }
}
