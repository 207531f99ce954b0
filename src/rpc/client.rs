//! JSON-RPC client with timeout, failover and error handling.
//!
//! # Responsibilities
//! - Speak JSON-RPC 2.0 over HTTP to a full node
//! - Fail over to the next endpoint on transport errors and timeouts
//! - Surface node-side rejections and well-formed replies without a result immediately
//! - Provide health check for node connectivity

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;

use crate::config::NetworkConfig;
use crate::observability::metrics::{self, CallOutcome};
use crate::rpc::ledger::LedgerClient;
use crate::rpc::types::{
    Address, DynamicFieldName, DynamicFieldPage, ObjectDataOptions, ObjectId, ObjectResponse,
    RpcError, RpcResult, TransactionBlockBytes, TransactionBlockResponse,
};

#[derive(Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: &'a Value,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcErrorObject>,
}

#[derive(Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}

/// Full node JSON-RPC client with failover support.
#[derive(Clone)]
pub struct RpcClient {
    /// Endpoints (primary + failovers), tried in order.
    endpoints: Arc<Vec<url::Url>>,
    http: reqwest::Client,
    timeout_duration: Duration,
    next_id: Arc<AtomicU64>,
}

impl RpcClient {
    /// Create a new client.
    ///
    /// The primary URL must parse; unparseable failover URLs are skipped
    /// with a warning. No network traffic happens here.
    pub fn new(config: &NetworkConfig) -> RpcResult<Self> {
        let mut endpoints = Vec::new();

        let primary: url::Url = config.rpc_url.parse().map_err(|e: url::ParseError| {
            RpcError::InvalidEndpoint {
                url: config.rpc_url.clone(),
                reason: e.to_string(),
            }
        })?;
        endpoints.push(primary);

        for url_str in &config.failover_urls {
            match url_str.parse() {
                Ok(url) => endpoints.push(url),
                Err(_) => tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL"),
            }
        }

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| RpcError::Transport(e.to_string()))?;

        tracing::debug!(
            rpc_url = %config.rpc_url,
            endpoints = endpoints.len(),
            timeout_secs = config.rpc_timeout_secs,
            "RPC client initialized"
        );

        Ok(Self {
            endpoints: Arc::new(endpoints),
            http,
            timeout_duration: Duration::from_secs(config.rpc_timeout_secs),
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    /// Number of configured endpoints.
    pub fn endpoint_count(&self) -> usize {
        self.endpoints.len()
    }

    /// Issue one JSON-RPC call and decode its `result`.
    pub async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> RpcResult<T> {
        let result = self.call_raw(method, &params).await?;
        serde_json::from_value(result)
            .map_err(|e| RpcError::Decode(format!("{} result: {}", method, e)))
    }

    async fn call_raw(&self, method: &str, params: &Value) -> RpcResult<Value> {
        let mut failures = Vec::new();

        for (i, endpoint) in self.endpoints.iter().enumerate() {
            let started = Instant::now();
            match timeout(self.timeout_duration, self.send(endpoint, method, params)).await {
                Ok(Ok(value)) => {
                    metrics::record_rpc_call(method, CallOutcome::Ok, started);
                    metrics::record_endpoint_health(endpoint.as_str(), true);
                    return Ok(value);
                }
                Ok(Err(e @ RpcError::Call { .. })) => {
                    metrics::record_rpc_call(method, CallOutcome::Rejected, started);
                    metrics::record_endpoint_health(endpoint.as_str(), true);
                    return Err(e);
                }
                Ok(Err(e @ RpcError::Decode(_))) => {
                    metrics::record_rpc_call(method, CallOutcome::Malformed, started);
                    metrics::record_endpoint_health(endpoint.as_str(), true);
                    return Err(e);
                }
                Ok(Err(e)) => {
                    tracing::warn!(endpoint_idx = i, method, error = %e, "RPC error, trying next endpoint");
                    metrics::record_rpc_call(method, CallOutcome::Transport, started);
                    metrics::record_endpoint_health(endpoint.as_str(), false);
                    failures.push(e);
                }
                Err(_) => {
                    tracing::warn!(endpoint_idx = i, method, "RPC timeout, trying next endpoint");
                    metrics::record_rpc_call(method, CallOutcome::Timeout, started);
                    metrics::record_endpoint_health(endpoint.as_str(), false);
                    failures.push(RpcError::Timeout(self.timeout_duration.as_secs()));
                }
            }
        }

        if failures.len() == 1 {
            return Err(failures.remove(0));
        }
        let summary = failures
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        Err(RpcError::AllEndpointsFailed(summary))
    }

    async fn send(&self, endpoint: &url::Url, method: &str, params: &Value) -> RpcResult<Value> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let response = self
            .http
            .post(endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| RpcError::Transport(e.to_string()))?;

        let status = response.status();
        let body: JsonRpcResponse = match response.json().await {
            Ok(body) => body,
            Err(e) if status.is_success() => {
                return Err(RpcError::Transport(format!("undecodable response body: {}", e)))
            }
            Err(_) => return Err(RpcError::Transport(format!("HTTP {}", status))),
        };

        if let Some(err) = body.error {
            return Err(RpcError::Call {
                code: err.code,
                message: err.message,
            });
        }
        body.result
            .ok_or_else(|| RpcError::Decode(format!("{} response carried no result", method)))
    }

    /// Get the chain identifier of the connected network.
    pub async fn get_chain_identifier(&self) -> RpcResult<String> {
        self.call("sui_getChainIdentifier", json!([])).await
    }

    /// Check if the node is reachable and answering.
    pub async fn is_healthy(&self) -> bool {
        self.get_chain_identifier().await.is_ok()
    }

    /// Build an unsigned Move call transaction on the node.
    #[allow(clippy::too_many_arguments)]
    pub async fn unsafe_move_call(
        &self,
        signer: &Address,
        package: &ObjectId,
        module: &str,
        function: &str,
        type_arguments: &[String],
        arguments: &[Value],
        gas: Option<&ObjectId>,
        gas_budget: u64,
    ) -> RpcResult<TransactionBlockBytes> {
        self.call(
            "unsafe_moveCall",
            json!([
                signer,
                package,
                module,
                function,
                type_arguments,
                arguments,
                gas,
                gas_budget.to_string(),
                Value::Null,
            ]),
        )
        .await
    }

    /// Build an unsigned coin split transaction on the node.
    pub async fn unsafe_split_coin(
        &self,
        signer: &Address,
        coin: &ObjectId,
        amounts: &[u64],
        gas: Option<&ObjectId>,
        gas_budget: u64,
    ) -> RpcResult<TransactionBlockBytes> {
        let amounts: Vec<String> = amounts.iter().map(|a| a.to_string()).collect();
        self.call(
            "unsafe_splitCoin",
            json!([signer, coin, amounts, gas, gas_budget.to_string()]),
        )
        .await
    }

    /// Submit a signed transaction and wait for local execution.
    pub async fn execute_transaction_block(
        &self,
        tx_bytes: &str,
        signatures: &[String],
    ) -> RpcResult<TransactionBlockResponse> {
        self.call(
            "sui_executeTransactionBlock",
            json!([
                tx_bytes,
                signatures,
                { "showEffects": true, "showEvents": true },
                "WaitForLocalExecution",
            ]),
        )
        .await
    }
}

#[async_trait]
impl LedgerClient for RpcClient {
    async fn get_object(
        &self,
        id: &ObjectId,
        options: &ObjectDataOptions,
    ) -> RpcResult<ObjectResponse> {
        self.call("sui_getObject", json!([id, options])).await
    }

    async fn get_dynamic_fields(
        &self,
        parent: &ObjectId,
        cursor: Option<&str>,
        limit: Option<usize>,
    ) -> RpcResult<DynamicFieldPage> {
        self.call("suix_getDynamicFields", json!([parent, cursor, limit]))
            .await
    }

    async fn get_dynamic_field_object(
        &self,
        parent: &ObjectId,
        name: &DynamicFieldName,
    ) -> RpcResult<ObjectResponse> {
        self.call("suix_getDynamicFieldObject", json!([parent, name]))
            .await
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("endpoints", &self.endpoints.len())
            .field("timeout_secs", &self.timeout_duration.as_secs())
            .finish()
    }
}
