//! Build, sign and execute stream transactions.
//!
//! # Responsibilities
//! - Have the node build transaction bytes for a Move call or coin split
//! - Sign the bytes locally
//! - Execute and report the effects status
//!
//! Submission is not idempotent and is never retried here.

use serde::Serialize;

use crate::keys::SuiKeypair;
use crate::observability::metrics;
use crate::rpc::types::{ObjectId, TransactionBlockBytes, TransactionBlockResponse};
use crate::rpc::RpcClient;
use crate::stream::calls::MoveCall;
use crate::stream::{StreamError, StreamResult};

/// Outcome of one executed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionResult {
    pub digest: String,
    /// `success` or `failure` as reported by the effects.
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Objects created by the transaction.
    pub created: Vec<ObjectId>,
}

impl SubmissionResult {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }

    fn from_response(response: TransactionBlockResponse) -> StreamResult<Self> {
        let effects = response.effects.ok_or_else(|| {
            StreamError::MissingEffects(response.digest.clone())
        })?;
        Ok(Self {
            digest: response.digest,
            status: effects.status.status,
            error: effects.status.error,
            created: effects
                .created
                .into_iter()
                .map(|c| c.reference.object_id)
                .collect(),
        })
    }
}

/// Signs and executes transactions for one account.
#[derive(Debug, Clone)]
pub struct Submitter {
    client: RpcClient,
    keypair: SuiKeypair,
    gas_budget: u64,
}

impl Submitter {
    pub fn new(client: RpcClient, keypair: SuiKeypair, gas_budget: u64) -> Self {
        Self {
            client,
            keypair,
            gas_budget,
        }
    }

    pub fn keypair(&self) -> &SuiKeypair {
        &self.keypair
    }

    /// Execute one Move call. Gas is selected by the node.
    pub async fn submit(&self, call: &MoveCall) -> StreamResult<SubmissionResult> {
        let tx = self
            .client
            .unsafe_move_call(
                &self.keypair.address(),
                &call.package,
                &call.module,
                &call.function,
                &call.type_arguments,
                &call.json_arguments(),
                None,
                self.gas_budget,
            )
            .await?;

        self.sign_and_execute(&call.function, tx).await
    }

    /// Split `coin` into new coins of the given amounts.
    pub async fn split_coin(
        &self,
        coin: &ObjectId,
        amounts: &[u64],
    ) -> StreamResult<SubmissionResult> {
        if amounts.is_empty() || amounts.contains(&0) {
            return Err(StreamError::InvalidParams(
                "split amounts must be non-empty and positive".to_string(),
            ));
        }
        let tx = self
            .client
            .unsafe_split_coin(&self.keypair.address(), coin, amounts, None, self.gas_budget)
            .await?;

        self.sign_and_execute("split_coin", tx).await
    }

    async fn sign_and_execute(
        &self,
        label: &str,
        tx: TransactionBlockBytes,
    ) -> StreamResult<SubmissionResult> {
        let signature = self.keypair.sign_transaction(&tx.tx_bytes)?;
        let response = self
            .client
            .execute_transaction_block(&tx.tx_bytes, &[signature])
            .await?;

        let result = SubmissionResult::from_response(response)?;
        metrics::record_submission(label, result.is_success());

        if result.is_success() {
            tracing::info!(
                function = label,
                digest = %result.digest,
                created = result.created.len(),
                "Transaction executed"
            );
        } else {
            tracing::warn!(
                function = label,
                digest = %result.digest,
                error = result.error.as_deref().unwrap_or("unknown"),
                "Transaction failed on chain"
            );
        }
        Ok(result)
    }
}
