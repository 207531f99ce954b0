//! Stream ID lookups in the `GlobalConfig` recipient and sender tables.

use crate::config::RetryConfig;
use crate::resilience::lookup_with_retries;
use crate::rpc::types::{Address, DynamicFieldName, ObjectId};
use crate::rpc::LedgerClient;
use crate::walker::{FieldPath, TableWalker, WalkError, WalkResult};

const INCOMING_PATH: &str = "incoming_stream.id";
const OUTGOING_PATH: &str = "outgoing_stream.id";

/// Reads stream IDs indexed by account in a deployment's `GlobalConfig`.
///
/// Each lookup is two reads: resolving the table handle and fetching the
/// account's entry. With retries enabled each read is retried on its own.
#[derive(Debug, Clone)]
pub struct StreamQuery<C> {
    walker: TableWalker<C>,
    global_config: ObjectId,
    retries: RetryConfig,
}

impl<C: LedgerClient> StreamQuery<C> {
    pub fn new(walker: TableWalker<C>, global_config: ObjectId) -> Self {
        Self {
            walker,
            global_config,
            retries: RetryConfig {
                enabled: false,
                ..RetryConfig::default()
            },
        }
    }

    pub fn with_retries(mut self, retries: RetryConfig) -> Self {
        self.retries = retries;
        self
    }

    /// Streams paying into `recipient`.
    pub async fn incoming_streams(&self, recipient: &Address) -> WalkResult<Vec<ObjectId>> {
        self.streams_at(INCOMING_PATH, recipient).await
    }

    /// Streams funded by `sender`.
    pub async fn outgoing_streams(&self, sender: &Address) -> WalkResult<Vec<ObjectId>> {
        self.streams_at(OUTGOING_PATH, sender).await
    }

    async fn streams_at(&self, path: &str, account: &Address) -> WalkResult<Vec<ObjectId>> {
        let path: FieldPath = path
            .parse()
            .map_err(|e: crate::walker::FieldPathError| WalkError::NotFound(e.to_string()))?;
        lookup_with_retries(
            &self.retries,
            &self.walker,
            &self.global_config,
            &path,
            &DynamicFieldName::address(account),
        )
        .await
    }
}
