//! Read-only ledger collaborator consumed by the table walker.

use async_trait::async_trait;

use crate::rpc::types::{
    DynamicFieldName, DynamicFieldPage, ObjectDataOptions, ObjectId, ObjectResponse, RpcResult,
};

/// The three point-in-time reads the walker needs from a full node.
///
/// Implementations must not cache across calls; every call reflects the
/// remote state at the time it is answered.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Fetch one object.
    async fn get_object(
        &self,
        id: &ObjectId,
        options: &ObjectDataOptions,
    ) -> RpcResult<ObjectResponse>;

    /// Fetch one page of dynamic field descriptors under `parent`.
    async fn get_dynamic_fields(
        &self,
        parent: &ObjectId,
        cursor: Option<&str>,
        limit: Option<usize>,
    ) -> RpcResult<DynamicFieldPage>;

    /// Fetch the field object stored under `name`.
    async fn get_dynamic_field_object(
        &self,
        parent: &ObjectId,
        name: &DynamicFieldName,
    ) -> RpcResult<ObjectResponse>;
}
