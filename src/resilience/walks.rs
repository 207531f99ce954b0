//! Table walks with per-operation retries.
//!
//! Each remote read is retried on its own. A transient failure on page N
//! repeats only page N, and a failed value fetch does not re-resolve the root.

use serde::de::DeserializeOwned;
use std::num::NonZeroUsize;

use crate::config::RetryConfig;
use crate::resilience::retry_with_backoff;
use crate::rpc::types::{DynamicFieldName, ObjectId};
use crate::rpc::LedgerClient;
use crate::walker::{
    collect_pages, Cursor, FieldPath, PartialWalk, StorageHandle, TableEntry, TableWalker,
    WalkResult,
};

/// Page through every entry under `handle` from `start`, retrying each page.
///
/// When a page exhausts its retries, the entries read so far and the cursor
/// to resume from come back in [`PartialWalk`].
pub async fn collect_entries_with_retries<C: LedgerClient>(
    config: &RetryConfig,
    walker: &TableWalker<C>,
    handle: &StorageHandle,
    start: Option<Cursor>,
    page_size: Option<NonZeroUsize>,
) -> Result<Vec<TableEntry>, PartialWalk> {
    collect_pages(handle, start, move |cursor| async move {
        let cursor = cursor.as_ref();
        retry_with_backoff(config, "list_entries", move || {
            walker.list_entries(handle, cursor, page_size)
        })
        .await
    })
    .await
}

/// Resolve the handle under `root`, then fetch `key`, retrying each step separately.
pub async fn lookup_with_retries<C: LedgerClient, T: DeserializeOwned>(
    config: &RetryConfig,
    walker: &TableWalker<C>,
    root: &ObjectId,
    path: &FieldPath,
    key: &DynamicFieldName,
) -> WalkResult<T> {
    let handle = retry_with_backoff(config, "resolve_storage_handle", || {
        walker.resolve_storage_handle(root, path)
    })
    .await?;

    retry_with_backoff(config, "fetch_value", || walker.fetch_value(&handle, key)).await
}
