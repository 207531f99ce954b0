//! Chain table walker.
//!
//! Three-step read pattern over a keyed on-chain table:
//! root object → storage handle → dynamic field entries → field value.
//! Every operation is a single idempotent read; nothing is cached, mutated
//! or retried locally.

use futures_util::future::try_join_all;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::num::NonZeroUsize;
use thiserror::Error;

use crate::rpc::types::{
    DynamicFieldInfo, DynamicFieldName, ObjectData, ObjectDataOptions, ObjectId, ObjectResponse,
    ObjectResponseError, RpcError, INVALID_PARAMS_CODE,
};
use crate::rpc::LedgerClient;
use crate::walker::error::{WalkError, WalkResult};
use crate::walker::path::{resolve_identifier, FieldPath, PathMiss};

/// Identifier of a table's backing dynamic-field collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct StorageHandle(ObjectId);

impl StorageHandle {
    pub fn new(id: ObjectId) -> Self {
        Self(id)
    }

    pub fn id(&self) -> &ObjectId {
        &self.0
    }
}

impl fmt::Display for StorageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Opaque pagination token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Cursor {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One (key, value-type, child object) triple under a storage handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableEntry {
    pub key: DynamicFieldName,
    pub value_type: String,
    pub object_id: ObjectId,
}

impl From<DynamicFieldInfo> for TableEntry {
    fn from(info: DynamicFieldInfo) -> Self {
        Self {
            key: info.name,
            value_type: info.object_type,
            object_id: info.object_id,
        }
    }
}

/// One page of entries. `next_cursor` is present only when `has_more` is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryPage {
    pub entries: Vec<TableEntry>,
    pub next_cursor: Option<Cursor>,
    pub has_more: bool,
}

/// A multi-page walk that stopped early.
#[derive(Debug, Error)]
#[error("{error} (after {} entries)", entries.len())]
pub struct PartialWalk {
    /// Entries read before the failure, in enumeration order.
    pub entries: Vec<TableEntry>,
    /// Cursor of the last page read successfully; `None` means start over.
    pub resume_from: Option<Cursor>,
    #[source]
    pub error: WalkError,
}

/// Drive `fetch_page` from `start` until a page reports no more entries.
///
/// `fetch_page` is called once per page with the cursor to read from.
/// A cursor that fails to advance aborts the walk with `RemoteUnavailable`.
pub async fn collect_pages<F, Fut>(
    handle: &StorageHandle,
    start: Option<Cursor>,
    mut fetch_page: F,
) -> Result<Vec<TableEntry>, PartialWalk>
where
    F: FnMut(Option<Cursor>) -> Fut,
    Fut: Future<Output = WalkResult<EntryPage>>,
{
    let mut entries = Vec::new();
    let mut cursor = start;

    loop {
        let page = match fetch_page(cursor.clone()).await {
            Ok(page) => page,
            Err(error) => {
                return Err(PartialWalk {
                    entries,
                    resume_from: cursor,
                    error,
                })
            }
        };
        entries.extend(page.entries);

        match page.next_cursor {
            Some(next) if cursor.as_ref() == Some(&next) => {
                let error = WalkError::RemoteUnavailable(format!(
                    "cursor {} did not advance under {}",
                    next, handle
                ));
                return Err(PartialWalk {
                    entries,
                    resume_from: cursor,
                    error,
                });
            }
            Some(next) => cursor = Some(next),
            None => return Ok(entries),
        }
    }
}

/// Walks keyed tables reachable from a known root object.
#[derive(Debug, Clone)]
pub struct TableWalker<C> {
    client: C,
}

impl<C: LedgerClient> TableWalker<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Fetch `root` with content and follow `path` down to the table's storage handle.
    pub async fn resolve_storage_handle(
        &self,
        root: &ObjectId,
        path: &FieldPath,
    ) -> WalkResult<StorageHandle> {
        let response = self
            .client
            .get_object(root, &ObjectDataOptions::with_content())
            .await?;
        let data = into_object_data(response, || format!("root object {}", root))?;

        let fields = data.move_fields().ok_or_else(|| {
            WalkError::NotFound(format!("object {} has no Move content", root))
        })?;

        let leaf = resolve_identifier(fields, path).map_err(|miss| match miss {
            PathMiss::MissingSegment(prefix) => {
                WalkError::NotFound(format!("field '{}' in object {}", prefix, root))
            }
            PathMiss::NotAnIdentifier => WalkError::NotFound(format!(
                "no identifier at '{}' in object {}",
                path, root
            )),
        })?;

        let id: ObjectId = leaf.parse().map_err(|_| {
            WalkError::NotFound(format!("no identifier at '{}' in object {}", path, root))
        })?;

        tracing::debug!(root = %root, path = %path, handle = %id, "Resolved storage handle");
        Ok(StorageHandle(id))
    }

    /// Fetch one page of entries under `handle`.
    pub async fn list_entries(
        &self,
        handle: &StorageHandle,
        cursor: Option<&Cursor>,
        page_size: Option<NonZeroUsize>,
    ) -> WalkResult<EntryPage> {
        let page = self
            .client
            .get_dynamic_fields(
                handle.id(),
                cursor.map(Cursor::as_str),
                page_size.map(NonZeroUsize::get),
            )
            .await
            .map_err(|e| match e {
                RpcError::Call { code, message }
                    if code == INVALID_PARAMS_CODE && cursor.is_some() =>
                {
                    WalkError::InvalidCursor(message)
                }
                other => other.into(),
            })?;

        let next_cursor = if page.has_next_page {
            let next = page.next_cursor.ok_or_else(|| {
                WalkError::RemoteUnavailable(format!(
                    "page under {} reports more entries but carries no cursor",
                    handle
                ))
            })?;
            Some(Cursor(next))
        } else {
            None
        };

        let entries: Vec<TableEntry> = page.data.into_iter().map(TableEntry::from).collect();
        tracing::debug!(
            handle = %handle,
            entries = entries.len(),
            has_more = page.has_next_page,
            "Listed table entries"
        );

        Ok(EntryPage {
            entries,
            next_cursor,
            has_more: page.has_next_page,
        })
    }

    /// Fetch the value stored under `key` and decode it as `T`.
    pub async fn fetch_value<T: DeserializeOwned>(
        &self,
        handle: &StorageHandle,
        key: &DynamicFieldName,
    ) -> WalkResult<T> {
        let response = self
            .client
            .get_dynamic_field_object(handle.id(), key)
            .await?;
        let data = into_object_data(response, || format!("key {} under {}", key, handle))?;

        let value = data
            .move_fields()
            .and_then(|fields| fields.get("value"))
            .ok_or_else(|| {
                WalkError::RemoteUnavailable(format!(
                    "field object {} carries no value",
                    data.object_id
                ))
            })?;

        tracing::debug!(handle = %handle, key = %key, "Fetched table value");
        serde_json::from_value(value.clone()).map_err(|e| {
            WalkError::RemoteUnavailable(format!("undecodable value for key {}: {}", key, e))
        })
    }

    /// Page through every entry under `handle` from `start`, one request at a time.
    ///
    /// On failure the entries already read and the cursor to resume from are
    /// returned inside [`PartialWalk`].
    pub async fn collect_entries(
        &self,
        handle: &StorageHandle,
        start: Option<&Cursor>,
        page_size: Option<NonZeroUsize>,
    ) -> Result<Vec<TableEntry>, PartialWalk> {
        collect_pages(handle, start.cloned(), move |cursor| async move {
            self.list_entries(handle, cursor.as_ref(), page_size).await
        })
        .await
    }

    /// Fetch several independent keys concurrently. Fails on the first error.
    pub async fn fetch_values<T: DeserializeOwned>(
        &self,
        handle: &StorageHandle,
        keys: &[DynamicFieldName],
    ) -> WalkResult<Vec<T>> {
        try_join_all(keys.iter().map(|key| self.fetch_value(handle, key))).await
    }

    /// Resolve the handle under `root` and fetch `key` from it.
    pub async fn lookup<T: DeserializeOwned>(
        &self,
        root: &ObjectId,
        path: &FieldPath,
        key: &DynamicFieldName,
    ) -> WalkResult<T> {
        let handle = self.resolve_storage_handle(root, path).await?;
        self.fetch_value(&handle, key).await
    }
}

fn into_object_data(
    response: ObjectResponse,
    what: impl FnOnce() -> String,
) -> WalkResult<ObjectData> {
    match (response.data, response.error) {
        (Some(data), _) => Ok(data),
        (
            None,
            Some(
                err @ (ObjectResponseError::NotExists { .. }
                | ObjectResponseError::DynamicFieldNotFound { .. }
                | ObjectResponseError::Deleted { .. }),
            ),
        ) => Err(WalkError::NotFound(format!("{}: {}", what(), err))),
        (None, Some(err)) => Err(WalkError::RemoteUnavailable(format!("{}: {}", what(), err))),
        (None, None) => Err(WalkError::RemoteUnavailable(format!(
            "{}: response carried neither data nor error",
            what()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::types::Address;
    use crate::walker::memory::MemoryLedger;
    use serde_json::{json, Value};

    const ROOT: &str = "0x2217bc9922316837220dfedbd1068533ee2dfd1a3073c16c76fb376e23b17d7e";
    const HANDLE: &str = "0xc692b2acc82596239bdec03005ed2ae9815e05f7ec32536c1169ba5328e15675";
    const RECIPIENT: &str = "0x96b748bcf4bbea124ca405982ba6cd1cf17ee234b0d555b3e29e4e085ad87966";
    const STREAM: &str = "0xe1366748ab89018f975b75dce2781ee786eb6e027be5adf732783eab225e04b7";

    fn id(s: &str) -> ObjectId {
        s.parse().unwrap()
    }

    fn key(addr: &str) -> DynamicFieldName {
        DynamicFieldName::address(&addr.parse::<Address>().unwrap())
    }

    fn handle() -> StorageHandle {
        StorageHandle::new(id(HANDLE))
    }

    fn deployment() -> MemoryLedger {
        let mut ledger = MemoryLedger::new();
        ledger.insert_object(
            id(ROOT),
            json!({
                "id": { "id": ROOT },
                "fee_recipient": "0xb6dedb535d8fcb9b2bb12313737c6b094a48abc494103da8dcac129e21f396fb",
                "incoming_stream": {
                    "type": "0x2::table::Table<address, vector<0x2::object::ID>>",
                    "fields": { "id": { "id": HANDLE }, "size": "1" }
                }
            }),
        );
        ledger.insert_entry(id(HANDLE), key(RECIPIENT), json!([STREAM]));
        ledger
    }

    fn numbered_table(count: usize) -> MemoryLedger {
        let mut ledger = MemoryLedger::new();
        for i in 0..count {
            let addr = format!("0x{:x}", i + 1);
            ledger.insert_entry(id(HANDLE), key(&addr), json!([format!("0x{:x}", 1000 + i)]));
        }
        ledger
    }

    #[tokio::test]
    async fn test_example_scenario() {
        let walker = TableWalker::new(deployment());
        let path: FieldPath = "incoming_stream.id".parse().unwrap();

        let handle = walker.resolve_storage_handle(&id(ROOT), &path).await.unwrap();
        assert_eq!(handle.id().as_str(), HANDLE);

        let page = walker.list_entries(&handle, None, None).await.unwrap();
        assert_eq!(page.entries.len(), 1);
        assert!(!page.has_more);
        assert!(page.next_cursor.is_none());
        assert_eq!(page.entries[0].key.type_, "address");
        assert_eq!(page.entries[0].key.value, json!(RECIPIENT));

        let streams: Vec<ObjectId> = walker.fetch_value(&handle, &key(RECIPIENT)).await.unwrap();
        assert_eq!(streams, vec![id(STREAM)]);
    }

    #[tokio::test]
    async fn test_missing_field_is_not_found() {
        let walker = TableWalker::new(deployment());
        let path: FieldPath = "outgoing_stream.id".parse().unwrap();
        let err = walker.resolve_storage_handle(&id(ROOT), &path).await.unwrap_err();
        assert!(matches!(err, WalkError::NotFound(_)));
        assert!(err.to_string().contains("outgoing_stream"));
    }

    #[tokio::test]
    async fn test_non_identifier_leaf_is_not_found() {
        let walker = TableWalker::new(deployment());
        let path: FieldPath = "incoming_stream.size".parse().unwrap();
        let err = walker.resolve_storage_handle(&id(ROOT), &path).await.unwrap_err();
        assert!(matches!(err, WalkError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_missing_root_is_not_found() {
        let walker = TableWalker::new(deployment());
        let path: FieldPath = "incoming_stream.id".parse().unwrap();
        let err = walker.resolve_storage_handle(&id("0xdead"), &path).await.unwrap_err();
        assert!(matches!(err, WalkError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_missing_key_is_not_found() {
        let walker = TableWalker::new(deployment());
        let err = walker
            .fetch_value::<Vec<ObjectId>>(&handle(), &key("0x1234"))
            .await
            .unwrap_err();
        assert!(matches!(err, WalkError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_pagination_completeness() {
        for (count, size) in [(0usize, 3usize), (1, 1), (7, 3), (9, 3), (10, 50)] {
            let walker = TableWalker::new(numbered_table(count));
            let page_size = NonZeroUsize::new(size);

            let mut seen = Vec::new();
            let mut cursor = None;
            loop {
                let page = walker
                    .list_entries(&handle(), cursor.as_ref(), page_size)
                    .await
                    .unwrap();
                assert!(page.entries.len() <= size);
                seen.extend(page.entries.into_iter().map(|e| e.object_id));
                if !page.has_more {
                    assert!(page.next_cursor.is_none());
                    break;
                }
                cursor = page.next_cursor;
            }

            assert_eq!(seen.len(), count);
            let mut unique = seen.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), count, "entries repeated for count={}", count);

            let collected = walker.collect_entries(&handle(), None, page_size).await.unwrap();
            assert_eq!(collected.len(), count);
        }
    }

    #[tokio::test]
    async fn test_rejected_cursor() {
        let walker = TableWalker::new(numbered_table(4));
        let bogus = Cursor::from("0xfeedface".to_string());
        let err = walker
            .list_entries(&handle(), Some(&bogus), NonZeroUsize::new(2))
            .await
            .unwrap_err();
        assert!(matches!(err, WalkError::InvalidCursor(_)));
    }

    #[tokio::test]
    async fn test_page_without_cursor_is_malformed() {
        let mut ledger = numbered_table(4);
        ledger.drop_cursors();
        let walker = TableWalker::new(ledger);
        let err = walker
            .list_entries(&handle(), None, NonZeroUsize::new(2))
            .await
            .unwrap_err();
        assert!(matches!(err, WalkError::RemoteUnavailable(_)));
    }

    #[tokio::test]
    async fn test_stuck_cursor_aborts_walk() {
        let mut ledger = numbered_table(6);
        ledger.repeat_cursors();
        let walker = TableWalker::new(ledger);
        let err = walker
            .collect_entries(&handle(), None, NonZeroUsize::new(2))
            .await
            .unwrap_err();
        assert!(matches!(err.error, WalkError::RemoteUnavailable(_)));
        assert_eq!(err.entries.len(), 4);
    }

    #[tokio::test]
    async fn test_interrupted_walk_keeps_progress_and_resumes() {
        let mut ledger = numbered_table(6);
        ledger.go_offline_after(2);
        let walker = TableWalker::new(ledger);
        let page_size = NonZeroUsize::new(2);

        let partial = walker
            .collect_entries(&handle(), None, page_size)
            .await
            .unwrap_err();
        assert!(matches!(partial.error, WalkError::RemoteUnavailable(_)));
        assert_eq!(partial.entries.len(), 4);
        let resume_from = partial.resume_from.clone().unwrap();
        assert_eq!(resume_from.as_str(), partial.entries[3].object_id.as_str());

        let healthy = TableWalker::new(numbered_table(6));
        let rest = healthy
            .collect_entries(&handle(), Some(&resume_from), page_size)
            .await
            .unwrap();
        assert_eq!(rest.len(), 2);

        let mut all: Vec<ObjectId> = partial
            .entries
            .into_iter()
            .chain(rest)
            .map(|e| e.object_id)
            .collect();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 6);
    }

    #[tokio::test]
    async fn test_failure_on_first_page_resumes_from_start() {
        let mut ledger = numbered_table(3);
        ledger.go_offline();
        let walker = TableWalker::new(ledger);
        let partial = walker
            .collect_entries(&handle(), None, NonZeroUsize::new(2))
            .await
            .unwrap_err();
        assert!(partial.entries.is_empty());
        assert!(partial.resume_from.is_none());
    }

    #[tokio::test]
    async fn test_transport_failure_is_remote_unavailable() {
        let mut ledger = deployment();
        ledger.go_offline();
        let walker = TableWalker::new(ledger);
        let path: FieldPath = "incoming_stream.id".parse().unwrap();
        let err = walker.resolve_storage_handle(&id(ROOT), &path).await.unwrap_err();
        assert!(matches!(err, WalkError::RemoteUnavailable(_)));
    }

    #[tokio::test]
    async fn test_undecodable_value() {
        let walker = TableWalker::new(deployment());
        let err = walker
            .fetch_value::<Vec<u64>>(&handle(), &key(RECIPIENT))
            .await
            .unwrap_err();
        assert!(matches!(err, WalkError::RemoteUnavailable(_)));
    }

    #[tokio::test]
    async fn test_no_cross_key_interference() {
        let mut ledger = numbered_table(25);
        ledger.insert_entry(id(HANDLE), key(RECIPIENT), json!([STREAM]));
        let crowded = TableWalker::new(ledger);
        let sparse = TableWalker::new(deployment());

        let a: Value = crowded.fetch_value(&handle(), &key(RECIPIENT)).await.unwrap();
        let b: Value = sparse.fetch_value(&handle(), &key(RECIPIENT)).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_idempotent_reads() {
        let walker = TableWalker::new(numbered_table(5));
        let path_walker = TableWalker::new(deployment());
        let path: FieldPath = "incoming_stream.id".parse().unwrap();

        let h1 = path_walker.resolve_storage_handle(&id(ROOT), &path).await.unwrap();
        let h2 = path_walker.resolve_storage_handle(&id(ROOT), &path).await.unwrap();
        assert_eq!(h1, h2);

        let p1 = walker.list_entries(&handle(), None, NonZeroUsize::new(2)).await.unwrap();
        let p2 = walker.list_entries(&handle(), None, NonZeroUsize::new(2)).await.unwrap();
        assert_eq!(p1, p2);

        let v1: Value = walker.fetch_value(&handle(), &key("0x3")).await.unwrap();
        let v2: Value = walker.fetch_value(&handle(), &key("0x3")).await.unwrap();
        assert_eq!(v1, v2);
    }

    #[tokio::test]
    async fn test_fetch_values_concurrently() {
        let walker = TableWalker::new(numbered_table(3));
        let keys = vec![key("0x1"), key("0x2"), key("0x3")];
        let values: Vec<Vec<ObjectId>> = walker.fetch_values(&handle(), &keys).await.unwrap();
        assert_eq!(values.len(), 3);
        assert_eq!(values[1], vec![id("0x3e9")]);

        let keys = vec![key("0x1"), key("0x99")];
        let err = walker
            .fetch_values::<Vec<ObjectId>>(&handle(), &keys)
            .await
            .unwrap_err();
        assert!(matches!(err, WalkError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_lookup() {
        let walker = TableWalker::new(deployment());
        let path: FieldPath = "incoming_stream.id".parse().unwrap();
        let streams: Vec<ObjectId> = walker.lookup(&id(ROOT), &path, &key(RECIPIENT)).await.unwrap();
        assert_eq!(streams, vec![id(STREAM)]);
    }
}
