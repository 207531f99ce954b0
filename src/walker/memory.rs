//! In-memory ledger used by unit tests.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::rpc::types::{
    DynamicFieldInfo, DynamicFieldName, DynamicFieldPage, DynamicFieldType, ObjectData,
    ObjectContent, ObjectDataOptions, ObjectId, ObjectResponse, ObjectResponseError, Page,
    RpcError, RpcResult, INVALID_PARAMS_CODE,
};
use crate::rpc::LedgerClient;

const DEFAULT_PAGE: usize = 50;

struct Entry {
    name: DynamicFieldName,
    value: Value,
    object_id: ObjectId,
}

/// Objects and tables held in memory, answering like a full node would.
#[derive(Default)]
pub(crate) struct MemoryLedger {
    objects: HashMap<ObjectId, Value>,
    tables: HashMap<ObjectId, Vec<Entry>>,
    next_child: u64,
    calls: AtomicUsize,
    offline_from: Option<usize>,
    failing_calls: Vec<usize>,
    drop_cursors: bool,
    repeat_cursors: bool,
}

impl MemoryLedger {
    pub(crate) fn new() -> Self {
        Self {
            next_child: 0xd000,
            ..Self::default()
        }
    }

    /// Add a Move object with the given content fields.
    pub(crate) fn insert_object(&mut self, id: ObjectId, fields: Value) {
        self.objects.insert(id, fields);
    }

    /// Append a table entry; insertion order is enumeration order.
    pub(crate) fn insert_entry(&mut self, table: ObjectId, name: DynamicFieldName, value: Value) {
        self.next_child += 1;
        let object_id: ObjectId = format!("0x{:x}", self.next_child).parse().unwrap();
        self.tables.entry(table).or_default().push(Entry {
            name,
            value,
            object_id,
        });
    }

    /// Every call fails at the transport level.
    pub(crate) fn go_offline(&mut self) {
        self.offline_from = Some(0);
    }

    /// Calls succeed until `calls` have been answered, then fail at the transport level.
    pub(crate) fn go_offline_after(&mut self, calls: usize) {
        self.offline_from = Some(calls);
    }

    /// The call with this zero-based index fails once at the transport level.
    pub(crate) fn fail_call(&mut self, index: usize) {
        self.failing_calls.push(index);
    }

    /// Number of calls answered or failed so far.
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Pages claim more entries but omit the cursor.
    pub(crate) fn drop_cursors(&mut self) {
        self.drop_cursors = true;
    }

    /// Every page returns the first page's cursor.
    pub(crate) fn repeat_cursors(&mut self) {
        self.repeat_cursors = true;
    }

    fn check_online(&self) -> RpcResult<()> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        let offline = self.offline_from.is_some_and(|from| index >= from);
        if offline || self.failing_calls.contains(&index) {
            Err(RpcError::Transport("connection refused".to_string()))
        } else {
            Ok(())
        }
    }

    fn move_object(id: &ObjectId, type_: &str, fields: Value) -> ObjectResponse {
        ObjectResponse {
            data: Some(ObjectData {
                object_id: id.clone(),
                version: 1,
                digest: "digest".to_string(),
                type_: Some(type_.to_string()),
                owner: None,
                content: Some(ObjectContent::MoveObject {
                    type_: type_.to_string(),
                    has_public_transfer: false,
                    fields,
                }),
            }),
            error: None,
        }
    }
}

#[async_trait]
impl LedgerClient for MemoryLedger {
    async fn get_object(
        &self,
        id: &ObjectId,
        _options: &ObjectDataOptions,
    ) -> RpcResult<ObjectResponse> {
        self.check_online()?;
        Ok(match self.objects.get(id) {
            Some(fields) => Self::move_object(id, "0x0::test::Root", fields.clone()),
            None => ObjectResponse {
                data: None,
                error: Some(ObjectResponseError::NotExists {
                    object_id: id.to_string(),
                }),
            },
        })
    }

    async fn get_dynamic_fields(
        &self,
        parent: &ObjectId,
        cursor: Option<&str>,
        limit: Option<usize>,
    ) -> RpcResult<DynamicFieldPage> {
        self.check_online()?;
        let entries = self.tables.get(parent).map(Vec::as_slice).unwrap_or(&[]);

        let start = match cursor {
            None => 0,
            Some(c) => match entries.iter().position(|e| e.object_id.as_str() == c) {
                Some(pos) => pos + 1,
                None => {
                    return Err(RpcError::Call {
                        code: INVALID_PARAMS_CODE,
                        message: format!("invalid cursor {}", c),
                    })
                }
            },
        };
        let limit = limit.unwrap_or(DEFAULT_PAGE);
        let end = (start + limit).min(entries.len());
        let slice = &entries[start..end];
        let has_next_page = end < entries.len();

        let next_cursor = if self.drop_cursors {
            None
        } else if self.repeat_cursors {
            entries.get(limit.saturating_sub(1)).map(|e| e.object_id.to_string())
        } else {
            slice.last().map(|e| e.object_id.to_string())
        };

        Ok(Page {
            data: slice
                .iter()
                .map(|e| DynamicFieldInfo {
                    name: e.name.clone(),
                    bcs_name: None,
                    type_: DynamicFieldType::DynamicField,
                    object_type: "vector<0x2::object::ID>".to_string(),
                    object_id: e.object_id.clone(),
                    version: 1,
                    digest: "digest".to_string(),
                })
                .collect(),
            next_cursor,
            has_next_page,
        })
    }

    async fn get_dynamic_field_object(
        &self,
        parent: &ObjectId,
        name: &DynamicFieldName,
    ) -> RpcResult<ObjectResponse> {
        self.check_online()?;
        let found = self
            .tables
            .get(parent)
            .and_then(|entries| entries.iter().find(|e| &e.name == name));

        Ok(match found {
            Some(entry) => Self::move_object(
                &entry.object_id,
                "0x2::dynamic_field::Field<address, vector<0x2::object::ID>>",
                json!({
                    "id": { "id": entry.object_id.as_str() },
                    "name": entry.name.value.clone(),
                    "value": entry.value.clone(),
                }),
            ),
            None => ObjectResponse {
                data: None,
                error: Some(ObjectResponseError::DynamicFieldNotFound {
                    parent_object_id: parent.to_string(),
                }),
            },
        })
    }
}
