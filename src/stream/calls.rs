//! Move call descriptions for the `stream` module.

use serde::Serialize;
use serde_json::Value;

use crate::rpc::types::{Address, ObjectId};
use crate::stream::{StreamError, StreamResult};

const STREAM_MODULE: &str = "stream";

/// One Move call argument, rendered as the node expects it in `unsafe_moveCall`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallArg {
    Object(ObjectId),
    Address(Address),
    /// Serialised as a decimal string.
    U64(u64),
    Bool(bool),
    String(String),
}

impl CallArg {
    pub fn to_json(&self) -> Value {
        match self {
            CallArg::Object(id) => Value::String(id.to_string()),
            CallArg::Address(addr) => Value::String(addr.to_hex()),
            CallArg::U64(n) => Value::String(n.to_string()),
            CallArg::Bool(b) => Value::Bool(*b),
            CallArg::String(s) => Value::String(s.clone()),
        }
    }
}

/// A fully described entry function call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveCall {
    pub package: ObjectId,
    pub module: String,
    pub function: String,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<CallArg>,
}

impl MoveCall {
    /// `package::module::function`
    pub fn target(&self) -> String {
        format!("{}::{}::{}", self.package, self.module, self.function)
    }

    pub fn json_arguments(&self) -> Vec<Value> {
        self.arguments.iter().map(CallArg::to_json).collect()
    }
}

/// Parameters of a new payment stream. Times are unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateStream {
    pub global_config: ObjectId,
    /// Coin object funding the deposit.
    pub coin: ObjectId,
    pub name: String,
    pub remark: String,
    pub recipient: Address,
    pub deposit_amount: u64,
    pub start_time: u64,
    pub stop_time: u64,
    /// Release interval in seconds.
    pub interval: u64,
    pub closeable: bool,
    pub modifiable: bool,
}

impl CreateStream {
    pub fn validate(&self) -> StreamResult<()> {
        if self.start_time >= self.stop_time {
            return Err(StreamError::InvalidParams(format!(
                "start_time {} must be before stop_time {}",
                self.start_time, self.stop_time
            )));
        }
        if self.interval == 0 {
            return Err(StreamError::InvalidParams(
                "interval must be greater than 0".to_string(),
            ));
        }
        if self.deposit_amount == 0 {
            return Err(StreamError::InvalidParams(
                "deposit_amount must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builds calls against one deployed stream package for one coin type.
#[derive(Debug, Clone)]
pub struct StreamCalls {
    package: ObjectId,
    coin_type: String,
}

impl StreamCalls {
    pub fn new(package: ObjectId, coin_type: impl Into<String>) -> Self {
        Self {
            package,
            coin_type: coin_type.into(),
        }
    }

    fn call(&self, function: &str, arguments: Vec<CallArg>) -> MoveCall {
        MoveCall {
            package: self.package.clone(),
            module: STREAM_MODULE.to_string(),
            function: function.to_string(),
            type_arguments: vec![self.coin_type.clone()],
            arguments,
        }
    }

    pub fn create(&self, params: &CreateStream) -> StreamResult<MoveCall> {
        params.validate()?;
        Ok(self.call(
            "create",
            vec![
                CallArg::Object(params.global_config.clone()),
                CallArg::Object(params.coin.clone()),
                CallArg::String(params.name.clone()),
                CallArg::String(params.remark.clone()),
                CallArg::Address(params.recipient),
                CallArg::U64(params.deposit_amount),
                CallArg::U64(params.start_time),
                CallArg::U64(params.stop_time),
                CallArg::U64(params.interval),
                CallArg::Bool(params.closeable),
                CallArg::Bool(params.modifiable),
                CallArg::Object(ObjectId::clock()),
            ],
        ))
    }

    pub fn close_from_sender(&self, global_config: &ObjectId, stream: &ObjectId) -> MoveCall {
        self.call(
            "close_from_sender",
            vec![
                CallArg::Object(global_config.clone()),
                CallArg::Object(stream.clone()),
                CallArg::Object(ObjectId::clock()),
            ],
        )
    }

    /// Admin call enabling `coin_type` for streams, with a fee in basis points.
    pub fn register_coin(
        &self,
        manager_cap: &ObjectId,
        global_config: &ObjectId,
        fee_point: u64,
    ) -> MoveCall {
        self.call(
            "register_coin",
            vec![
                CallArg::Object(manager_cap.clone()),
                CallArg::Object(global_config.clone()),
                CallArg::U64(fee_point),
            ],
        )
    }
}
