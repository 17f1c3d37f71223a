//! Request Builder: turns a method name and its arguments into a wire
//! request, rejecting methods the configured daemon version lacks.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ClientError;
use crate::version::Capabilities;

/// Parameters of one RPC call, either by position or by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Params {
    Positional(Vec<Value>),
    Named(Map<String, Value>),
}

impl Default for Params {
    fn default() -> Self {
        Self::Positional(Vec::new())
    }
}

impl From<Vec<Value>> for Params {
    fn from(params: Vec<Value>) -> Self {
        Self::Positional(params)
    }
}

impl From<Map<String, Value>> for Params {
    fn from(params: Map<String, Value>) -> Self {
        Self::Named(params)
    }
}

impl From<Params> for Value {
    fn from(params: Params) -> Self {
        match params {
            Params::Positional(list) => Value::Array(list),
            Params::Named(map) => Value::Object(map),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub jsonrpc: String,
    pub id: String,
    pub method: String,
    pub params: Params,
}

/// One element of a batch: a method and its positional arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchCall {
    pub method: String,
    #[serde(default)]
    pub params: Vec<Value>,
}

impl BatchCall {
    pub fn new(method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }
}

pub struct Requester {
    capabilities: Capabilities,
    next_id: AtomicU64,
}

impl Requester {
    pub fn new(capabilities: Capabilities) -> Self {
        Self {
            capabilities,
            next_id: AtomicU64::new(initial_request_id()),
        }
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Prepare a single call.
    pub fn prepare(&self, method: &str, params: Vec<Value>) -> Result<Request, ClientError> {
        let id = self.reserve_request_id().to_string();
        self.build(method, params, id)
    }

    /// Prepare every element of a batch. Ids share one token and carry the
    /// element position as a `-<index>` suffix.
    ///
    /// Each element is validated on its own; the first unsupported element
    /// in input order is reported.
    pub fn prepare_batch(&self, calls: Vec<BatchCall>) -> Result<Vec<Request>, ClientError> {
        let token = self.reserve_request_id();
        calls
            .into_iter()
            .enumerate()
            .map(|(index, call)| self.build(&call.method, call.params, format!("{token}-{index}")))
            .collect()
    }

    fn build(&self, method: &str, params: Vec<Value>, id: String) -> Result<Request, ClientError> {
        let method = method.to_ascii_lowercase();

        if let Some(version) = self.capabilities.version() {
            if !self.capabilities.is_supported(&method) {
                return Err(ClientError::UnsupportedMethod {
                    method,
                    version: version.to_string(),
                });
            }
        }

        Ok(Request {
            jsonrpc: "1.0".to_owned(),
            id,
            method,
            params: self.shape(params),
        })
    }

    /// A lone object argument becomes named parameters when the daemon
    /// understands them.
    fn shape(&self, mut params: Vec<Value>) -> Params {
        if self.capabilities.supports_named_parameters() {
            if let [Value::Object(_)] = params.as_slice() {
                if let Some(Value::Object(named)) = params.pop() {
                    return Params::Named(named);
                }
            }
        }
        Params::Positional(params)
    }

    fn reserve_request_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

fn initial_request_id() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(1)
}
