//! Response Parser for the JSON-RPC and REST interfaces.
//!
//! Bodies are decoded with arbitrary-precision numbers and any integer a
//! double cannot represent exactly is handed back as its decimal string, so
//! amounts and counters never silently lose digits.

use std::collections::HashMap;
use std::ops::Deref;

use reqwest::header::HeaderMap;
use serde_json::Value;
use tracing::warn;

use crate::error::{ClientError, RpcError};
use crate::rest::{Extension, RestPayload};
use crate::transport::HttpResponse;

/// Largest integer an IEEE-754 double holds exactly (2^53 - 1).
pub const MAX_SAFE_INTEGER: u64 = 9_007_199_254_740_991;

const DEFAULT_ERROR_MESSAGE: &str = "An error occurred while processing the RPC call to bitcoind";
const MISSING_RESULT_MESSAGE: &str = "Missing `result` on the RPC call result";

/// A decoded payload, with the response headers when the client was
/// configured to pass them through.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply<T> {
    payload: T,
    headers: Option<HeaderMap>,
}

impl<T> Reply<T> {
    pub fn new(payload: T, headers: Option<HeaderMap>) -> Self {
        Self { payload, headers }
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    pub fn headers(&self) -> Option<&HeaderMap> {
        self.headers.as_ref()
    }

    pub fn into_payload(self) -> T {
        self.payload
    }

    pub fn into_parts(self) -> (T, Option<HeaderMap>) {
        (self.payload, self.headers)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reply<U> {
        Reply {
            payload: f(self.payload),
            headers: self.headers,
        }
    }
}

impl<T> Deref for Reply<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.payload
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Parser {
    headers: bool,
}

impl Parser {
    pub fn new(headers: bool) -> Self {
        Self { headers }
    }

    /// Parse the response to a single call.
    pub fn rpc(&self, response: HttpResponse) -> Result<Reply<Value>, ClientError> {
        reject_error_page(&response)?;
        let body = decode_json(&response.body)?;
        let result = rpc_result(body)?;
        Ok(self.reply(result, response.headers))
    }

    /// Parse the response to a batch sent with `ids`, in that order.
    ///
    /// A failed call is returned as its error at its position; it never fails
    /// the rest of the batch. A body that is not an array is parsed as one
    /// response and its error raised.
    pub fn rpc_batch(
        &self,
        response: HttpResponse,
        ids: &[String],
    ) -> Result<Reply<Vec<Result<Value, RpcError>>>, ClientError> {
        reject_error_page(&response)?;
        let body = decode_json(&response.body)?;

        let items = match body {
            Value::Array(items) => items,
            single => {
                rpc_result(single)?;
                return Err(RpcError::new(
                    RpcError::PARSE_ERROR,
                    "Expected a batch response but received a single result",
                )
                .into());
            }
        };

        let mut by_id: HashMap<String, Value> = HashMap::with_capacity(items.len());
        for item in items {
            let id = item.get("id").map(id_key).unwrap_or_default();
            by_id.insert(id, item);
        }

        let batch: Vec<_> = ids
            .iter()
            .map(|id| match by_id.remove(id) {
                Some(item) => rpc_result(item),
                None => Err(RpcError::new(
                    RpcError::PARSE_ERROR,
                    format!("Missing response for batch request `{id}`"),
                )),
            })
            .collect();

        if !by_id.is_empty() {
            warn!(
                rpc.batch_size = ids.len(),
                rpc.unmatched = by_id.len(),
                "ignoring batch responses with unknown ids"
            );
        }

        Ok(self.reply(batch, response.headers))
    }

    /// Parse a REST response requested with `extension`.
    pub fn rest(
        &self,
        extension: Extension,
        response: HttpResponse,
    ) -> Result<Reply<RestPayload>, ClientError> {
        reject_plaintext_error(&response)?;
        let HttpResponse { headers, body, .. } = response;
        let payload = match extension {
            Extension::Json => RestPayload::Json(decode_json(&body)?),
            Extension::Hex => RestPayload::Hex(String::from_utf8_lossy(&body).into_owned()),
            Extension::Bin => RestPayload::Binary(body),
        };
        Ok(self.reply(payload, headers))
    }

    /// Parse a REST response from a JSON-only endpoint.
    pub fn rest_json(&self, response: HttpResponse) -> Result<Reply<Value>, ClientError> {
        reject_plaintext_error(&response)?;
        let payload = decode_json(&response.body)?;
        Ok(self.reply(payload, response.headers))
    }

    fn reply<T>(&self, payload: T, headers: HeaderMap) -> Reply<T> {
        Reply::new(payload, self.headers.then_some(headers))
    }
}

/// Decode a JSON body, turning integers beyond [`MAX_SAFE_INTEGER`] into
/// strings holding their exact digits.
pub fn decode_json(body: &[u8]) -> Result<Value, serde_json::Error> {
    let mut value: Value = serde_json::from_slice(body)?;
    preserve_large_integers(&mut value);
    Ok(value)
}

fn preserve_large_integers(value: &mut Value) {
    match value {
        Value::Number(number) => {
            let digits = number.to_string();
            if !is_integer_literal(&digits) {
                return;
            }
            let magnitude = digits.strip_prefix('-').unwrap_or(&digits);
            let safe = magnitude
                .parse::<u64>()
                .is_ok_and(|n| n <= MAX_SAFE_INTEGER);
            if !safe {
                *value = Value::String(digits);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(preserve_large_integers),
        Value::Object(map) => map.values_mut().for_each(preserve_large_integers),
        Value::Null | Value::Bool(_) | Value::String(_) => {}
    }
}

fn is_integer_literal(literal: &str) -> bool {
    !literal.contains(|c| matches!(c, '.' | 'e' | 'E'))
}

/// The daemon answers authentication failures and some overload conditions
/// with an HTML page instead of a JSON envelope.
fn reject_error_page(response: &HttpResponse) -> Result<(), RpcError> {
    if response.is_json() || response.status.is_success() {
        return Ok(());
    }
    Err(RpcError::new(
        i64::from(response.status.as_u16()),
        response.status.canonical_reason().unwrap_or_default(),
    )
    .with_body(String::from_utf8_lossy(&response.body)))
}

/// REST errors arrive as `text/plain` lines terminated by CRLF.
fn reject_plaintext_error(response: &HttpResponse) -> Result<(), RpcError> {
    if response.is_json() || response.status.is_success() {
        return Ok(());
    }
    let body = String::from_utf8_lossy(&response.body).into_owned();
    let message = body.strip_suffix("\r\n").unwrap_or(&body).to_owned();
    Err(RpcError::new(i64::from(response.status.as_u16()), message).with_body(body))
}

/// Extract `result` from a response envelope, raising its `error`.
///
/// An envelope without an `error` member is read as `error: null`, so
/// JSON-RPC 2.0 style success replies are accepted as well.
fn rpc_result(body: Value) -> Result<Value, RpcError> {
    let Value::Object(mut body) = body else {
        return Err(RpcError::new(RpcError::PARSE_ERROR, MISSING_RESULT_MESSAGE));
    };

    match body.remove("error") {
        None | Some(Value::Null) => {}
        Some(error) => {
            let code = error
                .get("code")
                .and_then(Value::as_i64)
                .unwrap_or(RpcError::INTERNAL_ERROR);
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or(DEFAULT_ERROR_MESSAGE);
            return Err(RpcError::new(code, message));
        }
    }

    body.remove("result")
        .ok_or_else(|| RpcError::new(RpcError::PARSE_ERROR, MISSING_RESULT_MESSAGE))
}

fn id_key(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
