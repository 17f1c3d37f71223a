//! Masks secrets out of the logged copies of requests and responses.
//!
//! The engine only knows the envelope shapes (single or batch, positional
//! or named); which fields are sensitive is decided by the obfuscators
//! registered on each [`MethodDescriptor`]. Nothing here touches the bytes
//! that are sent or returned, and bodies that do not parse are logged as-is.
//!
//! [`MethodDescriptor`]: crate::registry::MethodDescriptor

pub mod rules;

use std::borrow::Cow;

use serde_json::Value;

use crate::registry::Registry;
use crate::request::Params;
use crate::transport::media_type;

pub const MASK: &str = "******";

const BASIC_SCHEME: &str = "Basic ";

#[derive(Debug, Clone, Copy, Default)]
pub struct Obfuscator {
    registry: Registry,
}

impl Obfuscator {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    /// Hide the credentials of a `Basic` authorization header, keeping the
    /// scheme.
    pub fn authorization<'a>(&self, value: &'a str) -> Cow<'a, str> {
        match value.find(BASIC_SCHEME) {
            Some(start) => {
                let prefix = &value[..start + BASIC_SCHEME.len()];
                Cow::Owned(format!("{prefix}{MASK}"))
            }
            None => Cow::Borrowed(value),
        }
    }

    /// Mask the parameters of every call in a single or batch request body.
    pub fn request_body<'a>(&self, body: &'a str) -> Cow<'a, str> {
        let Ok(mut parsed) = serde_json::from_str::<Value>(body) else {
            return Cow::Borrowed(body);
        };

        let changed = match &mut parsed {
            Value::Array(calls) => calls
                .iter_mut()
                .fold(false, |changed, call| self.mask_call(call) || changed),
            call => self.mask_call(call),
        };

        reserialize(body, &parsed, changed)
    }

    /// Mask the results of a response body.
    ///
    /// Responses do not name their method, so each one is matched to the
    /// originating call through `request_body` (by `id` for batches).
    /// Binary payloads are replaced wholesale.
    pub fn response_body<'a>(
        &self,
        request_body: Option<&str>,
        content_type: Option<&str>,
        body: &'a [u8],
    ) -> Cow<'a, str> {
        if content_type.is_some_and(|ct| media_type(ct) == "application/octet-stream") {
            return Cow::Borrowed(MASK);
        }

        let text = String::from_utf8_lossy(body);
        let Some(request_body) = request_body else {
            return text;
        };
        let (Ok(request), Ok(mut parsed)) = (
            serde_json::from_str::<Value>(request_body),
            serde_json::from_str::<Value>(&text),
        ) else {
            return text;
        };

        let changed = match (&request, &mut parsed) {
            (Value::Array(calls), Value::Array(responses)) => {
                responses.iter_mut().fold(false, |changed, response| {
                    let method = response
                        .get("id")
                        .and_then(|id| calls.iter().find(|call| call.get("id") == Some(id)))
                        .and_then(|call| call.get("method"))
                        .and_then(Value::as_str);
                    let masked = method.is_some_and(|m| self.mask_result(m, response));
                    masked || changed
                })
            }
            (call, response) => call
                .get("method")
                .and_then(Value::as_str)
                .is_some_and(|m| self.mask_result(m, response)),
        };

        if !changed {
            return text;
        }
        match serde_json::to_string(&parsed) {
            Ok(masked) => Cow::Owned(masked),
            Err(_) => text,
        }
    }

    fn mask_call(&self, call: &mut Value) -> bool {
        let Some(obfuscate) = call
            .get("method")
            .and_then(Value::as_str)
            .and_then(|method| self.registry.lookup(method))
            .and_then(|method| method.obfuscate_request)
        else {
            return false;
        };
        let Some(params) = call.get_mut("params") else {
            return false;
        };

        let mut shaped = match params.take() {
            Value::Array(list) => Params::Positional(list),
            Value::Object(map) => Params::Named(map),
            other => {
                *params = other;
                return false;
            }
        };
        obfuscate(&mut shaped);
        *params = shaped.into();
        true
    }

    fn mask_result(&self, method: &str, response: &mut Value) -> bool {
        let Some(obfuscate) = self
            .registry
            .lookup(method)
            .and_then(|method| method.obfuscate_response)
        else {
            return false;
        };
        match response.get_mut("result") {
            Some(result) if !is_blank(result) => {
                obfuscate(result);
                true
            }
            _ => false,
        }
    }
}

fn reserialize<'a>(original: &'a str, parsed: &Value, changed: bool) -> Cow<'a, str> {
    if !changed {
        return Cow::Borrowed(original);
    }
    match serde_json::to_string(parsed) {
        Ok(masked) => Cow::Owned(masked),
        Err(_) => Cow::Borrowed(original),
    }
}

/// Scalars count as blank: only non-empty strings and containers are masked.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Null | Value::Bool(_) | Value::Number(_) => true,
    }
}
