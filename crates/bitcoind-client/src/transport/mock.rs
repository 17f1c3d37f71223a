use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use serde_json::Value;

use crate::error::ClientError;

use super::{HttpRequest, HttpResponse, Transport};

type Responder = Box<dyn Fn(&HttpRequest) -> HttpResponse + Send + Sync>;

/// A transport that records every request and answers through a canned
/// responder. Without a responder every call answers `{"result":null}`.
pub struct MockTransport {
    requests: Mutex<Vec<HttpRequest>>,
    responder: Responder,
}

impl MockTransport {
    pub fn builder() -> MockTransportBuilder {
        MockTransportBuilder {
            responder: Box::new(|_| json_response(StatusCode::OK, &serde_json::json!({
                "result": null,
                "error": null,
                "id": null
            }))),
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("mock lock poisoned").clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("mock lock poisoned").len()
    }
}

pub struct MockTransportBuilder {
    responder: Responder,
}

impl MockTransportBuilder {
    pub fn with_responder(
        mut self,
        responder: impl Fn(&HttpRequest) -> HttpResponse + Send + Sync + 'static,
    ) -> Self {
        self.responder = Box::new(responder);
        self
    }

    /// Answer every JSON-RPC call, single or batch, by echoing its id
    /// around the value `handler` returns for the call's method and params.
    pub fn with_rpc_handler(
        self,
        handler: impl Fn(&str, &Value) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.with_responder(move |request| {
            let body: Value = request
                .body
                .as_deref()
                .and_then(|body| serde_json::from_str(body).ok())
                .unwrap_or(Value::Null);
            let answer = |call: &Value| {
                let method = call.get("method").and_then(Value::as_str).unwrap_or("");
                let params = call.get("params").unwrap_or(&Value::Null);
                let mut envelope = handler(method, params);
                if let Some(object) = envelope.as_object_mut() {
                    object.insert("id".to_owned(), call.get("id").cloned().unwrap_or(Value::Null));
                }
                envelope
            };
            let reply = match &body {
                Value::Array(calls) => Value::Array(calls.iter().map(answer).collect()),
                call => answer(call),
            };
            json_response(StatusCode::OK, &reply)
        })
    }

    pub fn build(self) -> MockTransport {
        MockTransport {
            requests: Mutex::new(Vec::new()),
            responder: self.responder,
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        let response = (self.responder)(&request);
        self.requests
            .lock()
            .expect("mock lock poisoned")
            .push(request);
        Ok(response)
    }
}

pub fn json_response(status: StatusCode, body: &Value) -> HttpResponse {
    raw_response(status, "application/json", body.to_string().into_bytes())
}

pub fn raw_response(status: StatusCode, content_type: &str, body: Vec<u8>) -> HttpResponse {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(content_type) {
        headers.insert(CONTENT_TYPE, value);
    }
    HttpResponse {
        status,
        headers,
        body,
    }
}

/// A successful JSON-RPC envelope around `result`.
pub fn rpc_success(result: Value) -> Value {
    serde_json::json!({ "result": result, "error": null })
}

pub fn rpc_failure(code: i64, message: &str) -> Value {
    serde_json::json!({ "result": null, "error": { "code": code, "message": message } })
}
