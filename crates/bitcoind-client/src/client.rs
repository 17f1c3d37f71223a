//! Client facade tying the registry, version gate, request builder,
//! transport and parser together.

use serde_json::Value;
use tracing::debug;

use crate::config::ClientBuilder;
use crate::error::{ClientError, RpcError};
use crate::parser::{Parser, Reply};
use crate::registry::Feature;
use crate::request::{BatchCall, Requester};
use crate::transport::{HttpRequest, Transport};
use crate::version::Capabilities;

/// Result of a batch: one entry per call, in call order.
pub type BatchReply = Reply<Vec<Result<Value, RpcError>>>;

/// Bitcoin Core JSON-RPC and REST client.
///
/// Every method of the registry is also available as a same-named async
/// method (`client.get_block_count(vec![])`), generated alongside the
/// registry table.
pub struct Client {
    transport: Box<dyn Transport>,
    requester: Requester,
    parser: Parser,
    wallet: Option<String>,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    pub(crate) fn new(
        transport: Box<dyn Transport>,
        capabilities: Capabilities,
        headers: bool,
        wallet: Option<String>,
    ) -> Self {
        Self {
            transport,
            requester: Requester::new(capabilities),
            parser: Parser::new(headers),
            wallet,
        }
    }

    pub fn capabilities(&self) -> &Capabilities {
        self.requester.capabilities()
    }

    pub fn wallet(&self) -> Option<&str> {
        self.wallet.as_deref()
    }

    /// Call `method` with positional `params`.
    ///
    /// A single object argument is sent as named parameters when the
    /// configured daemon version supports them. Methods the configured
    /// version lacks fail before anything is sent.
    pub async fn command(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<Reply<Value>, ClientError> {
        let request = self.requester.prepare(method, params)?;
        let path = self.rpc_path([request.method.as_str()]);
        debug!(
            rpc.id = %request.id,
            rpc.method = %request.method,
            rpc.path = %path,
            "sending RPC call"
        );

        let body = serde_json::to_string(&request)?;
        let response = self.transport.send(HttpRequest::post(path, body)).await?;
        self.parser.rpc(response)
    }

    /// Send `calls` as one HTTP request.
    ///
    /// A failing call does not fail the batch: its error takes its place in
    /// the result. An empty batch returns without contacting the daemon.
    pub async fn command_batch(&self, calls: Vec<BatchCall>) -> Result<BatchReply, ClientError> {
        if calls.is_empty() {
            return Ok(Reply::new(Vec::new(), None));
        }

        let requests = self.requester.prepare_batch(calls)?;
        let path = self.rpc_path(requests.iter().map(|request| request.method.as_str()));
        let ids: Vec<String> = requests.iter().map(|request| request.id.clone()).collect();
        debug!(
            rpc.batch_size = requests.len(),
            rpc.path = %path,
            "sending RPC batch"
        );

        let body = serde_json::to_string(&requests)?;
        let response = self.transport.send(HttpRequest::post(path, body)).await?;
        self.parser.rpc_batch(response, &ids)
    }

    /// `/wallet/<name>` when a wallet is configured and any of `methods`
    /// accepts wallet routing, `/` otherwise. The wallet name is sent as
    /// given, without percent-encoding.
    fn rpc_path<'a>(&self, methods: impl IntoIterator<Item = &'a str>) -> String {
        let Some(wallet) = &self.wallet else {
            return "/".to_owned();
        };
        let capabilities = self.capabilities();
        if methods
            .into_iter()
            .any(|method| capabilities.supports_feature(method, Feature::MultiWallet))
        {
            format!("/wallet/{wallet}")
        } else {
            "/".to_owned()
        }
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    pub(crate) fn parser(&self) -> &Parser {
        &self.parser
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::transport::mock::{rpc_failure, rpc_success, MockTransport};
    use crate::transport::HttpMethod;

    fn rpc_client(builder: ClientBuilder, transport: MockTransport) -> (Client, Arc<MockTransport>) {
        let transport = Arc::new(transport);
        let client = builder
            .build_with_transport(Arc::clone(&transport))
            .expect("client must build");
        (client, transport)
    }

    fn sent_body(transport: &MockTransport) -> Value {
        let requests = transport.requests();
        let request = requests.last().expect("a request must have been sent");
        assert_eq!(request.method, HttpMethod::Post);
        serde_json::from_str(request.body.as_deref().expect("rpc requests carry a body"))
            .expect("body must be json")
    }

    #[tokio::test]
    async fn command_returns_result() {
        let (client, transport) = rpc_client(
            Client::builder(),
            MockTransport::builder()
                .with_rpc_handler(|_, _| rpc_success(json!(800_000)))
                .build(),
        );

        let reply = client
            .command("getblockcount", Vec::new())
            .await
            .expect("call must succeed");

        assert_eq!(reply.as_u64(), Some(800_000));
        let body = sent_body(&transport);
        assert_eq!(body["jsonrpc"], "1.0");
        assert_eq!(body["method"], "getblockcount");
        assert_eq!(body["params"], json!([]));
        assert!(body["id"].is_string());
        assert_eq!(transport.requests()[0].path, "/");
    }

    #[tokio::test]
    async fn generated_methods_forward_to_command() {
        let (client, transport) = rpc_client(
            Client::builder(),
            MockTransport::builder()
                .with_rpc_handler(|method, params| rpc_success(json!({ "method": method, "params": params })))
                .build(),
        );

        let reply = client
            .get_block_hash(vec![json!(0)])
            .await
            .expect("call must succeed");

        assert_eq!(reply.payload(), &json!({ "method": "getblockhash", "params": [0] }));
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn unsupported_method_sends_nothing() {
        let (client, transport) = rpc_client(
            Client::builder().version("0.12.0"),
            MockTransport::builder().build(),
        );

        let err = client
            .bump_fee(vec![json!("txid")])
            .await
            .expect_err("bumpfee needs 0.14.0");

        assert!(matches!(
            err,
            ClientError::UnsupportedMethod { ref method, ref version }
                if method == "bumpfee" && version == "0.12.0"
        ));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn rpc_error_is_raised() {
        let (client, _transport) = rpc_client(
            Client::builder(),
            MockTransport::builder()
                .with_rpc_handler(|_, _| rpc_failure(-8, "Block height out of range"))
                .build(),
        );

        let err = client
            .command("getblockhash", vec![json!(-1)])
            .await
            .expect_err("call must fail");

        assert_eq!(err.to_string(), "RpcError: -8 Block height out of range");
    }

    #[tokio::test]
    async fn named_parameters_follow_version() {
        let handler = || {
            MockTransport::builder()
                .with_rpc_handler(|_, _| rpc_success(Value::Null))
                .build()
        };
        let named = json!({ "height": 1 });

        let (client, transport) = rpc_client(Client::builder().version("0.15.0"), handler());
        client
            .command("getblockhash", vec![named.clone()])
            .await
            .expect("call must succeed");
        assert_eq!(sent_body(&transport)["params"], named);

        let (client, transport) = rpc_client(Client::builder().version("0.13.0"), handler());
        client
            .command("getblockhash", vec![named.clone()])
            .await
            .expect("call must succeed");
        assert_eq!(sent_body(&transport)["params"], json!([named]));
    }

    #[tokio::test]
    async fn wallet_routing_depends_on_method() {
        let (client, transport) = rpc_client(
            Client::builder().wallet("savings"),
            MockTransport::builder()
                .with_rpc_handler(|_, _| rpc_success(Value::Null))
                .build(),
        );

        client
            .get_balance(Vec::new())
            .await
            .expect("call must succeed");
        client
            .get_block_count(Vec::new())
            .await
            .expect("call must succeed");

        let paths: Vec<_> = transport.requests().into_iter().map(|r| r.path).collect();
        assert_eq!(paths, ["/wallet/savings", "/"]);
    }

    #[tokio::test]
    async fn wallet_routing_respects_feature_version() {
        let (client, transport) = rpc_client(
            Client::builder().wallet("savings").version("0.14.0"),
            MockTransport::builder()
                .with_rpc_handler(|_, _| rpc_success(Value::Null))
                .build(),
        );

        client
            .get_balance(Vec::new())
            .await
            .expect("call must succeed");

        assert_eq!(transport.requests()[0].path, "/");
    }

    #[tokio::test]
    async fn batch_isolates_failures() {
        let (client, transport) = rpc_client(
            Client::builder(),
            MockTransport::builder()
                .with_rpc_handler(|method, _| match method {
                    "getblockcount" => rpc_success(json!(101)),
                    _ => rpc_failure(-32601, "Method not found"),
                })
                .build(),
        );

        let reply = client
            .command_batch(vec![
                BatchCall::new("getblockcount", Vec::new()),
                BatchCall::new("nosuchmethod", Vec::new()),
                BatchCall::new("getBlockCount", Vec::new()),
            ])
            .await
            .expect("batch must succeed");

        assert_eq!(reply.len(), 3);
        assert_eq!(reply[0].as_ref().expect("first must succeed").as_u64(), Some(101));
        assert_eq!(reply[1].as_ref().expect_err("second must fail").code, -32601);
        assert!(reply[2].is_ok());

        let body = sent_body(&transport);
        let ids: Vec<_> = body
            .as_array()
            .expect("batch body is an array")
            .iter()
            .map(|call| call["id"].as_str().expect("ids are strings").to_owned())
            .collect();
        let token = ids[0].trim_end_matches("-0");
        assert_eq!(ids, [format!("{token}-0"), format!("{token}-1"), format!("{token}-2")]);
    }

    #[tokio::test]
    async fn batch_with_unsupported_call_sends_nothing() {
        let (client, transport) = rpc_client(
            Client::builder().version("0.12.0"),
            MockTransport::builder().build(),
        );

        let err = client
            .command_batch(vec![
                BatchCall::new("getblockcount", Vec::new()),
                BatchCall::new("bumpfee", vec![json!("txid")]),
                BatchCall::new("abandontransaction", vec![json!("txid")]),
            ])
            .await
            .expect_err("batch must be rejected");

        assert!(matches!(
            err,
            ClientError::UnsupportedMethod { ref method, .. } if method == "bumpfee"
        ));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn empty_batch_sends_nothing() {
        let (client, transport) = rpc_client(Client::builder(), MockTransport::builder().build());

        let reply = client
            .command_batch(Vec::new())
            .await
            .expect("empty batch must succeed");

        assert!(reply.is_empty());
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn batch_routes_to_wallet_when_any_call_supports_it() {
        let (client, transport) = rpc_client(
            Client::builder().wallet("w1"),
            MockTransport::builder()
                .with_rpc_handler(|_, _| rpc_success(Value::Null))
                .build(),
        );

        client
            .command_batch(vec![
                BatchCall::new("getblockcount", Vec::new()),
                BatchCall::new("getbalance", Vec::new()),
            ])
            .await
            .expect("batch must succeed");

        assert_eq!(transport.requests()[0].path, "/wallet/w1");
    }

    #[tokio::test]
    async fn headers_are_returned_when_enabled() {
        let (client, _transport) = rpc_client(
            Client::builder().headers(true),
            MockTransport::builder()
                .with_rpc_handler(|_, _| rpc_success(json!("ok")))
                .build(),
        );

        let (payload, headers) = client
            .command("uptime", Vec::new())
            .await
            .expect("call must succeed")
            .into_parts();

        assert_eq!(payload, json!("ok"));
        assert!(headers.expect("headers must be present").contains_key("content-type"));
    }
}
