//! The daemon's unauthenticated REST interface.

use std::fmt;
use std::str::FromStr;

use bitcoin::{BlockHash, OutPoint, Txid};
use serde_json::Value;
use tracing::debug;

use crate::client::Client;
use crate::error::ClientError;
use crate::parser::Reply;
use crate::transport::HttpRequest;

/// Response encoding selected by the endpoint suffix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Extension {
    #[default]
    Json,
    Hex,
    Bin,
}

impl Extension {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Hex => "hex",
            Self::Bin => "bin",
        }
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Extension {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "hex" => Ok(Self::Hex),
            "bin" => Ok(Self::Bin),
            other => Err(ClientError::Config(format!(
                "unknown REST extension `{other}`; expected json, hex or bin"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RestPayload {
    Json(Value),
    /// Hex text exactly as served, trailing newline included.
    Hex(String),
    Binary(Vec<u8>),
}

impl Client {
    pub async fn get_transaction_by_hash(
        &self,
        txid: &Txid,
        extension: Extension,
    ) -> Result<Reply<RestPayload>, ClientError> {
        self.rest(format!("/rest/tx/{txid}.{extension}"), extension)
            .await
    }

    /// `summary` omits transaction details (`/rest/block/notxdetails/`).
    pub async fn get_block_by_hash(
        &self,
        hash: &BlockHash,
        summary: bool,
        extension: Extension,
    ) -> Result<Reply<RestPayload>, ClientError> {
        let prefix = if summary {
            "/rest/block/notxdetails"
        } else {
            "/rest/block"
        };
        self.rest(format!("{prefix}/{hash}.{extension}"), extension)
            .await
    }

    /// `count` headers starting at `hash`. The endpoint has no JSON
    /// encoding, so [`Extension::Json`] fails without contacting the daemon.
    pub async fn get_block_headers_by_hash(
        &self,
        hash: &BlockHash,
        count: u32,
        extension: Extension,
    ) -> Result<Reply<RestPayload>, ClientError> {
        if extension == Extension::Json {
            return Err(ClientError::UnsupportedExtension {
                endpoint: "headers",
                extension,
            });
        }
        self.rest(format!("/rest/headers/{count}/{hash}.{extension}"), extension)
            .await
    }

    pub async fn get_blockchain_information(&self) -> Result<Reply<Value>, ClientError> {
        self.rest_json("/rest/chaininfo.json").await
    }

    /// Query the UTXO set, mempool included, for `outpoints`.
    pub async fn get_unspent_transaction_outputs(
        &self,
        outpoints: &[OutPoint],
        extension: Extension,
    ) -> Result<Reply<RestPayload>, ClientError> {
        let mut path = String::from("/rest/getutxos/checkmempool");
        for outpoint in outpoints {
            path.push_str(&format!("/{}-{}", outpoint.txid, outpoint.vout));
        }
        path.push_str(&format!(".{extension}"));
        self.rest(path, extension).await
    }

    pub async fn get_memory_pool_content(&self) -> Result<Reply<Value>, ClientError> {
        self.rest_json("/rest/mempool/contents.json").await
    }

    pub async fn get_memory_pool_information(&self) -> Result<Reply<Value>, ClientError> {
        self.rest_json("/rest/mempool/info.json").await
    }

    async fn rest(
        &self,
        path: String,
        extension: Extension,
    ) -> Result<Reply<RestPayload>, ClientError> {
        debug!(rest.path = %path, "sending REST request");
        let response = self.transport().send(HttpRequest::get(path)).await?;
        self.parser().rest(extension, response)
    }

    async fn rest_json(&self, path: &str) -> Result<Reply<Value>, ClientError> {
        debug!(rest.path = path, "sending REST request");
        let response = self.transport().send(HttpRequest::get(path)).await?;
        self.parser().rest_json(response)
    }
}
