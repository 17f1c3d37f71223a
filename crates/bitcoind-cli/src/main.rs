mod cli;

use std::io::Write;
use std::time::Duration;

use bitcoind_client::{header, BatchCall, Client, RestPayload};
use clap::Parser;
use eyre::WrapErr;
use serde_json::{json, Value};

use cli::{Cli, Command, RestCommand};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_level(true)
        .init();

    let client = build_client(&args).context("configure client")?;

    match args.command {
        Command::Call { method, params } => {
            let params = params.iter().map(String::as_str).map(parse_param).collect();
            let reply = client
                .command(&method, params)
                .await
                .with_context(|| format!("call `{method}`"))?;
            let (payload, headers) = reply.into_parts();
            print_json(&with_headers(payload, headers.as_ref()))?;
        }
        Command::Batch { calls } => {
            let calls: Vec<BatchCall> =
                serde_json::from_str(&calls).context("parse batch as a JSON array of calls")?;
            let reply = client.command_batch(calls).await.context("send batch")?;
            let (results, headers) = reply.into_parts();
            let results = results
                .into_iter()
                .map(|result| match result {
                    Ok(value) => value,
                    Err(err) => json!({ "error": { "code": err.code, "message": err.message } }),
                })
                .collect();
            print_json(&with_headers(Value::Array(results), headers.as_ref()))?;
        }
        Command::Rest(command) => rest(&client, command).await?,
    }

    Ok(())
}

fn build_client(args: &Cli) -> eyre::Result<Client> {
    let mut builder = Client::builder()
        .host(&args.host)
        .network(&args.network)
        .ssl_options(args.ssl, args.ssl && !args.insecure)
        .timeout(Duration::from_secs(args.timeout))
        .headers(args.headers);
    if let Some(port) = args.port {
        builder = builder.port(port);
    }
    if let Some(user) = &args.user {
        builder = builder.username(user);
    }
    if let Some(password) = &args.password {
        builder = builder.password(password);
    }
    if let Some(cookie_file) = &args.cookie_file {
        builder = builder.cookie_file(cookie_file);
    }
    if let Some(version) = &args.daemon_version {
        builder = builder.version(version);
    }
    if let Some(wallet) = &args.wallet {
        builder = builder.wallet(wallet);
    }

    let url = builder.base_url()?;
    tracing::debug!(
        url = %url,
        network = %args.network,
        version = args.daemon_version.as_deref().unwrap_or("-"),
        wallet = args.wallet.as_deref().unwrap_or("-"),
        "configured bitcoind client"
    );
    Ok(builder.build()?)
}

async fn rest(client: &Client, command: RestCommand) -> eyre::Result<()> {
    let reply = match command {
        RestCommand::Tx { txid, format } => client
            .get_transaction_by_hash(&txid, format)
            .await
            .with_context(|| format!("fetch transaction {txid}"))?,
        RestCommand::Block {
            hash,
            summary,
            format,
        } => client
            .get_block_by_hash(&hash, summary, format)
            .await
            .with_context(|| format!("fetch block {hash}"))?,
        RestCommand::Headers {
            hash,
            count,
            format,
        } => client
            .get_block_headers_by_hash(&hash, count, format)
            .await
            .with_context(|| format!("fetch headers from {hash}"))?,
        RestCommand::Utxos { outpoints, format } => client
            .get_unspent_transaction_outputs(&outpoints, format)
            .await
            .context("query unspent outputs")?,
        RestCommand::Chaininfo => client
            .get_blockchain_information()
            .await
            .context("fetch chain info")?
            .map(RestPayload::Json),
        RestCommand::MempoolContents => client
            .get_memory_pool_content()
            .await
            .context("fetch mempool contents")?
            .map(RestPayload::Json),
        RestCommand::MempoolInfo => client
            .get_memory_pool_information()
            .await
            .context("fetch mempool info")?
            .map(RestPayload::Json),
    };

    let (payload, headers) = reply.into_parts();
    match payload {
        RestPayload::Json(value) => print_json(&with_headers(value, headers.as_ref())),
        RestPayload::Hex(hex) => {
            print!("{hex}");
            Ok(())
        }
        RestPayload::Binary(bytes) => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes).context("write binary payload")?;
            stdout.flush().context("flush stdout")
        }
    }
}

/// JSON when `raw` parses as JSON, otherwise the raw text as a string.
fn parse_param(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()))
}

fn with_headers(payload: Value, headers: Option<&header::HeaderMap>) -> Value {
    let Some(headers) = headers else {
        return payload;
    };
    let headers: serde_json::Map<String, Value> = headers
        .iter()
        .map(|(name, value)| {
            (
                name.to_string(),
                Value::String(String::from_utf8_lossy(value.as_bytes()).into_owned()),
            )
        })
        .collect();
    json!([payload, headers])
}

fn print_json(value: &Value) -> eyre::Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("render JSON output")?;
    println!("{rendered}");
    Ok(())
}
