use std::path::PathBuf;

use bitcoin::{BlockHash, OutPoint, Txid};
use bitcoind_client::Extension;
use clap::{Parser, Subcommand};

/// Talk to a Bitcoin Core daemon over JSON-RPC or REST and print the
/// result as JSON.
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Daemon host.
    #[arg(long, default_value = "localhost", env = "BITCOIND_HOST")]
    pub host: String,

    /// RPC port (defaults to the network's port).
    #[arg(long, env = "BITCOIND_PORT")]
    pub port: Option<u16>,

    /// Network: mainnet, testnet or regtest.
    #[arg(long, default_value = "mainnet", env = "BITCOIND_NETWORK")]
    pub network: String,

    #[arg(long, env = "BITCOIND_USER")]
    pub user: Option<String>,

    #[arg(long, env = "BITCOIND_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Cookie file used when no user and password are given.
    #[arg(long, env = "BITCOIND_COOKIE_FILE")]
    pub cookie_file: Option<PathBuf>,

    /// Daemon version (e.g. 0.17.1); enables version checks and named
    /// parameters.
    #[arg(long, env = "BITCOIND_VERSION")]
    pub daemon_version: Option<String>,

    /// Route wallet calls to this wallet.
    #[arg(long, env = "BITCOIND_WALLET")]
    pub wallet: Option<String>,

    /// Use HTTPS.
    #[arg(long, env = "BITCOIND_SSL")]
    pub ssl: bool,

    /// Accept any server certificate.
    #[arg(long, requires = "ssl")]
    pub insecure: bool,

    /// Request timeout in seconds.
    #[arg(long, default_value = "30", env = "BITCOIND_TIMEOUT")]
    pub timeout: u64,

    /// Print response headers along with the payload.
    #[arg(long)]
    pub headers: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Call one RPC method. Parameters are parsed as JSON, falling back to
    /// plain strings.
    Call {
        method: String,
        params: Vec<String>,
    },
    /// Send a batch given as a JSON array of `{"method", "params"}` objects.
    Batch { calls: String },
    #[command(subcommand)]
    Rest(RestCommand),
}

#[derive(Subcommand)]
pub enum RestCommand {
    Tx {
        txid: Txid,
        #[arg(long, default_value = "json")]
        format: Extension,
    },
    Block {
        hash: BlockHash,
        /// Omit transaction details.
        #[arg(long)]
        summary: bool,
        #[arg(long, default_value = "json")]
        format: Extension,
    },
    Headers {
        hash: BlockHash,
        #[arg(long, default_value = "1")]
        count: u32,
        /// `hex` or `bin`.
        #[arg(long, default_value = "hex")]
        format: Extension,
    },
    Chaininfo,
    /// Query outpoints given as `txid:vout`.
    Utxos {
        #[arg(required = true)]
        outpoints: Vec<OutPoint>,
        #[arg(long, default_value = "json")]
        format: Extension,
    },
    MempoolContents,
    MempoolInfo,
}
