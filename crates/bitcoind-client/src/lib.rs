pub mod client;
pub mod config;
pub mod error;
pub mod obfuscate;
pub mod parser;
pub mod registry;
pub mod request;
pub mod rest;
pub mod transport;
pub mod version;

pub use reqwest::header;

pub use client::{BatchReply, Client};
pub use config::{ClientBuilder, Network, Ssl};
pub use error::{ClientError, RpcError};
pub use parser::Reply;
pub use registry::{Feature, Registry};
pub use request::{BatchCall, Params};
pub use rest::{Extension, RestPayload};
pub use transport::{HttpRequest, HttpResponse, Transport};
pub use version::Capabilities;
