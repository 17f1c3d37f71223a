//! Client construction: network defaults, TLS, credentials.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::client::Client;
use crate::error::ClientError;
use crate::obfuscate::Obfuscator;
use crate::registry::Registry;
use crate::transport::{HttpTransport, Transport};
use crate::version::Capabilities;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
    Regtest,
}

impl Network {
    /// RPC port Bitcoin Core listens on by default. Regtest shares the
    /// testnet port for compatibility with older daemons.
    pub fn default_port(self) -> u16 {
        match self {
            Self::Mainnet => 8332,
            Self::Testnet | Self::Regtest => 18332,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
            Self::Regtest => "regtest",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            "regtest" => Ok(Self::Regtest),
            other => Err(ClientError::InvalidNetwork(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ssl {
    pub enabled: bool,
    /// Verify the server certificate.
    pub strict: bool,
}

/// Builder for [`Client`]. Every setting is optional.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    host: String,
    port: Option<u16>,
    ssl: Ssl,
    timeout: Duration,
    username: Option<String>,
    password: Option<String>,
    cookie_file: Option<PathBuf>,
    network: String,
    version: Option<String>,
    wallet: Option<String>,
    headers: bool,
    registry: Registry,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            host: "localhost".to_owned(),
            port: None,
            ssl: Ssl::default(),
            timeout: DEFAULT_TIMEOUT,
            username: None,
            password: None,
            cookie_file: None,
            network: Network::default().to_string(),
            version: None,
            wallet: None,
            headers: false,
            registry: Registry::default(),
        }
    }
}

impl ClientBuilder {
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Defaults to the network's RPC port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Enable TLS with certificate verification.
    pub fn ssl(self, enabled: bool) -> Self {
        self.ssl_options(enabled, enabled)
    }

    pub fn ssl_options(mut self, enabled: bool, strict: bool) -> Self {
        self.ssl = Ssl { enabled, strict };
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Read credentials from a Bitcoin Core `.cookie` file when no explicit
    /// username and password are set.
    pub fn cookie_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.cookie_file = Some(path.into());
        self
    }

    /// One of `mainnet`, `testnet` or `regtest`; checked by `build`.
    pub fn network(mut self, network: impl Into<String>) -> Self {
        self.network = network.into();
        self
    }

    /// Daemon version (e.g. `0.15.0.1`) used to gate methods.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn wallet(mut self, wallet: impl Into<String>) -> Self {
        self.wallet = Some(wallet.into());
        self
    }

    /// Return response headers alongside every payload.
    pub fn headers(mut self, headers: bool) -> Self {
        self.headers = headers;
        self
    }

    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Base URL derived from host, port, network and TLS settings.
    pub fn base_url(&self) -> Result<String, ClientError> {
        let network = Network::from_str(&self.network)?;
        let scheme = if self.ssl.enabled { "https" } else { "http" };
        let port = self.port.unwrap_or_else(|| network.default_port());
        Ok(format!("{scheme}://{}:{port}", self.host))
    }

    pub fn build(self) -> Result<Client, ClientError> {
        let base_url = self.base_url()?;
        let capabilities = Capabilities::new(&self.registry, self.version.as_deref())?;
        let auth = resolve_auth(
            self.username.as_deref(),
            self.password.as_deref(),
            self.cookie_file.as_deref(),
        )?;
        let transport = HttpTransport::new(
            base_url,
            auth,
            self.timeout,
            self.ssl.strict,
            Obfuscator::new(self.registry),
        )?;
        Ok(Client::new(
            Box::new(transport),
            capabilities,
            self.headers,
            self.wallet,
        ))
    }

    /// Build a client on top of a caller-supplied transport. Network and
    /// version are validated as in [`ClientBuilder::build`]; connection
    /// settings are ignored.
    pub fn build_with_transport(
        self,
        transport: impl Transport + 'static,
    ) -> Result<Client, ClientError> {
        Network::from_str(&self.network)?;
        let capabilities = Capabilities::new(&self.registry, self.version.as_deref())?;
        Ok(Client::new(
            Box::new(transport),
            capabilities,
            self.headers,
            self.wallet,
        ))
    }
}

type Credentials = (String, String);

/// Credentials by precedence: explicit user and password, then the cookie
/// file, then none. A lone username or password is rejected.
pub(crate) fn resolve_auth(
    user: Option<&str>,
    pass: Option<&str>,
    cookie_file: Option<&Path>,
) -> Result<Option<Credentials>, ClientError> {
    match (user, pass, cookie_file) {
        (Some(user), Some(pass), _) => Ok(Some((user.to_owned(), pass.to_owned()))),
        (None, None, Some(path)) => read_cookie(path).map(Some),
        (None, None, None) => Ok(None),
        _ => Err(ClientError::Config(
            "both username and password must be set together".to_owned(),
        )),
    }
}

/// Parse the `user:password` line bitcoind writes to its `.cookie` file.
fn read_cookie(path: &Path) -> Result<Credentials, ClientError> {
    let invalid = |reason: &str| {
        ClientError::Config(format!("cookie file {}: {reason}", path.display()))
    };

    let content = std::fs::read_to_string(path).map_err(|e| invalid(&e.to_string()))?;
    let line = content.lines().next().map(str::trim).unwrap_or_default();
    if line.is_empty() {
        return Err(invalid("empty"));
    }
    match line.split_once(':') {
        Some((user, pass)) if !user.is_empty() && !pass.is_empty() => {
            Ok((user.to_owned(), pass.to_owned()))
        }
        _ => Err(invalid("expected non-empty `username:password`")),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;
    use crate::transport::mock::MockTransport;

    fn temp_cookie(contents: &str) -> PathBuf {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time must be after unix epoch")
            .as_nanos();
        let path = std::env::temp_dir().join(format!("bitcoind-client-cookie-{unique}"));
        fs::write(&path, contents).expect("cookie file must be writable");
        path
    }

    #[test]
    fn default_ports_follow_network() {
        let base = |network: &str| {
            Client::builder()
                .network(network)
                .base_url()
                .expect("network must be valid")
        };
        assert_eq!(base("mainnet"), "http://localhost:8332");
        assert_eq!(base("testnet"), "http://localhost:18332");
        assert_eq!(base("regtest"), "http://localhost:18332");
    }

    #[test]
    fn explicit_port_and_ssl() {
        let url = Client::builder()
            .host("node.example")
            .port(9000)
            .ssl(true)
            .base_url()
            .expect("url must build");
        assert_eq!(url, "https://node.example:9000");
    }

    #[test]
    fn invalid_network_is_rejected_at_build() {
        let err = Client::builder()
            .network("foo")
            .build_with_transport(MockTransport::builder().build())
            .err()
            .expect("network must be rejected");
        assert!(matches!(err, ClientError::InvalidNetwork(ref n) if n == "foo"));
    }

    #[test]
    fn invalid_version_is_rejected_at_build() {
        let err = Client::builder()
            .version("latest")
            .build_with_transport(MockTransport::builder().build())
            .err()
            .expect("version must be rejected");
        assert!(matches!(err, ClientError::InvalidVersion(_)));
    }

    #[test]
    fn build_creates_http_client() {
        let client = Client::builder()
            .network("regtest")
            .version("0.17.1")
            .username("alice")
            .password("secret")
            .timeout(Duration::from_secs(5))
            .build()
            .expect("client must build");
        assert!(client.capabilities().supports_named_parameters());
    }

    #[test]
    fn build_rejects_partial_credentials() {
        let err = Client::builder()
            .username("alice")
            .build()
            .err()
            .expect("partial credentials must be rejected");
        assert!(err.to_string().contains("must be set together"));
    }

    #[test]
    fn resolve_auth_prefers_explicit_credentials() {
        let path = temp_cookie("__cookie__:token\n");
        let auth = resolve_auth(Some("alice"), Some("secret"), Some(&path)).expect("auth must parse");
        assert_eq!(auth, Some(("alice".to_owned(), "secret".to_owned())));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn resolve_auth_reads_cookie_file() {
        let path = temp_cookie("__cookie__:token\n");
        let auth = resolve_auth(None, None, Some(&path)).expect("cookie must parse");
        assert_eq!(auth, Some(("__cookie__".to_owned(), "token".to_owned())));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn resolve_auth_rejects_malformed_cookie() {
        let path = temp_cookie("no-separator\n");
        let err = resolve_auth(None, None, Some(&path)).expect_err("cookie must be rejected");
        assert!(matches!(err, ClientError::Config(_)));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn resolve_auth_rejects_empty_cookie() {
        let path = temp_cookie("\n");
        let err = resolve_auth(None, None, Some(&path)).expect_err("cookie must be rejected");
        assert!(err.to_string().ends_with(": empty"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn resolve_auth_rejects_lone_password_even_with_cookie() {
        let path = temp_cookie("__cookie__:token\n");
        let err = resolve_auth(None, Some("secret"), Some(&path)).expect_err("must be rejected");
        assert!(err.to_string().contains("must be set together"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn resolve_auth_without_anything_is_anonymous() {
        assert_eq!(resolve_auth(None, None, None).expect("must resolve"), None);
    }
}
