//! Static catalogue of the daemon's RPC methods.
//!
//! Each [`MethodDescriptor`] records the version range in which a method
//! exists, the per-feature ranges (multi-wallet routing), and the optional
//! obfuscators applied to logged copies of its requests and responses.
//! The table is plain data: adding a remote method means adding one entry
//! to `methods.rs`, which also generates the matching [`Client`] call.
//!
//! [`Client`]: crate::Client

mod methods;

use std::fmt;

use serde_json::Value;

use crate::error::ClientError;
use crate::request::Params;

pub use methods::BITCOIN_CORE_METHODS;

/// Masks the sensitive parts of a method's parameters in place.
pub type RequestObfuscator = fn(&mut Params);

/// Masks the sensitive parts of a method's result in place.
pub type ResponseObfuscator = fn(&mut Value);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Blockchain,
    Control,
    Generating,
    Mining,
    Network,
    RawTransactions,
    Util,
    Wallet,
    Uncategorized,
}

/// Optional capability of a method that became available independently of
/// the method itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feature {
    /// The method may be routed to `/wallet/<name>`.
    MultiWallet,
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MultiWallet => f.write_str("multiwallet"),
        }
    }
}

#[derive(Clone, Copy)]
pub struct MethodDescriptor {
    /// Lowercase method name as sent on the wire.
    pub name: &'static str,
    pub category: Category,
    /// Comma-separated semver comparators, e.g. `">=0.13.0, <0.18.0"`.
    pub version: &'static str,
    pub features: &'static [(Feature, &'static str)],
    pub obfuscate_request: Option<RequestObfuscator>,
    pub obfuscate_response: Option<ResponseObfuscator>,
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("version", &self.version)
            .field("features", &self.features)
            .field("obfuscate_request", &self.obfuscate_request.is_some())
            .field("obfuscate_response", &self.obfuscate_response.is_some())
            .finish()
    }
}

/// Immutable, case-insensitive view over a sorted method table.
#[derive(Debug, Clone, Copy)]
pub struct Registry {
    methods: &'static [MethodDescriptor],
}

impl Registry {
    /// Wrap a custom method table.
    ///
    /// The table must be sorted by name with lowercase, unique names so
    /// that lookups can binary-search it.
    pub fn new(methods: &'static [MethodDescriptor]) -> Result<Self, ClientError> {
        if let Some(method) = methods.iter().find(|m| m.name != m.name.to_ascii_lowercase()) {
            return Err(ClientError::Config(format!(
                "method name `{}` must be lowercase",
                method.name
            )));
        }
        if let Some(pair) = methods.windows(2).find(|pair| pair[0].name >= pair[1].name) {
            return Err(ClientError::Config(format!(
                "method table must be sorted and unique: `{}` precedes `{}`",
                pair[0].name, pair[1].name
            )));
        }
        Ok(Self { methods })
    }

    /// The built-in Bitcoin Core catalogue.
    pub fn bitcoin_core() -> Self {
        Self {
            methods: BITCOIN_CORE_METHODS,
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&'static MethodDescriptor> {
        let name = name.to_ascii_lowercase();
        let methods = self.methods;
        methods
            .binary_search_by(|m| m.name.cmp(name.as_str()))
            .ok()
            .map(|idx| &methods[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static MethodDescriptor> {
        self.methods.iter()
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::bitcoin_core()
    }
}
