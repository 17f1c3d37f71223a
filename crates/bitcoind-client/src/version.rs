//! Version Gate: decides once per client which methods and features the
//! configured daemon version offers.

use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use regex::Regex;
use semver::{Version, VersionReq};

use crate::error::ClientError;
use crate::registry::{Feature, MethodDescriptor, Registry};

/// Daemon versions that accept named parameters.
pub const NAMED_PARAMETERS_RANGE: &str = ">=0.14.0";

/// Extract the leading `X.Y.Z` of a daemon version string.
///
/// Daemons occasionally report a fourth component (`0.15.0.1`); only the
/// first three are kept.
pub fn normalize_version(raw: &str) -> Result<Version, ClientError> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN
        .get_or_init(|| Regex::new(r"[0-9]+\.[0-9]+\.[0-9]+").expect("static version pattern"));

    let found = pattern
        .find(raw)
        .ok_or_else(|| ClientError::InvalidVersion(raw.to_owned()))?;
    Version::parse(found.as_str()).map_err(|_| ClientError::InvalidVersion(raw.to_owned()))
}

/// Whether `method` exists at `version`. Without a version every method is
/// assumed to exist.
pub fn evaluate(method: &MethodDescriptor, version: Option<&Version>) -> Result<bool, ClientError> {
    matches_range(method, method.version, version)
}

/// Whether `method` offers `feature` at `version`. Methods that do not list
/// the feature never offer it.
pub fn evaluate_feature(
    method: &MethodDescriptor,
    feature: Feature,
    version: Option<&Version>,
) -> Result<bool, ClientError> {
    match method.features.iter().find(|(f, _)| *f == feature) {
        Some((_, range)) => matches_range(method, range, version),
        None => Ok(false),
    }
}

fn matches_range(
    method: &MethodDescriptor,
    range: &str,
    version: Option<&Version>,
) -> Result<bool, ClientError> {
    let Some(version) = version else {
        return Ok(true);
    };
    let req = VersionReq::parse(range).map_err(|source| ClientError::InvalidVersionRange {
        method: method.name.to_owned(),
        range: range.to_owned(),
        source,
    })?;
    Ok(req.matches(version))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSupport {
    pub supported: bool,
    pub features: BTreeMap<Feature, bool>,
}

/// Per-client support flags, computed at construction and read-only after.
#[derive(Debug, Clone)]
pub struct Capabilities {
    version: Option<Version>,
    named_parameters: bool,
    methods: HashMap<&'static str, MethodSupport>,
}

impl Capabilities {
    pub fn new(registry: &Registry, version: Option<&str>) -> Result<Self, ClientError> {
        let version = version.map(normalize_version).transpose()?;

        let named_parameters = match &version {
            Some(version) => VersionReq::parse(NAMED_PARAMETERS_RANGE)
                .map_err(|source| ClientError::InvalidVersionRange {
                    method: "named parameters".to_owned(),
                    range: NAMED_PARAMETERS_RANGE.to_owned(),
                    source,
                })?
                .matches(version),
            None => false,
        };

        let mut methods = HashMap::with_capacity(registry.len());
        for method in registry.iter() {
            let mut features = BTreeMap::new();
            for (feature, _) in method.features {
                features.insert(*feature, evaluate_feature(method, *feature, version.as_ref())?);
            }
            let support = MethodSupport {
                supported: evaluate(method, version.as_ref())?,
                features,
            };
            methods.insert(method.name, support);
        }

        Ok(Self {
            version,
            named_parameters,
            methods,
        })
    }

    /// Normalized daemon version, if one was configured.
    pub fn version(&self) -> Option<&Version> {
        self.version.as_ref()
    }

    pub fn supports_named_parameters(&self) -> bool {
        self.named_parameters
    }

    pub fn method(&self, name: &str) -> Option<&MethodSupport> {
        self.methods.get(name.to_ascii_lowercase().as_str())
    }

    /// Methods missing from the registry are only allowed when no version
    /// was configured.
    pub fn is_supported(&self, name: &str) -> bool {
        self.method(name)
            .map_or(self.version.is_none(), |support| support.supported)
    }

    pub fn supports_feature(&self, name: &str, feature: Feature) -> bool {
        self.method(name)
            .and_then(|support| support.features.get(&feature))
            .copied()
            .unwrap_or(false)
    }
}
