//! Toolchain-facing configuration document
//!
//! [`Manifest`] is the shape the external contract toolchain reads: camelCase
//! keys, one table per network, explorer and compiler sections. Secrets are
//! either redacted or revealed depending on [`SecretPolicy`]; only the
//! toolchain entry point should ever ask for [`SecretPolicy::Reveal`].

use crate::config::{ConfigError, NetworkProfile, ToolchainConfig};
use crate::secret::{mask_url, Secret, REDACTED};
use serde::Serialize;
use std::collections::BTreeMap;

/// How secret values are rendered into a [`Manifest`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecretPolicy {
    #[default]
    Redact,
    Reveal,
}

impl SecretPolicy {
    fn render(self, secret: &Secret) -> String {
        match self {
            SecretPolicy::Redact => REDACTED.to_string(),
            SecretPolicy::Reveal => secret.expose().to_string(),
        }
    }

    fn render_url(self, url: &str) -> String {
        match self {
            SecretPolicy::Redact => mask_url(url),
            SecretPolicy::Reveal => url.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub default_network: String,
    pub networks: BTreeMap<String, ManifestNetwork>,
    pub etherscan: EtherscanSection,
    pub solidity: SoliditySection,
    pub paths: PathsSection,
    pub sourcify: SourcifySection,
    pub mocha: MochaSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ManifestNetwork {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accounts: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EtherscanSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SoliditySection {
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathsSection {
    pub sources: String,
    pub tests: String,
    pub cache: String,
    pub artifacts: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourcifySection {
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MochaSection {
    pub timeout: u64,
}

impl Manifest {
    /// Build the manifest from a loaded configuration
    pub fn build(config: &ToolchainConfig, policy: SecretPolicy) -> Self {
        let networks = config
            .networks()
            .iter()
            .map(|(network, profile)| {
                let entry = match profile {
                    NetworkProfile::Simulated => ManifestNetwork::default(),
                    NetworkProfile::Remote {
                        endpoint_url,
                        signing_keys,
                    } => ManifestNetwork {
                        url: endpoint_url.as_deref().map(|u| policy.render_url(u)),
                        accounts: Some(signing_keys.iter().map(|k| policy.render(k)).collect()),
                    },
                };
                (network.to_string(), entry)
            })
            .collect();

        let path = |p: &std::path::Path| p.to_string_lossy().into_owned();

        Manifest {
            default_network: config.default_network.to_string(),
            networks,
            etherscan: EtherscanSection {
                api_key: config
                    .verification_api_key
                    .as_ref()
                    .map(|k| policy.render(k)),
            },
            solidity: SoliditySection {
                version: config.compiler_version.clone(),
            },
            paths: PathsSection {
                sources: path(&config.paths.sources),
                tests: path(&config.paths.tests),
                cache: path(&config.paths.cache),
                artifacts: path(&config.paths.artifacts),
            },
            sourcify: SourcifySection {
                enabled: config.sourcify_enabled,
            },
            mocha: MochaSection {
                timeout: config.test_timeout_ms,
            },
        }
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Pretty-printed TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
