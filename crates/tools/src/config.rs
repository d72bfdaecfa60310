//! Contract toolchain configuration
//!
//! This module builds the typed configuration handed to the contract
//! toolchain: network profiles, signing keys, the explorer verification key,
//! the pinned compiler version, the project path layout and test settings.
//!
//! Loading is a single deterministic transformation from an environment
//! snapshot to a [`ToolchainConfig`]. It never fails on missing variables:
//! a remote profile whose credentials are unset is still present, it just
//! cannot be [`resolve`](ToolchainConfig::resolve)d for use.
//!
//! # Examples
//!
//! ```rust
//! use chainkit_tools::config::{Network, ToolchainConfig};
//! use chainkit_tools::env::EnvSnapshot;
//!
//! let env: EnvSnapshot = [("SEPOLIA_API_URL", "https://rpc.example/x")]
//!     .into_iter()
//!     .collect();
//! let config = ToolchainConfig::from_env(&env);
//! assert_eq!(config.default_network, Network::Hardhat);
//! assert_eq!(
//!     config.profile(Network::Sepolia).and_then(|p| p.endpoint_url()),
//!     Some("https://rpc.example/x")
//! );
//! ```

use crate::env::{EnvSnapshot, EnvSource};
use crate::secret::{mask_url, Secret};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

/// Pinned compiler release; never a range
pub const COMPILER_VERSION: &str = "0.8.26";

/// Per-test timeout for the test runner
pub const TEST_TIMEOUT_MS: u64 = 20_000;

pub const ADMIN_PRIVATE_KEY: &str = "ADMIN_PRIVATE_KEY";
pub const SEPOLIA_API_URL: &str = "SEPOLIA_API_URL";
pub const AMOY_API_URL: &str = "AMOY_API_URL";
pub const SEPOLIASCAN_API: &str = "SEPOLIASCAN_API";
pub const AMOYSCAN_API: &str = "AMOYSCAN_API";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unknown network: {0}. Must be: hardhat, sepolia, or amoy")]
    UnknownNetwork(String),

    #[error("Network '{network}' is misconfigured: {reason}")]
    MisconfiguredNetwork { network: Network, reason: String },

    #[error("Dotenv error: {0}")]
    Dotenv(#[from] dotenvy::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// Networks the toolchain knows how to reach
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Network {
    /// In-process simulated chain, no endpoint or credentials
    Hardhat,
    /// Ethereum Sepolia testnet
    Sepolia,
    /// Polygon Amoy testnet
    Amoy,
}

impl Network {
    pub const ALL: [Network; 3] = [Network::Hardhat, Network::Sepolia, Network::Amoy];

    /// Get network as string
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Hardhat => "hardhat",
            Network::Sepolia => "sepolia",
            Network::Amoy => "amoy",
        }
    }

    /// EVM chain id
    pub fn chain_id(&self) -> u64 {
        match self {
            Network::Hardhat => 31_337,
            Network::Sepolia => 11_155_111,
            Network::Amoy => 80_002,
        }
    }

    /// Environment variable holding the RPC endpoint, `None` for the simulated network
    pub fn endpoint_var(&self) -> Option<&'static str> {
        match self {
            Network::Hardhat => None,
            Network::Sepolia => Some(SEPOLIA_API_URL),
            Network::Amoy => Some(AMOY_API_URL),
        }
    }

    /// Whether this is the in-process network
    pub fn is_simulated(&self) -> bool {
        matches!(self, Network::Hardhat)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Network {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hardhat" => Ok(Network::Hardhat),
            "sepolia" => Ok(Network::Sepolia),
            "amoy" => Ok(Network::Amoy),
            other => Err(ConfigError::UnknownNetwork(other.to_string())),
        }
    }
}

/// Connection and credential parameters for one network
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkProfile {
    Simulated,
    Remote {
        /// RPC endpoint, `None` when the variable is unset
        endpoint_url: Option<String>,
        /// Keys used to sign outgoing transactions, in order
        signing_keys: Vec<Secret>,
    },
}

impl NetworkProfile {
    /// RPC endpoint, `None` for the simulated network or when unset
    pub fn endpoint_url(&self) -> Option<&str> {
        match self {
            NetworkProfile::Simulated => None,
            NetworkProfile::Remote { endpoint_url, .. } => endpoint_url.as_deref(),
        }
    }

    /// Signing keys, empty for the simulated network
    pub fn signing_keys(&self) -> &[Secret] {
        match self {
            NetworkProfile::Simulated => &[],
            NetworkProfile::Remote { signing_keys, .. } => signing_keys,
        }
    }

    /// Whether this profile needs no endpoint or credentials
    pub fn is_simulated(&self) -> bool {
        matches!(self, NetworkProfile::Simulated)
    }
}

/// Where the toolchain reads sources and writes build output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathLayout {
    pub sources: PathBuf,
    pub tests: PathBuf,
    pub cache: PathBuf,
    pub artifacts: PathBuf,
}

impl Default for PathLayout {
    fn default() -> Self {
        PathLayout {
            sources: PathBuf::from("./contracts"),
            tests: PathBuf::from("./test"),
            cache: PathBuf::from("./cache"),
            artifacts: PathBuf::from("./contracts/artifacts"),
        }
    }
}

/// A network profile that passed the use-time checks
#[derive(Debug, Clone, Copy)]
pub struct ResolvedNetwork<'a> {
    pub network: Network,
    pub chain_id: u64,
    pub endpoint_url: Option<&'a str>,
    pub signing_keys: &'a [Secret],
}

/// Resolved toolchain configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainConfig {
    /// Network used when the caller names none
    pub default_network: Network,
    /// One profile per entry of [`Network::ALL`]
    networks: BTreeMap<Network, NetworkProfile>,
    /// Explorer API key for contract verification
    pub verification_api_key: Option<Secret>,
    pub compiler_version: String,
    pub paths: PathLayout,
    pub sourcify_enabled: bool,
    pub test_timeout_ms: u64,
}

impl ToolchainConfig {
    /// Build the configuration from an environment source
    ///
    /// Unset or empty variables leave the corresponding fields empty; this
    /// never fails and performs no validation. Use [`resolve`](Self::resolve)
    /// before talking to a network.
    pub fn from_env(env: &impl EnvSource) -> Self {
        let var = |key: &str| {
            let value = env.var(key).filter(|v| !v.is_empty());
            debug!(
                "{} is {}",
                key,
                if value.is_some() { "set" } else { "not set" }
            );
            value
        };

        let admin_key = var(ADMIN_PRIVATE_KEY).map(Secret::from);
        let verification_api_key = var(SEPOLIASCAN_API).map(Secret::from);

        if var(AMOYSCAN_API).is_some() {
            debug!(
                "{} is set but verification uses {}; it is not applied",
                AMOYSCAN_API, SEPOLIASCAN_API
            );
        }

        let networks = Network::ALL
            .iter()
            .map(|&network| {
                let profile = match network.endpoint_var() {
                    None => NetworkProfile::Simulated,
                    Some(endpoint_var) => NetworkProfile::Remote {
                        endpoint_url: var(endpoint_var),
                        signing_keys: admin_key.iter().cloned().collect(),
                    },
                };
                (network, profile)
            })
            .collect();

        ToolchainConfig {
            default_network: Network::Hardhat,
            networks,
            verification_api_key,
            compiler_version: COMPILER_VERSION.to_string(),
            paths: PathLayout::default(),
            sourcify_enabled: true,
            test_timeout_ms: TEST_TIMEOUT_MS,
        }
    }

    /// Load from the process environment overlaid with `./.env`
    ///
    /// Process variables take precedence over the file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Dotenv`] if `.env` exists but is malformed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_dotenv(Some(Path::new(".env")))
    }

    /// Load from the process environment, optionally overlaid with a dotenv file
    pub fn load_with_dotenv(dotenv: Option<&Path>) -> Result<Self, ConfigError> {
        let mut env = EnvSnapshot::from_process();
        if let Some(path) = dotenv {
            env = env.with_dotenv_file(path)?;
        }

        let config = Self::from_env(&env);
        info!(
            "Toolchain configuration loaded (default network: {})",
            config.default_network
        );
        Ok(config)
    }

    /// All network profiles, ordered by network
    pub fn networks(&self) -> &BTreeMap<Network, NetworkProfile> {
        &self.networks
    }

    /// Profile for a network
    pub fn profile(&self, network: Network) -> Option<&NetworkProfile> {
        self.networks.get(&network)
    }

    /// Profile of the default network
    pub fn default_profile(&self) -> Option<&NetworkProfile> {
        self.profile(self.default_network)
    }

    /// Check that a network can actually be used
    ///
    /// The simulated network always resolves. A remote network needs an
    /// `http://` or `https://` endpoint and at least one signing key.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::UnknownNetwork`] for names outside [`Network::ALL`]
    /// - [`ConfigError::MisconfiguredNetwork`] for incomplete remote profiles
    pub fn resolve(&self, name: &str) -> Result<ResolvedNetwork<'_>, ConfigError> {
        let network: Network = name.parse()?;
        self.resolve_network(network)
    }

    /// Same checks as [`resolve`](Self::resolve) for an already parsed network
    pub fn resolve_network(&self, network: Network) -> Result<ResolvedNetwork<'_>, ConfigError> {
        let (endpoint_url, signing_keys): (Option<&str>, &[Secret]) = match self.profile(network) {
            Some(NetworkProfile::Remote {
                endpoint_url,
                signing_keys,
            }) => {
                Self::validate_remote(network, endpoint_url.as_deref(), signing_keys)?;
                (endpoint_url.as_deref(), signing_keys.as_slice())
            }
            Some(NetworkProfile::Simulated) => (None, &[]),
            None if network.is_simulated() => (None, &[]),
            None => {
                return Err(ConfigError::MisconfiguredNetwork {
                    network,
                    reason: "no profile configured".to_string(),
                })
            }
        };

        Ok(ResolvedNetwork {
            network,
            chain_id: network.chain_id(),
            endpoint_url,
            signing_keys,
        })
    }

    fn validate_remote(
        network: Network,
        endpoint_url: Option<&str>,
        signing_keys: &[Secret],
    ) -> Result<(), ConfigError> {
        let misconfigured = |reason: String| ConfigError::MisconfiguredNetwork { network, reason };
        let endpoint_var = network.endpoint_var().unwrap_or("endpoint");

        let url = endpoint_url
            .ok_or_else(|| misconfigured(format!("{} is not set", endpoint_var)))?;

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(misconfigured(format!(
                "{} must start with http:// or https://: {}",
                endpoint_var, url
            )));
        }

        if signing_keys.is_empty() {
            return Err(misconfigured(format!(
                "no signing key ({} is not set)",
                ADMIN_PRIVATE_KEY
            )));
        }

        Ok(())
    }

    /// Print the resolved configuration without revealing secrets
    pub fn print_summary(&self) {
        print!("{}", self.summary());
    }

    /// Human-readable summary; secrets hidden, endpoint paths masked
    pub fn summary(&self) -> String {
        let set = |present: bool| if present { "set" } else { "(not configured)" };
        let mut out = String::new();

        out.push_str("Toolchain configuration\n");
        out.push_str(&format!("  Default network:     {}\n", self.default_network));
        for (network, profile) in &self.networks {
            match profile {
                NetworkProfile::Simulated => {
                    out.push_str(&format!(
                        "  {:<20} simulated (chain {})\n",
                        format!("{}:", network),
                        network.chain_id()
                    ));
                }
                NetworkProfile::Remote {
                    endpoint_url,
                    signing_keys,
                } => {
                    out.push_str(&format!(
                        "  {:<20} {} (chain {}), {} signing key(s)\n",
                        format!("{}:", network),
                        endpoint_url
                            .as_deref()
                            .map(mask_url)
                            .unwrap_or_else(|| "(not configured)".to_string()),
                        network.chain_id(),
                        signing_keys.len()
                    ));
                }
            }
        }
        out.push_str(&format!(
            "  Verification key:    {}\n",
            set(self.verification_api_key.is_some())
        ));
        out.push_str(&format!("  Compiler:            {}\n", self.compiler_version));
        out.push_str(&format!("  Sources:             {}\n", self.paths.sources.display()));
        out.push_str(&format!("  Tests:               {}\n", self.paths.tests.display()));
        out.push_str(&format!("  Cache:               {}\n", self.paths.cache.display()));
        out.push_str(&format!("  Artifacts:           {}\n", self.paths.artifacts.display()));
        out.push_str(&format!(
            "  Sourcify:            {}\n",
            if self.sourcify_enabled { "enabled" } else { "disabled" }
        ));
        out.push_str(&format!("  Test timeout:        {}ms\n", self.test_timeout_ms));
        out
    }
}
