//! Chainkit Tools Library
//!
//! Typed configuration for the contract toolchain: network profiles loaded
//! from the environment, secret handling and the manifest handed to the
//! compiler, test runner and verification tooling.

pub mod config;
pub mod env;
pub mod export;
pub mod logging;
pub mod secret;

pub use config::{ConfigError, Network, NetworkProfile, ToolchainConfig};
pub use env::{EnvSnapshot, EnvSource};
pub use export::{Manifest, SecretPolicy};
pub use secret::Secret;
