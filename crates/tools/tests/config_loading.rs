use chainkit_tools::config::{ADMIN_PRIVATE_KEY, AMOY_API_URL, SEPOLIA_API_URL};
use chainkit_tools::{
    ConfigError, EnvSnapshot, Manifest, Network, SecretPolicy, ToolchainConfig,
};
use std::collections::HashMap;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_dotenv_file_feeds_loader() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "# deployment credentials").unwrap();
    writeln!(file, "{}=0xfeed", ADMIN_PRIVATE_KEY).unwrap();
    writeln!(file, "{}=https://amoy.example/rpc", AMOY_API_URL).unwrap();

    let env = EnvSnapshot::default().with_dotenv_file(file.path()).unwrap();
    let config = ToolchainConfig::from_env(&env);

    let amoy = config.resolve("amoy").unwrap();
    assert_eq!(amoy.endpoint_url, Some("https://amoy.example/rpc"));
    assert_eq!(amoy.signing_keys[0].expose(), "0xfeed");

    // Sepolia shares the key but has no endpoint.
    assert!(matches!(
        config.resolve_network(Network::Sepolia),
        Err(ConfigError::MisconfiguredNetwork { network: Network::Sepolia, .. })
    ));
}

#[test]
fn test_hash_map_environment() {
    let mut env = HashMap::new();
    env.insert(SEPOLIA_API_URL.to_string(), "https://rpc.example/x".to_string());
    env.insert(ADMIN_PRIVATE_KEY.to_string(), "0xabc".to_string());

    let config = ToolchainConfig::from_env(&env);
    let manifest = Manifest::build(&config, SecretPolicy::Reveal);

    assert_eq!(manifest.default_network, "hardhat");
    assert_eq!(
        manifest.networks["sepolia"].url.as_deref(),
        Some("https://rpc.example/x")
    );
    assert_eq!(
        manifest.networks["sepolia"].accounts,
        Some(vec!["0xabc".to_string()])
    );
    assert_eq!(manifest.networks["hardhat"].url, None);
    assert_eq!(manifest.networks["hardhat"].accounts, None);
}

#[test]
fn test_identical_environments_give_identical_output() {
    let env: EnvSnapshot = [(SEPOLIA_API_URL, "https://rpc.example/x")]
        .into_iter()
        .collect();
    let first = Manifest::build(&ToolchainConfig::from_env(&env), SecretPolicy::Reveal)
        .to_json()
        .unwrap();
    let second = Manifest::build(&ToolchainConfig::from_env(&env.clone()), SecretPolicy::Reveal)
        .to_json()
        .unwrap();
    assert_eq!(first.as_bytes(), second.as_bytes());
}
