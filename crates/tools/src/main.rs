use anyhow::{Context, Result};
use chainkit_tools::secret::mask_url;
use chainkit_tools::{logging, Manifest, Network, SecretPolicy, ToolchainConfig};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "chainkit")]
#[command(about = "Contract toolchain configuration: networks, keys, compiler and paths")]
struct Cli {
    /// Dotenv file overlaid on the process environment
    #[arg(long, global = true, default_value = ".env")]
    env_file: PathBuf,

    /// Ignore the dotenv file
    #[arg(long, global = true)]
    no_dotenv: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Toml,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved configuration (secrets hidden)
    Show,
    /// Print the toolchain manifest
    Export {
        #[arg(short, long, value_enum, default_value = "json")]
        format: Format,
        /// Include private keys and API keys in the output
        #[arg(long)]
        reveal_secrets: bool,
    },
    /// Check that a network is usable (defaults to the default network)
    Check {
        #[arg(short, long)]
        network: Option<String>,
    },
    /// List supported networks
    Networks,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let dotenv = (!cli.no_dotenv).then_some(cli.env_file.as_path());
    let config = ToolchainConfig::load_with_dotenv(dotenv)
        .with_context(|| format!("Failed to read {}", cli.env_file.display()))?;

    match cli.command {
        Commands::Show => {
            config.print_summary();
        }
        Commands::Export {
            format,
            reveal_secrets,
        } => {
            let policy = if reveal_secrets {
                SecretPolicy::Reveal
            } else {
                SecretPolicy::Redact
            };
            let manifest = Manifest::build(&config, policy);
            let rendered = match format {
                Format::Json => manifest.to_json(),
                Format::Toml => manifest.to_toml(),
            }
            .context("Failed to render manifest")?;
            println!("{}", rendered);
        }
        Commands::Check { network } => {
            let name = network.unwrap_or_else(|| config.default_network.to_string());
            let resolved = config.resolve(&name)?;
            match resolved.endpoint_url {
                Some(url) => println!(
                    "{} is ready: {} (chain {}), {} signing key(s)",
                    resolved.network,
                    mask_url(url),
                    resolved.chain_id,
                    resolved.signing_keys.len()
                ),
                None => println!(
                    "{} is ready: simulated (chain {})",
                    resolved.network, resolved.chain_id
                ),
            }
        }
        Commands::Networks => {
            for network in Network::ALL {
                let marker = if network == config.default_network { "*" } else { " " };
                println!(
                    "{} {:<8} chain {:<9} {}",
                    marker,
                    network,
                    network.chain_id(),
                    network.endpoint_var().unwrap_or("(in-process)")
                );
            }
        }
    }

    Ok(())
}
