//! CLI for RcodeZero DNS provider configuration.
//!
//! Usage:
//!   rcodezero-adapt adapt -c providers.caddyfile              # JSON on stdout
//!   rcodezero-adapt adapt -c providers.caddyfile --provision  # expand {$VARS} first
//!   rcodezero-adapt validate -c providers.json                # parse + provision
//!   rcodezero-adapt list-modules

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use rcodezero_dns::adapt::{self, Modules};
use rcodezero_dns::{modules, ProvisionContext};

/// Adapt and validate RcodeZero DNS provider configuration
#[derive(Parser, Debug)]
#[command(name = "rcodezero-adapt")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level used when RUST_LOG is unset
    #[arg(long = "log-level", env = "RCODEZERO_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a directive file into JSON module configuration
    Adapt {
        /// Directive file to adapt
        #[arg(short = 'c', long = "config", env = "RCODEZERO_CONFIG")]
        config: PathBuf,

        /// Pretty-print the JSON output
        #[arg(long = "pretty")]
        pretty: bool,

        /// Expand placeholders and validate before printing
        #[arg(long = "provision")]
        provision: bool,
    },
    /// Parse and provision a directive or JSON file
    Validate {
        /// Configuration file (`.json` is read as JSON, anything else as directives)
        #[arg(short = 'c', long = "config", env = "RCODEZERO_CONFIG")]
        config: PathBuf,
    },
    /// List registered DNS provider modules
    ListModules,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    rcodezero_common::init_tracing(&cli.log_level)?;

    match cli.command {
        Commands::Adapt {
            config,
            pretty,
            provision,
        } => adapt_config(&config, pretty, provision),
        Commands::Validate { config } => validate_config(&config),
        Commands::ListModules => {
            for id in modules().ids() {
                println!("{}", id);
            }
            Ok(())
        }
    }
}

/// Load modules from a file, choosing the format by extension
fn load_modules(path: &Path) -> Result<Modules> {
    let input = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let loaded = if is_json {
        adapt::parse_json(modules(), &input)
    } else {
        adapt::parse_directives(modules(), &path.display().to_string(), &input)
    };
    loaded.with_context(|| format!("Failed to load {}", path.display()))
}

fn adapt_config(path: &Path, pretty: bool, provision: bool) -> Result<()> {
    let mut loaded = load_modules(path)?;

    if provision {
        adapt::provision_all(&mut loaded, &ProvisionContext::default())
            .context("Provisioning failed")?;
    }

    let document = adapt::to_json(&loaded);
    let output = if pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    println!("{}", output);
    Ok(())
}

fn validate_config(path: &Path) -> Result<()> {
    let mut loaded = load_modules(path)?;
    if loaded.is_empty() {
        warn!(path = %path.display(), "No DNS provider configured");
    }

    adapt::provision_all(&mut loaded, &ProvisionContext::default())
        .context("Provisioning failed")?;

    for module in &loaded {
        info!(module = module.module_info().id, "Module configuration valid");
    }
    println!("Valid configuration: {} provider(s)", loaded.len());
    Ok(())
}
