//! NGENIX Sync
//!
//! Operator CLI over the reconciliation library. Declarative documents are
//! JSON files in the `*Input` shape; results are printed to stdout as JSON,
//! logs go to stderr.
//!
//! # Usage
//! ```bash
//! # Check a document without touching the platform
//! ngenix-sync validate dns-zone --file zone.json
//!
//! # Create, then update by id
//! ngenix-sync create traffic-pattern --file office.json
//! ngenix-sync update traffic-pattern --id 4242 --file office.json
//!
//! # Create or converge by name
//! ngenix-sync apply ruleset --file waf.json
//!
//! # Adopt an existing object
//! ngenix-sync import dns-zone --name example.ru
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use ngenix_sync::reconcile::Resource;
use ngenix_sync::{ClientConfig, DnsZones, Reconciler, RestClient, Rulesets, TrafficPatterns};

// ============================================================
// CLI Definition
// ============================================================

#[derive(Parser, Debug)]
#[command(name = "ngenix-sync", version)]
#[command(about = "Reconcile NGENIX DNS zones, traffic patterns and WAF rulesets", long_about = None)]
struct Cli {
    /// Base URL of the NGENIX API
    #[arg(long, env = "NGENIX_HOST", default_value = "https://api.ngenix.net/api/v3")]
    host: String,

    /// API login, `email/token`
    #[arg(long, env = "NGENIX_USERNAME")]
    username: Option<String>,

    /// API token
    #[arg(long, env = "NGENIX_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Customer owning created objects
    #[arg(long, env = "NGENIX_CUSTOMER_ID")]
    customer_id: Option<i64>,

    /// Request timeout in seconds
    #[arg(long, env = "NGENIX_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum KindArg {
    DnsZone,
    TrafficPattern,
    Ruleset,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a document locally
    Validate {
        kind: KindArg,
        #[arg(long)]
        file: PathBuf,
    },

    /// List every object of a kind
    List { kind: KindArg },

    /// Print an object in document form
    Show {
        kind: KindArg,
        #[arg(long)]
        id: String,
    },

    /// Adopt an existing object by id or name and print its snapshot
    Import {
        kind: KindArg,
        #[arg(long, conflicts_with = "name", required_unless_present = "name")]
        id: Option<String>,
        #[arg(long)]
        name: Option<String>,
    },

    /// Create an object from a document
    Create {
        kind: KindArg,
        #[arg(long)]
        file: PathBuf,
    },

    /// Update the object with this id from a document
    Update {
        kind: KindArg,
        #[arg(long)]
        id: String,
        #[arg(long)]
        file: PathBuf,
    },

    /// Create the object if its name is unknown, otherwise converge it
    Apply {
        kind: KindArg,
        #[arg(long)]
        file: PathBuf,
    },

    /// Delete the object with this id
    Delete {
        kind: KindArg,
        #[arg(long)]
        id: String,
    },
}

impl Commands {
    fn kind(&self) -> KindArg {
        match self {
            Commands::Validate { kind, .. }
            | Commands::List { kind }
            | Commands::Show { kind, .. }
            | Commands::Import { kind, .. }
            | Commands::Create { kind, .. }
            | Commands::Update { kind, .. }
            | Commands::Apply { kind, .. }
            | Commands::Delete { kind, .. } => *kind,
        }
    }
}

// ============================================================
// Main Entry Point
// ============================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.json)?;

    match cli.command.kind() {
        KindArg::DnsZone => execute::<DnsZones>(&cli).await,
        KindArg::TrafficPattern => execute::<TrafficPatterns>(&cli).await,
        KindArg::Ruleset => execute::<Rulesets>(&cli).await,
    }
}

fn init_logging(verbose: bool, json: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let builder = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

async fn execute<R>(cli: &Cli) -> Result<()>
where
    R: Resource,
    R::Input: DeserializeOwned + Serialize + for<'a> From<&'a R::Model>,
{
    match &cli.command {
        Commands::Validate { file, .. } => {
            let input: R::Input = read_document(file)?;
            let model = R::validate(&input)
                .with_context(|| format!("{} is not a valid {}", file.display(), R::KIND))?;
            info!("✅ {} is a valid {}", file.display(), R::KIND);
            print_json(&model)
        }

        Commands::List { .. } => {
            let snapshots = connect(cli)?.list::<R>().await?;
            info!("📋 Listed {} {} objects", snapshots.len(), R::KIND);
            print_json(&snapshots)
        }

        Commands::Show { id, .. } => {
            let snapshot = connect(cli)?.import::<R>(id).await?;
            let document: R::Input = (&snapshot.model).into();
            print_json(&document)
        }

        Commands::Import { id, name, .. } => {
            let reconciler = connect(cli)?;
            let snapshot = match (id, name) {
                (Some(id), _) => reconciler.import::<R>(id).await?,
                (None, Some(name)) => reconciler.import_by_name::<R>(name).await?,
                (None, None) => bail!("either --id or --name is required"),
            };
            print_json(&snapshot)
        }

        Commands::Create { file, .. } => {
            let input: R::Input = read_document(file)?;
            let snapshot = connect(cli)?.create::<R>(&input).await?;
            info!("✅ Created {} {}", R::KIND, snapshot.id);
            print_json(&snapshot)
        }

        Commands::Update { id, file, .. } => {
            let input: R::Input = read_document(file)?;
            let reconciler = connect(cli)?;
            let current = reconciler.import::<R>(id).await?;
            let snapshot = reconciler.update::<R>(&current, &input).await?;
            print_json(&snapshot)
        }

        Commands::Apply { file, .. } => {
            let input: R::Input = read_document(file)?;
            let snapshot = connect(cli)?.reconcile_by_name::<R>(&input).await?;
            print_json(&snapshot)
        }

        Commands::Delete { id, .. } => {
            let reconciler = connect(cli)?;
            let current = reconciler.import::<R>(id).await?;
            warn!("🗑️  Deleting {} '{}' ({})", R::KIND, current.name, current.id);
            let snapshot = reconciler.delete::<R>(&current).await?;
            print_json(&snapshot)
        }
    }
}

/// Build a client from flags and environment, rejecting empty credentials
fn connect(cli: &Cli) -> Result<Reconciler<RestClient>> {
    let config = client_config(cli)?;
    info!(host = %config.host, customer_id = config.customer_id, "Connecting");
    let client = RestClient::new(config).context("Failed to build HTTP client")?;
    Ok(Reconciler::new(client))
}

fn client_config(cli: &Cli) -> Result<ClientConfig> {
    fn required(value: &Option<String>, flag: &str, env: &str) -> Result<String> {
        match value.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => Ok(value.to_string()),
            _ => bail!("missing API {}: set --{} or {}", flag, flag, env),
        }
    }

    if cli.host.trim().is_empty() {
        bail!("missing API host: set --host or NGENIX_HOST");
    }

    Ok(ClientConfig {
        host: cli.host.trim().to_string(),
        username: required(&cli.username, "username", "NGENIX_USERNAME")?,
        password: required(&cli.password, "password", "NGENIX_PASSWORD")?,
        customer_id: cli
            .customer_id
            .context("missing customer id: set --customer-id or NGENIX_CUSTOMER_ID")?,
        timeout: Duration::from_secs(cli.timeout_secs),
    })
}

fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["ngenix-sync"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_kind_is_positional() {
        let cli = parse(&["create", "traffic-pattern", "--file", "office.json"]);
        assert_eq!(cli.command.kind(), KindArg::TrafficPattern);
    }

    #[test]
    fn test_import_needs_id_or_name() {
        assert!(Cli::try_parse_from(["ngenix-sync", "import", "ruleset"]).is_err());
        assert!(Cli::try_parse_from(["ngenix-sync", "import", "ruleset", "--id", "1", "--name", "waf"]).is_err());

        let cli = parse(&["import", "dns-zone", "--name", "example.ru"]);
        assert!(matches!(cli.command, Commands::Import { id: None, name: Some(_), .. }));
    }

    #[test]
    fn test_client_config_rejects_empty_credentials() {
        let cli = parse(&[
            "--username", "ops@example.ru/token",
            "--password", "  ",
            "--customer-id", "1001",
            "list", "ruleset",
        ]);
        let err = client_config(&cli).unwrap_err();
        assert!(err.to_string().contains("password"));

        let cli = parse(&[
            "--host", "api.ngenix.net",
            "--username", "ops@example.ru/token",
            "--password", "s3cr3t",
            "--customer-id", "1001",
            "--timeout-secs", "5",
            "list", "ruleset",
        ]);
        let config = client_config(&cli).unwrap();
        assert_eq!(config.customer_id, 1001);
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}
