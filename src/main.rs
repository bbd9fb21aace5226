use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use switchboard::api;
use switchboard::flags::{Environment, FlagResolver, ManifestLoader};
use switchboard::store::RecordStore;

#[derive(Parser)]
#[command(name = "switchboard")]
#[command(about = "Environment-scoped feature flags with conditional route mounting")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Switchboard server
    Serve {
        /// Port for HTTP API
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Environment whose flag manifest to load
        #[arg(short, long, default_value = "stage")]
        environment: Environment,

        /// Directory containing per-environment flag manifests
        #[arg(short, long, default_value = "flags")]
        manifest_dir: PathBuf,

        /// Path to the task record store (defaults to the platform data directory)
        #[arg(long)]
        store: Option<PathBuf>,
    },
    /// Print the resolved flag set for an environment
    Flags {
        #[arg(short, long, default_value = "stage")]
        environment: Environment,

        #[arg(short, long, default_value = "flags")]
        manifest_dir: PathBuf,
    },
    /// Validate an environment's flag manifest without starting the server
    Check {
        #[arg(short, long, default_value = "stage")]
        environment: Environment,

        #[arg(short, long, default_value = "flags")]
        manifest_dir: PathBuf,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "switchboard=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn serve(
    port: u16,
    environment: Environment,
    manifest_dir: PathBuf,
    store_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    tracing::info!(
        "Starting Switchboard server for environment '{}' on port {}",
        environment,
        port
    );

    let resolver = FlagResolver::new(ManifestLoader::new(manifest_dir), environment);
    let store = match store_path {
        Some(path) => RecordStore::open(path)?,
        None => RecordStore::open_default()?,
    };

    // An overlapping capability prefix aborts startup here.
    let app = api::create_router(resolver, store)?;

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("Switchboard server listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Some(Commands::Serve {
            port,
            environment,
            manifest_dir,
            store,
        }) => {
            serve(port, environment, manifest_dir, store).await?;
        }
        Some(Commands::Flags {
            environment,
            manifest_dir,
        }) => {
            let manifest = ManifestLoader::new(manifest_dir).load(environment);
            println!("environment: {}", manifest.environment);
            for (name, record) in &manifest.features {
                println!(
                    "  {:<20} {:<4} {}",
                    name,
                    if record.enabled { "on" } else { "off" },
                    record.description.as_deref().unwrap_or("")
                );
            }
            println!(
                "{} flags, {} enabled",
                manifest.features.len(),
                manifest.enabled_names().len()
            );
        }
        Some(Commands::Check {
            environment,
            manifest_dir,
        }) => {
            let loader = ManifestLoader::new(manifest_dir);
            let manifest = loader.try_load(environment)?;
            println!(
                "{}: {} flags, {} enabled",
                loader.manifest_path(environment).display(),
                manifest.features.len(),
                manifest.enabled_names().len()
            );
        }
        None => {
            // Default: serve the stage environment on port 3000.
            serve(3000, Environment::Stage, PathBuf::from("flags"), None).await?;
        }
    }

    Ok(())
}
