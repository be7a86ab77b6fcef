//! # Command Line Interface
//!
//! `serve` runs the HTTP API (the default); `database` manages the schema.

use clap::{Parser, Subcommand};

use crate::api::start_api_server;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::observability::{init_observability, log_config_info};
use crate::startup::build_app;
use crate::storage::{create_pool, get_migration_version, list_applied_migrations, run_migrations};

#[derive(Parser)]
#[command(name = "staffdesk")]
#[command(about = "Role-scoped HR API")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Database URL override
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    /// Port override
    #[arg(long, global = true)]
    pub port: Option<u16>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API server
    Serve,

    /// Database management commands
    Database {
        #[command(subcommand)]
        command: DatabaseCommands,
    },
}

#[derive(Subcommand)]
pub enum DatabaseCommands {
    /// Run pending migrations
    Migrate,

    /// Show the current schema version
    Status,

    /// List all applied migrations
    List,
}

/// Parse arguments, load configuration and dispatch.
pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::from_env()?;
    if let Some(url) = cli.database_url {
        config.database.url = url;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    config.validate()?;

    init_observability(&config.observability)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Database { command } => database(config, command).await,
    }
}

async fn serve(config: AppConfig) -> Result<()> {
    log_config_info(&config);
    let router = build_app(&config).await?;
    start_api_server(&config.server, router).await
}

async fn database(mut config: AppConfig, command: DatabaseCommands) -> Result<()> {
    // migrations run explicitly below, not as a side effect of connecting
    config.database.auto_migrate = false;
    let pool = create_pool(&config.database).await?;

    match command {
        DatabaseCommands::Migrate => {
            run_migrations(&pool).await?;
            println!("Migrations applied");
        }
        DatabaseCommands::Status => match get_migration_version(&pool).await? {
            Some(version) => println!("Schema version: {}", version),
            None => println!("No migrations applied"),
        },
        DatabaseCommands::List => {
            for migration in list_applied_migrations(&pool).await? {
                println!(
                    "{:>16}  {}  {}",
                    migration.version, migration.installed_on, migration.description
                );
            }
        }
    }

    Ok(())
}
