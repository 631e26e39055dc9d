use anyhow::Result;
use clap::{Parser, Subcommand};
use sqlx::migrate::MigrateDatabase;

mod cli;

/// pantry - recipe sharing and shopping lists
#[derive(Parser)]
#[command(name = "pantry")]
#[command(about = "Recipe sharing service with favorites, subscriptions and shopping lists", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
    /// Manage users
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Manage tags and ingredients
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Grant or revoke superuser access
    SetRole {
        email: String,
        #[arg(value_enum)]
        role: cli::user::Role,
    },
}

#[derive(Subcommand)]
enum CatalogCommands {
    /// Add a recipe tag
    AddTag {
        #[arg(long)]
        name: String,
        /// Hex color, #RRGGBB
        #[arg(long)]
        color: String,
        #[arg(long)]
        slug: String,
    },
    /// Add an ingredient with its measurement unit
    AddIngredient {
        #[arg(long)]
        name: String,
        #[arg(long)]
        unit: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = pantry::config::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    pantry::observability::init_observability(
        "pantry",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
    )?;

    match cli.command {
        Commands::Serve { host, port } => cli::server::serve(config, host, port).await,
        Commands::Migrate => migrate_command(config).await,
        Commands::Reset => reset_command(config).await,
        Commands::User {
            command: UserCommands::SetRole { email, role },
        } => cli::user::set_role(config, email, role).await,
        Commands::Catalog { command } => match command {
            CatalogCommands::AddTag { name, color, slug } => {
                cli::catalog::add_tag(config, name, color, slug).await
            }
            CatalogCommands::AddIngredient { name, unit } => {
                cli::catalog::add_ingredient(config, name, unit).await
            }
        },
    }
}

#[tracing::instrument(skip(config))]
async fn migrate_command(config: pantry::config::Config) -> Result<()> {
    tracing::info!("Running database migrations...");

    if !sqlx::Sqlite::database_exists(&config.database.url).await? {
        tracing::info!("Database does not exist, creating: {}", config.database.url);
        sqlx::Sqlite::create_database(&config.database.url).await?;
    }

    let pool = pantry::db::create_pool(&config.database.url, 1).await?;
    pantry::migrate(&pool).await?;
    pool.close().await;

    tracing::info!("Migrations completed successfully");

    Ok(())
}

#[tracing::instrument(skip(config))]
async fn reset_command(config: pantry::config::Config) -> Result<()> {
    tracing::info!("Resetting database...");

    if sqlx::Sqlite::database_exists(&config.database.url).await? {
        tracing::warn!("Dropping existing database: {}", config.database.url);
        sqlx::Sqlite::drop_database(&config.database.url).await?;
    } else {
        tracing::info!("Database does not exist, nothing to drop");
    }

    migrate_command(config).await?;

    tracing::info!("Database reset completed successfully");

    Ok(())
}
