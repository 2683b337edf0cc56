//! CLI command definitions and dispatch.

use clap::{Args, Parser, Subcommand};

use cloudstore_auth::JwtEncoder;
use cloudstore_core::config::{AppConfig, DatabaseDriver};
use cloudstore_core::error::AppError;
use cloudstore_database::migration::run_migrations;
use cloudstore_database::{DatabasePool, open_stores};
use cloudstore_entity::user::normalize_email;
use cloudstore_service::Services;

/// CloudStore: file sharing and access service
#[derive(Debug, Parser)]
#[command(name = "cloudstore-server", version, about, long_about = None)]
pub struct Cli {
    /// Directory holding default.toml and the environment overlays
    #[arg(long, default_value = "config", env = "CLOUDSTORE_CONFIG_DIR")]
    pub config_dir: String,

    /// Environment overlay to merge over the defaults
    #[arg(long, default_value = "development", env = "CLOUDSTORE_ENV")]
    pub env: String,

    /// Subcommand to execute; `serve` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve,
    /// Apply pending database migrations
    Migrate,
    /// User management
    #[command(subcommand)]
    User(UserCommand),
    /// Sign an access token for a registered user (development aid)
    Token(TokenArgs),
    /// Run the trash retention sweep once
    PurgeTrash,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Register a user
    Add(AddUserArgs),
}

/// Arguments for `user add`
#[derive(Debug, Args)]
pub struct AddUserArgs {
    /// Email address
    #[arg(long)]
    pub email: String,
    /// Display name
    #[arg(long)]
    pub name: String,
}

/// Arguments for `token`
#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Email of the user to sign for
    #[arg(long)]
    pub email: String,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        match &self.command {
            None | Some(Commands::Serve) => cloudstore_api::run_server(config).await,
            Some(Commands::Migrate) => migrate(&config).await,
            Some(Commands::User(UserCommand::Add(args))) => add_user(&config, args).await,
            Some(Commands::Token(args)) => token(&config, args).await,
            Some(Commands::PurgeTrash) => purge_trash(&config).await,
        }
    }
}

async fn services(config: &AppConfig) -> Result<(Services, Option<DatabasePool>), AppError> {
    let (stores, pool) = open_stores(&config.database).await?;
    let services = Services::new(stores, config.sharing.clone(), config.trash.clone());
    Ok((services, pool))
}

async fn migrate(config: &AppConfig) -> Result<(), AppError> {
    if config.database.driver == DatabaseDriver::Memory {
        return Err(AppError::configuration(
            "Migrations apply to the postgres driver only",
        ));
    }
    let db = DatabasePool::connect(&config.database).await?;
    run_migrations(db.pool()).await?;
    db.close().await;
    println!("Migrations applied");
    Ok(())
}

async fn add_user(config: &AppConfig, args: &AddUserArgs) -> Result<(), AppError> {
    let (services, pool) = services(config).await?;
    let user = services.users.register(&args.email, &args.name).await?;
    println!("Registered {} ({})", user.email, user.id);
    if let Some(pool) = pool {
        pool.close().await;
    }
    Ok(())
}

async fn token(config: &AppConfig, args: &TokenArgs) -> Result<(), AppError> {
    let (services, pool) = services(config).await?;
    let email = normalize_email(&args.email);
    let user = services
        .users
        .find_by_email(&email)
        .await?
        .ok_or_else(|| AppError::not_found(format!("No registered user with email {email}")))?;

    let (token, expires_at) =
        JwtEncoder::new(&config.auth).generate_access_token(user.id, &user.email)?;
    println!("{token}");
    eprintln!("expires at {expires_at}");
    if let Some(pool) = pool {
        pool.close().await;
    }
    Ok(())
}

async fn purge_trash(config: &AppConfig) -> Result<(), AppError> {
    let (services, pool) = services(config).await?;
    let report = services.trash.purge_expired().await?;
    println!(
        "Purged {} item(s), {} failure(s)",
        report.success_count, report.error_count
    );
    if let Some(pool) = pool {
        pool.close().await;
    }
    Ok(())
}
