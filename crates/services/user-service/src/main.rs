//! User Service - account management command line.

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use common::AppError;
use domain::{LoginRequest, RegisterRequest, UpdateRequest};
use user_service_lib::config::UserServiceConfig;
use user_service_lib::security::TokenIssuer;
use user_service_lib::service::AccountService;
use user_service_lib::MigrateAction;

#[derive(Parser)]
#[command(name = "user-service")]
#[command(about = "User account management")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Database migration commands
    Migrate {
        #[command(subcommand)]
        action: MigrateCommands,
    },
    /// Seed roles and the configured administrator
    Seed,
    /// Register a new customer account
    Register(ProfileArgs),
    /// Verify credentials and print a session token
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Replace the profile of an existing account
    Update {
        uuid: Uuid,
        #[command(flatten)]
        profile: ProfileArgs,
    },
    /// Show an account by UUID
    Show { uuid: Uuid },
    /// Verify a session token and show the identity it carries
    Whoami { token: String },
}

#[derive(Args)]
struct ProfileArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    username: String,
    #[arg(long)]
    password: String,
    #[arg(long)]
    confirm_password: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone_number: String,
}

#[derive(Subcommand)]
enum MigrateCommands {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

/// Conflicts carry their client message; other failures keep full detail.
fn conflict_message(err: AppError) -> Box<dyn std::error::Error> {
    if err.is_conflict() {
        err.user_message().into()
    } else {
        err.into()
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = UserServiceConfig::from_env()?;

    match cli.command {
        Commands::Migrate { action } => {
            let migrate_action = match action {
                MigrateCommands::Up => MigrateAction::Up,
                MigrateCommands::Down => MigrateAction::Down,
                MigrateCommands::Status => MigrateAction::Status,
                MigrateCommands::Fresh => MigrateAction::Fresh,
            };
            user_service_lib::run_migrations(&config, migrate_action).await?;
        }
        Commands::Seed => {
            user_service_lib::run_seed(&config).await?;
        }
        Commands::Register(profile) => {
            let service = user_service_lib::connect(&config).await?;
            let view = service
                .register(RegisterRequest {
                    name: profile.name,
                    username: profile.username,
                    password: profile.password,
                    confirm_password: profile.confirm_password,
                    email: profile.email,
                    phone_number: profile.phone_number,
                })
                .await
                .map_err(conflict_message)?;
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        Commands::Login { username, password } => {
            let service = user_service_lib::connect(&config).await?;
            match service.login(LoginRequest { username, password }).await {
                Ok(response) => println!("{}", serde_json::to_string_pretty(&response)?),
                Err(e) if e.is_authentication_failure() => {
                    return Err("invalid username or password".into());
                }
                Err(e) => return Err(e.into()),
            }
        }
        Commands::Update { uuid, profile } => {
            let service = user_service_lib::connect(&config).await?;
            let view = service
                .update(
                    uuid,
                    UpdateRequest {
                        name: profile.name,
                        username: profile.username,
                        password: profile.password,
                        confirm_password: profile.confirm_password,
                        email: profile.email,
                        phone_number: profile.phone_number,
                    },
                )
                .await
                .map_err(conflict_message)?;
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        Commands::Show { uuid } => {
            let service = user_service_lib::connect(&config).await?;
            let view = service.get_by_uuid(uuid).await?;
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        Commands::Whoami { token } => {
            let raw = token
                .strip_prefix(domain::BEARER_TOKEN_PREFIX)
                .unwrap_or(&token);
            let claims = TokenIssuer::from_config(&config.jwt)?.verify(raw)?;
            println!("{}", serde_json::to_string_pretty(claims.account())?);
        }
    }

    Ok(())
}
