// ABOUTME: One-shot initializer for the Winter Arc tracker store
// ABOUTME: Migrates the schema and creates the first user account

//! # Store Initializer
//!
//! Creates the backing schema and the first user, the same bootstrap the
//! deployment scripts always ran before the first launch.

use anyhow::{bail, Result};
use clap::Parser;
use tracing::info;
use winter_arc_server::{
    auth::AuthManager,
    config::environment::ServerConfig,
    database_plugins::{factory::Store, CreateUserOutcome, StoreProvider},
    logging,
    models::User,
};

#[derive(Parser)]
#[command(name = "winter-arc-init")]
#[command(about = "Initialize the tracker store and create the first user")]
struct Args {
    /// Username for the first account
    #[arg(long)]
    username: String,

    /// Password for the first account; omit for a passwordless account
    #[arg(long)]
    password: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;
    let config = ServerConfig::from_env()?;
    info!("{}", config.summary());

    let store = Store::new(&config.store.url).await?;
    store.migrate().await?;
    info!("Store initialized: {}", store.backend_info());

    let password_hash = args
        .password
        .as_deref()
        .map(AuthManager::hash_password)
        .transpose()?;

    let user = User::new(args.username.clone(), password_hash, None);
    match store.create_user(&user).await? {
        CreateUserOutcome::Created(user_id) => {
            info!("Created user {} ({user_id})", args.username);
            Ok(())
        }
        CreateUserOutcome::AlreadyExists => {
            bail!("user {} already exists", args.username)
        }
    }
}
