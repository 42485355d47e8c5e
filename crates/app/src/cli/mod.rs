use clap::{Parser, Subcommand};
use sqlx::PgPool;

use bazaar_app::database;

mod promotions;
mod seed;
mod token;
mod user;

#[derive(Debug, Parser)]
#[command(name = "bazaar-app", about = "Bazaar CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    User(user::UserCommand),
    Token(token::TokenCommand),
    Seed(seed::SeedArgs),
    Promotions(promotions::PromotionsCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::User(command) => user::run(command).await,
            Commands::Token(command) => token::run(command).await,
            Commands::Seed(args) => seed::run(args).await,
            Commands::Promotions(command) => promotions::run(command).await,
        }
    }
}

/// Connect and bring the schema up to date.
async fn connect(database_url: &str) -> Result<PgPool, String> {
    let pool = database::connect(database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    database::migrate(&pool)
        .await
        .map_err(|error| format!("failed to apply migrations: {error}"))?;

    Ok(pool)
}
