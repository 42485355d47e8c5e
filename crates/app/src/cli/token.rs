use clap::{Args, Subcommand};
use uuid::Uuid;

use bazaar_app::auth::PgAuthService;

#[derive(Debug, Args)]
pub(crate) struct TokenCommand {
    #[command(subcommand)]
    command: TokenSubcommand,
}

#[derive(Debug, Subcommand)]
enum TokenSubcommand {
    Create(CreateTokenArgs),
    Revoke(RevokeTokenArgs),
}

#[derive(Debug, Args)]
pub(crate) struct CreateTokenArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// User that should own the token
    #[arg(long)]
    username: String,
}

#[derive(Debug, Args)]
pub(crate) struct RevokeTokenArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Token UUID to revoke
    #[arg(long)]
    token_uuid: Uuid,
}

pub(crate) async fn run(command: TokenCommand) -> Result<(), String> {
    match command.command {
        TokenSubcommand::Create(args) => create(args).await,
        TokenSubcommand::Revoke(args) => revoke(args).await,
    }
}

async fn create(args: CreateTokenArgs) -> Result<(), String> {
    let pool = super::connect(&args.database_url).await?;
    let service = PgAuthService::new(pool);

    let issued = service
        .issue_api_token(&args.username)
        .await
        .map_err(|error| format!("failed to create token: {error}"))?;

    println!("token_uuid: {}", issued.metadata.uuid);
    println!("user_id: {}", issued.metadata.user_id);
    println!("token_created_at: {}", issued.metadata.created_at);
    println!("api_token: {}", issued.token);
    println!("store this token now; it is only shown once");

    Ok(())
}

async fn revoke(args: RevokeTokenArgs) -> Result<(), String> {
    let pool = super::connect(&args.database_url).await?;
    let service = PgAuthService::new(pool);

    let revoked = service
        .revoke_api_token(args.token_uuid)
        .await
        .map_err(|error| format!("failed to revoke token: {error}"))?;

    if revoked {
        println!("revoked token {}", args.token_uuid);
    } else {
        println!("token {} was not active", args.token_uuid);
    }

    Ok(())
}
