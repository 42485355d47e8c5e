use clap::{Args, Subcommand};

use bazaar::users::Role;
use bazaar_app::auth::PgAuthService;

#[derive(Debug, Args)]
pub(crate) struct UserCommand {
    #[command(subcommand)]
    command: UserSubcommand,
}

#[derive(Debug, Subcommand)]
enum UserSubcommand {
    Create(CreateUserArgs),
}

#[derive(Debug, Args)]
pub(crate) struct CreateUserArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Login name
    #[arg(long)]
    username: String,

    /// `user` or `admin`
    #[arg(long, default_value = "user")]
    role: Role,
}

pub(crate) async fn run(command: UserCommand) -> Result<(), String> {
    match command.command {
        UserSubcommand::Create(args) => create(args).await,
    }
}

async fn create(args: CreateUserArgs) -> Result<(), String> {
    if args.username.trim().is_empty() {
        return Err("username cannot be empty".to_string());
    }

    let pool = super::connect(&args.database_url).await?;
    let service = PgAuthService::new(pool);

    let user = service
        .create_user(&args.username, args.role)
        .await
        .map_err(|error| format!("failed to create user: {error}"))?;

    let issued = service
        .issue_api_token(&user.username)
        .await
        .map_err(|error| format!("failed to create token: {error}"))?;

    println!("user_id: {}", user.id);
    println!("username: {}", user.username);
    println!("role: {}", user.role);
    println!("token_uuid: {}", issued.metadata.uuid);
    println!("api_token: {}", issued.token);
    println!("store this token now; it is only shown once");

    Ok(())
}
