use clap::{Args, Subcommand};
use jiff::Timestamp;
use tabled::{
    builder::Builder,
    settings::{Color, Style, object::Rows},
};

use bazaar_app::{
    database::Db,
    domain::promotions::{PgPromotionsService, PromotionsService},
};

#[derive(Debug, Args)]
pub(crate) struct PromotionsCommand {
    #[command(subcommand)]
    command: PromotionsSubcommand,
}

#[derive(Debug, Subcommand)]
enum PromotionsSubcommand {
    /// Rewrite persisted statuses that disagree with the clock
    Sync(SyncArgs),
}

#[derive(Debug, Args)]
pub(crate) struct SyncArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(command: PromotionsCommand) -> Result<(), String> {
    match command.command {
        PromotionsSubcommand::Sync(args) => sync(args).await,
    }
}

async fn sync(args: SyncArgs) -> Result<(), String> {
    let db = Db::new(super::connect(&args.database_url).await?);
    let service = PgPromotionsService::new(db);

    let report = service
        .sync_statuses(Timestamp::now())
        .await
        .map_err(|error| format!("failed to sync promotion statuses: {error}"))?;

    println!("checked {} promotions, updated {}", report.total, report.updated());

    if report.changes.is_empty() {
        return Ok(());
    }

    let mut builder = Builder::default();

    builder.push_record(["Promotion", "Name", "From", "To"]);

    for change in &report.changes {
        builder.push_record([
            change.promotion_id.to_string(),
            change.name.clone(),
            change.from.to_string(),
            change.to.to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);

    println!("{table}");

    Ok(())
}
