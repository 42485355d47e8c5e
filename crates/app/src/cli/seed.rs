use std::path::PathBuf;

use clap::Args;
use jiff::Timestamp;

use bazaar::{fixtures::Fixture, products::ProductDraft, promotions::PromotionDraft};
use bazaar_app::{
    database::Db,
    domain::{
        products::{PgProductsService, ProductsService},
        promotions::{PgPromotionsService, PromotionsService},
    },
};

#[derive(Debug, Args)]
pub(crate) struct SeedArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Fixture set to load, e.g. `shop`
    #[arg(long)]
    fixture: String,

    /// Directory holding `products/` and `promotions/`
    #[arg(long, default_value = "./fixtures")]
    fixtures_dir: PathBuf,
}

pub(crate) async fn run(args: SeedArgs) -> Result<(), String> {
    let now = Timestamp::now();

    let mut fixture = Fixture::with_base_path(&args.fixtures_dir, now);

    fixture
        .load_products(&args.fixture)
        .and_then(|fixture| fixture.load_promotions(&args.fixture))
        .map_err(|error| format!("failed to load fixture {}: {error}", args.fixture))?;

    let db = Db::new(super::connect(&args.database_url).await?);
    let products = PgProductsService::new(db.clone());
    let promotions = PgPromotionsService::new(db);

    for product in fixture.products() {
        products
            .create_product(product.id, ProductDraft::from(product.clone()), now)
            .await
            .map_err(|error| format!("failed to seed product {}: {error}", product.name))?;
    }

    for promotion in fixture.promotions() {
        promotions
            .create_promotion(promotion.id, PromotionDraft::from(promotion.clone()), now)
            .await
            .map_err(|error| format!("failed to seed promotion {}: {error}", promotion.name))?;
    }

    println!(
        "seeded {} products and {} promotions from {}",
        fixture.products().len(),
        fixture.promotions().len(),
        args.fixture
    );

    Ok(())
}
