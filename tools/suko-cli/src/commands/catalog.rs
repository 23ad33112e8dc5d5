//! Catalog inspection commands.

use anyhow::{Context as _, Result};
use suko_commerce::catalog::{CatalogStats, Product};
use suko_db::OfflineDatabase;
use suko_store::{CatalogSource, StoreContext};

use super::{CatalogArgs, CatalogCommand};
use crate::context::Context;
use crate::output::stock_badge;

/// Run the catalog command.
pub async fn run(args: CatalogArgs, ctx: &Context) -> Result<()> {
    match args.command {
        CatalogCommand::Placeholders { category } => placeholders(category.as_deref(), ctx).await,
    }
}

/// Products a storefront serves when the database cannot be reached.
async fn offline_catalog() -> Result<Vec<Product>> {
    let store = StoreContext::builder()
        .database(OfflineDatabase::new("inspecting placeholders"))
        .build();
    let products = store
        .catalog()
        .subscribe_source()
        .wait_for(|source| *source == CatalogSource::Placeholder)
        .await
        .map(|_| store.catalog().all())
        .context("Catalog closed before placeholders were published")?;
    store.shutdown();
    Ok(products)
}

async fn placeholders(category: Option<&str>, ctx: &Context) -> Result<()> {
    let products: Vec<Product> = offline_catalog()
        .await?
        .into_iter()
        .filter(|p| category.map_or(true, |c| p.category == c))
        .collect();

    if ctx.output.is_json() {
        ctx.output.json(&products);
        return Ok(());
    }

    if products.is_empty() {
        ctx.output.warn("No placeholder products match");
        return Ok(());
    }

    let widths = [14, 28, 8, 8];
    ctx.output.table_row(&["ID", "NAME", "PRICE", "STOCK"], &widths);
    for product in &products {
        let id = product.id.as_ref().map(|id| id.as_str()).unwrap_or("-");
        let price = product.unit_price().display();
        ctx.output
            .table_row(&[id, &product.name, &price, &stock_badge(product.in_stock)], &widths);
    }

    let stats = CatalogStats::from_products(&products);
    ctx.output.info(&format!(
        "{} products, {} featured, {} in stock",
        stats.total, stats.featured, stats.in_stock
    ));
    Ok(())
}
