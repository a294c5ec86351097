//! Product commands: dispatch an intent into the store, then render its state

use anyhow::{Result, bail};
use std::io::Write;
use tracing::{info, warn};

use crate::application::product_store::ProductStore;
use crate::application::selectors;
use crate::commands::cli::{CreateArgs, UpdateArgs};
use crate::commands::render::{self, OutputFormat};
use crate::domain::price_range::PriceRange;
use crate::domain::product::Product;
use crate::domain::seed::seed_catalog;
use crate::infrastructure::product_schema_adapter::ProductSchemaAdapter;

pub async fn list_products<W: Write>(
    store: &ProductStore,
    out: &mut W,
    format: OutputFormat,
    available_only: bool,
) -> Result<()> {
    store.fetch_all().await?;
    let products: Vec<Product> = store
        .select(|state| {
            if available_only {
                selectors::select_available_products(state).cloned().collect()
            } else {
                selectors::select_products(state).to_vec()
            }
        })
        .await;
    render::products(out, format, &products)
}

pub async fn get_product<W: Write>(store: &ProductStore, out: &mut W, format: OutputFormat, barcode: &str) -> Result<()> {
    store.fetch_by_barcode(barcode).await?;
    match store.select(|state| selectors::select_current_product(state).cloned()).await {
        Some(product) => render::product(out, format, &product),
        None => bail!("Product not found with barcode: {barcode}"),
    }
}

pub async fn create_product<W: Write>(
    store: &ProductStore,
    out: &mut W,
    format: OutputFormat,
    args: CreateArgs,
) -> Result<()> {
    let product = Product::new(
        args.barcode,
        args.name,
        args.category,
        args.price,
        args.discount,
        args.available,
    );
    let created = store.create(product).await?;
    render::product(out, format, &created)
}

/// Load the stored product, apply the given changes and send the full record back
pub async fn update_product<W: Write>(
    store: &ProductStore,
    out: &mut W,
    format: OutputFormat,
    barcode: &str,
    changes: UpdateArgs,
) -> Result<()> {
    if changes.is_empty() {
        bail!("Nothing to update; pass at least one of --name, --category, --price, --discount, --available");
    }

    let mut product = store.fetch_by_barcode(barcode).await?;
    if let Some(name) = changes.name {
        product.name = name;
    }
    if let Some(category) = changes.category {
        product.category = category;
    }
    if let Some(price) = changes.price {
        product.price = price;
    }
    if let Some(discount) = changes.discount {
        product.discount = discount;
    }
    if let Some(available) = changes.available {
        product.available = available;
    }

    let updated = store.update(barcode, product).await?;
    render::product(out, format, &updated)
}

pub async fn delete_product<W: Write>(
    store: &ProductStore,
    out: &mut W,
    format: OutputFormat,
    barcode: &str,
) -> Result<()> {
    store.delete(barcode).await?;
    render::message(out, format, &format!("Deleted product {barcode}"))
}

/// Either bound may be omitted; both omitted is an input error, checked before dispatch
pub async fn filter_products<W: Write>(
    store: &ProductStore,
    out: &mut W,
    format: OutputFormat,
    min: Option<i64>,
    max: Option<i64>,
) -> Result<()> {
    let range = PriceRange::from_bounds(min, max)?;
    store.filter_by_price_range(range.min, range.max).await?;
    let filtered = store
        .select(|state| selectors::select_filtered_products(state).to_vec())
        .await;
    render::products(out, format, &filtered)
}

pub async fn sorted_names<W: Write>(store: &ProductStore, out: &mut W, format: OutputFormat) -> Result<()> {
    store.sorted_names_by_price().await?;
    let names = store
        .select(|state| selectors::select_sorted_product_names(state).to_vec())
        .await;
    render::names(out, format, &names)
}

/// Create every seed product whose barcode is not in the catalog yet
pub async fn seed_products<W: Write>(store: &ProductStore, out: &mut W, format: OutputFormat) -> Result<()> {
    store.fetch_all().await?;

    let mut created = 0_usize;
    let mut skipped = 0_usize;
    for record in seed_catalog() {
        let product = ProductSchemaAdapter::to_frontend(Some(&record))?;
        let exists = store
            .select(|state| selectors::select_product_by_barcode(state, &product.barcode).is_some())
            .await;
        if exists {
            skipped += 1;
            continue;
        }
        match store.create(product).await {
            Ok(_) => created += 1,
            Err(e) => {
                warn!(error = %e, "Seed product was not created");
                skipped += 1;
            }
        }
    }

    info!(created, skipped, "Seeding finished");
    render::message(out, format, &format!("Seeded {created} product(s), skipped {skipped}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::in_memory_product_api::InMemoryProductApi;
    use std::sync::Arc;

    fn text(out: Vec<u8>) -> String {
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_seed_into_empty_catalog_then_skip() {
        let api = Arc::new(InMemoryProductApi::new());
        let store = ProductStore::new(api.clone());

        let mut out = Vec::new();
        seed_products(&store, &mut out, OutputFormat::Text).await.unwrap();
        assert_eq!(text(out), "Seeded 9 product(s), skipped 0\n");
        assert_eq!(api.len().await, 9);

        let mut out = Vec::new();
        seed_products(&store, &mut out, OutputFormat::Text).await.unwrap();
        assert_eq!(text(out), "Seeded 0 product(s), skipped 9\n");
    }

    #[tokio::test]
    async fn test_update_keeps_omitted_fields() {
        let store = ProductStore::new(Arc::new(InMemoryProductApi::seeded()));
        let changes = UpdateArgs {
            name: None,
            category: None,
            price: Some(3000),
            discount: None,
            available: None,
        };

        let mut out = Vec::new();
        update_product(&store, &mut out, OutputFormat::Json, "74001755", changes)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["name"], "Ball Gown");
        assert_eq!(value["price"], 3000);
        assert_eq!(value["finalPrice"], 2790);
    }

    #[tokio::test]
    async fn test_filter_without_bounds_is_rejected_before_dispatch() {
        let store = ProductStore::new(Arc::new(InMemoryProductApi::seeded()));
        let mut events = store.subscribe();
        let mut out = Vec::new();

        let err = filter_products(&store, &mut out, OutputFormat::Text, None, None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Please enter at least one price value");
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_list_available_only() {
        let store = ProductStore::new(Arc::new(InMemoryProductApi::seeded()));
        let mut out = Vec::new();
        list_products(&store, &mut out, OutputFormat::Json, true).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(6));
    }
}
