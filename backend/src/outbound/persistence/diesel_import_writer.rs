//! PostgreSQL-backed import writer.
//!
//! Each bundle maps to one transaction covering the product row, its
//! variants, its images, and its attribute junctions. A failure anywhere
//! rolls the whole product back, so a rejected CSV row never leaves a
//! partial product behind.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use uuid::Uuid;

use crate::domain::ports::{ImportWriter, ImportWriterError, ProductImportBundle};
use crate::with_attribute_tables;

use super::diesel_helpers::{
    is_connection_failure, map_diesel_error_message, map_pool_error_message,
};
use super::models::{NewProductImageRow, NewProductRow, NewVariantRow};
use super::pool::{DbPool, PoolError};
use super::schema::{product_images, product_variants, products};

/// Diesel-backed implementation of the import writer port.
#[derive(Clone)]
pub struct DieselImportWriter {
    pool: DbPool,
}

impl DieselImportWriter {
    /// Create a new writer with the given connection pool.
    #[rustfmt::skip]
    pub fn new(pool: DbPool) -> Self { Self { pool } }
}

fn map_pool_error(error: PoolError) -> ImportWriterError {
    ImportWriterError::connection(map_pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> ImportWriterError {
    if is_connection_failure(&error) {
        return ImportWriterError::connection(map_diesel_error_message(error, "import write"));
    }
    ImportWriterError::write(map_diesel_error_message(error, "import write"))
}

#[async_trait]
impl ImportWriter for DieselImportWriter {
    async fn create_product(
        &self,
        bundle: &ProductImportBundle,
    ) -> Result<Uuid, ImportWriterError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let product_id = Uuid::new_v4();
        let draft = &bundle.product;
        let product_row = NewProductRow {
            id: product_id,
            slug: &draft.slug,
            name: &draft.name,
            description: &draft.description,
            kind: draft.kind.as_str(),
            material: draft.material.as_deref(),
            price_cents: draft.price_cents,
            compare_at_price_cents: draft.compare_at_price_cents,
            stock_quantity: draft.stock_quantity,
            is_featured: draft.is_featured,
            is_active: draft.is_active,
            has_variants: bundle.variants.len() > 1,
        };
        let variant_rows: Vec<NewVariantRow<'_>> = bundle
            .variants
            .iter()
            .map(|variant| NewVariantRow {
                id: Uuid::new_v4(),
                product_id,
                sku: &variant.sku,
                size_label: &variant.size_label,
                price_cents: variant.price_cents,
                compare_at_price_cents: variant.compare_at_price_cents,
                stock_quantity: variant.stock_quantity,
                color_id: variant.color_id,
                is_active: variant.is_active,
                sort_order: variant.sort_order,
            })
            .collect();
        let image_rows: Vec<NewProductImageRow<'_>> = bundle
            .image_urls
            .iter()
            .enumerate()
            .map(|(position, url)| NewProductImageRow {
                id: Uuid::new_v4(),
                product_id,
                url,
                sort_order: i32::try_from(position).unwrap_or(i32::MAX),
            })
            .collect();
        let attributes = bundle.attributes.clone();

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(products::table)
                    .values(&product_row)
                    .execute(conn)
                    .await?;
                if !variant_rows.is_empty() {
                    diesel::insert_into(product_variants::table)
                        .values(&variant_rows)
                        .execute(conn)
                        .await?;
                }
                if !image_rows.is_empty() {
                    diesel::insert_into(product_images::table)
                        .values(&image_rows)
                        .execute(conn)
                        .await?;
                }
                for (kind, attribute_id) in attributes {
                    with_attribute_tables!(kind, _attr, junction, {
                        diesel::insert_into(junction::table)
                            .values((
                                junction::product_id.eq(product_id),
                                junction::attribute_id.eq(attribute_id),
                            ))
                            .execute(conn)
                            .await?;
                    });
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)?;

        Ok(product_id)
    }
}
