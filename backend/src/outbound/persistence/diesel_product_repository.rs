//! PostgreSQL-backed catalog read and product command adapter.
//!
//! Implements both [`CatalogQuery`] and [`ProductCommand`] over one pool.
//! `has_variants` is owned by this adapter: it is recomputed whenever a
//! variant is added or removed, so the domain never sees a stale flag.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::catalog::{
    Attribute, AttributeKind, Product, ProductDraft, ProductImage, Variant, VariantDraft,
};
use crate::domain::ports::{
    CatalogQuery, ProductCommand, ProductDetail, ProductFilter, ProductRepositoryError,
};
use crate::with_attribute_tables;

use super::diesel_helpers::{
    collect_rows, is_connection_failure, is_unique_violation, map_diesel_error_message,
    map_pool_error_message,
};
use super::models::{NewProductRow, NewVariantRow, ProductChangeset, ProductImageRow, ProductRow, VariantRow};
use super::pool::{DbPool, PoolError};
use super::schema::{product_images, product_variants, products};

/// Diesel-backed implementation of the catalog query and command ports.
#[derive(Clone)]
pub struct DieselProductRepository {
    pool: DbPool,
}

impl DieselProductRepository {
    /// Create a new repository with the given connection pool.
    #[rustfmt::skip]
    pub fn new(pool: DbPool) -> Self { Self { pool } }

    /// Product ids associated with an attribute slug of the given kind.
    async fn attribute_product_ids(
        &self,
        kind: AttributeKind,
        slug: &str,
    ) -> Result<Vec<Uuid>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let needle = slug.to_lowercase();
        with_attribute_tables!(kind, attr, junction, {
            junction::table
                .inner_join(attr::table)
                .filter(attr::slug.eq(needle))
                .select(junction::product_id)
                .load(&mut conn)
                .await
                .map_err(|err| map_diesel_error(err, "attribute filter"))
        })
    }

    /// All attribute rows associated with a product, grouped by kind in
    /// [`AttributeKind::ALL`] order.
    async fn product_attributes(
        &self,
        product_id: Uuid,
    ) -> Result<Vec<Attribute>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut attributes = Vec::new();
        for kind in AttributeKind::ALL {
            let rows: Vec<(Uuid, String, String, bool, i32)> =
                with_attribute_tables!(kind, attr, junction, {
                    junction::table
                        .inner_join(attr::table)
                        .filter(junction::product_id.eq(product_id))
                        .select((
                            attr::id,
                            attr::slug,
                            attr::name,
                            attr::is_active,
                            attr::sort_order,
                        ))
                        .order_by((attr::sort_order.asc(), attr::name.asc()))
                        .load(&mut conn)
                        .await
                        .map_err(|err| map_diesel_error(err, "product attributes"))
                })?;
            attributes.extend(
                rows.into_iter()
                    .map(|(id, slug, name, is_active, sort_order)| Attribute {
                        id,
                        kind,
                        slug,
                        name,
                        is_active,
                        sort_order,
                    }),
            );
        }
        Ok(attributes)
    }

    /// Recompute `has_variants` for a product after variant mutations. A
    /// product with a single variant renders as a simple product, so the
    /// flag only flips once a second variant exists.
    async fn refresh_has_variants(&self, product_id: Uuid) -> Result<(), ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = product_variants::table
            .filter(product_variants::product_id.eq(product_id))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "variant count"))?;
        diesel::update(products::table.filter(products::id.eq(product_id)))
            .set((
                products::has_variants.eq(count > 1),
                products::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "has_variants refresh"))?;
        Ok(())
    }
}

fn map_pool_error(error: PoolError) -> ProductRepositoryError {
    ProductRepositoryError::connection(map_pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error, operation: &str) -> ProductRepositoryError {
    if is_connection_failure(&error) {
        return ProductRepositoryError::connection(map_diesel_error_message(error, operation));
    }
    ProductRepositoryError::query(map_diesel_error_message(error, operation))
}

#[async_trait]
impl CatalogQuery for DieselProductRepository {
    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, ProductRepositoryError> {
        let attribute_ids = match &filter.attribute {
            Some((kind, slug)) => Some(self.attribute_product_ids(*kind, slug).await?),
            None => None,
        };

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = products::table.into_boxed();
        if let Some(kind) = filter.kind {
            query = query.filter(products::kind.eq(kind.as_str()));
        }
        if !filter.include_inactive {
            query = query.filter(products::is_active.eq(true));
        }
        if filter.featured_only {
            query = query.filter(products::is_featured.eq(true));
        }
        if let Some(ids) = attribute_ids {
            query = query.filter(products::id.eq_any(ids));
        }

        let rows: Vec<ProductRow> = query
            .order_by(products::created_at.desc())
            .limit(filter.limit)
            .offset(filter.offset)
            .select(ProductRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "product list"))?;

        collect_rows(
            rows.into_iter().map(ProductRow::into_domain),
            ProductRepositoryError::query,
        )
    }

    async fn find_detail_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<ProductDetail>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ProductRow> = products::table
            .filter(products::slug.eq(slug))
            .select(ProductRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "product detail"))?;
        let Some(row) = row else {
            return Ok(None);
        };
        let product = row.into_domain().map_err(ProductRepositoryError::query)?;

        let variant_rows: Vec<VariantRow> = product_variants::table
            .filter(product_variants::product_id.eq(product.id))
            .order_by(product_variants::sort_order.asc())
            .select(VariantRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "product variants"))?;

        let image_rows: Vec<ProductImageRow> = product_images::table
            .filter(product_images::product_id.eq(product.id))
            .order_by(product_images::sort_order.asc())
            .select(ProductImageRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "product images"))?;
        drop(conn);

        let attributes = self.product_attributes(product.id).await?;

        Ok(Some(ProductDetail {
            product,
            variants: variant_rows.into_iter().map(Variant::from).collect(),
            images: image_rows.into_iter().map(ProductImage::from).collect(),
            attributes,
        }))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ProductRow> = products::table
            .filter(products::id.eq(id))
            .select(ProductRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "product by id"))?;
        row.map(|row| row.into_domain().map_err(ProductRepositoryError::query))
            .transpose()
    }

    async fn find_variant(&self, id: Uuid) -> Result<Option<Variant>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<VariantRow> = product_variants::table
            .filter(product_variants::id.eq(id))
            .select(VariantRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "variant by id"))?;
        Ok(row.map(Variant::from))
    }
}

#[async_trait]
impl ProductCommand for DieselProductRepository {
    async fn create(&self, draft: &ProductDraft) -> Result<Product, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewProductRow {
            id: Uuid::new_v4(),
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
            has_variants: false,
        };
        let row: ProductRow = diesel::insert_into(products::table)
            .values(&new_row)
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    ProductRepositoryError::duplicate_slug(draft.slug.clone())
                } else {
                    map_diesel_error(err, "product create")
                }
            })?;
        row.into_domain().map_err(ProductRepositoryError::query)
    }

    async fn update(
        &self,
        id: Uuid,
        draft: &ProductDraft,
    ) -> Result<Product, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changeset = ProductChangeset {
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
            updated_at: Utc::now(),
        };
        let row: Option<ProductRow> = diesel::update(products::table.filter(products::id.eq(id)))
            .set(&changeset)
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| {
                if is_unique_violation(&err) {
                    ProductRepositoryError::duplicate_slug(draft.slug.clone())
                } else {
                    map_diesel_error(err, "product update")
                }
            })?;
        let row = row.ok_or_else(|| ProductRepositoryError::not_found(id.to_string()))?;
        row.into_domain().map_err(ProductRepositoryError::query)
    }

    async fn delete(&self, id: Uuid) -> Result<(), ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(products::table.filter(products::id.eq(id)))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "product delete"))?;
        if deleted == 0 {
            return Err(ProductRepositoryError::not_found(id.to_string()));
        }
        Ok(())
    }

    async fn create_variant(
        &self,
        product_id: Uuid,
        draft: &VariantDraft,
    ) -> Result<Variant, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewVariantRow {
            id: Uuid::new_v4(),
            product_id,
            sku: &draft.sku,
            size_label: &draft.size_label,
            price_cents: draft.price_cents,
            compare_at_price_cents: draft.compare_at_price_cents,
            stock_quantity: draft.stock_quantity,
            color_id: draft.color_id,
            is_active: draft.is_active,
            sort_order: draft.sort_order,
        };
        let row: VariantRow = diesel::insert_into(product_variants::table)
            .values(&new_row)
            .returning(VariantRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "variant create"))?;
        drop(conn);
        self.refresh_has_variants(product_id).await?;
        Ok(Variant::from(row))
    }

    async fn update_variant_stock(
        &self,
        variant_id: Uuid,
        stock_quantity: i32,
    ) -> Result<(), ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated =
            diesel::update(product_variants::table.filter(product_variants::id.eq(variant_id)))
                .set(product_variants::stock_quantity.eq(stock_quantity))
                .execute(&mut conn)
                .await
                .map_err(|err| map_diesel_error(err, "variant stock update"))?;
        if updated == 0 {
            return Err(ProductRepositoryError::not_found(variant_id.to_string()));
        }
        Ok(())
    }

    async fn delete_variant(&self, variant_id: Uuid) -> Result<(), ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let product_id: Option<Uuid> = product_variants::table
            .filter(product_variants::id.eq(variant_id))
            .select(product_variants::product_id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "variant lookup"))?;
        let Some(product_id) = product_id else {
            return Err(ProductRepositoryError::not_found(variant_id.to_string()));
        };
        diesel::delete(product_variants::table.filter(product_variants::id.eq(variant_id)))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "variant delete"))?;
        drop(conn);
        self.refresh_has_variants(product_id).await
    }

    async fn set_attributes(
        &self,
        product_id: Uuid,
        kind: AttributeKind,
        attribute_ids: &[Uuid],
    ) -> Result<(), ProductRepositoryError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        with_attribute_tables!(kind, _attr, junction, {
            let rows: Vec<_> = attribute_ids
                .iter()
                .map(|attribute_id| {
                    (
                        junction::product_id.eq(product_id),
                        junction::attribute_id.eq(*attribute_id),
                    )
                })
                .collect();
            conn.transaction(|conn| {
                async move {
                    diesel::delete(
                        junction::table.filter(junction::product_id.eq(product_id)),
                    )
                    .execute(conn)
                    .await?;
                    if !rows.is_empty() {
                        diesel::insert_into(junction::table)
                            .values(&rows)
                            .execute(conn)
                            .await?;
                    }
                    Ok(())
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_diesel_error(err, "set attributes"))
        })
    }
}
