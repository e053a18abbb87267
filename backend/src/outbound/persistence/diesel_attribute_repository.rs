//! PostgreSQL-backed adapter for the nine attribute reference tables.
//!
//! One adapter serves every [`AttributeKind`]; the
//! [`with_attribute_tables!`] macro dispatches each call onto the concrete
//! table. Rows travel as plain column tuples because the tables share a
//! layout but are distinct Diesel types.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::catalog::{Attribute, AttributeDraft, AttributeKind, AttributeRef};
use crate::domain::ports::{AttributeRepository, AttributeRepositoryError};
use crate::with_attribute_tables;

use super::diesel_helpers::{
    is_connection_failure, is_unique_violation, map_diesel_error_message, map_pool_error_message,
};
use super::pool::{DbPool, PoolError};

type AttributeColumns = (Uuid, String, String, bool, i32);

/// Diesel-backed implementation of the attribute repository port.
#[derive(Clone)]
pub struct DieselAttributeRepository {
    pool: DbPool,
}

impl DieselAttributeRepository {
    /// Create a new repository with the given connection pool.
    #[rustfmt::skip]
    pub fn new(pool: DbPool) -> Self { Self { pool } }
}

fn map_pool_error(error: PoolError) -> AttributeRepositoryError {
    AttributeRepositoryError::connection(map_pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error, operation: &str) -> AttributeRepositoryError {
    if is_connection_failure(&error) {
        return AttributeRepositoryError::connection(map_diesel_error_message(error, operation));
    }
    AttributeRepositoryError::query(map_diesel_error_message(error, operation))
}

fn into_attribute(kind: AttributeKind, columns: AttributeColumns) -> Attribute {
    let (id, slug, name, is_active, sort_order) = columns;
    Attribute {
        id,
        kind,
        slug,
        name,
        is_active,
        sort_order,
    }
}

#[async_trait]
impl AttributeRepository for DieselAttributeRepository {
    async fn list(&self, kind: AttributeKind) -> Result<Vec<Attribute>, AttributeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AttributeColumns> = with_attribute_tables!(kind, attr, _junction, {
            attr::table
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
                .map_err(|err| map_diesel_error(err, "attribute list"))
        })?;
        Ok(rows
            .into_iter()
            .map(|columns| into_attribute(kind, columns))
            .collect())
    }

    async fn load_index(&self) -> Result<Vec<AttributeRef>, AttributeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut index = Vec::new();
        for kind in AttributeKind::ALL {
            let rows: Vec<(Uuid, String, String)> = with_attribute_tables!(kind, attr, _junction, {
                attr::table
                    .select((attr::id, attr::slug, attr::name))
                    .load(&mut conn)
                    .await
                    .map_err(|err| map_diesel_error(err, "attribute index"))
            })?;
            index.extend(rows.into_iter().map(|(id, slug, name)| AttributeRef {
                kind,
                id,
                slug,
                name,
            }));
        }
        Ok(index)
    }

    async fn create(
        &self,
        kind: AttributeKind,
        draft: &AttributeDraft,
    ) -> Result<Attribute, AttributeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let columns: AttributeColumns = with_attribute_tables!(kind, attr, _junction, {
            diesel::insert_into(attr::table)
                .values((
                    attr::id.eq(Uuid::new_v4()),
                    attr::slug.eq(&draft.slug),
                    attr::name.eq(&draft.name),
                    attr::is_active.eq(draft.is_active),
                    attr::sort_order.eq(draft.sort_order),
                ))
                .returning((
                    attr::id,
                    attr::slug,
                    attr::name,
                    attr::is_active,
                    attr::sort_order,
                ))
                .get_result(&mut conn)
                .await
                .map_err(|err| {
                    if is_unique_violation(&err) {
                        AttributeRepositoryError::duplicate_slug(kind, draft.slug.clone())
                    } else {
                        map_diesel_error(err, "attribute create")
                    }
                })
        })?;
        Ok(into_attribute(kind, columns))
    }

    async fn update(
        &self,
        kind: AttributeKind,
        id: Uuid,
        draft: &AttributeDraft,
    ) -> Result<Attribute, AttributeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let columns: Option<AttributeColumns> = with_attribute_tables!(kind, attr, _junction, {
            diesel::update(attr::table.filter(attr::id.eq(id)))
                .set((
                    attr::slug.eq(&draft.slug),
                    attr::name.eq(&draft.name),
                    attr::is_active.eq(draft.is_active),
                    attr::sort_order.eq(draft.sort_order),
                ))
                .returning((
                    attr::id,
                    attr::slug,
                    attr::name,
                    attr::is_active,
                    attr::sort_order,
                ))
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(|err| {
                    if is_unique_violation(&err) {
                        AttributeRepositoryError::duplicate_slug(kind, draft.slug.clone())
                    } else {
                        map_diesel_error(err, "attribute update")
                    }
                })
        })?;
        let columns = columns.ok_or(AttributeRepositoryError::NotFound { kind, id })?;
        Ok(into_attribute(kind, columns))
    }

    async fn delete(
        &self,
        kind: AttributeKind,
        id: Uuid,
    ) -> Result<(), AttributeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = with_attribute_tables!(kind, attr, _junction, {
            diesel::delete(attr::table.filter(attr::id.eq(id)))
                .execute(&mut conn)
                .await
                .map_err(|err| map_diesel_error(err, "attribute delete"))
        })?;
        if deleted == 0 {
            return Err(AttributeRepositoryError::NotFound { kind, id });
        }
        Ok(())
    }
}
