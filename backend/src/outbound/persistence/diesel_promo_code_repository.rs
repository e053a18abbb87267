//! PostgreSQL-backed promo code adapter.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::catalog::PromoCode;
use crate::domain::ports::{PromoCodeDraft, PromoCodeRepository, PromoCodeRepositoryError};

use super::diesel_helpers::{
    collect_rows, is_connection_failure, is_unique_violation, map_diesel_error_message,
    map_pool_error_message,
};
use super::models::{NewPromoCodeRow, PromoCodeChangeset, PromoCodeRow};
use super::pool::{DbPool, PoolError};
use super::schema::promo_codes;

/// Diesel-backed implementation of the promo code repository port.
#[derive(Clone)]
pub struct DieselPromoCodeRepository {
    pool: DbPool,
}

impl DieselPromoCodeRepository {
    /// Create a new repository with the given connection pool.
    #[rustfmt::skip]
    pub fn new(pool: DbPool) -> Self { Self { pool } }
}

fn map_pool_error(error: PoolError) -> PromoCodeRepositoryError {
    PromoCodeRepositoryError::connection(map_pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error, operation: &str) -> PromoCodeRepositoryError {
    if is_connection_failure(&error) {
        return PromoCodeRepositoryError::connection(map_diesel_error_message(error, operation));
    }
    PromoCodeRepositoryError::query(map_diesel_error_message(error, operation))
}

#[async_trait]
impl PromoCodeRepository for DieselPromoCodeRepository {
    async fn list(&self) -> Result<Vec<PromoCode>, PromoCodeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PromoCodeRow> = promo_codes::table
            .order_by(promo_codes::code.asc())
            .select(PromoCodeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "promo code list"))?;
        collect_rows(
            rows.into_iter().map(PromoCodeRow::into_domain),
            PromoCodeRepositoryError::query,
        )
    }

    async fn find_by_code(
        &self,
        code: &str,
    ) -> Result<Option<PromoCode>, PromoCodeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // Codes are stored uppercase, so case-insensitivity is one uppercase
        // on the lookup side.
        let needle = code.trim().to_uppercase();
        let row: Option<PromoCodeRow> = promo_codes::table
            .filter(promo_codes::code.eq(needle))
            .select(PromoCodeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "promo code lookup"))?;
        row.map(|row| row.into_domain().map_err(PromoCodeRepositoryError::query))
            .transpose()
    }

    async fn create(&self, draft: &PromoCodeDraft) -> Result<PromoCode, PromoCodeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewPromoCodeRow {
            id: Uuid::new_v4(),
            code: &draft.code,
            discount_type: draft.discount_type.as_str(),
            discount_value: draft.discount_value,
            min_purchase_cents: draft.min_purchase_cents,
            max_uses: draft.max_uses,
            per_customer_cap: draft.per_customer_cap,
            times_used: 0,
            is_active: draft.is_active,
            expires_at: draft.expires_at,
        };
        let row: PromoCodeRow = diesel::insert_into(promo_codes::table)
            .values(&new_row)
            .returning(PromoCodeRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    PromoCodeRepositoryError::duplicate_code(draft.code.clone())
                } else {
                    map_diesel_error(err, "promo code create")
                }
            })?;
        row.into_domain().map_err(PromoCodeRepositoryError::query)
    }

    async fn update(
        &self,
        id: Uuid,
        draft: &PromoCodeDraft,
    ) -> Result<PromoCode, PromoCodeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changeset = PromoCodeChangeset {
            code: &draft.code,
            discount_type: draft.discount_type.as_str(),
            discount_value: draft.discount_value,
            min_purchase_cents: Some(draft.min_purchase_cents),
            max_uses: Some(draft.max_uses),
            per_customer_cap: Some(draft.per_customer_cap),
            is_active: draft.is_active,
            expires_at: Some(draft.expires_at),
        };
        let row: Option<PromoCodeRow> =
            diesel::update(promo_codes::table.filter(promo_codes::id.eq(id)))
                .set(&changeset)
                .returning(PromoCodeRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(|err| {
                    if is_unique_violation(&err) {
                        PromoCodeRepositoryError::duplicate_code(draft.code.clone())
                    } else {
                        map_diesel_error(err, "promo code update")
                    }
                })?;
        let row = row.ok_or(PromoCodeRepositoryError::NotFound { id })?;
        row.into_domain().map_err(PromoCodeRepositoryError::query)
    }

    async fn delete(&self, id: Uuid) -> Result<(), PromoCodeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(promo_codes::table.filter(promo_codes::id.eq(id)))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "promo code delete"))?;
        if deleted == 0 {
            return Err(PromoCodeRepositoryError::NotFound { id });
        }
        Ok(())
    }

    async fn record_redemption(&self, id: Uuid) -> Result<(), PromoCodeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(promo_codes::table.filter(promo_codes::id.eq(id)))
            .set(promo_codes::times_used.eq(promo_codes::times_used + 1))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "promo code redemption"))?;
        if updated == 0 {
            return Err(PromoCodeRepositoryError::NotFound { id });
        }
        Ok(())
    }
}
