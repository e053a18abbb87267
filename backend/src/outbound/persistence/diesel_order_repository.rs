//! PostgreSQL-backed order adapter.
//!
//! `create` persists the header and every line in one transaction and mints
//! the human-facing order reference, e.g. `FL-7KQ2M9XT`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use crate::domain::ports::{
    NewOrder, Order, OrderRepository, OrderRepositoryError, OrderStatus,
};

use super::diesel_helpers::{
    is_connection_failure, map_diesel_error_message, map_pool_error_message,
};
use super::models::{NewOrderItemRow, NewOrderRow, OrderRow};
use super::pool::{DbPool, PoolError};
use super::schema::{order_items, orders};

/// Characters used in order references. Skips 0/O and 1/I so references can
/// be read over the phone.
const REFERENCE_CHARSET: &[u8] = b"23456789ABCDEFGHJKLMNPQRSTUVWXYZ";
const REFERENCE_LENGTH: usize = 8;

/// Diesel-backed implementation of the order repository port.
#[derive(Clone)]
pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    /// Create a new repository with the given connection pool.
    #[rustfmt::skip]
    pub fn new(pool: DbPool) -> Self { Self { pool } }
}

fn map_pool_error(error: PoolError) -> OrderRepositoryError {
    OrderRepositoryError::connection(map_pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error, operation: &str) -> OrderRepositoryError {
    if is_connection_failure(&error) {
        return OrderRepositoryError::connection(map_diesel_error_message(error, operation));
    }
    OrderRepositoryError::query(map_diesel_error_message(error, operation))
}

/// Mint a customer-facing order reference.
fn mint_reference(rng: &mut impl Rng) -> String {
    let suffix: String = (0..REFERENCE_LENGTH)
        .map(|_| {
            let index = rng.gen_range(0..REFERENCE_CHARSET.len());
            REFERENCE_CHARSET[index] as char
        })
        .collect();
    format!("FL-{suffix}")
}

#[async_trait]
impl OrderRepository for DieselOrderRepository {
    async fn create(&self, order: &NewOrder) -> Result<Order, OrderRepositoryError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let mut rng = SmallRng::from_entropy();
        let reference = mint_reference(&mut rng);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let order_id = Uuid::new_v4();

        let header = NewOrderRow {
            id: order_id,
            reference: &reference,
            customer_name: &order.customer_name,
            customer_email: &order.customer_email,
            customer_phone: order.customer_phone.as_deref(),
            shipping_address: &order.shipping_address,
            note: order.note.as_deref(),
            subtotal_cents: order.subtotal_cents,
            discount_cents: order.discount_cents,
            total_cents: order.total_cents,
            promo_code_id: order.promo_code_id,
            status: OrderStatus::PendingPayment.as_str(),
        };
        let lines: Vec<NewOrderItemRow<'_>> = order
            .lines
            .iter()
            .map(|line| NewOrderItemRow {
                id: Uuid::new_v4(),
                order_id,
                product_id: line.product_id,
                variant_id: line.variant_id,
                product_name: &line.product_name,
                size_label: line.size_label.as_deref(),
                quantity: i32::try_from(line.quantity).unwrap_or(i32::MAX),
                unit_price_cents: line.unit_price_cents,
            })
            .collect();

        let row: OrderRow = conn
            .transaction(|conn| {
                async move {
                    let row = diesel::insert_into(orders::table)
                        .values(&header)
                        .returning(OrderRow::as_returning())
                        .get_result(conn)
                        .await?;
                    diesel::insert_into(order_items::table)
                        .values(&lines)
                        .execute(conn)
                        .await?;
                    Ok(row)
                }
                .scope_boxed()
            })
            .await
            .map_err(|err: diesel::result::Error| map_diesel_error(err, "order create"))?;

        row.into_domain().map_err(OrderRepositoryError::query)
    }

    async fn set_payment_reference(
        &self,
        order_id: Uuid,
        reference: &str,
    ) -> Result<(), OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(orders::table.filter(orders::id.eq(order_id)))
            .set(orders::payment_reference.eq(reference))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "payment reference"))?;
        if updated == 0 {
            return Err(OrderRepositoryError::NotFound { id: order_id });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn references_carry_the_prefix_and_length() {
        let mut rng = SmallRng::seed_from_u64(7);
        let reference = mint_reference(&mut rng);
        assert!(reference.starts_with("FL-"));
        assert_eq!(reference.len(), 3 + REFERENCE_LENGTH);
    }

    #[test]
    fn references_avoid_ambiguous_characters() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..100 {
            let reference = mint_reference(&mut rng);
            let suffix = reference.trim_start_matches("FL-");
            assert!(
                suffix.chars().all(|c| !"01OI".contains(c)),
                "reference {reference} contains an ambiguous character"
            );
        }
    }
}
