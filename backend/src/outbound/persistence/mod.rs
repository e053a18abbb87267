//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports, backed by
//! PostgreSQL through `diesel-async` with `bb8` pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types; business rules live in the domain layer.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leak past this module.
//! - **Strongly typed errors**: every failure maps onto the owning port's
//!   error enum.
//!
//! The nine attribute reference tables and their junctions share a column
//! layout; the [`with_attribute_tables!`](crate::with_attribute_tables)
//! macro dispatches kind-generic code onto the concrete tables.

pub(crate) mod diesel_helpers;
mod diesel_attribute_repository;
mod diesel_content_repository;
mod diesel_import_writer;
mod diesel_order_repository;
mod diesel_product_repository;
mod diesel_promo_code_repository;
pub(crate) mod models;
mod pool;
pub(crate) mod schema;

pub use diesel_attribute_repository::DieselAttributeRepository;
pub use diesel_content_repository::DieselContentRepository;
pub use diesel_import_writer::DieselImportWriter;
pub use diesel_order_repository::DieselOrderRepository;
pub use diesel_product_repository::DieselProductRepository;
pub use diesel_promo_code_repository::DieselPromoCodeRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
