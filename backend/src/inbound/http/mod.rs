//! HTTP inbound adapter exposing REST endpoints.

pub mod admin_attributes;
pub mod admin_auth;
pub mod admin_content;
pub mod admin_import;
pub mod admin_products;
pub mod admin_promo_codes;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod health;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;
