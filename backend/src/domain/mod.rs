//! Transport-agnostic domain core.

pub mod cart;
pub mod catalog;
mod checkout_service;
pub mod error;
pub mod import;
pub mod money;
pub mod ports;
pub mod slug;
pub mod trace_id;

pub use checkout_service::{
    CheckoutInput, CheckoutLine, CheckoutOutcome, CheckoutService, PromoQuote,
};
pub use error::{Error, ErrorCode};
pub use trace_id::{TRACE_ID_HEADER, TraceId};
