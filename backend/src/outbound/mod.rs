//! Outbound adapters for persistence, payments, and mail.

pub mod mail;
pub mod payment;
pub mod persistence;
