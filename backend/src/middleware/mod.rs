//! Request lifecycle middleware.

pub mod trace;

pub use trace::Trace;
