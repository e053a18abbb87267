//! Transactional mail adapters.

mod http_sender;

pub use http_sender::HttpMailSender;
