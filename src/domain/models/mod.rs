pub mod auth;
pub mod booking;
pub mod catalog;
pub mod deal;
pub mod payment;
pub mod room;
pub mod user;

use thiserror::Error;

#[derive(Debug, Error)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}
