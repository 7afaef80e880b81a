use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Payment {
    pub id: i64,
    pub booking_id: i64,
    pub card_holder: String,
    pub card_last4: String,
    pub amount_cents: i64,
    pub method: String,
    pub paid_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPayment {
    pub booking_id: i64,
    pub card_holder: String,
    pub card_last4: String,
    pub amount_cents: i64,
    pub method: String,
    pub paid_at: DateTime<Utc>,
}
