use crate::domain::{models::payment::{NewPayment, Payment}, ports::PaymentRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqlitePaymentRepo {
    pool: SqlitePool,
}

impl SqlitePaymentRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentRepository for SqlitePaymentRepo {
    async fn create(&self, payment: &NewPayment) -> Result<Payment, AppError> {
        sqlx::query_as::<_, Payment>(
            "INSERT INTO payments (booking_id, card_holder, card_last4, amount_cents, method, paid_at) VALUES (?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(payment.booking_id).bind(&payment.card_holder).bind(&payment.card_last4)
            .bind(payment.amount_cents).bind(&payment.method).bind(payment.paid_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: i64) -> Result<Option<Payment>, AppError> {
        sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_booking(&self, booking_id: i64) -> Result<Option<Payment>, AppError> {
        sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE booking_id = ?")
            .bind(booking_id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn update_method(&self, id: i64, method: &str) -> Result<Payment, AppError> {
        sqlx::query_as::<_, Payment>("UPDATE payments SET method = ? WHERE id = ? RETURNING *")
            .bind(method).bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound(format!("Payment {} not found", id)))
    }
}
