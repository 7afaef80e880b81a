use crate::domain::{models::payment::{NewPayment, Payment}, ports::PaymentRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresPaymentRepo {
    pool: PgPool,
}

impl PostgresPaymentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentRepository for PostgresPaymentRepo {
    async fn create(&self, payment: &NewPayment) -> Result<Payment, AppError> {
        sqlx::query_as::<_, Payment>(
            "INSERT INTO payments (booking_id, card_holder, card_last4, amount_cents, method, paid_at) VALUES ($1, $2, $3, $4, $5, $6) RETURNING *"
        )
            .bind(payment.booking_id).bind(&payment.card_holder).bind(&payment.card_last4)
            .bind(payment.amount_cents).bind(&payment.method).bind(payment.paid_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: i64) -> Result<Option<Payment>, AppError> {
        sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE id = $1")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_booking(&self, booking_id: i64) -> Result<Option<Payment>, AppError> {
        sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE booking_id = $1")
            .bind(booking_id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn update_method(&self, id: i64, method: &str) -> Result<Payment, AppError> {
        sqlx::query_as::<_, Payment>("UPDATE payments SET method = $1 WHERE id = $2 RETURNING *")
            .bind(method).bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound(format!("Payment {} not found", id)))
    }
}
