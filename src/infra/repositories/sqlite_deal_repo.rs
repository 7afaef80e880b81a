use crate::domain::{models::deal::{Deal, NewDeal}, ports::DealRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

pub struct SqliteDealRepo {
    pool: SqlitePool,
}

impl SqliteDealRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DealRepository for SqliteDealRepo {
    async fn create(&self, deal: &NewDeal) -> Result<Deal, AppError> {
        sqlx::query_as::<_, Deal>(
            "INSERT INTO deals (name, discount_rate, start_date, end_date, created_at) VALUES (?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&deal.name)
            .bind(deal.discount_rate)
            .bind(deal.start_date)
            .bind(deal.end_date)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Deal>, AppError> {
        sqlx::query_as::<_, Deal>("SELECT * FROM deals WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Deal>, AppError> {
        sqlx::query_as::<_, Deal>("SELECT * FROM deals ORDER BY start_date ASC, id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, deal: &Deal) -> Result<Deal, AppError> {
        sqlx::query_as::<_, Deal>(
            "UPDATE deals SET name = ?, discount_rate = ?, start_date = ?, end_date = ? WHERE id = ? RETURNING *"
        )
            .bind(&deal.name)
            .bind(deal.discount_rate)
            .bind(deal.start_date)
            .bind(deal.end_date)
            .bind(deal.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound(format!("Deal {} not found", deal.id)))
    }

    // Rooms pointing at the deal fall back to no discount via ON DELETE SET NULL.
    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM deals WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound(format!("Deal {} not found", id))); }
        Ok(())
    }
}
