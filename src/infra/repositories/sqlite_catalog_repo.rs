use crate::domain::{models::catalog::{Floor, RoomLevel, RoomType}, ports::CatalogRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

pub struct SqliteCatalogRepo {
    pool: SqlitePool,
}

impl SqliteCatalogRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogRepository for SqliteCatalogRepo {
    async fn create_room_type(&self, name: &str, price_cents: i64) -> Result<RoomType, AppError> {
        sqlx::query_as::<_, RoomType>("INSERT INTO room_types (name, price_cents, created_at) VALUES (?, ?, ?) RETURNING *")
            .bind(name).bind(price_cents).bind(Utc::now())
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_room_types(&self) -> Result<Vec<RoomType>, AppError> {
        sqlx::query_as::<_, RoomType>("SELECT * FROM room_types ORDER BY name ASC")
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn update_room_type(&self, room_type: &RoomType) -> Result<RoomType, AppError> {
        sqlx::query_as::<_, RoomType>("UPDATE room_types SET name = ?, price_cents = ? WHERE id = ? RETURNING *")
            .bind(&room_type.name).bind(room_type.price_cents).bind(room_type.id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound(format!("Room type {} not found", room_type.id)))
    }
    async fn find_room_type(&self, id: i64) -> Result<Option<RoomType>, AppError> {
        sqlx::query_as::<_, RoomType>("SELECT * FROM room_types WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn create_room_level(&self, name: &str, price_cents: i64) -> Result<RoomLevel, AppError> {
        sqlx::query_as::<_, RoomLevel>("INSERT INTO room_levels (name, price_cents, created_at) VALUES (?, ?, ?) RETURNING *")
            .bind(name).bind(price_cents).bind(Utc::now())
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_room_levels(&self) -> Result<Vec<RoomLevel>, AppError> {
        sqlx::query_as::<_, RoomLevel>("SELECT * FROM room_levels ORDER BY name ASC")
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn update_room_level(&self, room_level: &RoomLevel) -> Result<RoomLevel, AppError> {
        sqlx::query_as::<_, RoomLevel>("UPDATE room_levels SET name = ?, price_cents = ? WHERE id = ? RETURNING *")
            .bind(&room_level.name).bind(room_level.price_cents).bind(room_level.id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound(format!("Room level {} not found", room_level.id)))
    }
    async fn find_room_level(&self, id: i64) -> Result<Option<RoomLevel>, AppError> {
        sqlx::query_as::<_, RoomLevel>("SELECT * FROM room_levels WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn create_floor(&self, name: &str) -> Result<Floor, AppError> {
        sqlx::query_as::<_, Floor>("INSERT INTO floors (name, created_at) VALUES (?, ?) RETURNING *")
            .bind(name).bind(Utc::now())
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_floors(&self) -> Result<Vec<Floor>, AppError> {
        sqlx::query_as::<_, Floor>("SELECT * FROM floors ORDER BY name ASC")
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
