use crate::domain::{models::room::{NewRoom, Room, RoomRate, RoomStatus}, ports::RoomRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

pub struct PostgresRoomRepo {
    pool: PgPool,
}

impl PostgresRoomRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoomRepository for PostgresRoomRepo {
    async fn create(&self, room: &NewRoom) -> Result<Room, AppError> {
        sqlx::query_as::<_, Room>(
            "INSERT INTO rooms (name, status, room_type_id, room_level_id, floor_id, deal_id, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *"
        )
            .bind(&room.name).bind(room.status.as_str()).bind(room.room_type_id)
            .bind(room.room_level_id).bind(room.floor_id).bind(room.deal_id).bind(Utc::now())
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Room>, AppError> {
        sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE id = $1")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self, status: Option<RoomStatus>) -> Result<Vec<Room>, AppError> {
        let status = status.map(|s| s.as_str());
        sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE ($1::TEXT IS NULL OR status = $1) ORDER BY name ASC")
            .bind(status)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, room: &Room) -> Result<Room, AppError> {
        sqlx::query_as::<_, Room>(
            "UPDATE rooms SET name = $1, status = $2, room_type_id = $3, room_level_id = $4, floor_id = $5, deal_id = $6
             WHERE id = $7
             RETURNING *"
        )
            .bind(&room.name).bind(room.status.as_str()).bind(room.room_type_id)
            .bind(room.room_level_id).bind(room.floor_id).bind(room.deal_id).bind(room.id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound(format!("Room {} not found", room.id)))
    }

    async fn find_rate(&self, room_id: i64) -> Result<Option<RoomRate>, AppError> {
        sqlx::query_as::<_, RoomRate>(
            "SELECT r.id AS room_id, t.price_cents AS type_price_cents, l.price_cents AS level_price_cents, r.deal_id
             FROM rooms r
             JOIN room_types t ON t.id = r.room_type_id
             JOIN room_levels l ON l.id = r.room_level_id
             WHERE r.id = $1"
        )
            .bind(room_id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
}
