use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::fmt;
use super::UnknownVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Available,
    Occupied,
    Booked,
    Maintenance,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::Available => "available",
            RoomStatus::Occupied => "occupied",
            RoomStatus::Booked => "booked",
            RoomStatus::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for RoomStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "available" => Ok(RoomStatus::Available),
            "occupied" => Ok(RoomStatus::Occupied),
            "booked" => Ok(RoomStatus::Booked),
            "maintenance" => Ok(RoomStatus::Maintenance),
            _ => Err(UnknownVariant { kind: "room status", value }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Room {
    pub id: i64,
    pub name: String,
    #[sqlx(try_from = "String")]
    pub status: RoomStatus,
    pub room_type_id: i64,
    pub room_level_id: i64,
    pub floor_id: i64,
    pub deal_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewRoom {
    pub name: String,
    pub status: RoomStatus,
    pub room_type_id: i64,
    pub room_level_id: i64,
    pub floor_id: i64,
    pub deal_id: Option<i64>,
}

// Price components joined from the room's type and level.
#[derive(Debug, FromRow, Clone)]
pub struct RoomRate {
    pub room_id: i64,
    pub type_price_cents: i64,
    pub level_price_cents: i64,
    pub deal_id: Option<i64>,
}
