use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use std::fmt;
use super::UnknownVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Booked,
    CheckedIn,
    CheckedOut,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Booked => "booked",
            BookingStatus::CheckedIn => "checked_in",
            BookingStatus::CheckedOut => "checked_out",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::CheckedOut | BookingStatus::Cancelled)
    }

    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Booked, BookingStatus::CheckedIn)
                | (BookingStatus::CheckedIn, BookingStatus::CheckedOut)
                | (BookingStatus::Booked, BookingStatus::Cancelled)
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for BookingStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "booked" => Ok(BookingStatus::Booked),
            "checked_in" => Ok(BookingStatus::CheckedIn),
            "checked_out" => Ok(BookingStatus::CheckedOut),
            "cancelled" => Ok(BookingStatus::Cancelled),
            _ => Err(UnknownVariant { kind: "booking status", value }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: i64,
    pub user_id: i64,
    pub total_price_cents: i64,
    #[sqlx(try_from = "String")]
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct BookingDetail {
    pub id: i64,
    pub booking_id: i64,
    pub room_id: i64,
    pub unit_price_cents: i64,
    pub discount_rate: f64,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub check_in_at: DateTime<Utc>,
    pub check_out_at: DateTime<Utc>,
}

// Everything the writer needs to persist a header and its single stay in one transaction.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: i64,
    pub room_id: i64,
    pub status: BookingStatus,
    pub total_price_cents: i64,
    pub unit_price_cents: i64,
    pub discount_rate: f64,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub check_in_at: DateTime<Utc>,
    pub check_out_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
