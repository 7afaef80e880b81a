use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealStatus {
    New,
    Ongoing,
    Finished,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Deal {
    pub id: i64,
    pub name: String,
    pub discount_rate: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Deal {
    // The validity window is inclusive on both ends, in hotel-local calendar days.
    pub fn status_at(&self, today: NaiveDate) -> DealStatus {
        if today < self.start_date {
            DealStatus::New
        } else if today > self.end_date {
            DealStatus::Finished
        } else {
            DealStatus::Ongoing
        }
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

#[derive(Debug, Clone)]
pub struct NewDeal {
    pub name: String,
    pub discount_rate: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}
