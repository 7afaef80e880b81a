use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use crate::error::AppError;

pub const CHECK_IN_HOUR: u32 = 14;
pub const CHECK_OUT_HOUR: u32 = 12;

fn pinned_instant(date: NaiveDate, hour: u32, tz: Tz) -> Result<DateTime<Utc>, AppError> {
    let time = NaiveTime::from_hms_opt(hour, 0, 0).ok_or(AppError::Internal)?;

    // Ambiguous local times (DST fall-back) resolve to the first occurrence.
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| AppError::Validation(format!("{} {:02}:00 does not exist in {}", date, hour, tz)))
}

pub fn check_in_instant(date: NaiveDate, tz: Tz) -> Result<DateTime<Utc>, AppError> {
    pinned_instant(date, CHECK_IN_HOUR, tz)
}

pub fn check_out_instant(date: NaiveDate, tz: Tz) -> Result<DateTime<Utc>, AppError> {
    pinned_instant(date, CHECK_OUT_HOUR, tz)
}

pub fn nights(check_in: NaiveDate, check_out: NaiveDate) -> i64 {
    (check_out - check_in).num_days()
}

/// Half-open interval intersection: `[a_start, a_end)` and `[b_start, b_end)` share an instant.
pub fn intervals_overlap(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    !(a_end <= b_start || a_start >= b_end)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayWindow {
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub check_in_at: DateTime<Utc>,
    pub check_out_at: DateTime<Utc>,
}

impl StayWindow {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate, tz: Tz) -> Result<Self, AppError> {
        if nights(check_in, check_out) <= 0 {
            return Err(AppError::Validation("check_out must be after check_in".into()));
        }

        Ok(Self {
            check_in_date: check_in,
            check_out_date: check_out,
            check_in_at: check_in_instant(check_in, tz)?,
            check_out_at: check_out_instant(check_out, tz)?,
        })
    }

    pub fn nights(&self) -> i64 {
        nights(self.check_in_date, self.check_out_date)
    }

    pub fn overlaps(&self, other: &StayWindow) -> bool {
        intervals_overlap(self.check_in_at, self.check_out_at, other.check_in_at, other.check_out_at)
    }
}
