use std::sync::Arc;
use chrono::NaiveDate;
use chrono_tz::Tz;
use tracing::debug;
use crate::domain::models::room::RoomStatus;
use crate::domain::ports::{BookingRepository, RoomRepository};
use crate::domain::services::house_policy::StayWindow;
use crate::error::AppError;

pub struct AvailabilityResolver {
    rooms: Arc<dyn RoomRepository>,
    bookings: Arc<dyn BookingRepository>,
    tz: Tz,
}

impl AvailabilityResolver {
    pub fn new(rooms: Arc<dyn RoomRepository>, bookings: Arc<dyn BookingRepository>, tz: Tz) -> Self {
        Self { rooms, bookings, tz }
    }

    /// Whether `room_id` is free between the house-policy instants of `check_in` and `check_out`.
    ///
    /// Unknown rooms, rooms under maintenance and unusable ranges answer `false` instead
    /// of failing; only storage errors are propagated.
    pub async fn is_available(&self, room_id: i64, check_in: NaiveDate, check_out: NaiveDate) -> Result<bool, AppError> {
        let Ok(window) = StayWindow::new(check_in, check_out, self.tz) else {
            return Ok(false);
        };
        self.is_window_available(room_id, &window).await
    }

    pub async fn is_window_available(&self, room_id: i64, window: &StayWindow) -> Result<bool, AppError> {
        let Some(room) = self.rooms.find_by_id(room_id).await? else {
            debug!("Availability check for unknown room {}", room_id);
            return Ok(false);
        };

        if room.status == RoomStatus::Maintenance {
            debug!("Room {} is under maintenance", room_id);
            return Ok(false);
        }

        let blocked = self.bookings
            .has_blocking_overlap(room_id, window.check_in_at, window.check_out_at)
            .await?;

        Ok(!blocked)
    }
}
