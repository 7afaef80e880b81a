use std::sync::Arc;
use chrono::NaiveDate;
use chrono_tz::Tz;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use tracing::{info, warn};
use crate::domain::models::auth::Identity;
use crate::domain::models::booking::{Booking, BookingDetail, BookingStatus, NewBooking};
use crate::domain::ports::{BookingRepository, Clock, RoomRepository};
use crate::domain::services::availability::AvailabilityResolver;
use crate::domain::services::house_policy::StayWindow;
use crate::domain::services::pricing::{money_to_cents, PricingComposer};
use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub user_id: i64,
    pub room_id: i64,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub initial_status: Option<BookingStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingReceipt {
    pub booking_id: i64,
    pub total_price: Decimal,
    pub nights: i64,
    pub status: BookingStatus,
    #[serde(skip)]
    pub booking: Booking,
    #[serde(skip)]
    pub detail: BookingDetail,
}

pub struct BookingService {
    rooms: Arc<dyn RoomRepository>,
    bookings: Arc<dyn BookingRepository>,
    resolver: Arc<AvailabilityResolver>,
    pricing: Arc<PricingComposer>,
    clock: Arc<dyn Clock>,
    tz: Tz,
}

impl BookingService {
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        bookings: Arc<dyn BookingRepository>,
        resolver: Arc<AvailabilityResolver>,
        pricing: Arc<PricingComposer>,
        clock: Arc<dyn Clock>,
        tz: Tz,
    ) -> Self {
        Self { rooms, bookings, resolver, pricing, clock, tz }
    }

    pub async fn create_booking(&self, request: BookingRequest) -> Result<BookingReceipt, AppError> {
        let stay = StayWindow::new(request.check_in, request.check_out, self.tz)?;

        let now = self.clock.now();
        let today = now.with_timezone(&self.tz).date_naive();
        if stay.check_in_date < today {
            return Err(AppError::Validation("check_in cannot be in the past".into()));
        }

        // Walk-in bookings may name their starting state, but only the lifecycle's entry state is valid.
        let status = match request.initial_status {
            None | Some(BookingStatus::Booked) => BookingStatus::Booked,
            Some(other) => {
                return Err(AppError::Validation(format!("Bookings cannot start as {}", other)));
            }
        };

        let room = self.rooms.find_by_id(request.room_id).await?
            .ok_or_else(|| AppError::NotFound(format!("Room {} not found", request.room_id)))?;

        if !self.resolver.is_window_available(room.id, &stay).await? {
            info!("Booking rejected: room {} taken between {} and {}", room.id, stay.check_in_date, stay.check_out_date);
            return Err(AppError::RoomUnavailable(format!(
                "Room {} is not available from {} to {}", room.name, stay.check_in_date, stay.check_out_date
            )));
        }

        let quote = self.pricing.quote(room.id, &stay).await?;

        let new_booking = NewBooking {
            user_id: request.user_id,
            room_id: room.id,
            status,
            total_price_cents: money_to_cents(quote.total)?,
            unit_price_cents: money_to_cents(quote.unit_price)?,
            discount_rate: quote.discount_rate.to_f64().unwrap_or(0.0),
            check_in_date: stay.check_in_date,
            check_out_date: stay.check_out_date,
            check_in_at: stay.check_in_at,
            check_out_at: stay.check_out_at,
            created_at: now,
        };

        // The repository repeats the overlap check inside its transaction; a racing writer surfaces here.
        let (booking, detail) = match self.bookings.create_with_detail(&new_booking).await {
            Ok(created) => created,
            Err(AppError::RoomUnavailable(msg)) => {
                warn!("Booking for room {} lost the race to a concurrent reservation", room.id);
                return Err(AppError::RoomUnavailable(msg));
            }
            Err(e) => return Err(e),
        };

        info!(
            booking_id = booking.id,
            room_id = room.id,
            nights = quote.nights,
            total = %quote.total,
            "Booking created"
        );

        Ok(BookingReceipt {
            booking_id: booking.id,
            total_price: quote.total,
            nights: quote.nights,
            status: booking.status,
            booking,
            detail,
        })
    }

    pub async fn cancel_booking(&self, booking_id: i64, actor: &Identity) -> Result<Booking, AppError> {
        let booking = self.bookings.find_by_id(booking_id).await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", booking_id)))?;

        if !actor.can_access(booking.user_id) {
            return Err(AppError::NotFound(format!("Booking {} not found", booking_id)));
        }

        if !booking.status.can_transition_to(BookingStatus::Cancelled) {
            return Err(AppError::Conflict(format!("A {} booking cannot be cancelled", booking.status)));
        }

        // Conditional update: the scheduler may have checked the guest in since the read above.
        let cancelled = self.bookings.cancel(booking_id, self.clock.now()).await?
            .ok_or_else(|| AppError::Conflict("Booking is no longer in the booked state".into()))?;

        info!("Booking cancelled: {} by user {}", booking_id, actor.user_id);
        Ok(cancelled)
    }
}
