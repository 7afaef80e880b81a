use std::sync::Arc;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, info_span, Instrument};
use crate::domain::models::booking::{Booking, BookingStatus};
use crate::domain::ports::{BookingRepository, Clock};
use crate::error::AppError;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub checked_in: usize,
    pub checked_out: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Advances bookings along booked -> checked_in -> checked_out once the house-policy
/// instants have passed, mirroring each move onto the room.
///
/// Every booking is its own atomic unit: a failure is counted and logged, and the
/// booking is retried on the next sweep because its due predicate still holds.
pub struct StatusScheduler {
    bookings: Arc<dyn BookingRepository>,
    clock: Arc<dyn Clock>,
}

impl StatusScheduler {
    pub fn new(bookings: Arc<dyn BookingRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { bookings, clock }
    }

    pub async fn sweep(&self) -> Result<SweepReport, AppError> {
        let now = self.clock.now();
        let mut report = SweepReport::default();

        // Arrivals first: a stay whose check-out has also passed leaves in this same sweep.
        // A departing guest never frees a room another checked-in guest holds.
        let due_in = self.bookings.find_due_check_ins(now).await?;
        for booking in due_in {
            self.advance(&booking, BookingStatus::Booked, BookingStatus::CheckedIn, now, &mut report).await;
        }

        let due_out = self.bookings.find_due_check_outs(now).await?;
        for booking in due_out {
            self.advance(&booking, BookingStatus::CheckedIn, BookingStatus::CheckedOut, now, &mut report).await;
        }

        Ok(report)
    }

    async fn advance(
        &self,
        booking: &Booking,
        from: BookingStatus,
        to: BookingStatus,
        now: DateTime<Utc>,
        report: &mut SweepReport,
    ) {
        let span = info_span!(
            "status_transition",
            booking_id = booking.id,
            from = %from,
            to = %to
        );

        async {
            match self.bookings.apply_transition(booking.id, from, to, now).await {
                Ok(true) => {
                    info!("Booking transitioned");
                    match to {
                        BookingStatus::CheckedIn => report.checked_in += 1,
                        _ => report.checked_out += 1,
                    }
                }
                // Someone else moved it first (a concurrent sweep or a cancellation).
                Ok(false) => report.skipped += 1,
                Err(e) => {
                    error!("Status transition failed: {:?}", e);
                    report.failed += 1;
                }
            }
        }
            .instrument(span)
            .await;
    }
}
