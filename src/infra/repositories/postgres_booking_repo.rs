use crate::domain::models::booking::{Booking, BookingDetail, BookingStatus, NewBooking};
use crate::domain::ports::BookingRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresBookingRepo {
    pool: PgPool,
}

impl PostgresBookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepo {
    async fn has_blocking_overlap(&self, room_id: i64, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM booking_details d JOIN bookings b ON b.id = d.booking_id
                WHERE d.room_id = $1 AND b.status IN ('booked', 'checked_in')
                  AND d.check_in_at < $2 AND d.check_out_at > $3
             )"
        )
            .bind(room_id).bind(end).bind(start)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn create_with_detail(&self, booking: &NewBooking) -> Result<(Booking, BookingDetail), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Row lock on the room serializes every writer targeting it until commit.
        let locked = sqlx::query_scalar::<_, i64>("SELECT id FROM rooms WHERE id = $1 FOR UPDATE")
            .bind(booking.room_id)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?;
        if locked.is_none() {
            return Err(AppError::NotFound(format!("Room {} not found", booking.room_id)));
        }

        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM booking_details d JOIN bookings b ON b.id = d.booking_id
                WHERE d.room_id = $1 AND b.status IN ('booked', 'checked_in')
                  AND d.check_in_at < $2 AND d.check_out_at > $3
             )"
        )
            .bind(booking.room_id).bind(booking.check_out_at).bind(booking.check_in_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;
        if taken {
            return Err(AppError::RoomUnavailable(format!(
                "Room {} was booked from {} to {} by another reservation",
                booking.room_id, booking.check_in_date, booking.check_out_date
            )));
        }

        let header = sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (user_id, total_price_cents, status, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *"
        )
            .bind(booking.user_id).bind(booking.total_price_cents).bind(booking.status.as_str())
            .bind(booking.created_at).bind(booking.created_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        let detail = sqlx::query_as::<_, BookingDetail>(
            "INSERT INTO booking_details (booking_id, room_id, unit_price_cents, discount_rate, check_in_date, check_out_date, check_in_at, check_out_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *"
        )
            .bind(header.id).bind(booking.room_id).bind(booking.unit_price_cents).bind(booking.discount_rate)
            .bind(booking.check_in_date).bind(booking.check_out_date).bind(booking.check_in_at).bind(booking.check_out_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok((header, detail))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_details(&self, booking_id: i64) -> Result<Vec<BookingDetail>, AppError> {
        sqlx::query_as::<_, BookingDetail>("SELECT * FROM booking_details WHERE booking_id = $1 ORDER BY check_in_at ASC")
            .bind(booking_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE user_id = $1 ORDER BY created_at DESC, id DESC")
            .bind(user_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_all(&self) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings ORDER BY created_at DESC, id DESC")
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn cancel(&self, id: i64, at: DateTime<Utc>) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = 'cancelled', updated_at = $1 WHERE id = $2 AND status = 'booked' RETURNING *"
        )
            .bind(at).bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_due_check_ins(&self, now: DateTime<Utc>) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings b
             WHERE b.status = 'booked'
               AND EXISTS (SELECT 1 FROM booking_details d WHERE d.booking_id = b.id AND d.check_in_at <= $1)
             ORDER BY b.id ASC"
        )
            .bind(now).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_due_check_outs(&self, now: DateTime<Utc>) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings b
             WHERE b.status = 'checked_in'
               AND EXISTS (SELECT 1 FROM booking_details d WHERE d.booking_id = b.id AND d.check_out_at <= $1)
             ORDER BY b.id ASC"
        )
            .bind(now).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn apply_transition(&self, booking_id: i64, from: BookingStatus, to: BookingStatus, at: DateTime<Utc>) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let moved = sqlx::query("UPDATE bookings SET status = $1, updated_at = $2 WHERE id = $3 AND status = $4")
            .bind(to.as_str()).bind(at).bind(booking_id).bind(from.as_str())
            .execute(&mut *tx).await.map_err(AppError::Database)?;

        if moved.rows_affected() == 0 {
            return Ok(false);
        }

        match to {
            BookingStatus::CheckedIn => {
                sqlx::query("UPDATE rooms SET status = 'occupied' WHERE id IN (SELECT room_id FROM booking_details WHERE booking_id = $1)")
                    .bind(booking_id)
                    .execute(&mut *tx).await.map_err(AppError::Database)?;
            }
            BookingStatus::CheckedOut => {
                sqlx::query(
                    "UPDATE rooms SET status = 'available'
                     WHERE id IN (SELECT room_id FROM booking_details WHERE booking_id = $1)
                       AND status = 'occupied'
                       AND NOT EXISTS (
                           SELECT 1 FROM booking_details d JOIN bookings b ON b.id = d.booking_id
                           WHERE d.room_id = rooms.id AND b.status = 'checked_in'
                       )"
                )
                    .bind(booking_id)
                    .execute(&mut *tx).await.map_err(AppError::Database)?;
            }
            _ => {}
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(true)
    }
}
