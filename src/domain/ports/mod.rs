use crate::domain::models::{
    booking::{Booking, BookingDetail, BookingStatus, NewBooking},
    catalog::{Floor, RoomLevel, RoomType},
    deal::{Deal, NewDeal},
    payment::{NewPayment, Payment},
    room::{NewRoom, Room, RoomRate, RoomStatus},
    user::{NewUser, User},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &NewUser) -> Result<User, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn create_room_type(&self, name: &str, price_cents: i64) -> Result<RoomType, AppError>;
    async fn list_room_types(&self) -> Result<Vec<RoomType>, AppError>;
    async fn update_room_type(&self, room_type: &RoomType) -> Result<RoomType, AppError>;
    async fn find_room_type(&self, id: i64) -> Result<Option<RoomType>, AppError>;

    async fn create_room_level(&self, name: &str, price_cents: i64) -> Result<RoomLevel, AppError>;
    async fn list_room_levels(&self) -> Result<Vec<RoomLevel>, AppError>;
    async fn update_room_level(&self, room_level: &RoomLevel) -> Result<RoomLevel, AppError>;
    async fn find_room_level(&self, id: i64) -> Result<Option<RoomLevel>, AppError>;

    async fn create_floor(&self, name: &str) -> Result<Floor, AppError>;
    async fn list_floors(&self) -> Result<Vec<Floor>, AppError>;
}

#[async_trait]
pub trait DealRepository: Send + Sync {
    async fn create(&self, deal: &NewDeal) -> Result<Deal, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Deal>, AppError>;
    async fn list(&self) -> Result<Vec<Deal>, AppError>;
    async fn update(&self, deal: &Deal) -> Result<Deal, AppError>;
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}

#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn create(&self, room: &NewRoom) -> Result<Room, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Room>, AppError>;
    async fn list(&self, status: Option<RoomStatus>) -> Result<Vec<Room>, AppError>;
    async fn update(&self, room: &Room) -> Result<Room, AppError>;
    async fn find_rate(&self, room_id: i64) -> Result<Option<RoomRate>, AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// True when a booked or checked-in stay on `room_id` intersects the half-open window `[start, end)`.
    async fn has_blocking_overlap(&self, room_id: i64, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<bool, AppError>;
    /// Inserts the header and its detail in one transaction, re-checking the room inside it.
    /// Fails with `RoomUnavailable` when a concurrent booking won the window.
    async fn create_with_detail(&self, booking: &NewBooking) -> Result<(Booking, BookingDetail), AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Booking>, AppError>;
    async fn find_details(&self, booking_id: i64) -> Result<Vec<BookingDetail>, AppError>;
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Booking>, AppError>;
    async fn list_all(&self) -> Result<Vec<Booking>, AppError>;
    /// Booked -> cancelled. Returns `None` when the booking was not in the booked state.
    async fn cancel(&self, id: i64, at: DateTime<Utc>) -> Result<Option<Booking>, AppError>;

    async fn find_due_check_ins(&self, now: DateTime<Utc>) -> Result<Vec<Booking>, AppError>;
    async fn find_due_check_outs(&self, now: DateTime<Utc>) -> Result<Vec<Booking>, AppError>;
    /// Moves one booking from `from` to `to` and mirrors the result onto its rooms, atomically.
    /// Returns false when the booking was no longer in `from`.
    async fn apply_transition(&self, booking_id: i64, from: BookingStatus, to: BookingStatus, at: DateTime<Utc>) -> Result<bool, AppError>;
}

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn create(&self, payment: &NewPayment) -> Result<Payment, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Payment>, AppError>;
    async fn find_by_booking(&self, booking_id: i64) -> Result<Option<Payment>, AppError>;
    async fn update_method(&self, id: i64, method: &str) -> Result<Payment, AppError>;
}

#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str) -> Result<(), AppError>;
}
