use crate::domain::models::booking::{Booking, BookingDetail, BookingStatus};
use crate::domain::models::catalog::{RoomLevel, RoomType};
use crate::domain::models::deal::{Deal, DealStatus};
use crate::domain::models::payment::Payment;
use crate::domain::services::pricing::{cents_to_money, rate_from_f64};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

// Money leaves the API as a two-decimal string, never as cents.

#[derive(Serialize)]
pub struct PricedItemResponse {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<RoomType> for PricedItemResponse {
    fn from(t: RoomType) -> Self {
        Self { id: t.id, name: t.name, price: cents_to_money(t.price_cents), created_at: t.created_at }
    }
}

impl From<RoomLevel> for PricedItemResponse {
    fn from(l: RoomLevel) -> Self {
        Self { id: l.id, name: l.name, price: cents_to_money(l.price_cents), created_at: l.created_at }
    }
}

#[derive(Serialize)]
pub struct DealResponse {
    pub id: i64,
    pub name: String,
    pub discount_rate: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: DealStatus,
}

impl DealResponse {
    pub fn new(deal: Deal, today: NaiveDate) -> Self {
        Self {
            id: deal.id,
            status: deal.status_at(today),
            discount_rate: rate_from_f64(deal.discount_rate),
            name: deal.name,
            start_date: deal.start_date,
            end_date: deal.end_date,
        }
    }
}

#[derive(Serialize)]
pub struct QuoteResponse {
    pub room_id: i64,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub available: bool,
    pub nights: i64,
    pub unit_price: Decimal,
    pub discount_rate: Decimal,
    pub total: Decimal,
}

#[derive(Serialize)]
pub struct BookingDetailResponse {
    pub room_id: i64,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub check_in_at: DateTime<Utc>,
    pub check_out_at: DateTime<Utc>,
    pub unit_price: Decimal,
    pub discount_rate: Decimal,
}

impl From<BookingDetail> for BookingDetailResponse {
    fn from(d: BookingDetail) -> Self {
        Self {
            room_id: d.room_id,
            check_in_date: d.check_in_date,
            check_out_date: d.check_out_date,
            check_in_at: d.check_in_at,
            check_out_at: d.check_out_at,
            unit_price: cents_to_money(d.unit_price_cents),
            discount_rate: rate_from_f64(d.discount_rate),
        }
    }
}

#[derive(Serialize)]
pub struct BookingResponse {
    pub id: i64,
    pub user_id: i64,
    pub status: BookingStatus,
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<BookingDetailResponse>>,
}

impl BookingResponse {
    pub fn summary(booking: Booking) -> Self {
        Self::build(booking, None)
    }

    pub fn with_details(booking: Booking, details: Vec<BookingDetail>) -> Self {
        Self::build(booking, Some(details.into_iter().map(Into::into).collect()))
    }

    fn build(booking: Booking, details: Option<Vec<BookingDetailResponse>>) -> Self {
        Self {
            id: booking.id,
            user_id: booking.user_id,
            status: booking.status,
            total_price: cents_to_money(booking.total_price_cents),
            created_at: booking.created_at,
            updated_at: booking.updated_at,
            details,
        }
    }
}

#[derive(Serialize)]
pub struct PaymentResponse {
    pub id: i64,
    pub booking_id: i64,
    pub card_holder: String,
    pub card_last4: String,
    pub amount: Decimal,
    pub method: String,
    pub paid_at: DateTime<Utc>,
}

impl From<Payment> for PaymentResponse {
    fn from(p: Payment) -> Self {
        Self {
            id: p.id,
            booking_id: p.booking_id,
            card_holder: p.card_holder,
            card_last4: p.card_last4,
            amount: cents_to_money(p.amount_cents),
            method: p.method,
            paid_at: p.paid_at,
        }
    }
}
