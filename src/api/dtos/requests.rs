use crate::domain::models::booking::BookingStatus;
use crate::domain::models::room::RoomStatus;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::{Validate, ValidationError};

fn validate_money(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() {
        return Err(ValidationError::new("negative").with_message("must not be negative".into()));
    }
    if value.normalize().scale() > 2 {
        return Err(ValidationError::new("precision").with_message("must have at most two decimal places".into()));
    }
    Ok(())
}

fn validate_card_number(value: &str) -> Result<(), ValidationError> {
    if !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::new("digits").with_message("must contain digits only".into()));
    }
    Ok(())
}

fn stay_window(check_in: NaiveDate, check_out: NaiveDate) -> Result<(), ValidationError> {
    if check_out <= check_in {
        return Err(ValidationError::new("stay_window").with_message("check_out must be after check_in".into()));
    }
    Ok(())
}

#[derive(Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, max = 120, message = "must be between 1 and 120 characters"))]
    pub full_name: String,
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, Validate)]
pub struct CreatePricedItemRequest {
    #[validate(length(min = 1, max = 80, message = "must be between 1 and 80 characters"))]
    pub name: String,
    #[validate(custom(function = "validate_money"))]
    pub price: Decimal,
}

#[derive(Deserialize, Validate)]
pub struct UpdatePricedItemRequest {
    #[validate(length(min = 1, max = 80, message = "must be between 1 and 80 characters"))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_money"))]
    pub price: Option<Decimal>,
}

#[derive(Deserialize, Validate)]
pub struct CreateFloorRequest {
    #[validate(length(min = 1, max = 80, message = "must be between 1 and 80 characters"))]
    pub name: String,
}

#[derive(Deserialize, Validate)]
#[validate(schema(function = "validate_deal_window", skip_on_field_errors = false))]
pub struct DealRequest {
    #[validate(length(min = 1, max = 120, message = "must be between 1 and 120 characters"))]
    pub name: String,
    #[validate(range(min = 0.0, max = 1.0, message = "must be between 0 and 1"))]
    pub discount_rate: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

fn validate_deal_window(deal: &DealRequest) -> Result<(), ValidationError> {
    if deal.end_date < deal.start_date {
        return Err(ValidationError::new("deal_window").with_message("end_date must not be before start_date".into()));
    }
    Ok(())
}

#[derive(Deserialize, Validate)]
pub struct CreateRoomRequest {
    #[validate(length(min = 1, max = 40, message = "must be between 1 and 40 characters"))]
    pub name: String,
    pub room_type_id: i64,
    pub room_level_id: i64,
    pub floor_id: i64,
    pub deal_id: Option<i64>,
    pub status: Option<RoomStatus>,
}

#[derive(Deserialize, Validate)]
pub struct UpdateRoomRequest {
    #[validate(length(min = 1, max = 40, message = "must be between 1 and 40 characters"))]
    pub name: Option<String>,
    pub status: Option<RoomStatus>,
    pub room_type_id: Option<i64>,
    pub room_level_id: Option<i64>,
    pub floor_id: Option<i64>,
    pub deal_id: Option<i64>,
    #[serde(default)]
    pub clear_deal: bool,
}

#[derive(Deserialize)]
pub struct RoomListQuery {
    pub status: Option<RoomStatus>,
}

#[derive(Deserialize)]
pub struct QuoteQuery {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

#[derive(Deserialize, Validate)]
#[validate(schema(function = "validate_guest_stay", skip_on_field_errors = false))]
pub struct CreateBookingRequest {
    pub room_id: i64,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

fn validate_guest_stay(request: &CreateBookingRequest) -> Result<(), ValidationError> {
    stay_window(request.check_in, request.check_out)
}

#[derive(Deserialize, Validate)]
#[validate(schema(function = "validate_walk_in_stay", skip_on_field_errors = false))]
pub struct StaffBookingRequest {
    pub user_id: i64,
    pub room_id: i64,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub status: Option<BookingStatus>,
}

fn validate_walk_in_stay(request: &StaffBookingRequest) -> Result<(), ValidationError> {
    stay_window(request.check_in, request.check_out)
}

#[derive(Deserialize, Validate)]
pub struct CreatePaymentRequest {
    #[validate(length(min = 1, max = 120, message = "must be between 1 and 120 characters"))]
    pub card_holder: String,
    #[validate(
        length(min = 12, max = 19, message = "must be between 12 and 19 digits"),
        custom(function = "validate_card_number")
    )]
    pub card_number: String,
    #[validate(length(min = 1, max = 40, message = "must be between 1 and 40 characters"))]
    pub method: String,
}

#[derive(Deserialize, Validate)]
pub struct UpdatePaymentMethodRequest {
    #[validate(length(min = 1, max = 40, message = "must be between 1 and 40 characters"))]
    pub method: String,
}
