use std::sync::Arc;
use chrono::NaiveDate;
use chrono_tz::Tz;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use crate::domain::models::deal::{Deal, DealStatus};
use crate::domain::ports::{Clock, DealRepository, RoomRepository};
use crate::domain::services::house_policy::StayWindow;
use crate::error::AppError;

pub fn cents_to_money(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

pub fn money_to_cents(amount: Decimal) -> Result<i64, AppError> {
    round_currency(amount)
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|cents| cents.to_i64())
        .ok_or_else(|| AppError::Validation(format!("Amount {} is out of range", amount)))
}

// Half-up to the cent, always carrying two decimals.
pub fn round_currency(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

pub fn rate_from_f64(rate: f64) -> Decimal {
    Decimal::from_f64(rate).unwrap_or(Decimal::ZERO).round_dp(4).normalize()
}

pub fn nightly_rate(type_price_cents: i64, level_price_cents: i64) -> Decimal {
    cents_to_money(type_price_cents) + cents_to_money(level_price_cents)
}

/// The deal's rate when it is running today and the stay starts inside its window, else zero.
/// Stored rates are already clamped to [0, 1] on the way in.
pub fn effective_discount_rate(deal: Option<&Deal>, today: NaiveDate, check_in: NaiveDate) -> Decimal {
    match deal {
        Some(deal) if deal.status_at(today) == DealStatus::Ongoing && deal.covers(check_in) => {
            rate_from_f64(deal.discount_rate)
        }
        _ => Decimal::ZERO,
    }
}

pub fn compute_total(unit_price: Decimal, nights: i64, discount_rate: Decimal) -> Decimal {
    round_currency(unit_price * Decimal::from(nights) * (Decimal::ONE - discount_rate))
}

#[derive(Debug, Clone, Serialize)]
pub struct PriceQuote {
    pub unit_price: Decimal,
    pub discount_rate: Decimal,
    pub nights: i64,
    pub total: Decimal,
}

pub struct PricingComposer {
    rooms: Arc<dyn RoomRepository>,
    deals: Arc<dyn DealRepository>,
    clock: Arc<dyn Clock>,
    tz: Tz,
}

impl PricingComposer {
    pub fn new(rooms: Arc<dyn RoomRepository>, deals: Arc<dyn DealRepository>, clock: Arc<dyn Clock>, tz: Tz) -> Self {
        Self { rooms, deals, clock, tz }
    }

    pub async fn compute_nightly_rate(&self, room_id: i64) -> Result<Decimal, AppError> {
        let rate = self.rooms.find_rate(room_id).await?
            .ok_or_else(|| AppError::NotFound(format!("Room {} not found", room_id)))?;
        Ok(nightly_rate(rate.type_price_cents, rate.level_price_cents))
    }

    // Point-in-time read; nothing is locked until the writer captures it.
    pub async fn compute_discount_rate(&self, room_id: i64, check_in: NaiveDate) -> Result<Decimal, AppError> {
        let rate = self.rooms.find_rate(room_id).await?
            .ok_or_else(|| AppError::NotFound(format!("Room {} not found", room_id)))?;
        self.discount_for(rate.deal_id, check_in).await
    }

    pub async fn quote(&self, room_id: i64, stay: &StayWindow) -> Result<PriceQuote, AppError> {
        let unit_price = self.compute_nightly_rate(room_id).await?;
        let discount_rate = self.compute_discount_rate(room_id, stay.check_in_date).await?;
        let nights = stay.nights();

        Ok(PriceQuote {
            unit_price: round_currency(unit_price),
            discount_rate,
            nights,
            total: compute_total(unit_price, nights, discount_rate),
        })
    }

    async fn discount_for(&self, deal_id: Option<i64>, check_in: NaiveDate) -> Result<Decimal, AppError> {
        let Some(deal_id) = deal_id else {
            return Ok(Decimal::ZERO);
        };

        let deal = self.deals.find_by_id(deal_id).await?;
        let today = self.clock.now().with_timezone(&self.tz).date_naive();
        Ok(effective_discount_rate(deal.as_ref(), today, check_in))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn deal(rate: f64) -> Deal {
        Deal {
            id: 7,
            name: "Early summer".into(),
            discount_rate: rate,
            start_date: date(2024, 6, 1),
            end_date: date(2024, 6, 15),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn total_applies_nights_and_discount() {
        let total = compute_total(dec("100"), 3, dec("0.2"));
        assert_eq!(total, dec("240.00"));
        assert_eq!(total.to_string(), "240.00");
    }

    #[test]
    fn total_rounds_half_up_to_the_cent() {
        assert_eq!(compute_total(dec("0.25"), 1, dec("0.5")).to_string(), "0.13");
        assert_eq!(compute_total(dec("33.33"), 1, dec("0.15")).to_string(), "28.33");
        assert_eq!(compute_total(dec("150"), 3, Decimal::ZERO).to_string(), "450.00");
    }

    #[test]
    fn nightly_rate_adds_type_and_level() {
        assert_eq!(nightly_rate(10_000, 5_000), dec("150.00"));
    }

    #[test]
    fn cents_conversion_is_exact() {
        assert_eq!(money_to_cents(dec("240.00")).unwrap(), 24_000);
        assert_eq!(money_to_cents(dec("0.125")).unwrap(), 13);
        assert_eq!(cents_to_money(45_050).to_string(), "450.50");
    }

    #[test]
    fn discount_requires_an_ongoing_deal_covering_check_in() {
        let d = deal(0.2);
        assert_eq!(effective_discount_rate(Some(&d), date(2024, 6, 5), date(2024, 6, 10)), dec("0.2"));
        // Not started yet.
        assert_eq!(effective_discount_rate(Some(&d), date(2024, 5, 20), date(2024, 6, 10)), Decimal::ZERO);
        // Already over.
        assert_eq!(effective_discount_rate(Some(&d), date(2024, 6, 16), date(2024, 6, 10)), Decimal::ZERO);
        // Running, but the stay starts after it ends.
        assert_eq!(effective_discount_rate(Some(&d), date(2024, 6, 5), date(2024, 6, 20)), Decimal::ZERO);
        assert_eq!(effective_discount_rate(None, date(2024, 6, 5), date(2024, 6, 10)), Decimal::ZERO);
    }
}
