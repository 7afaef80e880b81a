use std::sync::Arc;
use tera::{Context, Tera};
use tracing::{info, warn};
use crate::domain::models::booking::{Booking, BookingDetail};
use crate::domain::ports::{EmailService, UserRepository};
use crate::domain::services::pricing::cents_to_money;
use crate::error::AppError;

const CONFIRMATION_TEMPLATE: &str = "booking_confirmation.html";
const CANCELLATION_TEMPLATE: &str = "booking_cancellation.html";

pub fn default_templates() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_template(CONFIRMATION_TEMPLATE, include_str!("../../templates/booking_confirmation.html"))?;
    tera.add_raw_template(CANCELLATION_TEMPLATE, include_str!("../../templates/booking_cancellation.html"))?;
    Ok(tera)
}

// Guest emails are best effort: a failed send is logged and never undoes the booking.
pub struct BookingNotifier {
    users: Arc<dyn UserRepository>,
    email_service: Arc<dyn EmailService>,
    templates: Arc<Tera>,
}

impl BookingNotifier {
    pub fn new(users: Arc<dyn UserRepository>, email_service: Arc<dyn EmailService>, templates: Arc<Tera>) -> Self {
        Self { users, email_service, templates }
    }

    pub async fn booking_confirmed(&self, booking: &Booking, detail: &BookingDetail, room_name: &str) {
        let mut context = Context::new();
        context.insert("booking_id", &booking.id);
        context.insert("room_name", room_name);
        context.insert("check_in", &detail.check_in_date.to_string());
        context.insert("check_out", &detail.check_out_date.to_string());
        context.insert("total_price", &cents_to_money(booking.total_price_cents).to_string());

        let subject = format!("Your reservation #{} is confirmed", booking.id);
        if let Err(e) = self.deliver(booking.user_id, &subject, CONFIRMATION_TEMPLATE, context).await {
            warn!("Confirmation email for booking {} not sent: {}", booking.id, e);
        }
    }

    pub async fn booking_cancelled(&self, booking: &Booking) {
        let mut context = Context::new();
        context.insert("booking_id", &booking.id);

        let subject = format!("Your reservation #{} was cancelled", booking.id);
        if let Err(e) = self.deliver(booking.user_id, &subject, CANCELLATION_TEMPLATE, context).await {
            warn!("Cancellation email for booking {} not sent: {}", booking.id, e);
        }
    }

    async fn deliver(&self, user_id: i64, subject: &str, template: &str, mut context: Context) -> Result<(), AppError> {
        let user = self.users.find_by_id(user_id).await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

        context.insert("guest_name", &user.full_name);
        let body = self.templates.render(template, &context)
            .map_err(|e| AppError::InternalWithMsg(format!("Tera render error: {:?}", e)))?;

        self.email_service.send(&user.email, subject, &body).await?;
        info!("Sent '{}' to {}", subject, user.email);
        Ok(())
    }
}
