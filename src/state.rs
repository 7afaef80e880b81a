use std::sync::Arc;
use crate::domain::ports::{
    BookingRepository, CatalogRepository, Clock, DealRepository, EmailService,
    PaymentRepository, RoomRepository, UserRepository,
};
use crate::domain::services::auth_service::AuthService;
use crate::domain::services::availability::AvailabilityResolver;
use crate::domain::services::booking_service::BookingService;
use crate::domain::services::notification::{default_templates, BookingNotifier};
use crate::domain::services::pricing::PricingComposer;
use crate::domain::services::status_scheduler::StatusScheduler;
use crate::config::Config;

#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub catalog: Arc<dyn CatalogRepository>,
    pub deals: Arc<dyn DealRepository>,
    pub rooms: Arc<dyn RoomRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub payments: Arc<dyn PaymentRepository>,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub catalog_repo: Arc<dyn CatalogRepository>,
    pub deal_repo: Arc<dyn DealRepository>,
    pub room_repo: Arc<dyn RoomRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub payment_repo: Arc<dyn PaymentRepository>,
    pub clock: Arc<dyn Clock>,
    pub resolver: Arc<AvailabilityResolver>,
    pub pricing: Arc<PricingComposer>,
    pub booking_service: Arc<BookingService>,
    pub scheduler: Arc<StatusScheduler>,
    pub auth_service: Arc<AuthService>,
    pub notifier: Arc<BookingNotifier>,
}

impl AppState {
    /// Wires the domain services over one set of repositories. Shared by the server and the tests.
    pub fn new(config: Config, repos: Repositories, clock: Arc<dyn Clock>, email_service: Arc<dyn EmailService>) -> Self {
        let tz = config.hotel_timezone;

        let resolver = Arc::new(AvailabilityResolver::new(repos.rooms.clone(), repos.bookings.clone(), tz));
        let pricing = Arc::new(PricingComposer::new(repos.rooms.clone(), repos.deals.clone(), clock.clone(), tz));
        let booking_service = Arc::new(BookingService::new(
            repos.rooms.clone(),
            repos.bookings.clone(),
            resolver.clone(),
            pricing.clone(),
            clock.clone(),
            tz,
        ));
        let scheduler = Arc::new(StatusScheduler::new(repos.bookings.clone(), clock.clone()));
        let auth_service = Arc::new(AuthService::new(config.clone()));

        let templates = Arc::new(default_templates().expect("Failed to load email templates"));
        let notifier = Arc::new(BookingNotifier::new(repos.users.clone(), email_service, templates));

        Self {
            config,
            user_repo: repos.users,
            catalog_repo: repos.catalog,
            deal_repo: repos.deals,
            room_repo: repos.rooms,
            booking_repo: repos.bookings,
            payment_repo: repos.payments,
            clock,
            resolver,
            pricing,
            booking_service,
            scheduler,
            auth_service,
            notifier,
        }
    }
}
