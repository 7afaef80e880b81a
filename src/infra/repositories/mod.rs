pub mod sqlite_booking_repo;
pub mod sqlite_catalog_repo;
pub mod sqlite_deal_repo;
pub mod sqlite_payment_repo;
pub mod sqlite_room_repo;
pub mod sqlite_user_repo;

pub mod postgres_booking_repo;
pub mod postgres_catalog_repo;
pub mod postgres_deal_repo;
pub mod postgres_payment_repo;
pub mod postgres_room_repo;
pub mod postgres_user_repo;
