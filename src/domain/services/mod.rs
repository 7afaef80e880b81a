pub mod auth_service;
pub mod availability;
pub mod booking_service;
pub mod house_policy;
pub mod notification;
pub mod pricing;
pub mod status_scheduler;
