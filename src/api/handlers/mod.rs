pub mod admin;
pub mod auth;
pub mod booking;
pub mod catalog;
pub mod deal;
pub mod health;
pub mod payment;
pub mod room;
