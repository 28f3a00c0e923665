pub mod auth;
pub mod customers;
pub mod reservations;
pub mod rooms;
