pub mod auth;
pub mod customer;
pub mod reservation;
pub mod venue;
