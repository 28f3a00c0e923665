pub mod auth;
pub mod booking_rules;
pub mod customer_service;
pub mod document_service;
pub mod pricing;
pub mod reservation_service;
pub mod room_service;
