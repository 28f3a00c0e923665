// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::auth::logout,
        handlers::auth::change_password,
        handlers::auth::get_me,

        // --- Rooms ---
        handlers::rooms::list_rooms,
        handlers::rooms::get_room,
        handlers::rooms::check_availability,
        handlers::rooms::create_room,
        handlers::rooms::update_room,
        handlers::rooms::deactivate_room,

        // --- Customers ---
        handlers::customers::list_customers,
        handlers::customers::get_customer,
        handlers::customers::create_customer,
        handlers::customers::update_customer,

        // --- Reservations ---
        handlers::reservations::create_reservation,
        handlers::reservations::get_reservation,
        handlers::reservations::update_reservation,
        handlers::reservations::cancel_reservation,
        handlers::reservations::get_reservation_history,
        handlers::reservations::download_reservation_pdf,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::User,
            models::auth::LoginPayload,
            models::auth::RefreshPayload,
            models::auth::ChangePasswordPayload,
            models::auth::AuthResponse,

            // --- Rooms ---
            models::venue::Room,
            models::venue::RoomAvailability,
            handlers::rooms::CreateRoomPayload,
            handlers::rooms::UpdateRoomPayload,

            // --- Customers ---
            models::customer::Customer,
            handlers::customers::CustomerPayload,

            // --- Reservations ---
            models::reservation::EventType,
            models::reservation::PricingMode,
            models::reservation::ReservationStatus,
            models::reservation::DepositStatus,
            models::reservation::HistoryChangeType,
            models::reservation::Reservation,
            models::reservation::ReservationDetail,
            models::reservation::ReservationHistoryEntry,
            handlers::reservations::CreateReservationPayload,
            handlers::reservations::UpdateReservationPayload,
            handlers::reservations::CancelReservationPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e sessão"),
        (name = "Users", description = "Dados do usuário autenticado"),
        (name = "Rooms", description = "Gestão dos salões de eventos"),
        (name = "Customers", description = "Gestão de clientes"),
        (name = "Reservations", description = "Ciclo de vida das reservas e histórico")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
