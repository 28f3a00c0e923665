// src/handlers/rooms.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError, config::AppState, middleware::auth::AuthenticatedUser,
    models::venue::Room,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomPayload {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres"))]
    #[schema(example = "Salão Cristal")]
    pub name: String,

    pub description: Option<String>,

    #[validate(range(min = 1, message = "A capacidade deve ser maior que zero"))]
    #[schema(example = 120)]
    pub max_capacity: i32,

    #[serde(default)]
    #[schema(example = "150.00")]
    pub price_per_person: Decimal,

    #[serde(default)]
    #[schema(example = "8000.00")]
    pub total_price: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoomPayload {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres"))]
    pub name: String,

    pub description: Option<String>,

    #[validate(range(min = 1, message = "A capacidade deve ser maior que zero"))]
    pub max_capacity: i32,

    pub price_per_person: Decimal,
    pub total_price: Decimal,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AvailabilityParams {
    /// Data do evento (YYYY-MM-DD)
    pub date: NaiveDate,
}

// GET /api/rooms
#[utoipa::path(
    get,
    path = "/api/rooms",
    tag = "Rooms",
    responses((status = 200, description = "Salões ativos", body = Vec<Room>)),
    security(("api_jwt" = []))
)]
pub async fn list_rooms(
    State(app_state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let rooms = app_state.room_service.list_active().await?;
    Ok((StatusCode::OK, Json(rooms)))
}

// GET /api/rooms/{id}
#[utoipa::path(
    get,
    path = "/api/rooms/{id}",
    tag = "Rooms",
    params(("id" = Uuid, Path, description = "ID do salão")),
    responses(
        (status = 200, description = "Salão", body = Room),
        (status = 404, description = "Salão não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_room(
    State(app_state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let room = app_state.room_service.get(id).await?;
    Ok((StatusCode::OK, Json(room)))
}

// GET /api/rooms/{id}/availability?date=YYYY-MM-DD
#[utoipa::path(
    get,
    path = "/api/rooms/{id}/availability",
    tag = "Rooms",
    params(
        ("id" = Uuid, Path, description = "ID do salão"),
        AvailabilityParams
    ),
    responses((status = 200, description = "Disponibilidade na data", body = crate::models::venue::RoomAvailability)),
    security(("api_jwt" = []))
)]
pub async fn check_availability(
    State(app_state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Query(params): Query<AvailabilityParams>,
) -> Result<impl IntoResponse, AppError> {
    let availability = app_state
        .room_service
        .check_availability(id, params.date)
        .await?;
    Ok((StatusCode::OK, Json(availability)))
}

// POST /api/rooms
#[utoipa::path(
    post,
    path = "/api/rooms",
    tag = "Rooms",
    request_body = CreateRoomPayload,
    responses((status = 201, description = "Salão criado", body = Room)),
    security(("api_jwt" = []))
)]
pub async fn create_room(
    State(app_state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Json(payload): Json<CreateRoomPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let room = app_state
        .room_service
        .create(
            &payload.name,
            payload.description.as_deref(),
            payload.max_capacity,
            payload.price_per_person,
            payload.total_price,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(room)))
}

// PUT /api/rooms/{id}
#[utoipa::path(
    put,
    path = "/api/rooms/{id}",
    tag = "Rooms",
    params(("id" = Uuid, Path, description = "ID do salão")),
    request_body = UpdateRoomPayload,
    responses(
        (status = 200, description = "Salão atualizado", body = Room),
        (status = 404, description = "Salão não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_room(
    State(app_state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRoomPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let room = app_state
        .room_service
        .update(
            id,
            &payload.name,
            payload.description.as_deref(),
            payload.max_capacity,
            payload.price_per_person,
            payload.total_price,
            payload.is_active,
        )
        .await?;

    Ok((StatusCode::OK, Json(room)))
}

// DELETE /api/rooms/{id}
// Salões nunca são apagados fisicamente: o DELETE desativa.
#[utoipa::path(
    delete,
    path = "/api/rooms/{id}",
    tag = "Rooms",
    params(("id" = Uuid, Path, description = "ID do salão")),
    responses(
        (status = 200, description = "Salão desativado", body = Room),
        (status = 404, description = "Salão não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn deactivate_room(
    State(app_state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let room = app_state.room_service.deactivate(id).await?;
    Ok((StatusCode::OK, Json(room)))
}
