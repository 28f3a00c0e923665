// src/handlers/customers.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError, config::AppState, middleware::auth::AuthenticatedUser,
    models::customer::Customer,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPayload {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres"))]
    #[schema(example = "Maria")]
    pub first_name: String,

    #[validate(length(min = 2, message = "O sobrenome deve ter no mínimo 2 caracteres"))]
    #[schema(example = "Kowalska")]
    pub last_name: String,

    // Telefone é o único contato obrigatório
    #[validate(length(min = 9, message = "Telefone inválido"))]
    #[schema(example = "+48601234567")]
    pub phone: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    pub company: Option<String>,
    pub tax_id: Option<String>,

    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,

    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchParams {
    /// Trecho de nome, telefone ou e-mail
    pub q: Option<String>,
}

// GET /api/customers
#[utoipa::path(
    get,
    path = "/api/customers",
    tag = "Customers",
    params(SearchParams),
    responses((status = 200, description = "Clientes encontrados", body = Vec<Customer>)),
    security(("api_jwt" = []))
)]
pub async fn list_customers(
    State(app_state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, AppError> {
    let customers = app_state
        .customer_service
        .search(params.q.as_deref())
        .await?;
    Ok((StatusCode::OK, Json(customers)))
}

// GET /api/customers/{id}
#[utoipa::path(
    get,
    path = "/api/customers/{id}",
    tag = "Customers",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente", body = Customer),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_customer(
    State(app_state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let customer = app_state.customer_service.get(id).await?;
    Ok((StatusCode::OK, Json(customer)))
}

// POST /api/customers
#[utoipa::path(
    post,
    path = "/api/customers",
    tag = "Customers",
    request_body = CustomerPayload,
    responses((status = 201, description = "Cliente criado", body = Customer)),
    security(("api_jwt" = []))
)]
pub async fn create_customer(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CustomerPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let customer = app_state
        .customer_service
        .create(
            &payload.first_name,
            &payload.last_name,
            &payload.phone,
            payload.email.as_deref(),
            payload.company.as_deref(),
            payload.tax_id.as_deref(),
            payload.address.as_deref(),
            payload.city.as_deref(),
            payload.postal_code.as_deref(),
            payload.notes.as_deref(),
            user.id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(customer)))
}

// PUT /api/customers/{id}
#[utoipa::path(
    put,
    path = "/api/customers/{id}",
    tag = "Customers",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    request_body = CustomerPayload,
    responses(
        (status = 200, description = "Cliente atualizado", body = Customer),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_customer(
    State(app_state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CustomerPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let customer = app_state
        .customer_service
        .update(
            id,
            &payload.first_name,
            &payload.last_name,
            &payload.phone,
            payload.email.as_deref(),
            payload.company.as_deref(),
            payload.tax_id.as_deref(),
            payload.address.as_deref(),
            payload.city.as_deref(),
            payload.postal_code.as_deref(),
            payload.notes.as_deref(),
        )
        .await?;

    Ok((StatusCode::OK, Json(customer)))
}
