// src/models/customer.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Contato responsável pela reserva. Referenciado pelas reservas;
// por convenção não é apagado depois que possui reservas.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,

    #[schema(example = "Maria")]
    pub first_name: String,
    #[schema(example = "Kowalska")]
    pub last_name: String,

    // Telefone é o único contato obrigatório
    #[schema(example = "+48601234567")]
    pub phone: String,
    #[schema(example = "maria@email.com")]
    pub email: Option<String>,

    pub company: Option<String>,
    pub tax_id: Option<String>,

    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,

    pub notes: Option<String>,

    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
