// src/db/room_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::venue::Room};

const ROOM_COLUMNS: &str = r#"
    id, name, description, max_capacity,
    price_per_person, total_price, is_active,
    created_at, updated_at
"#;

#[derive(Clone)]
pub struct RoomRepository {
    pool: PgPool,
}

impl RoomRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_active(&self) -> Result<Vec<Room>, AppError> {
        let rooms = sqlx::query_as::<_, Room>(&format!(
            "SELECT {ROOM_COLUMNS} FROM rooms WHERE is_active = TRUE ORDER BY name ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rooms)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Room>, AppError> {
        let room = sqlx::query_as::<_, Room>(&format!(
            "SELECT {ROOM_COLUMNS} FROM rooms WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(room)
    }

    pub async fn create(
        &self,
        name: &str,
        description: Option<&str>,
        max_capacity: i32,
        price_per_person: Decimal,
        total_price: Decimal,
    ) -> Result<Room, AppError> {
        let room = sqlx::query_as::<_, Room>(&format!(
            r#"
            INSERT INTO rooms (name, description, max_capacity, price_per_person, total_price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ROOM_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(description)
        .bind(max_capacity)
        .bind(price_per_person)
        .bind(total_price)
        .fetch_one(&self.pool)
        .await?;

        Ok(room)
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: &str,
        description: Option<&str>,
        max_capacity: i32,
        price_per_person: Decimal,
        total_price: Decimal,
        is_active: bool,
    ) -> Result<Option<Room>, AppError> {
        let room = sqlx::query_as::<_, Room>(&format!(
            r#"
            UPDATE rooms SET
                name = $1, description = $2, max_capacity = $3,
                price_per_person = $4, total_price = $5, is_active = $6,
                updated_at = NOW()
            WHERE id = $7
            RETURNING {ROOM_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(description)
        .bind(max_capacity)
        .bind(price_per_person)
        .bind(total_price)
        .bind(is_active)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(room)
    }

    /// Salões nunca são apagados, apenas desativados.
    pub async fn deactivate(&self, id: Uuid) -> Result<Option<Room>, AppError> {
        let room = sqlx::query_as::<_, Room>(&format!(
            r#"
            UPDATE rooms SET is_active = FALSE, updated_at = NOW()
            WHERE id = $1
            RETURNING {ROOM_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(room)
    }

    /// Quantas reservas ativas (pendente/confirmada/em andamento) seguram
    /// o salão na data informada.
    pub async fn count_active_reservations_on(
        &self,
        room_id: Uuid,
        event_date: NaiveDate,
    ) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM reservations
            WHERE room_id = $1
              AND event_date = $2
              AND status IN ('PENDING', 'CONFIRMED', 'IN_PROGRESS')
            "#,
        )
        .bind(room_id)
        .bind(event_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
