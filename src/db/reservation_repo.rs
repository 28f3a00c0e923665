// src/db/reservation_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        customer::Customer,
        reservation::{Reservation, ReservationHistoryEntry},
        venue::Room,
    },
};

/// Fronteira de armazenamento do ciclo de vida da reserva.
///
/// O serviço recebe esse contrato injetado em vez de um handle global de
/// banco: os testes substituem por uma implementação em memória.
///
/// Garantias exigidas da implementação:
/// - a escrita da reserva e o append do histórico são atômicos (uma transação);
/// - o histórico é append-only: nunca editado nem removido;
/// - `update_reservation` só aplica se a versão esperada ainda for a corrente.
#[async_trait]
pub trait ReservationStore: Send + Sync {
    async fn find_room(&self, id: Uuid) -> Result<Option<Room>, AppError>;

    async fn find_customer(&self, id: Uuid) -> Result<Option<Customer>, AppError>;

    async fn find_reservation(&self, id: Uuid) -> Result<Option<Reservation>, AppError>;

    async fn reservation_number_exists(&self, number: &str) -> Result<bool, AppError>;

    async fn insert_reservation(
        &self,
        reservation: &Reservation,
        entry: &ReservationHistoryEntry,
    ) -> Result<(), AppError>;

    /// `expected_version` é a versão lida antes da mutação; `reservation`
    /// já chega com a versão incrementada.
    async fn update_reservation(
        &self,
        reservation: &Reservation,
        expected_version: i32,
        entry: &ReservationHistoryEntry,
    ) -> Result<(), AppError>;

    /// Mais recente primeiro, sequência completa (sem paginação no núcleo).
    async fn list_history(
        &self,
        reservation_id: Uuid,
    ) -> Result<Vec<ReservationHistoryEntry>, AppError>;
}

// --- Implementação Postgres ---

#[derive(Clone)]
pub struct PgReservationStore {
    pool: PgPool,
}

impl PgReservationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn append_history<'c>(
        tx: &mut sqlx::Transaction<'c, sqlx::Postgres>,
        entry: &ReservationHistoryEntry,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO reservation_history (
                id, reservation_id, change_type, changed_by,
                reason, previous_value, new_value, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(entry.id)
        .bind(entry.reservation_id)
        .bind(entry.change_type)
        .bind(entry.changed_by)
        .bind(&entry.reason)
        .bind(&entry.previous_value)
        .bind(&entry.new_value)
        .bind(entry.created_at)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl ReservationStore for PgReservationStore {
    async fn find_room(&self, id: Uuid) -> Result<Option<Room>, AppError> {
        let room = sqlx::query_as::<_, Room>(
            r#"
            SELECT id, name, description, max_capacity,
                   price_per_person, total_price, is_active,
                   created_at, updated_at
            FROM rooms
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(room)
    }

    async fn find_customer(&self, id: Uuid) -> Result<Option<Customer>, AppError> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, first_name, last_name, phone, email,
                   company, tax_id, address, city, postal_code,
                   notes, created_by, created_at, updated_at
            FROM customers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    async fn find_reservation(&self, id: Uuid) -> Result<Option<Reservation>, AppError> {
        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            SELECT id, reservation_number, customer_id, room_id,
                   event_type, event_date, start_time, duration_hours,
                   number_of_guests, pricing_mode, price_per_person, total_price,
                   final_amount, deposit_required, deposit_amount, deposit_due_date,
                   deposit_status, status, notes, special_requests,
                   auto_generated_notes, cancellation_reason, cancelled_at,
                   created_by, version, created_at, updated_at
            FROM reservations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(reservation)
    }

    async fn reservation_number_exists(&self, number: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM reservations WHERE reservation_number = $1)",
        )
        .bind(number)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn insert_reservation(
        &self,
        reservation: &Reservation,
        entry: &ReservationHistoryEntry,
    ) -> Result<(), AppError> {
        // Reserva + entrada "CREATED" na mesma transação: ou os dois
        // aparecem, ou nenhum. Rollback automático no drop em caso de erro.
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO reservations (
                id, reservation_number, customer_id, room_id,
                event_type, event_date, start_time, duration_hours,
                number_of_guests, pricing_mode, price_per_person, total_price,
                final_amount, deposit_required, deposit_amount, deposit_due_date,
                deposit_status, status, notes, special_requests,
                auto_generated_notes, cancellation_reason, cancelled_at,
                created_by, version, created_at, updated_at
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27
            )
            "#,
        )
        .bind(reservation.id)
        .bind(&reservation.reservation_number)
        .bind(reservation.customer_id)
        .bind(reservation.room_id)
        .bind(reservation.event_type)
        .bind(reservation.event_date)
        .bind(reservation.start_time)
        .bind(reservation.duration_hours)
        .bind(reservation.number_of_guests)
        .bind(reservation.pricing_mode)
        .bind(reservation.price_per_person)
        .bind(reservation.total_price)
        .bind(reservation.final_amount)
        .bind(reservation.deposit_required)
        .bind(reservation.deposit_amount)
        .bind(reservation.deposit_due_date)
        .bind(reservation.deposit_status)
        .bind(reservation.status)
        .bind(&reservation.notes)
        .bind(&reservation.special_requests)
        .bind(&reservation.auto_generated_notes)
        .bind(&reservation.cancellation_reason)
        .bind(reservation.cancelled_at)
        .bind(reservation.created_by)
        .bind(reservation.version)
        .bind(reservation.created_at)
        .bind(reservation.updated_at)
        .execute(&mut *tx)
        .await?;

        Self::append_history(&mut tx, entry).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn update_reservation(
        &self,
        reservation: &Reservation,
        expected_version: i32,
        entry: &ReservationHistoryEntry,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        // Trava otimista: a linha só é alterada se ninguém escreveu depois
        // da leitura que originou esta mutação.
        let result = sqlx::query(
            r#"
            UPDATE reservations SET
                customer_id = $1, room_id = $2,
                event_type = $3, event_date = $4, start_time = $5,
                duration_hours = $6, number_of_guests = $7,
                pricing_mode = $8, price_per_person = $9, total_price = $10,
                final_amount = $11,
                deposit_required = $12, deposit_amount = $13,
                deposit_due_date = $14, deposit_status = $15,
                status = $16, notes = $17, special_requests = $18,
                auto_generated_notes = $19,
                cancellation_reason = $20, cancelled_at = $21,
                version = $22, updated_at = $23
            WHERE id = $24 AND version = $25
            "#,
        )
        .bind(reservation.customer_id)
        .bind(reservation.room_id)
        .bind(reservation.event_type)
        .bind(reservation.event_date)
        .bind(reservation.start_time)
        .bind(reservation.duration_hours)
        .bind(reservation.number_of_guests)
        .bind(reservation.pricing_mode)
        .bind(reservation.price_per_person)
        .bind(reservation.total_price)
        .bind(reservation.final_amount)
        .bind(reservation.deposit_required)
        .bind(reservation.deposit_amount)
        .bind(reservation.deposit_due_date)
        .bind(reservation.deposit_status)
        .bind(reservation.status)
        .bind(&reservation.notes)
        .bind(&reservation.special_requests)
        .bind(&reservation.auto_generated_notes)
        .bind(&reservation.cancellation_reason)
        .bind(reservation.cancelled_at)
        .bind(reservation.version)
        .bind(reservation.updated_at)
        .bind(reservation.id)
        .bind(expected_version)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            // A existência foi conferida pelo serviço: sobrou conflito de versão
            return Err(AppError::ConcurrentModification);
        }

        Self::append_history(&mut tx, entry).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn list_history(
        &self,
        reservation_id: Uuid,
    ) -> Result<Vec<ReservationHistoryEntry>, AppError> {
        let entries = sqlx::query_as::<_, ReservationHistoryEntry>(
            r#"
            SELECT id, reservation_id, change_type, changed_by,
                   reason, previous_value, new_value, created_at
            FROM reservation_history
            WHERE reservation_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(reservation_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
