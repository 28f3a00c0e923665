// src/services/reservation_service.rs
//
// Orquestra o ciclo de vida da reserva: criação, atualização e cancelamento.
// Invoca as regras de validação e o cálculo de preço, e registra cada
// transição no histórico — sempre na mesma transação da escrita da reserva.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ReservationStore,
    models::reservation::{
        DepositStatus, EventType, HistoryChangeType, PricingMode, Reservation, ReservationDetail,
        ReservationHistoryEntry, ReservationStatus,
    },
    services::{booking_rules, pricing},
};

// Tentativas de gerar um número de reserva que ainda não exista.
// O sufixo é aleatório; a unicidade vem da conferência + índice único.
const MAX_NUMBER_ATTEMPTS: u32 = 5;

pub struct CreateReservationInput {
    pub customer_id: Uuid,
    pub room_id: Uuid,
    pub event_type: EventType,
    pub event_date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_hours: i32,
    pub number_of_guests: i32,
    pub pricing_mode: PricingMode,
    pub price_per_person: Option<Decimal>,
    pub total_price: Option<Decimal>,
    pub deposit_required: bool,
    pub deposit_amount: Option<Decimal>,
    pub deposit_due_date: Option<NaiveDate>,
    // Pendente ou confirmada, escolha de quem cria (não é computado)
    pub status: Option<ReservationStatus>,
    pub notes: Option<String>,
    pub special_requests: Option<String>,
}

// Atualização parcial: campo ausente mantém o valor atual.
#[derive(Default)]
pub struct UpdateReservationInput {
    pub customer_id: Option<Uuid>,
    pub room_id: Option<Uuid>,
    pub event_type: Option<EventType>,
    pub event_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub duration_hours: Option<i32>,
    pub number_of_guests: Option<i32>,
    pub pricing_mode: Option<PricingMode>,
    pub price_per_person: Option<Decimal>,
    pub total_price: Option<Decimal>,
    pub deposit_required: Option<bool>,
    pub deposit_amount: Option<Decimal>,
    pub deposit_due_date: Option<NaiveDate>,
    pub deposit_status: Option<DepositStatus>,
    pub status: Option<ReservationStatus>,
    pub notes: Option<String>,
    pub special_requests: Option<String>,
}

#[derive(Clone)]
pub struct ReservationService {
    store: Arc<dyn ReservationStore>,
}

impl ReservationService {
    pub fn new(store: Arc<dyn ReservationStore>) -> Self {
        Self { store }
    }

    // =========================================================================
    //  CRIAÇÃO
    // =========================================================================

    pub async fn create(
        &self,
        actor_id: Uuid,
        input: CreateReservationInput,
    ) -> Result<ReservationDetail, AppError> {
        let status = input.status.unwrap_or(ReservationStatus::Pending);
        if !matches!(
            status,
            ReservationStatus::Pending | ReservationStatus::Confirmed
        ) {
            return Err(AppError::InvalidInitialStatus);
        }

        let room = self
            .store
            .find_room(input.room_id)
            .await?
            .ok_or(AppError::RoomNotFound)?;
        if !room.is_active {
            return Err(AppError::RoomInactive);
        }

        let customer = self
            .store
            .find_customer(input.customer_id)
            .await?
            .ok_or(AppError::CustomerNotFound)?;

        // Todas as regras rodam antes de qualquer escrita
        booking_rules::check_capacity(input.number_of_guests, &room)?;
        booking_rules::check_pricing_fields(
            input.pricing_mode,
            input.price_per_person,
            input.total_price,
        )?;
        booking_rules::check_deposit_fields(
            input.deposit_required,
            input.deposit_amount,
            input.deposit_due_date,
        )?;
        if input.deposit_required {
            if let Some(due) = input.deposit_due_date {
                booking_rules::check_deposit_due_date(due, input.event_date)?;
            }
        }

        let reservation_number = self.generate_reservation_number().await?;

        let final_amount = pricing::calculate_final_amount(
            input.pricing_mode,
            input.number_of_guests,
            input.price_per_person,
            input.total_price,
        );

        let now = Utc::now();
        let reservation = Reservation {
            id: Uuid::new_v4(),
            reservation_number,
            customer_id: customer.id,
            room_id: room.id,
            event_type: input.event_type,
            event_date: input.event_date,
            start_time: input.start_time,
            duration_hours: input.duration_hours,
            number_of_guests: input.number_of_guests,
            pricing_mode: input.pricing_mode,
            price_per_person: input.price_per_person,
            total_price: input.total_price,
            final_amount,
            deposit_required: input.deposit_required,
            deposit_amount: input.deposit_amount,
            deposit_due_date: input.deposit_due_date,
            deposit_status: if input.deposit_required {
                DepositStatus::Pending
            } else {
                DepositStatus::NotRequired
            },
            status,
            notes: input.notes,
            special_requests: input.special_requests,
            auto_generated_notes: pricing::extra_hours_note(input.duration_hours),
            cancellation_reason: None,
            cancelled_at: None,
            created_by: actor_id,
            version: 1,
            created_at: now,
            updated_at: now,
        };

        let entry = Self::history_entry(
            &reservation,
            HistoryChangeType::Created,
            actor_id,
            None,
            None,
        )?;

        self.store.insert_reservation(&reservation, &entry).await?;

        tracing::info!(
            "Reserva {} criada para {} convidados",
            reservation.reservation_number,
            reservation.number_of_guests
        );

        Ok(ReservationDetail {
            reservation,
            customer,
            room,
        })
    }

    // =========================================================================
    //  ATUALIZAÇÃO
    // =========================================================================

    pub async fn update(
        &self,
        id: Uuid,
        actor_id: Uuid,
        reason: &str,
        input: UpdateReservationInput,
    ) -> Result<ReservationDetail, AppError> {
        if reason.trim().is_empty() {
            return Err(AppError::MissingReason);
        }

        let existing = self
            .store
            .find_reservation(id)
            .await?
            .ok_or(AppError::ReservationNotFound)?;

        // Cancelada é terminal: não aceita mais mutação de ciclo de vida
        if existing.status == ReservationStatus::Cancelled {
            return Err(AppError::ReservationCancelled);
        }
        // Cancelar é uma operação própria, com seus efeitos e histórico
        if input.status == Some(ReservationStatus::Cancelled) {
            return Err(AppError::CancellationViaUpdate);
        }

        let guests_changed = input.number_of_guests.is_some();
        let room_changed = input.room_id.is_some_and(|r| r != existing.room_id);
        let customer_changed = input.customer_id.is_some_and(|c| c != existing.customer_id);
        let duration_changed = input.duration_hours.is_some();
        let amount_inputs_changed = guests_changed
            || input.pricing_mode.is_some()
            || input.price_per_person.is_some()
            || input.total_price.is_some();

        if customer_changed {
            self.store
                .find_customer(input.customer_id.unwrap())
                .await?
                .ok_or(AppError::CustomerNotFound)?;
        }

        let mut updated = existing.clone();
        if let Some(v) = input.customer_id {
            updated.customer_id = v;
        }
        if let Some(v) = input.room_id {
            updated.room_id = v;
        }
        if let Some(v) = input.event_type {
            updated.event_type = v;
        }
        if let Some(v) = input.event_date {
            updated.event_date = v;
        }
        if let Some(v) = input.start_time {
            updated.start_time = v;
        }
        if let Some(v) = input.duration_hours {
            updated.duration_hours = v;
        }
        if let Some(v) = input.number_of_guests {
            updated.number_of_guests = v;
        }
        if let Some(v) = input.pricing_mode {
            updated.pricing_mode = v;
        }
        if let Some(v) = input.price_per_person {
            updated.price_per_person = Some(v);
        }
        if let Some(v) = input.total_price {
            updated.total_price = Some(v);
        }
        if let Some(v) = input.deposit_required {
            updated.deposit_required = v;
        }
        if let Some(v) = input.deposit_amount {
            updated.deposit_amount = Some(v);
        }
        if let Some(v) = input.deposit_due_date {
            updated.deposit_due_date = Some(v);
        }
        if let Some(v) = input.status {
            updated.status = v;
        }
        if let Some(v) = input.notes {
            updated.notes = Some(v);
        }
        if let Some(v) = input.special_requests {
            updated.special_requests = Some(v);
        }

        // Capacidade é sempre reconferida quando convidados ou salão mudam,
        // contra o salão efetivo da reserva
        if guests_changed || room_changed {
            let room = self
                .store
                .find_room(updated.room_id)
                .await?
                .ok_or(AppError::RoomNotFound)?;
            if room_changed && !room.is_active {
                return Err(AppError::RoomInactive);
            }
            booking_rules::check_capacity(updated.number_of_guests, &room)?;
        }

        booking_rules::check_pricing_fields(
            updated.pricing_mode,
            updated.price_per_person,
            updated.total_price,
        )?;
        booking_rules::check_deposit_fields(
            updated.deposit_required,
            updated.deposit_amount,
            updated.deposit_due_date,
        )?;
        if updated.deposit_required {
            if let Some(due) = updated.deposit_due_date {
                booking_rules::check_deposit_due_date(due, updated.event_date)?;
            }
        }

        if amount_inputs_changed {
            updated.final_amount = pricing::calculate_final_amount(
                updated.pricing_mode,
                updated.number_of_guests,
                updated.price_per_person,
                updated.total_price,
            );
        }
        if duration_changed {
            // Nota do sistema: sobrescreve a anterior
            updated.auto_generated_notes = pricing::extra_hours_note(updated.duration_hours);
        }

        // Normaliza o status do sinal conforme a exigência efetiva
        if !updated.deposit_required {
            updated.deposit_status = DepositStatus::NotRequired;
        } else if let Some(v) = input.deposit_status {
            updated.deposit_status = v;
        } else if updated.deposit_status == DepositStatus::NotRequired {
            updated.deposit_status = DepositStatus::Pending;
        }

        updated.version = existing.version + 1;
        updated.updated_at = Utc::now();

        let entry = Self::history_entry(
            &updated,
            HistoryChangeType::Updated,
            actor_id,
            Some(reason.to_string()),
            Some(&existing),
        )?;

        self.store
            .update_reservation(&updated, existing.version, &entry)
            .await?;

        self.resolve(updated).await
    }

    // =========================================================================
    //  CANCELAMENTO
    // =========================================================================

    pub async fn cancel(
        &self,
        id: Uuid,
        actor_id: Uuid,
        reason: &str,
    ) -> Result<ReservationDetail, AppError> {
        if reason.trim().is_empty() {
            return Err(AppError::MissingReason);
        }

        let existing = self
            .store
            .find_reservation(id)
            .await?
            .ok_or(AppError::ReservationNotFound)?;

        match existing.status {
            ReservationStatus::Cancelled => return Err(AppError::ReservationCancelled),
            ReservationStatus::Completed => return Err(AppError::ReservationCompleted),
            _ => {}
        }

        let now = Utc::now();
        let mut updated = existing.clone();
        updated.status = ReservationStatus::Cancelled;
        updated.cancellation_reason = Some(reason.to_string());
        updated.cancelled_at = Some(now);
        updated.version = existing.version + 1;
        updated.updated_at = now;

        let entry = Self::history_entry(
            &updated,
            HistoryChangeType::Cancelled,
            actor_id,
            Some(reason.to_string()),
            Some(&existing),
        )?;

        self.store
            .update_reservation(&updated, existing.version, &entry)
            .await?;

        tracing::info!("Reserva {} cancelada", updated.reservation_number);

        self.resolve(updated).await
    }

    // =========================================================================
    //  CONSULTAS
    // =========================================================================

    pub async fn get(&self, id: Uuid) -> Result<ReservationDetail, AppError> {
        let reservation = self
            .store
            .find_reservation(id)
            .await?
            .ok_or(AppError::ReservationNotFound)?;
        self.resolve(reservation).await
    }

    pub async fn history(&self, id: Uuid) -> Result<Vec<ReservationHistoryEntry>, AppError> {
        self.store
            .find_reservation(id)
            .await?
            .ok_or(AppError::ReservationNotFound)?;
        self.store.list_history(id).await
    }

    // =========================================================================
    //  INTERNOS
    // =========================================================================

    async fn resolve(&self, reservation: Reservation) -> Result<ReservationDetail, AppError> {
        let customer = self
            .store
            .find_customer(reservation.customer_id)
            .await?
            .ok_or(AppError::CustomerNotFound)?;
        let room = self
            .store
            .find_room(reservation.room_id)
            .await?
            .ok_or(AppError::RoomNotFound)?;

        Ok(ReservationDetail {
            reservation,
            customer,
            room,
        })
    }

    /// RES-YYYYMMDD-NNNN. O sufixo é sorteado e conferido contra o banco;
    /// esgotadas as tentativas, a operação falha em vez de duplicar.
    async fn generate_reservation_number(&self) -> Result<String, AppError> {
        let date_segment = Utc::now().format("%Y%m%d");

        for _ in 0..MAX_NUMBER_ATTEMPTS {
            let suffix: u32 = rand::thread_rng().gen_range(0..10_000);
            let candidate = format!("RES-{date_segment}-{suffix:04}");

            if !self.store.reservation_number_exists(&candidate).await? {
                return Ok(candidate);
            }
        }

        Err(AppError::ReservationNumberExhausted)
    }

    fn history_entry(
        new_state: &Reservation,
        change_type: HistoryChangeType,
        actor_id: Uuid,
        reason: Option<String>,
        previous: Option<&Reservation>,
    ) -> Result<ReservationHistoryEntry, AppError> {
        // Snapshots são blobs campo -> valor, não um diff tipado
        let previous_value = previous
            .map(serde_json::to_value)
            .transpose()
            .map_err(anyhow::Error::from)?;
        let new_value = serde_json::to_value(new_state).map_err(anyhow::Error::from)?;

        Ok(ReservationHistoryEntry {
            id: Uuid::new_v4(),
            reservation_id: new_state.id,
            change_type,
            changed_by: actor_id,
            reason,
            previous_value,
            new_value,
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::DateTime;

    use super::*;
    use crate::models::{customer::Customer, venue::Room};

    // Implementação em memória do contrato de armazenamento, com as mesmas
    // garantias: escrita + histórico juntos, trava de versão, append-only.
    #[derive(Default)]
    struct MemStore {
        inner: Mutex<MemState>,
    }

    #[derive(Default)]
    struct MemState {
        rooms: HashMap<Uuid, Room>,
        customers: HashMap<Uuid, Customer>,
        reservations: HashMap<Uuid, Reservation>,
        history: Vec<ReservationHistoryEntry>,
    }

    #[async_trait]
    impl ReservationStore for MemStore {
        async fn find_room(&self, id: Uuid) -> Result<Option<Room>, AppError> {
            Ok(self.inner.lock().unwrap().rooms.get(&id).cloned())
        }

        async fn find_customer(&self, id: Uuid) -> Result<Option<Customer>, AppError> {
            Ok(self.inner.lock().unwrap().customers.get(&id).cloned())
        }

        async fn find_reservation(&self, id: Uuid) -> Result<Option<Reservation>, AppError> {
            Ok(self.inner.lock().unwrap().reservations.get(&id).cloned())
        }

        async fn reservation_number_exists(&self, number: &str) -> Result<bool, AppError> {
            Ok(self
                .inner
                .lock()
                .unwrap()
                .reservations
                .values()
                .any(|r| r.reservation_number == number))
        }

        async fn insert_reservation(
            &self,
            reservation: &Reservation,
            entry: &ReservationHistoryEntry,
        ) -> Result<(), AppError> {
            let mut state = self.inner.lock().unwrap();
            state
                .reservations
                .insert(reservation.id, reservation.clone());
            state.history.push(entry.clone());
            Ok(())
        }

        async fn update_reservation(
            &self,
            reservation: &Reservation,
            expected_version: i32,
            entry: &ReservationHistoryEntry,
        ) -> Result<(), AppError> {
            let mut state = self.inner.lock().unwrap();
            let current = state
                .reservations
                .get(&reservation.id)
                .ok_or(AppError::ReservationNotFound)?;
            if current.version != expected_version {
                return Err(AppError::ConcurrentModification);
            }
            state
                .reservations
                .insert(reservation.id, reservation.clone());
            state.history.push(entry.clone());
            Ok(())
        }

        async fn list_history(
            &self,
            reservation_id: Uuid,
        ) -> Result<Vec<ReservationHistoryEntry>, AppError> {
            let state = self.inner.lock().unwrap();
            let mut entries: Vec<_> = state
                .history
                .iter()
                .filter(|e| e.reservation_id == reservation_id)
                .cloned()
                .collect();
            entries.reverse(); // mais recente primeiro
            Ok(entries)
        }
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    struct Fixture {
        service: ReservationService,
        store: Arc<MemStore>,
        room_id: Uuid,
        customer_id: Uuid,
        actor_id: Uuid,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemStore::default());
        let room_id = Uuid::new_v4();
        let customer_id = Uuid::new_v4();
        let epoch = DateTime::UNIX_EPOCH;

        {
            let mut state = store.inner.lock().unwrap();
            state.rooms.insert(
                room_id,
                Room {
                    id: room_id,
                    name: "Salão Cristal".to_string(),
                    description: None,
                    max_capacity: 40,
                    price_per_person: dec("150.00"),
                    total_price: dec("8000.00"),
                    is_active: true,
                    created_at: epoch,
                    updated_at: epoch,
                },
            );
            state.customers.insert(
                customer_id,
                Customer {
                    id: customer_id,
                    first_name: "Maria".to_string(),
                    last_name: "Kowalska".to_string(),
                    phone: "+48601234567".to_string(),
                    email: None,
                    company: None,
                    tax_id: None,
                    address: None,
                    city: None,
                    postal_code: None,
                    notes: None,
                    created_by: Uuid::new_v4(),
                    created_at: epoch,
                    updated_at: epoch,
                },
            );
        }

        Fixture {
            service: ReservationService::new(store.clone()),
            store,
            room_id,
            customer_id,
            actor_id: Uuid::new_v4(),
        }
    }

    fn base_input(f: &Fixture) -> CreateReservationInput {
        CreateReservationInput {
            customer_id: f.customer_id,
            room_id: f.room_id,
            event_type: EventType::Wedding,
            event_date: date("2026-03-15"),
            start_time: "18:00:00".parse().unwrap(),
            duration_hours: 6,
            number_of_guests: 38,
            pricing_mode: PricingMode::PerPerson,
            price_per_person: Some(dec("150.00")),
            total_price: None,
            deposit_required: false,
            deposit_amount: None,
            deposit_due_date: None,
            status: None,
            notes: None,
            special_requests: None,
        }
    }

    #[tokio::test]
    async fn test_create_computes_amount_and_logs_history() {
        let f = fixture();
        let detail = f.service.create(f.actor_id, base_input(&f)).await.unwrap();
        let res = &detail.reservation;

        assert_eq!(res.final_amount, dec("5700.00"));
        assert_eq!(res.status, ReservationStatus::Pending);
        assert_eq!(res.deposit_status, DepositStatus::NotRequired);
        assert_eq!(res.auto_generated_notes, None);
        assert_eq!(res.version, 1);

        let history = f.service.history(res.id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].change_type, HistoryChangeType::Created);
        assert_eq!(history[0].previous_value, None);
        // O snapshot novo espelha exatamente o estado devolvido
        assert_eq!(history[0].new_value, serde_json::to_value(res).unwrap());
    }

    #[tokio::test]
    async fn test_reservation_number_format() {
        let f = fixture();
        let detail = f.service.create(f.actor_id, base_input(&f)).await.unwrap();
        let number = &detail.reservation.reservation_number;

        assert!(number.starts_with("RES-"));
        let parts: Vec<&str> = number.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[1].len(), 8);
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), 4);
        assert!(parts[2].chars().all(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn test_create_rejects_capacity_exceeded_without_writes() {
        let f = fixture();
        let mut input = base_input(&f);
        input.number_of_guests = 41;

        match f.service.create(f.actor_id, input).await {
            Err(AppError::CapacityExceeded(max)) => assert_eq!(max, 40),
            other => panic!("esperava CapacityExceeded, veio {other:?}"),
        }

        let state = f.store.inner.lock().unwrap();
        assert!(state.reservations.is_empty());
        assert!(state.history.is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_inactive_room() {
        let f = fixture();
        f.store
            .inner
            .lock()
            .unwrap()
            .rooms
            .get_mut(&f.room_id)
            .unwrap()
            .is_active = false;

        assert!(matches!(
            f.service.create(f.actor_id, base_input(&f)).await,
            Err(AppError::RoomInactive)
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_mismatched_pricing() {
        let f = fixture();
        let mut input = base_input(&f);
        input.price_per_person = None; // modo por pessoa sem preço unitário

        assert!(matches!(
            f.service.create(f.actor_id, input).await,
            Err(AppError::InvalidPricingInput)
        ));
    }

    #[tokio::test]
    async fn test_deposit_due_date_boundary() {
        let f = fixture();

        // Véspera do evento: aceita
        let mut input = base_input(&f);
        input.deposit_required = true;
        input.deposit_amount = Some(dec("1000.00"));
        input.deposit_due_date = Some(date("2026-03-14"));
        let detail = f.service.create(f.actor_id, input).await.unwrap();
        assert_eq!(detail.reservation.deposit_status, DepositStatus::Pending);

        // Dia do evento: rejeita
        let mut input = base_input(&f);
        input.deposit_required = true;
        input.deposit_amount = Some(dec("1000.00"));
        input.deposit_due_date = Some(date("2026-03-15"));
        assert!(matches!(
            f.service.create(f.actor_id, input).await,
            Err(AppError::InvalidDepositTiming)
        ));
    }

    #[tokio::test]
    async fn test_update_duration_rewrites_auto_note() {
        let f = fixture();
        let created = f.service.create(f.actor_id, base_input(&f)).await.unwrap();
        let id = created.reservation.id;

        let input = UpdateReservationInput {
            duration_hours: Some(9),
            ..Default::default()
        };
        let updated = f
            .service
            .update(id, f.actor_id, "cliente pediu mais horas", input)
            .await
            .unwrap();

        assert_eq!(
            updated.reservation.auto_generated_notes.as_deref(),
            Some("Additional billable hours: 3 (beyond the standard 6h)")
        );
        // Nada além de duração e nota mudou no snapshot
        assert_eq!(updated.reservation.final_amount, dec("5700.00"));
        assert_eq!(updated.reservation.version, 2);

        let history = f.service.history(id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].change_type, HistoryChangeType::Updated);
        assert_eq!(
            history[0].reason.as_deref(),
            Some("cliente pediu mais horas")
        );

        let prior = history[0].previous_value.as_ref().unwrap();
        assert_eq!(prior["durationHours"], 6);
        assert_eq!(history[0].new_value["durationHours"], 9);
    }

    #[tokio::test]
    async fn test_update_guests_recomputes_amount_and_checks_capacity() {
        let f = fixture();
        let created = f.service.create(f.actor_id, base_input(&f)).await.unwrap();
        let id = created.reservation.id;

        let input = UpdateReservationInput {
            number_of_guests: Some(40),
            ..Default::default()
        };
        let updated = f
            .service
            .update(id, f.actor_id, "mais convidados", input)
            .await
            .unwrap();
        assert_eq!(updated.reservation.final_amount, dec("6000.00"));

        // Acima da capacidade: rejeita mesmo sem trocar o salão
        let input = UpdateReservationInput {
            number_of_guests: Some(41),
            ..Default::default()
        };
        assert!(matches!(
            f.service.update(id, f.actor_id, "mais ainda", input).await,
            Err(AppError::CapacityExceeded(40))
        ));
    }

    #[tokio::test]
    async fn test_update_event_date_revalidates_deposit_timing() {
        let f = fixture();
        let mut input = base_input(&f);
        input.deposit_required = true;
        input.deposit_amount = Some(dec("1000.00"));
        input.deposit_due_date = Some(date("2026-03-14"));
        let created = f.service.create(f.actor_id, input).await.unwrap();
        let id = created.reservation.id;

        // Antecipar o evento para o dia do vencimento quebra a regra do sinal
        let input = UpdateReservationInput {
            event_date: Some(date("2026-03-14")),
            ..Default::default()
        };
        assert!(matches!(
            f.service.update(id, f.actor_id, "antecipar", input).await,
            Err(AppError::InvalidDepositTiming)
        ));

        // A rejeição não grava nada: só a entrada de criação existe
        let history = f.service.history(id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].change_type, HistoryChangeType::Created);
        let current = f.service.get(id).await.unwrap();
        assert_eq!(current.reservation.event_date, date("2026-03-15"));
        assert_eq!(current.reservation.version, 1);
    }

    #[tokio::test]
    async fn test_update_room_change_checks_target_room() {
        let f = fixture();
        let created = f.service.create(f.actor_id, base_input(&f)).await.unwrap();
        let id = created.reservation.id;
        let epoch = DateTime::UNIX_EPOCH;

        let small_room_id = Uuid::new_v4();
        let inactive_room_id = Uuid::new_v4();
        {
            let mut state = f.store.inner.lock().unwrap();
            state.rooms.insert(
                small_room_id,
                Room {
                    id: small_room_id,
                    name: "Sala Íntima".to_string(),
                    description: None,
                    max_capacity: 10,
                    price_per_person: dec("150.00"),
                    total_price: dec("2000.00"),
                    is_active: true,
                    created_at: epoch,
                    updated_at: epoch,
                },
            );
            state.rooms.insert(
                inactive_room_id,
                Room {
                    id: inactive_room_id,
                    name: "Salão Antigo".to_string(),
                    description: None,
                    max_capacity: 200,
                    price_per_person: dec("150.00"),
                    total_price: dec("9000.00"),
                    is_active: false,
                    created_at: epoch,
                    updated_at: epoch,
                },
            );
        }

        // Capacidade é conferida contra o salão de destino
        let input = UpdateReservationInput {
            room_id: Some(small_room_id),
            ..Default::default()
        };
        assert!(matches!(
            f.service.update(id, f.actor_id, "trocar salão", input).await,
            Err(AppError::CapacityExceeded(10))
        ));

        // Salão de destino desativado não recebe reservas
        let input = UpdateReservationInput {
            room_id: Some(inactive_room_id),
            ..Default::default()
        };
        assert!(matches!(
            f.service.update(id, f.actor_id, "trocar salão", input).await,
            Err(AppError::RoomInactive)
        ));

        // As duas rejeições deixam a reserva no salão original
        let current = f.service.get(id).await.unwrap();
        assert_eq!(current.reservation.room_id, f.room_id);
        assert_eq!(current.reservation.version, 1);
    }

    #[tokio::test]
    async fn test_update_requires_reason() {
        let f = fixture();
        let created = f.service.create(f.actor_id, base_input(&f)).await.unwrap();

        let result = f
            .service
            .update(
                created.reservation.id,
                f.actor_id,
                "   ",
                UpdateReservationInput::default(),
            )
            .await;
        assert!(matches!(result, Err(AppError::MissingReason)));
    }

    #[tokio::test]
    async fn test_cancel_and_post_cancellation_immutability() {
        let f = fixture();
        let created = f.service.create(f.actor_id, base_input(&f)).await.unwrap();
        let id = created.reservation.id;

        let cancelled = f
            .service
            .cancel(id, f.actor_id, "client rescheduled")
            .await
            .unwrap();
        assert_eq!(cancelled.reservation.status, ReservationStatus::Cancelled);
        assert_eq!(
            cancelled.reservation.cancellation_reason.as_deref(),
            Some("client rescheduled")
        );
        assert!(cancelled.reservation.cancelled_at.is_some());

        let history = f.service.history(id).await.unwrap();
        assert_eq!(history[0].change_type, HistoryChangeType::Cancelled);

        // Reserva cancelada não aceita mais nenhuma mutação
        let input = UpdateReservationInput {
            number_of_guests: Some(10),
            ..Default::default()
        };
        assert!(matches!(
            f.service.update(id, f.actor_id, "tentativa", input).await,
            Err(AppError::ReservationCancelled)
        ));
        assert!(matches!(
            f.service.cancel(id, f.actor_id, "de novo").await,
            Err(AppError::ReservationCancelled)
        ));
    }

    #[tokio::test]
    async fn test_cancellation_via_update_is_rejected() {
        let f = fixture();
        let created = f.service.create(f.actor_id, base_input(&f)).await.unwrap();

        let input = UpdateReservationInput {
            status: Some(ReservationStatus::Cancelled),
            ..Default::default()
        };
        assert!(matches!(
            f.service
                .update(created.reservation.id, f.actor_id, "atalho", input)
                .await,
            Err(AppError::CancellationViaUpdate)
        ));
    }

    #[tokio::test]
    async fn test_history_is_stable_between_reads() {
        let f = fixture();
        let created = f.service.create(f.actor_id, base_input(&f)).await.unwrap();
        let id = created.reservation.id;

        f.service
            .update(
                id,
                f.actor_id,
                "ajuste",
                UpdateReservationInput {
                    duration_hours: Some(8),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let first = f.service.history(id).await.unwrap();
        let second = f.service.history(id).await.unwrap();
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
        assert_eq!(first.len(), 2);
    }

    #[tokio::test]
    async fn test_store_rejects_stale_version() {
        let f = fixture();
        let created = f.service.create(f.actor_id, base_input(&f)).await.unwrap();
        let mut stale = created.reservation.clone();
        stale.version = 2;

        let entry = ReservationService::history_entry(
            &stale,
            HistoryChangeType::Updated,
            f.actor_id,
            Some("corrida".to_string()),
            Some(&created.reservation),
        )
        .unwrap();

        // Versão esperada errada: a escrita concorrente já passou na frente
        let result = f.store.update_reservation(&stale, 99, &entry).await;
        assert!(matches!(result, Err(AppError::ConcurrentModification)));
    }

    #[tokio::test]
    async fn test_enabling_deposit_on_update_requires_details() {
        let f = fixture();
        let created = f.service.create(f.actor_id, base_input(&f)).await.unwrap();
        let id = created.reservation.id;

        let input = UpdateReservationInput {
            deposit_required: Some(true),
            ..Default::default()
        };
        assert!(matches!(
            f.service.update(id, f.actor_id, "exigir sinal", input).await,
            Err(AppError::MissingDepositDetails)
        ));

        let input = UpdateReservationInput {
            deposit_required: Some(true),
            deposit_amount: Some(dec("1500.00")),
            deposit_due_date: Some(date("2026-03-10")),
            ..Default::default()
        };
        let updated = f
            .service
            .update(id, f.actor_id, "exigir sinal", input)
            .await
            .unwrap();
        assert_eq!(updated.reservation.deposit_status, DepositStatus::Pending);
    }
}
