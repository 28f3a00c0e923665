// src/services/room_service.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::RoomRepository,
    models::venue::{Room, RoomAvailability},
};

#[derive(Clone)]
pub struct RoomService {
    repo: RoomRepository,
}

impl RoomService {
    pub fn new(repo: RoomRepository) -> Self {
        Self { repo }
    }

    pub async fn list_active(&self) -> Result<Vec<Room>, AppError> {
        self.repo.list_active().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Room, AppError> {
        self.repo.find_by_id(id).await?.ok_or(AppError::RoomNotFound)
    }

    pub async fn create(
        &self,
        name: &str,
        description: Option<&str>,
        max_capacity: i32,
        price_per_person: Decimal,
        total_price: Decimal,
    ) -> Result<Room, AppError> {
        self.repo
            .create(name, description, max_capacity, price_per_person, total_price)
            .await
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: Uuid,
        name: &str,
        description: Option<&str>,
        max_capacity: i32,
        price_per_person: Decimal,
        total_price: Decimal,
        is_active: bool,
    ) -> Result<Room, AppError> {
        self.repo
            .update(
                id,
                name,
                description,
                max_capacity,
                price_per_person,
                total_price,
                is_active,
            )
            .await?
            .ok_or(AppError::RoomNotFound)
    }

    pub async fn deactivate(&self, id: Uuid) -> Result<Room, AppError> {
        self.repo.deactivate(id).await?.ok_or(AppError::RoomNotFound)
    }

    /// Uma data está livre quando nenhuma reserva ativa segura o salão nela.
    pub async fn check_availability(
        &self,
        id: Uuid,
        date: NaiveDate,
    ) -> Result<RoomAvailability, AppError> {
        // Garante o 404 antes de responder disponibilidade de salão inexistente
        self.repo.find_by_id(id).await?.ok_or(AppError::RoomNotFound)?;

        let active = self.repo.count_active_reservations_on(id, date).await?;
        Ok(RoomAvailability {
            is_available: active == 0,
            active_reservations: active,
        })
    }
}
