// src/services/customer_service.rs

use uuid::Uuid;

use crate::{common::error::AppError, db::CustomerRepository, models::customer::Customer};

#[derive(Clone)]
pub struct CustomerService {
    repo: CustomerRepository,
}

impl CustomerService {
    pub fn new(repo: CustomerRepository) -> Self {
        Self { repo }
    }

    pub async fn get(&self, id: Uuid) -> Result<Customer, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::CustomerNotFound)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        first_name: &str,
        last_name: &str,
        phone: &str,
        email: Option<&str>,
        company: Option<&str>,
        tax_id: Option<&str>,
        address: Option<&str>,
        city: Option<&str>,
        postal_code: Option<&str>,
        notes: Option<&str>,
        created_by: Uuid,
    ) -> Result<Customer, AppError> {
        self.repo
            .create(
                first_name,
                last_name,
                phone,
                email,
                company,
                tax_id,
                address,
                city,
                postal_code,
                notes,
                created_by,
            )
            .await
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: Uuid,
        first_name: &str,
        last_name: &str,
        phone: &str,
        email: Option<&str>,
        company: Option<&str>,
        tax_id: Option<&str>,
        address: Option<&str>,
        city: Option<&str>,
        postal_code: Option<&str>,
        notes: Option<&str>,
    ) -> Result<Customer, AppError> {
        self.repo
            .update(
                id,
                first_name,
                last_name,
                phone,
                email,
                company,
                tax_id,
                address,
                city,
                postal_code,
                notes,
            )
            .await?
            .ok_or(AppError::CustomerNotFound)
    }

    pub async fn search(&self, query: Option<&str>) -> Result<Vec<Customer>, AppError> {
        self.repo.search(query).await
    }
}
