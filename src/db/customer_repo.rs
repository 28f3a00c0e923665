// src/db/customer_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::customer::Customer};

const CUSTOMER_COLUMNS: &str = r#"
    id, first_name, last_name, phone, email,
    company, tax_id, address, city, postal_code,
    notes, created_by, created_at, updated_at
"#;

#[derive(Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>, AppError> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
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
        let customer = sqlx::query_as::<_, Customer>(&format!(
            r#"
            INSERT INTO customers (
                first_name, last_name, phone, email, company, tax_id,
                address, city, postal_code, notes, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {CUSTOMER_COLUMNS}
            "#
        ))
        .bind(first_name)
        .bind(last_name)
        .bind(phone)
        .bind(email)
        .bind(company)
        .bind(tax_id)
        .bind(address)
        .bind(city)
        .bind(postal_code)
        .bind(notes)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(customer)
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
    ) -> Result<Option<Customer>, AppError> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            r#"
            UPDATE customers SET
                first_name = $1, last_name = $2, phone = $3, email = $4,
                company = $5, tax_id = $6, address = $7, city = $8,
                postal_code = $9, notes = $10, updated_at = NOW()
            WHERE id = $11
            RETURNING {CUSTOMER_COLUMNS}
            "#
        ))
        .bind(first_name)
        .bind(last_name)
        .bind(phone)
        .bind(email)
        .bind(company)
        .bind(tax_id)
        .bind(address)
        .bind(city)
        .bind(postal_code)
        .bind(notes)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Busca simples por nome, telefone ou e-mail. Resultado limitado:
    /// o núcleo não define contrato de paginação.
    pub async fn search(&self, query: Option<&str>) -> Result<Vec<Customer>, AppError> {
        let customers = match query {
            Some(q) => {
                let term = format!("%{q}%");
                sqlx::query_as::<_, Customer>(&format!(
                    r#"
                    SELECT {CUSTOMER_COLUMNS}
                    FROM customers
                    WHERE first_name ILIKE $1
                       OR last_name ILIKE $1
                       OR phone ILIKE $1
                       OR email ILIKE $1
                    ORDER BY last_name ASC, first_name ASC
                    LIMIT 50
                    "#
                ))
                .bind(term)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Customer>(&format!(
                    r#"
                    SELECT {CUSTOMER_COLUMNS}
                    FROM customers
                    ORDER BY last_name ASC, first_name ASC
                    LIMIT 50
                    "#
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(customers)
    }
}
