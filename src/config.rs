// src/config.rs

use std::{env, sync::Arc, time::Duration};

use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{
    db::{CustomerRepository, PgReservationStore, RoomRepository, UserRepository},
    services::{
        auth::AuthService, customer_service::CustomerService, document_service::DocumentService,
        reservation_service::ReservationService, room_service::RoomService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub room_service: RoomService,
    pub customer_service: CustomerService,
    pub reservation_service: ReservationService,
    pub document_service: DocumentService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");
        let fonts_dir = env::var("FONTS_DIR").unwrap_or_else(|_| "./fonts".to_string());

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let auth_service = AuthService::new(user_repo, jwt_secret);

        let room_service = RoomService::new(RoomRepository::new(db_pool.clone()));
        let customer_service = CustomerService::new(CustomerRepository::new(db_pool.clone()));

        // O serviço de reservas recebe a fronteira de armazenamento injetada;
        // nos testes ela é trocada por uma implementação em memória
        let reservation_service =
            ReservationService::new(Arc::new(PgReservationStore::new(db_pool.clone())));

        let document_service = DocumentService::new(fonts_dir);

        Ok(Self {
            db_pool,
            auth_service,
            room_service,
            customer_service,
            reservation_service,
            document_service,
        })
    }
}
