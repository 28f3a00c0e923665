// src/main.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas de autenticação: login/refresh públicas, o resto protegido
    let auth_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/refresh", post(handlers::auth::refresh))
        .merge(
            Router::new()
                .route("/logout", post(handlers::auth::logout))
                .route("/change-password", post(handlers::auth::change_password))
                .route_layer(axum_middleware::from_fn_with_state(
                    app_state.clone(),
                    auth_guard,
                )),
        );

    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let room_routes = Router::new()
        .route("/"
               ,post(handlers::rooms::create_room)
               .get(handlers::rooms::list_rooms)
        )
        .route("/{id}"
               ,get(handlers::rooms::get_room)
               .put(handlers::rooms::update_room)
               .delete(handlers::rooms::deactivate_room)
        )
        .route("/{id}/availability", get(handlers::rooms::check_availability))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let customer_routes = Router::new()
        .route("/"
               ,post(handlers::customers::create_customer)
               .get(handlers::customers::list_customers)
        )
        .route("/{id}"
               ,get(handlers::customers::get_customer)
               .put(handlers::customers::update_customer)
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let reservation_routes = Router::new()
        .route("/", post(handlers::reservations::create_reservation))
        .route("/{id}"
               ,get(handlers::reservations::get_reservation)
               .put(handlers::reservations::update_reservation)
        )
        .route("/{id}/cancel", post(handlers::reservations::cancel_reservation))
        .route("/{id}/history", get(handlers::reservations::get_reservation_history))
        .route("/{id}/pdf", get(handlers::reservations::download_reservation_pdf))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/rooms", room_routes)
        .nest("/api/customers", customer_routes)
        .nest("/api/reservations", reservation_routes)
        .merge(
            SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()),
        )
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
