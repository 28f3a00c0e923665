// src/common/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Toda falha de validação é detectada antes de qualquer escrita no banco.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // --- Não encontrados ---
    #[error("Salão não encontrado")]
    RoomNotFound,

    #[error("Cliente não encontrado")]
    CustomerNotFound,

    #[error("Reserva não encontrada")]
    ReservationNotFound,

    #[error("Usuário não encontrado")]
    UserNotFound,

    // --- Regras de negócio da reserva ---
    #[error("Salão inativo")]
    RoomInactive,

    // Carrega o limite para o usuário poder corrigir o formulário
    #[error("Número de convidados excede a capacidade máxima do salão ({0} pessoas)")]
    CapacityExceeded(i32),

    #[error("Modo de cobrança inconsistente com os preços informados")]
    InvalidPricingInput,

    #[error("O vencimento do sinal deve ser no máximo um dia antes do evento")]
    InvalidDepositTiming,

    #[error("Sinal exigido sem valor ou data de vencimento")]
    MissingDepositDetails,

    #[error("O motivo da alteração é obrigatório")]
    MissingReason,

    #[error("Status inicial deve ser pendente ou confirmado")]
    InvalidInitialStatus,

    #[error("Reserva cancelada não aceita mais alterações")]
    ReservationCancelled,

    #[error("Reserva concluída não pode ser cancelada")]
    ReservationCompleted,

    #[error("Cancelamento deve usar a operação de cancelamento, não a de atualização")]
    CancellationViaUpdate,

    #[error("A reserva foi alterada por outro usuário; recarregue e tente de novo")]
    ConcurrentModification,

    #[error("Não foi possível gerar um número de reserva único")]
    ReservationNumberExhausted,

    // --- Autenticação ---
    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário inativo")]
    UserInactive,

    // --- Infraestrutura ---
    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado.
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::RoomNotFound
            | AppError::CustomerNotFound
            | AppError::ReservationNotFound
            | AppError::UserNotFound => (StatusCode::NOT_FOUND, self.to_string()),

            AppError::RoomInactive
            | AppError::CapacityExceeded(_)
            | AppError::InvalidPricingInput
            | AppError::InvalidDepositTiming
            | AppError::MissingDepositDetails
            | AppError::MissingReason
            | AppError::InvalidInitialStatus
            | AppError::CancellationViaUpdate => (StatusCode::BAD_REQUEST, self.to_string()),

            AppError::ReservationCancelled
            | AppError::ReservationCompleted
            | AppError::ConcurrentModification => (StatusCode::CONFLICT, self.to_string()),

            AppError::InvalidCredentials | AppError::InvalidToken | AppError::UserInactive => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }

            // Todos os outros (DatabaseError, InternalServerError...) viram 500.
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu;
            // o chamador recebe só o genérico.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
