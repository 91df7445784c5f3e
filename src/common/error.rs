use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Cada variante tem uma classificação estável de status; o detalhe
// interno dos erros 500 só aparece no log, nunca na resposta.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Ano de safra inválido: {0}")]
    InvalidYear(i64),

    #[error("Estoque negativo")]
    NegativeStock,

    #[error("Estoque não pode ser alterado pelo update genérico")]
    StockUpdateNotAllowed,

    #[error("Vinho não encontrado")]
    WineNotFound,

    #[error("Local não encontrado")]
    LocationNotFound,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Permissão insuficiente")]
    NotAuthorized,

    #[error("Registro já removido")]
    AlreadyDeleted,

    #[error("Username já existe")]
    UsernameTaken,

    #[error("Local já existe: {0}")]
    LocationAlreadyExists(String),

    #[error("Local ainda referenciado por vinhos: {0}")]
    LocationInUse(String),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Conta desativada")]
    AccountDisabled,

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
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
            // Retorna todos os detalhes da validação, campo a campo.
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

            AppError::InvalidYear(year) => {
                let body = Json(json!({
                    "error": format!(
                        "O ano deve estar entre 1900 e o ano corrente (recebido: {year})."
                    ),
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::NegativeStock => {
                (StatusCode::BAD_REQUEST, "O estoque não pode ser negativo.".to_string())
            }
            AppError::StockUpdateNotAllowed => (
                StatusCode::BAD_REQUEST,
                "Use PUT /wines/{id}/stock para alterar o estoque.".to_string(),
            ),

            AppError::WineNotFound => {
                (StatusCode::NOT_FOUND, "Vinho não encontrado.".to_string())
            }
            AppError::LocationNotFound => {
                (StatusCode::NOT_FOUND, "Local não encontrado.".to_string())
            }
            AppError::UserNotFound => {
                (StatusCode::NOT_FOUND, "Usuário não encontrado.".to_string())
            }

            AppError::NotAuthorized => (
                StatusCode::FORBIDDEN,
                "Você não tem permissão para esta operação.".to_string(),
            ),

            AppError::AlreadyDeleted => {
                (StatusCode::CONFLICT, "Este registro já foi removido.".to_string())
            }
            AppError::UsernameTaken => {
                (StatusCode::CONFLICT, "Este username já está em uso.".to_string())
            }
            AppError::LocationAlreadyExists(code) => (
                StatusCode::CONFLICT,
                format!("O local '{code}' já existe."),
            ),
            AppError::LocationInUse(code) => (
                StatusCode::CONFLICT,
                format!("O local '{code}' ainda possui vinhos associados."),
            ),

            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Username ou senha inválidos.".to_string(),
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.".to_string(),
            ),
            AppError::AccountDisabled => {
                (StatusCode::UNAUTHORIZED, "Conta desativada.".to_string())
            }

            // Todos os outros (DatabaseError, InternalServerError...) viram 500.
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
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
