use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

// Erro central da aplicação; `thiserror` cuida das conversões via `#[from]`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    Validacao(#[from] validator::ValidationErrors),

    // Regras de negócio violadas (churn já revertido, prospecção já convertida...)
    #[error("{0}")]
    RegraDeNegocio(String),

    #[error("{0}")]
    NaoEncontrado(String),

    #[error("{0}")]
    Conflito(String),

    #[error("Credenciais inválidas")]
    CredenciaisInvalidas,

    #[error("Token inválido")]
    TokenInvalido,

    // Autenticado, mas sem a role necessária.
    #[error("{0}")]
    AcessoNegado(String),

    #[error("Erro de banco de dados")]
    Database(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado.
    #[error("Erro interno do servidor")]
    Interno(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Devolve todos os detalhes da validação, campo a campo.
            AppError::Validacao(errors) => {
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
            AppError::RegraDeNegocio(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NaoEncontrado(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflito(msg) => (StatusCode::CONFLICT, msg),
            AppError::CredenciaisInvalidas => {
                (StatusCode::UNAUTHORIZED, "Login ou senha inválidos.".to_string())
            }
            AppError::TokenInvalido => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.".to_string(),
            ),
            AppError::AcessoNegado(msg) => (StatusCode::FORBIDDEN, msg),

            // Todos os outros (Database, Interno, Bcrypt, Jwt) viram 500.
            // O `tracing` loga a mensagem detalhada; o cliente recebe algo genérico.
            ref e => {
                tracing::error!("Erro interno do servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

// Diferencia violação de chave única das demais falhas de banco.
pub fn conflito_de_unicidade(e: sqlx::Error, mensagem: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::Conflito(mensagem.to_string());
        }
    }
    e.into()
}
