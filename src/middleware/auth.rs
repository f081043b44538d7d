// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::admin::{Claims, ROLE_ADMIN},
};

// Valida o Bearer token e deixa as claims disponíveis para os handlers via
// extensions. Qualquer falha derruba a requisição com 401.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok());

    if let Some(auth_header) = auth_header {
        if let Some(token) = auth_header.strip_prefix("Bearer ") {
            let claims = app_state.auth_service.validar_token(token)?;

            request.extensions_mut().insert(claims);
            return Ok(next.run(request).await);
        }
    }

    Err(AppError::TokenInvalido)
}

// Camada extra das rotas de gestão: além de autenticado, precisa da role
// ADMIN. Aplicar sempre depois do auth_guard.
pub async fn admin_guard(
    request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    match request.extensions().get::<Claims>() {
        Some(claims) if claims.role == ROLE_ADMIN => Ok(next.run(request).await),
        Some(claims) => {
            tracing::warn!(login = %claims.login, "acesso negado a rota de gestão");
            Err(AppError::AcessoNegado(
                "Acesso restrito a administradores".into(),
            ))
        }
        None => Err(AppError::TokenInvalido),
    }
}

// Extrator para obter as claims do admin autenticado diretamente nos handlers
pub struct AdminAutenticado(pub Claims);

impl<S> FromRequestParts<S> for AdminAutenticado
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AdminAutenticado)
            .ok_or(AppError::TokenInvalido)
    }
}
