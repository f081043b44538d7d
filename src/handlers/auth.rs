// src/handlers/auth.rs

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AdminAutenticado,
    models::admin::{
        AdminSeguro, AlterarSenhaPayload, LoginPayload, RegistrarPayload, RespostaLogin,
    },
};

// POST /api/auth/registrar
#[utoipa::path(
    post,
    path = "/api/auth/registrar",
    tag = "Auth",
    request_body = RegistrarPayload,
    responses(
        (status = 201, description = "Cadastro criado (pendente de aprovação)", body = AdminSeguro),
        (status = 400, description = "Dados inválidos ou login/email em uso")
    )
)]
pub async fn registrar(
    State(app_state): State<AppState>,
    Json(payload): Json<RegistrarPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let admin = app_state.auth_service.registrar(payload).await?;

    Ok((StatusCode::CREATED, Json(admin)))
}

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Login efetuado", body = RespostaLogin),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let resposta = app_state.auth_service.login(payload).await?;

    Ok(Json(resposta))
}

// GET /api/auth/me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Admin autenticado", body = AdminSeguro),
        (status = 401, description = "Token inválido ou ausente")
    ),
    security(("api_jwt" = []))
)]
pub async fn me(
    State(app_state): State<AppState>,
    AdminAutenticado(claims): AdminAutenticado,
) -> Result<impl IntoResponse, AppError> {
    let admin = app_state.auth_service.me(claims.sub).await?;

    Ok(Json(admin))
}

// PUT /api/auth/senha
#[utoipa::path(
    put,
    path = "/api/auth/senha",
    tag = "Auth",
    request_body = AlterarSenhaPayload,
    responses(
        (status = 204, description = "Senha alterada"),
        (status = 401, description = "Senha atual não confere")
    ),
    security(("api_jwt" = []))
)]
pub async fn alterar_senha(
    State(app_state): State<AppState>,
    AdminAutenticado(claims): AdminAutenticado,
    Json(payload): Json<AlterarSenhaPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    app_state
        .auth_service
        .alterar_senha(claims.sub, payload)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
