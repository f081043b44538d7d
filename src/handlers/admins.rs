// src/handlers/admins.rs
//
// Gestão de operadores do painel: todas as rotas deste módulo passam pelo
// auth_guard e pelo admin_guard (role ADMIN).

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    common::paginacao::{PaginacaoQuery, RespostaPaginada},
    config::AppState,
    db::AdminFiltros,
    models::admin::{AdminSeguro, AlterarRolePayload},
};

// GET /api/admins
#[utoipa::path(
    get,
    path = "/api/admins",
    tag = "Admins",
    params(PaginacaoQuery, AdminFiltros),
    responses(
        (status = 200, description = "Listagem paginada de admins (sem hash de senha)", body = RespostaPaginada<AdminSeguro>),
        (status = 403, description = "Requer role ADMIN")
    ),
    security(("api_jwt" = []))
)]
pub async fn listar(
    State(app_state): State<AppState>,
    Query(paginacao): Query<PaginacaoQuery>,
    Query(filtros): Query<AdminFiltros>,
) -> Result<impl IntoResponse, AppError> {
    paginacao.validate()?;

    let resposta = app_state
        .auth_service
        .listar_admins(&filtros, &paginacao)
        .await?;

    Ok(Json(resposta))
}

// POST /api/admins/{id}/aprovar
#[utoipa::path(
    post,
    path = "/api/admins/{id}/aprovar",
    tag = "Admins",
    params(("id" = Uuid, Path, description = "ID do admin")),
    responses(
        (status = 200, description = "Cadastro aprovado", body = AdminSeguro),
        (status = 400, description = "Usuário já está aprovado"),
        (status = 404, description = "Admin não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn aprovar(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let admin = app_state.auth_service.aprovar_admin(id).await?;

    Ok(Json(admin))
}

// DELETE /api/admins/{id}/rejeitar
#[utoipa::path(
    delete,
    path = "/api/admins/{id}/rejeitar",
    tag = "Admins",
    params(("id" = Uuid, Path, description = "ID do admin")),
    responses(
        (status = 204, description = "Cadastro pendente removido"),
        (status = 400, description = "Cadastro já aprovado; use a desativação"),
        (status = 404, description = "Admin não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn rejeitar(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.auth_service.rejeitar_admin(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

// PUT /api/admins/{id}/role
#[utoipa::path(
    put,
    path = "/api/admins/{id}/role",
    tag = "Admins",
    params(("id" = Uuid, Path, description = "ID do admin")),
    request_body = AlterarRolePayload,
    responses(
        (status = 200, description = "Role alterada", body = AdminSeguro),
        (status = 404, description = "Admin não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn alterar_role(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AlterarRolePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let admin = app_state
        .auth_service
        .alterar_role(id, payload.role)
        .await?;

    Ok(Json(admin))
}

// PUT /api/admins/{id}/toggle-ativo
#[utoipa::path(
    put,
    path = "/api/admins/{id}/toggle-ativo",
    tag = "Admins",
    params(("id" = Uuid, Path, description = "ID do admin")),
    responses(
        (status = 200, description = "Flag ativo alternada", body = AdminSeguro),
        (status = 404, description = "Admin não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn alternar_ativo(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let admin = app_state.auth_service.alternar_ativo(id).await?;

    Ok(Json(admin))
}
