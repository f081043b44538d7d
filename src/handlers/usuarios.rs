// src/handlers/usuarios.rs

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
    db::UsuarioFiltros,
    models::pagamento::Pagamento,
    models::usuario::{AtualizarUsuarioPayload, CriarUsuarioPayload, Usuario},
};

// GET /api/usuarios
#[utoipa::path(
    get,
    path = "/api/usuarios",
    tag = "Usuarios",
    params(PaginacaoQuery, UsuarioFiltros),
    responses(
        (status = 200, description = "Listagem paginada de clientes", body = RespostaPaginada<Usuario>)
    ),
    security(("api_jwt" = []))
)]
pub async fn listar(
    State(app_state): State<AppState>,
    Query(paginacao): Query<PaginacaoQuery>,
    Query(filtros): Query<UsuarioFiltros>,
) -> Result<impl IntoResponse, AppError> {
    paginacao.validate()?;

    let resposta = app_state
        .usuario_service
        .listar(&filtros, &paginacao)
        .await?;

    Ok(Json(resposta))
}

// GET /api/usuarios/{id}
#[utoipa::path(
    get,
    path = "/api/usuarios/{id}",
    tag = "Usuarios",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Cliente encontrado", body = Usuario),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn buscar(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let usuario = app_state.usuario_service.buscar(id).await?;

    Ok(Json(usuario))
}

// GET /api/usuarios/{id}/pagamentos
#[utoipa::path(
    get,
    path = "/api/usuarios/{id}/pagamentos",
    tag = "Usuarios",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Histórico de pagamentos do cliente", body = Vec<Pagamento>),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn pagamentos(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let pagamentos = app_state.pagamento_service.por_usuario(id).await?;

    Ok(Json(pagamentos))
}

// POST /api/usuarios
#[utoipa::path(
    post,
    path = "/api/usuarios",
    tag = "Usuarios",
    request_body = CriarUsuarioPayload,
    responses(
        (status = 201, description = "Cliente criado (status INATIVO)", body = Usuario),
        (status = 409, description = "Email já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn criar(
    State(app_state): State<AppState>,
    Json(payload): Json<CriarUsuarioPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let usuario = app_state.usuario_service.criar(payload).await?;

    Ok((StatusCode::CREATED, Json(usuario)))
}

// PUT /api/usuarios/{id}
#[utoipa::path(
    put,
    path = "/api/usuarios/{id}",
    tag = "Usuarios",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    request_body = AtualizarUsuarioPayload,
    responses(
        (status = 200, description = "Cliente atualizado", body = Usuario),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn atualizar(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AtualizarUsuarioPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let usuario = app_state.usuario_service.atualizar(id, payload).await?;

    Ok(Json(usuario))
}

// DELETE /api/usuarios/{id}
#[utoipa::path(
    delete,
    path = "/api/usuarios/{id}",
    tag = "Usuarios",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 204, description = "Cliente removido (pagamentos e churns caem em cascata)"),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn excluir(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.usuario_service.excluir(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
