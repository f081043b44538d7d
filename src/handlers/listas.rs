// src/handlers/listas.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    db::ListaFiltros,
    models::lista::{AtualizarListaPayload, CriarListaPayload, ListaAuxiliar, TipoLista},
};

// GET /api/listas
#[utoipa::path(
    get,
    path = "/api/listas",
    tag = "Listas",
    params(ListaFiltros),
    responses(
        (status = 200, description = "Itens das listas auxiliares (sem paginação)", body = Vec<ListaAuxiliar>)
    ),
    security(("api_jwt" = []))
)]
pub async fn listar(
    State(app_state): State<AppState>,
    Query(filtros): Query<ListaFiltros>,
) -> Result<impl IntoResponse, AppError> {
    let listas = app_state.lista_service.listar(&filtros).await?;

    Ok(Json(listas))
}

// GET /api/listas/agrupadas
#[utoipa::path(
    get,
    path = "/api/listas/agrupadas",
    tag = "Listas",
    responses(
        (status = 200, description = "Itens ativos agrupados por tipo, todos os tipos presentes")
    ),
    security(("api_jwt" = []))
)]
pub async fn agrupadas(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let grupos = app_state.lista_service.agrupadas().await?;

    Ok(Json(grupos))
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListaPorTipoParams {
    /// Quando ausente, devolve só itens ativos.
    pub ativo: Option<bool>,
}

// GET /api/listas/tipo/{tipo}
#[utoipa::path(
    get,
    path = "/api/listas/tipo/{tipo}",
    tag = "Listas",
    params(("tipo" = TipoLista, Path, description = "Tipo da lista"), ListaPorTipoParams),
    responses(
        (status = 200, description = "Itens do tipo informado", body = Vec<ListaAuxiliar>)
    ),
    security(("api_jwt" = []))
)]
pub async fn por_tipo(
    State(app_state): State<AppState>,
    Path(tipo): Path<TipoLista>,
    Query(params): Query<ListaPorTipoParams>,
) -> Result<impl IntoResponse, AppError> {
    let listas = app_state
        .lista_service
        .listar_por_tipo(tipo, params.ativo)
        .await?;

    Ok(Json(listas))
}

// GET /api/listas/{id}
#[utoipa::path(
    get,
    path = "/api/listas/{id}",
    tag = "Listas",
    params(("id" = Uuid, Path, description = "ID do item")),
    responses(
        (status = 200, description = "Item encontrado", body = ListaAuxiliar),
        (status = 404, description = "Item não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn buscar(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let item = app_state.lista_service.buscar(id).await?;

    Ok(Json(item))
}

// POST /api/listas
#[utoipa::path(
    post,
    path = "/api/listas",
    tag = "Listas",
    request_body = CriarListaPayload,
    responses(
        (status = 201, description = "Item criado", body = ListaAuxiliar),
        (status = 409, description = "Já existe um item com este valor para este tipo")
    ),
    security(("api_jwt" = []))
)]
pub async fn criar(
    State(app_state): State<AppState>,
    Json(payload): Json<CriarListaPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let item = app_state.lista_service.criar(payload).await?;

    Ok((StatusCode::CREATED, Json(item)))
}

// PUT /api/listas/{id}
#[utoipa::path(
    put,
    path = "/api/listas/{id}",
    tag = "Listas",
    params(("id" = Uuid, Path, description = "ID do item")),
    request_body = AtualizarListaPayload,
    responses(
        (status = 200, description = "Item atualizado", body = ListaAuxiliar),
        (status = 404, description = "Item não encontrado"),
        (status = 409, description = "Já existe um item com este valor para este tipo")
    ),
    security(("api_jwt" = []))
)]
pub async fn atualizar(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AtualizarListaPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let item = app_state.lista_service.atualizar(id, payload).await?;

    Ok(Json(item))
}

// DELETE /api/listas/{id}
// Exclusão é lógica: o item sai dos selects mas continua referenciado nos
// registros antigos.
#[utoipa::path(
    delete,
    path = "/api/listas/{id}",
    tag = "Listas",
    params(("id" = Uuid, Path, description = "ID do item")),
    responses(
        (status = 200, description = "Item desativado", body = ListaAuxiliar),
        (status = 404, description = "Item não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn excluir(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let item = app_state.lista_service.excluir(id).await?;

    Ok(Json(item))
}
