// src/handlers/prospeccoes.rs

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
    db::ProspeccaoFiltros,
    models::prospeccao::{
        AtualizarProspeccaoPayload, ConversaoProspeccao, ConverterProspeccaoPayload,
        CriarProspeccaoPayload, EstatisticasProspeccoes, Prospeccao, ProspeccaoComUsuario,
    },
};

// GET /api/prospeccoes
#[utoipa::path(
    get,
    path = "/api/prospeccoes",
    tag = "Prospeccoes",
    params(PaginacaoQuery, ProspeccaoFiltros),
    responses(
        (status = 200, description = "Listagem paginada de prospecções", body = RespostaPaginada<ProspeccaoComUsuario>)
    ),
    security(("api_jwt" = []))
)]
pub async fn listar(
    State(app_state): State<AppState>,
    Query(paginacao): Query<PaginacaoQuery>,
    Query(filtros): Query<ProspeccaoFiltros>,
) -> Result<impl IntoResponse, AppError> {
    paginacao.validate()?;

    let resposta = app_state
        .prospeccao_service
        .listar(&filtros, &paginacao)
        .await?;

    Ok(Json(resposta))
}

// GET /api/prospeccoes/stats
#[utoipa::path(
    get,
    path = "/api/prospeccoes/stats",
    tag = "Prospeccoes",
    params(ProspeccaoFiltros),
    responses(
        (status = 200, description = "Totais, taxa de conversão e quebras por origem/indicador", body = EstatisticasProspeccoes)
    ),
    security(("api_jwt" = []))
)]
pub async fn stats(
    State(app_state): State<AppState>,
    Query(filtros): Query<ProspeccaoFiltros>,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.prospeccao_service.stats(&filtros).await?;

    Ok(Json(stats))
}

// GET /api/prospeccoes/{id}
#[utoipa::path(
    get,
    path = "/api/prospeccoes/{id}",
    tag = "Prospeccoes",
    params(("id" = Uuid, Path, description = "ID da prospecção")),
    responses(
        (status = 200, description = "Prospecção encontrada", body = ProspeccaoComUsuario),
        (status = 404, description = "Prospecção não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn buscar(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let prospeccao = app_state.prospeccao_service.buscar(id).await?;

    Ok(Json(prospeccao))
}

// POST /api/prospeccoes
#[utoipa::path(
    post,
    path = "/api/prospeccoes",
    tag = "Prospeccoes",
    request_body = CriarProspeccaoPayload,
    responses(
        (status = 201, description = "Prospecção registrada", body = Prospeccao),
        (status = 409, description = "Já existe prospecção com este email")
    ),
    security(("api_jwt" = []))
)]
pub async fn criar(
    State(app_state): State<AppState>,
    Json(payload): Json<CriarProspeccaoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let prospeccao = app_state.prospeccao_service.criar(payload).await?;

    Ok((StatusCode::CREATED, Json(prospeccao)))
}

// POST /api/prospeccoes/{id}/converter
#[utoipa::path(
    post,
    path = "/api/prospeccoes/{id}/converter",
    tag = "Prospeccoes",
    params(("id" = Uuid, Path, description = "ID da prospecção")),
    request_body = ConverterProspeccaoPayload,
    responses(
        (status = 200, description = "Lead convertido em usuário INATIVO", body = ConversaoProspeccao),
        (status = 400, description = "Prospecção já foi convertida ou não tem email"),
        (status = 409, description = "Já existe um usuário com este email")
    ),
    security(("api_jwt" = []))
)]
pub async fn converter(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ConverterProspeccaoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let conversao = app_state.prospeccao_service.converter(id, payload).await?;

    Ok(Json(conversao))
}

// PUT /api/prospeccoes/{id}
#[utoipa::path(
    put,
    path = "/api/prospeccoes/{id}",
    tag = "Prospeccoes",
    params(("id" = Uuid, Path, description = "ID da prospecção")),
    request_body = AtualizarProspeccaoPayload,
    responses(
        (status = 200, description = "Prospecção atualizada", body = Prospeccao),
        (status = 404, description = "Prospecção não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn atualizar(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AtualizarProspeccaoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let prospeccao = app_state.prospeccao_service.atualizar(id, payload).await?;

    Ok(Json(prospeccao))
}

// DELETE /api/prospeccoes/{id}
#[utoipa::path(
    delete,
    path = "/api/prospeccoes/{id}",
    tag = "Prospeccoes",
    params(("id" = Uuid, Path, description = "ID da prospecção")),
    responses(
        (status = 204, description = "Prospecção removida"),
        (status = 400, description = "Prospecção convertida não pode ser excluída"),
        (status = 404, description = "Prospecção não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn excluir(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.prospeccao_service.excluir(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
