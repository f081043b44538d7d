// src/handlers/despesas.rs

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
    db::DespesaFiltros,
    models::despesa::{
        AtualizarDespesaPayload, CriarDespesaPayload, Despesa, EstatisticasDespesas,
        TotalPorCategoria, TotalPorCompetencia,
    },
};

// GET /api/despesas
#[utoipa::path(
    get,
    path = "/api/despesas",
    tag = "Despesas",
    params(PaginacaoQuery, DespesaFiltros),
    responses(
        (status = 200, description = "Listagem paginada de despesas (limite padrão 50)", body = RespostaPaginada<Despesa>)
    ),
    security(("api_jwt" = []))
)]
pub async fn listar(
    State(app_state): State<AppState>,
    Query(paginacao): Query<PaginacaoQuery>,
    Query(filtros): Query<DespesaFiltros>,
) -> Result<impl IntoResponse, AppError> {
    paginacao.validate()?;

    let resposta = app_state
        .despesa_service
        .listar(&filtros, &paginacao)
        .await?;

    Ok(Json(resposta))
}

// GET /api/despesas/stats
#[utoipa::path(
    get,
    path = "/api/despesas/stats",
    tag = "Despesas",
    params(DespesaFiltros),
    responses(
        (status = 200, description = "Totais gerais e quebra pago/pendente sob o mesmo filtro", body = EstatisticasDespesas)
    ),
    security(("api_jwt" = []))
)]
pub async fn stats(
    State(app_state): State<AppState>,
    Query(filtros): Query<DespesaFiltros>,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.despesa_service.stats(&filtros).await?;

    Ok(Json(stats))
}

// GET /api/despesas/relatorio/categoria
#[utoipa::path(
    get,
    path = "/api/despesas/relatorio/categoria",
    tag = "Despesas",
    params(DespesaFiltros),
    responses(
        (status = 200, description = "Despesas agrupadas por categoria, maior soma primeiro", body = Vec<TotalPorCategoria>)
    ),
    security(("api_jwt" = []))
)]
pub async fn relatorio_categoria(
    State(app_state): State<AppState>,
    Query(filtros): Query<DespesaFiltros>,
) -> Result<impl IntoResponse, AppError> {
    let relatorio = app_state
        .despesa_service
        .relatorio_por_categoria(&filtros)
        .await?;

    Ok(Json(relatorio))
}

// GET /api/despesas/relatorio/mensal
#[utoipa::path(
    get,
    path = "/api/despesas/relatorio/mensal",
    tag = "Despesas",
    params(DespesaFiltros),
    responses(
        (status = 200, description = "Despesas agrupadas por competência, mais recente primeiro", body = Vec<TotalPorCompetencia>)
    ),
    security(("api_jwt" = []))
)]
pub async fn relatorio_mensal(
    State(app_state): State<AppState>,
    Query(filtros): Query<DespesaFiltros>,
) -> Result<impl IntoResponse, AppError> {
    let relatorio = app_state
        .despesa_service
        .relatorio_por_competencia(&filtros)
        .await?;

    Ok(Json(relatorio))
}

// GET /api/despesas/{id}
#[utoipa::path(
    get,
    path = "/api/despesas/{id}",
    tag = "Despesas",
    params(("id" = Uuid, Path, description = "ID da despesa")),
    responses(
        (status = 200, description = "Despesa encontrada", body = Despesa),
        (status = 404, description = "Despesa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn buscar(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let despesa = app_state.despesa_service.buscar(id).await?;

    Ok(Json(despesa))
}

// POST /api/despesas
#[utoipa::path(
    post,
    path = "/api/despesas",
    tag = "Despesas",
    request_body = CriarDespesaPayload,
    responses(
        (status = 201, description = "Despesa criada", body = Despesa),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn criar(
    State(app_state): State<AppState>,
    Json(payload): Json<CriarDespesaPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let despesa = app_state.despesa_service.criar(payload).await?;

    Ok((StatusCode::CREATED, Json(despesa)))
}

// PUT /api/despesas/{id}
#[utoipa::path(
    put,
    path = "/api/despesas/{id}",
    tag = "Despesas",
    params(("id" = Uuid, Path, description = "ID da despesa")),
    request_body = AtualizarDespesaPayload,
    responses(
        (status = 200, description = "Despesa atualizada", body = Despesa),
        (status = 404, description = "Despesa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn atualizar(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AtualizarDespesaPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let despesa = app_state.despesa_service.atualizar(id, payload).await?;

    Ok(Json(despesa))
}

// PUT /api/despesas/{id}/pagar
#[utoipa::path(
    put,
    path = "/api/despesas/{id}/pagar",
    tag = "Despesas",
    params(("id" = Uuid, Path, description = "ID da despesa")),
    responses(
        (status = 200, description = "Despesa marcada como PAGO", body = Despesa),
        (status = 404, description = "Despesa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn pagar(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let despesa = app_state.despesa_service.marcar_paga(id).await?;

    Ok(Json(despesa))
}

// PUT /api/despesas/{id}/pendente
#[utoipa::path(
    put,
    path = "/api/despesas/{id}/pendente",
    tag = "Despesas",
    params(("id" = Uuid, Path, description = "ID da despesa")),
    responses(
        (status = 200, description = "Despesa marcada como PENDENTE", body = Despesa),
        (status = 404, description = "Despesa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn pendente(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let despesa = app_state.despesa_service.marcar_pendente(id).await?;

    Ok(Json(despesa))
}

// DELETE /api/despesas/{id}
#[utoipa::path(
    delete,
    path = "/api/despesas/{id}",
    tag = "Despesas",
    params(("id" = Uuid, Path, description = "ID da despesa")),
    responses(
        (status = 204, description = "Despesa removida"),
        (status = 404, description = "Despesa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn excluir(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.despesa_service.excluir(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
