// src/handlers/churns.rs

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
    db::ChurnFiltros,
    models::churn::{
        AtualizarChurnPayload, Churn, ChurnComUsuario, CriarChurnPayload, EstatisticasChurn,
        ReverterChurnPayload, TotalPorMotivo,
    },
};

// GET /api/churns
#[utoipa::path(
    get,
    path = "/api/churns",
    tag = "Churns",
    params(PaginacaoQuery, ChurnFiltros),
    responses(
        (status = 200, description = "Listagem paginada de churns com resumo do cliente", body = RespostaPaginada<ChurnComUsuario>)
    ),
    security(("api_jwt" = []))
)]
pub async fn listar(
    State(app_state): State<AppState>,
    Query(paginacao): Query<PaginacaoQuery>,
    Query(filtros): Query<ChurnFiltros>,
) -> Result<impl IntoResponse, AppError> {
    paginacao.validate()?;

    let resposta = app_state.churn_service.listar(&filtros, &paginacao).await?;

    Ok(Json(resposta))
}

// GET /api/churns/stats
#[utoipa::path(
    get,
    path = "/api/churns/stats",
    tag = "Churns",
    params(ChurnFiltros),
    responses(
        (status = 200, description = "Totais, taxa de reversão e quebra por motivo", body = EstatisticasChurn)
    ),
    security(("api_jwt" = []))
)]
pub async fn stats(
    State(app_state): State<AppState>,
    Query(filtros): Query<ChurnFiltros>,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.churn_service.stats(&filtros).await?;

    Ok(Json(stats))
}

// GET /api/churns/relatorio/motivos
#[utoipa::path(
    get,
    path = "/api/churns/relatorio/motivos",
    tag = "Churns",
    params(ChurnFiltros),
    responses(
        (status = 200, description = "Churns agrupados por motivo, mais frequente primeiro", body = Vec<TotalPorMotivo>)
    ),
    security(("api_jwt" = []))
)]
pub async fn relatorio_motivos(
    State(app_state): State<AppState>,
    Query(filtros): Query<ChurnFiltros>,
) -> Result<impl IntoResponse, AppError> {
    let relatorio = app_state.churn_service.relatorio_por_motivo(&filtros).await?;

    Ok(Json(relatorio))
}

// GET /api/churns/{id}
#[utoipa::path(
    get,
    path = "/api/churns/{id}",
    tag = "Churns",
    params(("id" = Uuid, Path, description = "ID do churn")),
    responses(
        (status = 200, description = "Churn encontrado", body = ChurnComUsuario),
        (status = 404, description = "Churn não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn buscar(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let churn = app_state.churn_service.buscar(id).await?;

    Ok(Json(churn))
}

// POST /api/churns
#[utoipa::path(
    post,
    path = "/api/churns",
    tag = "Churns",
    request_body = CriarChurnPayload,
    responses(
        (status = 201, description = "Churn registrado; cliente vai para HISTORICO", body = Churn),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn criar(
    State(app_state): State<AppState>,
    Json(payload): Json<CriarChurnPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let churn = app_state.churn_service.criar(payload).await?;

    Ok((StatusCode::CREATED, Json(churn)))
}

// POST /api/churns/{id}/reverter
#[utoipa::path(
    post,
    path = "/api/churns/{id}/reverter",
    tag = "Churns",
    params(("id" = Uuid, Path, description = "ID do churn")),
    request_body = ReverterChurnPayload,
    responses(
        (status = 200, description = "Churn revertido; cliente reativado conforme o vencimento", body = Churn),
        (status = 400, description = "Este churn já foi revertido"),
        (status = 404, description = "Churn não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn reverter(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReverterChurnPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let churn = app_state.churn_service.reverter(id, payload).await?;

    Ok(Json(churn))
}

// PUT /api/churns/{id}
#[utoipa::path(
    put,
    path = "/api/churns/{id}",
    tag = "Churns",
    params(("id" = Uuid, Path, description = "ID do churn")),
    request_body = AtualizarChurnPayload,
    responses(
        (status = 200, description = "Churn atualizado", body = Churn),
        (status = 404, description = "Churn não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn atualizar(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AtualizarChurnPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let churn = app_state.churn_service.atualizar(id, payload).await?;

    Ok(Json(churn))
}

// DELETE /api/churns/{id}
#[utoipa::path(
    delete,
    path = "/api/churns/{id}",
    tag = "Churns",
    params(("id" = Uuid, Path, description = "ID do churn")),
    responses(
        (status = 204, description = "Churn removido"),
        (status = 404, description = "Churn não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn excluir(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.churn_service.excluir(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
