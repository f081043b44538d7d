// src/handlers/pagamentos.rs

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
    db::PagamentoFiltros,
    models::pagamento::{
        AtualizarPagamentoPayload, CriarPagamentoPayload, EstatisticasPagamentos, Pagamento,
        PagamentoComUsuario,
    },
};

// GET /api/pagamentos
#[utoipa::path(
    get,
    path = "/api/pagamentos",
    tag = "Pagamentos",
    params(PaginacaoQuery, PagamentoFiltros),
    responses(
        (status = 200, description = "Listagem paginada de pagamentos com resumo do cliente", body = RespostaPaginada<PagamentoComUsuario>)
    ),
    security(("api_jwt" = []))
)]
pub async fn listar(
    State(app_state): State<AppState>,
    Query(paginacao): Query<PaginacaoQuery>,
    Query(filtros): Query<PagamentoFiltros>,
) -> Result<impl IntoResponse, AppError> {
    paginacao.validate()?;

    let resposta = app_state
        .pagamento_service
        .listar(&filtros, &paginacao)
        .await?;

    Ok(Json(resposta))
}

// GET /api/pagamentos/stats
#[utoipa::path(
    get,
    path = "/api/pagamentos/stats",
    tag = "Pagamentos",
    params(PagamentoFiltros),
    responses(
        (status = 200, description = "Totais e quebra por método sob o mesmo filtro da listagem", body = EstatisticasPagamentos)
    ),
    security(("api_jwt" = []))
)]
pub async fn stats(
    State(app_state): State<AppState>,
    Query(filtros): Query<PagamentoFiltros>,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.pagamento_service.stats(&filtros).await?;

    Ok(Json(stats))
}

// GET /api/pagamentos/{id}
#[utoipa::path(
    get,
    path = "/api/pagamentos/{id}",
    tag = "Pagamentos",
    params(("id" = Uuid, Path, description = "ID do pagamento")),
    responses(
        (status = 200, description = "Pagamento encontrado", body = PagamentoComUsuario),
        (status = 404, description = "Pagamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn buscar(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let pagamento = app_state.pagamento_service.buscar(id).await?;

    Ok(Json(pagamento))
}

// POST /api/pagamentos
#[utoipa::path(
    post,
    path = "/api/pagamentos",
    tag = "Pagamentos",
    request_body = CriarPagamentoPayload,
    responses(
        (status = 201, description = "Pagamento registrado; cliente reativado e comissão gerada quando elegível", body = Pagamento),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn criar(
    State(app_state): State<AppState>,
    Json(payload): Json<CriarPagamentoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let pagamento = app_state.pagamento_service.criar(payload).await?;

    Ok((StatusCode::CREATED, Json(pagamento)))
}

// PUT /api/pagamentos/{id}
#[utoipa::path(
    put,
    path = "/api/pagamentos/{id}",
    tag = "Pagamentos",
    params(("id" = Uuid, Path, description = "ID do pagamento")),
    request_body = AtualizarPagamentoPayload,
    responses(
        (status = 200, description = "Pagamento atualizado", body = Pagamento),
        (status = 404, description = "Pagamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn atualizar(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AtualizarPagamentoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let pagamento = app_state.pagamento_service.atualizar(id, payload).await?;

    Ok(Json(pagamento))
}

// DELETE /api/pagamentos/{id}
#[utoipa::path(
    delete,
    path = "/api/pagamentos/{id}",
    tag = "Pagamentos",
    params(("id" = Uuid, Path, description = "ID do pagamento")),
    responses(
        (status = 204, description = "Pagamento removido junto com a comissão 1:1"),
        (status = 404, description = "Pagamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn excluir(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.pagamento_service.excluir(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
