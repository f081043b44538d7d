// src/handlers/comissoes.rs

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
    common::paginacao::{PaginacaoQuery, RespostaPaginada},
    config::AppState,
    db::ComissaoFiltros,
    models::comissao::{
        AtualizarComissaoPayload, Comissao, ComissaoComPagamento, ConsolidacaoIndicador,
        CriarComissaoPayload, EstatisticasComissoes, ExtratoComissao, RelatorioMensal,
    },
};

// GET /api/comissoes
#[utoipa::path(
    get,
    path = "/api/comissoes",
    tag = "Comissoes",
    params(PaginacaoQuery, ComissaoFiltros),
    responses(
        (status = 200, description = "Listagem paginada de comissões com resumo do pagamento", body = RespostaPaginada<ComissaoComPagamento>)
    ),
    security(("api_jwt" = []))
)]
pub async fn listar(
    State(app_state): State<AppState>,
    Query(paginacao): Query<PaginacaoQuery>,
    Query(filtros): Query<ComissaoFiltros>,
) -> Result<impl IntoResponse, AppError> {
    paginacao.validate()?;

    let resposta = app_state
        .comissao_service
        .listar(&filtros, &paginacao)
        .await?;

    Ok(Json(resposta))
}

// GET /api/comissoes/stats
#[utoipa::path(
    get,
    path = "/api/comissoes/stats",
    tag = "Comissoes",
    params(ComissaoFiltros),
    responses(
        (status = 200, description = "Totais gerais e por regra sob o mesmo filtro da listagem", body = EstatisticasComissoes)
    ),
    security(("api_jwt" = []))
)]
pub async fn stats(
    State(app_state): State<AppState>,
    Query(filtros): Query<ComissaoFiltros>,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.comissao_service.stats(&filtros).await?;

    Ok(Json(stats))
}

// GET /api/comissoes/consolidacao
#[utoipa::path(
    get,
    path = "/api/comissoes/consolidacao",
    tag = "Comissoes",
    params(ComissaoFiltros),
    responses(
        (status = 200, description = "Consolidação por indicador (PRIMEIRO x RECORRENTE), maior total primeiro", body = Vec<ConsolidacaoIndicador>)
    ),
    security(("api_jwt" = []))
)]
pub async fn consolidacao(
    State(app_state): State<AppState>,
    Query(filtros): Query<ComissaoFiltros>,
) -> Result<impl IntoResponse, AppError> {
    let consolidacao = app_state
        .comissao_service
        .consolidacao_por_indicador(&filtros)
        .await?;

    Ok(Json(consolidacao))
}

// GET /api/comissoes/relatorio-mensal
#[utoipa::path(
    get,
    path = "/api/comissoes/relatorio-mensal",
    tag = "Comissoes",
    params(ComissaoFiltros),
    responses(
        (status = 200, description = "Série mensal de comissões por regra, em ordem cronológica", body = Vec<RelatorioMensal>)
    ),
    security(("api_jwt" = []))
)]
pub async fn relatorio_mensal(
    State(app_state): State<AppState>,
    Query(filtros): Query<ComissaoFiltros>,
) -> Result<impl IntoResponse, AppError> {
    let relatorio = app_state.comissao_service.relatorio_por_mes(&filtros).await?;

    Ok(Json(relatorio))
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ExtratoParams {
    /// Restringe o extrato a um mês de referência (YYYY-MM).
    #[param(example = "2024-10")]
    pub mes_ref: Option<String>,
}

// GET /api/comissoes/extrato/{indicador}
#[utoipa::path(
    get,
    path = "/api/comissoes/extrato/{indicador}",
    tag = "Comissoes",
    params(("indicador" = String, Path, description = "Indicador (texto livre)"), ExtratoParams),
    responses(
        (status = 200, description = "Extrato de comissões do indicador", body = Vec<ExtratoComissao>)
    ),
    security(("api_jwt" = []))
)]
pub async fn extrato(
    State(app_state): State<AppState>,
    Path(indicador): Path<String>,
    Query(params): Query<ExtratoParams>,
) -> Result<impl IntoResponse, AppError> {
    let extrato = app_state
        .comissao_service
        .extrato_por_indicador(&indicador, params.mes_ref.as_deref())
        .await?;

    Ok(Json(extrato))
}

// GET /api/comissoes/{id}
#[utoipa::path(
    get,
    path = "/api/comissoes/{id}",
    tag = "Comissoes",
    params(("id" = Uuid, Path, description = "ID da comissão")),
    responses(
        (status = 200, description = "Comissão encontrada", body = ComissaoComPagamento),
        (status = 404, description = "Comissão não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn buscar(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let comissao = app_state.comissao_service.buscar(id).await?;

    Ok(Json(comissao))
}

// POST /api/comissoes
#[utoipa::path(
    post,
    path = "/api/comissoes",
    tag = "Comissoes",
    request_body = CriarComissaoPayload,
    responses(
        (status = 201, description = "Comissão criada manualmente", body = Comissao),
        (status = 409, description = "Pagamento já possui comissão")
    ),
    security(("api_jwt" = []))
)]
pub async fn criar(
    State(app_state): State<AppState>,
    Json(payload): Json<CriarComissaoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let comissao = app_state.comissao_service.criar(payload).await?;

    Ok((StatusCode::CREATED, Json(comissao)))
}

// PUT /api/comissoes/{id}
#[utoipa::path(
    put,
    path = "/api/comissoes/{id}",
    tag = "Comissoes",
    params(("id" = Uuid, Path, description = "ID da comissão")),
    request_body = AtualizarComissaoPayload,
    responses(
        (status = 200, description = "Comissão atualizada", body = Comissao),
        (status = 404, description = "Comissão não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn atualizar(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AtualizarComissaoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let comissao = app_state.comissao_service.atualizar(id, payload).await?;

    Ok(Json(comissao))
}

// DELETE /api/comissoes/{id}
#[utoipa::path(
    delete,
    path = "/api/comissoes/{id}",
    tag = "Comissoes",
    params(("id" = Uuid, Path, description = "ID da comissão")),
    responses(
        (status = 204, description = "Comissão removida"),
        (status = 404, description = "Comissão não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn excluir(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.comissao_service.excluir(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
