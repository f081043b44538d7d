// src/services/despesa_service.rs

use chrono::{Datelike, NaiveTime};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    common::paginacao::{PaginacaoQuery, RespostaPaginada},
    db::{DespesaFiltros, DespesaRepository},
    models::despesa::{
        AtualizarDespesa, AtualizarDespesaPayload, CriarDespesaPayload, Despesa,
        EstatisticasDespesas, NovaDespesa, StatusDespesa, TotalPorCategoria, TotalPorCompetencia,
    },
};

// Despesas são consultadas mês a mês; o limite padrão maior evita paginação
// desnecessária na tela de lançamentos.
const LIMITE_PADRAO_DESPESAS: u32 = 50;

#[derive(Clone)]
pub struct DespesaService {
    despesas: DespesaRepository,
    pool: PgPool,
}

impl DespesaService {
    pub fn new(despesas: DespesaRepository, pool: PgPool) -> Self {
        Self { despesas, pool }
    }

    pub async fn listar(
        &self,
        filtros: &DespesaFiltros,
        paginacao: &PaginacaoQuery,
    ) -> Result<RespostaPaginada<Despesa>, AppError> {
        let paginacao = paginacao.ou_limite(LIMITE_PADRAO_DESPESAS);

        let despesas = self.despesas.find_many(filtros, &paginacao).await?;
        let total = self.despesas.count(filtros).await?;

        Ok(RespostaPaginada::nova(despesas, &paginacao, total))
    }

    pub async fn buscar(&self, id: Uuid) -> Result<Despesa, AppError> {
        self.despesas
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NaoEncontrado("Despesa não encontrada".into()))
    }

    pub async fn criar(&self, payload: CriarDespesaPayload) -> Result<Despesa, AppError> {
        let dados = NovaDespesa {
            data: payload.data.and_time(NaiveTime::MIN).and_utc(),
            descricao: payload.descricao,
            categoria: payload.categoria,
            valor: payload.valor,
            conta: payload.conta,
            status: payload.status.unwrap_or(StatusDespesa::Pendente),
            indicador: payload.indicador,
            // Competência não informada segue a data do lançamento.
            competencia_mes: payload
                .competencia_mes
                .unwrap_or(payload.data.month() as i32),
            competencia_ano: payload.competencia_ano.unwrap_or(payload.data.year()),
            obs: payload.obs,
        };

        self.despesas.create(&self.pool, &dados).await
    }

    pub async fn atualizar(
        &self,
        id: Uuid,
        payload: AtualizarDespesaPayload,
    ) -> Result<Despesa, AppError> {
        self.buscar(id).await?;

        let mudancas = AtualizarDespesa {
            data: payload.data.map(|d| d.and_time(NaiveTime::MIN).and_utc()),
            descricao: payload.descricao,
            categoria: payload.categoria,
            valor: payload.valor,
            conta: payload.conta,
            status: payload.status,
            indicador: payload.indicador,
            competencia_mes: payload.competencia_mes,
            competencia_ano: payload.competencia_ano,
            obs: payload.obs,
        };

        self.despesas.update(&self.pool, id, &mudancas).await
    }

    pub async fn marcar_paga(&self, id: Uuid) -> Result<Despesa, AppError> {
        self.mudar_status(id, StatusDespesa::Pago).await
    }

    pub async fn marcar_pendente(&self, id: Uuid) -> Result<Despesa, AppError> {
        self.mudar_status(id, StatusDespesa::Pendente).await
    }

    async fn mudar_status(&self, id: Uuid, status: StatusDespesa) -> Result<Despesa, AppError> {
        self.buscar(id).await?;

        let mudancas = AtualizarDespesa {
            status: Some(status),
            ..Default::default()
        };

        self.despesas.update(&self.pool, id, &mudancas).await
    }

    pub async fn excluir(&self, id: Uuid) -> Result<(), AppError> {
        self.buscar(id).await?;
        self.despesas.delete(&self.pool, id).await
    }

    pub async fn stats(&self, filtros: &DespesaFiltros) -> Result<EstatisticasDespesas, AppError> {
        let pagas = DespesaFiltros {
            status: Some(StatusDespesa::Pago),
            ..filtros.clone()
        };
        let pendentes = DespesaFiltros {
            status: Some(StatusDespesa::Pendente),
            ..filtros.clone()
        };

        let total_despesas = self.despesas.count(filtros).await?;
        let valor_total = self.despesas.sum_valores(filtros).await?;
        let valor_pago = self.despesas.sum_valores(&pagas).await?;
        let valor_pendente = self.despesas.sum_valores(&pendentes).await?;
        let despesas_pagas = self.despesas.count(&pagas).await?;
        let despesas_pendentes = self.despesas.count(&pendentes).await?;

        Ok(EstatisticasDespesas {
            total_despesas,
            valor_total,
            valor_pago,
            valor_pendente,
            despesas_pagas,
            despesas_pendentes,
        })
    }

    pub async fn relatorio_por_categoria(
        &self,
        filtros: &DespesaFiltros,
    ) -> Result<Vec<TotalPorCategoria>, AppError> {
        self.despesas.group_by_categoria(filtros).await
    }

    pub async fn relatorio_por_competencia(
        &self,
        filtros: &DespesaFiltros,
    ) -> Result<Vec<TotalPorCompetencia>, AppError> {
        self.despesas.group_by_competencia(filtros).await
    }
}
