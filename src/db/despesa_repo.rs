// src/db/despesa_repo.rs

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{Executor, PgPool, Postgres, QueryBuilder};
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    common::paginacao::PaginacaoQuery,
    models::despesa::{
        AtualizarDespesa, Despesa, NovaDespesa, StatusDespesa, TotalPorCategoria,
        TotalPorCompetencia,
    },
};

// "MM/YYYY" -> (mes, ano). Entrada malformada é descartada em silêncio.
fn parse_competencia(valor: &str) -> Option<(i32, i32)> {
    let (mes, ano) = valor.split_once('/')?;
    let mes: i32 = mes.parse().ok()?;
    let ano: i32 = ano.parse().ok()?;
    if !(1..=12).contains(&mes) {
        return None;
    }
    Some((mes, ano))
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DespesaFiltros {
    pub categoria: Option<String>,
    pub status: Option<StatusDespesa>,
    pub conta: Option<String>,
    pub indicador: Option<String>,
    pub mes: Option<i32>,
    pub ano: Option<i32>,
    pub competencia: Option<String>,
}

impl DespesaFiltros {
    fn aplicar(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        if let Some(ref categoria) = self.categoria {
            qb.push(" AND d.categoria = ");
            qb.push_bind(categoria.clone());
        }
        if let Some(status) = self.status {
            qb.push(" AND d.status = ");
            qb.push_bind(status);
        }
        if let Some(ref conta) = self.conta {
            qb.push(" AND d.conta = ");
            qb.push_bind(conta.clone());
        }
        if let Some(ref indicador) = self.indicador {
            qb.push(" AND d.indicador = ");
            qb.push_bind(indicador.clone());
        }
        if let Some(mes) = self.mes {
            qb.push(" AND d.competencia_mes = ");
            qb.push_bind(mes);
        }
        if let Some(ano) = self.ano {
            qb.push(" AND d.competencia_ano = ");
            qb.push_bind(ano);
        }
        if let Some((mes, ano)) = self.competencia.as_deref().and_then(parse_competencia) {
            qb.push(" AND d.competencia_mes = ");
            qb.push_bind(mes);
            qb.push(" AND d.competencia_ano = ");
            qb.push_bind(ano);
        }
    }
}

// COALESCE garante soma 0 (nunca NULL) quando o filtro não casa com nada.
const SQL_SOMA: &str = "SELECT COALESCE(SUM(d.valor), 0) FROM despesas d WHERE 1=1";

#[derive(Clone)]
pub struct DespesaRepository {
    pool: PgPool,
}

impl DespesaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_many(
        &self,
        filtros: &DespesaFiltros,
        paginacao: &PaginacaoQuery,
    ) -> Result<Vec<Despesa>, AppError> {
        let mut qb = QueryBuilder::new("SELECT d.* FROM despesas d WHERE 1=1");
        filtros.aplicar(&mut qb);
        qb.push(
            " ORDER BY d.competencia_ano DESC, d.competencia_mes DESC, d.created_at DESC LIMIT ",
        );
        qb.push_bind(paginacao.take());
        qb.push(" OFFSET ");
        qb.push_bind(paginacao.skip());

        let despesas = qb.build_query_as::<Despesa>().fetch_all(&self.pool).await?;

        Ok(despesas)
    }

    pub async fn count(&self, filtros: &DespesaFiltros) -> Result<i64, AppError> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM despesas d WHERE 1=1");
        filtros.aplicar(&mut qb);

        let total = qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        Ok(total)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Despesa>, AppError> {
        let despesa = sqlx::query_as::<_, Despesa>("SELECT * FROM despesas WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(despesa)
    }

    pub async fn sum_valores(&self, filtros: &DespesaFiltros) -> Result<Decimal, AppError> {
        let mut qb = QueryBuilder::new(SQL_SOMA);
        filtros.aplicar(&mut qb);

        let soma = qb
            .build_query_scalar::<Decimal>()
            .fetch_one(&self.pool)
            .await?;

        Ok(soma)
    }

    pub async fn group_by_categoria(
        &self,
        filtros: &DespesaFiltros,
    ) -> Result<Vec<TotalPorCategoria>, AppError> {
        let mut qb = QueryBuilder::new(
            "SELECT d.categoria, COUNT(*) AS quantidade, COALESCE(SUM(d.valor), 0) AS valor_total \
             FROM despesas d WHERE 1=1",
        );
        filtros.aplicar(&mut qb);
        qb.push(" GROUP BY d.categoria ORDER BY valor_total DESC");

        let totais = qb
            .build_query_as::<TotalPorCategoria>()
            .fetch_all(&self.pool)
            .await?;

        Ok(totais)
    }

    pub async fn group_by_competencia(
        &self,
        filtros: &DespesaFiltros,
    ) -> Result<Vec<TotalPorCompetencia>, AppError> {
        let mut qb = QueryBuilder::new(
            "SELECT d.competencia_ano, d.competencia_mes, COUNT(*) AS quantidade, \
             COALESCE(SUM(d.valor), 0) AS valor_total \
             FROM despesas d WHERE 1=1",
        );
        filtros.aplicar(&mut qb);
        qb.push(" GROUP BY d.competencia_ano, d.competencia_mes \
             ORDER BY d.competencia_ano DESC, d.competencia_mes DESC");

        let totais = qb
            .build_query_as::<TotalPorCompetencia>()
            .fetch_all(&self.pool)
            .await?;

        Ok(totais)
    }

    pub async fn create<'e, E>(&self, executor: E, dados: &NovaDespesa) -> Result<Despesa, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let despesa = sqlx::query_as::<_, Despesa>(
            r#"
            INSERT INTO despesas
                (data, descricao, categoria, valor, conta, status, indicador,
                 competencia_mes, competencia_ano, obs)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(dados.data)
        .bind(&dados.descricao)
        .bind(&dados.categoria)
        .bind(dados.valor)
        .bind(&dados.conta)
        .bind(dados.status)
        .bind(&dados.indicador)
        .bind(dados.competencia_mes)
        .bind(dados.competencia_ano)
        .bind(&dados.obs)
        .fetch_one(executor)
        .await?;

        Ok(despesa)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        mudancas: &AtualizarDespesa,
    ) -> Result<Despesa, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let despesa = sqlx::query_as::<_, Despesa>(
            r#"
            UPDATE despesas SET
                data = COALESCE($2, data),
                descricao = COALESCE($3, descricao),
                categoria = COALESCE($4, categoria),
                valor = COALESCE($5, valor),
                conta = COALESCE($6, conta),
                status = COALESCE($7, status),
                indicador = COALESCE($8, indicador),
                competencia_mes = COALESCE($9, competencia_mes),
                competencia_ano = COALESCE($10, competencia_ano),
                obs = COALESCE($11, obs),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(mudancas.data)
        .bind(&mudancas.descricao)
        .bind(&mudancas.categoria)
        .bind(mudancas.valor)
        .bind(&mudancas.conta)
        .bind(mudancas.status)
        .bind(&mudancas.indicador)
        .bind(mudancas.competencia_mes)
        .bind(mudancas.competencia_ano)
        .bind(&mudancas.obs)
        .fetch_one(executor)
        .await?;

        Ok(despesa)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM despesas WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql_com(filtros: &DespesaFiltros) -> String {
        let mut qb = QueryBuilder::new("WHERE 1=1");
        filtros.aplicar(&mut qb);
        qb.sql().to_string()
    }

    #[test]
    fn parse_competencia_aceita_mm_yyyy() {
        assert_eq!(parse_competencia("10/2024"), Some((10, 2024)));
        assert_eq!(parse_competencia("01/2023"), Some((1, 2023)));
    }

    #[test]
    fn parse_competencia_descarta_entrada_malformada() {
        assert_eq!(parse_competencia("2024-10"), None);
        assert_eq!(parse_competencia("13/2024"), None);
        assert_eq!(parse_competencia("abc"), None);
        assert_eq!(parse_competencia("10/ano"), None);
    }

    #[test]
    fn competencia_vira_duas_igualdades() {
        let filtros = DespesaFiltros {
            competencia: Some("07/2024".into()),
            ..Default::default()
        };
        let sql = sql_com(&filtros);
        assert!(sql.contains("competencia_mes ="));
        assert!(sql.contains("competencia_ano ="));
    }

    #[test]
    fn competencia_malformada_nao_filtra() {
        let filtros = DespesaFiltros {
            competencia: Some("junho".into()),
            ..Default::default()
        };
        assert_eq!(sql_com(&filtros), "WHERE 1=1");
    }

    // Sem linhas a soma devolve 0, não NULL.
    #[test]
    fn soma_protege_conjunto_vazio_com_coalesce() {
        let mut qb = QueryBuilder::new(SQL_SOMA);
        DespesaFiltros::default().aplicar(&mut qb);
        assert!(qb.sql().starts_with("SELECT COALESCE(SUM("));
    }

    #[test]
    fn count_e_listagem_compartilham_predicado() {
        let filtros = DespesaFiltros {
            categoria: Some("Ferramentas".into()),
            status: Some(StatusDespesa::Pago),
            competencia: Some("10/2024".into()),
            ..Default::default()
        };

        let mut a = QueryBuilder::new("");
        filtros.aplicar(&mut a);
        let mut b = QueryBuilder::new("");
        filtros.aplicar(&mut b);

        assert_eq!(a.sql(), b.sql());
    }
}
