// src/db/comissao_repo.rs

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{Executor, PgPool, Postgres, QueryBuilder};
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    common::error::{conflito_de_unicidade, AppError},
    common::paginacao::PaginacaoQuery,
    models::comissao::{
        AtualizarComissao, Comissao, ComissaoComPagamento, ExtratoComissao, IndicadoresPorMes,
        NovaComissao, TotalPorIndicador, TotalPorIndicadorRegra, TotalPorMesRegra,
    },
    models::pagamento::RegraTipo,
};

// Resumo do pagamento de origem embutido nas listagens.
const COLUNAS_PAGAMENTO: &str = "p.id AS p_id, p.data_pagto AS p_data_pagto, \
     p.valor AS p_valor, p.metodo AS p_metodo, p.usuario_id AS p_usuario_id";

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ComissaoFiltros {
    pub indicador: Option<String>,
    pub regra_tipo: Option<RegraTipo>,
    pub mes_ref: Option<String>,
    pub pagamento_id: Option<Uuid>,
}

impl ComissaoFiltros {
    fn aplicar(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        if let Some(ref indicador) = self.indicador {
            qb.push(" AND c.indicador = ");
            qb.push_bind(indicador.clone());
        }
        if let Some(regra) = self.regra_tipo {
            qb.push(" AND c.regra_tipo = ");
            qb.push_bind(regra);
        }
        if let Some(ref mes_ref) = self.mes_ref {
            qb.push(" AND c.mes_ref = ");
            qb.push_bind(mes_ref.clone());
        }
        if let Some(pagamento_id) = self.pagamento_id {
            qb.push(" AND c.pagamento_id = ");
            qb.push_bind(pagamento_id);
        }
    }
}

// COALESCE garante soma 0 (nunca NULL) quando o filtro não casa com nada.
const SQL_SOMA: &str = "SELECT COALESCE(SUM(c.valor), 0) FROM comissoes c WHERE 1=1";

#[derive(Clone)]
pub struct ComissaoRepository {
    pool: PgPool,
}

impl ComissaoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  LEITURA
    // =========================================================================

    pub async fn find_many(
        &self,
        filtros: &ComissaoFiltros,
        paginacao: &PaginacaoQuery,
    ) -> Result<Vec<ComissaoComPagamento>, AppError> {
        let mut qb = QueryBuilder::new(format!(
            "SELECT c.*, {COLUNAS_PAGAMENTO} FROM comissoes c \
             JOIN pagamentos p ON p.id = c.pagamento_id WHERE 1=1"
        ));
        filtros.aplicar(&mut qb);
        qb.push(" ORDER BY c.created_at DESC LIMIT ");
        qb.push_bind(paginacao.take());
        qb.push(" OFFSET ");
        qb.push_bind(paginacao.skip());

        let comissoes = qb
            .build_query_as::<ComissaoComPagamento>()
            .fetch_all(&self.pool)
            .await?;

        Ok(comissoes)
    }

    pub async fn count(&self, filtros: &ComissaoFiltros) -> Result<i64, AppError> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM comissoes c WHERE 1=1");
        filtros.aplicar(&mut qb);

        let total = qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        Ok(total)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ComissaoComPagamento>, AppError> {
        let comissao = sqlx::query_as::<_, ComissaoComPagamento>(&format!(
            "SELECT c.*, {COLUNAS_PAGAMENTO} FROM comissoes c \
             JOIN pagamentos p ON p.id = c.pagamento_id WHERE c.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comissao)
    }

    pub async fn find_by_pagamento(&self, pagamento_id: Uuid) -> Result<Option<Comissao>, AppError> {
        let comissao =
            sqlx::query_as::<_, Comissao>("SELECT * FROM comissoes WHERE pagamento_id = $1")
                .bind(pagamento_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(comissao)
    }

    // Extrato do indicador: comissão + data do pagamento + cliente.
    pub async fn find_by_indicador(
        &self,
        indicador: &str,
        mes_ref: Option<&str>,
    ) -> Result<Vec<ExtratoComissao>, AppError> {
        let mut qb = QueryBuilder::new(
            "SELECT c.id, c.mes_ref AS mes, c.regra_tipo, c.valor, p.data_pagto, \
             u.id AS u_id, u.email_login AS u_email_login, \
             u.nome_completo AS u_nome_completo, u.status_final AS u_status_final \
             FROM comissoes c \
             JOIN pagamentos p ON p.id = c.pagamento_id \
             JOIN usuarios u ON u.id = p.usuario_id \
             WHERE c.indicador = ",
        );
        qb.push_bind(indicador.to_owned());
        if let Some(mes_ref) = mes_ref {
            qb.push(" AND c.mes_ref = ");
            qb.push_bind(mes_ref.to_owned());
        }
        qb.push(" ORDER BY p.data_pagto DESC");

        let extrato = qb
            .build_query_as::<ExtratoComissao>()
            .fetch_all(&self.pool)
            .await?;

        Ok(extrato)
    }

    // =========================================================================
    //  AGREGAÇÕES
    // =========================================================================

    pub async fn sum_valores(&self, filtros: &ComissaoFiltros) -> Result<Decimal, AppError> {
        let mut qb = QueryBuilder::new(SQL_SOMA);
        filtros.aplicar(&mut qb);

        let soma = qb
            .build_query_scalar::<Decimal>()
            .fetch_one(&self.pool)
            .await?;

        Ok(soma)
    }

    pub async fn group_by_indicador(
        &self,
        filtros: &ComissaoFiltros,
    ) -> Result<Vec<TotalPorIndicador>, AppError> {
        let mut qb = QueryBuilder::new(
            "SELECT c.indicador, COUNT(*) AS quantidade, COALESCE(SUM(c.valor), 0) AS valor_total \
             FROM comissoes c WHERE 1=1",
        );
        filtros.aplicar(&mut qb);
        qb.push(" GROUP BY c.indicador ORDER BY valor_total DESC");

        let totais = qb
            .build_query_as::<TotalPorIndicador>()
            .fetch_all(&self.pool)
            .await?;

        Ok(totais)
    }

    // Uma única consulta agrupada alimenta a consolidação por indicador,
    // no lugar de quatro contagens por indicador.
    pub async fn group_by_indicador_regra(
        &self,
        filtros: &ComissaoFiltros,
    ) -> Result<Vec<TotalPorIndicadorRegra>, AppError> {
        let mut qb = QueryBuilder::new(
            "SELECT c.indicador, c.regra_tipo, COUNT(*) AS quantidade, \
             COALESCE(SUM(c.valor), 0) AS valor_total \
             FROM comissoes c WHERE 1=1",
        );
        filtros.aplicar(&mut qb);
        qb.push(" GROUP BY c.indicador, c.regra_tipo ORDER BY c.indicador ASC");

        let totais = qb
            .build_query_as::<TotalPorIndicadorRegra>()
            .fetch_all(&self.pool)
            .await?;

        Ok(totais)
    }

    pub async fn group_by_mes_regra(
        &self,
        filtros: &ComissaoFiltros,
    ) -> Result<Vec<TotalPorMesRegra>, AppError> {
        let mut qb = QueryBuilder::new(
            "SELECT c.mes_ref, c.regra_tipo, COUNT(*) AS quantidade, \
             COALESCE(SUM(c.valor), 0) AS valor_total \
             FROM comissoes c WHERE 1=1",
        );
        filtros.aplicar(&mut qb);
        qb.push(" GROUP BY c.mes_ref, c.regra_tipo ORDER BY c.mes_ref ASC");

        let totais = qb
            .build_query_as::<TotalPorMesRegra>()
            .fetch_all(&self.pool)
            .await?;

        Ok(totais)
    }

    pub async fn group_by_mes_indicador(
        &self,
        filtros: &ComissaoFiltros,
    ) -> Result<Vec<IndicadoresPorMes>, AppError> {
        let mut qb = QueryBuilder::new(
            "SELECT c.mes_ref, COUNT(DISTINCT c.indicador) AS indicadores \
             FROM comissoes c WHERE 1=1",
        );
        filtros.aplicar(&mut qb);
        qb.push(" GROUP BY c.mes_ref ORDER BY c.mes_ref ASC");

        let totais = qb
            .build_query_as::<IndicadoresPorMes>()
            .fetch_all(&self.pool)
            .await?;

        Ok(totais)
    }

    // =========================================================================
    //  ESCRITA
    // =========================================================================

    pub async fn create<'e, E>(
        &self,
        executor: E,
        dados: &NovaComissao,
    ) -> Result<Comissao, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let comissao = sqlx::query_as::<_, Comissao>(
            r#"
            INSERT INTO comissoes (pagamento_id, indicador, valor, mes_ref, regra_tipo)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(dados.pagamento_id)
        .bind(&dados.indicador)
        .bind(dados.valor)
        .bind(&dados.mes_ref)
        .bind(dados.regra_tipo)
        .fetch_one(executor)
        .await
        .map_err(|e| conflito_de_unicidade(e, "Já existe comissão para este pagamento"))?;

        Ok(comissao)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        mudancas: &AtualizarComissao,
    ) -> Result<Comissao, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let comissao = sqlx::query_as::<_, Comissao>(
            r#"
            UPDATE comissoes SET
                indicador = COALESCE($2, indicador),
                regra_tipo = COALESCE($3, regra_tipo),
                valor = COALESCE($4, valor),
                mes_ref = COALESCE($5, mes_ref),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&mudancas.indicador)
        .bind(mudancas.regra_tipo)
        .bind(mudancas.valor)
        .bind(&mudancas.mes_ref)
        .fetch_one(executor)
        .await?;

        Ok(comissao)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM comissoes WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql_com(filtros: &ComissaoFiltros) -> String {
        let mut qb = QueryBuilder::new("WHERE 1=1");
        filtros.aplicar(&mut qb);
        qb.sql().to_string()
    }

    #[test]
    fn filtros_cobrem_os_quatro_campos() {
        let filtros = ComissaoFiltros {
            indicador: Some("João Silva".into()),
            regra_tipo: Some(RegraTipo::Recorrente),
            mes_ref: Some("2024-10".into()),
            pagamento_id: Some(Uuid::new_v4()),
        };
        let sql = sql_com(&filtros);
        for trecho in [
            "c.indicador =",
            "c.regra_tipo =",
            "c.mes_ref =",
            "c.pagamento_id =",
        ] {
            assert!(sql.contains(trecho), "faltou {trecho} em {sql}");
        }
    }

    #[test]
    fn sem_filtros_nao_ha_predicado() {
        assert_eq!(sql_com(&ComissaoFiltros::default()), "WHERE 1=1");
    }

    // Sem linhas a soma devolve 0, não NULL.
    #[test]
    fn soma_protege_conjunto_vazio_com_coalesce() {
        let mut qb = QueryBuilder::new(SQL_SOMA);
        ComissaoFiltros::default().aplicar(&mut qb);
        assert!(qb.sql().starts_with("SELECT COALESCE(SUM("));
    }

    #[test]
    fn count_e_listagem_compartilham_predicado() {
        let filtros = ComissaoFiltros {
            indicador: Some("João Silva".into()),
            mes_ref: Some("2024-10".into()),
            ..Default::default()
        };

        let mut a = QueryBuilder::new("");
        filtros.aplicar(&mut a);
        let mut b = QueryBuilder::new("");
        filtros.aplicar(&mut b);

        assert_eq!(a.sql(), b.sql());
    }
}
