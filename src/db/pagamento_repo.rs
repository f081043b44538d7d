// src/db/pagamento_repo.rs

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{Executor, PgPool, Postgres, QueryBuilder};
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    common::paginacao::PaginacaoQuery,
    models::pagamento::{
        AtualizarPagamento, MetodoPagamento, NovoPagamento, Pagamento, PagamentoComUsuario,
        RegraTipo, TotalPorMetodo,
    },
};

// Colunas do resumo de usuário embutido nas listagens.
const COLUNAS_USUARIO: &str = "u.id AS u_id, u.email_login AS u_email_login, \
     u.nome_completo AS u_nome_completo, u.status_final AS u_status_final";

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PagamentoFiltros {
    pub usuario_id: Option<Uuid>,
    pub metodo: Option<MetodoPagamento>,
    pub conta: Option<String>,
    pub regra_tipo: Option<RegraTipo>,
    pub mes: Option<String>,
    pub elegivel_comissao: Option<bool>,
}

impl PagamentoFiltros {
    fn aplicar(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        if let Some(usuario_id) = self.usuario_id {
            qb.push(" AND p.usuario_id = ");
            qb.push_bind(usuario_id);
        }
        if let Some(metodo) = self.metodo {
            qb.push(" AND p.metodo = ");
            qb.push_bind(metodo);
        }
        if let Some(ref conta) = self.conta {
            qb.push(" AND p.conta = ");
            qb.push_bind(conta.clone());
        }
        if let Some(regra) = self.regra_tipo {
            qb.push(" AND p.regra_tipo = ");
            qb.push_bind(regra);
        }
        if let Some(ref mes) = self.mes {
            qb.push(" AND p.mes_pagto = ");
            qb.push_bind(mes.clone());
        }
        if let Some(elegivel) = self.elegivel_comissao {
            qb.push(" AND p.elegivel_comissao = ");
            qb.push_bind(elegivel);
        }
    }
}

// COALESCE garante soma 0 (nunca NULL) quando o filtro não casa com nada.
const SQL_SOMA: &str = "SELECT COALESCE(SUM(p.valor), 0) FROM pagamentos p WHERE 1=1";

#[derive(Clone)]
pub struct PagamentoRepository {
    pool: PgPool,
}

impl PagamentoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_many(
        &self,
        filtros: &PagamentoFiltros,
        paginacao: &PaginacaoQuery,
    ) -> Result<Vec<PagamentoComUsuario>, AppError> {
        let mut qb = QueryBuilder::new(format!(
            "SELECT p.*, {COLUNAS_USUARIO} FROM pagamentos p \
             JOIN usuarios u ON u.id = p.usuario_id WHERE 1=1"
        ));
        filtros.aplicar(&mut qb);
        qb.push(" ORDER BY p.data_pagto DESC LIMIT ");
        qb.push_bind(paginacao.take());
        qb.push(" OFFSET ");
        qb.push_bind(paginacao.skip());

        let pagamentos = qb
            .build_query_as::<PagamentoComUsuario>()
            .fetch_all(&self.pool)
            .await?;

        Ok(pagamentos)
    }

    pub async fn count(&self, filtros: &PagamentoFiltros) -> Result<i64, AppError> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM pagamentos p WHERE 1=1");
        filtros.aplicar(&mut qb);

        let total = qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        Ok(total)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<PagamentoComUsuario>, AppError> {
        let pagamento = sqlx::query_as::<_, PagamentoComUsuario>(&format!(
            "SELECT p.*, {COLUNAS_USUARIO} FROM pagamentos p \
             JOIN usuarios u ON u.id = p.usuario_id WHERE p.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(pagamento)
    }

    pub async fn find_by_usuario(&self, usuario_id: Uuid) -> Result<Vec<Pagamento>, AppError> {
        let pagamentos = sqlx::query_as::<_, Pagamento>(
            "SELECT * FROM pagamentos WHERE usuario_id = $1 ORDER BY data_pagto DESC",
        )
        .bind(usuario_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(pagamentos)
    }

    pub async fn sum_valores(&self, filtros: &PagamentoFiltros) -> Result<Decimal, AppError> {
        let mut qb = QueryBuilder::new(SQL_SOMA);
        filtros.aplicar(&mut qb);

        let soma = qb
            .build_query_scalar::<Decimal>()
            .fetch_one(&self.pool)
            .await?;

        Ok(soma)
    }

    pub async fn group_by_metodo(
        &self,
        filtros: &PagamentoFiltros,
    ) -> Result<Vec<TotalPorMetodo>, AppError> {
        let mut qb = QueryBuilder::new(
            "SELECT p.metodo, COUNT(*) AS quantidade, COALESCE(SUM(p.valor), 0) AS valor_total \
             FROM pagamentos p WHERE 1=1",
        );
        filtros.aplicar(&mut qb);
        qb.push(" GROUP BY p.metodo ORDER BY valor_total DESC");

        let totais = qb
            .build_query_as::<TotalPorMetodo>()
            .fetch_all(&self.pool)
            .await?;

        Ok(totais)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        dados: &NovoPagamento,
    ) -> Result<Pagamento, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let pagamento = sqlx::query_as::<_, Pagamento>(
            r#"
            INSERT INTO pagamentos
                (usuario_id, data_pagto, valor, metodo, conta, mes_pagto,
                 regra_tipo, elegivel_comissao, tipo_plano, obs)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(dados.usuario_id)
        .bind(dados.data_pagto)
        .bind(dados.valor)
        .bind(dados.metodo)
        .bind(&dados.conta)
        .bind(&dados.mes_pagto)
        .bind(dados.regra_tipo)
        .bind(dados.elegivel_comissao)
        .bind(&dados.tipo_plano)
        .bind(&dados.obs)
        .fetch_one(executor)
        .await?;

        Ok(pagamento)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        mudancas: &AtualizarPagamento,
    ) -> Result<Pagamento, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let pagamento = sqlx::query_as::<_, Pagamento>(
            r#"
            UPDATE pagamentos SET
                data_pagto = COALESCE($2, data_pagto),
                valor = COALESCE($3, valor),
                metodo = COALESCE($4, metodo),
                conta = COALESCE($5, conta),
                mes_pagto = COALESCE($6, mes_pagto),
                obs = COALESCE($7, obs),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(mudancas.data_pagto)
        .bind(mudancas.valor)
        .bind(mudancas.metodo)
        .bind(&mudancas.conta)
        .bind(&mudancas.mes_pagto)
        .bind(&mudancas.obs)
        .fetch_one(executor)
        .await?;

        Ok(pagamento)
    }

    // A comissão 1:1 cai junto via ON DELETE CASCADE.
    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM pagamentos WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql_com(filtros: &PagamentoFiltros) -> String {
        let mut qb = QueryBuilder::new("WHERE 1=1");
        filtros.aplicar(&mut qb);
        qb.sql().to_string()
    }

    #[test]
    fn filtros_equalidade_entram_em_conjuncao() {
        let filtros = PagamentoFiltros {
            usuario_id: Some(Uuid::new_v4()),
            metodo: Some(MetodoPagamento::Pix),
            conta: Some("Nubank PJ".into()),
            regra_tipo: Some(RegraTipo::Primeiro),
            mes: Some("2024-10".into()),
            elegivel_comissao: Some(true),
        };
        let sql = sql_com(&filtros);
        for trecho in [
            "p.usuario_id =",
            "p.metodo =",
            "p.conta =",
            "p.regra_tipo =",
            "p.mes_pagto =",
            "p.elegivel_comissao =",
        ] {
            assert!(sql.contains(trecho), "faltou {trecho} em {sql}");
        }
    }

    #[test]
    fn sem_filtros_nao_ha_predicado() {
        assert_eq!(sql_com(&PagamentoFiltros::default()), "WHERE 1=1");
    }

    // Sem linhas a soma devolve 0, não NULL.
    #[test]
    fn soma_protege_conjunto_vazio_com_coalesce() {
        let mut qb = QueryBuilder::new(SQL_SOMA);
        PagamentoFiltros::default().aplicar(&mut qb);
        assert!(qb.sql().starts_with("SELECT COALESCE(SUM("));
    }

    #[test]
    fn count_e_listagem_compartilham_predicado() {
        let filtros = PagamentoFiltros {
            metodo: Some(MetodoPagamento::Credito),
            mes: Some("2024-09".into()),
            ..Default::default()
        };

        let mut a = QueryBuilder::new("");
        filtros.aplicar(&mut a);
        let mut b = QueryBuilder::new("");
        filtros.aplicar(&mut b);

        assert_eq!(a.sql(), b.sql());
    }
}
