// src/db/prospeccao_repo.rs

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use sqlx::{Executor, PgPool, Postgres, QueryBuilder};
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    common::paginacao::PaginacaoQuery,
    models::prospeccao::{
        AtualizarProspeccao, NovaProspeccao, Prospeccao, ProspeccaoComUsuario, TotalPorGrupo,
    },
};

const COLUNAS_USUARIO: &str = "u.id AS u_id, u.email_login AS u_email_login, \
     u.nome_completo AS u_nome_completo, u.status_final AS u_status_final";

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProspeccaoFiltros {
    pub origem: Option<String>,
    pub indicador: Option<String>,
    pub convertido: Option<bool>,
    pub busca: Option<String>,
    pub data_inicio: Option<NaiveDate>,
    pub data_fim: Option<NaiveDate>,
}

impl ProspeccaoFiltros {
    fn aplicar(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        if let Some(ref origem) = self.origem {
            qb.push(" AND p.origem = ");
            qb.push_bind(origem.clone());
        }
        if let Some(ref indicador) = self.indicador {
            qb.push(" AND p.indicador = ");
            qb.push_bind(indicador.clone());
        }
        if let Some(convertido) = self.convertido {
            qb.push(" AND p.convertido = ");
            qb.push_bind(convertido);
        }
        if let Some(ref busca) = self.busca {
            let padrao = format!("%{}%", busca);
            qb.push(" AND (p.nome ILIKE ");
            qb.push_bind(padrao.clone());
            qb.push(" OR p.email ILIKE ");
            qb.push_bind(padrao.clone());
            qb.push(" OR p.telefone ILIKE ");
            qb.push_bind(padrao);
            qb.push(")");
        }
        if let Some(inicio) = self.data_inicio {
            qb.push(" AND p.data_contato >= ");
            qb.push_bind(inicio.and_time(NaiveTime::MIN).and_utc());
        }
        if let Some(fim) = self.data_fim {
            qb.push(" AND p.data_contato <= ");
            qb.push_bind(fim.and_time(NaiveTime::MIN).and_utc());
        }
    }
}

#[derive(Clone)]
pub struct ProspeccaoRepository {
    pool: PgPool,
}

impl ProspeccaoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_many(
        &self,
        filtros: &ProspeccaoFiltros,
        paginacao: &PaginacaoQuery,
    ) -> Result<Vec<ProspeccaoComUsuario>, AppError> {
        let mut qb = QueryBuilder::new(format!(
            "SELECT p.*, {COLUNAS_USUARIO} FROM prospeccoes p \
             LEFT JOIN usuarios u ON u.id = p.usuario_id WHERE 1=1"
        ));
        filtros.aplicar(&mut qb);
        qb.push(" ORDER BY p.created_at DESC LIMIT ");
        qb.push_bind(paginacao.take());
        qb.push(" OFFSET ");
        qb.push_bind(paginacao.skip());

        let prospeccoes = qb
            .build_query_as::<ProspeccaoComUsuario>()
            .fetch_all(&self.pool)
            .await?;

        Ok(prospeccoes)
    }

    pub async fn count(&self, filtros: &ProspeccaoFiltros) -> Result<i64, AppError> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM prospeccoes p WHERE 1=1");
        filtros.aplicar(&mut qb);

        let total = qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        Ok(total)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ProspeccaoComUsuario>, AppError> {
        let prospeccao = sqlx::query_as::<_, ProspeccaoComUsuario>(&format!(
            "SELECT p.*, {COLUNAS_USUARIO} FROM prospeccoes p \
             LEFT JOIN usuarios u ON u.id = p.usuario_id WHERE p.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(prospeccao)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Prospeccao>, AppError> {
        let prospeccao =
            sqlx::query_as::<_, Prospeccao>("SELECT * FROM prospeccoes WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        Ok(prospeccao)
    }

    pub async fn group_by_origem(
        &self,
        filtros: &ProspeccaoFiltros,
    ) -> Result<Vec<TotalPorGrupo>, AppError> {
        let mut qb = QueryBuilder::new(
            "SELECT p.origem AS chave, COUNT(*) AS total, \
             COUNT(*) FILTER (WHERE p.convertido) AS convertidas \
             FROM prospeccoes p WHERE 1=1",
        );
        filtros.aplicar(&mut qb);
        qb.push(" GROUP BY p.origem ORDER BY total DESC");

        let totais = qb
            .build_query_as::<TotalPorGrupo>()
            .fetch_all(&self.pool)
            .await?;

        Ok(totais)
    }

    pub async fn group_by_indicador(
        &self,
        filtros: &ProspeccaoFiltros,
    ) -> Result<Vec<TotalPorGrupo>, AppError> {
        let mut qb = QueryBuilder::new(
            "SELECT COALESCE(p.indicador, 'Sem indicador') AS chave, COUNT(*) AS total, \
             COUNT(*) FILTER (WHERE p.convertido) AS convertidas \
             FROM prospeccoes p WHERE 1=1",
        );
        filtros.aplicar(&mut qb);
        qb.push(" GROUP BY COALESCE(p.indicador, 'Sem indicador') ORDER BY total DESC");

        let totais = qb
            .build_query_as::<TotalPorGrupo>()
            .fetch_all(&self.pool)
            .await?;

        Ok(totais)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        dados: &NovaProspeccao,
    ) -> Result<Prospeccao, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let prospeccao = sqlx::query_as::<_, Prospeccao>(
            r#"
            INSERT INTO prospeccoes
                (data_contato, nome, email, telefone, origem, indicador, interesse, obs)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(dados.data_contato)
        .bind(&dados.nome)
        .bind(&dados.email)
        .bind(&dados.telefone)
        .bind(&dados.origem)
        .bind(&dados.indicador)
        .bind(&dados.interesse)
        .bind(&dados.obs)
        .fetch_one(executor)
        .await?;

        Ok(prospeccao)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        mudancas: &AtualizarProspeccao,
    ) -> Result<Prospeccao, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let prospeccao = sqlx::query_as::<_, Prospeccao>(
            r#"
            UPDATE prospeccoes SET
                data_contato = COALESCE($2, data_contato),
                nome = COALESCE($3, nome),
                email = COALESCE($4, email),
                telefone = COALESCE($5, telefone),
                origem = COALESCE($6, origem),
                indicador = COALESCE($7, indicador),
                interesse = COALESCE($8, interesse),
                convertido = COALESCE($9, convertido),
                obs = COALESCE($10, obs),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(mudancas.data_contato)
        .bind(&mudancas.nome)
        .bind(&mudancas.email)
        .bind(&mudancas.telefone)
        .bind(&mudancas.origem)
        .bind(&mudancas.indicador)
        .bind(&mudancas.interesse)
        .bind(mudancas.convertido)
        .bind(&mudancas.obs)
        .fetch_one(executor)
        .await?;

        Ok(prospeccao)
    }

    pub async fn marcar_convertida<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        usuario_id: Uuid,
    ) -> Result<Prospeccao, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let prospeccao = sqlx::query_as::<_, Prospeccao>(
            r#"
            UPDATE prospeccoes SET
                convertido = TRUE,
                usuario_id = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(usuario_id)
        .fetch_one(executor)
        .await?;

        Ok(prospeccao)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM prospeccoes WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql_com(filtros: &ProspeccaoFiltros) -> String {
        let mut qb = QueryBuilder::new("WHERE 1=1");
        filtros.aplicar(&mut qb);
        qb.sql().to_string()
    }

    #[test]
    fn busca_expande_para_nome_email_telefone() {
        let filtros = ProspeccaoFiltros {
            busca: Some("carlos".into()),
            ..Default::default()
        };
        let sql = sql_com(&filtros);
        assert!(sql.contains("p.nome ILIKE"));
        assert!(sql.contains("p.email ILIKE"));
        assert!(sql.contains("p.telefone ILIKE"));
    }

    #[test]
    fn intervalo_parcial_gera_um_lado_so() {
        let filtros = ProspeccaoFiltros {
            data_fim: Some(NaiveDate::from_ymd_opt(2024, 10, 15).unwrap()),
            ..Default::default()
        };
        let sql = sql_com(&filtros);
        assert!(!sql.contains("data_contato >="));
        assert!(sql.contains("data_contato <="));
    }

    #[test]
    fn count_e_listagem_compartilham_predicado() {
        let filtros = ProspeccaoFiltros {
            origem: Some("Instagram".into()),
            convertido: Some(false),
            busca: Some("ana".into()),
            ..Default::default()
        };

        let mut a = QueryBuilder::new("");
        filtros.aplicar(&mut a);
        let mut b = QueryBuilder::new("");
        filtros.aplicar(&mut b);

        assert_eq!(a.sql(), b.sql());
    }
}
