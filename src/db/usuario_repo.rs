// src/db/usuario_repo.rs

use chrono::{Duration, NaiveTime, Utc};
use serde::Deserialize;
use sqlx::{Executor, PgPool, Postgres, QueryBuilder};
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    common::error::{conflito_de_unicidade, AppError},
    common::paginacao::PaginacaoQuery,
    models::usuario::{AtualizarUsuario, NovoUsuario, StatusFinal, Usuario},
};

// Filtros fechados da listagem de usuários. Os três sinalizadores de
// vencimento só entram no predicado quando chegam como `true`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct UsuarioFiltros {
    pub status_final: Option<StatusFinal>,
    pub indicador: Option<String>,
    pub busca: Option<String>,
    pub vence_hoje: Option<bool>,
    pub prox_7_dias: Option<bool>,
    pub em_atraso: Option<bool>,
}

impl UsuarioFiltros {
    // find_many e count montam o predicado por este mesmo caminho; é isso
    // que mantém o total da paginação coerente com a página devolvida.
    fn aplicar(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        if let Some(status) = self.status_final {
            qb.push(" AND status_final = ");
            qb.push_bind(status);
        }
        if let Some(ref indicador) = self.indicador {
            qb.push(" AND indicador = ");
            qb.push_bind(indicador.clone());
        }
        if let Some(ref busca) = self.busca {
            let padrao = format!("%{}%", busca);
            qb.push(" AND (email_login ILIKE ");
            qb.push_bind(padrao.clone());
            qb.push(" OR nome_completo ILIKE ");
            qb.push_bind(padrao.clone());
            qb.push(" OR telefone ILIKE ");
            qb.push_bind(padrao);
            qb.push(")");
        }
        if self.vence_hoje.unwrap_or(false) {
            let inicio = Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc();
            let fim = inicio + Duration::days(1) - Duration::seconds(1);
            qb.push(" AND vencimento >= ");
            qb.push_bind(inicio);
            qb.push(" AND vencimento <= ");
            qb.push_bind(fim);
        }
        if self.prox_7_dias.unwrap_or(false) {
            let agora = Utc::now();
            qb.push(" AND vencimento >= ");
            qb.push_bind(agora);
            qb.push(" AND vencimento <= ");
            qb.push_bind(agora + Duration::days(7));
        }
        if self.em_atraso.unwrap_or(false) {
            qb.push(" AND vencimento < ");
            qb.push_bind(Utc::now());
            qb.push(" AND status_final = ");
            qb.push_bind(StatusFinal::Ativo);
        }
    }
}

#[derive(Clone)]
pub struct UsuarioRepository {
    pool: PgPool,
}

impl UsuarioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_many(
        &self,
        filtros: &UsuarioFiltros,
        paginacao: &PaginacaoQuery,
    ) -> Result<Vec<Usuario>, AppError> {
        let mut qb = QueryBuilder::new("SELECT * FROM usuarios WHERE 1=1");
        filtros.aplicar(&mut qb);
        qb.push(" ORDER BY created_at DESC LIMIT ");
        qb.push_bind(paginacao.take());
        qb.push(" OFFSET ");
        qb.push_bind(paginacao.skip());

        let usuarios = qb
            .build_query_as::<Usuario>()
            .fetch_all(&self.pool)
            .await?;

        Ok(usuarios)
    }

    pub async fn count(&self, filtros: &UsuarioFiltros) -> Result<i64, AppError> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM usuarios WHERE 1=1");
        filtros.aplicar(&mut qb);

        let total = qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        Ok(total)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Usuario>, AppError> {
        let usuario = sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(usuario)
    }

    pub async fn email_existe(&self, email: &str) -> Result<bool, AppError> {
        let existe =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM usuarios WHERE email_login = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;

        Ok(existe)
    }

    pub async fn create<'e, E>(&self, executor: E, dados: &NovoUsuario) -> Result<Usuario, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let usuario = sqlx::query_as::<_, Usuario>(
            r#"
            INSERT INTO usuarios (email_login, nome_completo, telefone, indicador, obs)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&dados.email_login)
        .bind(&dados.nome_completo)
        .bind(&dados.telefone)
        .bind(&dados.indicador)
        .bind(&dados.obs)
        .fetch_one(executor)
        .await
        .map_err(|e| conflito_de_unicidade(e, "Já existe um usuário com este email"))?;

        Ok(usuario)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        mudancas: &AtualizarUsuario,
    ) -> Result<Usuario, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let usuario = sqlx::query_as::<_, Usuario>(
            r#"
            UPDATE usuarios SET
                email_login = COALESCE($2, email_login),
                nome_completo = COALESCE($3, nome_completo),
                telefone = COALESCE($4, telefone),
                indicador = COALESCE($5, indicador),
                obs = COALESCE($6, obs),
                ciclo_atual = COALESCE($7, ciclo_atual),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&mudancas.email_login)
        .bind(&mudancas.nome_completo)
        .bind(&mudancas.telefone)
        .bind(&mudancas.indicador)
        .bind(&mudancas.obs)
        .bind(mudancas.ciclo_atual)
        .fetch_one(executor)
        .await
        .map_err(|e| conflito_de_unicidade(e, "Já existe um usuário com este email"))?;

        Ok(usuario)
    }

    // Disparado pelo fluxo de pagamento: reativa e empurra o vencimento.
    pub async fn ativar_apos_pagamento<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        ciclo_atual: i32,
        vencimento: chrono::DateTime<Utc>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE usuarios SET
                status_final = 'ATIVO',
                ciclo_atual = $2,
                vencimento = $3,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(ciclo_atual)
        .bind(vencimento)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn atualizar_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: StatusFinal,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE usuarios SET status_final = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM usuarios WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql_com(filtros: &UsuarioFiltros) -> String {
        let mut qb = QueryBuilder::new("SELECT * FROM usuarios WHERE 1=1");
        filtros.aplicar(&mut qb);
        qb.sql().to_string()
    }

    #[test]
    fn sem_filtros_nao_adiciona_predicados() {
        assert_eq!(sql_com(&UsuarioFiltros::default()), "SELECT * FROM usuarios WHERE 1=1");
    }

    #[test]
    fn busca_expande_para_tres_colunas() {
        let filtros = UsuarioFiltros {
            busca: Some("maria".into()),
            ..Default::default()
        };
        let sql = sql_com(&filtros);
        assert!(sql.contains("email_login ILIKE"));
        assert!(sql.contains("nome_completo ILIKE"));
        assert!(sql.contains("telefone ILIKE"));
    }

    #[test]
    fn em_atraso_exige_status_ativo() {
        let filtros = UsuarioFiltros {
            em_atraso: Some(true),
            ..Default::default()
        };
        let sql = sql_com(&filtros);
        assert!(sql.contains("vencimento <"));
        assert!(sql.contains("status_final ="));
    }

    #[test]
    fn sinalizador_false_nao_filtra() {
        let filtros = UsuarioFiltros {
            vence_hoje: Some(false),
            prox_7_dias: Some(false),
            em_atraso: Some(false),
            ..Default::default()
        };
        assert_eq!(sql_com(&filtros), "SELECT * FROM usuarios WHERE 1=1");
    }

    // count precisa enxergar exatamente o mesmo predicado da listagem.
    #[test]
    fn count_e_listagem_compartilham_predicado() {
        let filtros = UsuarioFiltros {
            status_final: Some(StatusFinal::Ativo),
            indicador: Some("João Silva".into()),
            busca: Some("maria".into()),
            ..Default::default()
        };

        let mut listagem = QueryBuilder::new("");
        filtros.aplicar(&mut listagem);
        let mut contagem = QueryBuilder::new("");
        filtros.aplicar(&mut contagem);

        assert_eq!(listagem.sql(), contagem.sql());
    }
}
