// src/db/admin_repo.rs

use serde::Deserialize;
use sqlx::{Executor, PgPool, Postgres, QueryBuilder};
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    common::error::{conflito_de_unicidade, AppError},
    common::paginacao::PaginacaoQuery,
    models::admin::{Admin, AdminSeguro, AtualizarAdmin, NovoAdmin},
};

// Projeção sem a coluna senha. Toda leitura fora do fluxo de autenticação
// passa por aqui.
const COLUNAS_SEGURAS: &str =
    "id, login, nome, email, role, ativo, aprovado, created_at, updated_at";

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AdminFiltros {
    pub aprovado: Option<bool>,
    pub ativo: Option<bool>,
}

impl AdminFiltros {
    fn aplicar(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        if let Some(aprovado) = self.aprovado {
            qb.push(" AND aprovado = ");
            qb.push_bind(aprovado);
        }
        if let Some(ativo) = self.ativo {
            qb.push(" AND ativo = ");
            qb.push_bind(ativo);
        }
    }
}

#[derive(Clone)]
pub struct AdminRepository {
    pool: PgPool,
}

impl AdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ===== LEITURA COM SENHA (somente autenticação) =====

    pub async fn find_by_login(&self, login: &str) -> Result<Option<Admin>, AppError> {
        let admin = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE login = $1")
            .bind(login)
            .fetch_optional(&self.pool)
            .await?;

        Ok(admin)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, AppError> {
        let admin = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(admin)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Admin>, AppError> {
        let admin = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(admin)
    }

    // ===== LEITURA SEGURA =====

    pub async fn find_by_id_seguro(&self, id: Uuid) -> Result<Option<AdminSeguro>, AppError> {
        let admin = sqlx::query_as::<_, AdminSeguro>(&format!(
            "SELECT {COLUNAS_SEGURAS} FROM admins WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }

    pub async fn find_many(
        &self,
        filtros: &AdminFiltros,
        paginacao: &PaginacaoQuery,
    ) -> Result<Vec<AdminSeguro>, AppError> {
        let mut qb =
            QueryBuilder::new(format!("SELECT {COLUNAS_SEGURAS} FROM admins WHERE 1=1"));
        filtros.aplicar(&mut qb);
        qb.push(" ORDER BY created_at DESC LIMIT ");
        qb.push_bind(paginacao.take());
        qb.push(" OFFSET ");
        qb.push_bind(paginacao.skip());

        let admins = qb
            .build_query_as::<AdminSeguro>()
            .fetch_all(&self.pool)
            .await?;

        Ok(admins)
    }

    pub async fn count(&self, filtros: &AdminFiltros) -> Result<i64, AppError> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM admins WHERE 1=1");
        filtros.aplicar(&mut qb);

        let total = qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        Ok(total)
    }

    // ===== ESCRITA =====

    pub async fn create<'e, E>(
        &self,
        executor: E,
        dados: &NovoAdmin,
    ) -> Result<AdminSeguro, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let admin = sqlx::query_as::<_, AdminSeguro>(&format!(
            r#"
            INSERT INTO admins (login, senha, nome, email, role, aprovado)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {COLUNAS_SEGURAS}
            "#
        ))
        .bind(&dados.login)
        .bind(&dados.senha)
        .bind(&dados.nome)
        .bind(&dados.email)
        .bind(&dados.role)
        .bind(dados.aprovado)
        .fetch_one(executor)
        .await
        .map_err(|e| conflito_de_unicidade(e, "Login ou email já está em uso"))?;

        Ok(admin)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        mudancas: &AtualizarAdmin,
    ) -> Result<AdminSeguro, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let admin = sqlx::query_as::<_, AdminSeguro>(&format!(
            r#"
            UPDATE admins SET
                role = COALESCE($2, role),
                ativo = COALESCE($3, ativo),
                aprovado = COALESCE($4, aprovado),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUNAS_SEGURAS}
            "#
        ))
        .bind(id)
        .bind(&mudancas.role)
        .bind(mudancas.ativo)
        .bind(mudancas.aprovado)
        .fetch_one(executor)
        .await?;

        Ok(admin)
    }

    pub async fn update_senha<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        senha_hash: &str,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE admins SET senha = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(senha_hash)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM admins WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql_com(filtros: &AdminFiltros) -> String {
        let mut qb = QueryBuilder::new("WHERE 1=1");
        filtros.aplicar(&mut qb);
        qb.sql().to_string()
    }

    #[test]
    fn projecao_segura_nunca_seleciona_senha() {
        assert!(!COLUNAS_SEGURAS.contains("senha"));
    }

    #[test]
    fn filtros_de_aprovacao_entram_no_predicado() {
        let filtros = AdminFiltros {
            aprovado: Some(false),
            ativo: Some(true),
        };
        let sql = sql_com(&filtros);
        assert!(sql.contains("aprovado ="));
        assert!(sql.contains("ativo ="));
    }

    #[test]
    fn sem_filtros_lista_todos() {
        assert_eq!(sql_com(&AdminFiltros::default()), "WHERE 1=1");
    }

    #[test]
    fn count_e_listagem_compartilham_predicado() {
        let filtros = AdminFiltros {
            aprovado: Some(true),
            ativo: None,
        };

        let mut a = QueryBuilder::new("");
        filtros.aplicar(&mut a);
        let mut b = QueryBuilder::new("");
        filtros.aplicar(&mut b);

        assert_eq!(a.sql(), b.sql());
    }
}
