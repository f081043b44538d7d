// src/db/lista_repo.rs

use serde::Deserialize;
use sqlx::{Executor, PgPool, Postgres, QueryBuilder};
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    common::error::{conflito_de_unicidade, AppError},
    models::lista::{ListaAuxiliar, TipoLista},
};

const CONFLITO_TIPO_VALOR: &str = "Já existe um item com este valor para este tipo";

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListaFiltros {
    pub tipo: Option<TipoLista>,
    pub ativo: Option<bool>,
}

impl ListaFiltros {
    fn aplicar(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        if let Some(tipo) = self.tipo {
            qb.push(" AND tipo = ");
            qb.push_bind(tipo);
        }
        if let Some(ativo) = self.ativo {
            qb.push(" AND ativo = ");
            qb.push_bind(ativo);
        }
    }
}

// Listas são pequenas (dezenas de itens); a listagem devolve tudo de uma
// vez, sem paginação.
#[derive(Clone)]
pub struct ListaRepository {
    pool: PgPool,
}

impl ListaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_many(&self, filtros: &ListaFiltros) -> Result<Vec<ListaAuxiliar>, AppError> {
        let mut qb = QueryBuilder::new("SELECT * FROM listas_auxiliares WHERE 1=1");
        filtros.aplicar(&mut qb);
        qb.push(" ORDER BY valor ASC");

        let itens = qb
            .build_query_as::<ListaAuxiliar>()
            .fetch_all(&self.pool)
            .await?;

        Ok(itens)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ListaAuxiliar>, AppError> {
        let item = sqlx::query_as::<_, ListaAuxiliar>("SELECT * FROM listas_auxiliares WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    pub async fn find_por_tipo_valor(
        &self,
        tipo: TipoLista,
        valor: &str,
    ) -> Result<Option<ListaAuxiliar>, AppError> {
        let item = sqlx::query_as::<_, ListaAuxiliar>(
            "SELECT * FROM listas_auxiliares WHERE tipo = $1 AND valor = $2",
        )
        .bind(tipo)
        .bind(valor)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        tipo: TipoLista,
        valor: &str,
        ativo: bool,
    ) -> Result<ListaAuxiliar, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, ListaAuxiliar>(
            r#"
            INSERT INTO listas_auxiliares (tipo, valor, ativo)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(tipo)
        .bind(valor)
        .bind(ativo)
        .fetch_one(executor)
        .await
        .map_err(|e| conflito_de_unicidade(e, CONFLITO_TIPO_VALOR))?;

        Ok(item)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        valor: Option<&str>,
        ativo: Option<bool>,
    ) -> Result<ListaAuxiliar, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, ListaAuxiliar>(
            r#"
            UPDATE listas_auxiliares SET
                valor = COALESCE($2, valor),
                ativo = COALESCE($3, ativo),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(valor)
        .bind(ativo)
        .fetch_one(executor)
        .await
        .map_err(|e| conflito_de_unicidade(e, CONFLITO_TIPO_VALOR))?;

        Ok(item)
    }

    // Itens de lista nunca somem de verdade: despesas e pagamentos antigos
    // ainda apontam para os valores.
    pub async fn desativar<'e, E>(&self, executor: E, id: Uuid) -> Result<ListaAuxiliar, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, ListaAuxiliar>(
            r#"
            UPDATE listas_auxiliares SET ativo = FALSE, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_one(executor)
        .await?;

        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql_com(filtros: &ListaFiltros) -> String {
        let mut qb = QueryBuilder::new("WHERE 1=1");
        filtros.aplicar(&mut qb);
        qb.sql().to_string()
    }

    #[test]
    fn filtra_por_tipo_e_ativo() {
        let filtros = ListaFiltros {
            tipo: Some(TipoLista::Conta),
            ativo: Some(true),
        };
        let sql = sql_com(&filtros);
        assert!(sql.contains("tipo ="));
        assert!(sql.contains("ativo ="));
    }

    #[test]
    fn sem_filtros_lista_todos() {
        assert_eq!(sql_com(&ListaFiltros::default()), "WHERE 1=1");
    }
}
