// src/db/churn_repo.rs

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use sqlx::{Executor, PgPool, Postgres, QueryBuilder};
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    common::paginacao::PaginacaoQuery,
    models::churn::{AtualizarChurn, Churn, ChurnComUsuario, NovoChurn, TotalPorMotivo},
};

const COLUNAS_USUARIO: &str = "u.id AS u_id, u.email_login AS u_email_login, \
     u.nome_completo AS u_nome_completo, u.status_final AS u_status_final";

// Mês calendário inclusivo: primeiro dia 00:00:00 até o último 23:59:59.
// Mês inválido devolve None e o filtro é ignorado.
fn intervalo_do_mes(mes: u32, ano: i32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let inicio = NaiveDate::from_ymd_opt(ano, mes, 1)?;
    let proximo = if mes == 12 {
        NaiveDate::from_ymd_opt(ano + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(ano, mes + 1, 1)?
    };
    let inicio = inicio.and_time(NaiveTime::MIN).and_utc();
    let fim = proximo.and_time(NaiveTime::MIN).and_utc() - Duration::seconds(1);
    Some((inicio, fim))
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ChurnFiltros {
    pub revertido: Option<bool>,
    pub usuario_id: Option<Uuid>,
    pub motivo: Option<String>,
    pub data_inicio: Option<NaiveDate>,
    pub data_fim: Option<NaiveDate>,
    pub mes: Option<u32>,
    pub ano: Option<i32>,
}

impl ChurnFiltros {
    fn aplicar(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        if let Some(revertido) = self.revertido {
            qb.push(" AND c.revertido = ");
            qb.push_bind(revertido);
        }
        if let Some(usuario_id) = self.usuario_id {
            qb.push(" AND c.usuario_id = ");
            qb.push_bind(usuario_id);
        }
        if let Some(ref motivo) = self.motivo {
            qb.push(" AND c.motivo = ");
            qb.push_bind(motivo.clone());
        }

        // mes + ano juntos prevalecem sobre o intervalo explícito.
        let intervalo_mes = match (self.mes, self.ano) {
            (Some(mes), Some(ano)) => intervalo_do_mes(mes, ano),
            _ => None,
        };

        if let Some((inicio, fim)) = intervalo_mes {
            qb.push(" AND c.data_churn >= ");
            qb.push_bind(inicio);
            qb.push(" AND c.data_churn <= ");
            qb.push_bind(fim);
            return;
        }

        // Datas soltas entram à meia-noite UTC; um data_fim sozinho corta o
        // próprio dia depois de 00:00:00.
        if let Some(inicio) = self.data_inicio {
            qb.push(" AND c.data_churn >= ");
            qb.push_bind(inicio.and_time(NaiveTime::MIN).and_utc());
        }
        if let Some(fim) = self.data_fim {
            qb.push(" AND c.data_churn <= ");
            qb.push_bind(fim.and_time(NaiveTime::MIN).and_utc());
        }
    }
}

#[derive(Clone)]
pub struct ChurnRepository {
    pool: PgPool,
}

impl ChurnRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_many(
        &self,
        filtros: &ChurnFiltros,
        paginacao: &PaginacaoQuery,
    ) -> Result<Vec<ChurnComUsuario>, AppError> {
        let mut qb = QueryBuilder::new(format!(
            "SELECT c.*, {COLUNAS_USUARIO} FROM churns c \
             JOIN usuarios u ON u.id = c.usuario_id WHERE 1=1"
        ));
        filtros.aplicar(&mut qb);
        qb.push(" ORDER BY c.data_churn DESC LIMIT ");
        qb.push_bind(paginacao.take());
        qb.push(" OFFSET ");
        qb.push_bind(paginacao.skip());

        let churns = qb
            .build_query_as::<ChurnComUsuario>()
            .fetch_all(&self.pool)
            .await?;

        Ok(churns)
    }

    pub async fn count(&self, filtros: &ChurnFiltros) -> Result<i64, AppError> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM churns c WHERE 1=1");
        filtros.aplicar(&mut qb);

        let total = qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        Ok(total)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ChurnComUsuario>, AppError> {
        let churn = sqlx::query_as::<_, ChurnComUsuario>(&format!(
            "SELECT c.*, {COLUNAS_USUARIO} FROM churns c \
             JOIN usuarios u ON u.id = c.usuario_id WHERE c.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(churn)
    }

    pub async fn group_by_motivo(
        &self,
        filtros: &ChurnFiltros,
    ) -> Result<Vec<TotalPorMotivo>, AppError> {
        let mut qb = QueryBuilder::new(
            "SELECT c.motivo, COUNT(*) AS quantidade FROM churns c WHERE 1=1",
        );
        filtros.aplicar(&mut qb);
        qb.push(" GROUP BY c.motivo ORDER BY quantidade DESC");

        let totais = qb
            .build_query_as::<TotalPorMotivo>()
            .fetch_all(&self.pool)
            .await?;

        Ok(totais)
    }

    pub async fn create<'e, E>(&self, executor: E, dados: &NovoChurn) -> Result<Churn, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let churn = sqlx::query_as::<_, Churn>(
            r#"
            INSERT INTO churns (usuario_id, data_churn, motivo)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(dados.usuario_id)
        .bind(dados.data_churn)
        .bind(&dados.motivo)
        .fetch_one(executor)
        .await?;

        Ok(churn)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        mudancas: &AtualizarChurn,
    ) -> Result<Churn, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let churn = sqlx::query_as::<_, Churn>(
            r#"
            UPDATE churns SET
                data_churn = COALESCE($2, data_churn),
                motivo = COALESCE($3, motivo),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(mudancas.data_churn)
        .bind(&mudancas.motivo)
        .fetch_one(executor)
        .await?;

        Ok(churn)
    }

    pub async fn marcar_revertido<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        observacao: Option<&str>,
    ) -> Result<Churn, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let churn = sqlx::query_as::<_, Churn>(
            r#"
            UPDATE churns SET
                revertido = TRUE,
                observacao = COALESCE($2, observacao),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(observacao)
        .fetch_one(executor)
        .await?;

        Ok(churn)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM churns WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql_com(filtros: &ChurnFiltros) -> String {
        let mut qb = QueryBuilder::new("WHERE 1=1");
        filtros.aplicar(&mut qb);
        qb.sql().to_string()
    }

    #[test]
    fn intervalo_do_mes_cobre_bissexto() {
        let (inicio, fim) = intervalo_do_mes(2, 2024).unwrap();
        assert_eq!(inicio.to_rfc3339(), "2024-02-01T00:00:00+00:00");
        assert_eq!(fim.to_rfc3339(), "2024-02-29T23:59:59+00:00");
    }

    #[test]
    fn intervalo_do_mes_vira_o_ano_em_dezembro() {
        let (_, fim) = intervalo_do_mes(12, 2023).unwrap();
        assert_eq!(fim.to_rfc3339(), "2023-12-31T23:59:59+00:00");
    }

    #[test]
    fn intervalo_do_mes_rejeita_mes_invalido() {
        assert!(intervalo_do_mes(0, 2024).is_none());
        assert!(intervalo_do_mes(13, 2024).is_none());
    }

    #[test]
    fn data_inicio_sozinha_gera_somente_piso() {
        let filtros = ChurnFiltros {
            data_inicio: Some(NaiveDate::from_ymd_opt(2024, 10, 1).unwrap()),
            ..Default::default()
        };
        let sql = sql_com(&filtros);
        assert!(sql.contains("data_churn >="));
        assert!(!sql.contains("data_churn <="));
    }

    #[test]
    fn data_fim_sozinha_gera_somente_teto() {
        let filtros = ChurnFiltros {
            data_fim: Some(NaiveDate::from_ymd_opt(2024, 10, 31).unwrap()),
            ..Default::default()
        };
        let sql = sql_com(&filtros);
        assert!(!sql.contains("data_churn >="));
        assert!(sql.contains("data_churn <="));
    }

    // Com mes+ano presentes, o intervalo explícito é descartado: o predicado
    // ganha piso e teto mesmo quando só data_inicio foi informada.
    #[test]
    fn mes_e_ano_prevalecem_sobre_intervalo_explicito() {
        let filtros = ChurnFiltros {
            data_inicio: Some(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()),
            mes: Some(10),
            ano: Some(2024),
            ..Default::default()
        };
        let sql = sql_com(&filtros);
        assert!(sql.contains("data_churn >="));
        assert!(sql.contains("data_churn <="));
        assert_eq!(sql.matches("data_churn").count(), 2);
    }

    #[test]
    fn mes_invalido_e_ignorado() {
        let filtros = ChurnFiltros {
            mes: Some(13),
            ano: Some(2024),
            ..Default::default()
        };
        assert_eq!(sql_com(&filtros), "WHERE 1=1");
    }

    #[test]
    fn count_e_listagem_compartilham_predicado() {
        let filtros = ChurnFiltros {
            revertido: Some(false),
            mes: Some(2),
            ano: Some(2024),
            ..Default::default()
        };

        let mut a = QueryBuilder::new("");
        filtros.aplicar(&mut a);
        let mut b = QueryBuilder::new("");
        filtros.aplicar(&mut b);

        assert_eq!(a.sql(), b.sql());
    }
}
