// src/services/churn_service.rs

use chrono::{NaiveTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    common::paginacao::{PaginacaoQuery, RespostaPaginada},
    db::{ChurnFiltros, ChurnRepository, UsuarioRepository},
    models::churn::{
        AtualizarChurn, AtualizarChurnPayload, Churn, ChurnComUsuario, CriarChurnPayload,
        EstatisticasChurn, NovoChurn, ReverterChurnPayload, TotalPorMotivo,
    },
    models::usuario::StatusFinal,
};

#[derive(Clone)]
pub struct ChurnService {
    churns: ChurnRepository,
    usuarios: UsuarioRepository,
    pool: PgPool,
}

impl ChurnService {
    pub fn new(churns: ChurnRepository, usuarios: UsuarioRepository, pool: PgPool) -> Self {
        Self {
            churns,
            usuarios,
            pool,
        }
    }

    pub async fn listar(
        &self,
        filtros: &ChurnFiltros,
        paginacao: &PaginacaoQuery,
    ) -> Result<RespostaPaginada<ChurnComUsuario>, AppError> {
        let churns = self.churns.find_many(filtros, paginacao).await?;
        let total = self.churns.count(filtros).await?;

        Ok(RespostaPaginada::nova(churns, paginacao, total))
    }

    pub async fn buscar(&self, id: Uuid) -> Result<ChurnComUsuario, AppError> {
        self.churns
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NaoEncontrado("Churn não encontrado".into()))
    }

    // Registrar o churn e mandar o cliente para HISTORICO são uma coisa só.
    pub async fn criar(&self, payload: CriarChurnPayload) -> Result<Churn, AppError> {
        let usuario = self
            .usuarios
            .find_by_id(payload.usuario_id)
            .await?
            .ok_or_else(|| AppError::NaoEncontrado("Usuário não encontrado".into()))?;

        let dados = NovoChurn {
            usuario_id: usuario.id,
            data_churn: payload.data_churn.and_time(NaiveTime::MIN).and_utc(),
            motivo: payload.motivo,
        };

        let mut tx = self.pool.begin().await?;

        let churn = self.churns.create(&mut *tx, &dados).await?;
        self.usuarios
            .atualizar_status(&mut *tx, usuario.id, StatusFinal::Historico)
            .await?;

        tx.commit().await?;

        Ok(churn)
    }

    pub async fn atualizar(
        &self,
        id: Uuid,
        payload: AtualizarChurnPayload,
    ) -> Result<Churn, AppError> {
        self.buscar(id).await?;

        let mudancas = AtualizarChurn {
            data_churn: payload
                .data_churn
                .map(|d| d.and_time(NaiveTime::MIN).and_utc()),
            motivo: payload.motivo,
        };

        self.churns.update(&self.pool, id, &mudancas).await
    }

    // Reversão de cancelamento: o cliente volta para ATIVO se a assinatura
    // ainda está dentro do prazo; vencida, volta como INATIVO e precisa de um
    // novo pagamento.
    pub async fn reverter(
        &self,
        id: Uuid,
        payload: ReverterChurnPayload,
    ) -> Result<Churn, AppError> {
        let existente = self.buscar(id).await?;

        if existente.churn.revertido {
            return Err(AppError::RegraDeNegocio(
                "Este churn já foi revertido".into(),
            ));
        }

        let usuario = self
            .usuarios
            .find_by_id(existente.churn.usuario_id)
            .await?
            .ok_or_else(|| AppError::NaoEncontrado("Usuário não encontrado".into()))?;

        let status = match usuario.vencimento {
            Some(vencimento) if vencimento > Utc::now() => StatusFinal::Ativo,
            _ => {
                tracing::warn!(
                    usuario_id = %usuario.id,
                    "churn revertido com assinatura vencida; cliente volta como INATIVO"
                );
                StatusFinal::Inativo
            }
        };

        let mut tx = self.pool.begin().await?;

        let churn = self
            .churns
            .marcar_revertido(&mut *tx, id, payload.observacao.as_deref())
            .await?;
        self.usuarios
            .atualizar_status(&mut *tx, usuario.id, status)
            .await?;

        tx.commit().await?;

        Ok(churn)
    }

    pub async fn excluir(&self, id: Uuid) -> Result<(), AppError> {
        self.buscar(id).await?;
        self.churns.delete(&self.pool, id).await
    }

    pub async fn relatorio_por_motivo(
        &self,
        filtros: &ChurnFiltros,
    ) -> Result<Vec<TotalPorMotivo>, AppError> {
        self.churns.group_by_motivo(filtros).await
    }

    pub async fn stats(&self, filtros: &ChurnFiltros) -> Result<EstatisticasChurn, AppError> {
        let ativos = ChurnFiltros {
            revertido: Some(false),
            ..filtros.clone()
        };
        let revertidos = ChurnFiltros {
            revertido: Some(true),
            ..filtros.clone()
        };

        let total_churns = self.churns.count(filtros).await?;
        let churn_ativos = self.churns.count(&ativos).await?;
        let churn_revertidos = self.churns.count(&revertidos).await?;
        let churn_por_motivo = self.churns.group_by_motivo(filtros).await?;

        Ok(EstatisticasChurn {
            total_churns,
            churn_ativos,
            churn_revertidos,
            taxa_reversao: taxa_percentual(churn_revertidos, total_churns),
            churn_por_motivo,
        })
    }
}

// Percentual com duas casas decimais; base zero devolve 0.0.
fn taxa_percentual(parte: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    ((parte as f64 / total as f64) * 10000.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxa_arredonda_para_duas_casas() {
        assert_eq!(taxa_percentual(1, 3), 33.33);
        assert_eq!(taxa_percentual(2, 3), 66.67);
        assert_eq!(taxa_percentual(3, 4), 75.0);
    }

    #[test]
    fn taxa_com_total_zero_e_zero() {
        assert_eq!(taxa_percentual(0, 0), 0.0);
        assert_eq!(taxa_percentual(5, 0), 0.0);
    }
}
