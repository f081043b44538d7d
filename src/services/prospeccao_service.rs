// src/services/prospeccao_service.rs

use chrono::{NaiveTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    common::paginacao::{PaginacaoQuery, RespostaPaginada},
    db::{ProspeccaoFiltros, ProspeccaoRepository, UsuarioRepository},
    models::prospeccao::{
        AtualizarProspeccao, AtualizarProspeccaoPayload, ConversaoProspeccao,
        ConverterProspeccaoPayload, CriarProspeccaoPayload, EstatisticasProspeccoes,
        NovaProspeccao, Prospeccao, ProspeccaoComUsuario,
    },
    models::usuario::NovoUsuario,
};

#[derive(Clone)]
pub struct ProspeccaoService {
    prospeccoes: ProspeccaoRepository,
    usuarios: UsuarioRepository,
    pool: PgPool,
}

impl ProspeccaoService {
    pub fn new(
        prospeccoes: ProspeccaoRepository,
        usuarios: UsuarioRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            prospeccoes,
            usuarios,
            pool,
        }
    }

    pub async fn listar(
        &self,
        filtros: &ProspeccaoFiltros,
        paginacao: &PaginacaoQuery,
    ) -> Result<RespostaPaginada<ProspeccaoComUsuario>, AppError> {
        let prospeccoes = self.prospeccoes.find_many(filtros, paginacao).await?;
        let total = self.prospeccoes.count(filtros).await?;

        Ok(RespostaPaginada::nova(prospeccoes, paginacao, total))
    }

    pub async fn buscar(&self, id: Uuid) -> Result<ProspeccaoComUsuario, AppError> {
        self.prospeccoes
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NaoEncontrado("Prospecção não encontrada".into()))
    }

    pub async fn criar(&self, payload: CriarProspeccaoPayload) -> Result<Prospeccao, AppError> {
        if let Some(ref email) = payload.email {
            if self.prospeccoes.find_by_email(email).await?.is_some() {
                return Err(AppError::Conflito(
                    "Já existe uma prospecção com este email".into(),
                ));
            }
        }

        let dados = NovaProspeccao {
            data_contato: payload
                .data_contato
                .map(|d| d.and_time(NaiveTime::MIN).and_utc())
                .unwrap_or_else(Utc::now),
            nome: payload.nome,
            email: payload.email,
            telefone: payload.telefone,
            origem: payload.origem,
            indicador: payload.indicador,
            interesse: payload.interesse,
            obs: payload.obs,
        };

        self.prospeccoes.create(&self.pool, &dados).await
    }

    pub async fn atualizar(
        &self,
        id: Uuid,
        payload: AtualizarProspeccaoPayload,
    ) -> Result<Prospeccao, AppError> {
        self.buscar(id).await?;

        if let Some(ref email) = payload.email {
            if let Some(existente) = self.prospeccoes.find_by_email(email).await? {
                if existente.id != id {
                    return Err(AppError::Conflito(
                        "Email já cadastrado em outra prospecção".into(),
                    ));
                }
            }
        }

        let mudancas = AtualizarProspeccao {
            data_contato: payload
                .data_contato
                .map(|d| d.and_time(NaiveTime::MIN).and_utc()),
            nome: payload.nome,
            email: payload.email,
            telefone: payload.telefone,
            origem: payload.origem,
            indicador: payload.indicador,
            interesse: payload.interesse,
            convertido: payload.convertido,
            obs: payload.obs,
        };

        self.prospeccoes.update(&self.pool, id, &mudancas).await
    }

    pub async fn excluir(&self, id: Uuid) -> Result<(), AppError> {
        let existente = self.buscar(id).await?;

        if existente.prospeccao.convertido {
            return Err(AppError::RegraDeNegocio(
                "Não é possível excluir uma prospecção já convertida".into(),
            ));
        }

        self.prospeccoes.delete(&self.pool, id).await
    }

    // Função central do módulo: o lead vira um usuário INATIVO e os dois
    // registros ficam vinculados. Tudo ou nada.
    pub async fn converter(
        &self,
        id: Uuid,
        payload: ConverterProspeccaoPayload,
    ) -> Result<ConversaoProspeccao, AppError> {
        let existente = self.buscar(id).await?.prospeccao;

        if existente.convertido {
            return Err(AppError::RegraDeNegocio(
                "Prospecção já foi convertida".into(),
            ));
        }

        let email = existente.email.clone().ok_or_else(|| {
            AppError::RegraDeNegocio("Prospecção sem email não pode ser convertida".into())
        })?;

        if self.usuarios.email_existe(&email).await? {
            return Err(AppError::Conflito(
                "Já existe um usuário com este email".into(),
            ));
        }

        let dados = NovoUsuario {
            email_login: email,
            nome_completo: existente.nome.clone(),
            telefone: payload.telefone.or_else(|| existente.telefone.clone()),
            indicador: payload.indicador.or_else(|| existente.indicador.clone()),
            obs: existente.obs.clone(),
        };

        let mut tx = self.pool.begin().await?;

        let usuario = self.usuarios.create(&mut *tx, &dados).await?;
        let prospeccao = self
            .prospeccoes
            .marcar_convertida(&mut *tx, id, usuario.id)
            .await?;

        tx.commit().await?;

        tracing::info!(
            prospeccao_id = %prospeccao.id,
            usuario_id = %usuario.id,
            "prospecção convertida em usuário"
        );

        Ok(ConversaoProspeccao {
            prospeccao,
            usuario,
        })
    }

    pub async fn stats(
        &self,
        filtros: &ProspeccaoFiltros,
    ) -> Result<EstatisticasProspeccoes, AppError> {
        let somente_convertidas = ProspeccaoFiltros {
            convertido: Some(true),
            ..filtros.clone()
        };

        let total_prospeccoes = self.prospeccoes.count(filtros).await?;
        let convertidas = self.prospeccoes.count(&somente_convertidas).await?;
        let por_origem = self.prospeccoes.group_by_origem(filtros).await?;
        let por_indicador = self.prospeccoes.group_by_indicador(filtros).await?;

        Ok(EstatisticasProspeccoes {
            total_prospeccoes,
            convertidas,
            nao_convertidas: total_prospeccoes - convertidas,
            taxa_conversao: taxa_percentual(convertidas, total_prospeccoes),
            por_origem,
            por_indicador,
        })
    }
}

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
    fn taxa_de_conversao_com_duas_casas() {
        assert_eq!(taxa_percentual(9, 30), 30.0);
        assert_eq!(taxa_percentual(1, 7), 14.29);
        assert_eq!(taxa_percentual(0, 0), 0.0);
    }
}
