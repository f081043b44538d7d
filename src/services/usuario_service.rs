// src/services/usuario_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    common::paginacao::{PaginacaoQuery, RespostaPaginada},
    db::{UsuarioFiltros, UsuarioRepository},
    models::usuario::{
        AtualizarUsuario, AtualizarUsuarioPayload, CriarUsuarioPayload, NovoUsuario, Usuario,
    },
};

#[derive(Clone)]
pub struct UsuarioService {
    repo: UsuarioRepository,
    pool: PgPool,
}

impl UsuarioService {
    pub fn new(repo: UsuarioRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn listar(
        &self,
        filtros: &UsuarioFiltros,
        paginacao: &PaginacaoQuery,
    ) -> Result<RespostaPaginada<Usuario>, AppError> {
        let usuarios = self.repo.find_many(filtros, paginacao).await?;
        let total = self.repo.count(filtros).await?;

        Ok(RespostaPaginada::nova(usuarios, paginacao, total))
    }

    pub async fn buscar(&self, id: Uuid) -> Result<Usuario, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NaoEncontrado("Usuário não encontrado".into()))
    }

    // Cliente novo entra INATIVO; só o primeiro pagamento ativa.
    pub async fn criar(&self, payload: CriarUsuarioPayload) -> Result<Usuario, AppError> {
        if self.repo.email_existe(&payload.email_login).await? {
            return Err(AppError::Conflito(
                "Já existe um usuário com este email".into(),
            ));
        }

        let dados = NovoUsuario {
            email_login: payload.email_login,
            nome_completo: payload.nome_completo,
            telefone: payload.telefone,
            indicador: payload.indicador,
            obs: payload.obs,
        };

        self.repo.create(&self.pool, &dados).await
    }

    pub async fn atualizar(
        &self,
        id: Uuid,
        payload: AtualizarUsuarioPayload,
    ) -> Result<Usuario, AppError> {
        self.buscar(id).await?;

        let mudancas = AtualizarUsuario {
            email_login: payload.email_login,
            nome_completo: payload.nome_completo,
            telefone: payload.telefone,
            indicador: payload.indicador,
            obs: payload.obs,
            ciclo_atual: payload.ciclo,
        };

        self.repo.update(&self.pool, id, &mudancas).await
    }

    // Exclusão definitiva; pagamentos e churns do cliente caem junto por FK.
    pub async fn excluir(&self, id: Uuid) -> Result<(), AppError> {
        self.buscar(id).await?;
        self.repo.delete(&self.pool, id).await
    }
}
