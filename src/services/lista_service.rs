// src/services/lista_service.rs

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ListaFiltros, ListaRepository},
    models::lista::{AtualizarListaPayload, CriarListaPayload, ListaAuxiliar, TipoLista},
};

#[derive(Clone)]
pub struct ListaService {
    listas: ListaRepository,
    pool: PgPool,
}

impl ListaService {
    pub fn new(listas: ListaRepository, pool: PgPool) -> Self {
        Self { listas, pool }
    }

    pub async fn listar(&self, filtros: &ListaFiltros) -> Result<Vec<ListaAuxiliar>, AppError> {
        self.listas.find_many(filtros).await
    }

    // Alimenta os selects de um tipo; por padrão só itens ativos.
    pub async fn listar_por_tipo(
        &self,
        tipo: TipoLista,
        ativo: Option<bool>,
    ) -> Result<Vec<ListaAuxiliar>, AppError> {
        let filtros = ListaFiltros {
            tipo: Some(tipo),
            ativo: Some(ativo.unwrap_or(true)),
        };

        self.listas.find_many(&filtros).await
    }

    // Uma consulta só; o agrupamento acontece em memória e todos os tipos
    // aparecem no mapa, mesmo vazios.
    pub async fn agrupadas(&self) -> Result<HashMap<TipoLista, Vec<ListaAuxiliar>>, AppError> {
        let filtros = ListaFiltros {
            tipo: None,
            ativo: Some(true),
        };
        let itens = self.listas.find_many(&filtros).await?;

        let mut grupos: HashMap<TipoLista, Vec<ListaAuxiliar>> = TipoLista::todos()
            .into_iter()
            .map(|tipo| (tipo, Vec::new()))
            .collect();

        for item in itens {
            grupos.entry(item.tipo).or_default().push(item);
        }

        Ok(grupos)
    }

    pub async fn buscar(&self, id: Uuid) -> Result<ListaAuxiliar, AppError> {
        self.listas
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NaoEncontrado("Item não encontrado".into()))
    }

    pub async fn criar(&self, payload: CriarListaPayload) -> Result<ListaAuxiliar, AppError> {
        if self
            .listas
            .find_por_tipo_valor(payload.tipo, &payload.valor)
            .await?
            .is_some()
        {
            return Err(AppError::Conflito(
                "Já existe um item com este valor para este tipo".into(),
            ));
        }

        self.listas
            .create(
                &self.pool,
                payload.tipo,
                &payload.valor,
                payload.ativo.unwrap_or(true),
            )
            .await
    }

    pub async fn atualizar(
        &self,
        id: Uuid,
        payload: AtualizarListaPayload,
    ) -> Result<ListaAuxiliar, AppError> {
        let existente = self.buscar(id).await?;

        if let Some(ref valor) = payload.valor {
            if *valor != existente.valor
                && self
                    .listas
                    .find_por_tipo_valor(existente.tipo, valor)
                    .await?
                    .is_some()
            {
                return Err(AppError::Conflito(
                    "Já existe um item com este valor para este tipo".into(),
                ));
            }
        }

        self.listas
            .update(&self.pool, id, payload.valor.as_deref(), payload.ativo)
            .await
    }

    // Soft delete: o item sai dos selects mas registros antigos continuam
    // apontando para o valor.
    pub async fn excluir(&self, id: Uuid) -> Result<ListaAuxiliar, AppError> {
        self.buscar(id).await?;
        self.listas.desativar(&self.pool, id).await
    }
}
