// src/services/pagamento_service.rs

use chrono::{Duration, NaiveTime};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    common::paginacao::{PaginacaoQuery, RespostaPaginada},
    db::{ComissaoRepository, PagamentoFiltros, PagamentoRepository, UsuarioRepository},
    models::comissao::NovaComissao,
    models::pagamento::{
        AtualizarPagamento, AtualizarPagamentoPayload, CriarPagamentoPayload,
        EstatisticasPagamentos, NovoPagamento, Pagamento, PagamentoComUsuario, RegraTipo,
    },
    services::calculo_comissao::{
        elegivel_para_comissao, formatar_mes_pagto, valor_comissao_padrao,
    },
};

// Assinatura renova por 30 dias a cada pagamento.
const DIAS_DE_VIGENCIA: i64 = 30;

#[derive(Clone)]
pub struct PagamentoService {
    pagamentos: PagamentoRepository,
    usuarios: UsuarioRepository,
    comissoes: ComissaoRepository,
    pool: PgPool,
}

impl PagamentoService {
    pub fn new(
        pagamentos: PagamentoRepository,
        usuarios: UsuarioRepository,
        comissoes: ComissaoRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            pagamentos,
            usuarios,
            comissoes,
            pool,
        }
    }

    pub async fn listar(
        &self,
        filtros: &PagamentoFiltros,
        paginacao: &PaginacaoQuery,
    ) -> Result<RespostaPaginada<PagamentoComUsuario>, AppError> {
        let pagamentos = self.pagamentos.find_many(filtros, paginacao).await?;
        let total = self.pagamentos.count(filtros).await?;

        Ok(RespostaPaginada::nova(pagamentos, paginacao, total))
    }

    pub async fn buscar(&self, id: Uuid) -> Result<PagamentoComUsuario, AppError> {
        self.pagamentos
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NaoEncontrado("Pagamento não encontrado".into()))
    }

    pub async fn por_usuario(&self, usuario_id: Uuid) -> Result<Vec<Pagamento>, AppError> {
        self.usuarios
            .find_by_id(usuario_id)
            .await?
            .ok_or_else(|| AppError::NaoEncontrado("Usuário não encontrado".into()))?;

        self.pagamentos.find_by_usuario(usuario_id).await
    }

    // Fluxo central do negócio: registra o pagamento, reativa o cliente e,
    // quando há indicador, gera a comissão 1:1. Tudo em uma transação; se a
    // comissão falhar, o pagamento e a reativação são desfeitos juntos.
    pub async fn criar(&self, payload: CriarPagamentoPayload) -> Result<Pagamento, AppError> {
        let usuario = self
            .usuarios
            .find_by_id(payload.usuario_id)
            .await?
            .ok_or_else(|| AppError::NaoEncontrado("Usuário não encontrado".into()))?;

        let data_pagto = payload.data_pagto.and_time(NaiveTime::MIN).and_utc();
        let mes_pagto = formatar_mes_pagto(data_pagto);

        let elegivel = payload
            .elegivel_comissao
            .unwrap_or_else(|| elegivel_para_comissao(usuario.indicador.as_deref()));

        let dados = NovoPagamento {
            usuario_id: usuario.id,
            data_pagto,
            valor: payload.valor,
            metodo: payload.metodo,
            conta: payload.conta,
            mes_pagto: mes_pagto.clone(),
            regra_tipo: payload.regra_tipo,
            elegivel_comissao: elegivel,
            tipo_plano: payload.tipo_plano,
            obs: payload.obs,
        };

        let mut tx = self.pool.begin().await?;

        let pagamento = self.pagamentos.create(&mut *tx, &dados).await?;

        let ciclo = match payload.regra_tipo {
            RegraTipo::Primeiro => 1,
            RegraTipo::Recorrente => usuario.ciclo_atual + 1,
        };
        let vencimento = data_pagto + Duration::days(DIAS_DE_VIGENCIA);
        self.usuarios
            .ativar_apos_pagamento(&mut *tx, usuario.id, ciclo, vencimento)
            .await?;

        if elegivel {
            if let Some(indicador) = usuario.indicador.as_deref() {
                let valor = payload
                    .regra_valor
                    .unwrap_or_else(|| valor_comissao_padrao(payload.regra_tipo));

                self.comissoes
                    .create(
                        &mut *tx,
                        &NovaComissao {
                            pagamento_id: pagamento.id,
                            indicador: indicador.to_owned(),
                            regra_tipo: payload.regra_tipo,
                            valor,
                            mes_ref: mes_pagto.clone(),
                        },
                    )
                    .await?;

                tracing::info!(
                    indicador,
                    mes_ref = %mes_pagto,
                    "comissão gerada junto com o pagamento"
                );
            }
        }

        tx.commit().await?;

        Ok(pagamento)
    }

    // Atualização pontual de valor/data/método; nunca mexe no usuário nem
    // recalcula comissão já gerada.
    pub async fn atualizar(
        &self,
        id: Uuid,
        payload: AtualizarPagamentoPayload,
    ) -> Result<Pagamento, AppError> {
        self.buscar(id).await?;

        let data_pagto = payload
            .data_pagto
            .map(|d| d.and_time(NaiveTime::MIN).and_utc());
        let mudancas = AtualizarPagamento {
            data_pagto,
            valor: payload.valor,
            metodo: payload.metodo,
            conta: payload.conta,
            // mes_pagto acompanha a data quando ela muda.
            mes_pagto: data_pagto.map(formatar_mes_pagto),
            obs: payload.obs,
        };

        self.pagamentos.update(&self.pool, id, &mudancas).await
    }

    pub async fn excluir(&self, id: Uuid) -> Result<(), AppError> {
        self.buscar(id).await?;
        self.pagamentos.delete(&self.pool, id).await
    }

    pub async fn stats(
        &self,
        filtros: &PagamentoFiltros,
    ) -> Result<EstatisticasPagamentos, AppError> {
        let total = self.pagamentos.count(filtros).await?;
        let valor_total = self.pagamentos.sum_valores(filtros).await?;
        let por_metodo = self.pagamentos.group_by_metodo(filtros).await?;

        Ok(EstatisticasPagamentos {
            total,
            valor_total,
            por_metodo,
        })
    }
}
