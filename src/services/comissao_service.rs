// src/services/comissao_service.rs

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    common::paginacao::{PaginacaoQuery, RespostaPaginada},
    db::{ComissaoFiltros, ComissaoRepository, PagamentoRepository},
    models::comissao::{
        AtualizarComissao, AtualizarComissaoPayload, Comissao, ComissaoComPagamento,
        ConsolidacaoIndicador, CriarComissaoPayload, EstatisticasComissoes, ExtratoComissao,
        NovaComissao, RelatorioMensal, ResumoRegra, TotalPorIndicadorRegra, TotalPorMesRegra,
    },
    models::pagamento::RegraTipo,
};

#[derive(Clone)]
pub struct ComissaoService {
    comissoes: ComissaoRepository,
    pagamentos: PagamentoRepository,
    pool: PgPool,
}

impl ComissaoService {
    pub fn new(
        comissoes: ComissaoRepository,
        pagamentos: PagamentoRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            comissoes,
            pagamentos,
            pool,
        }
    }

    pub async fn listar(
        &self,
        filtros: &ComissaoFiltros,
        paginacao: &PaginacaoQuery,
    ) -> Result<RespostaPaginada<ComissaoComPagamento>, AppError> {
        let comissoes = self.comissoes.find_many(filtros, paginacao).await?;
        let total = self.comissoes.count(filtros).await?;

        Ok(RespostaPaginada::nova(comissoes, paginacao, total))
    }

    pub async fn buscar(&self, id: Uuid) -> Result<ComissaoComPagamento, AppError> {
        self.comissoes
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NaoEncontrado("Comissão não encontrada".into()))
    }

    // Criação manual; o caminho normal é a comissão nascer junto com o
    // pagamento.
    pub async fn criar(&self, payload: CriarComissaoPayload) -> Result<Comissao, AppError> {
        self.pagamentos
            .find_by_id(payload.pagamento_id)
            .await?
            .ok_or_else(|| AppError::NaoEncontrado("Pagamento não encontrado".into()))?;

        if self
            .comissoes
            .find_by_pagamento(payload.pagamento_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflito(
                "Já existe comissão para este pagamento".into(),
            ));
        }

        let dados = NovaComissao {
            pagamento_id: payload.pagamento_id,
            indicador: payload.indicador,
            regra_tipo: payload.regra_tipo,
            valor: payload.valor,
            mes_ref: payload.mes_ref,
        };

        self.comissoes.create(&self.pool, &dados).await
    }

    pub async fn atualizar(
        &self,
        id: Uuid,
        payload: AtualizarComissaoPayload,
    ) -> Result<Comissao, AppError> {
        self.buscar(id).await?;

        let mudancas = AtualizarComissao {
            indicador: payload.indicador,
            regra_tipo: payload.regra_tipo,
            valor: payload.valor,
            mes_ref: payload.mes_ref,
        };

        self.comissoes.update(&self.pool, id, &mudancas).await
    }

    pub async fn excluir(&self, id: Uuid) -> Result<(), AppError> {
        self.buscar(id).await?;
        self.comissoes.delete(&self.pool, id).await
    }

    pub async fn extrato_por_indicador(
        &self,
        indicador: &str,
        mes_ref: Option<&str>,
    ) -> Result<Vec<ExtratoComissao>, AppError> {
        self.comissoes.find_by_indicador(indicador, mes_ref).await
    }

    // As contagens por regra reaproveitam o mesmo filtro com regra_tipo
    // sobrescrito, então qualquer recorte (mês, indicador) vale para todas.
    pub async fn stats(
        &self,
        filtros: &ComissaoFiltros,
    ) -> Result<EstatisticasComissoes, AppError> {
        let primeiro = ComissaoFiltros {
            regra_tipo: Some(RegraTipo::Primeiro),
            ..filtros.clone()
        };
        let recorrente = ComissaoFiltros {
            regra_tipo: Some(RegraTipo::Recorrente),
            ..filtros.clone()
        };

        let total_comissoes = self.comissoes.count(filtros).await?;
        let valor_total = self.comissoes.sum_valores(filtros).await?;
        let primeiras_adesoes = self.comissoes.count(&primeiro).await?;
        let valor_primeiras = self.comissoes.sum_valores(&primeiro).await?;
        let recorrentes = self.comissoes.count(&recorrente).await?;
        let valor_recorrentes = self.comissoes.sum_valores(&recorrente).await?;
        let total_indicadores = self.comissoes.group_by_indicador(filtros).await?.len() as i64;

        Ok(EstatisticasComissoes {
            total_comissoes,
            valor_total,
            primeiras_adesoes,
            valor_primeiras,
            recorrentes,
            valor_recorrentes,
            total_indicadores,
        })
    }

    pub async fn consolidacao_por_indicador(
        &self,
        filtros: &ComissaoFiltros,
    ) -> Result<Vec<ConsolidacaoIndicador>, AppError> {
        let linhas = self.comissoes.group_by_indicador_regra(filtros).await?;

        let mut consolidacao = consolidar_por_indicador(linhas);
        consolidacao.sort_by(|a, b| b.total_valor.cmp(&a.total_valor));

        Ok(consolidacao)
    }

    pub async fn relatorio_por_mes(
        &self,
        filtros: &ComissaoFiltros,
    ) -> Result<Vec<RelatorioMensal>, AppError> {
        let por_regra = self.comissoes.group_by_mes_regra(filtros).await?;
        let indicadores = self.comissoes.group_by_mes_indicador(filtros).await?;

        let unicos: BTreeMap<String, i64> = indicadores
            .into_iter()
            .map(|linha| (linha.mes_ref, linha.indicadores))
            .collect();

        Ok(montar_relatorio_mensal(por_regra, &unicos))
    }
}

// Uma linha por (indicador, regra) vira uma linha por indicador com os dois
// resumos lado a lado.
fn consolidar_por_indicador(linhas: Vec<TotalPorIndicadorRegra>) -> Vec<ConsolidacaoIndicador> {
    let mut mapa: BTreeMap<String, ConsolidacaoIndicador> = BTreeMap::new();

    for linha in linhas {
        let entrada = mapa
            .entry(linha.indicador.clone())
            .or_insert_with(|| ConsolidacaoIndicador {
                indicador: linha.indicador.clone(),
                primeiro: ResumoRegra::default(),
                recorrente: ResumoRegra::default(),
                total_valor: Decimal::ZERO,
            });

        let resumo = ResumoRegra {
            qtd: linha.quantidade,
            valor: linha.valor_total,
        };
        match linha.regra_tipo {
            RegraTipo::Primeiro => entrada.primeiro = resumo,
            RegraTipo::Recorrente => entrada.recorrente = resumo,
        }
        entrada.total_valor += linha.valor_total;
    }

    mapa.into_values().collect()
}

// BTreeMap com chave YYYY-MM já devolve os meses em ordem cronológica.
fn montar_relatorio_mensal(
    por_regra: Vec<TotalPorMesRegra>,
    unicos: &BTreeMap<String, i64>,
) -> Vec<RelatorioMensal> {
    let mut mapa: BTreeMap<String, RelatorioMensal> = BTreeMap::new();

    for linha in por_regra {
        let entrada = mapa
            .entry(linha.mes_ref.clone())
            .or_insert_with(|| RelatorioMensal {
                mes_ref: linha.mes_ref.clone(),
                primeiro: ResumoRegra::default(),
                recorrente: ResumoRegra::default(),
                total_valor: Decimal::ZERO,
                indicadores_unicos: unicos.get(&linha.mes_ref).copied().unwrap_or(0),
            });

        let resumo = ResumoRegra {
            qtd: linha.quantidade,
            valor: linha.valor_total,
        };
        match linha.regra_tipo {
            RegraTipo::Primeiro => entrada.primeiro = resumo,
            RegraTipo::Recorrente => entrada.recorrente = resumo,
        }
        entrada.total_valor += linha.valor_total;
    }

    mapa.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn linha_indicador(
        indicador: &str,
        regra: RegraTipo,
        qtd: i64,
        valor: Decimal,
    ) -> TotalPorIndicadorRegra {
        TotalPorIndicadorRegra {
            indicador: indicador.into(),
            regra_tipo: regra,
            quantidade: qtd,
            valor_total: valor,
        }
    }

    #[test]
    fn consolidacao_junta_as_duas_regras_do_mesmo_indicador() {
        let linhas = vec![
            linha_indicador("João", RegraTipo::Primeiro, 2, Decimal::new(20000, 2)),
            linha_indicador("João", RegraTipo::Recorrente, 3, Decimal::new(21000, 2)),
            linha_indicador("Maria", RegraTipo::Primeiro, 1, Decimal::new(10000, 2)),
        ];

        let consolidacao = consolidar_por_indicador(linhas);
        assert_eq!(consolidacao.len(), 2);

        let joao = consolidacao.iter().find(|c| c.indicador == "João").unwrap();
        assert_eq!(joao.primeiro.qtd, 2);
        assert_eq!(joao.recorrente.qtd, 3);
        assert_eq!(joao.total_valor, Decimal::new(41000, 2));

        let maria = consolidacao.iter().find(|c| c.indicador == "Maria").unwrap();
        assert_eq!(maria.primeiro.qtd, 1);
        assert_eq!(maria.recorrente.qtd, 0);
        assert_eq!(maria.recorrente.valor, Decimal::ZERO);
    }

    #[test]
    fn indicador_so_com_uma_regra_mantem_a_outra_zerada() {
        let linhas = vec![linha_indicador(
            "Ana",
            RegraTipo::Recorrente,
            4,
            Decimal::new(28000, 2),
        )];

        let consolidacao = consolidar_por_indicador(linhas);
        assert_eq!(consolidacao[0].primeiro.qtd, 0);
        assert_eq!(consolidacao[0].recorrente.qtd, 4);
        assert_eq!(consolidacao[0].total_valor, Decimal::new(28000, 2));
    }

    #[test]
    fn relatorio_mensal_ordena_por_mes_e_carrega_indicadores_unicos() {
        let por_regra = vec![
            TotalPorMesRegra {
                mes_ref: "2024-11".into(),
                regra_tipo: RegraTipo::Primeiro,
                quantidade: 1,
                valor_total: Decimal::new(10000, 2),
            },
            TotalPorMesRegra {
                mes_ref: "2024-10".into(),
                regra_tipo: RegraTipo::Primeiro,
                quantidade: 2,
                valor_total: Decimal::new(20000, 2),
            },
            TotalPorMesRegra {
                mes_ref: "2024-10".into(),
                regra_tipo: RegraTipo::Recorrente,
                quantidade: 5,
                valor_total: Decimal::new(35000, 2),
            },
        ];
        let unicos = BTreeMap::from([("2024-10".to_string(), 3), ("2024-11".to_string(), 1)]);

        let relatorio = montar_relatorio_mensal(por_regra, &unicos);

        assert_eq!(relatorio.len(), 2);
        assert_eq!(relatorio[0].mes_ref, "2024-10");
        assert_eq!(relatorio[0].total_valor, Decimal::new(55000, 2));
        assert_eq!(relatorio[0].indicadores_unicos, 3);
        assert_eq!(relatorio[1].mes_ref, "2024-11");
        assert_eq!(relatorio[1].recorrente.qtd, 0);
    }

    #[test]
    fn mes_sem_registro_de_indicadores_fica_com_zero() {
        let por_regra = vec![TotalPorMesRegra {
            mes_ref: "2024-12".into(),
            regra_tipo: RegraTipo::Recorrente,
            quantidade: 1,
            valor_total: Decimal::new(7000, 2),
        }];

        let relatorio = montar_relatorio_mensal(por_regra, &BTreeMap::new());
        assert_eq!(relatorio[0].indicadores_unicos, 0);
    }
}
