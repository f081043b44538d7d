// src/models/comissao.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::pagamento::{PagamentoResumo, RegraTipo};
use crate::models::usuario::UsuarioResumo;
use crate::models::validacao::{validar_mes_ref, validar_valor_monetario};

// Comissão gerada para o indicador de um cliente. Relação 1:1 com o
// pagamento que a originou.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Comissao {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    pub pagamento_id: Uuid,

    #[schema(example = "João Silva")]
    pub indicador: String,

    #[schema(example = "100.00")]
    pub valor: Decimal,

    /// Mês de referência no formato YYYY-MM.
    #[schema(example = "2024-10")]
    pub mes_ref: String,

    pub regra_tipo: RegraTipo,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComissaoComPagamento {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub comissao: Comissao,

    #[sqlx(flatten)]
    pub pagamento: PagamentoResumo,
}

// Linha do extrato de um indicador: comissão + pagamento de origem + cliente.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtratoComissao {
    pub id: Uuid,

    /// Mês de referência no formato YYYY-MM.
    #[schema(example = "2024-10")]
    pub mes: String,

    pub regra_tipo: RegraTipo,

    #[schema(example = "100.00")]
    pub valor: Decimal,

    pub data_pagto: DateTime<Utc>,

    #[sqlx(flatten)]
    pub usuario: UsuarioResumo,
}

// --- Agregações ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TotalPorIndicador {
    #[schema(example = "João Silva")]
    pub indicador: String,
    #[schema(example = 8)]
    pub quantidade: i64,
    #[schema(example = "640.00")]
    pub valor_total: Decimal,
}

// Agregação por (indicador, regra) que alimenta a consolidação.
#[derive(Debug, Clone, FromRow)]
pub struct TotalPorIndicadorRegra {
    pub indicador: String,
    pub regra_tipo: RegraTipo,
    pub quantidade: i64,
    pub valor_total: Decimal,
}

// Agregação por (mês, regra) que alimenta o relatório mensal.
#[derive(Debug, Clone, FromRow)]
pub struct TotalPorMesRegra {
    pub mes_ref: String,
    pub regra_tipo: RegraTipo,
    pub quantidade: i64,
    pub valor_total: Decimal,
}

// Quantos indicadores distintos atuaram em cada mês.
#[derive(Debug, Clone, FromRow)]
pub struct IndicadoresPorMes {
    pub mes_ref: String,
    pub indicadores: i64,
}

// Par (quantidade, valor) de uma regra dentro de uma consolidação.
#[derive(Debug, Clone, Copy, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumoRegra {
    #[schema(example = 3)]
    pub qtd: i64,
    #[schema(example = "300.00")]
    pub valor: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidacaoIndicador {
    #[schema(example = "João Silva")]
    pub indicador: String,
    pub primeiro: ResumoRegra,
    pub recorrente: ResumoRegra,
    #[schema(example = "860.00")]
    pub total_valor: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RelatorioMensal {
    #[schema(example = "2024-10")]
    pub mes_ref: String,
    pub primeiro: ResumoRegra,
    pub recorrente: ResumoRegra,
    #[schema(example = "860.00")]
    pub total_valor: Decimal,
    #[schema(example = 4)]
    pub indicadores_unicos: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EstatisticasComissoes {
    #[schema(example = 42)]
    pub total_comissoes: i64,
    #[schema(example = "3580.00")]
    pub valor_total: Decimal,
    #[schema(example = 12)]
    pub primeiras_adesoes: i64,
    #[schema(example = "1200.00")]
    pub valor_primeiras: Decimal,
    #[schema(example = 30)]
    pub recorrentes: i64,
    #[schema(example = "2380.00")]
    pub valor_recorrentes: Decimal,
    #[schema(example = 6)]
    pub total_indicadores: i64,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CriarComissaoPayload {
    pub pagamento_id: Uuid,

    #[validate(length(
        min = 1,
        max = 50,
        message = "Indicador deve ter entre 1 e 50 caracteres"
    ))]
    #[schema(example = "João Silva")]
    pub indicador: String,

    pub regra_tipo: RegraTipo,

    #[validate(custom(function = validar_valor_monetario))]
    #[schema(example = "100.00")]
    pub valor: Decimal,

    #[validate(custom(function = validar_mes_ref))]
    #[schema(example = "2024-10")]
    pub mes_ref: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AtualizarComissaoPayload {
    #[validate(length(
        min = 1,
        max = 50,
        message = "Indicador deve ter entre 1 e 50 caracteres"
    ))]
    pub indicador: Option<String>,

    pub regra_tipo: Option<RegraTipo>,

    #[validate(custom(function = validar_valor_monetario))]
    pub valor: Option<Decimal>,

    #[validate(custom(function = validar_mes_ref))]
    pub mes_ref: Option<String>,
}

// --- DTOs internos ---

#[derive(Debug, Clone)]
pub struct NovaComissao {
    pub pagamento_id: Uuid,
    pub indicador: String,
    pub valor: Decimal,
    pub mes_ref: String,
    pub regra_tipo: RegraTipo,
}

#[derive(Debug, Clone, Default)]
pub struct AtualizarComissao {
    pub indicador: Option<String>,
    pub regra_tipo: Option<RegraTipo>,
    pub valor: Option<Decimal>,
    pub mes_ref: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn criar_comissao_valida_passa() {
        let payload = CriarComissaoPayload {
            pagamento_id: Uuid::new_v4(),
            indicador: "João Silva".into(),
            regra_tipo: RegraTipo::Primeiro,
            valor: Decimal::from_str("100.00").unwrap(),
            mes_ref: "2024-10".into(),
        };
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn criar_comissao_rejeita_mes_ref_invalido() {
        let payload = CriarComissaoPayload {
            pagamento_id: Uuid::new_v4(),
            indicador: "João Silva".into(),
            regra_tipo: RegraTipo::Recorrente,
            valor: Decimal::from_str("70.00").unwrap(),
            mes_ref: "10/2024".into(),
        };
        let erros = payload.validate().unwrap_err();
        assert!(erros.field_errors().contains_key("mes_ref"));
    }

    #[test]
    fn criar_comissao_rejeita_indicador_vazio() {
        let payload = CriarComissaoPayload {
            pagamento_id: Uuid::new_v4(),
            indicador: String::new(),
            regra_tipo: RegraTipo::Primeiro,
            valor: Decimal::from_str("100.00").unwrap(),
            mes_ref: "2024-10".into(),
        };
        let erros = payload.validate().unwrap_err();
        assert!(erros.field_errors().contains_key("indicador"));
    }

    #[test]
    fn atualizar_comissao_sem_campos_passa() {
        let payload = AtualizarComissaoPayload {
            indicador: None,
            regra_tipo: None,
            valor: None,
            mes_ref: None,
        };
        assert!(payload.validate().is_ok());
    }
}
