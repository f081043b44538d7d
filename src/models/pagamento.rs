// src/models/pagamento.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::usuario::UsuarioResumo;
use crate::models::validacao::{
    validar_data_nao_futura, validar_regra_valor, validar_valor_monetario,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "metodo_pagamento", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetodoPagamento {
    Pix,
    Credito,
    Dinheiro,
}

// PRIMEIRO = adesão (comissão padrão R$ 100), RECORRENTE = renovação (R$ 70).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "regra_tipo", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegraTipo {
    Primeiro,
    Recorrente,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagamento {
    pub id: Uuid,

    pub usuario_id: Uuid,

    pub data_pagto: DateTime<Utc>,

    #[schema(example = "149.90")]
    pub valor: Decimal,

    pub metodo: MetodoPagamento,

    #[schema(example = "PXT")]
    pub conta: String,

    // Sempre derivado de data_pagto, formato YYYY-MM.
    #[schema(example = "2024-10")]
    pub mes_pagto: String,

    pub regra_tipo: RegraTipo,

    pub elegivel_comissao: bool,

    pub tipo_plano: Option<String>,

    pub obs: Option<String>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Linha de listagem: pagamento com o resumo do usuário embutido.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PagamentoComUsuario {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub pagamento: Pagamento,

    #[sqlx(flatten)]
    pub usuario: UsuarioResumo,
}

// Projeção usada nas listagens de comissões (prefixo `p_`).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PagamentoResumo {
    #[sqlx(rename = "p_id")]
    pub id: Uuid,

    #[sqlx(rename = "p_data_pagto")]
    pub data_pagto: DateTime<Utc>,

    #[sqlx(rename = "p_valor")]
    #[schema(example = "149.90")]
    pub valor: Decimal,

    #[sqlx(rename = "p_metodo")]
    pub metodo: MetodoPagamento,

    #[sqlx(rename = "p_usuario_id")]
    pub usuario_id: Uuid,
}

// --- Agregações ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TotalPorMetodo {
    pub metodo: MetodoPagamento,
    #[schema(example = 12)]
    pub quantidade: i64,
    #[schema(example = "1798.80")]
    pub valor_total: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EstatisticasPagamentos {
    pub total: i64,
    #[schema(example = "1798.80")]
    pub valor_total: Decimal,
    pub por_metodo: Vec<TotalPorMetodo>,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CriarPagamentoPayload {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub usuario_id: Uuid,

    #[validate(custom(function = validar_valor_monetario))]
    #[schema(example = "149.90")]
    pub valor: Decimal,

    #[validate(custom(function = validar_data_nao_futura))]
    #[schema(value_type = String, format = Date, example = "2024-10-05")]
    pub data_pagto: NaiveDate,

    pub metodo: MetodoPagamento,

    #[validate(length(min = 1, max = 50, message = "Conta deve ter entre 1 e 50 caracteres"))]
    #[schema(example = "PXT")]
    pub conta: String,

    pub regra_tipo: RegraTipo,

    // Sobrescreve o valor padrão da comissão quando informado.
    #[validate(custom(function = validar_regra_valor))]
    #[schema(example = "70.00")]
    pub regra_valor: Option<Decimal>,

    // Quando ausente, é calculado a partir do indicador do usuário.
    pub elegivel_comissao: Option<bool>,

    #[validate(length(max = 50, message = "Tipo de plano deve ter no máximo 50 caracteres"))]
    pub tipo_plano: Option<String>,

    #[validate(length(max = 500, message = "Observação deve ter no máximo 500 caracteres"))]
    pub obs: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AtualizarPagamentoPayload {
    #[validate(custom(function = validar_valor_monetario))]
    pub valor: Option<Decimal>,

    #[validate(custom(function = validar_data_nao_futura))]
    #[schema(value_type = Option<String>, format = Date, example = "2024-10-05")]
    pub data_pagto: Option<NaiveDate>,

    pub metodo: Option<MetodoPagamento>,

    #[validate(length(min = 1, max = 50, message = "Conta deve ter entre 1 e 50 caracteres"))]
    pub conta: Option<String>,

    #[validate(length(max = 500, message = "Observação deve ter no máximo 500 caracteres"))]
    pub obs: Option<String>,
}

// --- Dados prontos para o repositório ---

#[derive(Debug, Clone)]
pub struct NovoPagamento {
    pub usuario_id: Uuid,
    pub data_pagto: DateTime<Utc>,
    pub valor: Decimal,
    pub metodo: MetodoPagamento,
    pub conta: String,
    pub mes_pagto: String,
    pub regra_tipo: RegraTipo,
    pub elegivel_comissao: bool,
    pub tipo_plano: Option<String>,
    pub obs: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AtualizarPagamento {
    pub data_pagto: Option<DateTime<Utc>>,
    pub valor: Option<Decimal>,
    pub metodo: Option<MetodoPagamento>,
    pub conta: Option<String>,
    pub mes_pagto: Option<String>,
    pub obs: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn payload_base() -> CriarPagamentoPayload {
        CriarPagamentoPayload {
            usuario_id: Uuid::new_v4(),
            valor: Decimal::from_str("149.90").unwrap(),
            data_pagto: Utc::now().date_naive(),
            metodo: MetodoPagamento::Pix,
            conta: "PXT".into(),
            regra_tipo: RegraTipo::Primeiro,
            regra_valor: None,
            elegivel_comissao: None,
            tipo_plano: None,
            obs: None,
        }
    }

    #[test]
    fn pagamento_valido_passa() {
        assert!(payload_base().validate().is_ok());
    }

    #[test]
    fn rejeita_valor_acima_do_teto() {
        let mut payload = payload_base();
        payload.valor = Decimal::from_str("1000000.00").unwrap();
        let erros = payload.validate().unwrap_err();
        assert!(erros.field_errors().contains_key("valor"));

        payload.valor = Decimal::from_str("999999.99").unwrap();
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn rejeita_data_futura() {
        let mut payload = payload_base();
        payload.data_pagto = Utc::now().date_naive() + chrono::Duration::days(2);
        assert!(payload.validate().is_err());
    }

    #[test]
    fn rejeita_regra_valor_fora_da_faixa() {
        let mut payload = payload_base();
        payload.regra_valor = Some(Decimal::from_str("150.00").unwrap());
        assert!(payload.validate().is_err());

        payload.regra_valor = Some(Decimal::from_str("70.00").unwrap());
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn enums_rejeitam_valores_desconhecidos() {
        assert!(serde_json::from_str::<MetodoPagamento>("\"PIX\"").is_ok());
        assert!(serde_json::from_str::<MetodoPagamento>("\"BOLETO\"").is_err());
        assert!(serde_json::from_str::<RegraTipo>("\"RECORRENTE\"").is_ok());
        assert!(serde_json::from_str::<RegraTipo>("\"TERCEIRO\"").is_err());
    }
}
