// src/models/despesa.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::validacao::{validar_data_nao_futura, validar_valor_monetario};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "status_despesa", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusDespesa {
    Pago,
    Pendente,
}

// Despesa operacional, com competência (mês/ano contábil) separada da data
// do lançamento.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Despesa {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    pub data: DateTime<Utc>,

    #[schema(example = "Assinatura de software")]
    pub descricao: String,

    #[schema(example = "Ferramentas")]
    pub categoria: String,

    #[schema(example = "89.90")]
    pub valor: Decimal,

    #[schema(example = "Nubank PJ")]
    pub conta: String,

    pub status: StatusDespesa,

    #[schema(example = "João Silva")]
    pub indicador: Option<String>,

    #[schema(example = 10, minimum = 1, maximum = 12)]
    pub competencia_mes: i32,

    #[schema(example = 2024)]
    pub competencia_ano: i32,

    pub obs: Option<String>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

// --- Agregações ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TotalPorCategoria {
    #[schema(example = "Ferramentas")]
    pub categoria: String,
    #[schema(example = 6)]
    pub quantidade: i64,
    #[schema(example = "539.40")]
    pub valor_total: Decimal,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TotalPorCompetencia {
    #[schema(example = 2024)]
    pub competencia_ano: i32,
    #[schema(example = 10, minimum = 1, maximum = 12)]
    pub competencia_mes: i32,
    #[schema(example = 14)]
    pub quantidade: i64,
    #[schema(example = "2310.75")]
    pub valor_total: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EstatisticasDespesas {
    #[schema(example = 20)]
    pub total_despesas: i64,
    #[schema(example = "3500.00")]
    pub valor_total: Decimal,
    #[schema(example = "2800.00")]
    pub valor_pago: Decimal,
    #[schema(example = "700.00")]
    pub valor_pendente: Decimal,
    #[schema(example = 16)]
    pub despesas_pagas: i64,
    #[schema(example = 4)]
    pub despesas_pendentes: i64,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CriarDespesaPayload {
    #[validate(custom(function = validar_data_nao_futura))]
    #[schema(example = "2024-10-03")]
    pub data: NaiveDate,

    #[validate(length(
        min = 3,
        max = 200,
        message = "Descrição deve ter entre 3 e 200 caracteres"
    ))]
    #[schema(example = "Assinatura de software")]
    pub descricao: String,

    #[validate(length(
        min = 1,
        max = 50,
        message = "Categoria deve ter entre 1 e 50 caracteres"
    ))]
    #[schema(example = "Ferramentas")]
    pub categoria: String,

    #[validate(custom(function = validar_valor_monetario))]
    #[schema(example = "89.90")]
    pub valor: Decimal,

    #[validate(length(min = 1, max = 50, message = "Conta deve ter entre 1 e 50 caracteres"))]
    #[schema(example = "Nubank PJ")]
    pub conta: String,

    pub status: Option<StatusDespesa>,

    #[validate(length(max = 50, message = "Indicador deve ter no máximo 50 caracteres"))]
    pub indicador: Option<String>,

    /// Quando ausente, deriva da data do lançamento.
    #[validate(range(min = 1, max = 12, message = "Mês de competência deve estar entre 1 e 12"))]
    pub competencia_mes: Option<i32>,

    #[validate(range(
        min = 2000,
        max = 2100,
        message = "Ano de competência deve estar entre 2000 e 2100"
    ))]
    pub competencia_ano: Option<i32>,

    #[validate(length(max = 500, message = "Observação deve ter no máximo 500 caracteres"))]
    pub obs: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AtualizarDespesaPayload {
    #[validate(custom(function = validar_data_nao_futura))]
    pub data: Option<NaiveDate>,

    #[validate(length(
        min = 3,
        max = 200,
        message = "Descrição deve ter entre 3 e 200 caracteres"
    ))]
    pub descricao: Option<String>,

    #[validate(length(
        min = 1,
        max = 50,
        message = "Categoria deve ter entre 1 e 50 caracteres"
    ))]
    pub categoria: Option<String>,

    #[validate(custom(function = validar_valor_monetario))]
    pub valor: Option<Decimal>,

    #[validate(length(min = 1, max = 50, message = "Conta deve ter entre 1 e 50 caracteres"))]
    pub conta: Option<String>,

    pub status: Option<StatusDespesa>,

    #[validate(length(max = 50, message = "Indicador deve ter no máximo 50 caracteres"))]
    pub indicador: Option<String>,

    #[validate(range(min = 1, max = 12, message = "Mês de competência deve estar entre 1 e 12"))]
    pub competencia_mes: Option<i32>,

    #[validate(range(
        min = 2000,
        max = 2100,
        message = "Ano de competência deve estar entre 2000 e 2100"
    ))]
    pub competencia_ano: Option<i32>,

    #[validate(length(max = 500, message = "Observação deve ter no máximo 500 caracteres"))]
    pub obs: Option<String>,
}

// --- DTOs internos ---

#[derive(Debug, Clone)]
pub struct NovaDespesa {
    pub data: DateTime<Utc>,
    pub descricao: String,
    pub categoria: String,
    pub valor: Decimal,
    pub conta: String,
    pub status: StatusDespesa,
    pub indicador: Option<String>,
    pub competencia_mes: i32,
    pub competencia_ano: i32,
    pub obs: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AtualizarDespesa {
    pub data: Option<DateTime<Utc>>,
    pub descricao: Option<String>,
    pub categoria: Option<String>,
    pub valor: Option<Decimal>,
    pub conta: Option<String>,
    pub status: Option<StatusDespesa>,
    pub indicador: Option<String>,
    pub competencia_mes: Option<i32>,
    pub competencia_ano: Option<i32>,
    pub obs: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn payload_base() -> CriarDespesaPayload {
        CriarDespesaPayload {
            data: Utc::now().date_naive(),
            descricao: "Assinatura de software".into(),
            categoria: "Ferramentas".into(),
            valor: Decimal::from_str("89.90").unwrap(),
            conta: "Nubank PJ".into(),
            status: None,
            indicador: None,
            competencia_mes: None,
            competencia_ano: None,
            obs: None,
        }
    }

    #[test]
    fn criar_despesa_valida_passa() {
        assert!(payload_base().validate().is_ok());
    }

    #[test]
    fn criar_despesa_rejeita_descricao_curta() {
        let mut payload = payload_base();
        payload.descricao = "ab".into();
        let erros = payload.validate().unwrap_err();
        assert!(erros.field_errors().contains_key("descricao"));
    }

    #[test]
    fn criar_despesa_rejeita_competencia_fora_do_intervalo() {
        let mut payload = payload_base();
        payload.competencia_mes = Some(13);
        let erros = payload.validate().unwrap_err();
        assert!(erros.field_errors().contains_key("competencia_mes"));

        let mut payload = payload_base();
        payload.competencia_ano = Some(1999);
        let erros = payload.validate().unwrap_err();
        assert!(erros.field_errors().contains_key("competencia_ano"));
    }

    #[test]
    fn status_desconhecido_nao_desserializa() {
        assert!(serde_json::from_str::<StatusDespesa>("\"PAGO\"").is_ok());
        assert!(serde_json::from_str::<StatusDespesa>("\"ATRASADO\"").is_err());
    }
}
