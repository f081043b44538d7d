// src/models/churn.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::usuario::UsuarioResumo;
use crate::models::validacao::validar_data_nao_futura;

// Registro de cancelamento. O usuário vai para HISTORICO na criação e a
// reversão o reativa conforme o vencimento.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Churn {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    pub usuario_id: Uuid,

    pub data_churn: DateTime<Utc>,

    #[schema(example = "Preço alto")]
    pub motivo: String,

    pub revertido: bool,

    pub observacao: Option<String>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChurnComUsuario {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub churn: Churn,

    #[sqlx(flatten)]
    pub usuario: UsuarioResumo,
}

// --- Agregações ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TotalPorMotivo {
    #[schema(example = "Preço alto")]
    pub motivo: String,
    #[schema(example = 4)]
    pub quantidade: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EstatisticasChurn {
    #[schema(example = 12)]
    pub total_churns: i64,
    #[schema(example = 9)]
    pub churn_ativos: i64,
    #[schema(example = 3)]
    pub churn_revertidos: i64,
    /// Percentual de reversão com duas casas decimais.
    #[schema(example = 25.0)]
    pub taxa_reversao: f64,
    pub churn_por_motivo: Vec<TotalPorMotivo>,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CriarChurnPayload {
    pub usuario_id: Uuid,

    #[validate(custom(function = validar_data_nao_futura))]
    #[schema(example = "2024-10-05")]
    pub data_churn: NaiveDate,

    #[validate(length(
        min = 3,
        max = 500,
        message = "Motivo deve ter entre 3 e 500 caracteres"
    ))]
    #[schema(example = "Preço alto")]
    pub motivo: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AtualizarChurnPayload {
    #[validate(custom(function = validar_data_nao_futura))]
    pub data_churn: Option<NaiveDate>,

    #[validate(length(
        min = 3,
        max = 500,
        message = "Motivo deve ter entre 3 e 500 caracteres"
    ))]
    pub motivo: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReverterChurnPayload {
    #[validate(length(max = 500, message = "Observação deve ter no máximo 500 caracteres"))]
    pub observacao: Option<String>,
}

// --- DTOs internos ---

#[derive(Debug, Clone)]
pub struct NovoChurn {
    pub usuario_id: Uuid,
    pub data_churn: DateTime<Utc>,
    pub motivo: String,
}

#[derive(Debug, Clone, Default)]
pub struct AtualizarChurn {
    pub data_churn: Option<DateTime<Utc>>,
    pub motivo: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn criar_churn_valido_passa() {
        let payload = CriarChurnPayload {
            usuario_id: Uuid::new_v4(),
            data_churn: Utc::now().date_naive(),
            motivo: "Preço alto".into(),
        };
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn criar_churn_rejeita_data_futura() {
        let payload = CriarChurnPayload {
            usuario_id: Uuid::new_v4(),
            data_churn: (Utc::now() + Duration::days(2)).date_naive(),
            motivo: "Preço alto".into(),
        };
        let erros = payload.validate().unwrap_err();
        assert!(erros.field_errors().contains_key("data_churn"));
    }

    #[test]
    fn criar_churn_rejeita_motivo_curto() {
        let payload = CriarChurnPayload {
            usuario_id: Uuid::new_v4(),
            data_churn: Utc::now().date_naive(),
            motivo: "ab".into(),
        };
        let erros = payload.validate().unwrap_err();
        assert!(erros.field_errors().contains_key("motivo"));
    }

    #[test]
    fn reverter_aceita_observacao_ausente() {
        let payload = ReverterChurnPayload { observacao: None };
        assert!(payload.validate().is_ok());
    }
}
