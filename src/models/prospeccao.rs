// src/models/prospeccao.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::usuario::UsuarioResumo;
use crate::models::validacao::{validar_data_nao_futura, validar_telefone};

// Lead comercial. Quando convertido vira um usuário INATIVO e guarda o
// vínculo em usuario_id.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Prospeccao {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    pub data_contato: DateTime<Utc>,

    #[schema(example = "Carlos Pereira")]
    pub nome: String,

    #[schema(example = "carlos@email.com")]
    pub email: Option<String>,

    #[schema(example = "11988887777")]
    pub telefone: Option<String>,

    #[schema(example = "Instagram")]
    pub origem: String,

    #[schema(example = "João Silva")]
    pub indicador: Option<String>,

    pub interesse: Option<String>,

    pub convertido: bool,

    pub usuario_id: Option<Uuid>,

    pub obs: Option<String>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProspeccaoComUsuario {
    #[serde(flatten)]
    pub prospeccao: Prospeccao,

    pub usuario: Option<UsuarioResumo>,
}

// usuario_id é opcional, então o LEFT JOIN pode devolver as colunas `u_*`
// todas nulas. O flatten derivado não cobre esse caso.
impl<'r> FromRow<'r, PgRow> for ProspeccaoComUsuario {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let prospeccao = Prospeccao::from_row(row)?;
        let usuario = match row.try_get::<Option<Uuid>, _>("u_id")? {
            Some(_) => Some(UsuarioResumo::from_row(row)?),
            None => None,
        };
        Ok(Self { prospeccao, usuario })
    }
}

// --- Agregações ---

// Contagem por origem ou por indicador, com conversões por grupo.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TotalPorGrupo {
    #[schema(example = "Instagram")]
    pub chave: String,
    #[schema(example = 12)]
    pub total: i64,
    #[schema(example = 5)]
    pub convertidas: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EstatisticasProspeccoes {
    #[schema(example = 30)]
    pub total_prospeccoes: i64,
    #[schema(example = 9)]
    pub convertidas: i64,
    #[schema(example = 21)]
    pub nao_convertidas: i64,
    /// Percentual de conversão com duas casas decimais.
    #[schema(example = 30.0)]
    pub taxa_conversao: f64,
    pub por_origem: Vec<TotalPorGrupo>,
    pub por_indicador: Vec<TotalPorGrupo>,
}

// Resultado da conversão: lead marcado + usuário recém-criado.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversaoProspeccao {
    pub prospeccao: Prospeccao,
    pub usuario: crate::models::usuario::Usuario,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CriarProspeccaoPayload {
    #[validate(custom(function = validar_data_nao_futura))]
    #[schema(example = "2024-10-02")]
    pub data_contato: Option<NaiveDate>,

    #[validate(length(min = 3, max = 100, message = "Nome deve ter entre 3 e 100 caracteres"))]
    #[schema(example = "Carlos Pereira")]
    pub nome: String,

    #[validate(
        email(message = "Email inválido"),
        length(max = 100, message = "Email deve ter no máximo 100 caracteres")
    )]
    #[schema(example = "carlos@email.com")]
    pub email: Option<String>,

    #[validate(custom(function = validar_telefone))]
    #[schema(example = "11988887777")]
    pub telefone: Option<String>,

    #[validate(length(
        min = 1,
        max = 50,
        message = "Origem deve ter entre 1 e 50 caracteres"
    ))]
    #[schema(example = "Instagram")]
    pub origem: String,

    #[validate(length(max = 50, message = "Indicador deve ter no máximo 50 caracteres"))]
    pub indicador: Option<String>,

    #[validate(length(max = 500, message = "Interesse deve ter no máximo 500 caracteres"))]
    pub interesse: Option<String>,

    #[validate(length(max = 500, message = "Observação deve ter no máximo 500 caracteres"))]
    pub obs: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AtualizarProspeccaoPayload {
    #[validate(custom(function = validar_data_nao_futura))]
    pub data_contato: Option<NaiveDate>,

    #[validate(length(min = 3, max = 100, message = "Nome deve ter entre 3 e 100 caracteres"))]
    pub nome: Option<String>,

    #[validate(
        email(message = "Email inválido"),
        length(max = 100, message = "Email deve ter no máximo 100 caracteres")
    )]
    pub email: Option<String>,

    #[validate(custom(function = validar_telefone))]
    pub telefone: Option<String>,

    #[validate(length(
        min = 1,
        max = 50,
        message = "Origem deve ter entre 1 e 50 caracteres"
    ))]
    pub origem: Option<String>,

    #[validate(length(max = 50, message = "Indicador deve ter no máximo 50 caracteres"))]
    pub indicador: Option<String>,

    #[validate(length(max = 500, message = "Interesse deve ter no máximo 500 caracteres"))]
    pub interesse: Option<String>,

    pub convertido: Option<bool>,

    #[validate(length(max = 500, message = "Observação deve ter no máximo 500 caracteres"))]
    pub obs: Option<String>,
}

// Dados adicionais opcionais aplicados durante a conversão.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConverterProspeccaoPayload {
    #[validate(custom(function = validar_telefone))]
    pub telefone: Option<String>,

    #[validate(length(max = 50, message = "Indicador deve ter no máximo 50 caracteres"))]
    pub indicador: Option<String>,
}

// --- DTOs internos ---

#[derive(Debug, Clone)]
pub struct NovaProspeccao {
    pub data_contato: DateTime<Utc>,
    pub nome: String,
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub origem: String,
    pub indicador: Option<String>,
    pub interesse: Option<String>,
    pub obs: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AtualizarProspeccao {
    pub data_contato: Option<DateTime<Utc>>,
    pub nome: Option<String>,
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub origem: Option<String>,
    pub indicador: Option<String>,
    pub interesse: Option<String>,
    pub convertido: Option<bool>,
    pub obs: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload_base() -> CriarProspeccaoPayload {
        CriarProspeccaoPayload {
            data_contato: None,
            nome: "Carlos Pereira".into(),
            email: Some("carlos@email.com".into()),
            telefone: Some("11988887777".into()),
            origem: "Instagram".into(),
            indicador: None,
            interesse: None,
            obs: None,
        }
    }

    #[test]
    fn criar_prospeccao_valida_passa() {
        assert!(payload_base().validate().is_ok());
    }

    #[test]
    fn criar_prospeccao_rejeita_origem_vazia() {
        let mut payload = payload_base();
        payload.origem = String::new();
        let erros = payload.validate().unwrap_err();
        assert!(erros.field_errors().contains_key("origem"));
    }

    #[test]
    fn criar_prospeccao_rejeita_telefone_curto() {
        let mut payload = payload_base();
        payload.telefone = Some("9999".into());
        let erros = payload.validate().unwrap_err();
        assert!(erros.field_errors().contains_key("telefone"));
    }

    #[test]
    fn email_ausente_passa_na_validacao() {
        let mut payload = payload_base();
        payload.email = None;
        assert!(payload.validate().is_ok());
    }
}
