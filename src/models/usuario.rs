// src/models/usuario.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::validacao::validar_telefone;

// Ciclo de vida do cliente: entra INATIVO, pagamento ativa, churn manda
// para HISTORICO.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "status_final", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusFinal {
    Ativo,
    Inativo,
    EmAtraso,
    Historico,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Usuario {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    #[schema(example = "cliente@email.com")]
    pub email_login: String,

    #[schema(example = "Maria da Silva")]
    pub nome_completo: String,

    #[schema(example = "11999998888")]
    pub telefone: Option<String>,

    #[schema(example = "João Silva")]
    pub indicador: Option<String>,

    pub status_final: StatusFinal,

    pub data_entrada: DateTime<Utc>,

    pub vencimento: Option<DateTime<Utc>>,

    #[schema(example = 1)]
    pub ciclo_atual: i32,

    pub obs: Option<String>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

// Projeção enxuta que acompanha pagamentos, churns e prospecções nas
// listagens. As colunas chegam com o prefixo `u_` para não colidir com as
// da tabela principal.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UsuarioResumo {
    #[sqlx(rename = "u_id")]
    pub id: Uuid,

    #[sqlx(rename = "u_email_login")]
    #[schema(example = "cliente@email.com")]
    pub email_login: String,

    #[sqlx(rename = "u_nome_completo")]
    #[schema(example = "Maria da Silva")]
    pub nome_completo: String,

    #[sqlx(rename = "u_status_final")]
    pub status_final: StatusFinal,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CriarUsuarioPayload {
    #[validate(
        email(message = "Email inválido"),
        length(max = 100, message = "Email deve ter no máximo 100 caracteres")
    )]
    #[schema(example = "cliente@email.com")]
    pub email_login: String,

    #[validate(length(
        min = 3,
        max = 100,
        message = "Nome completo deve ter entre 3 e 100 caracteres"
    ))]
    #[schema(example = "Maria da Silva")]
    pub nome_completo: String,

    #[validate(custom(function = validar_telefone))]
    #[schema(example = "11999998888")]
    pub telefone: Option<String>,

    #[validate(length(max = 50, message = "Indicador deve ter no máximo 50 caracteres"))]
    #[schema(example = "João Silva")]
    pub indicador: Option<String>,

    #[validate(length(max = 500, message = "Observação deve ter no máximo 500 caracteres"))]
    pub obs: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AtualizarUsuarioPayload {
    #[validate(
        email(message = "Email inválido"),
        length(max = 100, message = "Email deve ter no máximo 100 caracteres")
    )]
    pub email_login: Option<String>,

    #[validate(length(
        min = 3,
        max = 100,
        message = "Nome completo deve ter entre 3 e 100 caracteres"
    ))]
    pub nome_completo: Option<String>,

    #[validate(custom(function = validar_telefone))]
    pub telefone: Option<String>,

    #[validate(length(max = 50, message = "Indicador deve ter no máximo 50 caracteres"))]
    pub indicador: Option<String>,

    #[validate(length(max = 500, message = "Observação deve ter no máximo 500 caracteres"))]
    pub obs: Option<String>,

    #[validate(range(min = 0, message = "Ciclo deve ser maior ou igual a 0"))]
    pub ciclo: Option<i32>,
}

// --- Dados prontos para o repositório ---

#[derive(Debug, Clone)]
pub struct NovoUsuario {
    pub email_login: String,
    pub nome_completo: String,
    pub telefone: Option<String>,
    pub indicador: Option<String>,
    pub obs: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AtualizarUsuario {
    pub email_login: Option<String>,
    pub nome_completo: Option<String>,
    pub telefone: Option<String>,
    pub indicador: Option<String>,
    pub obs: Option<String>,
    pub ciclo_atual: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_valido_passa() {
        let payload = CriarUsuarioPayload {
            email_login: "cliente@email.com".into(),
            nome_completo: "Maria da Silva".into(),
            telefone: Some("11999998888".into()),
            indicador: None,
            obs: None,
        };
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn rejeita_email_e_nome_invalidos() {
        let payload = CriarUsuarioPayload {
            email_login: "nao-e-email".into(),
            nome_completo: "ab".into(),
            telefone: None,
            indicador: None,
            obs: None,
        };
        let erros = payload.validate().unwrap_err();
        assert!(erros.field_errors().contains_key("email_login"));
        assert!(erros.field_errors().contains_key("nome_completo"));
    }

    #[test]
    fn atualizacao_vazia_e_valida() {
        let payload = AtualizarUsuarioPayload {
            email_login: None,
            nome_completo: None,
            telefone: None,
            indicador: None,
            obs: None,
            ciclo: None,
        };
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn telefone_com_mascara_e_rejeitado_na_atualizacao() {
        let payload = AtualizarUsuarioPayload {
            email_login: None,
            nome_completo: None,
            telefone: Some("(11) 99999-8888".into()),
            indicador: None,
            obs: None,
            ciclo: None,
        };
        assert!(payload.validate().is_err());
    }
}
