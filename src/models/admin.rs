// src/models/admin.rs

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_USER: &str = "USER";

// Operador do painel. Carrega o hash de senha e por isso nunca sai em
// resposta HTTP; use AdminSeguro.
#[derive(Debug, Clone, FromRow)]
pub struct Admin {
    pub id: Uuid,
    pub login: String,
    pub senha: String,
    pub nome: String,
    pub email: Option<String>,
    pub role: String,
    pub ativo: bool,
    pub aprovado: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

// Projeção sem o hash, usada em /me e na resposta de login.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminSeguro {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    #[schema(example = "maria")]
    pub login: String,

    #[schema(example = "Maria Souza")]
    pub nome: String,

    #[schema(example = "maria@email.com")]
    pub email: Option<String>,

    #[schema(example = "ADMIN")]
    pub role: String,

    pub ativo: bool,
    pub aprovado: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Admin> for AdminSeguro {
    fn from(admin: Admin) -> Self {
        Self {
            id: admin.id,
            login: admin.login,
            nome: admin.nome,
            email: admin.email,
            role: admin.role,
            ativo: admin.ativo,
            aprovado: admin.aprovado,
            created_at: admin.created_at,
            updated_at: admin.updated_at,
        }
    }
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub login: String,
    pub role: String,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RespostaLogin {
    pub token: String,
    pub admin: AdminSeguro,
}

// --- Validações de credencial ---

fn erro(codigo: &'static str, mensagem: &'static str) -> ValidationError {
    let mut err = ValidationError::new(codigo);
    err.message = Some(Cow::Borrowed(mensagem));
    err
}

pub fn validar_login(login: &str) -> Result<(), ValidationError> {
    if !login
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(erro(
            "login_caracteres",
            "Login deve conter apenas letras, números, _ e -",
        ));
    }
    Ok(())
}

// Exige maiúscula, minúscula e dígito, na mesma ordem de mensagens do
// cadastro original.
pub fn validar_senha_forte(senha: &str) -> Result<(), ValidationError> {
    if !senha.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(erro(
            "senha_maiuscula",
            "Senha deve conter pelo menos uma letra maiúscula",
        ));
    }
    if !senha.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(erro(
            "senha_minuscula",
            "Senha deve conter pelo menos uma letra minúscula",
        ));
    }
    if !senha.chars().any(|c| c.is_ascii_digit()) {
        return Err(erro(
            "senha_numero",
            "Senha deve conter pelo menos um número",
        ));
    }
    Ok(())
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrarPayload {
    #[validate(
        length(min = 3, max = 50, message = "Login deve ter entre 3 e 50 caracteres"),
        custom(function = validar_login)
    )]
    #[schema(example = "maria")]
    pub login: String,

    #[validate(
        length(
            min = 8,
            max = 100,
            message = "Senha deve ter entre 8 e 100 caracteres"
        ),
        custom(function = validar_senha_forte)
    )]
    #[schema(example = "SenhaForte1")]
    pub senha: String,

    #[validate(length(min = 3, max = 100, message = "Nome deve ter entre 3 e 100 caracteres"))]
    #[schema(example = "Maria Souza")]
    pub nome: String,

    #[validate(
        email(message = "Email inválido"),
        length(max = 100, message = "Email deve ter no máximo 100 caracteres")
    )]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    #[validate(length(min = 3, max = 50, message = "Login deve ter entre 3 e 50 caracteres"))]
    #[schema(example = "maria")]
    pub login: String,

    #[validate(length(
        min = 6,
        max = 100,
        message = "Senha deve ter entre 6 e 100 caracteres"
    ))]
    #[schema(example = "SenhaForte1")]
    pub senha: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlterarRolePayload {
    #[validate(custom(function = validar_role))]
    #[schema(example = "ADMIN")]
    pub role: String,
}

pub fn validar_role(role: &str) -> Result<(), ValidationError> {
    if role != ROLE_ADMIN && role != ROLE_USER {
        return Err(erro("role_invalida", "Role inválida. Use ADMIN ou USER"));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlterarSenhaPayload {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Senha atual é obrigatória"
    ))]
    pub senha_atual: String,

    #[validate(
        length(
            min = 8,
            max = 100,
            message = "Nova senha deve ter entre 8 e 100 caracteres"
        ),
        custom(function = validar_senha_forte)
    )]
    pub senha_nova: String,
}

// --- Dados prontos para o repositório ---

// `senha` aqui já é o hash bcrypt; o hash acontece no serviço.
#[derive(Debug, Clone)]
pub struct NovoAdmin {
    pub login: String,
    pub senha: String,
    pub nome: String,
    pub email: Option<String>,
    pub role: String,
    pub aprovado: bool,
}

#[derive(Debug, Clone, Default)]
pub struct AtualizarAdmin {
    pub role: Option<String>,
    pub ativo: Option<bool>,
    pub aprovado: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registrar_valido_passa() {
        let payload = RegistrarPayload {
            login: "maria_souza".into(),
            senha: "SenhaForte1".into(),
            nome: "Maria Souza".into(),
            email: Some("maria@email.com".into()),
        };
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn registrar_rejeita_login_com_espacos() {
        let payload = RegistrarPayload {
            login: "maria souza".into(),
            senha: "SenhaForte1".into(),
            nome: "Maria Souza".into(),
            email: None,
        };
        let erros = payload.validate().unwrap_err();
        assert!(erros.field_errors().contains_key("login"));
    }

    #[test]
    fn registrar_rejeita_senha_fraca() {
        for senha in ["somenteminusculas1", "SOMENTEMAIUSCULAS1", "SemNumeros"] {
            let payload = RegistrarPayload {
                login: "maria".into(),
                senha: senha.into(),
                nome: "Maria Souza".into(),
                email: None,
            };
            let erros = payload.validate().unwrap_err();
            assert!(erros.field_errors().contains_key("senha"), "senha: {senha}");
        }
    }

    #[test]
    fn alterar_role_aceita_somente_roles_conhecidas() {
        for role in [ROLE_ADMIN, ROLE_USER] {
            let payload = AlterarRolePayload { role: role.into() };
            assert!(payload.validate().is_ok());
        }
        let payload = AlterarRolePayload {
            role: "SUPERADMIN".into(),
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn admin_seguro_nao_carrega_senha() {
        let admin = Admin {
            id: Uuid::new_v4(),
            login: "maria".into(),
            senha: "$2b$12$hash".into(),
            nome: "Maria Souza".into(),
            email: None,
            role: ROLE_ADMIN.into(),
            ativo: true,
            aprovado: true,
            created_at: None,
            updated_at: None,
        };
        let seguro = AdminSeguro::from(admin);
        let json = serde_json::to_value(&seguro).unwrap();
        assert!(json.get("senha").is_none());
        assert_eq!(json["role"], "ADMIN");
    }
}
