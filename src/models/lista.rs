// src/models/lista.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Listas auxiliares que alimentam os selects do painel (contas, métodos,
// categorias e indicadores).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "tipo_lista", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TipoLista {
    Categoria,
    Conta,
    Metodo,
    Indicador,
}

impl TipoLista {
    pub fn todos() -> [TipoLista; 4] {
        [
            TipoLista::Categoria,
            TipoLista::Conta,
            TipoLista::Metodo,
            TipoLista::Indicador,
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListaAuxiliar {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    pub tipo: TipoLista,

    #[schema(example = "Nubank PJ")]
    pub valor: String,

    pub ativo: bool,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CriarListaPayload {
    pub tipo: TipoLista,

    #[validate(length(min = 1, max = 100, message = "Valor deve ter entre 1 e 100 caracteres"))]
    #[schema(example = "Nubank PJ")]
    pub valor: String,

    pub ativo: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AtualizarListaPayload {
    #[validate(length(min = 1, max = 100, message = "Valor deve ter entre 1 e 100 caracteres"))]
    pub valor: Option<String>,

    pub ativo: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn criar_lista_valida_passa() {
        let payload = CriarListaPayload {
            tipo: TipoLista::Conta,
            valor: "Nubank PJ".into(),
            ativo: None,
        };
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn criar_lista_rejeita_valor_vazio() {
        let payload = CriarListaPayload {
            tipo: TipoLista::Categoria,
            valor: String::new(),
            ativo: None,
        };
        let erros = payload.validate().unwrap_err();
        assert!(erros.field_errors().contains_key("valor"));
    }

    #[test]
    fn tipo_serializa_em_maiusculas() {
        let json = serde_json::to_string(&TipoLista::Indicador).unwrap();
        assert_eq!(json, "\"INDICADOR\"");
        assert!(serde_json::from_str::<TipoLista>("\"BANCO\"").is_err());
    }
}
