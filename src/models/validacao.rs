// src/models/validacao.rs
//
// Funções de validação compartilhadas pelos payloads. Cada uma devolve o
// `ValidationError` já com a mensagem em português que vai na resposta 400.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use std::borrow::Cow;
use validator::ValidationError;

// 999999.99, o maior valor aceito em qualquer campo monetário.
pub const VALOR_MAXIMO: Decimal = Decimal::from_parts(99_999_999, 0, 0, false, 2);

fn erro(codigo: &'static str, mensagem: &'static str) -> ValidationError {
    let mut e = ValidationError::new(codigo);
    e.message = Some(Cow::Borrowed(mensagem));
    e
}

/// Valores monetários: positivos, até 999999.99, no máximo 2 casas decimais.
pub fn validar_valor_monetario(valor: &Decimal) -> Result<(), ValidationError> {
    if *valor <= Decimal::ZERO {
        return Err(erro("valor_nao_positivo", "O valor deve ser maior que zero"));
    }
    if *valor > VALOR_MAXIMO {
        return Err(erro("valor_maximo", "O valor máximo é 999999.99"));
    }
    if valor.scale() > 2 {
        return Err(erro("valor_casas_decimais", "O valor deve ter no máximo 2 casas decimais"));
    }
    Ok(())
}

/// Valor de regra de comissão: entre 0 e 100, com até 2 casas decimais.
pub fn validar_regra_valor(valor: &Decimal) -> Result<(), ValidationError> {
    if *valor < Decimal::ZERO || *valor > Decimal::ONE_HUNDRED {
        return Err(erro("regra_valor", "O valor da regra deve estar entre 0 e 100"));
    }
    if valor.scale() > 2 {
        return Err(erro("regra_valor_casas", "O valor da regra deve ter no máximo 2 casas decimais"));
    }
    Ok(())
}

/// Datas de eventos (pagamento, churn, contato) não podem estar no futuro.
pub fn validar_data_nao_futura(data: &NaiveDate) -> Result<(), ValidationError> {
    if *data > Utc::now().date_naive() {
        return Err(erro("data_futura", "A data não pode ser futura"));
    }
    Ok(())
}

/// Telefone brasileiro: só dígitos, com DDD (10 ou 11 dígitos).
pub fn validar_telefone(telefone: &str) -> Result<(), ValidationError> {
    let tamanho_ok = (10..=11).contains(&telefone.len());
    if !tamanho_ok || !telefone.bytes().all(|b| b.is_ascii_digit()) {
        return Err(erro("telefone_invalido", "O telefone deve ter 10 ou 11 dígitos numéricos"));
    }
    Ok(())
}

/// Mês de referência no formato YYYY-MM.
pub fn validar_mes_ref(mes: &str) -> Result<(), ValidationError> {
    let invalido = erro("mes_invalido", "O mês deve estar no formato YYYY-MM");
    let bytes = mes.as_bytes();
    if bytes.len() != 7 || bytes[4] != b'-' {
        return Err(invalido);
    }
    if !bytes[..4].iter().all(u8::is_ascii_digit) || !bytes[5..].iter().all(u8::is_ascii_digit) {
        return Err(invalido);
    }
    match mes[5..].parse::<u32>() {
        Ok(m) if (1..=12).contains(&m) => Ok(()),
        _ => Err(invalido),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::str::FromStr;

    #[test]
    fn aceita_valor_no_limite_e_rejeita_acima() {
        assert!(validar_valor_monetario(&Decimal::from_str("999999.99").unwrap()).is_ok());
        assert!(validar_valor_monetario(&Decimal::from_str("1000000").unwrap()).is_err());
        assert!(validar_valor_monetario(&Decimal::from_str("1000000.00").unwrap()).is_err());
    }

    #[test]
    fn rejeita_valor_zero_negativo_ou_com_tres_casas() {
        assert!(validar_valor_monetario(&Decimal::ZERO).is_err());
        assert!(validar_valor_monetario(&Decimal::from_str("-10.00").unwrap()).is_err());
        assert!(validar_valor_monetario(&Decimal::from_str("10.555").unwrap()).is_err());
        assert!(validar_valor_monetario(&Decimal::from_str("10.55").unwrap()).is_ok());
    }

    #[test]
    fn data_de_hoje_passa_e_amanha_nao() {
        let hoje = Utc::now().date_naive();
        assert!(validar_data_nao_futura(&hoje).is_ok());
        assert!(validar_data_nao_futura(&(hoje - Duration::days(30))).is_ok());
        assert!(validar_data_nao_futura(&(hoje + Duration::days(1))).is_err());
    }

    #[test]
    fn telefone_exige_dez_ou_onze_digitos() {
        assert!(validar_telefone("1199998888").is_ok());
        assert!(validar_telefone("11999988887").is_ok());
        assert!(validar_telefone("119999888").is_err());
        assert!(validar_telefone("(11)99998888").is_err());
        assert!(validar_telefone("11 99998888").is_err());
    }

    #[test]
    fn mes_ref_segue_yyyy_mm() {
        assert!(validar_mes_ref("2024-10").is_ok());
        assert!(validar_mes_ref("2024-01").is_ok());
        assert!(validar_mes_ref("2024-13").is_err());
        assert!(validar_mes_ref("2024-00").is_err());
        assert!(validar_mes_ref("24-10").is_err());
        assert!(validar_mes_ref("2024/10").is_err());
        assert!(validar_mes_ref("OUT/2024").is_err());
    }
}
