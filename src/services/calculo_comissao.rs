// src/services/calculo_comissao.rs

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;

use crate::models::pagamento::RegraTipo;

// Indicadores que marcam venda sem indicação real; não geram comissão.
const SEM_COMISSAO: [&str; 2] = ["Direto", "Orgânico"];

pub fn elegivel_para_comissao(indicador: Option<&str>) -> bool {
    match indicador.map(str::trim) {
        None | Some("") => false,
        Some(ind) => !SEM_COMISSAO.contains(&ind),
    }
}

// Valores fixos por regra: adesão paga R$ 100, renovação R$ 70.
pub fn valor_comissao_padrao(regra: RegraTipo) -> Decimal {
    match regra {
        RegraTipo::Primeiro => Decimal::new(10000, 2),
        RegraTipo::Recorrente => Decimal::new(7000, 2),
    }
}

// Competência no formato YYYY-MM, ordenável lexicograficamente.
pub fn formatar_mes_pagto(data: DateTime<Utc>) -> String {
    format!("{:04}-{:02}", data.year(), data.month())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn sem_indicador_nao_gera_comissao() {
        assert!(!elegivel_para_comissao(None));
        assert!(!elegivel_para_comissao(Some("")));
        assert!(!elegivel_para_comissao(Some("   ")));
    }

    #[test]
    fn direto_e_organico_nao_geram_comissao() {
        assert!(!elegivel_para_comissao(Some("Direto")));
        assert!(!elegivel_para_comissao(Some("Orgânico")));
        assert!(!elegivel_para_comissao(Some("  Direto  ")));
    }

    #[test]
    fn indicador_real_gera_comissao() {
        assert!(elegivel_para_comissao(Some("João Silva")));
        assert!(elegivel_para_comissao(Some("direto de verdade")));
    }

    #[test]
    fn valores_padrao_por_regra() {
        assert_eq!(valor_comissao_padrao(RegraTipo::Primeiro), Decimal::new(10000, 2));
        assert_eq!(valor_comissao_padrao(RegraTipo::Recorrente), Decimal::new(7000, 2));
    }

    #[test]
    fn mes_pagto_vem_com_zero_a_esquerda() {
        let data = Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap();
        assert_eq!(formatar_mes_pagto(data), "2024-03");

        let data = Utc.with_ymd_and_hms(2024, 11, 30, 0, 0, 0).unwrap();
        assert_eq!(formatar_mes_pagto(data), "2024-11");
    }
}
