// src/import/despesas_csv.rs
//
// Importação das planilhas de despesas exportadas do controle antigo:
// arquivo separado por `;`, uma linha de cabeçalho, colunas fixas
// mes;data;categoria;descricao;conta;indicador;valor;status;k_pagamento;pos.
// Linha ruim é registrada e pulada; a importação nunca aborta por causa de
// uma linha.

use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use csv::StringRecord;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::DespesaRepository,
    models::despesa::{NovaDespesa, StatusDespesa},
};

const COLUNA_DATA: usize = 1;
const COLUNA_CATEGORIA: usize = 2;
const COLUNA_DESCRICAO: usize = 3;
const COLUNA_CONTA: usize = 4;
const COLUNA_INDICADOR: usize = 5;
const COLUNA_VALOR: usize = 6;
const COLUNA_STATUS: usize = 7;

const VALOR_MAXIMO: &str = "999999.99";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResumoImportacao {
    pub importadas: u32,
    pub falhas: u32,
}

// "R$ 1.234,56" -> 1234.56; pontos são separador de milhar, vírgula é o
// separador decimal.
pub fn parse_valor(bruto: &str) -> Result<Decimal, String> {
    let limpo: String = bruto
        .replace("R$", "")
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if limpo.is_empty() {
        return Err("valor ausente".into());
    }

    let valor =
        Decimal::from_str(&limpo).map_err(|_| format!("valor inválido: {:?}", bruto.trim()))?;

    if valor <= Decimal::ZERO || valor > Decimal::from_str(VALOR_MAXIMO).unwrap() {
        return Err(format!("valor fora da faixa: {valor}"));
    }

    Ok(valor)
}

// DD/MM/YYYY -> meia-noite UTC.
pub fn parse_data(bruto: &str) -> Result<DateTime<Utc>, String> {
    NaiveDate::parse_from_str(bruto.trim(), "%d/%m/%Y")
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| format!("data inválida: {:?}", bruto.trim()))
}

// Qualquer coisa diferente de "PAGO" (em qualquer caixa) entra como PENDENTE.
pub fn parse_status(bruto: &str) -> StatusDespesa {
    if bruto.trim().eq_ignore_ascii_case("PAGO") {
        StatusDespesa::Pago
    } else {
        StatusDespesa::Pendente
    }
}

fn campo_obrigatorio(registro: &StringRecord, indice: usize, nome: &str) -> Result<String, String> {
    let valor = registro.get(indice).unwrap_or("").trim();
    if valor.is_empty() {
        return Err(format!("{nome} ausente"));
    }
    Ok(valor.to_string())
}

fn campo_opcional(registro: &StringRecord, indice: usize) -> Option<String> {
    let valor = registro.get(indice).unwrap_or("").trim();
    if valor.is_empty() {
        None
    } else {
        Some(valor.to_string())
    }
}

/// Converte uma linha da planilha em uma despesa pronta para inserir; a
/// competência deriva da data do lançamento.
pub fn converter_registro(registro: &StringRecord) -> Result<NovaDespesa, String> {
    let data = parse_data(&campo_obrigatorio(registro, COLUNA_DATA, "data")?)?;
    let categoria = campo_obrigatorio(registro, COLUNA_CATEGORIA, "categoria")?;
    let descricao = campo_obrigatorio(registro, COLUNA_DESCRICAO, "descrição")?;
    let conta = campo_obrigatorio(registro, COLUNA_CONTA, "conta")?;
    let valor = parse_valor(&campo_obrigatorio(registro, COLUNA_VALOR, "valor")?);
    let valor = valor?;
    let status = parse_status(registro.get(COLUNA_STATUS).unwrap_or(""));

    let data_local = data.date_naive();

    Ok(NovaDespesa {
        data,
        descricao,
        categoria,
        valor,
        conta,
        status,
        indicador: campo_opcional(registro, COLUNA_INDICADOR),
        competencia_mes: chrono::Datelike::month(&data_local) as i32,
        competencia_ano: chrono::Datelike::year(&data_local),
        obs: None,
    })
}

/// Lê e converte todas as linhas de um leitor CSV, devolvendo as despesas
/// válidas e a contagem de linhas com problema de formato.
pub fn ler_despesas<R: Read>(leitor: R) -> (Vec<NovaDespesa>, u32) {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .from_reader(leitor);

    let mut despesas = Vec::new();
    let mut falhas = 0u32;

    for (indice, resultado) in rdr.records().enumerate() {
        // +2: uma pelo cabeçalho, uma pelo índice começar em zero.
        let linha = indice + 2;
        let registro = match resultado {
            Ok(registro) => registro,
            Err(e) => {
                tracing::warn!(linha, erro = %e, "linha ilegível, pulando");
                falhas += 1;
                continue;
            }
        };

        match converter_registro(&registro) {
            Ok(despesa) => despesas.push(despesa),
            Err(motivo) => {
                tracing::warn!(linha, motivo, "linha inválida, pulando");
                falhas += 1;
            }
        }
    }

    (despesas, falhas)
}

/// Importa o arquivo inteiro; falha de inserção de uma despesa também conta
/// como linha perdida, sem abortar as demais.
pub async fn importar_arquivo(
    caminho: &Path,
    repo: &DespesaRepository,
    pool: &PgPool,
) -> Result<ResumoImportacao, AppError> {
    let arquivo = std::fs::File::open(caminho)
        .map_err(|e| AppError::Interno(anyhow::anyhow!("não consegui abrir {caminho:?}: {e}")))?;

    let (despesas, mut falhas) = ler_despesas(arquivo);
    let mut importadas = 0u32;

    for despesa in &despesas {
        match repo.create(pool, despesa).await {
            Ok(_) => importadas += 1,
            Err(e) => {
                tracing::warn!(descricao = %despesa.descricao, erro = %e, "falha ao inserir despesa");
                falhas += 1;
            }
        }
    }

    Ok(ResumoImportacao { importadas, falhas })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CABECALHO: &str = "mes;data;categoria;descricao;conta;indicador;valor;status;k_pagamento;pos\n";

    fn registro(linha: &str) -> StringRecord {
        let csv = format!("{CABECALHO}{linha}\n");
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b';')
            .flexible(true)
            .from_reader(csv.as_bytes());
        rdr.records().next().unwrap().unwrap()
    }

    #[test]
    fn valor_em_formato_brasileiro() {
        assert_eq!(parse_valor("R$ 1.234,56").unwrap(), Decimal::new(123456, 2));
        assert_eq!(parse_valor("89,90").unwrap(), Decimal::new(8990, 2));
        assert_eq!(parse_valor(" R$ 70,00 ").unwrap(), Decimal::new(7000, 2));
    }

    #[test]
    fn valor_invalido_e_recusado() {
        assert!(parse_valor("").is_err());
        assert!(parse_valor("abc").is_err());
        assert!(parse_valor("0,00").is_err());
        assert!(parse_valor("-10,00").is_err());
        assert!(parse_valor("1.000.000,00").is_err());
    }

    #[test]
    fn data_no_formato_brasileiro() {
        let data = parse_data("05/10/2024").unwrap();
        assert_eq!(data.to_rfc3339(), "2024-10-05T00:00:00+00:00");
        assert!(parse_data("2024-10-05").is_err());
        assert!(parse_data("31/02/2024").is_err());
    }

    #[test]
    fn status_so_reconhece_pago() {
        assert_eq!(parse_status("PAGO"), StatusDespesa::Pago);
        assert_eq!(parse_status("pago"), StatusDespesa::Pago);
        assert_eq!(parse_status("Pendente"), StatusDespesa::Pendente);
        assert_eq!(parse_status(""), StatusDespesa::Pendente);
        assert_eq!(parse_status("qualquer coisa"), StatusDespesa::Pendente);
    }

    #[test]
    fn registro_completo_vira_despesa() {
        let r = registro("OUT;05/10/2024;Ferramentas;Assinatura de software;PXT;João Silva;R$ 89,90;PAGO;K123;1");
        let despesa = converter_registro(&r).unwrap();

        assert_eq!(despesa.categoria, "Ferramentas");
        assert_eq!(despesa.descricao, "Assinatura de software");
        assert_eq!(despesa.conta, "PXT");
        assert_eq!(despesa.indicador.as_deref(), Some("João Silva"));
        assert_eq!(despesa.valor, Decimal::new(8990, 2));
        assert_eq!(despesa.status, StatusDespesa::Pago);
        assert_eq!(despesa.competencia_mes, 10);
        assert_eq!(despesa.competencia_ano, 2024);
    }

    #[test]
    fn indicador_vazio_vira_none() {
        let r = registro("OUT;05/10/2024;Ferramentas;Assinatura;PXT;  ;89,90;PAGO;;");
        assert_eq!(converter_registro(&r).unwrap().indicador, None);
    }

    #[test]
    fn linha_sem_valor_e_pulada_e_as_demais_seguem() {
        let csv = format!(
            "{CABECALHO}\
             OUT;05/10/2024;Ferramentas;Assinatura;PXT;;89,90;PAGO;;\n\
             OUT;06/10/2024;Ferramentas;Sem valor;PXT;;;PAGO;;\n\
             OUT;07/10/2024;Impostos;DAS;EAGLE;;301,50;PENDENTE;;\n"
        );
        let (despesas, falhas) = ler_despesas(csv.as_bytes());

        assert_eq!(despesas.len(), 2);
        assert_eq!(falhas, 1);
        assert_eq!(despesas[0].descricao, "Assinatura");
        assert_eq!(despesas[1].descricao, "DAS");
    }

    #[test]
    fn data_invalida_tambem_conta_como_falha() {
        let csv = format!(
            "{CABECALHO}\
             OUT;99/99/2024;Ferramentas;Data ruim;PXT;;89,90;PAGO;;\n\
             OUT;07/10/2024;Impostos;DAS;EAGLE;;301,50;pago;;\n"
        );
        let (despesas, falhas) = ler_despesas(csv.as_bytes());

        assert_eq!(despesas.len(), 1);
        assert_eq!(falhas, 1);
        assert_eq!(despesas[0].status, StatusDespesa::Pago);
    }
}
