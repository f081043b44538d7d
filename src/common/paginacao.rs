// src/common/paginacao.rs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

const LIMITE_PADRAO: u32 = 10;

fn pagina_padrao() -> u32 {
    1
}

// Parâmetros de paginação aceitos por todas as listagens (?page=&limit=).
#[derive(Debug, Clone, Copy, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PaginacaoQuery {
    #[serde(default = "pagina_padrao")]
    #[validate(range(min = 1, message = "A página deve ser maior ou igual a 1"))]
    #[param(example = 1)]
    pub page: u32,

    #[validate(range(min = 1, max = 100, message = "O limite deve estar entre 1 e 100"))]
    #[param(example = 10)]
    pub limit: Option<u32>,
}

impl Default for PaginacaoQuery {
    fn default() -> Self {
        Self { page: 1, limit: None }
    }
}

impl PaginacaoQuery {
    pub fn take(&self) -> i64 {
        i64::from(self.limit.unwrap_or(LIMITE_PADRAO))
    }

    // `saturating_sub` evita underflow caso a validação ainda não tenha rodado.
    pub fn skip(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * self.take()
    }

    // Listagens com limite padrão diferente (despesas usam 50) passam por aqui.
    pub fn ou_limite(mut self, padrao: u32) -> Self {
        if self.limit.is_none() {
            self.limit = Some(padrao);
        }
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginacaoMeta {
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub limit: u32,
    #[schema(example = 42)]
    pub total: i64,
    #[schema(example = 5)]
    pub total_pages: i64,
}

impl PaginacaoMeta {
    pub fn nova(paginacao: &PaginacaoQuery, total: i64) -> Self {
        let limit = paginacao.take();
        Self {
            page: paginacao.page,
            limit: limit as u32,
            total,
            total_pages: if limit > 0 { (total + limit - 1) / limit } else { 0 },
        }
    }
}

// Envelope devolvido por todas as listagens: { data: [...], pagination: {...} }.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RespostaPaginada<T> {
    pub data: Vec<T>,
    pub pagination: PaginacaoMeta,
}

impl<T> RespostaPaginada<T> {
    pub fn nova(data: Vec<T>, paginacao: &PaginacaoQuery, total: i64) -> Self {
        Self { data, pagination: PaginacaoMeta::nova(paginacao, total) }
    }
}

// =============================================================================
//  Paginador: máquina de estados pura para navegação de páginas
// =============================================================================

/// Estado de paginação sem I/O: página corrente, tamanho de página e total de
/// itens conhecidos. Todas as operações mantêm a página dentro de
/// `[1, max(total_paginas, 1)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginador {
    pagina: u32,
    tamanho: u32,
    total: u64,
}

/// Resumo derivado do estado, pronto para exibição ("mostrando X a Y de Z").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginacaoInfo {
    pub de: u64,
    pub ate: u64,
    pub total: u64,
    pub pagina_atual: u32,
    pub total_paginas: u32,
    pub tem_proxima: bool,
    pub tem_anterior: bool,
}

impl Default for Paginador {
    fn default() -> Self {
        Self { pagina: 1, tamanho: LIMITE_PADRAO, total: 0 }
    }
}

impl Paginador {
    pub fn novo(tamanho: u32) -> Self {
        Self { pagina: 1, tamanho: tamanho.max(1), total: 0 }
    }

    pub fn pagina(&self) -> u32 {
        self.pagina
    }

    pub fn tamanho(&self) -> u32 {
        self.tamanho
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn total_paginas(&self) -> u32 {
        (self.total.div_ceil(u64::from(self.tamanho))) as u32
    }

    // Limite superior usado para clamping; nunca menor que 1.
    fn ultima_pagina(&self) -> u32 {
        self.total_paginas().max(1)
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.pagina - 1) * u64::from(self.tamanho)
    }

    pub fn definir_pagina(&mut self, pagina: u32) {
        self.pagina = pagina.clamp(1, self.ultima_pagina());
    }

    /// Trocar o tamanho volta para a primeira página.
    pub fn definir_tamanho(&mut self, tamanho: u32) {
        self.tamanho = tamanho.max(1);
        self.pagina = 1;
    }

    /// Atualiza o total e puxa a página corrente para baixo se ela deixou de
    /// existir.
    pub fn definir_total(&mut self, total: u64) {
        self.total = total;
        if self.pagina > self.ultima_pagina() {
            self.pagina = self.ultima_pagina();
        }
    }

    pub fn proxima(&mut self) {
        if self.pagina < self.total_paginas() {
            self.pagina += 1;
        }
    }

    pub fn anterior(&mut self) {
        if self.pagina > 1 {
            self.pagina -= 1;
        }
    }

    pub fn primeira(&mut self) {
        self.pagina = 1;
    }

    pub fn ultima(&mut self) {
        self.pagina = self.ultima_pagina();
    }

    pub fn info(&self) -> PaginacaoInfo {
        let total_paginas = self.total_paginas();
        let de = if self.total == 0 { 0 } else { self.offset() + 1 };
        let ate = (self.offset() + u64::from(self.tamanho)).min(self.total);
        PaginacaoInfo {
            de,
            ate,
            total: self.total,
            pagina_atual: self.pagina,
            total_paginas,
            tem_proxima: self.pagina < total_paginas,
            tem_anterior: self.pagina > 1,
        }
    }

    /// Janela de páginas centrada na corrente; nas bordas a janela desliza em
    /// vez de encolher.
    pub fn intervalo_paginas(&self, janela: u32) -> Vec<u32> {
        let total = self.total_paginas();
        let janela = janela.max(1);
        if total <= janela {
            return (1..=total).collect();
        }

        let mut inicio = self.pagina.saturating_sub(janela / 2).max(1);
        let mut fim = inicio + janela - 1;
        if fim > total {
            fim = total;
            inicio = fim - janela + 1;
        }
        (inicio..=fim).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paginador(pagina: u32, tamanho: u32, total: u64) -> Paginador {
        let mut p = Paginador::novo(tamanho);
        p.definir_total(total);
        p.definir_pagina(pagina);
        p
    }

    #[test]
    fn skip_e_take_derivam_de_page_e_limit() {
        let q = PaginacaoQuery { page: 3, limit: Some(25) };
        assert_eq!(q.skip(), 50);
        assert_eq!(q.take(), 25);
    }

    #[test]
    fn skip_nunca_fica_negativo() {
        let q = PaginacaoQuery { page: 0, limit: Some(10) };
        assert_eq!(q.skip(), 0);
    }

    #[test]
    fn limite_padrao_e_dez() {
        let q = PaginacaoQuery::default();
        assert_eq!(q.take(), 10);
        assert_eq!(q.ou_limite(50).take(), 50);
    }

    #[test]
    fn ou_limite_nao_sobrescreve_limite_explicito() {
        let q = PaginacaoQuery { page: 1, limit: Some(20) };
        assert_eq!(q.ou_limite(50).take(), 20);
    }

    #[test]
    fn meta_arredonda_total_pages_para_cima() {
        let q = PaginacaoQuery { page: 1, limit: Some(10) };
        assert_eq!(PaginacaoMeta::nova(&q, 95).total_pages, 10);
        assert_eq!(PaginacaoMeta::nova(&q, 100).total_pages, 10);
        assert_eq!(PaginacaoMeta::nova(&q, 101).total_pages, 11);
        assert_eq!(PaginacaoMeta::nova(&q, 0).total_pages, 0);
    }

    #[test]
    fn total_paginas_e_ceil() {
        assert_eq!(paginador(1, 10, 0).total_paginas(), 0);
        assert_eq!(paginador(1, 10, 10).total_paginas(), 1);
        assert_eq!(paginador(1, 10, 11).total_paginas(), 2);
        assert_eq!(paginador(1, 10, 95).total_paginas(), 10);
    }

    #[test]
    fn definir_pagina_faz_clamp_nos_limites() {
        let mut p = paginador(1, 10, 50);
        p.definir_pagina(99);
        assert_eq!(p.pagina(), 5);
        p.definir_pagina(0);
        assert_eq!(p.pagina(), 1);
        p.definir_pagina(3);
        assert_eq!(p.pagina(), 3);
    }

    #[test]
    fn definir_tamanho_volta_para_primeira_pagina() {
        let mut p = paginador(4, 10, 100);
        p.definir_tamanho(25);
        assert_eq!(p.pagina(), 1);
        assert_eq!(p.tamanho(), 25);
        assert_eq!(p.total_paginas(), 4);
    }

    #[test]
    fn definir_total_puxa_pagina_para_baixo() {
        let mut p = paginador(10, 10, 100);
        p.definir_total(35);
        assert_eq!(p.pagina(), 4);
        p.definir_total(0);
        assert_eq!(p.pagina(), 1);
    }

    #[test]
    fn navegacao_para_nos_limites() {
        let mut p = paginador(1, 10, 30);
        p.anterior();
        assert_eq!(p.pagina(), 1);
        p.proxima();
        assert_eq!(p.pagina(), 2);
        p.ultima();
        assert_eq!(p.pagina(), 3);
        p.proxima();
        assert_eq!(p.pagina(), 3);
        p.primeira();
        assert_eq!(p.pagina(), 1);
    }

    #[test]
    fn offset_acompanha_a_pagina() {
        assert_eq!(paginador(1, 10, 100).offset(), 0);
        assert_eq!(paginador(4, 10, 100).offset(), 30);
        assert_eq!(paginador(3, 25, 100).offset(), 50);
    }

    #[test]
    fn info_em_lista_vazia_comeca_em_zero() {
        let info = paginador(1, 10, 0).info();
        assert_eq!(info.de, 0);
        assert_eq!(info.ate, 0);
        assert_eq!(info.total_paginas, 0);
        assert!(!info.tem_proxima);
        assert!(!info.tem_anterior);
    }

    #[test]
    fn info_na_pagina_cheia_e_na_ultima_parcial() {
        let info = paginador(2, 10, 35).info();
        assert_eq!(info.de, 11);
        assert_eq!(info.ate, 20);
        assert!(info.tem_proxima);
        assert!(info.tem_anterior);

        let info = paginador(4, 10, 35).info();
        assert_eq!(info.de, 31);
        assert_eq!(info.ate, 35);
        assert!(!info.tem_proxima);
    }

    #[test]
    fn intervalo_centraliza_na_pagina_corrente() {
        assert_eq!(paginador(5, 10, 150).intervalo_paginas(5), vec![3, 4, 5, 6, 7]);
    }

    #[test]
    fn intervalo_desliza_nas_bordas() {
        assert_eq!(paginador(1, 10, 150).intervalo_paginas(5), vec![1, 2, 3, 4, 5]);
        assert_eq!(paginador(2, 10, 150).intervalo_paginas(5), vec![1, 2, 3, 4, 5]);
        assert_eq!(paginador(15, 10, 150).intervalo_paginas(5), vec![11, 12, 13, 14, 15]);
        assert_eq!(paginador(14, 10, 150).intervalo_paginas(5), vec![11, 12, 13, 14, 15]);
    }

    #[test]
    fn intervalo_com_poucas_paginas_mostra_todas() {
        assert_eq!(paginador(1, 10, 30).intervalo_paginas(5), vec![1, 2, 3]);
    }
}
