// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::common::paginacao::{PaginacaoMeta, RespostaPaginada};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::registrar,
        handlers::auth::login,
        handlers::auth::me,
        handlers::auth::alterar_senha,

        // --- Admins ---
        handlers::admins::listar,
        handlers::admins::aprovar,
        handlers::admins::rejeitar,
        handlers::admins::alterar_role,
        handlers::admins::alternar_ativo,

        // --- Usuarios ---
        handlers::usuarios::listar,
        handlers::usuarios::buscar,
        handlers::usuarios::pagamentos,
        handlers::usuarios::criar,
        handlers::usuarios::atualizar,
        handlers::usuarios::excluir,

        // --- Pagamentos ---
        handlers::pagamentos::listar,
        handlers::pagamentos::stats,
        handlers::pagamentos::buscar,
        handlers::pagamentos::criar,
        handlers::pagamentos::atualizar,
        handlers::pagamentos::excluir,

        // --- Comissoes ---
        handlers::comissoes::listar,
        handlers::comissoes::stats,
        handlers::comissoes::consolidacao,
        handlers::comissoes::relatorio_mensal,
        handlers::comissoes::extrato,
        handlers::comissoes::buscar,
        handlers::comissoes::criar,
        handlers::comissoes::atualizar,
        handlers::comissoes::excluir,

        // --- Churns ---
        handlers::churns::listar,
        handlers::churns::stats,
        handlers::churns::relatorio_motivos,
        handlers::churns::buscar,
        handlers::churns::criar,
        handlers::churns::reverter,
        handlers::churns::atualizar,
        handlers::churns::excluir,

        // --- Prospeccoes ---
        handlers::prospeccoes::listar,
        handlers::prospeccoes::stats,
        handlers::prospeccoes::buscar,
        handlers::prospeccoes::criar,
        handlers::prospeccoes::converter,
        handlers::prospeccoes::atualizar,
        handlers::prospeccoes::excluir,

        // --- Despesas ---
        handlers::despesas::listar,
        handlers::despesas::stats,
        handlers::despesas::relatorio_categoria,
        handlers::despesas::relatorio_mensal,
        handlers::despesas::buscar,
        handlers::despesas::criar,
        handlers::despesas::atualizar,
        handlers::despesas::pagar,
        handlers::despesas::pendente,
        handlers::despesas::excluir,

        // --- Listas ---
        handlers::listas::listar,
        handlers::listas::agrupadas,
        handlers::listas::por_tipo,
        handlers::listas::buscar,
        handlers::listas::criar,
        handlers::listas::atualizar,
        handlers::listas::excluir,
    ),
    components(
        schemas(
            // --- Paginação ---
            PaginacaoMeta,
            RespostaPaginada<models::usuario::Usuario>,
            RespostaPaginada<models::pagamento::PagamentoComUsuario>,
            RespostaPaginada<models::comissao::ComissaoComPagamento>,
            RespostaPaginada<models::churn::ChurnComUsuario>,
            RespostaPaginada<models::prospeccao::ProspeccaoComUsuario>,
            RespostaPaginada<models::despesa::Despesa>,
            RespostaPaginada<models::admin::AdminSeguro>,

            // --- Auth / Admins ---
            models::admin::AdminSeguro,
            models::admin::RespostaLogin,
            models::admin::RegistrarPayload,
            models::admin::LoginPayload,
            models::admin::AlterarSenhaPayload,
            models::admin::AlterarRolePayload,

            // --- Usuarios ---
            models::usuario::StatusFinal,
            models::usuario::Usuario,
            models::usuario::UsuarioResumo,
            models::usuario::CriarUsuarioPayload,
            models::usuario::AtualizarUsuarioPayload,

            // --- Pagamentos ---
            models::pagamento::MetodoPagamento,
            models::pagamento::RegraTipo,
            models::pagamento::Pagamento,
            models::pagamento::PagamentoComUsuario,
            models::pagamento::PagamentoResumo,
            models::pagamento::TotalPorMetodo,
            models::pagamento::EstatisticasPagamentos,
            models::pagamento::CriarPagamentoPayload,
            models::pagamento::AtualizarPagamentoPayload,

            // --- Comissoes ---
            models::comissao::Comissao,
            models::comissao::ComissaoComPagamento,
            models::comissao::ExtratoComissao,
            models::comissao::TotalPorIndicador,
            models::comissao::ResumoRegra,
            models::comissao::ConsolidacaoIndicador,
            models::comissao::RelatorioMensal,
            models::comissao::EstatisticasComissoes,
            models::comissao::CriarComissaoPayload,
            models::comissao::AtualizarComissaoPayload,

            // --- Churns ---
            models::churn::Churn,
            models::churn::ChurnComUsuario,
            models::churn::TotalPorMotivo,
            models::churn::EstatisticasChurn,
            models::churn::CriarChurnPayload,
            models::churn::AtualizarChurnPayload,
            models::churn::ReverterChurnPayload,

            // --- Prospeccoes ---
            models::prospeccao::Prospeccao,
            models::prospeccao::ProspeccaoComUsuario,
            models::prospeccao::TotalPorGrupo,
            models::prospeccao::EstatisticasProspeccoes,
            models::prospeccao::ConversaoProspeccao,
            models::prospeccao::CriarProspeccaoPayload,
            models::prospeccao::AtualizarProspeccaoPayload,
            models::prospeccao::ConverterProspeccaoPayload,

            // --- Despesas ---
            models::despesa::StatusDespesa,
            models::despesa::Despesa,
            models::despesa::TotalPorCategoria,
            models::despesa::TotalPorCompetencia,
            models::despesa::EstatisticasDespesas,
            models::despesa::CriarDespesaPayload,
            models::despesa::AtualizarDespesaPayload,

            // --- Listas ---
            models::lista::TipoLista,
            models::lista::ListaAuxiliar,
            models::lista::CriarListaPayload,
            models::lista::AtualizarListaPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e cadastro de operadores"),
        (name = "Admins", description = "Aprovação e gestão de operadores (role ADMIN)"),
        (name = "Usuarios", description = "Clientes da assinatura"),
        (name = "Pagamentos", description = "Pagamentos e reativação de clientes"),
        (name = "Comissoes", description = "Comissões por indicador e relatórios"),
        (name = "Churns", description = "Cancelamentos e reversões"),
        (name = "Prospeccoes", description = "Leads e conversão em clientes"),
        (name = "Despesas", description = "Despesas com competência contábil"),
        (name = "Listas", description = "Listas auxiliares dos selects do painel")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
