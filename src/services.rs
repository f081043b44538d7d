pub mod calculo_comissao;

pub mod auth_service;
pub use auth_service::AuthService;
pub mod usuario_service;
pub use usuario_service::UsuarioService;
pub mod pagamento_service;
pub use pagamento_service::PagamentoService;
pub mod comissao_service;
pub use comissao_service::ComissaoService;
pub mod churn_service;
pub use churn_service::ChurnService;
pub mod prospeccao_service;
pub use prospeccao_service::ProspeccaoService;
pub mod despesa_service;
pub use despesa_service::DespesaService;
pub mod lista_service;
pub use lista_service::ListaService;
