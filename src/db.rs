pub mod usuario_repo;
pub use usuario_repo::{UsuarioFiltros, UsuarioRepository};
pub mod pagamento_repo;
pub use pagamento_repo::{PagamentoFiltros, PagamentoRepository};
pub mod comissao_repo;
pub use comissao_repo::{ComissaoFiltros, ComissaoRepository};
pub mod churn_repo;
pub use churn_repo::{ChurnFiltros, ChurnRepository};
pub mod prospeccao_repo;
pub use prospeccao_repo::{ProspeccaoFiltros, ProspeccaoRepository};
pub mod despesa_repo;
pub use despesa_repo::{DespesaFiltros, DespesaRepository};
pub mod admin_repo;
pub use admin_repo::{AdminFiltros, AdminRepository};
pub mod lista_repo;
pub use lista_repo::{ListaFiltros, ListaRepository};
