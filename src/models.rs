pub mod admin;
pub mod churn;
pub mod comissao;
pub mod despesa;
pub mod lista;
pub mod pagamento;
pub mod prospeccao;
pub mod usuario;
pub mod validacao;
