// src/handlers.rs

pub mod admins;
pub mod auth;
pub mod churns;
pub mod comissoes;
pub mod despesas;
pub mod listas;
pub mod pagamentos;
pub mod prospeccoes;
pub mod usuarios;
