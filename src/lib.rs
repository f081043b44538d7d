// src/lib.rs
//
// A árvore de módulos fica na biblioteca para que os binários auxiliares
// (importador de despesas, seed) reusem repositórios e modelos.

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod import;
pub mod middleware;
pub mod models;
pub mod services;
