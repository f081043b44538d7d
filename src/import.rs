// src/import.rs

pub mod despesas_csv;
