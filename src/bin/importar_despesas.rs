// src/bin/importar_despesas.rs
//
// Uso: importar_despesas <arquivo.csv>
// Planilha separada por `;` no layout do controle antigo; ver
// import::despesas_csv para o formato das colunas.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use backend::db::DespesaRepository;
use backend::import::despesas_csv;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).compact().init();
    dotenvy::dotenv().ok();

    let arquivo = std::env::args()
        .nth(1)
        .context("Uso: importar_despesas <arquivo.csv>")?;

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect(&database_url)
        .await
        .context("Falha ao conectar no banco de dados")?;

    let repo = DespesaRepository::new(pool.clone());

    let resumo = despesas_csv::importar_arquivo(Path::new(&arquivo), &repo, &pool).await?;

    tracing::info!(
        importadas = resumo.importadas,
        falhas = resumo.falhas,
        "importação concluída"
    );

    Ok(())
}
