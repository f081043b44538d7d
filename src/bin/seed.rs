// src/bin/seed.rs
//
// Semeia as listas auxiliares do painel e, com a tabela de admins vazia,
// cria o primeiro operador a partir de ADMIN_LOGIN/ADMIN_SENHA/ADMIN_NOME.
// Idempotente: rodar de novo não duplica nada.

use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use backend::models::admin::ROLE_ADMIN;
use backend::models::lista::TipoLista;

const CONTAS: &[&str] = &["PXT", "EAGLE"];
const METODOS: &[&str] = &["PIX", "CREDITO", "DINHEIRO"];
const CATEGORIAS: &[&str] = &[
    "Ferramentas",
    "Tráfego Pago",
    "Comissões",
    "Impostos",
    "Operacional",
];
const INDICADORES: &[&str] = &["Direto", "Orgânico"];

const CUSTO_BCRYPT: u32 = 12;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).compact().init();
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect(&database_url)
        .await
        .context("Falha ao conectar no banco de dados")?;

    sqlx::migrate!()
        .run(&pool)
        .await
        .context("Falha ao rodar as migrações")?;

    semear_listas(&pool).await?;
    semear_primeiro_admin(&pool).await?;

    tracing::info!("seed concluído");

    Ok(())
}

async fn semear_listas(pool: &PgPool) -> anyhow::Result<()> {
    let grupos: [(TipoLista, &[&str]); 4] = [
        (TipoLista::Conta, CONTAS),
        (TipoLista::Metodo, METODOS),
        (TipoLista::Categoria, CATEGORIAS),
        (TipoLista::Indicador, INDICADORES),
    ];

    let mut inseridos = 0u64;
    for (tipo, valores) in grupos {
        for valor in valores {
            let resultado = sqlx::query(
                "INSERT INTO listas_auxiliares (tipo, valor) VALUES ($1, $2) \
                 ON CONFLICT (tipo, valor) DO NOTHING",
            )
            .bind(tipo)
            .bind(valor)
            .execute(pool)
            .await?;
            inseridos += resultado.rows_affected();
        }
    }

    tracing::info!(inseridos, "listas auxiliares semeadas");

    Ok(())
}

async fn semear_primeiro_admin(pool: &PgPool) -> anyhow::Result<()> {
    let existentes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admins")
        .fetch_one(pool)
        .await?;

    if existentes > 0 {
        tracing::info!(existentes, "admins já cadastrados, pulando");
        return Ok(());
    }

    let login = std::env::var("ADMIN_LOGIN").context("ADMIN_LOGIN deve ser definida")?;
    let senha = std::env::var("ADMIN_SENHA").context("ADMIN_SENHA deve ser definida")?;
    let nome = std::env::var("ADMIN_NOME").unwrap_or_else(|_| "Administrador".to_string());

    let senha_hash = bcrypt::hash(&senha, CUSTO_BCRYPT).context("Falha ao gerar hash da senha")?;

    sqlx::query(
        "INSERT INTO admins (login, senha, nome, role, ativo, aprovado) \
         VALUES ($1, $2, $3, $4, TRUE, TRUE)",
    )
    .bind(&login)
    .bind(&senha_hash)
    .bind(&nome)
    .bind(ROLE_ADMIN)
    .execute(pool)
    .await?;

    tracing::info!(login, "primeiro admin criado e aprovado");

    Ok(())
}
