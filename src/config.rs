// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{
        AdminRepository, ChurnRepository, ComissaoRepository, DespesaRepository, ListaRepository,
        PagamentoRepository, ProspeccaoRepository, UsuarioRepository,
    },
    services::{
        AuthService, ChurnService, ComissaoService, DespesaService, ListaService,
        PagamentoService, ProspeccaoService, UsuarioService,
    },
};

// Segredos curtos tornam o HS256 forçável; não subimos com menos que isso.
const TAMANHO_MINIMO_SEGREDO: usize = 32;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub usuario_service: UsuarioService,
    pub pagamento_service: PagamentoService,
    pub comissao_service: ComissaoService,
    pub churn_service: ChurnService,
    pub prospeccao_service: ProspeccaoService,
    pub despesa_service: DespesaService,
    pub lista_service: ListaService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        if jwt_secret.len() < TAMANHO_MINIMO_SEGREDO {
            anyhow::bail!(
                "JWT_SECRET deve ter pelo menos {} bytes",
                TAMANHO_MINIMO_SEGREDO
            );
        }

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let usuarios = UsuarioRepository::new(db_pool.clone());
        let pagamentos = PagamentoRepository::new(db_pool.clone());
        let comissoes = ComissaoRepository::new(db_pool.clone());
        let churns = ChurnRepository::new(db_pool.clone());
        let prospeccoes = ProspeccaoRepository::new(db_pool.clone());
        let despesas = DespesaRepository::new(db_pool.clone());
        let admins = AdminRepository::new(db_pool.clone());
        let listas = ListaRepository::new(db_pool.clone());

        let auth_service = AuthService::new(admins, jwt_secret, db_pool.clone());
        let usuario_service = UsuarioService::new(usuarios.clone(), db_pool.clone());
        let pagamento_service = PagamentoService::new(
            pagamentos.clone(),
            usuarios.clone(),
            comissoes.clone(),
            db_pool.clone(),
        );
        let comissao_service = ComissaoService::new(comissoes, pagamentos, db_pool.clone());
        let churn_service = ChurnService::new(churns, usuarios.clone(), db_pool.clone());
        let prospeccao_service = ProspeccaoService::new(prospeccoes, usuarios, db_pool.clone());
        let despesa_service = DespesaService::new(despesas, db_pool.clone());
        let lista_service = ListaService::new(listas, db_pool.clone());

        Ok(Self {
            db_pool,
            auth_service,
            usuario_service,
            pagamento_service,
            comissao_service,
            churn_service,
            prospeccao_service,
            despesa_service,
            lista_service,
        })
    }
}
