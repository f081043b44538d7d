// src/main.rs

use axum::{
    Json, Router,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;

use backend::config::AppState;
use backend::docs::ApiDoc;
use backend::handlers;
use backend::middleware::auth::{admin_guard, auth_guard};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas públicas de autenticação
    let auth_publicas = Router::new()
        .route("/registrar", post(handlers::auth::registrar))
        .route("/login", post(handlers::auth::login));

    let auth_protegidas = Router::new()
        .route("/me", get(handlers::auth::me))
        .route("/senha", put(handlers::auth::alterar_senha))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Gestão de operadores: autenticado E role ADMIN.
    let admin_routes = Router::new()
        .route("/", get(handlers::admins::listar))
        .route("/{id}/aprovar", post(handlers::admins::aprovar))
        .route("/{id}/rejeitar", delete(handlers::admins::rejeitar))
        .route("/{id}/role", put(handlers::admins::alterar_role))
        .route("/{id}/toggle-ativo", put(handlers::admins::alternar_ativo))
        .layer(axum_middleware::from_fn(admin_guard))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let usuario_routes = Router::new()
        .route(
            "/",
            get(handlers::usuarios::listar).post(handlers::usuarios::criar),
        )
        .route(
            "/{id}",
            get(handlers::usuarios::buscar)
                .put(handlers::usuarios::atualizar)
                .delete(handlers::usuarios::excluir),
        )
        .route("/{id}/pagamentos", get(handlers::usuarios::pagamentos));

    let pagamento_routes = Router::new()
        .route(
            "/",
            get(handlers::pagamentos::listar).post(handlers::pagamentos::criar),
        )
        .route("/stats", get(handlers::pagamentos::stats))
        .route(
            "/{id}",
            get(handlers::pagamentos::buscar)
                .put(handlers::pagamentos::atualizar)
                .delete(handlers::pagamentos::excluir),
        );

    let comissao_routes = Router::new()
        .route(
            "/",
            get(handlers::comissoes::listar).post(handlers::comissoes::criar),
        )
        .route("/stats", get(handlers::comissoes::stats))
        .route("/consolidacao", get(handlers::comissoes::consolidacao))
        .route("/relatorio-mensal", get(handlers::comissoes::relatorio_mensal))
        .route("/extrato/{indicador}", get(handlers::comissoes::extrato))
        .route(
            "/{id}",
            get(handlers::comissoes::buscar)
                .put(handlers::comissoes::atualizar)
                .delete(handlers::comissoes::excluir),
        );

    let churn_routes = Router::new()
        .route(
            "/",
            get(handlers::churns::listar).post(handlers::churns::criar),
        )
        .route("/stats", get(handlers::churns::stats))
        .route("/relatorio/motivos", get(handlers::churns::relatorio_motivos))
        .route(
            "/{id}",
            get(handlers::churns::buscar)
                .put(handlers::churns::atualizar)
                .delete(handlers::churns::excluir),
        )
        .route("/{id}/reverter", post(handlers::churns::reverter));

    let prospeccao_routes = Router::new()
        .route(
            "/",
            get(handlers::prospeccoes::listar).post(handlers::prospeccoes::criar),
        )
        .route("/stats", get(handlers::prospeccoes::stats))
        .route(
            "/{id}",
            get(handlers::prospeccoes::buscar)
                .put(handlers::prospeccoes::atualizar)
                .delete(handlers::prospeccoes::excluir),
        )
        .route("/{id}/converter", post(handlers::prospeccoes::converter));

    let despesa_routes = Router::new()
        .route(
            "/",
            get(handlers::despesas::listar).post(handlers::despesas::criar),
        )
        .route("/stats", get(handlers::despesas::stats))
        .route("/relatorio/categoria", get(handlers::despesas::relatorio_categoria))
        .route("/relatorio/mensal", get(handlers::despesas::relatorio_mensal))
        .route(
            "/{id}",
            get(handlers::despesas::buscar)
                .put(handlers::despesas::atualizar)
                .delete(handlers::despesas::excluir),
        )
        .route("/{id}/pagar", put(handlers::despesas::pagar))
        .route("/{id}/pendente", put(handlers::despesas::pendente));

    let lista_routes = Router::new()
        .route(
            "/",
            get(handlers::listas::listar).post(handlers::listas::criar),
        )
        .route("/agrupadas", get(handlers::listas::agrupadas))
        .route("/tipo/{tipo}", get(handlers::listas::por_tipo))
        .route(
            "/{id}",
            get(handlers::listas::buscar)
                .put(handlers::listas::atualizar)
                .delete(handlers::listas::excluir),
        );

    // Todo o domínio fica atrás do auth_guard; só login/registro e a saúde
    // ficam abertos.
    let dominio = Router::new()
        .nest("/usuarios", usuario_routes)
        .nest("/pagamentos", pagamento_routes)
        .nest("/comissoes", comissao_routes)
        .nest("/churns", churn_routes)
        .nest("/prospeccoes", prospeccao_routes)
        .nest("/despesas", despesa_routes)
        .nest("/listas", lista_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let app = Router::new()
        .route("/api/saude", get(|| async { "OK" }))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .nest("/api/auth", auth_publicas.merge(auth_protegidas))
        .nest("/api/admins", admin_routes)
        .nest("/api", dominio)
        .with_state(app_state);

    let porta = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{porta}");
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
