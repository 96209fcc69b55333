pub mod models {
    pub mod authmac;
    pub mod historico;
    pub mod pagamento;
    pub mod plano;
    pub mod usuario;
}
mod repo {
    pub mod authmac;
    pub mod historico;
    pub mod pagamentos;
    pub mod usuarios;
}
mod gateway {
    pub mod mercadopago;
    pub mod tipos;
}
mod services {
    pub mod conciliacao;
    pub mod pagamentos;
    pub mod usuarios;
}
mod routes {
    pub mod authmac;
    pub mod historico;
    pub mod login;
    pub mod pagamento;
    pub mod usuarios;
    pub mod webhook;
}
mod utils {
    pub mod formato;
}
mod config;
mod db;
mod error;
mod state;
#[cfg(test)]
mod testes;

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use env_logger::Env;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::db::initialize_db;
use crate::gateway::mercadopago::MercadoPago;
use crate::repo::authmac::SqliteAuthMacRepo;
use crate::repo::historico::SqliteHistoricoRepo;
use crate::repo::pagamentos::SqlitePagamentoRepo;
use crate::repo::usuarios::SqliteUsuarioRepo;
use crate::state::AppState;

fn app(state: AppState) -> Router {
    Router::new()
        .route("/auth/login", post(routes::login::login))
        .route("/usuarios", post(routes::usuarios::criar))
        .route(
            "/usuarios/:id",
            get(routes::usuarios::buscar).put(routes::usuarios::atualizar),
        )
        .route(
            "/usuarios/pai/:usuario_pai",
            get(routes::usuarios::listar_por_pai),
        )
        .route("/pagamento/pix", post(routes::pagamento::pix))
        .route("/pagamento/boleto", post(routes::pagamento::boleto))
        .route("/pagamento/cartao", post(routes::pagamento::cartao))
        .route("/pagamento/criar", post(routes::pagamento::criar_preferencia))
        .route(
            "/pagamento/webhook",
            post(routes::webhook::receber).get(routes::webhook::sincronizacao_manual),
        )
        .route("/pagamento/pendentes", get(routes::pagamento::pendentes))
        .route(
            "/pagamento/:id/sincronizar",
            post(routes::webhook::sincronizar),
        )
        .route("/pagamento/:id/cancelar", post(routes::pagamento::cancelar))
        .route("/pagamento/:id/detalhes", get(routes::pagamento::detalhes))
        .route("/pagamentos/:id", get(routes::pagamento::listar))
        .route("/authmac/status", put(routes::authmac::atualizar_status))
        .route("/authmac/:usuario_pai", get(routes::authmac::listar))
        .route("/historico/:usuario", get(routes::historico::listar))
        .with_state(state)
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    dotenv::dotenv().ok();

    let config = Config::carregar()
        .unwrap_or_else(|erro| panic!("Falha ao carregar configuração: {}", erro));

    let pool = initialize_db()
        .await
        .expect("Falha ao inicializar o banco de dados. Verifique as permissões do diretório.");

    let state = AppState {
        usuarios: Arc::new(SqliteUsuarioRepo::new(pool.clone())),
        pagamentos: Arc::new(SqlitePagamentoRepo::new(pool.clone())),
        authmac: Arc::new(SqliteAuthMacRepo::new(pool.clone())),
        historico: Arc::new(SqliteHistoricoRepo::new(pool)),
        gateway: Arc::new(MercadoPago::new(config.mp_access_token.clone())),
        segredo_webhook: config.mp_webhook_secret.clone(),
        base_url: config.base_url.clone(),
    };

    let endereco = format!("0.0.0.0:{}", config.porta);
    println!("Gerenciador rodando no endereço http://{}", endereco);
    let listener = TcpListener::bind(&endereco).await.unwrap();
    axum::serve(listener, app(state)).await.unwrap();
}
