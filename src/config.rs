use once_cell::sync::OnceCell;
use std::env;

/// Configuração do processo, lida do ambiente (um `.env` é carregado pelo
/// `main` antes). As credenciais do gateway são obrigatórias: sem elas o
/// processo se recusa a subir.
#[derive(Debug, Clone)]
pub struct Config {
    pub mp_access_token: String,
    pub mp_webhook_secret: String,
    pub database_url: String,
    pub base_url: String,
    pub porta: u16,
}

static CONFIG: OnceCell<Config> = OnceCell::new();

impl Config {
    pub fn get() -> &'static Config {
        CONFIG.get().expect("Config não inicializada")
    }

    pub fn carregar() -> Result<&'static Config, String> {
        let config = Config {
            mp_access_token: env::var("MP_ACCESS_TOKEN")
                .map_err(|_| "MP_ACCESS_TOKEN não definido".to_string())?,
            mp_webhook_secret: env::var("MP_WEBHOOK_SECRET")
                .map_err(|_| "MP_WEBHOOK_SECRET não definido".to_string())?,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "db/gerenciador.db".to_string()),
            base_url: env::var("BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            porta: env::var("PORTA")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
        };
        CONFIG
            .set(config)
            .map_err(|_| "Config já foi inicializada".to_string())?;
        Ok(Config::get())
    }
}
