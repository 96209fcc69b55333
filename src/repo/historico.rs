use async_trait::async_trait;
use sqlx::{Pool, Sqlite};

use crate::error::AppResult;
use crate::models::historico::HistoricoLogin;

#[async_trait]
pub trait HistoricoRepo: Send + Sync {
    async fn listar_por_usuario(&self, usuario: &str) -> AppResult<Vec<HistoricoLogin>>;
}

pub struct SqliteHistoricoRepo {
    pool: Pool<Sqlite>,
}

impl SqliteHistoricoRepo {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HistoricoRepo for SqliteHistoricoRepo {
    async fn listar_por_usuario(&self, usuario: &str) -> AppResult<Vec<HistoricoLogin>> {
        let linhas = sqlx::query_as::<_, HistoricoLogin>(
            "SELECT horario, usuario, ip, mac FROM historico",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(linhas
            .into_iter()
            .filter(|l| l.usuario.to_lowercase() == usuario.to_lowercase())
            .collect())
    }
}
