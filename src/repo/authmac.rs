use async_trait::async_trait;
use sqlx::{Pool, Sqlite};

use crate::error::AppResult;
use crate::models::authmac::AuthMac;

#[async_trait]
pub trait AuthMacRepo: Send + Sync {
    async fn listar(&self) -> AppResult<Vec<AuthMac>>;
    /// Alterna o status do dispositivo endereçado por (usuario, mac),
    /// comparação sem distinção de caixa. Retorna false quando o par não
    /// existe.
    async fn atualizar_status(&self, usuario: &str, mac: &str, status: &str) -> AppResult<bool>;
}

pub struct SqliteAuthMacRepo {
    pool: Pool<Sqlite>,
}

impl SqliteAuthMacRepo {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthMacRepo for SqliteAuthMacRepo {
    async fn listar(&self) -> AppResult<Vec<AuthMac>> {
        let linhas =
            sqlx::query_as::<_, AuthMac>("SELECT usuario, mac, status FROM authmac")
                .fetch_all(&self.pool)
                .await?;
        Ok(linhas)
    }

    async fn atualizar_status(&self, usuario: &str, mac: &str, status: &str) -> AppResult<bool> {
        // Varre e regrava com os valores armazenados, preservando a caixa
        // original da linha.
        let linhas = self.listar().await?;
        let alvo = linhas.iter().find(|l| {
            l.usuario.to_lowercase() == usuario.to_lowercase()
                && l.mac.to_lowercase() == mac.to_lowercase()
        });

        let Some(alvo) = alvo else {
            return Ok(false);
        };

        sqlx::query("UPDATE authmac SET status = ? WHERE usuario = ? AND mac = ?")
            .bind(status)
            .bind(&alvo.usuario)
            .bind(&alvo.mac)
            .execute(&self.pool)
            .await?;
        Ok(true)
    }
}
