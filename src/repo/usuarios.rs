use async_trait::async_trait;
use sqlx::{Pool, Sqlite};

use crate::error::AppResult;
use crate::models::usuario::Usuario;

/// Repositório da tabela USUARIOS. A planilha de origem não tem índices:
/// toda consulta carrega a tabela inteira e filtra em memória, e é assim
/// que os serviços usam este trait.
#[async_trait]
pub trait UsuarioRepo: Send + Sync {
    async fn listar(&self) -> AppResult<Vec<Usuario>>;
    async fn inserir(&self, usuario: &Usuario) -> AppResult<()>;
    /// Regrava a linha identificada por `id`. Retorna false quando não existe.
    async fn salvar(&self, usuario: &Usuario) -> AppResult<bool>;
}

pub struct SqliteUsuarioRepo {
    pool: Pool<Sqlite>,
}

impl SqliteUsuarioRepo {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UsuarioRepo for SqliteUsuarioRepo {
    async fn listar(&self) -> AppResult<Vec<Usuario>> {
        let usuarios = sqlx::query_as::<_, Usuario>(
            "SELECT id, nome, usuario, email, plano, expira, whatsapp, usuario_pai FROM usuarios",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(usuarios)
    }

    async fn inserir(&self, usuario: &Usuario) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO usuarios (id, nome, usuario, email, plano, expira, whatsapp, usuario_pai)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&usuario.id)
        .bind(&usuario.nome)
        .bind(&usuario.usuario)
        .bind(&usuario.email)
        .bind(&usuario.plano)
        .bind(&usuario.expira)
        .bind(&usuario.whatsapp)
        .bind(&usuario.usuario_pai)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn salvar(&self, usuario: &Usuario) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE usuarios SET nome = ?, usuario = ?, email = ?, plano = ?, expira = ?, whatsapp = ?, usuario_pai = ?
             WHERE id = ?",
        )
        .bind(&usuario.nome)
        .bind(&usuario.usuario)
        .bind(&usuario.email)
        .bind(&usuario.plano)
        .bind(&usuario.expira)
        .bind(&usuario.whatsapp)
        .bind(&usuario.usuario_pai)
        .bind(&usuario.id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
