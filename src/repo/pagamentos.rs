use async_trait::async_trait;
use sqlx::{Pool, Sqlite};

use crate::error::AppResult;
use crate::models::pagamento::Pagamento;

#[async_trait]
pub trait PagamentoRepo: Send + Sync {
    async fn listar_por_usuario(&self, id_usuario: &str) -> AppResult<Vec<Pagamento>>;
    async fn inserir(&self, pagamento: &Pagamento) -> AppResult<()>;
    /// Atualiza o status da linha com `id_pagamento` e devolve o status
    /// anterior; None quando nenhuma linha existe. É a metade
    /// "atualizar" do atualizar-ou-inserir da conciliação.
    async fn atualizar_status(&self, id_pagamento: &str, status: &str)
        -> AppResult<Option<String>>;
}

pub struct SqlitePagamentoRepo {
    pool: Pool<Sqlite>,
}

impl SqlitePagamentoRepo {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PagamentoRepo for SqlitePagamentoRepo {
    async fn listar_por_usuario(&self, id_usuario: &str) -> AppResult<Vec<Pagamento>> {
        let linhas = sqlx::query_as::<_, Pagamento>(
            "SELECT id_usuario, id_pagamento, data_pagamento, valor, metodo, status, referencia_externa
             FROM pagamentos",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(linhas
            .into_iter()
            .filter(|p| p.id_usuario == id_usuario)
            .collect())
    }

    async fn inserir(&self, pagamento: &Pagamento) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO pagamentos (id_usuario, id_pagamento, data_pagamento, valor, metodo, status, referencia_externa)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&pagamento.id_usuario)
        .bind(&pagamento.id_pagamento)
        .bind(&pagamento.data_pagamento)
        .bind(&pagamento.valor)
        .bind(&pagamento.metodo)
        .bind(&pagamento.status)
        .bind(&pagamento.referencia_externa)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn atualizar_status(
        &self,
        id_pagamento: &str,
        status: &str,
    ) -> AppResult<Option<String>> {
        // Leitura e escrita separadas, como na planilha: duas entregas
        // simultâneas da mesma aprovação podem ambas não encontrar a linha
        // e duplicar o registro. Lacuna conhecida e aceita.
        let anterior = sqlx::query_scalar::<_, String>(
            "SELECT status FROM pagamentos WHERE id_pagamento = ? LIMIT 1",
        )
        .bind(id_pagamento)
        .fetch_optional(&self.pool)
        .await?;

        let Some(anterior) = anterior else {
            return Ok(None);
        };

        sqlx::query("UPDATE pagamentos SET status = ? WHERE id_pagamento = ?")
            .bind(status)
            .bind(id_pagamento)
            .execute(&self.pool)
            .await?;

        Ok(Some(anterior))
    }
}
