use serde::{Deserialize, Serialize};

pub const STATUS_PENDENTE: &str = "Pendente";
pub const STATUS_APROVADO: &str = "Aprovado";
pub const STATUS_CANCELADO: &str = "Cancelado";

/// Registro local de um pagamento observado no gateway. No máximo uma linha
/// por `id_pagamento`; a unicidade é garantida pelo fluxo de
/// atualizar-ou-inserir da conciliação, não pelo armazenamento.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Pagamento {
    pub id_usuario: String,
    pub id_pagamento: String,
    pub data_pagamento: String,
    pub valor: String,
    pub metodo: String,
    pub status: String,
    #[serde(default)]
    pub referencia_externa: String,
}
