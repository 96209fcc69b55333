use serde::{Deserialize, Serialize};

/// Linha da tabela USUARIOS. O campo `usuario` vazio identifica a conta pai
/// (identidade de cobrança/login); preenchido identifica um personagem do jogo
/// vinculado à conta apontada por `usuario_pai`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Usuario {
    pub id: String,
    pub nome: String,
    pub usuario: String,
    pub email: String,
    pub plano: String,
    pub expira: String,
    pub whatsapp: String,
    pub usuario_pai: String,
}

pub const PLANO_PADRAO: &str = "Free";

impl Usuario {
    pub fn eh_pai(&self) -> bool {
        self.usuario.is_empty()
    }
}
