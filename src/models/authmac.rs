use serde::{Deserialize, Serialize};

pub const STATUS_AUTORIZADO: &str = "Autorizado";
pub const STATUS_NAO_AUTORIZADO: &str = "Não Autorizado";

/// Dispositivo autorizado de um personagem. As linhas são inseridas pelo
/// cliente do jogo na primeira conexão; aqui apenas listamos e alternamos o
/// status, endereçando pela chave composta (usuario, mac).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuthMac {
    pub usuario: String,
    pub mac: String,
    pub status: String,
}
