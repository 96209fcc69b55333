use serde::{Deserialize, Serialize};

/// Entrada do histórico de logins. Escrita pelo servidor do jogo; este
/// serviço só lê.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct HistoricoLogin {
    pub horario: String,
    pub usuario: String,
    pub ip: String,
    pub mac: String,
}
