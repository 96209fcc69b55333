use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::services::usuarios;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    usuario_pai: String,
}

/// Login por nome de conta: devolve a linha pai e todos os usuários da
/// conta. Não há senha; o nome da conta é a credencial do painel.
pub async fn login(
    State(state): State<AppState>,
    Json(corpo): Json<LoginRequest>,
) -> AppResult<Json<Value>> {
    if corpo.usuario_pai.is_empty() {
        return Err(AppError::Validacao("Usuário Pai é obrigatório".to_string()));
    }

    let pai = usuarios::buscar_pai(&state.usuarios, &corpo.usuario_pai)
        .await?
        .ok_or_else(|| AppError::NaoEncontrado("Conta não encontrada".to_string()))?;
    let todos = usuarios::listar_por_pai(&state.usuarios, &corpo.usuario_pai).await?;

    Ok(Json(json!({ "user": pai, "usuarios": todos })))
}
