use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

use crate::error::AppResult;
use crate::state::AppState;

/// Histórico de logins de um personagem, gravado pelo servidor do jogo.
pub async fn listar(
    State(state): State<AppState>,
    Path(usuario): Path<String>,
) -> AppResult<Json<Value>> {
    let historico = state.historico.listar_por_usuario(&usuario).await?;
    Ok(Json(json!({ "historico": historico })))
}
