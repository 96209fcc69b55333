use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::Json;
use log::{error, info};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::services::conciliacao::{self, Conciliacao};
use crate::state::AppState;

/// Notificação assíncrona do gateway. Responde 200 `{received:true}` sempre,
/// inclusive em falha interna: devolver erro faria o gateway reenviar a
/// notificação em rajada. Falhas ficam no log.
pub async fn receber(State(state): State<AppState>, corpo: Bytes) -> Json<Value> {
    let ack = Json(json!({ "received": true }));

    let corpo: Value = match serde_json::from_slice(&corpo) {
        Ok(v) => v,
        Err(e) => {
            error!("Webhook com corpo ilegível: {}", e);
            return ack;
        }
    };
    info!("Webhook recebido: {}", corpo);

    let Some(id) = conciliacao::extrair_id_pagamento(&corpo) else {
        info!("Webhook sem id de pagamento: {}", corpo);
        return ack;
    };

    let pagamento = match state.gateway.buscar_pagamento(&id).await {
        Ok(p) => p,
        Err(e) => {
            error!("Erro ao consultar pagamento {} no gateway: {}", id, e);
            return ack;
        }
    };

    if let Err(e) = conciliacao::aplicar_pagamento(&state, &pagamento).await {
        error!("Erro ao aplicar pagamento {}: {}", id, e);
    }

    ack
}

#[derive(Debug, Deserialize)]
pub struct SincronizacaoManualQuery {
    id: Option<String>,
    secret: Option<String>,
}

/// Conciliação manual por query string, protegida pelo segredo
/// compartilhado. Sem `id` é só a validação de URL do gateway.
pub async fn sincronizacao_manual(
    State(state): State<AppState>,
    Query(consulta): Query<SincronizacaoManualQuery>,
) -> AppResult<Json<Value>> {
    let Some(id) = consulta.id else {
        return Ok(Json(json!({ "ok": true })));
    };

    // O segredo é verificado antes de qualquer chamada ao gateway.
    if consulta.secret.as_deref() != Some(state.segredo_webhook.as_str()) {
        return Err(AppError::NaoAutorizado);
    }

    let pagamento = state.gateway.buscar_pagamento(&id).await?;
    match conciliacao::aplicar_pagamento(&state, &pagamento).await? {
        Conciliacao::NaoAprovado { status } => Ok(Json(json!({
            "status": status,
            "message": "Pagamento não aprovado",
        }))),
        Conciliacao::SemUsuario => Err(AppError::Validacao(
            "user_id não encontrado no metadata".to_string(),
        )),
        Conciliacao::Aplicado {
            id_pagamento,
            id_usuario,
            plano,
            dias,
            repetido,
        } => Ok(Json(json!({
            "ok": true,
            "paymentId": id_pagamento,
            "userId": id_usuario,
            "planoNome": plano,
            "planoDias": dias,
            "updated": !repetido,
        }))),
    }
}

/// Conciliação explícita por id, atrás da superfície autenticada do painel.
pub async fn sincronizar(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let pagamento = state.gateway.buscar_pagamento(&id).await?;
    match conciliacao::aplicar_pagamento(&state, &pagamento).await? {
        Conciliacao::NaoAprovado { status } => Ok(Json(json!({
            "status": status,
            "message": "Pagamento ainda não aprovado.",
        }))),
        Conciliacao::SemUsuario => Err(AppError::Validacao(
            "user_id não encontrado no metadata".to_string(),
        )),
        Conciliacao::Aplicado {
            id_usuario,
            plano,
            dias,
            ..
        } => Ok(Json(json!({
            "status": "approved",
            "userId": id_usuario,
            "planoNome": plano,
            "planoDias": dias,
        }))),
    }
}
