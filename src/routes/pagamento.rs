use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::models::pagamento::STATUS_CANCELADO;
use crate::services::pagamentos::{self, Metodo};
use crate::services::usuarios;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagamentoRequest {
    #[serde(default)]
    plano_id: String,
    #[serde(default)]
    user_id: String,
}

pub async fn pix(
    State(state): State<AppState>,
    Json(corpo): Json<PagamentoRequest>,
) -> AppResult<Json<Value>> {
    if corpo.plano_id.is_empty() || corpo.user_id.is_empty() {
        return Err(AppError::Validacao("Dados incompletos".to_string()));
    }

    let pagamento =
        pagamentos::criar_pagamento(&state, &corpo.plano_id, &corpo.user_id, Metodo::Pix).await?;
    let tx = pagamento.dados_pix();

    Ok(Json(json!({
        "id": pagamento.id,
        "status": pagamento.status,
        "qrCode": tx.and_then(|t| t.qr_code.clone()),
        "qrCodeBase64": tx.and_then(|t| t.qr_code_base64.clone()),
        "ticketUrl": tx.and_then(|t| t.ticket_url.clone()),
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoletoRequest {
    #[serde(default)]
    plano_id: String,
    #[serde(default)]
    user_id: String,
    #[serde(default)]
    cpf: String,
}

pub async fn boleto(
    State(state): State<AppState>,
    Json(corpo): Json<BoletoRequest>,
) -> AppResult<Json<Value>> {
    if corpo.plano_id.is_empty() || corpo.user_id.is_empty() || corpo.cpf.is_empty() {
        return Err(AppError::Validacao(
            "Dados incompletos (planoId, userId, cpf)".to_string(),
        ));
    }

    let pagamento = pagamentos::criar_pagamento(
        &state,
        &corpo.plano_id,
        &corpo.user_id,
        Metodo::Boleto { cpf: corpo.cpf },
    )
    .await?;

    Ok(Json(json!({
        "id": pagamento.id,
        "status": pagamento.status,
        "boletoUrl": pagamento
            .transaction_details
            .as_ref()
            .and_then(|d| d.external_resource_url.clone()),
        "barcode": pagamento.barcode.as_ref().and_then(|b| b.content.clone()),
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartaoRequest {
    #[serde(default)]
    token: String,
    #[serde(default)]
    plano_id: String,
    #[serde(default)]
    user_id: String,
    installments: Option<u32>,
    payment_method_id: Option<String>,
    issuer_id: Option<String>,
    email: Option<String>,
}

pub async fn cartao(
    State(state): State<AppState>,
    Json(corpo): Json<CartaoRequest>,
) -> AppResult<Json<Value>> {
    if corpo.token.is_empty() || corpo.plano_id.is_empty() || corpo.user_id.is_empty() {
        return Err(AppError::Validacao("Dados incompletos".to_string()));
    }

    let pagamento = pagamentos::criar_pagamento(
        &state,
        &corpo.plano_id,
        &corpo.user_id,
        Metodo::Cartao {
            token: corpo.token,
            parcelas: corpo.installments.unwrap_or(1),
            payment_method_id: corpo.payment_method_id,
            issuer_id: corpo.issuer_id,
            email: corpo.email,
        },
    )
    .await?;

    Ok(Json(json!({
        "status": pagamento.status,
        "statusDetail": pagamento.status_detail,
        "id": pagamento.id,
    })))
}

pub async fn criar_preferencia(
    State(state): State<AppState>,
    Json(corpo): Json<PagamentoRequest>,
) -> AppResult<Json<Value>> {
    if corpo.plano_id.is_empty() || corpo.user_id.is_empty() {
        return Err(AppError::Validacao(
            "Plano e usuário são obrigatórios".to_string(),
        ));
    }

    let preferencia =
        pagamentos::criar_preferencia(&state, &corpo.plano_id, &corpo.user_id).await?;

    Ok(Json(json!({
        "preferenceId": preferencia.id,
        "initPoint": preferencia.init_point,
        "sandboxInitPoint": preferencia.sandbox_init_point,
    })))
}

/// Cancela no gateway e marca o registro local como Cancelado. Um registro
/// local ausente não é erro; o cancelamento no gateway é o que vale.
pub async fn cancelar(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    state.gateway.cancelar_pagamento(&id).await?;
    state
        .pagamentos
        .atualizar_status(&id, STATUS_CANCELADO)
        .await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn detalhes(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let pagamento = state.gateway.buscar_pagamento(&id).await?;

    let eh_pix = pagamento.payment_method_id == "pix";
    let eh_boleto = pagamento.payment_type_id == "ticket";
    let tx = pagamento.dados_pix();

    Ok(Json(json!({
        "id": pagamento.id_str(),
        "status": pagamento.status,
        "metodo": pagamento.payment_method_id,
        "valor": pagamento.transaction_amount.unwrap_or(0.0),
        "dataCriacao": pagamento.date_created.clone().unwrap_or_default(),
        "planoNome": pagamento.metadado("plano_nome"),
        "pixQrCode": if eh_pix { tx.and_then(|t| t.qr_code.clone()) } else { None },
        "pixQrCodeBase64": if eh_pix { tx.and_then(|t| t.qr_code_base64.clone()) } else { None },
        "pixTicketUrl": if eh_pix { tx.and_then(|t| t.ticket_url.clone()) } else { None },
        "boletoUrl": if eh_boleto {
            pagamento.transaction_details.as_ref().and_then(|d| d.external_resource_url.clone())
        } else { None },
        "barcode": if eh_boleto {
            pagamento.barcode.as_ref().and_then(|b| b.content.clone())
        } else { None },
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendentesQuery {
    usuario_pai: Option<String>,
}

/// Pagamentos ainda pendentes no gateway, varrendo os personagens da conta.
/// Personagem sem pagamento no gateway não é erro; a busca dele é só pulada.
pub async fn pendentes(
    State(state): State<AppState>,
    Query(consulta): Query<PendentesQuery>,
) -> AppResult<Json<Value>> {
    let Some(usuario_pai) = consulta.usuario_pai.filter(|p| !p.is_empty()) else {
        return Err(AppError::Validacao("usuarioPai é obrigatório".to_string()));
    };

    let filhos: Vec<_> = usuarios::listar_por_pai(&state.usuarios, &usuario_pai)
        .await?
        .into_iter()
        .filter(|u| !u.usuario.is_empty())
        .collect();

    let mut pendentes = Vec::new();
    for filho in &filhos {
        let Ok(resultados) = state.gateway.buscar_pendentes(&filho.id).await else {
            continue;
        };
        for p in resultados {
            if p.status != "pending" {
                continue;
            }
            let eh_pix = p.payment_method_id == "pix";
            let tx = if eh_pix { p.dados_pix() } else { None };
            pendentes.push(json!({
                "id": p.id_str(),
                "idUsuario": filho.id,
                "usuario": filho.usuario,
                "status": p.status,
                "valor": p.transaction_amount.unwrap_or(0.0),
                "metodo": p.payment_method_id,
                "dataCriacao": p.date_created.clone().unwrap_or_default(),
                "planoNome": p.metadado("plano_nome"),
                "pixQrCode": tx.and_then(|t| t.qr_code.clone()),
                "pixQrCodeBase64": tx.and_then(|t| t.qr_code_base64.clone()),
                "pixTicketUrl": tx.and_then(|t| t.ticket_url.clone()),
            }));
        }
    }

    Ok(Json(json!({ "pendentes": pendentes })))
}

/// Histórico local de pagamentos de uma conta.
pub async fn listar(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let pagamentos = state.pagamentos.listar_por_usuario(&id).await?;
    Ok(Json(json!({ "pagamentos": pagamentos })))
}
