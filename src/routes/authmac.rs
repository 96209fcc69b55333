use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::models::authmac::{STATUS_AUTORIZADO, STATUS_NAO_AUTORIZADO};
use crate::services::usuarios;
use crate::state::AppState;
use crate::utils::formato::mesmo_texto;

/// Dispositivos dos personagens de uma conta: resolve os nomes de usuário
/// sob o pai e filtra a tabela de dispositivos por pertencimento.
pub async fn listar(
    State(state): State<AppState>,
    Path(usuario_pai): Path<String>,
) -> AppResult<Json<Value>> {
    let nomes: Vec<String> = usuarios::listar_por_pai(&state.usuarios, &usuario_pai)
        .await?
        .into_iter()
        .filter(|u| !u.usuario.is_empty())
        .map(|u| u.usuario)
        .collect();

    let macs: Vec<_> = state
        .authmac
        .listar()
        .await?
        .into_iter()
        .filter(|m| nomes.iter().any(|n| mesmo_texto(n, &m.usuario)))
        .collect();

    Ok(Json(json!({ "macs": macs })))
}

#[derive(Debug, Deserialize)]
pub struct AtualizarStatusRequest {
    #[serde(default)]
    usuario: String,
    #[serde(default)]
    mac: String,
    #[serde(default)]
    status: String,
}

pub async fn atualizar_status(
    State(state): State<AppState>,
    Json(corpo): Json<AtualizarStatusRequest>,
) -> AppResult<Json<Value>> {
    if corpo.usuario.is_empty() || corpo.mac.is_empty() || corpo.status.is_empty() {
        return Err(AppError::Validacao(
            "usuario, mac e status são obrigatórios".to_string(),
        ));
    }
    if corpo.status != STATUS_AUTORIZADO && corpo.status != STATUS_NAO_AUTORIZADO {
        return Err(AppError::Validacao("Status inválido".to_string()));
    }

    let atualizado = state
        .authmac
        .atualizar_status(&corpo.usuario, &corpo.mac, &corpo.status)
        .await?;
    if !atualizado {
        return Err(AppError::NaoEncontrado(
            "Dispositivo não encontrado".to_string(),
        ));
    }

    Ok(Json(json!({ "ok": true })))
}

#[cfg(test)]
mod tests {
    use crate::models::authmac::AuthMac;
    use crate::testes::{corpo_json, estado_teste, novo_filho, requisicao_json};
    use axum::http::StatusCode;
    use tower::ServiceExt;

    #[tokio::test]
    async fn lista_somente_dispositivos_da_conta() {
        let ambiente = estado_teste();
        ambiente.insere_usuario(novo_filho("2", "ana_char1", "contaAna"));
        ambiente.insere_usuario(novo_filho("3", "beto_char1", "contaBeto"));
        ambiente.insere_authmac(AuthMac {
            usuario: "Ana_Char1".to_string(),
            mac: "AA:BB:CC:DD:EE:01".to_string(),
            status: "Autorizado".to_string(),
        });
        ambiente.insere_authmac(AuthMac {
            usuario: "beto_char1".to_string(),
            mac: "AA:BB:CC:DD:EE:02".to_string(),
            status: "Autorizado".to_string(),
        });

        let resposta = crate::app(ambiente.state.clone())
            .oneshot(requisicao_json("GET", "/authmac/contaAna", ""))
            .await
            .unwrap();
        assert_eq!(resposta.status(), StatusCode::OK);
        let corpo = corpo_json(resposta).await;
        let macs = corpo["macs"].as_array().unwrap();
        assert_eq!(macs.len(), 1);
        assert_eq!(macs[0]["mac"], "AA:BB:CC:DD:EE:01");
    }

    #[tokio::test]
    async fn status_invalido_e_400() {
        let ambiente = estado_teste();
        let resposta = crate::app(ambiente.state.clone())
            .oneshot(requisicao_json(
                "PUT",
                "/authmac/status",
                r#"{"usuario":"ana_char1","mac":"AA:BB","status":"Bloqueado"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resposta.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn alterna_status_pelo_par_usuario_mac() {
        let ambiente = estado_teste();
        ambiente.insere_authmac(AuthMac {
            usuario: "ana_char1".to_string(),
            mac: "AA:BB:CC:DD:EE:01".to_string(),
            status: "Autorizado".to_string(),
        });

        let resposta = crate::app(ambiente.state.clone())
            .oneshot(requisicao_json(
                "PUT",
                "/authmac/status",
                r#"{"usuario":"ANA_CHAR1","mac":"aa:bb:cc:dd:ee:01","status":"Não Autorizado"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resposta.status(), StatusCode::OK);
        assert_eq!(ambiente.dispositivos()[0].status, "Não Autorizado");
    }

    #[tokio::test]
    async fn dispositivo_desconhecido_e_404() {
        let ambiente = estado_teste();
        let resposta = crate::app(ambiente.state.clone())
            .oneshot(requisicao_json(
                "PUT",
                "/authmac/status",
                r#"{"usuario":"ninguem","mac":"00:00","status":"Autorizado"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resposta.status(), StatusCode::NOT_FOUND);
    }
}
