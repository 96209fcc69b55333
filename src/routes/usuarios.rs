use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::services::usuarios;
use crate::services::usuarios::AtualizacaoPerfil;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriarUsuarioRequest {
    #[serde(default)]
    is_parent: bool,
    #[serde(default)]
    nome: String,
    #[serde(default)]
    usuario: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    whatsapp: String,
    #[serde(default)]
    usuario_pai: String,
}

pub async fn criar(
    State(state): State<AppState>,
    Json(corpo): Json<CriarUsuarioRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    if corpo.usuario_pai.is_empty() {
        return Err(AppError::Validacao("Usuário Pai é obrigatório".to_string()));
    }

    // Cadastro de conta pai (tela de cadastro)
    if corpo.is_parent {
        if corpo.nome.is_empty() || corpo.email.is_empty() {
            return Err(AppError::Validacao(
                "Nome e E-mail são obrigatórios".to_string(),
            ));
        }
        let user = usuarios::criar_pai(
            &state.usuarios,
            corpo.nome,
            corpo.email,
            corpo.whatsapp,
            corpo.usuario_pai,
        )
        .await?;
        return Ok((StatusCode::CREATED, Json(json!({ "user": user }))));
    }

    // Novo personagem sob uma conta existente
    if corpo.usuario.is_empty() {
        return Err(AppError::Validacao(
            "Nome de Usuário é obrigatório".to_string(),
        ));
    }
    let user = usuarios::criar_filho(
        &state.usuarios,
        corpo.usuario,
        corpo.nome,
        corpo.email,
        corpo.whatsapp,
        corpo.usuario_pai,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(json!({ "user": user }))))
}

pub async fn buscar(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let user = usuarios::buscar_por_id(&state.usuarios, &id)
        .await?
        .ok_or_else(|| AppError::NaoEncontrado("Usuário não encontrado".to_string()))?;
    Ok(Json(json!({ "user": user })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtualizarUsuarioRequest {
    nome: Option<String>,
    usuario: Option<String>,
    email: Option<String>,
    whatsapp: Option<String>,
}

pub async fn atualizar(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(corpo): Json<AtualizarUsuarioRequest>,
) -> AppResult<Json<Value>> {
    let dados = AtualizacaoPerfil {
        nome: corpo.nome,
        usuario: corpo.usuario,
        email: corpo.email,
        whatsapp: corpo.whatsapp,
    };
    let user = usuarios::atualizar_perfil(&state.usuarios, &id, dados)
        .await?
        .ok_or_else(|| AppError::NaoEncontrado("Usuário não encontrado".to_string()))?;
    Ok(Json(json!({ "user": user })))
}

pub async fn listar_por_pai(
    State(state): State<AppState>,
    Path(usuario_pai): Path<String>,
) -> AppResult<Json<Value>> {
    let lista = usuarios::listar_por_pai(&state.usuarios, &usuario_pai).await?;
    Ok(Json(json!({ "usuarios": lista })))
}
