use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde_json::json;
use thiserror::Error;

/// Erros da aplicação. Toda rota devolve `{"error": "<mensagem>"}` com o
/// status HTTP correspondente; detalhes de banco e de gateway ficam só no
/// log do servidor.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validacao(String),

    #[error("{0}")]
    NaoEncontrado(String),

    #[error("{0}")]
    Conflito(String),

    #[error("Não autorizado")]
    NaoAutorizado,

    #[error("Erro no banco de dados: {0}")]
    Banco(#[from] sqlx::Error),

    #[error("Erro ao comunicar com o gateway de pagamento: {0}")]
    Gateway(#[from] reqwest::Error),

    #[error("{0}")]
    Interno(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, mensagem) = match &self {
            AppError::Validacao(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NaoEncontrado(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Conflito(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::NaoAutorizado => (StatusCode::UNAUTHORIZED, "Não autorizado".to_string()),
            AppError::Banco(e) => {
                error!("Erro no banco de dados: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Erro interno do servidor".to_string(),
                )
            }
            AppError::Gateway(e) => {
                error!("Erro no gateway de pagamento: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Erro ao processar pagamento".to_string(),
                )
            }
            AppError::Interno(msg) => {
                error!("Erro interno: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Erro interno do servidor".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": mensagem }))).into_response()
    }
}
