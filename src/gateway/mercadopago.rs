use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::gateway::tipos::{
    BuscaPagamentos, NovaPreferencia, NovoPagamento, PagamentoGateway, PreferenciaGateway,
};

const API_URL: &str = "https://api.mercadopago.com";

/// Operações do gateway de pagamentos. Rotas e conciliação dependem deste
/// trait, nunca do cliente HTTP concreto; os testes usam um dublê em
/// memória.
#[async_trait]
pub trait GatewayPagamentos: Send + Sync {
    async fn criar_pagamento(&self, pedido: &NovoPagamento) -> AppResult<PagamentoGateway>;
    async fn buscar_pagamento(&self, id: &str) -> AppResult<PagamentoGateway>;
    async fn cancelar_pagamento(&self, id: &str) -> AppResult<PagamentoGateway>;
    /// Pagamentos pendentes no gateway com a referência externa informada.
    async fn buscar_pendentes(&self, referencia_externa: &str)
        -> AppResult<Vec<PagamentoGateway>>;
    async fn criar_preferencia(&self, pedido: &NovaPreferencia) -> AppResult<PreferenciaGateway>;
}

pub struct MercadoPago {
    http: Client,
    token: String,
    api_url: String,
}

impl MercadoPago {
    pub fn new(token: String) -> Self {
        Self {
            http: Client::new(),
            token,
            api_url: API_URL.to_string(),
        }
    }
}

#[async_trait]
impl GatewayPagamentos for MercadoPago {
    async fn criar_pagamento(&self, pedido: &NovoPagamento) -> AppResult<PagamentoGateway> {
        let resposta = self
            .http
            .post(format!("{}/v1/payments", self.api_url))
            .bearer_auth(&self.token)
            .header("X-Idempotency-Key", Uuid::new_v4().to_string())
            .json(pedido)
            .send()
            .await?
            .error_for_status()?;
        Ok(resposta.json().await?)
    }

    async fn buscar_pagamento(&self, id: &str) -> AppResult<PagamentoGateway> {
        let resposta = self
            .http
            .get(format!("{}/v1/payments/{}", self.api_url, id))
            .bearer_auth(&self.token)
            .send()
            .await?;
        if resposta.status() == StatusCode::NOT_FOUND {
            return Err(AppError::NaoEncontrado("Pagamento não encontrado".to_string()));
        }
        let resposta = resposta.error_for_status()?;
        Ok(resposta.json().await?)
    }

    async fn cancelar_pagamento(&self, id: &str) -> AppResult<PagamentoGateway> {
        let resposta = self
            .http
            .put(format!("{}/v1/payments/{}", self.api_url, id))
            .bearer_auth(&self.token)
            .header("X-Idempotency-Key", Uuid::new_v4().to_string())
            .json(&serde_json::json!({ "status": "cancelled" }))
            .send()
            .await?
            .error_for_status()?;
        Ok(resposta.json().await?)
    }

    async fn buscar_pendentes(
        &self,
        referencia_externa: &str,
    ) -> AppResult<Vec<PagamentoGateway>> {
        let resposta = self
            .http
            .get(format!("{}/v1/payments/search", self.api_url))
            .bearer_auth(&self.token)
            .query(&[
                ("external_reference", referencia_externa),
                ("status", "pending"),
            ])
            .send()
            .await?
            .error_for_status()?;
        let busca: BuscaPagamentos = resposta.json().await?;
        Ok(busca.results)
    }

    async fn criar_preferencia(&self, pedido: &NovaPreferencia) -> AppResult<PreferenciaGateway> {
        let resposta = self
            .http
            .post(format!("{}/checkout/preferences", self.api_url))
            .bearer_auth(&self.token)
            .json(pedido)
            .send()
            .await?
            .error_for_status()?;
        Ok(resposta.json().await?)
    }
}
