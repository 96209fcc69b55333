use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---- Pedidos enviados ao gateway ----

#[derive(Debug, Clone, Serialize)]
pub struct Identificacao {
    #[serde(rename = "type")]
    pub tipo: String,
    pub number: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Pagador {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identification: Option<Identificacao>,
}

/// Bolsa de metadados anexada na criação. É o único canal pelo qual a
/// conciliação descobre, mais tarde, a qual conta e plano um pagamento
/// aprovado pertence.
#[derive(Debug, Clone, Serialize)]
pub struct MetadadosPagamento {
    pub user_id: String,
    pub user_name: String,
    pub plano_id: String,
    pub plano_nome: String,
    pub plano_dias: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NovoPagamento {
    pub transaction_amount: f64,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installments: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer_id: Option<String>,
    pub payer: Pagador,
    pub external_reference: String,
    pub metadata: MetadadosPagamento,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemPreferencia {
    pub id: String,
    pub title: String,
    pub description: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub currency_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PagadorPreferencia {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UrlsRetorno {
    pub success: String,
    pub failure: String,
    pub pending: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NovaPreferencia {
    pub items: Vec<ItemPreferencia>,
    pub payer: PagadorPreferencia,
    pub metadata: MetadadosPagamento,
    pub back_urls: UrlsRetorno,
    pub auto_return: String,
    pub notification_url: String,
    pub external_reference: String,
}

// ---- Respostas do gateway ----

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DadosTransacao {
    pub qr_code: Option<String>,
    pub qr_code_base64: Option<String>,
    pub ticket_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PontoInteracao {
    pub transaction_data: Option<DadosTransacao>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetalhesTransacao {
    pub external_resource_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CodigoBarras {
    pub content: Option<String>,
}

/// Detalhe de um pagamento como o gateway o devolve. Campos ausentes viram
/// defaults; a conciliação só depende de `status`, `metadata` e dos campos
/// de exibição.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PagamentoGateway {
    pub id: Option<i64>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub status_detail: String,
    pub transaction_amount: Option<f64>,
    #[serde(default)]
    pub payment_type_id: String,
    #[serde(default)]
    pub payment_method_id: String,
    pub date_created: Option<String>,
    pub date_approved: Option<String>,
    pub external_reference: Option<String>,
    #[serde(default)]
    pub metadata: Value,
    pub point_of_interaction: Option<PontoInteracao>,
    pub transaction_details: Option<DetalhesTransacao>,
    pub barcode: Option<CodigoBarras>,
}

impl PagamentoGateway {
    pub fn id_str(&self) -> String {
        self.id.map(|i| i.to_string()).unwrap_or_default()
    }

    /// Valores dos metadados chegam ora como string, ora como número;
    /// normaliza para string, vazia quando o campo não existe.
    pub fn metadado(&self, chave: &str) -> String {
        match self.metadata.get(chave) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    }

    pub fn dados_pix(&self) -> Option<&DadosTransacao> {
        self.point_of_interaction
            .as_ref()
            .and_then(|p| p.transaction_data.as_ref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuscaPagamentos {
    #[serde(default)]
    pub results: Vec<PagamentoGateway>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreferenciaGateway {
    pub id: Option<String>,
    pub init_point: Option<String>,
    pub sandbox_init_point: Option<String>,
}
