use chrono::{Duration, Local, NaiveDate};
use log::{error, info};
use serde_json::Value;
use std::sync::Arc;

use crate::error::AppResult;
use crate::gateway::tipos::PagamentoGateway;
use crate::models::pagamento::{Pagamento, STATUS_APROVADO};
use crate::repo::usuarios::UsuarioRepo;
use crate::services::usuarios::buscar_por_id;
use crate::state::AppState;
use crate::utils::formato::{formatar_data_gateway, formatar_valor, mapear_metodo};

pub const PLANO_SEM_NOME: &str = "Premium";
pub const DIAS_PADRAO: i64 = 30;

/// Resultado de uma observação de pagamento aplicada ao armazenamento.
#[derive(Debug, Clone, PartialEq)]
pub enum Conciliacao {
    /// O gateway ainda não aprovou; nada foi gravado.
    NaoAprovado { status: String },
    /// Aprovado mas sem `user_id` nos metadados; nada foi gravado.
    SemUsuario,
    /// Aprovado e aplicado. `repetido` marca a entrega repetida de uma
    /// aprovação já registrada: o plano não é estendido de novo.
    Aplicado {
        id_pagamento: String,
        id_usuario: String,
        plano: String,
        dias: i64,
        repetido: bool,
    },
}

/// Extrai o id de pagamento de qualquer formato de notificação do gateway:
/// `{type:"payment", data:{id}}`, `{action:"payment.updated"|"payment.created",
/// data:{id}}` ou o IPN antigo `{topic:"payment", resource:"/v1/payments/123"}`
/// (o resource também pode ser só o id).
pub fn extrair_id_pagamento(corpo: &Value) -> Option<String> {
    let eh_pagamento = corpo["type"] == "payment"
        || corpo["topic"] == "payment"
        || matches!(
            corpo["action"].as_str(),
            Some("payment.updated") | Some("payment.created")
        );
    if !eh_pagamento {
        return None;
    }

    if let Some(id) = valor_como_texto(&corpo["data"]["id"]).or_else(|| valor_como_texto(&corpo["id"])) {
        return Some(id);
    }

    corpo["resource"].as_str().and_then(digitos_finais)
}

fn valor_como_texto(valor: &Value) -> Option<String> {
    match valor {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn digitos_finais(texto: &str) -> Option<String> {
    let digitos: Vec<char> = texto
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digitos.is_empty() {
        return None;
    }
    Some(digitos.into_iter().rev().collect())
}

/// Nova expiração: estende a partir da expiração atual quando ela ainda
/// está no futuro; caso contrário conta a partir de hoje.
pub fn calcular_expiracao(expira_atual: &str, dias: i64) -> String {
    let hoje = Local::now().date_naive();
    let base = NaiveDate::parse_from_str(expira_atual, "%d/%m/%Y")
        .ok()
        .filter(|d| *d > hoje)
        .unwrap_or(hoje);
    (base + Duration::days(dias)).format("%d/%m/%Y").to_string()
}

/// Grava plano e expiração na conta `id`. Silencioso quando a conta não
/// existe, como o painel original.
pub async fn atualizar_plano(
    repo: &Arc<dyn UsuarioRepo>,
    id: &str,
    plano: &str,
    dias: i64,
) -> AppResult<bool> {
    let Some(mut usuario) = buscar_por_id(repo, id).await? else {
        return Ok(false);
    };
    usuario.expira = calcular_expiracao(&usuario.expira, dias);
    usuario.plano = plano.to_string();
    repo.salvar(&usuario).await
}

/// Aplica uma observação de pagamento ao armazenamento: atualiza ou insere
/// o registro local e, na transição para aprovado, estende o plano da
/// conta dona. Seguro para entregas repetidas da mesma aprovação.
pub async fn aplicar_pagamento(
    state: &AppState,
    pagamento: &PagamentoGateway,
) -> AppResult<Conciliacao> {
    if pagamento.status != "approved" {
        info!(
            "Pagamento {} com status {}",
            pagamento.id_str(),
            pagamento.status
        );
        return Ok(Conciliacao::NaoAprovado {
            status: pagamento.status.clone(),
        });
    }

    let id_usuario = pagamento.metadado("user_id");
    if id_usuario.is_empty() {
        // Pagamento alheio ou malformado: nunca inventar uma conta.
        error!(
            "Pagamento {} aprovado sem user_id nos metadados",
            pagamento.id_str()
        );
        return Ok(Conciliacao::SemUsuario);
    }

    let plano = match pagamento.metadado("plano_nome") {
        nome if nome.is_empty() => PLANO_SEM_NOME.to_string(),
        nome => nome,
    };
    let dias = pagamento
        .metadado("plano_dias")
        .parse::<i64>()
        .unwrap_or(DIAS_PADRAO);

    let id_pagamento = pagamento.id_str();
    let anterior = state
        .pagamentos
        .atualizar_status(&id_pagamento, STATUS_APROVADO)
        .await?;

    let transicao = match &anterior {
        None => {
            let registro = Pagamento {
                id_usuario: id_usuario.clone(),
                id_pagamento: id_pagamento.clone(),
                data_pagamento: formatar_data_gateway(
                    pagamento
                        .date_approved
                        .as_deref()
                        .or(pagamento.date_created.as_deref()),
                ),
                valor: formatar_valor(pagamento.transaction_amount.unwrap_or(0.0)),
                metodo: mapear_metodo(&pagamento.payment_type_id),
                status: STATUS_APROVADO.to_string(),
                referencia_externa: pagamento.external_reference.clone().unwrap_or_default(),
            };
            state.pagamentos.inserir(&registro).await?;
            true
        }
        Some(status) => status != STATUS_APROVADO,
    };

    if transicao {
        atualizar_plano(&state.usuarios, &id_usuario, &plano, dias).await?;
        info!(
            "Pagamento {} aprovado para o usuário {}. Plano: {}, dias: {}",
            id_pagamento, id_usuario, plano, dias
        );
    } else {
        info!(
            "Pagamento {} já estava aprovado; entrega repetida ignorada",
            id_pagamento
        );
    }

    Ok(Conciliacao::Aplicado {
        id_pagamento,
        id_usuario,
        plano,
        dias,
        repetido: !transicao,
    })
}
