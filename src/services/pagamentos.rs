use chrono::Utc;
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::gateway::tipos::{
    Identificacao, ItemPreferencia, MetadadosPagamento, NovaPreferencia, NovoPagamento, Pagador,
    PagadorPreferencia, PagamentoGateway, PreferenciaGateway, UrlsRetorno,
};
use crate::models::pagamento::{Pagamento, STATUS_PENDENTE};
use crate::models::plano::{buscar_plano, Plano};
use crate::models::usuario::Usuario;
use crate::repo::usuarios::UsuarioRepo;
use crate::services::{conciliacao, usuarios};
use crate::state::AppState;
use crate::utils::formato::{data_hoje, formatar_valor, mesmo_texto, so_digitos};

pub const EMAIL_SUPORTE: &str = "suporte@gerenciadormu.com.br";

/// Método de pagamento, um construtor por fluxo com exatamente os campos
/// que aquele fluxo exige.
#[derive(Debug, Clone)]
pub enum Metodo {
    Pix,
    Boleto {
        cpf: String,
    },
    Cartao {
        token: String,
        parcelas: u32,
        payment_method_id: Option<String>,
        issuer_id: Option<String>,
        email: Option<String>,
    },
}

impl Metodo {
    fn rotulo(&self) -> &'static str {
        match self {
            Metodo::Pix => "PIX",
            Metodo::Boleto { .. } => "Boleto",
            Metodo::Cartao { .. } => "Cartão de Crédito",
        }
    }
}

/// E-mail e nome do pagador. Personagens muitas vezes não têm e-mail, mas o
/// gateway exige um: cai para o contato da conta pai e, em último caso,
/// para o endereço de suporte.
async fn contato_pagador(
    repo: &Arc<dyn UsuarioRepo>,
    usuario: &Usuario,
) -> AppResult<(String, String)> {
    let mut email = usuario.email.clone();
    let mut nome = if usuario.nome.is_empty() {
        usuario.usuario_pai.clone()
    } else {
        usuario.nome.clone()
    };

    if email.is_empty() && !usuario.usuario_pai.is_empty() {
        let todos = repo.listar().await?;
        let pai = todos.iter().find(|u| {
            u.eh_pai()
                && !u.email.is_empty()
                && (mesmo_texto(&u.nome, &usuario.usuario_pai)
                    || mesmo_texto(&u.usuario, &usuario.usuario_pai))
        });
        if let Some(pai) = pai {
            email = pai.email.clone();
            if !pai.nome.is_empty() {
                nome = pai.nome.clone();
            }
        }
    }

    if email.is_empty() {
        email = EMAIL_SUPORTE.to_string();
    }
    if nome.is_empty() {
        nome = "Usuário".to_string();
    }
    Ok((email, nome))
}

fn referencia_externa(usuario: &Usuario, plano: &Plano) -> String {
    format!(
        "{}_{}_{}",
        usuario.id,
        plano.id,
        Utc::now().timestamp_millis()
    )
}

fn metadados(usuario: &Usuario, plano: &Plano) -> MetadadosPagamento {
    MetadadosPagamento {
        user_id: usuario.id.clone(),
        user_name: usuario.usuario.clone(),
        plano_id: plano.id.to_string(),
        plano_nome: plano.nome.to_string(),
        plano_dias: plano.dias,
    }
}

fn descricao(plano: &Plano) -> String {
    format!("Gerenciador MU - Plano {}", plano.nome)
}

async fn resolver(
    state: &AppState,
    plano_id: &str,
    user_id: &str,
) -> AppResult<(&'static Plano, Usuario)> {
    let plano = buscar_plano(plano_id)
        .ok_or_else(|| AppError::NaoEncontrado("Plano não encontrado".to_string()))?;
    let usuario = usuarios::buscar_por_id(&state.usuarios, user_id)
        .await?
        .ok_or_else(|| AppError::NaoEncontrado("Usuário não encontrado".to_string()))?;
    Ok((plano, usuario))
}

/// Cria a intenção de pagamento no gateway e grava o registro local como
/// Pendente. Cartão pode aprovar na hora; nesse caso a aprovação passa pelo
/// mesmo caminho da conciliação, que promove o registro e estende o plano.
pub async fn criar_pagamento(
    state: &AppState,
    plano_id: &str,
    user_id: &str,
    metodo: Metodo,
) -> AppResult<PagamentoGateway> {
    let (plano, usuario) = resolver(state, plano_id, user_id).await?;
    let (email_pagador, nome_pagador) = contato_pagador(&state.usuarios, &usuario).await?;

    let mut pedido = NovoPagamento {
        transaction_amount: plano.preco,
        description: descricao(plano),
        payment_method_id: None,
        token: None,
        installments: None,
        issuer_id: None,
        payer: Pagador {
            email: email_pagador.clone(),
            ..Default::default()
        },
        external_reference: referencia_externa(&usuario, plano),
        metadata: metadados(&usuario, plano),
    };

    match &metodo {
        Metodo::Pix => {
            pedido.payment_method_id = Some("pix".to_string());
            pedido.payer.first_name = Some(nome_pagador);
        }
        Metodo::Boleto { cpf } => {
            pedido.payment_method_id = Some("bolbradesco".to_string());
            let mut partes = nome_pagador.split_whitespace();
            let primeiro = partes.next().unwrap_or("Usuário").to_string();
            let resto = partes.collect::<Vec<_>>().join(" ");
            pedido.payer.last_name = Some(if resto.is_empty() {
                primeiro.clone()
            } else {
                resto
            });
            pedido.payer.first_name = Some(primeiro);
            pedido.payer.identification = Some(Identificacao {
                tipo: "CPF".to_string(),
                number: so_digitos(cpf),
            });
        }
        Metodo::Cartao {
            token,
            parcelas,
            payment_method_id,
            issuer_id,
            email,
        } => {
            pedido.token = Some(token.clone());
            pedido.installments = Some(*parcelas);
            pedido.payment_method_id = payment_method_id.clone();
            pedido.issuer_id = issuer_id.clone();
            if let Some(email) = email.as_deref().filter(|e| !e.is_empty()) {
                pedido.payer.email = email.to_string();
            }
        }
    }

    let pagamento = state.gateway.criar_pagamento(&pedido).await?;

    state
        .pagamentos
        .inserir(&Pagamento {
            id_usuario: usuario.id.clone(),
            id_pagamento: pagamento.id_str(),
            data_pagamento: data_hoje(),
            valor: formatar_valor(plano.preco),
            metodo: metodo.rotulo().to_string(),
            status: STATUS_PENDENTE.to_string(),
            referencia_externa: pedido.external_reference.clone(),
        })
        .await?;

    if matches!(metodo, Metodo::Cartao { .. }) && pagamento.status == "approved" {
        conciliacao::aplicar_pagamento(state, &pagamento).await?;
    }

    Ok(pagamento)
}

/// Checkout por redirecionamento: só cria a preferência no gateway; o
/// registro local fica para o retorno do webhook.
pub async fn criar_preferencia(
    state: &AppState,
    plano_id: &str,
    user_id: &str,
) -> AppResult<PreferenciaGateway> {
    let (plano, usuario) = resolver(state, plano_id, user_id).await?;
    let (email_pagador, nome_pagador) = contato_pagador(&state.usuarios, &usuario).await?;

    let pedido = NovaPreferencia {
        items: vec![ItemPreferencia {
            id: plano.id.to_string(),
            title: descricao(plano),
            description: plano.descricao.to_string(),
            quantity: 1,
            unit_price: plano.preco,
            currency_id: "BRL".to_string(),
        }],
        payer: PagadorPreferencia {
            name: nome_pagador,
            email: email_pagador,
        },
        metadata: metadados(&usuario, plano),
        back_urls: UrlsRetorno {
            success: format!("{}/pagamento/resultado?status=success", state.base_url),
            failure: format!("{}/pagamento/resultado?status=failure", state.base_url),
            pending: format!("{}/pagamento/resultado?status=pending", state.base_url),
        },
        auto_return: "approved".to_string(),
        notification_url: format!("{}/pagamento/webhook", state.base_url),
        external_reference: referencia_externa(&usuario, plano),
    };

    state.gateway.criar_preferencia(&pedido).await
}
