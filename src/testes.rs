//! Dublês em memória dos repositórios e do gateway, mais os ajudantes de
//! requisição usados nos testes de rota.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::gateway::mercadopago::GatewayPagamentos;
use crate::gateway::tipos::{
    NovaPreferencia, NovoPagamento, PagamentoGateway, PreferenciaGateway,
};
use crate::models::authmac::AuthMac;
use crate::models::historico::HistoricoLogin;
use crate::models::pagamento::Pagamento;
use crate::models::usuario::Usuario;
use crate::repo::authmac::AuthMacRepo;
use crate::repo::historico::HistoricoRepo;
use crate::repo::pagamentos::PagamentoRepo;
use crate::repo::usuarios::UsuarioRepo;
use crate::state::AppState;

// ---- Repositórios em memória ----

#[derive(Default)]
pub struct MemUsuarioRepo {
    pub linhas: Mutex<Vec<Usuario>>,
}

#[async_trait]
impl UsuarioRepo for MemUsuarioRepo {
    async fn listar(&self) -> AppResult<Vec<Usuario>> {
        Ok(self.linhas.lock().unwrap().clone())
    }

    async fn inserir(&self, usuario: &Usuario) -> AppResult<()> {
        self.linhas.lock().unwrap().push(usuario.clone());
        Ok(())
    }

    async fn salvar(&self, usuario: &Usuario) -> AppResult<bool> {
        let mut linhas = self.linhas.lock().unwrap();
        match linhas.iter_mut().find(|u| u.id == usuario.id) {
            Some(linha) => {
                *linha = usuario.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct MemPagamentoRepo {
    pub linhas: Mutex<Vec<Pagamento>>,
}

#[async_trait]
impl PagamentoRepo for MemPagamentoRepo {
    async fn listar_por_usuario(&self, id_usuario: &str) -> AppResult<Vec<Pagamento>> {
        Ok(self
            .linhas
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.id_usuario == id_usuario)
            .cloned()
            .collect())
    }

    async fn inserir(&self, pagamento: &Pagamento) -> AppResult<()> {
        self.linhas.lock().unwrap().push(pagamento.clone());
        Ok(())
    }

    async fn atualizar_status(
        &self,
        id_pagamento: &str,
        status: &str,
    ) -> AppResult<Option<String>> {
        let mut linhas = self.linhas.lock().unwrap();
        match linhas.iter_mut().find(|p| p.id_pagamento == id_pagamento) {
            Some(linha) => {
                let anterior = linha.status.clone();
                linha.status = status.to_string();
                Ok(Some(anterior))
            }
            None => Ok(None),
        }
    }
}

#[derive(Default)]
pub struct MemAuthMacRepo {
    pub linhas: Mutex<Vec<AuthMac>>,
}

#[async_trait]
impl AuthMacRepo for MemAuthMacRepo {
    async fn listar(&self) -> AppResult<Vec<AuthMac>> {
        Ok(self.linhas.lock().unwrap().clone())
    }

    async fn atualizar_status(&self, usuario: &str, mac: &str, status: &str) -> AppResult<bool> {
        let mut linhas = self.linhas.lock().unwrap();
        match linhas.iter_mut().find(|l| {
            l.usuario.to_lowercase() == usuario.to_lowercase()
                && l.mac.to_lowercase() == mac.to_lowercase()
        }) {
            Some(linha) => {
                linha.status = status.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct MemHistoricoRepo {
    pub linhas: Mutex<Vec<HistoricoLogin>>,
}

#[async_trait]
impl HistoricoRepo for MemHistoricoRepo {
    async fn listar_por_usuario(&self, usuario: &str) -> AppResult<Vec<HistoricoLogin>> {
        Ok(self
            .linhas
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.usuario.to_lowercase() == usuario.to_lowercase())
            .cloned()
            .collect())
    }
}

// ---- Gateway falso com contagem de chamadas ----

#[derive(Default)]
pub struct GatewayFalso {
    pagamentos: Mutex<HashMap<String, PagamentoGateway>>,
    resposta_criacao: Mutex<Option<PagamentoGateway>>,
    resposta_preferencia: Mutex<Option<PreferenciaGateway>>,
    pedidos: Mutex<Vec<NovoPagamento>>,
    busca: AtomicUsize,
}

impl GatewayFalso {
    pub fn insere_pagamento(&self, pagamento: PagamentoGateway) {
        self.pagamentos
            .lock()
            .unwrap()
            .insert(pagamento.id_str(), pagamento);
    }

    pub fn responde_criacao(&self, pagamento: PagamentoGateway) {
        *self.resposta_criacao.lock().unwrap() = Some(pagamento);
    }

    pub fn responde_preferencia(&self, preferencia: PreferenciaGateway) {
        *self.resposta_preferencia.lock().unwrap() = Some(preferencia);
    }

    pub fn ultimo_pedido(&self) -> Option<NovoPagamento> {
        self.pedidos.lock().unwrap().last().cloned()
    }

    pub fn chamadas_busca(&self) -> usize {
        self.busca.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GatewayPagamentos for GatewayFalso {
    async fn criar_pagamento(&self, pedido: &NovoPagamento) -> AppResult<PagamentoGateway> {
        self.pedidos.lock().unwrap().push(pedido.clone());
        self.resposta_criacao
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| AppError::Interno("GatewayFalso sem resposta de criação".to_string()))
    }

    async fn buscar_pagamento(&self, id: &str) -> AppResult<PagamentoGateway> {
        self.busca.fetch_add(1, Ordering::SeqCst);
        self.pagamentos
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NaoEncontrado("Pagamento não encontrado".to_string()))
    }

    async fn cancelar_pagamento(&self, id: &str) -> AppResult<PagamentoGateway> {
        let mut pagamentos = self.pagamentos.lock().unwrap();
        let pagamento = pagamentos
            .get_mut(id)
            .ok_or_else(|| AppError::NaoEncontrado("Pagamento não encontrado".to_string()))?;
        pagamento.status = "cancelled".to_string();
        Ok(pagamento.clone())
    }

    async fn buscar_pendentes(
        &self,
        _referencia_externa: &str,
    ) -> AppResult<Vec<PagamentoGateway>> {
        Ok(self
            .pagamentos
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.status == "pending")
            .cloned()
            .collect())
    }

    async fn criar_preferencia(&self, _pedido: &NovaPreferencia) -> AppResult<PreferenciaGateway> {
        self.resposta_preferencia
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| AppError::Interno("GatewayFalso sem resposta de preferência".to_string()))
    }
}

// ---- Montagem do estado de teste ----

pub struct Ambiente {
    pub state: AppState,
    pub usuarios: Arc<MemUsuarioRepo>,
    pub pagamentos: Arc<MemPagamentoRepo>,
    pub authmac: Arc<MemAuthMacRepo>,
    pub historico: Arc<MemHistoricoRepo>,
    pub gateway: Arc<GatewayFalso>,
}

impl Ambiente {
    pub fn insere_usuario(&self, usuario: Usuario) {
        self.usuarios.linhas.lock().unwrap().push(usuario);
    }

    pub fn usuario(&self, id: &str) -> Usuario {
        self.usuarios
            .linhas
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .expect("usuário não encontrado no dublê")
    }

    pub fn insere_pagamento(&self, pagamento: Pagamento) {
        self.pagamentos.linhas.lock().unwrap().push(pagamento);
    }

    pub fn registros_pagamento(&self) -> Vec<Pagamento> {
        self.pagamentos.linhas.lock().unwrap().clone()
    }

    pub fn insere_authmac(&self, linha: AuthMac) {
        self.authmac.linhas.lock().unwrap().push(linha);
    }

    pub fn dispositivos(&self) -> Vec<AuthMac> {
        self.authmac.linhas.lock().unwrap().clone()
    }

    pub fn insere_historico(&self, linha: HistoricoLogin) {
        self.historico.linhas.lock().unwrap().push(linha);
    }
}

pub fn estado_teste() -> Ambiente {
    let usuarios = Arc::new(MemUsuarioRepo::default());
    let pagamentos = Arc::new(MemPagamentoRepo::default());
    let authmac = Arc::new(MemAuthMacRepo::default());
    let historico = Arc::new(MemHistoricoRepo::default());
    let gateway = Arc::new(GatewayFalso::default());

    let state = AppState {
        usuarios: usuarios.clone(),
        pagamentos: pagamentos.clone(),
        authmac: authmac.clone(),
        historico: historico.clone(),
        gateway: gateway.clone(),
        segredo_webhook: "segredo-teste".to_string(),
        base_url: "http://localhost:3000".to_string(),
    };

    Ambiente {
        state,
        usuarios,
        pagamentos,
        authmac,
        historico,
        gateway,
    }
}

/// Repositório de usuários pré-carregado, para testes de serviço que não
/// precisam do estado completo.
pub fn repo_usuarios(linhas: Vec<Usuario>) -> Arc<dyn UsuarioRepo> {
    Arc::new(MemUsuarioRepo {
        linhas: Mutex::new(linhas),
    })
}

// ---- Linhas e pagamentos prontos ----

pub fn novo_pai(id: &str, nome: &str, email: &str, conta: &str) -> Usuario {
    Usuario {
        id: id.to_string(),
        nome: nome.to_string(),
        usuario: String::new(),
        email: email.to_string(),
        plano: "Free".to_string(),
        expira: String::new(),
        whatsapp: String::new(),
        usuario_pai: conta.to_string(),
    }
}

pub fn novo_filho(id: &str, usuario: &str, conta: &str) -> Usuario {
    Usuario {
        id: id.to_string(),
        nome: String::new(),
        usuario: usuario.to_string(),
        email: String::new(),
        plano: "Free".to_string(),
        expira: String::new(),
        whatsapp: String::new(),
        usuario_pai: conta.to_string(),
    }
}

pub fn pagamento_aprovado(
    id: i64,
    user_id: &str,
    plano_nome: &str,
    dias: i64,
) -> PagamentoGateway {
    PagamentoGateway {
        id: Some(id),
        status: "approved".to_string(),
        transaction_amount: Some(29.90),
        payment_type_id: "pix".to_string(),
        payment_method_id: "pix".to_string(),
        date_approved: Some("2026-08-01T12:00:00.000-03:00".to_string()),
        external_reference: Some(format!("{}_plano_{}", user_id, id)),
        metadata: json!({
            "user_id": user_id,
            "plano_nome": plano_nome,
            "plano_dias": dias,
        }),
        ..Default::default()
    }
}

// ---- Ajudantes de requisição ----

pub fn requisicao_json(metodo: &str, uri: &str, corpo: &str) -> Request<Body> {
    Request::builder()
        .method(metodo)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(corpo.to_string()))
        .unwrap()
}

pub async fn corpo_json(resposta: Response) -> Value {
    let bytes = resposta.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
