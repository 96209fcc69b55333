use std::sync::Arc;

use crate::gateway::mercadopago::GatewayPagamentos;
use crate::repo::authmac::AuthMacRepo;
use crate::repo::historico::HistoricoRepo;
use crate::repo::pagamentos::PagamentoRepo;
use crate::repo::usuarios::UsuarioRepo;

/// Estado compartilhado das rotas: um repositório por tabela, o cliente do
/// gateway e o que os handlers precisam da configuração. Tudo atrás de
/// traits para que os testes montem o mesmo estado com dublês em memória.
#[derive(Clone)]
pub struct AppState {
    pub usuarios: Arc<dyn UsuarioRepo>,
    pub pagamentos: Arc<dyn PagamentoRepo>,
    pub authmac: Arc<dyn AuthMacRepo>,
    pub historico: Arc<dyn HistoricoRepo>,
    pub gateway: Arc<dyn GatewayPagamentos>,
    pub segredo_webhook: String,
    pub base_url: String,
}
