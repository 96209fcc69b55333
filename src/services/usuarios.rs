use std::sync::Arc;

use log::info;

use crate::error::{AppError, AppResult};
use crate::models::usuario::{Usuario, PLANO_PADRAO};
use crate::repo::usuarios::UsuarioRepo;
use crate::utils::formato::mesmo_texto;

/// Campos aceitos na atualização parcial de perfil. `usuario_pai`, `plano`
/// e `expira` nunca são alterados por este caminho.
#[derive(Debug, Default)]
pub struct AtualizacaoPerfil {
    pub nome: Option<String>,
    pub usuario: Option<String>,
    pub email: Option<String>,
    pub whatsapp: Option<String>,
}

/// Linha pai de uma conta: `usuario` vazio e `usuario_pai` igual ao nome da
/// conta, sem distinção de caixa.
pub async fn buscar_pai(
    repo: &Arc<dyn UsuarioRepo>,
    usuario_pai: &str,
) -> AppResult<Option<Usuario>> {
    let usuarios = repo.listar().await?;
    Ok(usuarios.into_iter().find(|u| {
        u.eh_pai() && !u.usuario_pai.is_empty() && mesmo_texto(&u.usuario_pai, usuario_pai)
    }))
}

/// Todas as linhas da conta, pai incluído.
pub async fn listar_por_pai(
    repo: &Arc<dyn UsuarioRepo>,
    usuario_pai: &str,
) -> AppResult<Vec<Usuario>> {
    let usuarios = repo.listar().await?;
    Ok(usuarios
        .into_iter()
        .filter(|u| mesmo_texto(&u.usuario_pai, usuario_pai))
        .collect())
}

pub async fn buscar_por_id(
    repo: &Arc<dyn UsuarioRepo>,
    id: &str,
) -> AppResult<Option<Usuario>> {
    let usuarios = repo.listar().await?;
    Ok(usuarios.into_iter().find(|u| u.id == id))
}

pub async fn buscar_por_usuario(
    repo: &Arc<dyn UsuarioRepo>,
    usuario: &str,
) -> AppResult<Option<Usuario>> {
    let usuarios = repo.listar().await?;
    Ok(usuarios
        .into_iter()
        .find(|u| !u.usuario.is_empty() && mesmo_texto(&u.usuario, usuario)))
}

/// Próximo id: maior id numérico existente + 1. Correto apenas sem
/// escritores concorrentes; risco aceito.
fn proximo_id(usuarios: &[Usuario]) -> String {
    let maior = usuarios
        .iter()
        .filter_map(|u| u.id.parse::<i64>().ok())
        .max()
        .unwrap_or(0);
    (maior + 1).to_string()
}

pub async fn criar_pai(
    repo: &Arc<dyn UsuarioRepo>,
    nome: String,
    email: String,
    whatsapp: String,
    usuario_pai: String,
) -> AppResult<Usuario> {
    if buscar_pai(repo, &usuario_pai).await?.is_some() {
        return Err(AppError::Conflito(
            "Este nome de conta já está em uso".to_string(),
        ));
    }

    let usuarios = repo.listar().await?;
    let novo = Usuario {
        id: proximo_id(&usuarios),
        nome,
        usuario: String::new(),
        email,
        plano: PLANO_PADRAO.to_string(),
        expira: String::new(),
        whatsapp,
        usuario_pai,
    };
    repo.inserir(&novo).await?;
    info!("Conta {} criada (id {})", novo.usuario_pai, novo.id);
    Ok(novo)
}

/// Cria um personagem sob a conta `usuario_pai`. O nome de usuário é único
/// globalmente, não por conta; contato em branco herda o da linha pai.
pub async fn criar_filho(
    repo: &Arc<dyn UsuarioRepo>,
    usuario: String,
    nome: String,
    email: String,
    whatsapp: String,
    usuario_pai: String,
) -> AppResult<Usuario> {
    if buscar_por_usuario(repo, &usuario).await?.is_some() {
        return Err(AppError::Conflito(
            "Este nome de usuário já está em uso".to_string(),
        ));
    }

    let pai = buscar_pai(repo, &usuario_pai).await?;
    let (nome, email, whatsapp) = match &pai {
        Some(pai) => (
            if nome.is_empty() { pai.nome.clone() } else { nome },
            if email.is_empty() { pai.email.clone() } else { email },
            if whatsapp.is_empty() { pai.whatsapp.clone() } else { whatsapp },
        ),
        None => (nome, email, whatsapp),
    };

    let usuarios = repo.listar().await?;
    let novo = Usuario {
        id: proximo_id(&usuarios),
        nome,
        usuario,
        email,
        plano: PLANO_PADRAO.to_string(),
        expira: String::new(),
        whatsapp,
        usuario_pai,
    };
    repo.inserir(&novo).await?;
    info!("Usuário {} criado (id {})", novo.usuario, novo.id);
    Ok(novo)
}

pub async fn atualizar_perfil(
    repo: &Arc<dyn UsuarioRepo>,
    id: &str,
    dados: AtualizacaoPerfil,
) -> AppResult<Option<Usuario>> {
    let Some(mut usuario) = buscar_por_id(repo, id).await? else {
        return Ok(None);
    };

    if let Some(nome) = dados.nome {
        usuario.nome = nome;
    }
    if let Some(novo_usuario) = dados.usuario {
        usuario.usuario = novo_usuario;
    }
    if let Some(email) = dados.email {
        usuario.email = email;
    }
    if let Some(whatsapp) = dados.whatsapp {
        usuario.whatsapp = whatsapp;
    }

    if repo.salvar(&usuario).await? {
        Ok(Some(usuario))
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testes::{novo_filho, novo_pai, repo_usuarios};

    #[tokio::test]
    async fn buscar_pai_ignora_caixa_e_filhos() {
        let repo = repo_usuarios(vec![
            novo_pai("1", "Ana", "a@x.com", "contaAna"),
            novo_filho("2", "ana_char1", "contaAna"),
        ]);
        let pai = buscar_pai(&repo, "CONTAANA").await.unwrap().unwrap();
        assert_eq!(pai.id, "1");
        assert!(buscar_pai(&repo, "outra").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn criar_pai_rejeita_nome_de_conta_repetido() {
        let repo = repo_usuarios(vec![novo_pai("1", "Ana", "a@x.com", "contaAna")]);
        let erro = criar_pai(
            &repo,
            "Outra".to_string(),
            "o@x.com".to_string(),
            String::new(),
            "ContaANA".to_string(),
        )
        .await
        .unwrap_err();
        assert!(matches!(erro, AppError::Conflito(_)));
    }

    #[tokio::test]
    async fn criar_filho_rejeita_usuario_repetido_em_qualquer_conta() {
        let repo = repo_usuarios(vec![
            novo_pai("1", "Ana", "a@x.com", "contaAna"),
            novo_pai("2", "Beto", "b@x.com", "contaBeto"),
            novo_filho("3", "guerreiro", "contaAna"),
        ]);
        // Mesmo nome, caixa diferente, conta diferente: conflito mesmo assim.
        let erro = criar_filho(
            &repo,
            "GUERREIRO".to_string(),
            String::new(),
            String::new(),
            String::new(),
            "contaBeto".to_string(),
        )
        .await
        .unwrap_err();
        assert!(matches!(erro, AppError::Conflito(_)));
    }

    #[tokio::test]
    async fn criar_filho_herda_contato_do_pai() {
        let repo = repo_usuarios(vec![novo_pai("1", "Ana", "a@x.com", "contaAna")]);
        let filho = criar_filho(
            &repo,
            "ana_char1".to_string(),
            String::new(),
            String::new(),
            String::new(),
            "contaAna".to_string(),
        )
        .await
        .unwrap();
        assert_eq!(filho.email, "a@x.com");
        assert_eq!(filho.nome, "Ana");
        assert_eq!(filho.plano, "Free");
        assert_eq!(filho.id, "2");
    }

    #[tokio::test]
    async fn proximo_id_ignora_ids_nao_numericos() {
        let mut com_id_estranho = novo_pai("abc", "X", "x@x.com", "contaX");
        com_id_estranho.usuario_pai = "contaX".to_string();
        let repo = repo_usuarios(vec![
            com_id_estranho,
            novo_pai("7", "Ana", "a@x.com", "contaAna"),
        ]);
        let criado = criar_pai(
            &repo,
            "Novo".to_string(),
            "n@x.com".to_string(),
            String::new(),
            "contaNova".to_string(),
        )
        .await
        .unwrap();
        assert_eq!(criado.id, "8");
    }

    #[tokio::test]
    async fn atualizar_perfil_preserva_campos_omitidos_e_plano() {
        let mut pai = novo_pai("1", "Ana", "a@x.com", "contaAna");
        pai.plano = "Mensal".to_string();
        pai.expira = "01/01/2027".to_string();
        let repo = repo_usuarios(vec![pai]);

        let atualizado = atualizar_perfil(
            &repo,
            "1",
            AtualizacaoPerfil {
                nome: Some("Ana Maria".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(atualizado.nome, "Ana Maria");
        assert_eq!(atualizado.email, "a@x.com");
        assert_eq!(atualizado.plano, "Mensal");
        assert_eq!(atualizado.expira, "01/01/2027");
    }

    #[tokio::test]
    async fn atualizar_perfil_de_id_desconhecido_devolve_none() {
        let repo = repo_usuarios(vec![]);
        let resultado = atualizar_perfil(&repo, "99", AtualizacaoPerfil::default())
            .await
            .unwrap();
        assert!(resultado.is_none());
    }
}
