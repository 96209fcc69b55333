use crate::config::Config;
use std::fs;
use std::path::Path;
use sqlx::{Pool, Sqlite, SqlitePool};

pub async fn initialize_db() -> Result<Pool<Sqlite>, sqlx::Error> {
    let database_url = &Config::get().database_url;

    // Criar diretório e arquivo do banco, se não existirem
    let db_path = Path::new(database_url);
    if let Some(dir) = db_path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir).expect("Falha ao criar diretório para o banco");
        }
    }
    if !db_path.exists() {
        fs::File::create(db_path).expect("Falha ao criar arquivo do banco de dados");
    }

    let pool = SqlitePool::connect(database_url).await?;

    // As tabelas espelham a planilha original: sem chaves primárias, sem
    // índices e sem restrições de unicidade. Quem garante unicidade é a
    // camada de aplicação.
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS usuarios (
            id TEXT NOT NULL,
            nome TEXT NOT NULL DEFAULT '',
            usuario TEXT NOT NULL DEFAULT '',
            email TEXT NOT NULL DEFAULT '',
            plano TEXT NOT NULL DEFAULT 'Free',
            expira TEXT NOT NULL DEFAULT '',
            whatsapp TEXT NOT NULL DEFAULT '',
            usuario_pai TEXT NOT NULL DEFAULT ''
        )",
    )
    .execute(&pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS pagamentos (
            id_usuario TEXT NOT NULL,
            id_pagamento TEXT NOT NULL,
            data_pagamento TEXT NOT NULL DEFAULT '',
            valor TEXT NOT NULL DEFAULT '',
            metodo TEXT NOT NULL DEFAULT '',
            status TEXT NOT NULL DEFAULT 'Pendente',
            referencia_externa TEXT NOT NULL DEFAULT ''
        )",
    )
    .execute(&pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS authmac (
            usuario TEXT NOT NULL,
            mac TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'Não Autorizado'
        )",
    )
    .execute(&pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS historico (
            horario TEXT NOT NULL DEFAULT '',
            usuario TEXT NOT NULL,
            ip TEXT NOT NULL DEFAULT '',
            mac TEXT NOT NULL DEFAULT ''
        )",
    )
    .execute(&pool)
    .await?;

    Ok(pool)
}
