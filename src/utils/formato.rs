use chrono::{DateTime, Local};

/// "R$ 29,90" — mesmo formato gravado na planilha pelo sistema original.
pub fn formatar_valor(valor: f64) -> String {
    format!("R$ {:.2}", valor).replace('.', ",")
}

pub fn data_hoje() -> String {
    Local::now().format("%d/%m/%Y").to_string()
}

/// Converte a data RFC 3339 do gateway para dd/mm/aaaa; cai para hoje
/// quando o campo vem vazio ou ilegível.
pub fn formatar_data_gateway(data: Option<&str>) -> String {
    data.and_then(|d| DateTime::parse_from_rfc3339(d).ok())
        .map(|d| d.with_timezone(&Local).format("%d/%m/%Y").to_string())
        .unwrap_or_else(data_hoje)
}

/// CPF e telefone são transmitidos só com dígitos.
pub fn so_digitos(texto: &str) -> String {
    texto.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Rótulo de exibição do `payment_type_id` do gateway.
pub fn mapear_metodo(payment_type_id: &str) -> String {
    match payment_type_id {
        "credit_card" => "Cartão de Crédito".to_string(),
        "debit_card" => "Cartão de Débito".to_string(),
        "bank_transfer" => "Transferência".to_string(),
        "ticket" => "Boleto".to_string(),
        "account_money" => "Mercado Pago".to_string(),
        "pix" => "PIX".to_string(),
        "" => "Mercado Pago".to_string(),
        outro => outro.to_string(),
    }
}

/// Comparação de identificadores como a planilha faz: sem distinção de
/// caixa, Unicode incluído.
pub fn mesmo_texto(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
