use lazy_static::lazy_static;
use serde::Serialize;

/// Plano de assinatura do catálogo estático. Carregado uma única vez na
/// subida do processo; nunca muda em tempo de execução.
#[derive(Debug, Clone, Serialize)]
pub struct Plano {
    pub id: &'static str,
    pub nome: &'static str,
    pub descricao: &'static str,
    pub preco: f64,
    pub dias: i64,
}

lazy_static! {
    pub static ref PLANOS: Vec<Plano> = vec![
        Plano {
            id: "semanal",
            nome: "Semanal",
            descricao: "Acesso completo por 7 dias",
            preco: 7.90,
            dias: 7,
        },
        Plano {
            id: "mensal",
            nome: "Mensal",
            descricao: "Acesso completo por 30 dias",
            preco: 29.90,
            dias: 30,
        },
        Plano {
            id: "trimestral",
            nome: "Trimestral",
            descricao: "Acesso completo por 90 dias",
            preco: 74.90,
            dias: 90,
        },
        Plano {
            id: "semestral",
            nome: "Semestral",
            descricao: "Acesso completo por 180 dias",
            preco: 134.90,
            dias: 180,
        },
        Plano {
            id: "anual",
            nome: "Anual",
            descricao: "Acesso completo por 365 dias",
            preco: 239.90,
            dias: 365,
        },
    ];
}

pub fn buscar_plano(id: &str) -> Option<&'static Plano> {
    PLANOS.iter().find(|p| p.id == id)
}
