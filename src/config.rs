//! Configuração do Applyflow carregada a partir de `applyflow.toml`.
//!
//! A struct [`EngineConfig`] contém todos os parâmetros configuráveis.
//! Valores não presentes no arquivo usam defaults sensíveis.
//! A variável de ambiente `OPENAI_API_KEY` tem precedência sobre o arquivo.

use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

/// Configuração de nível superior carregada de `applyflow.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Chave da API OpenAI para geração de cartas de apresentação.
    #[serde(default)]
    pub api_key: String,

    /// Modelo usado na geração de cartas.
    #[serde(default = "default_model")]
    pub model: String,

    /// Dias de carência após o prazo antes do arquivamento automático.
    #[serde(default = "default_grace_period_days")]
    pub grace_period_days: u32,

    /// Antecedência do lembrete em dias. Informativo apenas: o lembrete
    /// dispara exatamente no prazo.
    #[serde(default = "default_reminder_lead_days")]
    pub reminder_lead_days: u32,

    /// Intervalo em segundos entre varreduras de reconciliação.
    #[serde(default = "default_scan_interval_secs")]
    pub scan_interval_secs: u64,

    /// URL de webhook para entrega de lembretes. Sem ela, lembretes vão
    /// para o log.
    #[serde(default)]
    pub webhook_url: Option<String>,
}

// Valor padrão para o modelo de geração: "gpt-4o-mini".
fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

// Valor padrão para a carência: 2 dias.
fn default_grace_period_days() -> u32 {
    2
}

// Valor padrão para a antecedência do lembrete: 3 dias.
fn default_reminder_lead_days() -> u32 {
    3
}

// Valor padrão para o intervalo de varredura: 1 hora.
fn default_scan_interval_secs() -> u64 {
    3600
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            grace_period_days: default_grace_period_days(),
            reminder_lead_days: default_reminder_lead_days(),
            scan_interval_secs: default_scan_interval_secs(),
            webhook_url: None,
        }
    }
}

impl EngineConfig {
    /// Carrega a configuração de `applyflow.toml` no diretório atual.
    /// Usa valores padrão se o arquivo não existir.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("applyflow.toml"))
    }

    /// Carrega a configuração de um caminho específico.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<EngineConfig>(&contents)?
        } else {
            Self::default()
        };

        // Variável de ambiente tem precedência sobre o arquivo de configuração para a chave API.
        if let Ok(key) = std::env::var("OPENAI_API_KEY")
            && !key.is_empty()
        {
            config.api_key = key;
        }

        Ok(config)
    }

    /// Carência como duração do chrono.
    pub fn grace_period(&self) -> chrono::Duration {
        chrono::Duration::days(i64::from(self.grace_period_days))
    }

    /// Intervalo de varredura como duração da biblioteca padrão.
    pub fn scan_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.scan_interval_secs)
    }
}
