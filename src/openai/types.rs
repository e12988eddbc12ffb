//! Tipos de dados para requisições e respostas da API OpenAI Chat Completions.
//!
//! Todas as structs derivam `Serialize` e `Deserialize` para conversão JSON
//! conforme o formato esperado pelo endpoint `v1/chat/completions` da OpenAI.

use serde::{Deserialize, Serialize};

/// Corpo da requisição para o endpoint `/v1/chat/completions` da OpenAI.
///
/// Contém o modelo desejado, o limite de tokens, a temperatura de amostragem
/// e a lista de mensagens que compõem a conversa.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Identificador do modelo a ser usado (ex.: "gpt-4o-mini").
    pub model: String,
    /// Lista de mensagens compondo a conversa (usuário e assistente).
    pub messages: Vec<ChatMessage>,
    /// Número máximo de tokens na resposta gerada pelo modelo.
    pub max_tokens: u32,
    /// Temperatura de amostragem (0.0 a 2.0).
    pub temperature: f32,
}

/// Uma única mensagem em uma conversa com a API OpenAI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Papel do remetente: "user", "assistant" ou "system".
    pub role: String,
    /// Conteúdo textual da mensagem.
    pub content: String,
}

/// Resposta retornada pelo endpoint `/v1/chat/completions` da OpenAI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Identificador único da resposta (gerado pela API).
    pub id: String,
    /// Modelo que gerou a resposta.
    pub model: String,
    /// Alternativas geradas — normalmente uma única.
    pub choices: Vec<Choice>,
    /// Estatísticas de uso de tokens (entrada e saída).
    pub usage: Usage,
}

impl ChatResponse {
    /// Texto da primeira alternativa, se houver.
    pub fn text(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

/// Uma alternativa de resposta dentro de [`ChatResponse`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    /// A mensagem gerada pelo modelo.
    pub message: ChatMessage,
    /// Motivo da parada da geração (ex.: "stop", "length").
    /// `None` se ainda em progresso.
    pub finish_reason: Option<String>,
}

/// Estatísticas de consumo de tokens para uma chamada à API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    /// Número de tokens consumidos na entrada (prompt).
    pub prompt_tokens: u32,
    /// Número de tokens gerados na saída (resposta).
    pub completion_tokens: u32,
    /// Soma de entrada e saída.
    pub total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_roundtrip() {
        let req = ChatRequest {
            model: "gpt-4o-mini".into(),
            messages: vec![ChatMessage {
                role: "user".into(),
                content: "Hello".into(),
            }],
            max_tokens: 500,
            temperature: 0.7,
        };
        let json = serde_json::to_string(&req).unwrap();
        let parsed: ChatRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.model, "gpt-4o-mini");
        assert_eq!(parsed.max_tokens, 500);
        assert_eq!(parsed.messages.len(), 1);
        assert_eq!(parsed.messages[0].role, "user");
        assert_eq!(parsed.messages[0].content, "Hello");
    }

    #[test]
    fn chat_response_deserialize_from_api_format() {
        let api_json = r#"{
            "id": "chatcmpl-123",
            "model": "gpt-4o-mini",
            "choices": [{
                "message": {"role": "assistant", "content": "Dear Hiring Manager"},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 80, "completion_tokens": 120, "total_tokens": 200}
        }"#;
        let resp: ChatResponse = serde_json::from_str(api_json).unwrap();
        assert_eq!(resp.id, "chatcmpl-123");
        assert_eq!(resp.text(), Some("Dear Hiring Manager"));
        assert_eq!(resp.choices[0].finish_reason.as_deref(), Some("stop"));
        assert_eq!(resp.usage.total_tokens, 200);
    }

    #[test]
    fn chat_response_without_choices_has_no_text() {
        let json = r#"{
            "id": "chatcmpl-456",
            "model": "gpt-4o-mini",
            "choices": [],
            "usage": {"prompt_tokens": 0, "completion_tokens": 0, "total_tokens": 0}
        }"#;
        let resp: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.text(), None);
    }

    #[test]
    fn null_finish_reason() {
        let json = r#"{
            "id": "chatcmpl-789",
            "model": "gpt-4o-mini",
            "choices": [{
                "message": {"role": "assistant", "content": "..."},
                "finish_reason": null
            }],
            "usage": {"prompt_tokens": 1, "completion_tokens": 1, "total_tokens": 2}
        }"#;
        let resp: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.choices[0].finish_reason, None);
    }
}
