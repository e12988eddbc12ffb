//! Cover letter generation with a deterministic fallback.
//!
//! Provides [`CoverLetterGenerator`], which asks the configured completion
//! client for a personalized letter and substitutes a fixed template when
//! the client is missing or fails. Generation never surfaces an error to
//! the caller: a broken generation stays scoped to its own instance.

use chrono::{DateTime, Utc};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::openai::{ChatMessage, ChatRequest, CompletionSender, OpenAiClient, OpenAiError};
use crate::workflow::CoverLetter;

/// Generates the cover-letter artifact for a freshly created workflow.
pub struct CoverLetterGenerator {
    /// Optional OpenAI client for real API calls. Without one, every
    /// letter is the fallback template.
    client: Option<OpenAiClient>,
    model: String,
}

impl CoverLetterGenerator {
    pub fn new(client: Option<OpenAiClient>, model: String) -> Self {
        Self { client, model }
    }

    /// Build from configuration: a real client when an API key is present,
    /// stub mode otherwise.
    pub fn from_config(config: &EngineConfig) -> Self {
        let client = if config.api_key.is_empty() {
            tracing::debug!("no API key configured, cover letters use the fallback template");
            None
        } else {
            Some(OpenAiClient::new(config.api_key.clone()))
        };
        Self::new(client, config.model.clone())
    }

    /// Produce a letter for the given application. Infallible by design:
    /// any failure downgrades to the fallback template.
    pub async fn generate(
        &self,
        company: &str,
        role: &str,
        description: &str,
        now: DateTime<Utc>,
    ) -> CoverLetter {
        let content = match &self.client {
            Some(client) => {
                match generate_with_llm(client, &self.model, company, role, description).await {
                    Ok(text) => text,
                    Err(err) => {
                        tracing::warn!(
                            company,
                            role,
                            error = %err,
                            "cover letter generation failed, using fallback"
                        );
                        fallback_letter(company, role)
                    }
                }
            }
            None => fallback_letter(company, role), // stub mode
        };

        CoverLetter {
            content,
            generated_at: now,
            company: company.to_string(),
            role: role.to_string(),
        }
    }
}

/// Ask the model for a letter. Errors bubble up so the caller can decide
/// on the fallback.
pub async fn generate_with_llm(
    client: &impl CompletionSender,
    model: &str,
    company: &str,
    role: &str,
    description: &str,
) -> Result<String, EngineError> {
    let req = ChatRequest {
        model: model.to_string(),
        messages: vec![ChatMessage {
            role: "user".into(),
            content: format!(
                "Write a professional, personalized cover letter for the position of {role} at {company}.\n\
                 \n\
                 Job Description: {description}\n\
                 \n\
                 Requirements:\n\
                 - Professional and engaging tone\n\
                 - Highlight relevant skills and experience\n\
                 - Show enthusiasm for the role and company\n\
                 - Keep it concise (3-4 paragraphs)\n\
                 - Address it to \"Hiring Manager\"\n\
                 - Include a strong closing statement"
            ),
        }],
        max_tokens: 500,
        temperature: 0.7,
    };

    let resp = client.send_completion(&req).await?;
    let text = resp.text().ok_or(OpenAiError::EmptyCompletion)?;
    Ok(text.to_string())
}

/// The fixed template used whenever generation fails.
pub fn fallback_letter(company: &str, role: &str) -> String {
    format!(
        "Dear Hiring Manager at {company},\n\nI am excited to apply for {role}. \
         I believe my skills match the requirements.\n\nBest regards,\n[Team]"
    )
}
