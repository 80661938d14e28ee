use async_trait::async_trait;
use lexi_config::generator::GeneratorConfig;
use lexi_types::DictionaryEntry;
use serde::{Deserialize, Serialize};

use crate::prompt;
use crate::{EntryGenerator, GenerateError, ProviderMetadata, parse_entries};

const TEMPERATURE_CREATIVE: f32 = 0.7;
const TEMPERATURE_FACTUAL: f32 = 0.3;
const TEMPERATURE_CORRECTION: f32 = 0.1;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: serde_json::Value,
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate, empty if there is none
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| content.parts.iter().map(|p| p.text.as_str()).collect())
            .unwrap_or_default()
    }
}

/// Gemini `generateContent` client
#[derive(Clone)]
pub struct GeminiGenerator {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
    model: String,
}

impl GeminiGenerator {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_url, self.model)
    }

    fn build_request(&self, prompt: String, temperature: f32) -> GenerateRequest {
        GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: prompt::SYSTEM_INSTRUCTION.to_string(),
                }],
            },
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: prompt::response_schema(),
                temperature,
            },
        }
    }

    async fn generate(
        &self,
        prompt: String,
        temperature: f32,
    ) -> Result<Vec<DictionaryEntry>, GenerateError> {
        if self.api_key.is_empty() {
            return Err(GenerateError::MissingApiKey);
        }

        let request = self.build_request(prompt, temperature);
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::error!("Generation request failed: HTTP {status}");
            return Err(GenerateError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GenerateError::Malformed(format!("Failed to parse response: {e}")))?;

        let entries = parse_entries(&body.text())?;
        tracing::info!("Model returned {} usable entries", entries.len());
        Ok(entries)
    }

    async fn generate_one(
        &self,
        prompt: String,
        temperature: f32,
    ) -> Result<Option<DictionaryEntry>, GenerateError> {
        Ok(self.generate(prompt, temperature).await?.into_iter().next())
    }
}

#[async_trait]
impl EntryGenerator for GeminiGenerator {
    async fn generate_words(
        &self,
        topic: &str,
        count: u32,
    ) -> Result<Vec<DictionaryEntry>, GenerateError> {
        tracing::info!("Generating {count} words about '{topic}'");
        self.generate(prompt::generate_words(topic, count), TEMPERATURE_CREATIVE)
            .await
    }

    async fn define_word(&self, word: &str) -> Result<Option<DictionaryEntry>, GenerateError> {
        self.generate_one(prompt::define_word(word), TEMPERATURE_FACTUAL)
            .await
    }

    async fn check_and_correct(
        &self,
        entry: &DictionaryEntry,
    ) -> Result<Option<DictionaryEntry>, GenerateError> {
        let prompt = prompt::check_and_correct(entry)
            .map_err(|e| GenerateError::Malformed(e.to_string()))?;
        self.generate_one(prompt, TEMPERATURE_CORRECTION).await
    }

    async fn enrich_examples(
        &self,
        entry: &DictionaryEntry,
    ) -> Result<Option<DictionaryEntry>, GenerateError> {
        let prompt = prompt::enrich_examples(entry)
            .map_err(|e| GenerateError::Malformed(e.to_string()))?;
        self.generate_one(prompt, TEMPERATURE_CREATIVE).await
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "Gemini".to_string(),
            model: self.model.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator(api_key: &str) -> GeminiGenerator {
        GeminiGenerator::new(&GeneratorConfig {
            api_key: api_key.to_string(),
            ..GeneratorConfig::default()
        })
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_network() {
        let result = generator("").generate_words("food", 3).await;
        assert!(matches!(result, Err(GenerateError::MissingApiKey)));
    }

    #[test]
    fn test_request_shape() {
        let request = generator("key").build_request("define cap".to_string(), 0.3);
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "define cap");
        assert!(value["systemInstruction"]["role"].is_null());
        assert_eq!(value["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(value["generationConfig"]["responseSchema"]["type"], "ARRAY");
    }

    #[test]
    fn test_endpoint_uses_model() {
        assert_eq!(
            generator("key").endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_response_text_joins_parts() {
        let body: GenerateResponse = serde_json::from_str(
            r#"{ "candidates": [ { "content": { "parts": [ { "text": "[" }, { "text": "]" } ] } } ] }"#,
        )
        .unwrap();
        assert_eq!(body.text(), "[]");

        let empty: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.text(), "");
    }
}
