//! Gemini `generateContent` REST client with JSON structured output.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::AiError;
use crate::model::{GenerateRequest, Generator};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentBody {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
enum Part {
    Text(String),
    InlineData {
        #[serde(rename = "mimeType")]
        mime_type: String,
        data: String,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Deserialize, Default)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

fn request_body(request: GenerateRequest) -> GenerateContentBody {
    let mut parts = vec![Part::Text(request.prompt)];
    if let Some(image) = request.image {
        parts.push(Part::InlineData {
            mime_type: image.mime_type,
            data: STANDARD.encode(&image.data),
        });
    }
    GenerateContentBody {
        contents: vec![Content { parts }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            response_schema: request.schema,
        },
    }
}

/// Concatenated text of the first candidate's parts.
fn response_text(response: GenerateContentResponse) -> Result<String, AiError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.is_empty() {
        return Err(AiError::EmptyResponse);
    }
    Ok(text)
}

pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl Generator for GeminiClient {
    async fn generate(&self, request: GenerateRequest) -> Result<String, AiError> {
        let with_image = request.image.is_some();
        debug!(model = %self.model, with_image, "calling generateContent");

        let resp = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request_body(request))
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "generateContent rejected");
            return Err(AiError::Server {
                status: status.as_u16(),
                body,
            });
        }
        response_text(resp.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::InlineImage;
    use serde_json::json;

    #[test]
    fn body_carries_prompt_image_and_schema() {
        let request = GenerateRequest::text("describe".into(), json!({"type": "OBJECT"}))
            .with_image(InlineImage {
                mime_type: "image/png".into(),
                data: b"png".to_vec(),
            });
        let body = serde_json::to_value(request_body(request)).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{"parts": [
                    {"text": "describe"},
                    {"inlineData": {"mimeType": "image/png", "data": "cG5n"}}
                ]}],
                "generationConfig": {
                    "responseMimeType": "application/json",
                    "responseSchema": {"type": "OBJECT"}
                }
            })
        );
    }

    #[test]
    fn text_only_body_has_one_part() {
        let body = serde_json::to_value(request_body(GenerateRequest::text(
            "hi".into(),
            json!({}),
        )))
        .unwrap();
        assert_eq!(body["contents"][0]["parts"], json!([{"text": "hi"}]));
    }

    #[test]
    fn extracts_first_candidate_text() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                {"content": {"parts": [{"text": "{\"name\":"}, {"text": "\"x\"}"}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }))
        .unwrap();
        assert_eq!(response_text(response).unwrap(), r#"{"name":"x"}"#);
    }

    #[test]
    fn no_candidates_is_empty_response() {
        let blocked: GenerateContentResponse =
            serde_json::from_value(json!({"promptFeedback": {"blockReason": "SAFETY"}})).unwrap();
        assert!(matches!(response_text(blocked), Err(AiError::EmptyResponse)));
        assert!(matches!(
            response_text(GenerateContentResponse::default()),
            Err(AiError::EmptyResponse)
        ));
    }

    #[test]
    fn endpoint_includes_model() {
        let client = GeminiClient::new("k".into()).with_base_url("http://localhost:9/".into());
        assert_eq!(
            client.endpoint(),
            "http://localhost:9/v1beta/models/gemini-2.0-flash-exp:generateContent"
        );
    }
}
