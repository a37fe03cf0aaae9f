//! The generative model port.

use async_trait::async_trait;
use serde_json::Value;

use crate::AiError;

/// An image sent inline with a prompt.
#[derive(Debug, Clone)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// One structured-output generation: a prompt, an optional image, and the
/// JSON schema the reply must follow.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub prompt: String,
    pub image: Option<InlineImage>,
    pub schema: Value,
}

impl GenerateRequest {
    pub fn text(prompt: String, schema: Value) -> Self {
        Self {
            prompt,
            image: None,
            schema,
        }
    }

    pub fn with_image(mut self, image: InlineImage) -> Self {
        self.image = Some(image);
        self
    }
}

#[async_trait]
pub trait Generator: Send + Sync {
    /// Run the request and return the model's raw JSON text.
    async fn generate(&self, request: GenerateRequest) -> Result<String, AiError>;
}
