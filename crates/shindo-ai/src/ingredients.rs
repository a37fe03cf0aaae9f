//! Ingredient extraction from product label photos.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::info;

use crate::AiError;
use crate::language::Language;
use crate::model::{GenerateRequest, Generator, InlineImage};

pub const SUPPORTED_MIME_TYPES: [&str; 4] = ["image/png", "image/jpeg", "image/webp", "image/heic"];

/// Upload size limit in bytes (20 MiB).
pub const MAX_FILE_SIZE: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientsResponse {
    pub ingredients: Vec<String>,
    pub vegetarian: bool,
    pub contains_meat: bool,
    pub contains_fish: bool,
    pub is_vegan: bool,
    #[serde(default)]
    pub note: String,
}

/// An upload rejected before it reaches the model.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ImageError {
    #[error("No file provided")]
    Missing,

    #[error("Unsupported file type. Supported types: {}", SUPPORTED_MIME_TYPES.join(", "))]
    UnsupportedType(String),

    #[error("File size must be less than {}MB", MAX_FILE_SIZE / (1024 * 1024))]
    TooLarge(usize),
}

pub fn validate_image(mime_type: &str, data: &[u8]) -> Result<(), ImageError> {
    if !SUPPORTED_MIME_TYPES.contains(&mime_type) {
        return Err(ImageError::UnsupportedType(mime_type.to_string()));
    }
    if data.is_empty() {
        return Err(ImageError::Missing);
    }
    if data.len() > MAX_FILE_SIZE {
        return Err(ImageError::TooLarge(data.len()));
    }
    Ok(())
}

fn ingredients_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "ingredients": {"type": "ARRAY", "items": {"type": "STRING"}},
            "vegetarian": {"type": "BOOLEAN"},
            "containsMeat": {"type": "BOOLEAN"},
            "containsFish": {"type": "BOOLEAN"},
            "isVegan": {"type": "BOOLEAN"},
            "note": {"type": "STRING"}
        },
        "required": ["ingredients", "vegetarian", "containsMeat", "containsFish", "isVegan", "note"]
    })
}

fn ingredients_prompt(language: Language) -> String {
    let lang = language.name();
    format!(
        "Analyze this product image and extract all ingredients. For each ingredient:
1. Identify its common name in {lang}
2. Determine if any ingredients are non-vegetarian, contain meat/fish, or make the product non-vegan
3. Add a note about any uncertain identifications, ambiguous ingredient names, or potential cross-contamination warnings
4. Dairy is considered vegetarian

Important:
- Be thorough in ingredient identification
- Note any allergens clearly
- Mention if any text is unclear or partially visible
- Don't be overly cautious about origin of ingredients, like if amino acids are present, don't wonder if they're from animal sources or not unless mentioned explicitly
- If ingredients list is not visible or readable, state this clearly in the note
- output ingredients and note in {lang} language

Respond with valid JSON format matching the specified schema.
"
    )
}

/// Send a validated label image to the model and parse its ingredient list.
///
/// Model replies that do not fit [`IngredientsResponse`] come back as
/// [`AiError::Json`].
pub async fn extract_ingredients(
    model: &dyn Generator,
    image: Vec<u8>,
    mime_type: &str,
    language: Language,
) -> Result<IngredientsResponse, AiError> {
    info!(mime_type, bytes = image.len(), lang = language.code(), "extracting ingredients");
    let request = GenerateRequest::text(ingredients_prompt(language), ingredients_schema())
        .with_image(InlineImage {
            mime_type: mime_type.to_string(),
            data: image,
        });
    let text = model.generate(request).await?;
    Ok(serde_json::from_str(&text)?)
}
