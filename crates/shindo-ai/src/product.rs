//! Barcode product lookup: shopping sources summarised by the model, cached
//! per JAN code and language.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use shindo_store::KvStore;
use shindo_store::kv::{get_json, put_json};
use tracing::{info, warn};

use crate::AiError;
use crate::language::Language;
use crate::model::{GenerateRequest, Generator};
use crate::shopping::ProductSource;

/// Product summaries are cached for a year.
pub const PRODUCT_CACHE_TTL: Duration = Duration::from_secs(31_536_000);

/// A 13-digit JAN (EAN-13) barcode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JanCode(String);

impl JanCode {
    pub fn parse(code: &str) -> Option<Self> {
        (code.len() == 13 && code.bytes().all(|b| b.is_ascii_digit()))
            .then(|| Self(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JanCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub description: String,
}

fn product_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": {
                "type": "STRING",
                "description": "Product name in specified language"
            },
            "description": {
                "type": "STRING",
                "description": "Comprehensive product description in specified language"
            }
        },
        "required": ["name", "description"]
    })
}

fn summary_prompt(sources: &[Product], language: Language) -> String {
    let multiple = sources.len() > 1;
    let intro = if multiple {
        "Analyze and combine these product descriptions"
    } else {
        "Analyze this product description"
    };

    let mut prompt = format!(
        "{intro} to create a concise summary. Focus on essential information:
- Product name and type (Do not include quantity or packaging details in name)
- Key features
- Main ingredients/materials
- Primary purpose and usage

Ensure the description is:
- Clear and concise
- Easy to understand
- Focused on practical information
- Well-structured

Remove any:
- Packaging details
- Dates and expiration info
- Shipping/delivery info
- Storage instructions
- Pricing
- Promotional text
- Shop-specific details
- Event/occasion suggestions

{}:
",
        if multiple { "Sources" } else { "Source" }
    );
    for (i, source) in sources.iter().enumerate() {
        if multiple {
            prompt.push_str(&format!("Source {}:\n", i + 1));
        }
        prompt.push_str(&format!(
            "- Name: {}\n- Description: {}\n\n",
            source.name, source.description
        ));
    }
    prompt.push_str(&format!(
        "Translate the content to {} language.\n",
        language.name()
    ));
    prompt
}

fn cache_key(jan: &JanCode, language: Language) -> String {
    format!("{jan}:{}", language.code())
}

pub struct ProductService {
    sources: Vec<Arc<dyn ProductSource>>,
    model: Arc<dyn Generator>,
    cache: Arc<dyn KvStore>,
}

impl ProductService {
    pub fn new(
        sources: Vec<Arc<dyn ProductSource>>,
        model: Arc<dyn Generator>,
        cache: Arc<dyn KvStore>,
    ) -> Self {
        Self {
            sources,
            model,
            cache,
        }
    }

    /// Summarise the product behind `jan` in `language`.
    ///
    /// Cache read and write failures are logged and otherwise ignored.
    /// Returns [`AiError::NotFound`] when no source knows the code.
    pub async fn lookup(&self, jan: &JanCode, language: Language) -> Result<Product, AiError> {
        let key = cache_key(jan, language);
        match get_json::<Product>(self.cache.as_ref(), &key).await {
            Ok(Some(product)) => return Ok(product),
            Ok(None) => {}
            Err(e) => warn!(key = %key, error = %e, "product cache read failed"),
        }

        let results = join_all(self.sources.iter().map(|s| s.fetch(jan))).await;
        let found: Vec<Product> = self
            .sources
            .iter()
            .zip(results)
            .filter_map(|(source, result)| match result {
                Ok(product) => Some(product),
                Err(e) => {
                    warn!(source = source.name(), jan = %jan, error = %e, "product source failed");
                    None
                }
            })
            .collect();
        if found.is_empty() {
            return Err(AiError::NotFound);
        }
        info!(jan = %jan, lang = language.code(), sources = found.len(), "summarising product");

        let request = GenerateRequest::text(summary_prompt(&found, language), product_schema());
        let product: Product = serde_json::from_str(&self.model.generate(request).await?)?;

        if let Err(e) = put_json(
            self.cache.as_ref(),
            &key,
            &product,
            Some(PRODUCT_CACHE_TTL),
        )
        .await
        {
            warn!(key = %key, error = %e, "product cache write failed");
        }
        Ok(product)
    }
}
