//! AI-backed product features: barcode lookup summarised by an LLM, and
//! ingredient extraction from label photos.

mod error;
pub use error::AiError;

pub mod gemini;
pub mod ingredients;
pub mod language;
pub mod model;
pub mod product;
pub mod shopping;

pub use gemini::GeminiClient;
pub use ingredients::{ImageError, IngredientsResponse, extract_ingredients, validate_image};
pub use language::Language;
pub use model::{GenerateRequest, Generator, InlineImage};
pub use product::{JanCode, Product, ProductService};
pub use shopping::{ProductSource, RakutenClient, YahooClient};
