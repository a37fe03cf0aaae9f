//! HTTP API: translated earthquake snapshots, barcode product lookup, and
//! ingredient extraction.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use shindo_ai::ingredients::MAX_FILE_SIZE;
use shindo_ai::{
    AiError, Generator, ImageError, JanCode, Language, ProductService, extract_ingredients,
    validate_image,
};
use shindo_core::{Dictionaries, QuakeLanguage, TranslatedSnapshot, translate};
use shindo_feed::Refresher;
use shindo_store::{KvStore, load_dictionaries};
use tracing::{error, warn};

/// Multipart framing allowance on top of the image itself.
const UPLOAD_OVERHEAD: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub refresher: Arc<Refresher>,
    /// Store holding the translation dictionaries.
    pub dictionaries: Arc<dyn KvStore>,
    pub products: Option<Arc<ProductService>>,
    pub model: Option<Arc<dyn Generator>>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/earthquakes", get(earthquakes))
        .route("/earthquakes/{lang}", get(earthquakes_in))
        .route("/barcode/{jan_code}/{lang}", get(barcode))
        .route(
            "/ingredients",
            post(ingredients).layer(DefaultBodyLimit::max(MAX_FILE_SIZE + UPLOAD_OVERHEAD)),
        )
        .with_state(state)
}

fn error_body(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

fn error_with_details(status: StatusCode, message: &str, details: String) -> Response {
    (status, Json(json!({ "error": message, "details": details }))).into_response()
}

async fn root() -> &'static str {
    "Hello World!"
}

// -- earthquakes --

#[derive(Serialize)]
struct EarthquakesResponse {
    data: TranslatedSnapshot,
    last_updated: String,
}

/// `?force`, `?force=1` and `?force=true` all bypass the cache.
fn wants_force(query: &HashMap<String, String>) -> bool {
    matches!(
        query.get("force").map(String::as_str),
        Some("" | "1" | "true")
    )
}

async fn earthquakes(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    serve_earthquakes(&state, None, wants_force(&query)).await
}

async fn earthquakes_in(
    State(state): State<AppState>,
    Path(lang): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    serve_earthquakes(&state, Some(&lang), wants_force(&query)).await
}

async fn serve_earthquakes(state: &AppState, lang: Option<&str>, force: bool) -> Response {
    let language = QuakeLanguage::resolve(lang);

    let snapshot = match state.refresher.load(force).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!(error = %e, lang = language.code(), "earthquake request failed");
            return error_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch earthquake data",
            );
        }
    };

    let dictionaries = match load_dictionaries(state.dictionaries.as_ref()).await {
        Ok(dictionaries) => dictionaries,
        Err(e) => {
            warn!(error = %e, "dictionary load failed, serving untranslated codes");
            Dictionaries::default()
        }
    };

    Json(EarthquakesResponse {
        data: translate(&snapshot, language.dictionary_key(), &dictionaries),
        last_updated: Utc::now().to_rfc3339(),
    })
    .into_response()
}

// -- products --

fn ai_unavailable() -> Response {
    error_body(
        StatusCode::SERVICE_UNAVAILABLE,
        "Product analysis is not configured",
    )
}

async fn barcode(
    State(state): State<AppState>,
    Path((jan_code, lang)): Path<(String, String)>,
) -> Response {
    let Some(jan) = JanCode::parse(&jan_code) else {
        return error_body(StatusCode::BAD_REQUEST, "Invalid JAN code");
    };
    let Some(language) = Language::from_code(&lang) else {
        return error_body(StatusCode::BAD_REQUEST, "Unsupported language");
    };
    let Some(products) = state.products.as_ref() else {
        return ai_unavailable();
    };

    match products.lookup(&jan, language).await {
        Ok(product) => Json(product).into_response(),
        Err(AiError::NotFound) => {
            error_body(StatusCode::NOT_FOUND, "No product information found")
        }
        Err(e) => {
            error!(jan = %jan, lang = language.code(), error = %e, "product lookup failed");
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "Failed to process request")
        }
    }
}

struct Upload {
    data: Vec<u8>,
    mime_type: String,
}

async fn read_upload(
    mut multipart: Multipart,
) -> Result<(Option<Upload>, Option<String>), axum::extract::multipart::MultipartError> {
    let mut upload = None;
    let mut lang = None;
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let mime_type = field.content_type().unwrap_or_default().to_string();
                let data = field.bytes().await?.to_vec();
                upload = Some(Upload { data, mime_type });
            }
            Some("lang") => lang = Some(field.text().await?),
            _ => {}
        }
    }
    Ok((upload, lang))
}

async fn ingredients(State(state): State<AppState>, multipart: Multipart) -> Response {
    let (upload, lang) = match read_upload(multipart).await {
        Ok(parts) => parts,
        Err(e) => {
            warn!(error = %e, "unreadable ingredients upload");
            return error_body(e.status(), e.body_text());
        }
    };

    let Some(language) = lang.as_deref().and_then(Language::from_code) else {
        return error_body(StatusCode::BAD_REQUEST, "Unsupported language");
    };
    let Some(upload) = upload else {
        return error_body(StatusCode::BAD_REQUEST, ImageError::Missing.to_string());
    };
    if let Err(e) = validate_image(&upload.mime_type, &upload.data) {
        return error_body(StatusCode::BAD_REQUEST, e.to_string());
    }
    let Some(model) = state.model.as_ref() else {
        return ai_unavailable();
    };

    match extract_ingredients(model.as_ref(), upload.data, &upload.mime_type, language).await {
        Ok(result) => Json(result).into_response(),
        Err(AiError::Json(e)) => {
            warn!(error = %e, "ingredients reply did not match schema");
            error_with_details(
                StatusCode::UNPROCESSABLE_ENTITY,
                "Failed to parse ingredients information",
                e.to_string(),
            )
        }
        Err(e) => {
            error!(error = %e, "ingredients analysis failed");
            error_with_details(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to analyze ingredients. Please ensure the image contains legible ingredient information.",
                e.to_string(),
            )
        }
    }
}
