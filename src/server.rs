use std::sync::Arc;
use axum::{routing::post, Router, Json};
use tower_http::cors::{CorsLayer, Any};
use serde::{Deserialize, Serialize};
use axum::http::{Method, StatusCode};
use tracing::{info, warn};
use crate::currency::Currency;
use crate::interface::extract_parallel;
use crate::money::{Extractor, MoneyMatch};
use crate::token::Tagger;

#[derive(Deserialize)]
pub struct ExtractRequest {
    pub text: String,
}

#[derive(Deserialize)]
pub struct BatchRequest {
    pub texts: Vec<String>,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct MatchBody {
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub integer: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fraction: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coins: Option<u32>,
    pub currency: Currency,
    pub amount: String,
}

impl MatchBody {
    pub fn new(source: &str, m: &MoneyMatch) -> Self {
        Self {
            start: m.bytes.start,
            end: m.bytes.end,
            text: source.get(m.bytes.clone()).unwrap_or_default().to_string(),
            integer: m.money.integer(),
            fraction: m.money.fraction(),
            multiplier: m.money.multiplier(),
            coins: m.money.coins(),
            currency: m.money.currency(),
            amount: m.money.amount().to_string(),
        }
    }
}

#[derive(Serialize)]
pub struct ExtractResponse {
    pub status: String,
    pub elapsed_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matches: Option<Vec<MatchBody>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch: Option<Vec<Vec<MatchBody>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractResponse {
    fn error(elapsed_ms: f64, msg: String) -> Self {
        Self { status: "error".into(), elapsed_ms, matches: None, batch: None, error: Some(msg) }
    }
}

type Reply = (StatusCode, Json<ExtractResponse>);

pub fn router<T: Tagger + 'static>(extractor: Arc<Extractor<T>>, workers: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST])
        .allow_headers(Any);
    let single = Arc::clone(&extractor);
    Router::new()
        .route("/v1/extract", post(move |Json(req): Json<ExtractRequest>| {
        let extractor = Arc::clone(&single);
        async move {
            // Matching is synchronous, keep it off the async workers.
            let started = std::time::Instant::now();
            let text = req.text;
            let result = tokio::task::spawn_blocking(move || {
                let found = extractor.extract(&text);
                found.map(|matches| matches.iter().map(|m| MatchBody::new(&text, m)).collect::<Vec<_>>())
            }).await;
            let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
            let reply: Reply = match result {
                Ok(Ok(matches)) => {
                    info!(ms=elapsed_ms, matches=matches.len(), "extract complete");
                    (StatusCode::OK, Json(ExtractResponse { status: "ok".into(), elapsed_ms, matches: Some(matches), batch: None, error: None }))
                }
                // unreachable with the built-in tokenizer, which accepts any text
                Ok(Err(e)) => {
                    let msg = format!("{e}");
                    warn!(%msg, "extract error");
                    (StatusCode::BAD_REQUEST, Json(ExtractResponse::error(elapsed_ms, msg)))
                }
                Err(e) => {
                    warn!(error=%e, "Join error");
                    (StatusCode::INTERNAL_SERVER_ERROR, Json(ExtractResponse::error(elapsed_ms, "Join error".into())))
                }
            };
            reply
        }
    }))
        .route("/v1/extract/batch", post(move |Json(req): Json<BatchRequest>| {
        let extractor = Arc::clone(&extractor);
        async move {
            let started = std::time::Instant::now();
            let texts = req.texts;
            let result = tokio::task::spawn_blocking(move || {
                let found = extract_parallel(&*extractor, texts.as_slice(), workers);
                texts.iter().zip(found).map(|(text, matches)| {
                    matches.map(|matches| matches.iter().map(|m| MatchBody::new(text, m)).collect::<Vec<_>>())
                }).collect::<crate::error::Result<Vec<_>>>()
            }).await;
            let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
            let reply: Reply = match result {
                Ok(Ok(batch)) => {
                    info!(ms=elapsed_ms, texts=batch.len(), "batch complete");
                    (StatusCode::OK, Json(ExtractResponse { status: "ok".into(), elapsed_ms, matches: None, batch: Some(batch), error: None }))
                }
                Ok(Err(e)) => {
                    let msg = format!("{e}");
                    warn!(%msg, "batch error");
                    (StatusCode::BAD_REQUEST, Json(ExtractResponse::error(elapsed_ms, msg)))
                }
                Err(e) => {
                    warn!(error=%e, "Join error");
                    (StatusCode::INTERNAL_SERVER_ERROR, Json(ExtractResponse::error(elapsed_ms, "Join error".into())))
                }
            };
            reply
        }
    }))
    .layer(cors)
}
