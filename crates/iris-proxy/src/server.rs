//! Actix Web HTTP surface.
//!
//! - `POST /v1/chat/completions` (the proxy's one real job)
//! - `GET`/`POST`/`DELETE /api/keys` (key pool management)
//! - `GET /api/status` (operator counters)
//! - `GET /health`

use crate::{
    config::ProxyConfig,
    relay,
    types::{flatten_messages, ChatCompletionRequest, ChatCompletionResponse},
    upstream,
};
use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer};
use anyhow::{Context, Result};
use futures::StreamExt;
use iris_keys::{KeyError, KeyRotator, KeyStore};
use serde::Deserialize;
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, error, info};

pub struct AppState {
    pub config: ProxyConfig,
    pub client: reqwest::Client,
    pub rotator: KeyRotator,
    pub total_requests: AtomicU64,
}

pub async fn serve(config: ProxyConfig) -> Result<()> {
    let addr = format!("0.0.0.0:{}", config.port);

    let store = KeyStore::load(&config.keys_file).with_context(|| {
        format!("failed to load key store from {}", config.keys_file.display())
    })?;
    info!(addr = %addr, keys = store.len(), "iris-proxy listening");

    // No request timeout: a hung upstream keeps the caller open, which is
    // the documented behavior of this proxy.
    let client = reqwest::Client::builder()
        .build()
        .context("failed to build reqwest client")?;

    let state = web::Data::new(AppState {
        config,
        client,
        rotator: KeyRotator::new(store),
        total_requests: AtomicU64::new(0),
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Cors::permissive())
            .configure(configure)
    })
    .bind(&addr)
    .with_context(|| format!("failed to bind {}", addr))?
    .run()
    .await
    .context("server error")?;

    Ok(())
}

/// Route table, shared between `serve` and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/v1/chat/completions", web::post().to(handle_chat_completions))
        .route("/api/keys", web::get().to(handle_list_keys))
        .route("/api/keys", web::post().to(handle_add_key))
        .route("/api/keys", web::delete().to(handle_remove_key))
        .route("/api/status", web::get().to(handle_status));
}

async fn health_check() -> &'static str {
    "OK"
}

async fn handle_chat_completions(
    state: web::Data<AppState>,
    body: web::Json<ChatCompletionRequest>,
) -> HttpResponse {
    state.total_requests.fetch_add(1, Ordering::Relaxed);
    let req = body.into_inner();

    // Pre-flight: a key must exist before anything goes upstream.
    let token = match state.rotator.next_key().await {
        Ok(t) => t,
        Err(KeyError::NoKeys) => {
            return HttpResponse::BadRequest()
                .json(json!({"error": "no upstream keys configured"}));
        }
        Err(e) => {
            error!(error = %e, "key rotation failed");
            return HttpResponse::InternalServerError().json(json!({"error": e.to_string()}));
        }
    };

    let flattened = flatten_messages(&req.messages);
    debug!(model = %req.model, stream = req.stream, bytes = flattened.len(), "encoding request");

    let frame = match iris_wire::encode_chat_request(&flattened, &req.model) {
        Ok(f) => f,
        Err(e) => {
            error!(error = %e, "request encoding failed");
            return HttpResponse::BadRequest().json(json!({"error": e.to_string()}));
        }
    };

    let upstream_response =
        match upstream::send_chat_request(&state.client, &state.config, &token, frame).await {
            Ok(r) => r,
            Err(e) => {
                error!(error = %e, "upstream request failed");
                return HttpResponse::BadGateway().json(json!({"error": e.to_string()}));
            }
        };

    if req.stream {
        let stream = relay::relay_sse(upstream_response.bytes_stream(), req.model)
            .map(|frame| Ok::<_, actix_web::Error>(web::Bytes::from(frame)));

        return HttpResponse::Ok()
            .content_type("text/event-stream")
            .insert_header(("cache-control", "no-cache"))
            .streaming(stream);
    }

    match relay::relay_aggregate(upstream_response.bytes_stream()).await {
        Ok(text) => {
            HttpResponse::Ok().json(ChatCompletionResponse::assistant_reply(req.model, text))
        }
        Err(e) => {
            error!(error = %e, "upstream stream failed");
            HttpResponse::BadGateway().json(json!({"error": e.to_string()}))
        }
    }
}

#[derive(Debug, Deserialize)]
struct KeyBody {
    key: String,
}

async fn handle_list_keys(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.rotator.list().await)
}

async fn handle_add_key(
    state: web::Data<AppState>,
    body: web::Json<KeyBody>,
) -> HttpResponse {
    match state.rotator.add(body.into_inner().key).await {
        Ok(_) => HttpResponse::Ok().json(json!({"success": true})),
        Err(e) => {
            error!(error = %e, "failed to persist key");
            HttpResponse::InternalServerError().json(json!({"error": e.to_string()}))
        }
    }
}

async fn handle_remove_key(
    state: web::Data<AppState>,
    body: web::Json<KeyBody>,
) -> HttpResponse {
    match state.rotator.remove(&body.into_inner().key).await {
        Ok(_) => HttpResponse::Ok().json(json!({"success": true})),
        Err(e) => {
            error!(error = %e, "failed to persist key removal");
            HttpResponse::InternalServerError().json(json!({"error": e.to_string()}))
        }
    }
}

async fn handle_status(state: web::Data<AppState>) -> HttpResponse {
    let current = state
        .rotator
        .current_key()
        .await
        .map(|k| mask_key(&k))
        .unwrap_or_else(|| "-".to_string());

    HttpResponse::Ok().json(json!({
        "status": "running",
        "currentKey": current,
        "totalRequests": state.total_requests.load(Ordering::Relaxed),
    }))
}

/// Show enough of a key to identify it without disclosing the secret.
fn mask_key(key: &str) -> String {
    if key.chars().count() <= 8 {
        return "****".to_string();
    }
    let head: String = key.chars().take(4).collect();
    let tail: String = key
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("{}...{}", head, tail)
}
