//! `POST /webhook/ci` (§6): verifies the `WEBHOOK_SIGNING_SECRET` HMAC
//! before trusting the payload, resolves the repo by `clone_url`, then
//! delegates to `quality_gate::webhook::WebhookHandle`.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use quality_gate::{WebhookHandle, WebhookPayload};

use crate::core::app_state::AppState;
use crate::core::http::response_envelope::ApiResponse;
use crate::error_handler::{AppError, AppResult};

type HmacSha256 = Hmac<Sha256>;

fn verify_signature(secret: &str, body: &[u8], signature_header: Option<&str>) -> bool {
    if secret.is_empty() {
        return true;
    }
    let Some(header) = signature_header else { return false };
    let hex_sig = header.strip_prefix("sha256=").unwrap_or(header);
    let Ok(expected) = hex::decode(hex_sig) else { return false };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else { return false };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

pub async fn ci_webhook(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> AppResult<impl IntoResponse> {
    let signature = headers.get("X-Hub-Signature-256").and_then(|v| v.to_str().ok());
    if !verify_signature(&state.config.webhook_signing_secret, &body, signature) {
        return Err(AppError::Http {
            status: StatusCode::UNAUTHORIZED,
            code: "INVALID_SIGNATURE",
            message: "webhook signature verification failed".to_string(),
        });
    }

    let payload: WebhookPayload =
        serde_json::from_slice(&body).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let repos = state.storage.list_repositories()?;
    let Some(repo) = repos.iter().find(|r| r.origin_url.as_deref() == Some(payload.repository.clone_url.as_str())) else {
        return Err(AppError::NotFound(format!("no repository matches {}", payload.repository.clone_url)));
    };

    let handle = WebhookHandle::new(&state.gate);
    let result = handle.handle(repo.id, &payload)?;
    Ok(Json(ApiResponse::success(result)))
}
