use actix_web::{web, HttpRequest, HttpResponse};
use bytes::Bytes;

use crate::config::Config;
use crate::webhook::pipeline::{process_batch, PipelineContext};
use crate::webhook::signature::{verify, VerifyOutcome};

/// Header carrying the base64 HMAC-SHA256 signature of the raw body
pub const SIGNATURE_HEADER: &str = "x-sfmc-ens-signature";

/// POST /ens/callback
/// ENS webhook entry point.
///
/// Always responds 200 - ENS suspends callbacks that answer with non-2xx
/// statuses, so verification failures are logged and discarded rather than
/// surfaced. Processing happens after the response, on a spawned task.
pub async fn ens_callback(
    config: web::Data<Config>,
    ctx: web::Data<PipelineContext>,
    req: HttpRequest,
    body: Bytes,
) -> HttpResponse {
    // 1. Parse leniently; the signature covers the raw bytes, not the JSON
    let parsed: Option<serde_json::Value> = serde_json::from_slice(&body).ok();

    // 2. Callback-registration handshake: echo the verification key, store nothing
    if let Some(key) = parsed.as_ref().and_then(verification_key) {
        log::info!("ENS callback verification handshake received");
        return HttpResponse::Ok()
            .content_type("text/plain")
            .body(format!("Verification key received: {}", key));
    }

    // 3. Verify the signature over the exact bytes received
    let provided = req
        .headers()
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    match verify(&body, provided, config.signature_key.as_deref()) {
        VerifyOutcome::Valid => {}
        VerifyOutcome::MissingConfig => {
            // Degraded mode: accept unverified rather than drop traffic
            log::warn!("No usable signature key configured, accepting callback unverified");
        }
        VerifyOutcome::MissingSignature => {
            log::error!("Callback rejected: no {} header", SIGNATURE_HEADER);
            return HttpResponse::Ok()
                .content_type("text/plain")
                .body("Received");
        }
        VerifyOutcome::Mismatch => {
            log::error!("Callback rejected: signature mismatch");
            return HttpResponse::Ok()
                .content_type("text/plain")
                .body("Received");
        }
    }

    // 4. Acknowledge now, process on a detached task
    if let Some(parsed) = parsed {
        let ctx = ctx.get_ref().clone();
        tokio::spawn(async move {
            process_batch(parsed, &ctx).await;
        });
    } else {
        log::error!("Callback body is not valid JSON, nothing to process");
    }

    HttpResponse::Ok()
        .content_type("text/plain")
        .body("Event received")
}

/// Extracts the handshake verification key from an object or a batch
fn verification_key(body: &serde_json::Value) -> Option<String> {
    let key_of = |v: &serde_json::Value| {
        v.get("verificationKey")
            .and_then(|k| k.as_str())
            .map(|s| s.to_string())
    };

    match body {
        serde_json::Value::Array(items) => items.iter().find_map(key_of),
        other => key_of(other),
    }
}

/// Configures the webhook route
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/ens/callback", web::post().to(ens_callback));
}
