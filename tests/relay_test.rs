//! Relay binding tests: phase-by-phase request construction, dual-envelope
//! response parsing, and the orchestrated submit/fetch flows.

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use vidmai::error::VideoError;
use vidmai::relay::{KlingRelay, RelayContext, TaskRelay};
use vidmai::types::TaskStatus;

fn relay_for(base_url: Option<String>) -> KlingRelay {
    KlingRelay::new(&RelayContext {
        base_url,
        api_key: "ak,sk".to_string(),
    })
    .unwrap()
}

fn submit_body(json: serde_json::Value) -> Vec<u8> {
    serde_json::to_vec(&json).unwrap()
}

#[test]
fn construction_rejects_malformed_composite_keys() {
    for key in ["just-one", "ak,sk,extra", "ak,", ",sk"] {
        let result = KlingRelay::new(&RelayContext {
            base_url: None,
            api_key: key.to_string(),
        });
        assert!(
            matches!(result, Err(VideoError::ConfigurationError(_))),
            "key {key:?} should be rejected"
        );
    }
}

#[test]
fn parse_submit_validates_action_and_prompt() {
    let relay = relay_for(None);

    let err = relay
        .parse_submit(&submit_body(serde_json::json!({"prompt": "x"})), "delete")
        .unwrap_err();
    assert_eq!(err.status_code, 400);
    assert_eq!(err.code, "invalid_request");
    assert!(err.local);

    let err = relay
        .parse_submit(&submit_body(serde_json::json!({})), "generate")
        .unwrap_err();
    assert!(err.message.contains("prompt"));

    let err = relay.parse_submit(b"not json", "generate").unwrap_err();
    assert_eq!(err.code, "invalid_request");

    // Action matching is case-insensitive.
    assert!(relay
        .parse_submit(&submit_body(serde_json::json!({"prompt": "x"})), "GENERATE")
        .is_ok());
}

#[test]
fn parse_submit_defaults_and_validates_the_model() {
    let relay = relay_for(None);

    let request = relay
        .parse_submit(&submit_body(serde_json::json!({"prompt": "x"})), "generate")
        .unwrap();
    assert_eq!(request.model.as_deref(), Some("kling-v1"));

    let request = relay
        .parse_submit(
            &submit_body(serde_json::json!({"prompt": "x", "model": "kling-v2-master"})),
            "generate",
        )
        .unwrap();
    assert_eq!(request.model.as_deref(), Some("kling-v2-master"));

    let err = relay
        .parse_submit(
            &submit_body(serde_json::json!({"prompt": "x", "model": "sora-2"})),
            "generate",
        )
        .unwrap_err();
    assert!(err.message.contains("sora-2"));
}

#[test]
fn request_url_uses_the_relay_surface() {
    let relay = relay_for(None);
    assert_eq!(
        relay.request_url(),
        "https://api.klingai.com/v1/videos/image2video"
    );

    let relay = relay_for(Some("https://proxy.example.com/".to_string()));
    assert_eq!(
        relay.request_url(),
        "https://proxy.example.com/v1/videos/image2video"
    );

    // An empty override falls back to the official endpoint.
    let relay = relay_for(Some(String::new()));
    assert!(relay.request_url().starts_with("https://api.klingai.com"));
}

#[test]
fn request_headers_carry_a_signed_bearer_token() {
    let relay = relay_for(None);
    let headers = relay.request_headers().unwrap();

    let auth = headers
        .iter()
        .find(|(name, _)| name == "Authorization")
        .map(|(_, value)| value.clone())
        .expect("authorization header");
    let token = auth.strip_prefix("Bearer ").expect("bearer scheme");

    #[derive(serde::Deserialize)]
    struct Claims {
        iss: String,
    }
    let decoded = jsonwebtoken::decode::<Claims>(
        token,
        &jsonwebtoken::DecodingKey::from_secret(b"sk"),
        &jsonwebtoken::Validation::new(jsonwebtoken::Algorithm::HS256),
    )
    .unwrap();
    assert_eq!(decoded.claims.iss, "ak");

    assert!(headers
        .iter()
        .any(|(name, value)| name == "Content-Type" && value == "application/json"));
    assert!(headers.iter().any(|(name, _)| name == "Accept"));
}

#[test]
fn request_body_builds_the_kling_wire_shape() {
    let relay = relay_for(None);

    let request = relay
        .parse_submit(
            &submit_body(serde_json::json!({
                "prompt": "a fox",
                "size": "1920x1080",
                "duration": 10
            })),
            "generate",
        )
        .unwrap();
    let body: serde_json::Value =
        serde_json::from_slice(&relay.request_body(&request).unwrap()).unwrap();

    assert_eq!(body["prompt"], "a fox");
    assert_eq!(body["mode"], "std");
    assert_eq!(body["duration"], "10");
    assert_eq!(body["aspect_ratio"], "16:9");
    assert_eq!(body["model"], "kling-v1");
    assert_eq!(body["cfg_scale"], 0.5);
}

#[test]
fn request_body_clamps_unsupported_durations() {
    let relay = relay_for(None);

    for (duration, expected) in [(10, "10"), (5, "5"), (30, "5"), (0, "5")] {
        let request = relay
            .parse_submit(
                &submit_body(serde_json::json!({"prompt": "x", "duration": duration})),
                "generate",
            )
            .unwrap();
        let body: serde_json::Value =
            serde_json::from_slice(&relay.request_body(&request).unwrap()).unwrap();
        assert_eq!(body["duration"], expected, "duration {duration}");
    }
}

#[test]
fn request_body_mode_precedence() {
    let relay = relay_for(None);

    // Explicit mode field wins.
    let request = relay
        .parse_submit(
            &submit_body(serde_json::json!({"prompt": "x", "mode": "pro"})),
            "generate",
        )
        .unwrap();
    let body: serde_json::Value =
        serde_json::from_slice(&relay.request_body(&request).unwrap()).unwrap();
    assert_eq!(body["mode"], "pro");

    // Metadata passthrough is the fallback.
    let request = relay
        .parse_submit(
            &submit_body(serde_json::json!({"prompt": "x", "metadata": {"mode": "pro"}})),
            "generate",
        )
        .unwrap();
    let body: serde_json::Value =
        serde_json::from_slice(&relay.request_body(&request).unwrap()).unwrap();
    assert_eq!(body["mode"], "pro");

    // Unknown sizes bucket as square.
    let request = relay
        .parse_submit(
            &submit_body(serde_json::json!({"prompt": "x", "size": "weird"})),
            "generate",
        )
        .unwrap();
    let body: serde_json::Value =
        serde_json::from_slice(&relay.request_body(&request).unwrap()).unwrap();
    assert_eq!(body["aspect_ratio"], "1:1");
}

#[test]
fn parse_submit_response_handles_both_envelopes() {
    let relay = relay_for(None);

    // Vendor-native envelope.
    let handle = relay
        .parse_submit_response(
            200,
            br#"{"code": 0, "message": "ok", "data": {"task_id": "t-1"}}"#,
        )
        .unwrap();
    assert_eq!(handle.task_id, "t-1");

    // Vendor-native rejection keeps the vendor code.
    let err = relay
        .parse_submit_response(200, br#"{"code": 1102, "message": "no balance"}"#)
        .unwrap_err();
    assert_eq!(err.code, "kling_error_1102");
    assert_eq!(err.message, "no balance");
    assert!(!err.local);

    // Generic envelope success.
    let handle = relay
        .parse_submit_response(
            200,
            br#"{"code": "success", "message": "", "data": "t-2"}"#,
        )
        .unwrap();
    assert_eq!(handle.task_id, "t-2");

    // Generic envelope failure is a non-local error with code preserved.
    let err = relay
        .parse_submit_response(
            502,
            br#"{"code": "upstream_error", "message": "bad gateway", "data": null}"#,
        )
        .unwrap_err();
    assert_eq!(err.status_code, 502);
    assert_eq!(err.code, "upstream_error");
    assert!(!err.local);

    // Neither envelope: local decode failure.
    let err = relay.parse_submit_response(200, b"<html>").unwrap_err();
    assert_eq!(err.code, "unmarshal_response_body_failed");
    assert!(err.local);
}

#[tokio::test]
async fn submit_runs_the_full_flow() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/videos/image2video"))
        .and(|req: &Request| {
            let Ok(v) = serde_json::from_slice::<serde_json::Value>(&req.body) else {
                return false;
            };
            v["prompt"] == "a fox" && v["model"] == "kling-v1"
        })
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "code": 0,
            "message": "ok",
            "data": { "task_id": "t-77" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let relay = relay_for(Some(server.uri()));
    let handle = relay
        .submit(
            &submit_body(serde_json::json!({"prompt": "a fox"})),
            "generate",
        )
        .await
        .unwrap();

    assert_eq!(handle.task_id, "t-77");
    assert!(!handle.raw_response.is_empty());
}

#[tokio::test]
async fn fetch_task_reuses_the_canonical_mapping() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/videos/image2video/t-77"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "code": 0,
            "message": "ok",
            "data": {
                "id": "t-77",
                "status": "succeed",
                "task_result": {
                    "videos": [{ "id": "v1", "url": "https://cdn/k.mp4", "duration": "10" }]
                }
            }
        })))
        .mount(&server)
        .await;

    let relay = relay_for(Some(server.uri()));
    let result = relay.fetch_task("t-77").await.unwrap();

    assert_eq!(result.status, TaskStatus::Succeeded);
    assert_eq!(result.url.as_deref(), Some("https://cdn/k.mp4"));
    assert_eq!(result.metadata.unwrap().duration, Some(10.0));
}

#[test]
fn relay_model_list_matches_the_provider() {
    let relay = relay_for(None);
    assert_eq!(relay.channel_name(), "kling");
    assert_eq!(
        relay.model_list(),
        vec!["kling-v1", "kling-v1-6", "kling-v2-master"]
    );
}
