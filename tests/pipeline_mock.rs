//! End-to-end pipeline tests against a mock Chat Completions endpoint.

use ai_sfx::{ClientRegistry, Error, SfxPipeline};
use serde_json::json;

fn sample_spec_json() -> serde_json::Value {
    json!({
        "oldParams": true,
        "wave_type": 0,
        "p_env_attack": 0.0,
        "p_env_sustain": 0.3,
        "p_env_punch": 0.4,
        "p_env_decay": 0.4,
        "p_base_freq": 0.8,
        "p_freq_limit": 0.0,
        "p_freq_ramp": 0.0,
        "p_freq_dramp": 0.0,
        "p_vib_strength": 0.0,
        "p_vib_speed": 0.0,
        "p_arp_mod": 0.5,
        "p_arp_speed": 0.6,
        "p_duty": 0.5,
        "p_duty_ramp": 0.0,
        "p_repeat_speed": 0.0,
        "p_pha_offset": 0.0,
        "p_pha_ramp": 0.0,
        "p_lpf_freq": 1.0,
        "p_lpf_ramp": 0.0,
        "p_lpf_resonance": 0.0,
        "p_hpf_freq": 0.0,
        "p_hpf_ramp": 0.0,
        "sound_vol": 0.5,
        "sample_rate": 44100,
        "sample_size": 16
    })
}

/// Wrap spec JSON the way the API returns it: as the assistant message's
/// string content.
fn completion_body(content: &str) -> String {
    json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    })
    .to_string()
}

async fn pipeline_for(server: &mockito::ServerGuard) -> SfxPipeline {
    let registry = ClientRegistry::with_base_url("sk-test", server.url()).unwrap();
    SfxPipeline::new(registry)
}

#[tokio::test]
async fn test_coin_pickup_end_to_end() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(&sample_spec_json().to_string()))
        .create_async()
        .await;

    let pipeline = pipeline_for(&server).await;
    let generation = pipeline
        .generate("coin pickup")
        .await
        .expect("pipeline failed")
        .expect("generation dropped");

    assert_eq!(generation.file_name, "coin-pickup.wav");
    assert!(generation
        .artifact
        .data_uri()
        .starts_with("data:audio/wav;base64,"));
    assert!(!generation.artifact.wav_bytes().is_empty());
    assert!(!pipeline.is_busy());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_request_sends_schema_constrained_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(mockito::Matcher::PartialJson(json!({
            "model": "gpt-4.1",
            "messages": [
                {"role": "system"},
                {"role": "user", "content": "laser zap"}
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": "sound_spec",
                    "strict": true,
                    "schema": {"additionalProperties": false}
                }
            }
        })))
        .with_status(200)
        .with_body(completion_body(&sample_spec_json().to_string()))
        .create_async()
        .await;

    let pipeline = pipeline_for(&server).await;
    let generation = pipeline.generate("laser zap").await.unwrap().unwrap();
    assert_eq!(generation.file_name, "laser-zap.wav");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_concurrent_generate_is_dropped_not_queued() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(completion_body(&sample_spec_json().to_string()))
        .expect(1)
        .create_async()
        .await;

    let pipeline = pipeline_for(&server).await;

    // the first future acquires the in-flight slot before suspending at the
    // network call; the second observes it and drops out
    let (first, second) = tokio::join!(pipeline.generate("boom"), pipeline.generate("boom"));

    let outcomes = [first.unwrap(), second.unwrap()];
    assert_eq!(outcomes.iter().filter(|o| o.is_some()).count(), 1);
    assert_eq!(outcomes.iter().filter(|o| o.is_none()).count(), 1);
    assert!(!pipeline.is_busy());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_remote_failure_collapses_and_pipeline_reenters() {
    let mut server = mockito::Server::new_async().await;
    let rate_limited = server
        .mock("POST", "/chat/completions")
        .with_status(429)
        .with_body(r#"{"error": {"message": "rate limited"}}"#)
        .create_async()
        .await;

    let pipeline = pipeline_for(&server).await;

    let err = pipeline.generate("zombie moan").await.unwrap_err();
    assert!(err.is_request());
    assert!(matches!(err, Error::Remote { status: 429, .. }));
    assert!(!pipeline.is_busy(), "busy flag must clear on failure");
    rate_limited.assert_async().await;

    // same pipeline works again once the remote recovers
    let ok = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(completion_body(&sample_spec_json().to_string()))
        .create_async()
        .await;

    let generation = pipeline.generate("zombie moan").await.unwrap().unwrap();
    assert_eq!(generation.file_name, "zombie-moan.wav");
    ok.assert_async().await;
}

#[tokio::test]
async fn test_extra_field_rejected_before_synthesis() {
    let mut server = mockito::Server::new_async().await;
    let mut content = sample_spec_json();
    content["reverb"] = json!(0.8);

    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(completion_body(&content.to_string()))
        .create_async()
        .await;

    let pipeline = pipeline_for(&server).await;
    let err = pipeline.generate("big hall boom").await.unwrap_err();

    match err {
        Error::Validation { errors, .. } => {
            assert!(errors.iter().any(|e| e.to_string().contains("reverb")));
        }
        other => panic!("expected validation error, got {other}"),
    }
    assert!(!pipeline.is_busy());
}

#[tokio::test]
async fn test_missing_field_rejected() {
    let mut server = mockito::Server::new_async().await;
    let mut content = sample_spec_json();
    content.as_object_mut().unwrap().remove("p_base_freq");

    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(completion_body(&content.to_string()))
        .create_async()
        .await;

    let pipeline = pipeline_for(&server).await;
    let err = pipeline.generate("beep").await.unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
}

#[tokio::test]
async fn test_wrong_fixed_literal_rejected() {
    let mut server = mockito::Server::new_async().await;
    let mut content = sample_spec_json();
    content["sample_size"] = json!(8);

    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(completion_body(&content.to_string()))
        .create_async()
        .await;

    let pipeline = pipeline_for(&server).await;
    let err = pipeline.generate("beep").await.unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
}

#[tokio::test]
async fn test_markdown_fenced_output_accepted() {
    let mut server = mockito::Server::new_async().await;
    let fenced = format!("```json\n{}\n```", sample_spec_json());

    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(completion_body(&fenced))
        .create_async()
        .await;

    let pipeline = pipeline_for(&server).await;
    let generation = pipeline.generate("power-up chime").await.unwrap().unwrap();
    assert_eq!(generation.file_name, "power-up-chime.wav");
}

#[tokio::test]
async fn test_empty_prompt_issues_no_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .expect(0)
        .create_async()
        .await;

    let pipeline = pipeline_for(&server).await;
    assert!(pipeline.generate("   ").await.unwrap().is_none());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_credential_swap_does_not_disturb_pipeline() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(completion_body(&sample_spec_json().to_string()))
        .expect(2)
        .create_async()
        .await;

    let pipeline = pipeline_for(&server).await;
    pipeline.generate("ping").await.unwrap().unwrap();

    pipeline.registry().set_credential("sk-rotated").unwrap();
    let generation = pipeline.generate("ping").await.unwrap().unwrap();
    assert_eq!(generation.file_name, "ping.wav");
}
