// tests/judge_http.rs
//
// HttpJudge against a wiremock scoring endpoint: request shape, response
// parsing and failure mapping (no retries).

use mapping_evaluator::judge::{HttpJudge, HttpJudgeOptions, Judge, JudgeError};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion(content: &str, logprob: f64) -> serde_json::Value {
    json!({
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "logprobs": {"content": [{"token": content, "logprob": logprob, "top_logprobs": []}]},
            "finish_reason": "stop"
        }]
    })
}

fn judge_for(server: &MockServer) -> HttpJudge {
    HttpJudge::new(
        format!("{}/v1/chat/completions", server.uri()),
        HttpJudgeOptions::default(),
    )
    .expect("client")
}

#[tokio::test]
async fn sends_boolean_schema_request_and_reads_logprob() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({
            "messages": [{"role": "user", "content": "Is brain correct?"}],
            "chat_template_kwargs": {"enable_thinking": false},
            "response_format": {"type": "json_object", "schema": {"type": "boolean"}},
            "logprobs": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("true", -0.05)))
        .expect(1)
        .mount(&server)
        .await;

    let judgment = judge_for(&server).judge("Is brain correct?").await.unwrap();
    assert_eq!(judgment.verdict, "true");
    assert_eq!(judgment.confidence, (-0.05f64).exp());
    assert!((judgment.confidence.ln() - -0.05).abs() < 1e-12);
}

#[tokio::test]
async fn model_is_sent_when_configured() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({"model": "qwen3-8b"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("false", -1.0)))
        .expect(1)
        .mount(&server)
        .await;

    let judge = HttpJudge::new(
        server.uri(),
        HttpJudgeOptions {
            model: Some("qwen3-8b".into()),
            ..Default::default()
        },
    )
    .unwrap();
    let judgment = judge.judge("p").await.unwrap();
    assert_eq!(judgment.verdict, "false");
}

#[tokio::test]
async fn non_2xx_is_status_error_without_retry() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("loading model"))
        .expect(1)
        .mount(&server)
        .await;

    match judge_for(&server).judge("p").await {
        Err(JudgeError::Status { status, body }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "loading model");
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn missing_logprobs_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "true"}}]
        })))
        .mount(&server)
        .await;

    assert!(matches!(
        judge_for(&server).judge("p").await,
        Err(JudgeError::MissingField(_))
    ));
}

#[tokio::test]
async fn unreachable_endpoint_is_transport_error() {
    // Port 1 is reserved (tcpmux) and closed on any sane test host.
    let uri = "http://127.0.0.1:1/v1/chat/completions";
    let judge = HttpJudge::new(uri, HttpJudgeOptions::default()).unwrap();
    assert!(matches!(
        judge.judge("p").await,
        Err(JudgeError::Transport(_))
    ));
}
