//! Integration tests for the OpenAI-compatible refinement and analysis services

use art_llm::{
    AnalysisService, Creativity, OpenAiAnalysisService, OpenAiRefinementService,
    RefinementService, ServiceError,
};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn network_tests_disabled() -> bool {
    std::env::var_os("CODEX_SANDBOX_NETWORK_DISABLED").is_some()
}

fn completion(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1234567890,
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn test_refine_posts_prompt_and_returns_content() {
    if network_tests_disabled() {
        return;
    }

    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(body_partial_json(serde_json::json!({
            "model": "granite",
            "stream": false,
            "messages": [{ "role": "user", "content": "Make it bigger" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("A colossal reef")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = OpenAiRefinementService::new("sk-test")
        .with_base_url(mock_server.uri())
        .with_model("granite");

    let text = service
        .refine("Make it bigger", Creativity::Balanced)
        .await
        .unwrap();
    assert_eq!(text, "A colossal reef");
}

#[tokio::test]
async fn test_refine_surfaces_api_errors() {
    if network_tests_disabled() {
        return;
    }

    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .mount(&mock_server)
        .await;

    let service = OpenAiRefinementService::new("sk-wrong").with_base_url(mock_server.uri());
    match service.refine("anything", Creativity::Wild).await {
        Err(ServiceError::Api(msg)) => {
            assert!(msg.contains("401"));
            assert!(msg.contains("bad key"));
        }
        other => panic!("Expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_refine_rejects_blank_output() {
    if network_tests_disabled() {
        return;
    }

    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("  ")))
        .mount(&mock_server)
        .await;

    let service = OpenAiRefinementService::new("sk-test").with_base_url(mock_server.uri());
    let result = service.refine("anything", Creativity::Precise).await;
    assert!(matches!(result, Err(ServiceError::EmptyResponse(_))));
}

#[tokio::test]
async fn test_analyze_sends_image_part() {
    if network_tests_disabled() {
        return;
    }

    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(serde_json::json!({
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text" },
                    { "type": "image_url", "image_url": { "url": "https://images.test/a.png" } }
                ]
            }]
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion("Deep blues, centered spire")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = OpenAiAnalysisService::new("sk-test").with_base_url(mock_server.uri());
    let analysis = service.analyze("https://images.test/a.png").await.unwrap();
    assert_eq!(analysis, "Deep blues, centered spire");
}
