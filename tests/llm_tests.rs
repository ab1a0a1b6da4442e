/// Integration tests for the evaluation client.
///
/// Unit tests for individual submodules live in each file's `#[cfg(test)]`
/// block. These tests run the real [`GeminiClient`] against a local
/// `tiny_http` server standing in for the provider, so the full path
/// (request shape, credential header, envelope parsing, validation) is
/// exercised without network access.
use std::sync::mpsc::{self, Receiver};
use std::thread;

use founders_truth::config::ProviderConfig;
use founders_truth::evaluation::{StartupInput, Verdict};
use founders_truth::llm::Evaluator;
use founders_truth::llm::gemini::GeminiClient;
use tiny_http::{Header, Response, Server, StatusCode};

/// What the mock provider saw.
struct Captured {
    url: String,
    api_key: Option<String>,
    body: serde_json::Value,
}

/// Start a one-shot provider that answers with `status` and `body`.
fn mock_provider(status: u16, body: String) -> (String, Receiver<Captured>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let port = server.server_addr().to_ip().unwrap().port();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        if let Ok(mut request) = server.recv() {
            let mut raw = String::new();
            request.as_reader().read_to_string(&mut raw).unwrap();
            let api_key = request
                .headers()
                .iter()
                .find(|h| h.field.equiv("x-goog-api-key"))
                .map(|h| h.value.as_str().to_string());
            let _ = tx.send(Captured {
                url: request.url().to_string(),
                api_key,
                body: serde_json::from_str(&raw).unwrap_or(serde_json::Value::Null),
            });

            let header = Header::from_bytes("Content-Type", "application/json").unwrap();
            let _ = request.respond(
                Response::from_string(body)
                    .with_status_code(StatusCode(status))
                    .with_header(header),
            );
        }
    });

    (format!("http://127.0.0.1:{port}"), rx)
}

/// Wrap model text in a `generateContent` envelope.
fn envelope(text: &str) -> String {
    serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

fn client(base_url: &str, key: Option<&str>) -> GeminiClient {
    GeminiClient::from_config(&ProviderConfig {
        api_url: base_url.to_string(),
        api_key: key.map(str::to_string),
        model: "test-model".to_string(),
        timeout_ms: 5_000,
    })
}

fn input() -> StartupInput {
    StartupInput {
        idea: "X".to_string(),
        target_users: "Y".to_string(),
        alternatives: "Z".to_string(),
        reasoning: "W".to_string(),
        background: "V".to_string(),
    }
}

const EVALUATION: &str = r#"{
  "scores": [
    {"dimension": "Problem Severity", "score": 8},
    {"dimension": "Market Reality", "score": 6.5}
  ],
  "overallVerdict": "PROCEED",
  "brutalTruth": "Strong pull, weak moat.",
  "singleBiggestFlaw": "Easy to copy.",
  "smartPivots": ["Go vertical"],
  "validationPlan": [{"week": 1, "focus": "Demand", "actions": "Landing page"}]
}"#;

#[test]
fn successful_call_parses_evaluation() {
    let (url, seen) = mock_provider(200, envelope(EVALUATION));
    let result = client(&url, Some("secret-key")).evaluate(&input()).unwrap();

    assert_eq!(result.overall_verdict, Verdict::Proceed);
    assert_eq!(result.scores.len(), 2);
    assert_eq!(result.smart_pivots, vec!["Go vertical".to_string()]);
    assert_eq!(result.validation_plan[0].week, 1);

    let captured = seen.recv().unwrap();
    assert_eq!(captured.url, "/v1beta/models/test-model:generateContent");
    assert_eq!(captured.api_key.as_deref(), Some("secret-key"));

    let prompt = captured.body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("Startup Idea: X"));
    assert!(prompt.contains("Your Background: V"));
    let system = captured.body["systemInstruction"]["parts"][0]["text"].as_str().unwrap();
    assert!(system.contains("10. Execution Risk (0-10)"));
    assert_eq!(
        captured.body["generationConfig"]["responseMimeType"],
        "application/json"
    );
    assert_eq!(
        captured.body["generationConfig"]["responseSchema"]["required"][1],
        "overallVerdict"
    );
}

#[test]
fn fenced_model_output_is_accepted() {
    let (url, _seen) = mock_provider(200, envelope(&format!("```json\n{EVALUATION}\n```")));
    assert!(client(&url, Some("k")).evaluate(&input()).is_ok());
}

#[test]
fn non_json_model_output_fails() {
    let (url, _seen) = mock_provider(200, envelope("I think this idea is promising."));
    assert!(client(&url, Some("k")).evaluate(&input()).is_err());
}

#[test]
fn empty_candidate_list_fails() {
    let (url, _seen) = mock_provider(200, r#"{"candidates": []}"#.to_string());
    let err = client(&url, Some("k")).evaluate(&input()).unwrap_err();
    assert!(err.to_string().contains("no text"));
}

#[test]
fn safety_stop_is_named_in_error() {
    let body = r#"{"candidates": [{"content": {"role": "model", "parts": []}, "finishReason": "SAFETY"}]}"#;
    let (url, _seen) = mock_provider(200, body.to_string());
    let err = client(&url, Some("k")).evaluate(&input()).unwrap_err();
    assert!(err.to_string().contains("finish reason: SAFETY"));
}

#[test]
fn http_error_carries_provider_message() {
    let body = r#"{"error": {"code": 403, "message": "API key not valid.", "status": "PERMISSION_DENIED"}}"#;
    let (url, _seen) = mock_provider(403, body.to_string());
    let err = client(&url, Some("bad")).evaluate(&input()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("403"));
    assert!(msg.contains("API key not valid."));
}

#[test]
fn out_of_range_score_fails() {
    let (url, _seen) = mock_provider(200, envelope(&EVALUATION.replace("6.5", "42")));
    assert!(client(&url, Some("k")).evaluate(&input()).is_err());
}

#[test]
fn missing_key_makes_no_request() {
    let (url, seen) = mock_provider(200, envelope(EVALUATION));
    assert!(client(&url, None).evaluate(&input()).is_err());
    assert!(
        seen.recv_timeout(std::time::Duration::from_millis(200))
            .is_err()
    );
}

#[test]
fn transport_failure_fails() {
    // Bind then drop to get a port nothing listens on.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let result = client(&format!("http://127.0.0.1:{port}"), Some("k")).evaluate(&input());
    assert!(result.is_err());
}
