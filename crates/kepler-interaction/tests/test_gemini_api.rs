use kepler_core::agent::{ConversationBackend, SessionConfig};
use kepler_core::config::GeminiSettings;
use kepler_core::secret::StaticCredential;
use kepler_interaction::GeminiApiAgent;
use serde_json::{Value, json};
use std::sync::Arc;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL_PATH: &str = "/models/gemini-2.5-flash";
const GENERATE_PATH: &str = "/models/gemini-2.5-flash:generateContent";

fn agent(server: &MockServer, credential: StaticCredential) -> GeminiApiAgent {
    let settings = GeminiSettings {
        base_url: server.uri(),
        request_timeout_secs: 5,
        ..GeminiSettings::default()
    };
    GeminiApiAgent::new(Arc::new(credential), &settings).expect("Should build agent")
}

fn reply(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    }))
}

async fn mount_model_ok(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(MODEL_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "models/gemini-2.5-flash"
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_open_session_validates_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(MODEL_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let agent = agent(&server, StaticCredential::new("test-key"));
    assert_eq!(agent.model(), "gemini-2.5-flash");
    agent
        .open_session(SessionConfig::new("persona"))
        .await
        .expect("Should open session");
}

#[tokio::test]
async fn test_missing_key_fails_without_request() {
    let server = MockServer::start().await;
    let agent = agent(&server, StaticCredential::missing());

    let err = agent
        .open_session(SessionConfig::new("persona"))
        .await
        .err()
        .expect("Should fail without a key");

    assert!(err.is_credentials_missing());
    let requests = server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn test_rejected_key_is_credentials_missing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": 400,
                "message": "API key not valid. Please pass a valid API key.",
                "status": "INVALID_ARGUMENT"
            }
        })))
        .mount(&server)
        .await;

    let agent = agent(&server, StaticCredential::new("bad-key"));
    let err = agent
        .open_session(SessionConfig::new("persona"))
        .await
        .err()
        .expect("Should reject the key");

    assert!(err.is_credentials_missing());
    assert!(!err.to_string().contains("bad-key"));
}

#[tokio::test]
async fn test_server_error_on_open_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let agent = agent(&server, StaticCredential::new("test-key"));
    let err = agent
        .open_session(SessionConfig::new("persona"))
        .await
        .err()
        .expect("Should fail to open");

    assert!(matches!(
        err,
        kepler_core::GatewayError::GatewayUnavailable(_)
    ));
}

#[tokio::test]
async fn test_session_replays_history() {
    let server = MockServer::start().await;
    mount_model_ok(&server).await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(reply("Look at the oxygen line."))
        .expect(2)
        .mount(&server)
        .await;

    let agent = agent(&server, StaticCredential::new("test-key"));
    let session = agent
        .open_session(SessionConfig::new("You are Mission Command."))
        .await
        .expect("Should open session");

    let first = session.send_message("What do you see?").await.unwrap();
    assert_eq!(first, "Look at the oxygen line.");
    session.send_message("And methane?").await.unwrap();

    let requests = server.received_requests().await.expect("Recording enabled");
    let posts: Vec<Value> = requests
        .iter()
        .filter(|r| r.method.as_str() == "POST")
        .map(|r| r.body_json().expect("JSON body"))
        .collect();
    assert_eq!(posts.len(), 2);

    let first_contents = posts[0]["contents"].as_array().unwrap();
    assert_eq!(first_contents.len(), 1);

    let second_contents = posts[1]["contents"].as_array().unwrap();
    assert_eq!(second_contents.len(), 3);
    assert_eq!(second_contents[0]["parts"][0]["text"], "What do you see?");
    assert_eq!(second_contents[1]["role"], "model");
    assert_eq!(second_contents[2]["parts"][0]["text"], "And methane?");

    assert_eq!(
        posts[1]["systemInstruction"]["parts"][0]["text"],
        "You are Mission Command."
    );
    assert_eq!(
        posts[1]["safetySettings"][0]["threshold"],
        "BLOCK_MEDIUM_AND_ABOVE"
    );
    assert_eq!(
        posts[1]["generationConfig"]["thinkingConfig"]["thinkingBudget"],
        0
    );
}

#[tokio::test]
async fn test_rate_limit_is_reported_and_turn_not_recorded() {
    let server = MockServer::start().await;
    mount_model_ok(&server).await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "30")
                .set_body_json(json!({
                    "error": {
                        "code": 429,
                        "message": "Resource has been exhausted (e.g. check quota).",
                        "status": "RESOURCE_EXHAUSTED"
                    }
                })),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(reply("Back online."))
        .mount(&server)
        .await;

    let agent = agent(&server, StaticCredential::new("test-key"));
    let session = agent
        .open_session(SessionConfig::new("persona"))
        .await
        .unwrap();

    let err = session.send_message("Hello?").await.unwrap_err();
    assert!(err.is_rate_limited());
    assert!(err.to_string().contains("retry after 30s"));

    session.send_message("Hello again?").await.unwrap();
    let requests = server.received_requests().await.unwrap();
    let last: Value = requests.last().unwrap().body_json().unwrap();
    // The failed turn never entered the history
    assert_eq!(last["contents"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_generate_is_stateless() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(reply("A spectrum splits light by wavelength."))
        .mount(&server)
        .await;

    let agent = agent(&server, StaticCredential::new("test-key"));
    let answer = agent.generate("What is a spectrum?").await.unwrap();
    assert_eq!(answer, "A spectrum splits light by wavelength.");

    let requests = server.received_requests().await.unwrap();
    let body: Value = requests[0].body_json().unwrap();
    assert!(body.get("systemInstruction").is_none());
    assert_eq!(body["contents"].as_array().unwrap().len(), 1);
}
