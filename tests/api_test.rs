//! HTTP surface tests for the gateway.
//!
//! The router is driven in-process with stub collaborators, so no model server is needed.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::util::ServiceExt;

use trelix_nlp_gateway::config::{Config, ModelBackend};
use trelix_nlp_gateway::inference_service::InferenceError;
use trelix_nlp_gateway::ner::{Entity, EntityRecognizer, MockEntityRecognizer};
use trelix_nlp_gateway::routes::build_router;
use trelix_nlp_gateway::translate::{MockTranslator, TranslateRequest, TranslateResponse, Translator};
use trelix_nlp_gateway::{AppState, ModelHandles};

// ============================================================================
// Stub collaborators
// ============================================================================

/// Translator that counts calls and either echoes or fails.
struct StubTranslator {
    calls: AtomicUsize,
    failure: Option<String>,
    healthy: bool,
}

impl StubTranslator {
    fn ok() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            failure: None,
            healthy: true,
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            failure: Some(message.to_string()),
            healthy: false,
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Translator for StubTranslator {
    async fn translate(&self, request: TranslateRequest) -> Result<TranslateResponse, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(message) => Err(InferenceError::Service {
                status: 500,
                message: message.clone(),
            }),
            None => Ok(TranslateResponse {
                translated_text: format!("{}:{}", request.target_lang, request.text),
            }),
        }
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn name(&self) -> &str {
        "stub-translator"
    }
}

/// Recognizer that returns a fixed entity list or fails.
struct StubRecognizer {
    calls: AtomicUsize,
    entities: Vec<Entity>,
    failure: Option<String>,
}

impl StubRecognizer {
    fn with_entities(entities: Vec<Entity>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            entities,
            failure: None,
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            entities: Vec::new(),
            failure: Some(message.to_string()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EntityRecognizer for StubRecognizer {
    async fn recognize(&self, _text: &str) -> Result<Vec<Entity>, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(message) => Err(InferenceError::Service {
                status: 500,
                message: message.clone(),
            }),
            None => Ok(self.entities.clone()),
        }
    }

    fn name(&self) -> &str {
        "stub-ner"
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn app(translator: Arc<dyn Translator>, recognizer: Arc<dyn EntityRecognizer>) -> Router {
    let state = AppState::new(Config::default(), ModelHandles::new(translator, recognizer));
    build_router(state).expect("router builds with default config")
}

fn mock_app() -> Router {
    let mut config = Config::default();
    config.model_config.backend = ModelBackend::Mock;
    let models = ModelHandles::new(
        Arc::new(MockTranslator::new()),
        Arc::new(MockEntityRecognizer::new()),
    );
    build_router(AppState::new(config, models)).expect("router builds")
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    let request = builder
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

// ============================================================================
// Index
// ============================================================================

#[tokio::test]
async fn index_returns_fixed_message_even_when_models_fail() {
    let app = app(
        StubTranslator::failing("model offline"),
        StubRecognizer::failing("model offline"),
    );

    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Combined Translation + NLP API is running"}));
}

// ============================================================================
// Translate
// ============================================================================

#[tokio::test]
async fn translate_without_any_required_field_is_rejected() {
    let translator = StubTranslator::ok();
    let app = app(translator.clone(), StubRecognizer::with_entities(vec![]));

    let bodies = [
        json!({"source_lang": "en", "target_lang": "fr"}),
        json!({"text": "Hello", "target_lang": "fr"}),
        json!({"text": "Hello", "source_lang": "en"}),
        json!({"text": "", "source_lang": "en", "target_lang": "fr"}),
        json!({"text": "Hello", "source_lang": null, "target_lang": "fr"}),
    ];

    for body in bodies {
        let (status, response) =
            send(&app, Method::POST, "/translate", Some(&body.to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
        assert_eq!(
            response["error"],
            "Fields 'text', 'source_lang', and 'target_lang' are required"
        );
    }

    assert_eq!(translator.calls(), 0, "validation must fail before inference");
}

#[tokio::test]
async fn translate_without_payload_is_rejected() {
    let translator = StubTranslator::ok();
    let app = app(translator.clone(), StubRecognizer::with_entities(vec![]));

    for body in [None, Some(""), Some("not json"), Some("{}"), Some("[1, 2]")] {
        let (status, response) = send(&app, Method::POST, "/translate", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {:?}", body);
        assert_eq!(response["error"], "Missing JSON payload");
    }

    assert_eq!(translator.calls(), 0);
}

#[tokio::test]
async fn translate_non_string_fields_are_rejected() {
    let translator = StubTranslator::ok();
    let app = app(translator.clone(), StubRecognizer::with_entities(vec![]));

    for body in [
        json!({"text": 5, "source_lang": "en", "target_lang": "fr"}),
        json!({"text": "Hello", "source_lang": ["en"], "target_lang": "fr"}),
        json!({"text": "Hello", "source_lang": "en", "target_lang": true}),
    ] {
        let (status, response) =
            send(&app, Method::POST, "/translate", Some(&body.to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
        assert_eq!(
            response["error"],
            "Fields 'text', 'source_lang', and 'target_lang' are required"
        );
    }

    assert_eq!(translator.calls(), 0);
}

#[tokio::test]
async fn translate_accepts_large_text() {
    let app = mock_app();
    let text = "word ".repeat(600_000);
    let body = json!({"text": text, "source_lang": "en", "target_lang": "fr"}).to_string();
    assert!(body.len() > 2 * 1024 * 1024);

    let (status, response) = send(&app, Method::POST, "/translate", Some(&body)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(response["translated_text"].as_str().unwrap().starts_with("[fr] word"));
}

#[tokio::test]
async fn translate_returns_top_translation() {
    let app = mock_app();
    let body = json!({"text": "Hello", "source_lang": "en", "target_lang": "fr"}).to_string();

    let (status, response) = send(&app, Method::POST, "/translate", Some(&body)).await;
    assert_eq!(status, StatusCode::OK);

    let translated = response["translated_text"].as_str().unwrap();
    assert!(!translated.is_empty());
    assert_eq!(translated, "[fr] Hello");
}

#[tokio::test]
async fn translate_collaborator_failure_is_internal_error() {
    let translator = StubTranslator::failing("CUDA out of memory");
    let app = app(translator.clone(), StubRecognizer::with_entities(vec![]));
    let body = json!({"text": "Hello", "source_lang": "en", "target_lang": "fr"}).to_string();

    let (status, response) = send(&app, Method::POST, "/translate", Some(&body)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response, json!({"error": "CUDA out of memory"}));
    assert_eq!(translator.calls(), 1, "no retry on failure");
}

#[tokio::test]
async fn translate_unknown_language_is_internal_error() {
    let app = mock_app();
    let body = json!({"text": "Hello", "source_lang": "en", "target_lang": "xx"}).to_string();

    let (status, response) = send(&app, Method::POST, "/translate", Some(&body)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response["error"], "Unsupported language code: xx");
}

#[tokio::test]
async fn translate_ignores_content_type() {
    let app = mock_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/translate")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(
            json!({"text": "Hi", "source_lang": "en", "target_lang": "de"}).to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// ============================================================================
// Analyze
// ============================================================================

#[tokio::test]
async fn analyze_without_cv_text_is_rejected() {
    let recognizer = StubRecognizer::with_entities(vec![Entity::new("Acme", "ORG")]);
    let app = app(StubTranslator::ok(), recognizer.clone());

    for body in [
        json!({}),
        json!({"cvText": ""}),
        json!({"cvText": null}),
        json!({"text": "Worked at Acme"}),
    ] {
        let (status, response) = send(&app, Method::POST, "/analyze", Some(&body.to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
        assert_eq!(response["error"], "Missing 'cvText' in request body");
    }

    assert_eq!(recognizer.calls(), 0);
}

#[tokio::test]
async fn analyze_non_string_cv_text_is_rejected() {
    let recognizer = StubRecognizer::with_entities(vec![]);
    let app = app(StubTranslator::ok(), recognizer.clone());

    let body = json!({"cvText": 42}).to_string();
    let (status, response) = send(&app, Method::POST, "/analyze", Some(&body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "Missing 'cvText' in request body");
    assert_eq!(recognizer.calls(), 0);
}

#[tokio::test]
async fn analyze_accepts_cv_text_over_two_mebibytes() {
    let app = mock_app();
    let cv_text = "word ".repeat(600_000);
    let body = json!({"cvText": cv_text}).to_string();
    assert!(body.len() > 2 * 1024 * 1024);

    let (status, response) = send(&app, Method::POST, "/analyze", Some(&body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!({"entities": []}));
}

#[tokio::test]
async fn analyze_without_payload_is_rejected() {
    let app = app(StubTranslator::ok(), StubRecognizer::with_entities(vec![]));

    let (status, response) = send(&app, Method::POST, "/analyze", Some("{broken")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "Missing JSON payload");
}

#[tokio::test]
async fn analyze_without_entities_returns_empty_list() {
    let app = mock_app();
    let body = json!({"cvText": "i enjoy long walks and quiet evenings"}).to_string();

    let (status, response) = send(&app, Method::POST, "/analyze", Some(&body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!({"entities": []}));
}

#[tokio::test]
async fn analyze_keeps_detection_order_and_duplicates() {
    let entities = vec![
        Entity::new("Jane Doe", "PERSON"),
        Entity::new("Acme", "ORG"),
        Entity::new("Acme", "ORG"),
        Entity::new("2019", "DATE"),
    ];
    let app = app(StubTranslator::ok(), StubRecognizer::with_entities(entities));
    let body = json!({"cvText": "Jane Doe joined Acme in 2019. Acme grew."}).to_string();

    let (status, response) = send(&app, Method::POST, "/analyze", Some(&body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        response,
        json!({"entities": [
            {"text": "Jane Doe", "label": "PERSON"},
            {"text": "Acme", "label": "ORG"},
            {"text": "Acme", "label": "ORG"},
            {"text": "2019", "label": "DATE"},
        ]})
    );
}

#[tokio::test]
async fn analyze_collaborator_failure_is_internal_error() {
    let app = app(StubTranslator::ok(), StubRecognizer::failing("pipeline crashed"));
    let body = json!({"cvText": "Worked at Acme"}).to_string();

    let (status, response) = send(&app, Method::POST, "/analyze", Some(&body)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response, json!({"error": "pipeline crashed"}));
}

// ============================================================================
// Statelessness
// ============================================================================

#[tokio::test]
async fn identical_requests_get_identical_responses() {
    let app = mock_app();
    let translate = json!({"text": "Good morning", "source_lang": "en", "target_lang": "es"}).to_string();
    let analyze = json!({"cvText": "I studied at Oxford and worked at Acme Corp."}).to_string();

    let first_translate = send(&app, Method::POST, "/translate", Some(&translate)).await;
    let second_translate = send(&app, Method::POST, "/translate", Some(&translate)).await;
    assert_eq!(first_translate.0, StatusCode::OK);
    assert_eq!(first_translate, second_translate);

    let first_analyze = send(&app, Method::POST, "/analyze", Some(&analyze)).await;
    let second_analyze = send(&app, Method::POST, "/analyze", Some(&analyze)).await;
    assert_eq!(first_analyze.0, StatusCode::OK);
    assert_eq!(first_analyze, second_analyze);
    assert_eq!(
        first_analyze.1["entities"],
        json!([
            {"text": "Oxford", "label": "MISC"},
            {"text": "Acme Corp", "label": "MISC"},
        ])
    );
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn health_reports_each_collaborator() {
    let (status, body) = send(&mock_app(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"status": "ok", "backend": "mock", "translator": true, "recognizer": true})
    );

    let degraded = app(
        StubTranslator::failing("down"),
        StubRecognizer::with_entities(vec![]),
    );
    let (status, body) = send(&degraded, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["translator"], false);
    assert_eq!(body["recognizer"], true);
}

// ============================================================================
// CORS
// ============================================================================

fn preflight(origin: &str) -> Request<Body> {
    Request::builder()
        .method(Method::OPTIONS)
        .uri("/translate")
        .header(header::ORIGIN, origin)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn preflight_from_allowed_origin_is_credentialed() {
    let response = mock_app()
        .oneshot(preflight("http://localhost:5173"))
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:5173"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );
}

#[tokio::test]
async fn preflight_from_unknown_origin_is_not_allowed() {
    let response = mock_app()
        .oneshot(preflight("https://evil.example.com"))
        .await
        .unwrap();

    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}
