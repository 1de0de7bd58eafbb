use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tabmate_engine::{
    CommandTranslator, FetchSettings, GenerationError, GenerationRequest, ParagraphExtractor,
    Pipeline, ReqwestFetcher, TextGenerator,
};
use tabmate_server::{cors_layer, router, AppState};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Classification replies for prompts without a system message, `filter`
/// for the command translator.
struct StubGenerator {
    filter: String,
}

#[async_trait::async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        if request.system.is_some() {
            Ok(self.filter.clone())
        } else {
            Ok(r#"{"title": "Shop", "category": "E-commerce/Shopping"}"#.to_string())
        }
    }
}

fn app(filter_reply: &str) -> Router {
    let generator: Arc<dyn TextGenerator> = Arc::new(StubGenerator {
        filter: filter_reply.to_string(),
    });
    let pipeline = Pipeline::new(
        Arc::new(ReqwestFetcher::new(FetchSettings::default()).unwrap()),
        Arc::new(ParagraphExtractor::default()),
        generator.clone(),
        tokio::runtime::Handle::current(),
    );
    let state = AppState::new(
        Arc::new(pipeline),
        Arc::new(CommandTranslator::new(generator)),
        2,
    );
    router(state, cors_layer("*").unwrap())
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn tabs() -> Value {
    json!([
        {"id": "1", "title": "Lo-fi", "url": "https://music.example/lofi", "category": "Music", "favicon": "🎵"},
        {"id": "2", "title": "Stand", "url": "https://shop.example/stand", "category": "Shopping"},
        {"id": "3", "title": "Jazz", "url": "https://music.example/jazz", "category": "Music"}
    ])
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn categorize_returns_one_entry_per_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/shop"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<title>Shop</title><p>Buy things</p>", "text/html"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let shop = format!("{}/shop", server.uri());
    let gone = format!("{}/gone", server.uri());

    for uri in ["/categorize", "/api/categorize"] {
        let (status, body) = send(
            app("{}"),
            post_json(uri, json!({"urls": [shop.clone(), gone.clone()]})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let entries = body.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        let success = entries.iter().find(|e| e["url"] == shop.as_str()).unwrap();
        assert_eq!(success["category"], "E-commerce/Shopping");
        assert!(success["id"].as_str().is_some_and(|id| !id.is_empty()));
        let failure = entries.iter().find(|e| e["url"] == gone.as_str()).unwrap();
        assert_eq!(failure["status"], "error");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn categorize_rejects_missing_or_empty_urls() {
    for body in [json!({}), json!({"urls": []})] {
        let (status, body) = send(app("{}"), post_json("/categorize", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn update_applies_translated_filter() {
    let (status, body) = send(
        app(r#"{"exclude": {"category": "Music"}}"#),
        post_json(
            "/api/update",
            json!({"command": "remove music tabs", "currentTabs": tabs()}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{"id": "2", "title": "Stand", "url": "https://shop.example/stand", "category": "Shopping"}])
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn update_preserves_order_and_favicon() {
    let (status, body) = send(
        app(r#"{"include": {"category": "Music"}}"#),
        post_json("/update", json!({"command": "music only", "currentTabs": tabs()})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["1", "3"]);
    assert_eq!(body[0]["favicon"], "🎵");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn update_passes_front_end_flags_through() {
    let current_tabs = json!([
        {"id": "1", "title": "Lo-fi", "url": "https://music.example/lofi", "category": "Music",
         "isActive": true, "isDistraction": true},
        {"id": "2", "title": "Stand", "url": "https://shop.example/stand", "category": "Shopping",
         "isActive": false, "isDuplicate": true}
    ]);
    let (status, body) = send(
        app(r#"{"exclude": {"category": "Music"}}"#),
        post_json("/update", json!({"command": "remove music", "currentTabs": current_tabs})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{"id": "2", "title": "Stand", "url": "https://shop.example/stand",
                "category": "Shopping", "isActive": false, "isDuplicate": true}])
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn update_requires_command_and_tabs() {
    for payload in [
        json!({"currentTabs": tabs()}),
        json!({"command": "  ", "currentTabs": tabs()}),
        json!({"command": "remove music"}),
        json!({"command": "remove music", "currentTabs": []}),
    ] {
        let (status, body) = send(app("{}"), post_json("/update", payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn malformed_filter_reply_is_a_server_error() {
    let (status, body) = send(
        app("Sorry, I can't do that."),
        post_json("/update", json!({"command": "remove music", "currentTabs": tabs()})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("invalid filter format"));
    assert!(body.get(0).is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn invalid_json_body_is_a_bad_request() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/update")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(app("{}"), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn preflight_echoes_cors_headers() {
    for uri in ["/categorize", "/update"] {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri(uri)
            .header(header::ORIGIN, "http://localhost:3000")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap();
        let response = app("{}").oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS].to_str().unwrap();
        assert!(methods.contains("POST"));
        assert!(methods.contains("OPTIONS"));
        let allowed = headers[header::ACCESS_CONTROL_ALLOW_HEADERS]
            .to_str()
            .unwrap()
            .to_ascii_lowercase();
        assert!(allowed.contains("content-type"));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn exact_origin_is_echoed() {
    let generator: Arc<dyn TextGenerator> = Arc::new(StubGenerator {
        filter: "{}".to_string(),
    });
    let state = AppState::new(
        Arc::new(Pipeline::new(
            Arc::new(ReqwestFetcher::new(FetchSettings::default()).unwrap()),
            Arc::new(ParagraphExtractor::default()),
            generator.clone(),
            tokio::runtime::Handle::current(),
        )),
        Arc::new(CommandTranslator::new(generator)),
        1,
    );
    let app = router(state, cors_layer("http://localhost:3000").unwrap());
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/update")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn health_reports_ok() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app("{}"), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}
