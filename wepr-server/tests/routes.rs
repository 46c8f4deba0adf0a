use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wepr::{AnalysisConfig, Client};
use wepr_server::{bind, router, AppState};

fn test_router(base_url: &str) -> Router {
    let client = Client::builder().base_url(base_url).build().unwrap();
    router(AppState::new(client, AnalysisConfig::default()))
}

fn ask_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/ask")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn models_lists_registry() {
    let app = test_router("http://127.0.0.1:9");
    let response = app
        .oneshot(Request::builder().uri("/models").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let models = read_json(response).await;
    let models = models.as_array().unwrap();
    assert_eq!(models.len(), 3);
    assert_eq!(models[0]["id"], json!("cas/ministral-8b-instruct-2410_q4km"));
    assert_eq!(models[1], json!({"id": "gemma3:4b", "name": "Gemma 4B"}));
}

#[tokio::test]
async fn ask_returns_analysis() {
    let server = MockServer::start().await;
    let quarter = 0.25_f64.ln();
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "a",
            "done": true,
            "logprobs": [{
                "token": "a",
                "top_logprobs": [
                    {"token": "a", "logprob": quarter},
                    {"token": "b", "logprob": quarter},
                    {"token": "c", "logprob": quarter},
                    {"token": "d", "logprob": quarter}
                ]
            }]
        })))
        .mount(&server)
        .await;

    let app = test_router(&server.uri());
    let response = app
        .oneshot(ask_request(json!({"prompt": "pick a letter", "seed": "7"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["response"], json!("a"));
    assert_eq!(body["epr"], json!(1.3863));
    assert_eq!(body["risk_score"], json!(0.55));
    assert_eq!(body["tokens"][0]["risk_level"], json!("high"));
    assert_eq!(body["tokens"][0]["normalized_entropy"], json!(1.0));
    assert_eq!(body["tokens"][0]["candidates"][2], json!({"token": "c", "prob": 0.25}));
}

#[tokio::test]
async fn ask_without_prompt_is_bad_request() {
    let app = test_router("http://127.0.0.1:9");
    let response = app.oneshot(ask_request(json!({"model": "gemma3:4b"}))).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await, json!({"error": "No prompt"}));
}

#[tokio::test]
async fn ask_backend_failure_is_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(503).set_body_string("loading model"))
        .mount(&server)
        .await;

    let app = test_router(&server.uri());
    let response = app.oneshot(ask_request(json!({"prompt": "hi"}))).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(read_json(response).await, json!({"error": "Ollama error"}));
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let app = test_router("http://127.0.0.1:9");
    let response = app
        .oneshot(
            Request::builder()
                .uri("/models")
                .header("origin", "http://localhost:5173")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}

#[tokio::test]
async fn bind_accepts_hostnames_and_ip_literals() {
    for host in ["localhost", "127.0.0.1"] {
        let listener = bind(host, 0).await.unwrap();
        let addr = listener.local_addr().unwrap();
        assert!(addr.ip().is_loopback(), "{host} bound to {addr}");
        assert_ne!(addr.port(), 0);
    }
}
