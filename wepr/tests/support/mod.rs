#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wepr::Client;

pub fn build_client(base_url: &str) -> Client {
    Client::builder().base_url(base_url).build().unwrap()
}

/// One token entry with `k` equally likely candidates.
pub fn uniform_entry(token: &str, k: usize) -> Value {
    let logprob = (1.0 / k as f64).ln();
    let candidates: Vec<Value> = (0..k)
        .map(|i| json!({"token": format!("{token}{i}"), "logprob": logprob}))
        .collect();
    json!({"token": token, "logprob": logprob, "top_logprobs": candidates})
}

pub fn certain_entry(token: &str) -> Value {
    json!({
        "token": token,
        "logprob": 0.0,
        "top_logprobs": [{"token": token, "logprob": 0.0}]
    })
}

pub async fn mount_generate(server: &MockServer, body: Value) {
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}
