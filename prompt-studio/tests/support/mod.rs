#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use prompt_studio::Client;

pub const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

/// PNG signature plus IHDR chunk.
pub const TINY_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x02, 0x00, 0x00, 0x00,
];

pub fn build_client(base_url: &str) -> Client {
    build_client_with_key(base_url, "test-key")
}

pub fn build_client_with_key(base_url: &str, api_key: &str) -> Client {
    Client::builder()
        .api_key(api_key)
        .base_url(base_url)
        .build()
        .unwrap()
}

pub fn text_reply(text: &str) -> Value {
    json!({
        "candidates": [
            {
                "content": {"role": "model", "parts": [{"text": text}]},
                "finishReason": "STOP"
            }
        ],
        "modelVersion": "gemini-2.5-flash",
        "responseId": "resp-1"
    })
}

pub async fn mount_reply(server: &MockServer, body: Value) {
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}
