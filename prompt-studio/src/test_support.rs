#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use futures_util::future::BoxFuture;
use prompt_studio_types::content::{Content, Part, Role};
use prompt_studio_types::models::GenerateContentRequest;
use prompt_studio_types::response::{Candidate, GenerateContentResponse};

use crate::client::Client;
use crate::error::{Error, Result};
use crate::transport::{ModelCall, Transport};

static ENV_LOCK: Mutex<()> = Mutex::new(());

pub fn with_env(vars: &[(&str, Option<&str>)], f: impl FnOnce()) {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    let backup: Vec<(String, Option<String>)> = vars
        .iter()
        .map(|(key, _)| ((*key).to_string(), std::env::var(key).ok()))
        .collect();
    for (key, value) in vars {
        match value {
            Some(value) => std::env::set_var(key, value),
            None => std::env::remove_var(key),
        }
    }
    f();
    for (key, value) in backup {
        match value {
            Some(value) => std::env::set_var(key, value),
            None => std::env::remove_var(key),
        }
    }
}

/// 10x10 PNG header bytes; only the signature and IHDR are present.
pub const TINY_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x0A, 0x00, 0x00, 0x00, 0x0A, 0x08, 0x02, 0x00, 0x00, 0x00, 0x02,
    0x50, 0x58, 0xEA,
];

pub fn text_response(text: &str) -> GenerateContentResponse {
    response_with_parts(vec![Part::text(text)])
}

pub fn response_with_parts(parts: Vec<Part>) -> GenerateContentResponse {
    GenerateContentResponse {
        candidates: vec![Candidate {
            content: Some(Content::from_parts(parts, Role::Model)),
            ..Candidate::default()
        }],
        ..GenerateContentResponse::default()
    }
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub model: String,
    pub api_key: String,
    pub request: GenerateContentRequest,
}

pub enum FakeReply {
    Response(GenerateContentResponse),
    ApiError { status: u16, message: String },
}

/// 计数并记录请求的假传输。
pub struct FakeTransport {
    reply: FakeReply,
    calls: AtomicUsize,
    recorded: Mutex<Vec<RecordedCall>>,
}

impl FakeTransport {
    pub fn new(reply: FakeReply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
            recorded: Mutex::new(Vec::new()),
        })
    }

    pub fn replying(response: GenerateContentResponse) -> Arc<Self> {
        Self::new(FakeReply::Response(response))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_call(&self) -> Option<RecordedCall> {
        self.recorded.lock().unwrap().last().cloned()
    }
}

impl Transport for FakeTransport {
    fn generate_content<'a>(
        &'a self,
        call: ModelCall<'a>,
    ) -> BoxFuture<'a, Result<GenerateContentResponse>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.recorded.lock().unwrap().push(RecordedCall {
            model: call.model.to_string(),
            api_key: call.api_key.to_string(),
            request: call.request.clone(),
        });
        let result = match &self.reply {
            FakeReply::Response(response) => Ok(response.clone()),
            FakeReply::ApiError { status, message } => Err(Error::ApiError {
                status: *status,
                message: message.clone(),
            }),
        };
        Box::pin(async move { result })
    }
}

pub fn client_with_transport(api_key: &str, transport: Arc<FakeTransport>) -> Client {
    Client::builder()
        .api_key(api_key)
        .transport(transport)
        .build()
        .unwrap()
}
