//! Transport layer for the `generateContent` call.

use std::time::Duration;

use futures_util::future::BoxFuture;
use prompt_studio_types::models::GenerateContentRequest;
use prompt_studio_types::response::GenerateContentResponse;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client as HttpClient, Proxy};

use crate::client::HttpOptions;
use crate::error::{Error, Result};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/";
const DEFAULT_API_VERSION: &str = "v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// 单次模型调用的输入。
#[derive(Debug, Clone, Copy)]
pub struct ModelCall<'a> {
    pub model: &'a str,
    pub api_key: &'a str,
    pub request: &'a GenerateContentRequest,
}

/// 发送 `generateContent` 请求的传输接口。
pub trait Transport: Send + Sync {
    fn generate_content<'a>(
        &'a self,
        call: ModelCall<'a>,
    ) -> BoxFuture<'a, Result<GenerateContentResponse>>;
}

/// 基于 reqwest 的 Gemini REST 传输。
pub struct HttpTransport {
    http: HttpClient,
    api_client: ApiClient,
}

impl HttpTransport {
    /// 按 HTTP 配置构建传输。
    ///
    /// # Errors
    /// 当头部、代理无效或构建 HTTP 客户端失败时返回错误。
    pub fn new(http_options: &HttpOptions) -> Result<Self> {
        let headers = build_headers(http_options)?;
        let http = build_http_client(http_options, headers)?;
        Ok(Self {
            http,
            api_client: ApiClient::new(http_options),
        })
    }

    pub(crate) fn method_url(&self, model: &str, method: &str) -> String {
        let model = transform_model_name(model);
        let base = &self.api_client.base_url;
        let version = &self.api_client.api_version;
        format!("{base}{version}/{model}:{method}")
    }

    async fn send_generate_content(&self, call: ModelCall<'_>) -> Result<GenerateContentResponse> {
        let url = self.method_url(call.model, "generateContent");
        let mut api_key = HeaderValue::from_str(call.api_key).map_err(|_| Error::Auth {
            message: "Invalid API key value".into(),
        })?;
        api_key.set_sensitive(true);

        let response = self
            .http
            .post(&url)
            .header(HeaderName::from_static(API_KEY_HEADER), api_key)
            .json(call.request)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(%url, status = status.as_u16(), "generateContent responded");
        if !status.is_success() {
            return Err(Error::ApiError {
                status: status.as_u16(),
                message: response.text().await?,
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

impl Transport for HttpTransport {
    fn generate_content<'a>(
        &'a self,
        call: ModelCall<'a>,
    ) -> BoxFuture<'a, Result<GenerateContentResponse>> {
        Box::pin(self.send_generate_content(call))
    }
}

pub(crate) struct ApiClient {
    pub base_url: String,
    pub api_version: String,
}

impl ApiClient {
    fn new(http_options: &HttpOptions) -> Self {
        let base_url = http_options
            .base_url
            .as_deref()
            .map_or_else(|| DEFAULT_BASE_URL.to_string(), normalize_base_url);
        let api_version = http_options
            .api_version
            .clone()
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());
        Self {
            base_url,
            api_version,
        }
    }
}

fn normalize_base_url(base_url: &str) -> String {
    let mut value = base_url.trim().to_string();
    if !value.ends_with('/') {
        value.push('/');
    }
    value
}

fn transform_model_name(model: &str) -> String {
    if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{model}")
    }
}

fn build_headers(http_options: &HttpOptions) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    for (key, value) in &http_options.headers {
        let name = HeaderName::from_bytes(key.as_bytes()).map_err(|_| Error::InvalidConfig {
            message: format!("Invalid header name: {key}"),
        })?;
        let value = HeaderValue::from_str(value).map_err(|_| Error::InvalidConfig {
            message: format!("Invalid header value for {key}"),
        })?;
        headers.insert(name, value);
    }
    Ok(headers)
}

fn build_http_client(http_options: &HttpOptions, headers: HeaderMap) -> Result<HttpClient> {
    let mut http_builder = HttpClient::builder();
    if let Some(timeout) = http_options.timeout {
        http_builder = http_builder.timeout(Duration::from_secs(timeout));
    }

    if let Some(proxy_url) = &http_options.proxy {
        let proxy = Proxy::all(proxy_url).map_err(|e| Error::InvalidConfig {
            message: format!("Invalid proxy: {e}"),
        })?;
        http_builder = http_builder.proxy(proxy);
    }

    if !headers.is_empty() {
        http_builder = http_builder.default_headers(headers);
    }

    Ok(http_builder.build()?)
}
