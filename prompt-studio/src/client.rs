//! Client configuration.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use prompt_studio_types::config::GenerationConfig;

use crate::error::{Error, Result};
use crate::transport::{HttpTransport, Transport};

/// 默认模型。
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// `Client::from_env` 依次尝试的 API Key 环境变量。
pub const API_KEY_ENV_VARS: [&str; 3] = ["API_KEY", "GEMINI_API_KEY", "GOOGLE_API_KEY"];

/// 凭据缺失或为空时的错误信息。
pub const MISSING_CREDENTIAL_MESSAGE: &str = "credential missing or empty";

/// Prompt Studio 客户端。
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub config: ClientConfig,
    pub transport: Arc<dyn Transport>,
}

/// 客户端配置。
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// 认证信息，每次调用时解析。
    pub credentials: Credentials,
    /// 模型 ID。
    pub model: String,
    /// HTTP 配置。
    pub http_options: HttpOptions,
    /// 生成配置。
    pub generation_config: Option<GenerationConfig>,
}

/// 认证方式。
#[derive(Clone)]
pub enum Credentials {
    /// 固定 API Key。
    ApiKey(String),
    /// 每次调用时按顺序读取的环境变量。
    Environment(Vec<String>),
}

impl Credentials {
    /// 使用默认环境变量列表。
    #[must_use]
    pub fn from_default_env() -> Self {
        Self::Environment(API_KEY_ENV_VARS.iter().map(ToString::to_string).collect())
    }

    /// 解析出可用的 API Key。
    ///
    /// # Errors
    /// 当 Key 缺失或只包含空白时返回 `Error::Auth`。
    pub fn resolve(&self) -> Result<String> {
        match self {
            Self::ApiKey(key) => non_blank(key).ok_or_else(|| Error::Auth {
                message: MISSING_CREDENTIAL_MESSAGE.into(),
            }),
            Self::Environment(names) => names
                .iter()
                .find_map(|name| std::env::var(name).ok().and_then(|value| non_blank(&value)))
                .ok_or_else(|| Error::Auth {
                    message: format!("{MISSING_CREDENTIAL_MESSAGE} (checked {})", names.join(", ")),
                }),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
            Self::Environment(names) => f.debug_tuple("Environment").field(names).finish(),
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// HTTP 配置。
#[derive(Debug, Clone, Default)]
pub struct HttpOptions {
    pub timeout: Option<u64>,
    pub proxy: Option<String>,
    pub headers: HashMap<String, String>,
    pub base_url: Option<String>,
    pub api_version: Option<String>,
}

impl Client {
    /// 使用固定 API Key 创建客户端。
    ///
    /// # Errors
    /// 当构建 HTTP 客户端失败时返回错误。
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder().api_key(api_key).build()
    }

    /// 从环境变量创建客户端。
    ///
    /// API Key 不在此处读取，而是在每次生成时从 `API_KEY_ENV_VARS` 解析；
    /// `GENAI_BASE_URL`/`GEMINI_BASE_URL`、`GENAI_API_VERSION`、`GENAI_MODEL` 在此读取。
    ///
    /// # Errors
    /// 当构建 HTTP 客户端失败时返回错误。
    pub fn from_env() -> Result<Self> {
        let mut builder = Self::builder().credentials(Credentials::from_default_env());
        if let Some(base_url) = env_override("GENAI_BASE_URL").or_else(|| env_override("GEMINI_BASE_URL")) {
            builder = builder.base_url(base_url);
        }
        if let Some(api_version) = env_override("GENAI_API_VERSION") {
            builder = builder.api_version(api_version);
        }
        if let Some(model) = env_override("GENAI_MODEL") {
            builder = builder.model(model);
        }
        builder.build()
    }

    /// 创建 Builder。
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// 访问 Prompt 生成接口。
    #[must_use]
    pub fn prompts(&self) -> crate::prompts::Prompts {
        crate::prompts::Prompts::new(self.inner.clone())
    }

    /// 当前配置。
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }
}

fn env_override(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

/// 客户端 Builder。
#[derive(Default)]
pub struct ClientBuilder {
    credentials: Option<Credentials>,
    model: Option<String>,
    http_options: HttpOptions,
    generation_config: Option<GenerationConfig>,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    /// 设置 API Key。空 Key 不会在此报错，而是在调用时返回 `Error::Auth`。
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::ApiKey(key.into()));
        self
    }

    /// 设置认证方式。
    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// 设置模型 ID。
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// 设置请求超时（秒）。
    #[must_use]
    pub const fn timeout(mut self, secs: u64) -> Self {
        self.http_options.timeout = Some(secs);
        self
    }

    /// 设置代理。
    #[must_use]
    pub fn proxy(mut self, url: impl Into<String>) -> Self {
        self.http_options.proxy = Some(url.into());
        self
    }

    /// 增加默认 HTTP 头。
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.http_options.headers.insert(key.into(), value.into());
        self
    }

    /// 设置自定义基础 URL。
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.http_options.base_url = Some(base_url.into());
        self
    }

    /// 设置 API 版本。
    #[must_use]
    pub fn api_version(mut self, api_version: impl Into<String>) -> Self {
        self.http_options.api_version = Some(api_version.into());
        self
    }

    /// 设置生成配置。
    #[must_use]
    pub fn generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }

    /// 替换传输层（测试或自定义网络栈）。
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// 构建客户端。
    ///
    /// # Errors
    /// 当模型为空、HTTP 参数无效或构建 HTTP 客户端失败时返回错误。
    pub fn build(self) -> Result<Client> {
        let Self {
            credentials,
            model,
            http_options,
            generation_config,
            transport,
        } = self;

        let model = model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        if model.trim().is_empty() {
            return Err(Error::InvalidConfig {
                message: "Model name must not be empty".into(),
            });
        }

        let transport: Arc<dyn Transport> = match transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(&http_options)?),
        };

        let config = ClientConfig {
            credentials: credentials.unwrap_or_else(Credentials::from_default_env),
            model,
            http_options,
            generation_config,
        };

        Ok(Client {
            inner: Arc::new(ClientInner { config, transport }),
        })
    }
}
