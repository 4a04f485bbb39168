//! Prompt generation: the single provider call per user action.

use std::sync::Arc;

use prompt_studio_types::content::Part;
use prompt_studio_types::response::{GenerateContentResponse, UsageMetadata};

use crate::client::ClientInner;
use crate::error::Result;
use crate::image::EncodedImage;
use crate::normalize::{normalize, NormalizedResponse};
use crate::options::PromptOptions;
use crate::request::{assemble_parts, build_request};
use crate::transport::ModelCall;

#[derive(Clone)]
pub struct Prompts {
    pub(crate) inner: Arc<ClientInner>,
}

/// 生成结果及响应元数据。
#[derive(Debug, Clone)]
pub struct GeneratedPrompt {
    pub normalized: NormalizedResponse,
    pub model_version: Option<String>,
    pub response_id: Option<String>,
    pub usage: Option<UsageMetadata>,
}

impl GeneratedPrompt {
    /// 面向用户的文本。
    #[must_use]
    pub fn text(&self) -> &str {
        self.normalized.display_text()
    }
}

impl Prompts {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// 使用的模型 ID。
    #[must_use]
    pub fn model(&self) -> &str {
        &self.inner.config.model
    }

    /// 发送一次 `generateContent` 调用。
    ///
    /// 凭据在任何网络访问之前解析；失败不会重试。
    ///
    /// # Errors
    /// 凭据缺失或为空时返回 `Error::Auth`，传输或服务端错误原样返回。
    pub async fn generate_content(&self, parts: Vec<Part>) -> Result<GenerateContentResponse> {
        let api_key = self.inner.config.credentials.resolve()?;
        let model = self.model();
        let part_count = parts.len();
        let request = build_request(parts, self.inner.config.generation_config.clone());

        tracing::debug!(model, parts = part_count, "sending generateContent");
        let result = self
            .inner
            .transport
            .generate_content(ModelCall {
                model,
                api_key: &api_key,
                request: &request,
            })
            .await;
        match &result {
            Ok(response) => tracing::debug!(
                model,
                candidates = response.candidates.len(),
                "generateContent succeeded"
            ),
            Err(err) => tracing::warn!(model, error = %err, "generateContent failed"),
        }
        result
    }

    /// 编译选项、组装请求、调用模型并规范化响应。
    ///
    /// # Errors
    /// 同 [`Prompts::generate_content`]；响应中缺少文本不算错误。
    pub async fn generate_detailed(
        &self,
        primary: &EncodedImage,
        secondary: Option<&EncodedImage>,
        options: &PromptOptions,
    ) -> Result<GeneratedPrompt> {
        let instructions = options.compile_instructions();
        let parts = assemble_parts(&instructions, primary, secondary);
        let response = self.generate_content(parts).await?;

        let normalized = normalize(&response);
        if normalized.is_empty() {
            tracing::warn!(
                model = self.model(),
                "model returned no usable text; using fallback message"
            );
        }
        Ok(GeneratedPrompt {
            normalized,
            model_version: response.model_version,
            response_id: response.response_id,
            usage: response.usage_metadata,
        })
    }

    /// 生成最终 prompt 文本。
    ///
    /// # Errors
    /// 同 [`Prompts::generate_content`]。
    pub async fn generate(
        &self,
        primary: &EncodedImage,
        secondary: Option<&EncodedImage>,
        options: &PromptOptions,
    ) -> Result<String> {
        let generated = self.generate_detailed(primary, secondary, options).await?;
        Ok(generated.normalized.into_text())
    }
}
