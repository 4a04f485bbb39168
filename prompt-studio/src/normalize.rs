//! Turning a provider reply into displayable text.

use prompt_studio_types::content::Part;
use prompt_studio_types::response::GenerateContentResponse;

/// 模型没有给出可用文本时展示的信息。
pub const GENERATION_FAILED_MESSAGE: &str =
    "Gagal menghasilkan prompt. Model tidak memberikan respons teks yang valid.";

/// 规范化后的响应。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedResponse {
    /// 通过主文本访问器取得。
    Text(String),
    /// 通过第一个候选的第一个 part 取得。
    Candidates(String),
    /// 没有可用文本。
    Empty,
}

impl NormalizedResponse {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) | Self::Candidates(text) => Some(text),
            Self::Empty => None,
        }
    }

    /// 面向用户的文本，`Empty` 时为 `GENERATION_FAILED_MESSAGE`。
    #[must_use]
    pub fn display_text(&self) -> &str {
        self.as_text().unwrap_or(GENERATION_FAILED_MESSAGE)
    }

    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) | Self::Candidates(text) => text,
            Self::Empty => GENERATION_FAILED_MESSAGE.to_string(),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// 规范化响应，永不失败。
#[must_use]
pub fn normalize(response: &GenerateContentResponse) -> NormalizedResponse {
    let primary = response.text().filter(|text| !text.is_empty());
    let fallback = response
        .first_content()
        .and_then(|content| content.parts.first())
        .and_then(Part::text_value)
        .filter(|text| !text.is_empty());

    match (primary, fallback) {
        (Some(text), _) => NormalizedResponse::Text(text),
        (None, Some(text)) => NormalizedResponse::Candidates(text.to_string()),
        (None, None) => NormalizedResponse::Empty,
    }
}
