//! Image encoding for inline request parts.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use prompt_studio_types::content::Part;

use crate::error::{Error, Result};

/// 无法识别扩展名时使用的媒体类型。
pub const FALLBACK_MIME_TYPE: &str = "image/jpeg";

/// 媒体类型 + base64 数据。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    mime_type: String,
    data: String,
}

impl EncodedImage {
    /// 使用已编码的数据创建。
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// 编码原始字节。
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self::new(mime_type, STANDARD.encode(bytes))
    }

    /// 读取文件并编码，媒体类型按扩展名推断。
    ///
    /// # Errors
    /// 当读取文件失败时返回错误。
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::from_bytes(&bytes, guess_mime_type(path)))
    }

    /// 解析 `data:<mime>;base64,<payload>` 形式的 data URL。
    ///
    /// # Errors
    /// 当输入不包含逗号分隔的载荷时返回 `Error::Parse`。
    pub fn from_data_url(url: &str) -> Result<Self> {
        let (header, payload) = url.split_once(',').ok_or_else(|| Error::Parse {
            message: "Invalid data URL format: missing ',' separator".into(),
        })?;
        let mime_type = header
            .strip_prefix("data:")
            .unwrap_or(header)
            .split(';')
            .next()
            .filter(|mime| !mime.is_empty())
            .unwrap_or(FALLBACK_MIME_TYPE);
        Ok(Self::new(mime_type, payload))
    }

    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// base64 载荷。
    #[must_use]
    pub fn data(&self) -> &str {
        &self.data
    }

    /// 转换为内联数据 Part。
    #[must_use]
    pub fn to_part(&self) -> Part {
        Part::inline_data(self.mime_type.clone(), self.data.clone())
    }
}

/// 按文件扩展名推断图片媒体类型。
#[must_use]
pub fn guess_mime_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(FALLBACK_MIME_TYPE)
        .to_string()
}
