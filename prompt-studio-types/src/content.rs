use serde::{Deserialize, Serialize};

/// 对话内容。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    /// 角色：user/model。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// 消息内容片段。
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// 创建用户文本消息。
    pub fn user(text: impl Into<String>) -> Self {
        Self::from_parts(vec![Part::text(text)], Role::User)
    }

    /// 从 parts 构建内容。
    #[must_use]
    pub const fn from_parts(parts: Vec<Part>, role: Role) -> Self {
        Self {
            role: Some(role),
            parts,
        }
    }

    /// 提取第一段文本。
    #[must_use]
    pub fn first_text(&self) -> Option<&str> {
        self.parts.iter().find_map(|part| part.text_value())
    }
}

/// 内容角色。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// 内容部分。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// 具体内容变体。
    #[serde(flatten)]
    pub kind: PartKind,
    /// 是否为思考内容。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thought: Option<bool>,
}

impl Part {
    /// 创建文本 Part。
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: PartKind::Text { text: text.into() },
            thought: None,
        }
    }

    /// 创建内联数据 Part（`data` 已是 base64 编码）。
    pub fn inline_data(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            kind: PartKind::InlineData {
                inline_data: Blob {
                    mime_type: mime_type.into(),
                    data: data.into(),
                },
            },
            thought: None,
        }
    }

    /// 设置是否为思考内容。
    #[must_use]
    pub const fn with_thought(mut self, thought: bool) -> Self {
        self.thought = Some(thought);
        self
    }

    /// 是否为思考内容。
    #[must_use]
    pub fn is_thought(&self) -> bool {
        self.thought.unwrap_or(false)
    }

    /// 获取文本内容（仅当为 Text Part）。
    #[must_use]
    pub const fn text_value(&self) -> Option<&str> {
        match &self.kind {
            PartKind::Text { text } => Some(text.as_str()),
            _ => None,
        }
    }

    /// 获取内联数据（仅当为 InlineData Part）。
    #[must_use]
    pub const fn inline_data_ref(&self) -> Option<&Blob> {
        match &self.kind {
            PartKind::InlineData { inline_data } => Some(inline_data),
            _ => None,
        }
    }
}

/// 内容部分的具体变体。
///
/// 响应中出现的其它 part（函数调用、代码执行等）统一落入 `Other`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", untagged)]
pub enum PartKind {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: Blob,
    },
    #[serde(skip_serializing)]
    Other {},
}

/// 内联二进制数据，`data` 为 base64 字符串。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub mime_type: String,
    pub data: String,
}
