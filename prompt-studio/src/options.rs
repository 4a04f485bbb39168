//! Attribute selections and their compilation into model instructions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// 表示“由模型根据图片推断”的哨兵值。
pub const DEFAULT_CHOICE: &str = "default";

/// 指令块的固定开头。
pub const INSTRUCTION_HEADER: &str = "PENTING: Pengguna telah menentukan atribut berikut yang WAJIB ada dalam prompt akhir (jika nilai adalah 'default', analisis gambar asli):";

/// 附加文本行的标签。
pub const ADDITIONAL_TEXT_LABEL: &str = "Tambahan Detail";

/// 可选属性字段，顺序即指令中的输出顺序。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptField {
    Gender,
    Expression,
    ShotType,
    CameraAngle,
    Pose,
    Background,
    ArtStyle,
    Lighting,
    ColorTone,
}

impl PromptField {
    pub const ALL: [Self; 9] = [
        Self::Gender,
        Self::Expression,
        Self::ShotType,
        Self::CameraAngle,
        Self::Pose,
        Self::Background,
        Self::ArtStyle,
        Self::Lighting,
        Self::ColorTone,
    ];

    /// 指令行中使用的标签。
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Gender => "Gender",
            Self::Expression => "Expression",
            Self::ShotType => "Shot Type",
            Self::CameraAngle => "Camera Angle",
            Self::Pose => "Pose",
            Self::Background => "Background/Location",
            Self::ArtStyle => "Art Style",
            Self::Lighting => "Lighting",
            Self::ColorTone => "Color Tone",
        }
    }

    /// 序列化时使用的 camelCase 键。
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Gender => "gender",
            Self::Expression => "expression",
            Self::ShotType => "shotType",
            Self::CameraAngle => "cameraAngle",
            Self::Pose => "pose",
            Self::Background => "background",
            Self::ArtStyle => "artStyle",
            Self::Lighting => "lighting",
            Self::ColorTone => "colorTone",
        }
    }
}

impl fmt::Display for PromptField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for PromptField {
    type Err = Error;

    /// 接受 camelCase、snake_case 与 kebab-case，大小写不敏感。
    fn from_str(s: &str) -> Result<Self> {
        let wanted: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        Self::ALL
            .into_iter()
            .find(|field| field.key().to_lowercase() == wanted)
            .ok_or_else(|| Error::Parse {
                message: format!("Unknown prompt field: {s}"),
            })
    }
}

/// 用户的属性选择。
///
/// 九个字段始终存在，未指定时为 `DEFAULT_CHOICE`；反序列化时缺失的键同样取默认值。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PromptOptions {
    pub gender: String,
    pub expression: String,
    pub shot_type: String,
    pub camera_angle: String,
    pub pose: String,
    pub background: String,
    pub art_style: String,
    pub lighting: String,
    pub color_tone: String,
    /// 自由文本，原样传给模型。
    pub additional_text: String,
}

impl Default for PromptOptions {
    fn default() -> Self {
        Self {
            gender: DEFAULT_CHOICE.into(),
            expression: DEFAULT_CHOICE.into(),
            shot_type: DEFAULT_CHOICE.into(),
            camera_angle: DEFAULT_CHOICE.into(),
            pose: DEFAULT_CHOICE.into(),
            background: DEFAULT_CHOICE.into(),
            art_style: DEFAULT_CHOICE.into(),
            lighting: DEFAULT_CHOICE.into(),
            color_tone: DEFAULT_CHOICE.into(),
            additional_text: String::new(),
        }
    }
}

impl PromptOptions {
    #[must_use]
    pub fn get(&self, field: PromptField) -> &str {
        self.slot(field)
    }

    pub fn set(&mut self, field: PromptField, value: impl Into<String>) {
        *self.slot_mut(field) = value.into();
    }

    /// Builder 风格设置字段。
    #[must_use]
    pub fn with(mut self, field: PromptField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    #[must_use]
    pub fn with_additional_text(mut self, text: impl Into<String>) -> Self {
        self.additional_text = text.into();
        self
    }

    /// 字段是否被强制指定（非哨兵值）。
    #[must_use]
    pub fn is_forced(&self, field: PromptField) -> bool {
        self.get(field) != DEFAULT_CHOICE
    }

    /// 按固定顺序返回被强制指定的字段。
    pub fn forced_fields(&self) -> impl Iterator<Item = (PromptField, &str)> + '_ {
        PromptField::ALL
            .into_iter()
            .filter(|field| self.is_forced(*field))
            .map(|field| (field, self.get(field)))
    }

    /// 编译为指令块：固定开头，加上每个强制字段一行 `- <Label>: <value>`。
    #[must_use]
    pub fn compile_instructions(&self) -> String {
        let mut instructions = String::from(INSTRUCTION_HEADER);
        for (field, value) in self.forced_fields() {
            instructions.push_str(&format!("\n- {}: {value}", field.label()));
        }
        if !self.additional_text.is_empty() {
            instructions.push_str(&format!(
                "\n- {ADDITIONAL_TEXT_LABEL}: {}",
                self.additional_text
            ));
        }
        instructions
    }

    fn slot(&self, field: PromptField) -> &String {
        match field {
            PromptField::Gender => &self.gender,
            PromptField::Expression => &self.expression,
            PromptField::ShotType => &self.shot_type,
            PromptField::CameraAngle => &self.camera_angle,
            PromptField::Pose => &self.pose,
            PromptField::Background => &self.background,
            PromptField::ArtStyle => &self.art_style,
            PromptField::Lighting => &self.lighting,
            PromptField::ColorTone => &self.color_tone,
        }
    }

    fn slot_mut(&mut self, field: PromptField) -> &mut String {
        match field {
            PromptField::Gender => &mut self.gender,
            PromptField::Expression => &mut self.expression,
            PromptField::ShotType => &mut self.shot_type,
            PromptField::CameraAngle => &mut self.camera_angle,
            PromptField::Pose => &mut self.pose,
            PromptField::Background => &mut self.background,
            PromptField::ArtStyle => &mut self.art_style,
            PromptField::Lighting => &mut self.lighting,
            PromptField::ColorTone => &mut self.color_tone,
        }
    }
}
