//! Assembly of the multimodal `generateContent` request.

use prompt_studio_types::config::GenerationConfig;
use prompt_studio_types::content::{Content, Part, Role};
use prompt_studio_types::models::GenerateContentRequest;

use crate::image::EncodedImage;

/// 有第二张图时追加的说明。
pub const FACE_REFERENCE_NOTE: &str = "Gunakan gambar kedua sebagai referensi detail wajah khusus.";

const TASK_INTRO: &str = "Bertindaklah sebagai \"AI Prompt Engineer\" profesional untuk Stable Diffusion dan Midjourney.

Tugas Anda:
1. Analisis gambar yang diunggah.
2. Buatlah prompt gambar (Text-to-Image) dalam BAHASA INGGRIS yang sangat detail dan deskriptif.
3. Prompt ini harus bisa menghasilkan ulang gambar karakter yang serupa dengan kualitas tinggi.";

const TASK_OUTPUT_FORMAT: &str = "Struktur Prompt yang diinginkan (output hanya prompt final dalam Bahasa Inggris, satu paragraf panjang atau dipisahkan koma):
[Art Style/Medium], [Character Description & Gender], [Clothing & Accessories], [Face & Expression Details], [Pose & Action], [Background & Environment], [Lighting & Atmosphere], [Camera Settings/Technical Details].

JANGAN memberikan penjelasan pengantar. Langsung berikan prompt Bahasa Inggrisnya.";

/// 把编译好的指令嵌入固定任务说明。
#[must_use]
pub fn task_prompt(instructions: &str) -> String {
    format!("{TASK_INTRO}\n\n{instructions}\n\n{TASK_OUTPUT_FORMAT}")
}

/// 按顺序组装请求片段：文本、主图、[脸部图、说明]。
#[must_use]
pub fn assemble_parts(
    instructions: &str,
    primary: &EncodedImage,
    secondary: Option<&EncodedImage>,
) -> Vec<Part> {
    let mut parts = vec![Part::text(task_prompt(instructions)), primary.to_part()];
    if let Some(face) = secondary {
        parts.push(face.to_part());
        parts.push(Part::text(FACE_REFERENCE_NOTE));
    }
    parts
}

/// 把片段包装为单条 user 内容的请求体。
#[must_use]
pub fn build_request(
    parts: Vec<Part>,
    generation_config: Option<GenerationConfig>,
) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content::from_parts(parts, Role::User)],
        generation_config,
    }
}
