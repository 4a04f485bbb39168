//! Preset choices for every prompt field.
//!
//! Labels are the Indonesian UI text, values are the English descriptors sent to the model.

use crate::options::{PromptField, DEFAULT_CHOICE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub label: &'static str,
    pub value: &'static str,
}

const fn choice(label: &'static str, value: &'static str) -> Choice {
    Choice { label, value }
}

/// 每个字段的第一个选项：由模型自动分析。
pub const AUTO_CHOICE: Choice = choice("Analisis Awal (Otomatis)", DEFAULT_CHOICE);

const GENDER: &[Choice] = &[
    AUTO_CHOICE,
    choice("Laki-laki", "Male"),
    choice("Perempuan", "Female"),
    choice("Non-Binary / Androgynous", "Androgynous"),
    choice("Cyborg", "Cyborg"),
    choice("Monster / Creature", "Creature"),
];

const EXPRESSION: &[Choice] = &[
    AUTO_CHOICE,
    choice("Senyum / Bahagia", "Happy, smiling, cheerful"),
    choice("Serius / Stoic", "Serious, stoic expression, intense gaze"),
    choice("Marah / Agresif", "Angry, aggressive, shouting"),
    choice("Sedih / Melankolis", "Sad, melancholic, teary eyes"),
    choice("Terkejut", "Surprised, shocked, wide eyes"),
    choice("Menggoda / Seductive", "Seductive, alluring, biting lip"),
    choice("Tenang / Damai", "Calm, peaceful, closed eyes, meditative"),
];

const SHOT_TYPE: &[Choice] = &[
    AUTO_CHOICE,
    choice("Close-Up (Wajah)", "Close-up shot, focus on face"),
    choice("Medium Shot (Dada ke atas)", "Medium shot, waist up"),
    choice("Cowboy Shot (Paha ke atas)", "Cowboy shot, knees up"),
    choice("Full Body (Seluruh Badan)", "Full body shot, wide shot"),
    choice("Macro (Detail Mata/Benda)", "Macro photography, extreme close-up"),
];

const CAMERA_ANGLE: &[Choice] = &[
    AUTO_CHOICE,
    choice("Eye Level (Sejajar)", "Eye level angle"),
    choice("Low Angle (Dari Bawah)", "Low angle, looking up, imposing"),
    choice("High Angle (Dari Atas)", "High angle, looking down"),
    choice("Dutch Angle (Miring)", "Dutch angle, tilted frame, dynamic"),
    choice("Selfie", "Selfie angle, handheld camera"),
];

const POSE: &[Choice] = &[
    AUTO_CHOICE,
    choice("Berdiri Tegak", "Standing straight, confident pose"),
    choice("Duduk", "Sitting, relaxed pose"),
    choice("Berlari / Aksi", "Running, dynamic action pose, motion blur"),
    choice("Bersandar", "Leaning against wall, casual pose"),
    choice("Menoleh ke Belakang", "Looking back over shoulder"),
];

const BACKGROUND: &[Choice] = &[
    AUTO_CHOICE,
    choice("Studio Polos", "Simple studio background, solid color"),
    choice("Cyberpunk City", "Cyberpunk city street, neon lights, rain"),
    choice("Alam / Hutan", "Forest, nature, trees, sunlight filtering"),
    choice("Interior Modern", "Modern living room, luxury interior"),
    choice("Reruntuhan / Post-Apoc", "Ruins, post-apocalyptic, destroyed city"),
    choice("Luar Angkasa", "Outer space, stars, nebula"),
];

const ART_STYLE: &[Choice] = &[
    AUTO_CHOICE,
    choice("Realistis (Foto 8k)", "Hyper-realistic, 8k, photorealistic, raw photo"),
    choice("Anime / Manga", "Anime style, cell shaded, manga illustration"),
    choice("3D Render (Pixar/Disney)", "3D render, cgi, pixar style, unreal engine 5"),
    choice("Digital Painting", "Digital painting, concept art, smooth brushwork"),
    choice(
        "Cyberpunk / Synthwave",
        "Cyberpunk aesthetic, synthwave colors, retro futurism",
    ),
    choice("Oil Painting", "Oil painting, textured, classical art"),
];

const LIGHTING: &[Choice] = &[
    AUTO_CHOICE,
    choice("Natural (Matahari)", "Natural lighting, sunlight, golden hour"),
    choice("Studio Softbox", "Studio lighting, softbox, professional lighting"),
    choice(
        "Cinematic / Dramatic",
        "Cinematic lighting, dramatic shadows, chiaroscuro",
    ),
    choice("Neon / Colorful", "Neon lighting, colorful rim lights, volumetric fog"),
    choice("Dark / Low Key", "Low key lighting, dark atmosphere, silhouette"),
];

const COLOR_TONE: &[Choice] = &[
    AUTO_CHOICE,
    choice("Vibrant / Colorful", "Vibrant colors, saturated"),
    choice("Black & White", "Black and white, monochrome"),
    choice("Sepia / Vintage", "Sepia tone, vintage film look, grain"),
    choice("Cool / Blue", "Cool tones, blue atmosphere, cold"),
    choice("Warm / Orange", "Warm tones, orange atmosphere, cozy"),
];

/// 字段的全部预设，第一个总是 `AUTO_CHOICE`。
#[must_use]
pub const fn choices(field: PromptField) -> &'static [Choice] {
    match field {
        PromptField::Gender => GENDER,
        PromptField::Expression => EXPRESSION,
        PromptField::ShotType => SHOT_TYPE,
        PromptField::CameraAngle => CAMERA_ANGLE,
        PromptField::Pose => POSE,
        PromptField::Background => BACKGROUND,
        PromptField::ArtStyle => ART_STYLE,
        PromptField::Lighting => LIGHTING,
        PromptField::ColorTone => COLOR_TONE,
    }
}

/// 按标签或取值查找预设（忽略大小写与首尾空白）。
#[must_use]
pub fn find_choice(field: PromptField, query: &str) -> Option<Choice> {
    let query = query.trim();
    choices(field)
        .iter()
        .find(|choice| {
            choice.label.eq_ignore_ascii_case(query) || choice.value.eq_ignore_ascii_case(query)
        })
        .copied()
}
