//! Headless form session: image slots, preview handles, selections and generation state.

use std::path::Path;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::image::{guess_mime_type, EncodedImage};
use crate::options::{PromptField, PromptOptions};
use crate::prompts::Prompts;

/// 提交时缺少主图的提示。
pub const MISSING_PRIMARY_MESSAGE: &str = "Mohon upload gambar model utama terlebih dahulu.";

/// 图片槽位。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageSlot {
    /// 必填的整体角色参考图。
    Primary,
    /// 可选的脸部细节参考图。
    Face,
}

/// 用户上传的图片。
#[derive(Debug, Clone)]
pub struct ImageUpload {
    file_name: Option<String>,
    mime_type: String,
    bytes: Bytes,
}

impl ImageUpload {
    pub fn from_bytes(bytes: impl Into<Bytes>, mime_type: impl Into<String>) -> Self {
        Self {
            file_name: None,
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    /// 读取文件，媒体类型按扩展名推断。
    ///
    /// # Errors
    /// 当读取文件失败时返回错误。
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let upload = Self::from_bytes(bytes, guess_mime_type(path));
        Ok(match path.file_name().and_then(|name| name.to_str()) {
            Some(name) => upload.with_file_name(name),
            None => upload,
        })
    }

    #[must_use]
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[must_use]
    pub fn encode(&self) -> EncodedImage {
        EncodedImage::from_bytes(&self.bytes, self.mime_type.clone())
    }
}

/// 预览句柄的分配表。
#[derive(Debug, Default)]
pub struct PreviewRegistry {
    next_id: AtomicU64,
    live: AtomicUsize,
}

impl PreviewRegistry {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// 为上传的图片分配预览句柄。
    #[must_use]
    pub fn acquire(self: &Arc<Self>, upload: ImageUpload) -> Preview {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.live.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(preview = id, bytes = upload.len(), "preview acquired");
        Preview {
            id,
            upload,
            registry: Arc::clone(self),
            released: false,
        }
    }

    /// 尚未释放的句柄数量。
    #[must_use]
    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

/// 预览句柄，释放一次且仅一次：显式 `release` 或 drop。
#[derive(Debug)]
pub struct Preview {
    id: u64,
    upload: ImageUpload,
    registry: Arc<PreviewRegistry>,
    released: bool,
}

impl Preview {
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// 供前端展示的句柄地址。
    #[must_use]
    pub fn uri(&self) -> String {
        format!("preview://{}", self.id)
    }

    #[must_use]
    pub const fn upload(&self) -> &ImageUpload {
        &self.upload
    }

    pub fn release(mut self) {
        self.release_handle();
    }

    fn release_handle(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.registry.live.fetch_sub(1, Ordering::SeqCst);
        tracing::debug!(preview = self.id, "preview released");
    }
}

impl Drop for Preview {
    fn drop(&mut self) {
        self.release_handle();
    }
}

/// 生成状态。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GenerationState {
    #[default]
    Idle,
    Generating,
    Success(String),
    Failed(String),
}

/// 一次表单会话。
///
/// `submit` 期间独占会话；丢弃未完成的 `submit` future 会停留在 `Generating`，
/// 需要调用 [`FormSession::reset_state`]。
#[derive(Debug)]
pub struct FormSession {
    registry: Arc<PreviewRegistry>,
    primary: Option<Preview>,
    face: Option<Preview>,
    options: PromptOptions,
    state: GenerationState,
}

impl Default for FormSession {
    fn default() -> Self {
        Self::new()
    }
}

impl FormSession {
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(PreviewRegistry::new())
    }

    /// 使用共享的预览分配表。
    #[must_use]
    pub fn with_registry(registry: Arc<PreviewRegistry>) -> Self {
        Self {
            registry,
            primary: None,
            face: None,
            options: PromptOptions::default(),
            state: GenerationState::Idle,
        }
    }

    /// 设置或清空槽位；旧的预览句柄总是先被释放。
    pub fn set_image(&mut self, slot: ImageSlot, upload: Option<ImageUpload>) -> Option<&Preview> {
        if let Some(previous) = self.slot_mut(slot).take() {
            previous.release();
        }
        let preview = upload.map(|upload| self.registry.acquire(upload));
        let target = self.slot_mut(slot);
        *target = preview;
        target.as_ref()
    }

    pub fn clear_image(&mut self, slot: ImageSlot) {
        self.set_image(slot, None);
    }

    #[must_use]
    pub fn image(&self, slot: ImageSlot) -> Option<&Preview> {
        match slot {
            ImageSlot::Primary => self.primary.as_ref(),
            ImageSlot::Face => self.face.as_ref(),
        }
    }

    #[must_use]
    pub const fn options(&self) -> &PromptOptions {
        &self.options
    }

    pub fn set_option(&mut self, field: PromptField, value: impl Into<String>) {
        self.options.set(field, value);
    }

    pub fn set_additional_text(&mut self, text: impl Into<String>) {
        self.options.additional_text = text.into();
    }

    pub fn reset_options(&mut self) {
        self.options = PromptOptions::default();
    }

    #[must_use]
    pub const fn state(&self) -> &GenerationState {
        &self.state
    }

    #[must_use]
    pub const fn is_busy(&self) -> bool {
        matches!(self.state, GenerationState::Generating)
    }

    /// 唯一的错误区域。
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        match &self.state {
            GenerationState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// 仅在成功时可复制的 prompt。
    #[must_use]
    pub fn copyable_prompt(&self) -> Option<&str> {
        match &self.state {
            GenerationState::Success(text) => Some(text),
            _ => None,
        }
    }

    pub fn reset_state(&mut self) {
        self.state = GenerationState::Idle;
    }

    /// 会话所用分配表中尚未释放的句柄数量；分配表可被多个会话共享。
    #[must_use]
    pub fn live_previews(&self) -> usize {
        self.registry.live()
    }

    /// 提交生成：校验主图，依次编码主图与脸部图，调用一次模型。
    ///
    /// # Errors
    /// 正在生成时返回 `Error::Busy`，缺少主图时返回 `Error::Input`（不会发起调用），
    /// 其余错误来自 [`Prompts::generate`]。
    pub async fn submit(&mut self, prompts: &Prompts) -> Result<String> {
        if self.is_busy() {
            return Err(Error::Busy);
        }
        let primary = match &self.primary {
            Some(preview) => preview.upload().encode(),
            None => {
                tracing::info!("submit rejected: main image missing");
                self.state = GenerationState::Failed(MISSING_PRIMARY_MESSAGE.to_string());
                return Err(Error::Input {
                    message: MISSING_PRIMARY_MESSAGE.into(),
                });
            }
        };

        self.state = GenerationState::Generating;
        let face = self.face.as_ref().map(|preview| preview.upload().encode());
        tracing::info!(with_face = face.is_some(), "generation started");

        let result = prompts.generate(&primary, face.as_ref(), &self.options).await;
        self.state = match &result {
            Ok(text) => GenerationState::Success(text.clone()),
            Err(err) => GenerationState::Failed(err.user_message()),
        };
        tracing::info!(success = result.is_ok(), "generation finished");
        result
    }

    /// 结束会话并释放全部预览句柄。
    pub fn close(mut self) {
        self.clear_image(ImageSlot::Primary);
        self.clear_image(ImageSlot::Face);
    }

    fn slot_mut(&mut self, slot: ImageSlot) -> &mut Option<Preview> {
        match slot {
            ImageSlot::Primary => &mut self.primary,
            ImageSlot::Face => &mut self.face,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::GENERATION_FAILED_MESSAGE;
    use crate::test_support::{
        client_with_transport, response_with_parts, text_response, FakeReply, FakeTransport,
        TINY_PNG,
    };
    use tempfile::tempdir;

    fn png() -> ImageUpload {
        ImageUpload::from_bytes(TINY_PNG, "image/png")
    }

    #[test]
    fn test_replacing_an_image_releases_previous_preview() {
        let registry = PreviewRegistry::new();
        let mut session = FormSession::with_registry(registry.clone());

        let first = session.set_image(ImageSlot::Primary, Some(png())).unwrap().id();
        assert_eq!(registry.live(), 1);

        let second = session.set_image(ImageSlot::Primary, Some(png())).unwrap().id();
        assert_ne!(first, second);
        assert_eq!(registry.live(), 1);

        session.set_image(ImageSlot::Face, Some(png()));
        assert_eq!(registry.live(), 2);

        session.clear_image(ImageSlot::Primary);
        assert_eq!(registry.live(), 1);
        assert!(session.image(ImageSlot::Primary).is_none());
    }

    #[test]
    fn test_closing_and_dropping_release_everything() {
        let registry = PreviewRegistry::new();
        let mut session = FormSession::with_registry(registry.clone());
        session.set_image(ImageSlot::Primary, Some(png()));
        session.set_image(ImageSlot::Face, Some(png()));
        assert_eq!(session.live_previews(), 2);
        session.close();
        assert_eq!(registry.live(), 0);

        let mut dropped = FormSession::with_registry(registry.clone());
        dropped.set_image(ImageSlot::Primary, Some(png()));
        assert_eq!(dropped.live_previews(), 1);
        drop(dropped);
        assert_eq!(registry.live(), 0);
    }

    #[test]
    fn test_explicit_release_is_not_double_counted() {
        let registry = PreviewRegistry::new();
        let preview = registry.acquire(png());
        assert_eq!(preview.uri(), format!("preview://{}", preview.id()));
        preview.release();
        assert_eq!(registry.live(), 0);
    }

    #[tokio::test]
    async fn test_submit_without_primary_is_input_error_and_makes_no_call() {
        let transport = FakeTransport::replying(text_response("unused"));
        let client = client_with_transport("test-key", transport.clone());
        let mut session = FormSession::new();
        session.set_image(ImageSlot::Face, Some(png()));

        let err = session.submit(&client.prompts()).await.unwrap_err();
        assert!(matches!(err, Error::Input { .. }));
        assert_eq!(session.last_error(), Some(MISSING_PRIMARY_MESSAGE));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_successful_submit_clears_error_and_enables_copy() {
        let transport = FakeTransport::replying(text_response("portrait of a cyborg"));
        let client = client_with_transport("test-key", transport.clone());
        let mut session = FormSession::new();

        assert!(session.submit(&client.prompts()).await.is_err());
        assert!(session.last_error().is_some());

        session.set_image(ImageSlot::Primary, Some(png()));
        session.set_option(PromptField::Gender, "Cyborg");
        let text = session.submit(&client.prompts()).await.unwrap();

        assert_eq!(text, "portrait of a cyborg");
        assert_eq!(session.state(), &GenerationState::Success(text.clone()));
        assert!(session.last_error().is_none());
        assert_eq!(session.copyable_prompt(), Some("portrait of a cyborg"));

        let call = transport.last_call().unwrap();
        assert!(call.request.contents[0].parts[0]
            .text_value()
            .unwrap()
            .contains("- Gender: Cyborg"));
    }

    #[tokio::test]
    async fn test_failed_submit_exposes_error_and_no_copy() {
        let transport = FakeTransport::new(FakeReply::ApiError {
            status: 500,
            message: "internal".into(),
        });
        let client = client_with_transport("test-key", transport);
        let mut session = FormSession::new();
        session.set_image(ImageSlot::Primary, Some(png()));

        session.submit(&client.prompts()).await.unwrap_err();
        assert_eq!(session.last_error(), Some("internal"));
        assert!(session.copyable_prompt().is_none());
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn test_empty_reply_is_a_success_with_fallback_text() {
        let transport = FakeTransport::replying(response_with_parts(Vec::new()));
        let client = client_with_transport("test-key", transport);
        let mut session = FormSession::new();
        session.set_image(ImageSlot::Primary, Some(png()));

        let text = session.submit(&client.prompts()).await.unwrap();
        assert_eq!(text, GENERATION_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_busy_session_rejects_submit() {
        let transport = FakeTransport::replying(text_response("unused"));
        let client = client_with_transport("test-key", transport.clone());
        let mut session = FormSession::new();
        session.set_image(ImageSlot::Primary, Some(png()));
        session.state = GenerationState::Generating;

        let err = session.submit(&client.prompts()).await.unwrap_err();
        assert!(matches!(err, Error::Busy));
        assert_eq!(transport.calls(), 0);

        session.reset_state();
        assert!(session.submit(&client.prompts()).await.is_ok());
    }

    #[tokio::test]
    async fn test_upload_from_path_keeps_name_and_mime() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("face.webp");
        std::fs::write(&path, b"RIFF").unwrap();

        let upload = ImageUpload::from_path(&path).await.unwrap();
        assert_eq!(upload.file_name(), Some("face.webp"));
        assert_eq!(upload.mime_type(), "image/webp");
        assert_eq!(upload.len(), 4);
    }
}
