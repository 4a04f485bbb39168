//! Character prompt generation on top of the Gemini `generateContent` API.
//!
//! A [`FormSession`] collects a main character image, an optional face reference and
//! per-field attribute selections; [`Prompts`] compiles them into a multimodal request
//! and turns the reply into one English text-to-image prompt.

pub mod catalog;
pub mod client;
pub mod error;
pub mod image;
pub mod normalize;
pub mod options;
pub mod prompts;
pub mod request;
pub mod session;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use prompt_studio_types as types;

pub use catalog::{choices, find_choice, Choice};
pub use client::{Client, ClientBuilder, ClientConfig, Credentials, HttpOptions};
pub use error::{Error, Result};
pub use image::EncodedImage;
pub use normalize::{normalize, NormalizedResponse, GENERATION_FAILED_MESSAGE};
pub use options::{PromptField, PromptOptions};
pub use prompts::{GeneratedPrompt, Prompts};
pub use session::{FormSession, GenerationState, ImageSlot, ImageUpload, Preview, PreviewRegistry};
pub use transport::{HttpTransport, ModelCall, Transport};
