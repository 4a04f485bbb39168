//! Gemini wire types for prompt-studio.

pub mod config;
pub mod content;
pub mod models;
pub mod response;
