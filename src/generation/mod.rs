//! Image generation gateway.
//!
//! - [`build_prompt`] - Deterministic prompt from content, theme, size, genre and instruction
//! - [`ImageModel`] - Seam to the external model; [`GeminiClient`] is the real one
//! - [`GenerationService`] - Validates requests, calls the model under a timeout and
//!   records the result in the catalog

mod client;
mod prompt;
mod service;
mod types;

pub use client::{GeminiClient, ImageModel, ModelImage, ModelRequest};
pub use prompt::build_prompt;
pub use service::GenerationService;
pub use types::{EditRequest, GenerateRequest, GeneratedImage};
