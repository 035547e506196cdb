pub mod content_service;
pub mod generation;

pub use content_service::ContentService;
pub use generation::{ContentGenerator, GenerationRequest, OpenAiContentGenerator};
