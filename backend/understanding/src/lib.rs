//! Image-to-text recognition against hosted multimodal models.
//!
//! [`RecognitionClient`] is the entry point; providers live under
//! [`providers`].

pub mod client;
pub mod fence;
pub mod providers;

pub use client::{RecognitionClient, RecognitionOptions};
pub use fence::{parse_json_document, strip_json_fence};
pub use providers::{
    build_provider, GeminiProvider, MockProvider, OpenAiProvider, ProviderKind, ProviderSettings,
};
