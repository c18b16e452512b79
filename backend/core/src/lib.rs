pub mod error;
pub mod prompt;
pub mod session;
pub mod traits;
pub mod types;

pub use error::{ProviderError, RecognizeError};
pub use prompt::PromptTemplate;
pub use session::{MetadataSource, SessionTracker, SystemMetadataSource};
pub use traits::{RecognitionProvider, RecognitionRequest};
pub use types::{
    ImagePayload, OutputMode, RecognitionResult, SessionMetadata, SessionReset,
    DEFAULT_MIME_TYPE,
};
