//! Instruction templates sent alongside the image, one per output mode.

use crate::types::OutputMode;

const TEXT_INSTRUCTION: &str = "Extract the text content in this image, don't include any additional \
information. Preserve the original line breaks and reading order. Return only the extracted text.";

const JSON_INSTRUCTION: &str = "Extract the text content in this image and return it as JSON. \
Follow these rules:\n\
1. Respond with a single valid JSON value and nothing else, no commentary.\n\
2. Use descriptive snake_case keys for labelled fields (for example \"title\", \"date\", \"total\").\n\
3. Represent tables and repeated rows as arrays of objects.\n\
4. Keep numbers as JSON numbers and preserve the original spelling of all text values.\n\
5. If the image contains free-form text only, return {\"text\": \"<the extracted text>\"}.";

/// A fixed instruction associated with an [`OutputMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    pub mode: OutputMode,
    pub text: &'static str,
}

impl PromptTemplate {
    pub fn for_mode(mode: OutputMode) -> Self {
        let text = match mode {
            OutputMode::Text => TEXT_INSTRUCTION,
            OutputMode::Json => JSON_INSTRUCTION,
        };
        Self { mode, text }
    }
}

impl OutputMode {
    pub fn prompt(&self) -> &'static str {
        PromptTemplate::for_mode(*self).text
    }
}
