use crate::config::constants::compile_time;

/// Pipeline façade errors. These are caller-contract violations caught at
/// the boundary; the per-language cores themselves never fail on malformed
/// input.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Unsupported language: '{name}'")]
    UnsupportedLanguage { name: String },

    #[error("Input is {length} characters, minimum is {minimum}")]
    InputTooShort { length: usize, minimum: usize },

    #[error("Input is {length} bytes, maximum is {maximum}")]
    InputTooLarge { length: usize, maximum: usize },
}

impl PipelineError {
    pub fn input_too_short(length: usize) -> Self {
        Self::InputTooShort {
            length,
            minimum: compile_time::pipeline::MIN_SOURCE_LENGTH,
        }
    }

    pub fn input_too_large(length: usize) -> Self {
        Self::InputTooLarge {
            length,
            maximum: compile_time::lexical::MAX_SOURCE_SIZE,
        }
    }
}
