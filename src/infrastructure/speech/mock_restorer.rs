use crate::application::ports::{PunctuationRestorer, RestorationError};

enum Mode {
    /// Return the input unchanged.
    Passthrough,
    /// Capitalize the first letter and terminate with a period.
    Sentence,
    /// Fail every call.
    Failing,
}

/// Scripted punctuation restorer for tests and model-less wiring.
pub struct MockPunctuationRestorer {
    mode: Mode,
}

impl MockPunctuationRestorer {
    pub fn passthrough() -> Self {
        Self {
            mode: Mode::Passthrough,
        }
    }

    pub fn sentence() -> Self {
        Self {
            mode: Mode::Sentence,
        }
    }

    pub fn failing() -> Self {
        Self { mode: Mode::Failing }
    }
}

#[async_trait::async_trait]
impl PunctuationRestorer for MockPunctuationRestorer {
    async fn restore(&self, raw: &str) -> Result<String, RestorationError> {
        match self.mode {
            Mode::Passthrough => Ok(raw.to_string()),
            Mode::Sentence => {
                let mut chars = raw.chars();
                let restored = match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                };
                Ok(format!("{}.", restored))
            }
            Mode::Failing => Err(RestorationError::RestorationFailed(
                "mock restorer configured to fail".to_string(),
            )),
        }
    }
}
