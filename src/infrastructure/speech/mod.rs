mod mock_cloner;
mod mock_restorer;
mod mock_transcriber;

pub use mock_cloner::MockVoiceCloner;
pub use mock_restorer::MockPunctuationRestorer;
pub use mock_transcriber::MockTranscriber;
