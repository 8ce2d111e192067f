mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{LoggingSettings, PipelineSettings, Settings, StorageSettings};
