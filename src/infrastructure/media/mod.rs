mod ffmpeg;
mod mock;

pub use ffmpeg::{FfmpegAudioExtractor, FfmpegVideoMuxer};
pub use mock::{MockAudioExtractor, MockVideoMuxer};
