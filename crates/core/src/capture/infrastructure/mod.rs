#[cfg(feature = "ffmpeg")]
pub mod ffmpeg_capture;
