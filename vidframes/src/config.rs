/*!
    Options applied when opening a file.
*/

pub use ffmpeg_next::util::log::Level as FfmpegLogLevel;

/**
    Configuration for [`crate::Video::open_with`].
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Emit a `tracing` event for every frame handed out.
    pub trace_frames: bool,
    /// Verbosity for libav's own logger, applied at open. `None` leaves it untouched.
    pub ffmpeg_log_level: Option<FfmpegLogLevel>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trace_frames: false,
            ffmpeg_log_level: Some(FfmpegLogLevel::Error),
        }
    }
}

impl Config {
    /**
        Create a new config with default settings.
    */
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trace_frames(mut self, enabled: bool) -> Self {
        self.trace_frames = enabled;
        self
    }

    /**
        Set libav's log level.

        The level is process-wide in libav, so the last handle opened with
        a level wins.
    */
    pub fn with_ffmpeg_log_level(mut self, level: Option<FfmpegLogLevel>) -> Self {
        self.ffmpeg_log_level = level;
        self
    }
}
