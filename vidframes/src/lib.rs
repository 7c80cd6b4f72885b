/*!
    Pull decoded frames out of media files, one at a time.

    Open a file, then call [`Video::next`] until it reports end of stream.
    Each call returns exactly one thing: an RGBA video frame, a block of
    signed 16-bit interleaved audio, or end of stream. Everything runs on
    the calling thread; a call blocks for as long as reading and decoding
    take.

    ```ignore
    use vidframes::{Next, Video};

    let mut video = Video::open("clip.video")?;
    let info = *video.info();
    println!("{}x{} at {} fps", info.width, info.height, info.fps().unwrap_or(0.0));

    loop {
        match video.next()? {
            Next::Video(frame) => { /* frame.data(), frame.stride, frame.pts_ms */ }
            Next::Audio(frame) => { /* frame.pcm(), frame.samples */ }
            Next::EndOfStream => break,
        }
    }

    // Back to the keyframe at or before two seconds in
    video.seek_ms(2_000)?;
    ```

    # Custom Container

    Files starting with a 16-byte `VID0` header are read through the
    payload the header describes; any other file goes straight to
    libavformat's format detection. [`probe_path`] tells the two apart
    without opening any codecs.

    # Frames

    Returned frames own their buffers. Call `release` to free a buffer
    early; releasing twice is harmless, and dropping a frame frees it too.
*/

use std::path::Path;

use ffmpeg_source::Demuxer;

mod config;
mod pipeline;
mod scheduler;
mod stage;

pub use config::{Config, FfmpegLogLevel};
pub use ffmpeg_decode::Submitted;
pub use ffmpeg_source::{Probe, probe_path};
pub use ffmpeg_types::{
    AudioFrame, AudioInfo, Demuxed, Error, Rational, Result, StreamInfo, StreamRole, UNKNOWN_PTS,
    VideoFrame,
};
pub use pipeline::{AudioStage, VideoStage};
pub use scheduler::{Next, Scheduler};
pub use stage::{FrameStage, PacketSource};

// Handles are moved onto worker threads by callers that want concurrency
static_assertions::assert_impl_all!(Video: Send);

/// Channel count reported when the audio codec does not state one.
const FALLBACK_CHANNELS: u16 = 2;

/**
    An open media file producing frames on demand.

    Dropping the handle, or calling [`Video::close`], releases the stages
    and then the container.
*/
pub struct Video {
    scheduler: Scheduler<Demuxer, VideoStage, AudioStage>,
    info: StreamInfo,
    last_error: String,
}

impl Video {
    /**
        Open the file at `path` with default settings.
    */
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, Config::default())
    }

    /**
        Open the file at `path`.

        Fails if the file has no video stream, or if either the video or
        the audio stream uses a codec that cannot be decoded.
    */
    pub fn open_with(path: impl AsRef<Path>, config: Config) -> Result<Self> {
        let path = path.as_ref();
        if let Some(level) = config.ffmpeg_log_level {
            ffmpeg_next::util::log::set_level(level);
        }

        let demuxer = Demuxer::open(path)?;
        let video = VideoStage::open(&demuxer, config.trace_frames)?;
        let audio = AudioStage::open(&demuxer, config.trace_frames)?;

        let info = StreamInfo {
            width: video.width(),
            height: video.height(),
            frame_rate: demuxer.frame_rate(),
            duration_ms: demuxer.duration_ms(),
            video_time_base: demuxer.video_time_base(),
            audio: audio.as_ref().map(|audio| AudioInfo {
                sample_rate: audio.sample_rate(),
                channels: match audio.channels() {
                    0 => FALLBACK_CHANNELS,
                    n => n,
                },
                time_base: audio.time_base(),
            }),
        };

        tracing::info!(
            path = %path.display(),
            width = info.width,
            height = info.height,
            frame_rate = %info.frame_rate,
            duration_ms = info.duration_ms,
            has_audio = info.has_audio(),
            custom_container = demuxer.is_custom_container(),
            payload_size = ?demuxer.payload_size(),
            "video opened"
        );

        Ok(Self {
            scheduler: Scheduler::new(demuxer, video, audio),
            info,
            last_error: String::new(),
        })
    }

    /**
        What the file contains, as determined at open.
    */
    pub fn info(&self) -> &StreamInfo {
        &self.info
    }

    /**
        Produce the next video frame, audio frame, or end of stream.

        Video timestamps never decrease between seeks. After end of stream,
        every call reports end of stream again until a seek.
    */
    pub fn next(&mut self) -> Result<Next> {
        let result = self.scheduler.next();
        self.record(result)
    }

    /**
        Seek to the keyframe at or before `target_ms`.

        A failed seek leaves the handle usable; playback continues from
        wherever the container ended up.
    */
    pub fn seek_ms(&mut self, target_ms: i64) -> Result<()> {
        let result = self.scheduler.seek_ms(target_ms);
        if result.is_ok() {
            tracing::debug!(target_ms, "seeked");
        }
        self.record(result)
    }

    /**
        Message of the most recent error returned by this handle, or an
        empty string if there has been none.
    */
    pub fn last_error(&self) -> &str {
        &self.last_error
    }

    /**
        Close the file, releasing every stage.
    */
    pub fn close(self) {
        drop(self);
    }

    fn record<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            tracing::warn!(error = %e, "video operation failed");
            self.last_error = e.to_string();
        }
        result
    }
}

impl std::fmt::Debug for Video {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Video")
            .field("info", &self.info)
            .field("scheduler", &self.scheduler)
            .field("last_error", &self.last_error)
            .finish()
    }
}
