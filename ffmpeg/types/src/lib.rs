/*!
    Shared types for the frame extraction crates.

    This crate defines the vocabulary that crosses crate boundaries. It has
    no dependency on FFmpeg, so the pull scheduler and its tests can be
    written against it without linking any codec libraries.

    # Core Types

    - [`Rational`] and [`rescale`] - Time bases and timestamp rescaling
    - [`Pts`] - Timestamps in time_base units

    # Output Frames

    - [`VideoFrame`] - RGBA pixels with stride and millisecond timestamp
    - [`AudioFrame`] - Interleaved signed 16-bit PCM with millisecond timestamp

    # Stream Information

    - [`StreamInfo`] and [`AudioInfo`] - What an opened file contains

    # Demux Routing

    - [`StreamRole`] - Video, audio, or ignored
    - [`Demuxed`] - A routed packet or end of stream

    # Error Handling

    - [`Error`] and [`Result`] - Common error types
*/

mod error;
mod frame;
mod packet;
mod rational;
mod stream;
mod timestamp;

pub use error::{Error, Result};
pub use frame::{AudioFrame, BYTES_PER_PIXEL, BYTES_PER_SAMPLE, UNKNOWN_PTS, VideoFrame};
pub use packet::{Demuxed, StreamRole};
pub use rational::{Rational, rescale};
pub use stream::{AudioInfo, StreamInfo};
pub use timestamp::Pts;
