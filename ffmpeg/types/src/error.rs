/*!
    Error types for the frame extraction crates.
*/

use thiserror::Error as ThisError;

/**
    Error type shared by every stage of the frame extraction pipeline.

    Each variant carries a human-readable message. Errors coming out of
    FFmpeg are rendered as `"<context>: <ffmpeg message>"`.
*/
#[derive(Debug, ThisError)]
pub enum Error {
    /// I/O error (file not found, short read, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The file carries the custom container magic but its header is unusable.
    #[error("invalid container header: {message}")]
    ContainerInvalid { message: String },
    /// The demuxer could not open or parse the container.
    #[error("{message}")]
    ContainerOpen { message: String },
    /// The demuxer opened the container but could not read stream parameters.
    #[error("{message}")]
    StreamInfo { message: String },
    /// No decodable video stream was found.
    #[error("no video stream found")]
    NoVideoStream,
    /// A decoder could not be found or initialized for a selected stream.
    #[error("{message}")]
    DecoderInit { message: String },
    /// Mid-stream decode failure.
    #[error("{message}")]
    Decode { message: String },
    /// Scaling or resampling failure.
    #[error("{message}")]
    Convert { message: String },
    /// The demuxer rejected a seek target.
    #[error("{message}")]
    Seek { message: String },
    /// Reading the next packet from the container failed.
    #[error("{message}")]
    DemuxRead { message: String },
}

impl Error {
    /**
        Create a container-invalid error with the given message.
    */
    pub fn container_invalid(message: impl Into<String>) -> Self {
        Self::ContainerInvalid {
            message: message.into(),
        }
    }

    /**
        Create a container-open error with the given message.
    */
    pub fn container_open(message: impl Into<String>) -> Self {
        Self::ContainerOpen {
            message: message.into(),
        }
    }

    /**
        Create a stream-info error with the given message.
    */
    pub fn stream_info(message: impl Into<String>) -> Self {
        Self::StreamInfo {
            message: message.into(),
        }
    }

    /**
        Create a decoder initialization error with the given message.
    */
    pub fn decoder_init(message: impl Into<String>) -> Self {
        Self::DecoderInit {
            message: message.into(),
        }
    }

    /**
        Create a decode error with the given message.
    */
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /**
        Create a conversion error with the given message.
    */
    pub fn convert(message: impl Into<String>) -> Self {
        Self::Convert {
            message: message.into(),
        }
    }

    /**
        Create a seek error with the given message.
    */
    pub fn seek(message: impl Into<String>) -> Self {
        Self::Seek {
            message: message.into(),
        }
    }

    /**
        Create a demux read error with the given message.
    */
    pub fn demux_read(message: impl Into<String>) -> Self {
        Self::DemuxRead {
            message: message.into(),
        }
    }
}

/**
    Result type alias for the frame extraction crates.
*/
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn error_display() {
        let e = Error::container_invalid("unsupported version 2");
        assert_eq!(
            format!("{e}"),
            "invalid container header: unsupported version 2"
        );

        let e = Error::decode("video receive_frame failed: Invalid data");
        assert_eq!(format!("{e}"), "video receive_frame failed: Invalid data");

        let e = Error::NoVideoStream;
        assert_eq!(format!("{e}"), "no video stream found");
    }

    #[test]
    fn error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let e: Error = io_err.into();
        assert!(matches!(e, Error::Io(_)));
        assert!(format!("{e}").contains("file not found"));
    }

    #[test]
    fn error_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let e = Error::Io(io_err);
        assert!(StdError::source(&e).is_some());

        let e = Error::convert("swr_convert returned 0 samples");
        assert!(StdError::source(&e).is_none());
    }
}
