/*!
    Presentation-ready frame types.

    Frames returned to callers own their buffers outright. A frame may be
    released explicitly with `release`, which frees the buffer and clears
    the descriptor; releasing twice is a no-op. Dropping a frame releases
    it as well.
*/

use crate::{Rational, rational::rescale};

/**
    Marker used where a presentation timestamp is unknown and an integer
    must be reported anyway.
*/
pub const UNKNOWN_PTS: i64 = -1;

/**
    Bytes per output audio sample (signed 16-bit).
*/
pub const BYTES_PER_SAMPLE: usize = 2;

/**
    Bytes per output pixel (RGBA).
*/
pub const BYTES_PER_PIXEL: usize = 4;

/**
    A decoded video frame converted to packed RGBA.

    Rows are `stride` bytes apart; `stride` is chosen by the converter and
    may exceed `width * 4`.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoFrame {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Distance between rows in bytes.
    pub stride: usize,
    /// Presentation timestamp in milliseconds (None when unknown).
    pub pts_ms: Option<i64>,
    data: Option<Vec<u8>>,
}

impl VideoFrame {
    /**
        Create a new video frame owning `data`.
    */
    pub fn new(data: Vec<u8>, width: u32, height: u32, stride: usize, pts_ms: Option<i64>) -> Self {
        Self {
            width,
            height,
            stride,
            pts_ms,
            data: Some(data),
        }
    }

    /**
        Returns the RGBA buffer, or None once released.
    */
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /**
        Takes the RGBA buffer out of the frame, leaving it released.
    */
    pub fn take_data(&mut self) -> Option<Vec<u8>> {
        let data = self.data.take();
        self.clear();
        data
    }

    /**
        Returns one row of pixels without the stride padding.

        None if the row falls outside the buffer.
    */
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = (y as usize).checked_mul(self.stride)?;
        let len = (self.width as usize).checked_mul(BYTES_PER_PIXEL)?;
        self.data()?.get(start..start.checked_add(len)?)
    }

    /**
        Returns the timestamp, or [`UNKNOWN_PTS`] if it is not known.
    */
    pub fn pts_ms_or_unknown(&self) -> i64 {
        self.pts_ms.unwrap_or(UNKNOWN_PTS)
    }

    /**
        Frees the buffer and clears the descriptor.

        Calling this on an already released frame does nothing.
    */
    pub fn release(&mut self) {
        self.data = None;
        self.clear();
    }

    /**
        Returns true once the buffer has been released.
    */
    pub fn is_released(&self) -> bool {
        self.data.is_none()
    }

    fn clear(&mut self) {
        self.width = 0;
        self.height = 0;
        self.stride = 0;
        self.pts_ms = None;
    }
}

/**
    A decoded audio frame converted to interleaved signed 16-bit PCM.

    The buffer is sized for the most samples the resampler could have
    produced, which can be more than it did produce. Only the first
    `samples * channels * 2` bytes are meaningful; use [`AudioFrame::pcm`].
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioFrame {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Number of interleaved channels.
    pub channels: u16,
    /// Number of converted samples per channel.
    pub samples: usize,
    /// Presentation timestamp in milliseconds (None when unknown).
    pub pts_ms: Option<i64>,
    data: Option<Vec<u8>>,
}

impl AudioFrame {
    /**
        Create a new audio frame owning `data`.
    */
    pub fn new(
        data: Vec<u8>,
        sample_rate: u32,
        channels: u16,
        samples: usize,
        pts_ms: Option<i64>,
    ) -> Self {
        Self {
            sample_rate,
            channels,
            samples,
            pts_ms,
            data: Some(data),
        }
    }

    /**
        Bytes per sample, fixed at 2 for signed 16-bit output.
    */
    pub const fn bytes_per_sample(&self) -> usize {
        BYTES_PER_SAMPLE
    }

    /**
        Returns the number of meaningful bytes in the buffer.
    */
    pub fn pcm_len(&self) -> usize {
        self.samples * self.channels as usize * BYTES_PER_SAMPLE
    }

    /**
        Returns the converted samples as bytes, or None once released.
    */
    pub fn pcm(&self) -> Option<&[u8]> {
        let data = self.data.as_deref()?;
        data.get(..self.pcm_len())
    }

    /**
        Returns the whole buffer, including any unused tail.
    */
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /**
        Returns the converted samples decoded into `i16` values.
    */
    pub fn to_i16_samples(&self) -> Vec<i16> {
        self.pcm()
            .map(|bytes| {
                bytes
                    .chunks_exact(BYTES_PER_SAMPLE)
                    .map(|pair| i16::from_ne_bytes([pair[0], pair[1]]))
                    .collect()
            })
            .unwrap_or_default()
    }

    /**
        Returns the playback length of this frame in milliseconds.
    */
    pub fn duration_ms(&self) -> i64 {
        if self.sample_rate == 0 {
            return 0;
        }
        rescale(
            self.samples as i64,
            Rational::new(1, self.sample_rate as i32),
            Rational::MILLIS,
        )
    }

    /**
        Returns the timestamp, or [`UNKNOWN_PTS`] if it is not known.
    */
    pub fn pts_ms_or_unknown(&self) -> i64 {
        self.pts_ms.unwrap_or(UNKNOWN_PTS)
    }

    /**
        Frees the buffer and clears the descriptor.

        Calling this on an already released frame does nothing.
    */
    pub fn release(&mut self) {
        self.data = None;
        self.sample_rate = 0;
        self.channels = 0;
        self.samples = 0;
        self.pts_ms = None;
    }

    /**
        Returns true once the buffer has been released.
    */
    pub fn is_released(&self) -> bool {
        self.data.is_none()
    }
}

// Frames cross to whatever thread the caller schedules playback on
static_assertions::assert_impl_all!(VideoFrame: Send, Sync);
static_assertions::assert_impl_all!(AudioFrame: Send, Sync);
