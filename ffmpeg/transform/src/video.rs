/*!
    Video frame conversion to RGBA.
*/

use ffmpeg_next::{
    format::Pixel,
    software::scaling::{Context as Scaler, Flags},
    util::frame::video::Video as VideoFrameFFmpeg,
};

use ffmpeg_types::{Error, Pts, Rational, Result, VideoFrame};

/// Input shape a scaler was built for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ScalerKey {
    width: u32,
    height: u32,
    format: Pixel,
}

/**
    Converts decoded video frames to RGBA at their own dimensions.

    The scaler is built on the first frame and rebuilt whenever the width,
    height or pixel format of the input changes.
*/
#[derive(Default)]
pub struct VideoTransform {
    scaler: Option<(ScalerKey, Scaler)>,
}

impl VideoTransform {
    pub fn new() -> Self {
        Self::default()
    }

    /**
        Convert one decoded frame.

        The timestamp is the frame's best-effort timestamp rescaled from
        `time_base` to milliseconds. Rows in the output keep the scaler's
        line size, which may be wider than `width * 4`.
    */
    pub fn convert(&mut self, frame: &VideoFrameFFmpeg, time_base: Rational) -> Result<VideoFrame> {
        let (width, height) = (frame.width(), frame.height());
        if width == 0 || height == 0 {
            return Err(Error::convert(format!(
                "video frame has invalid dimensions {width}x{height}"
            )));
        }

        let key = ScalerKey {
            width,
            height,
            format: frame.format(),
        };
        let scaler = self.scaler_for(key)?;

        let mut rgba = VideoFrameFFmpeg::empty();
        scaler
            .run(frame, &mut rgba)
            .map_err(|e| Error::convert(format!("sws_scale failed: {e}")))?;

        let stride = rgba.stride(0);
        let len = stride * height as usize;
        let plane = rgba.data(0);
        if plane.len() < len {
            return Err(Error::convert(format!(
                "rgba plane holds {} bytes, expected {len}",
                plane.len()
            )));
        }

        let pts_ms = frame.timestamp().map(|ts| Pts(ts).to_millis(time_base));
        Ok(VideoFrame::new(plane[..len].to_vec(), width, height, stride, pts_ms))
    }

    fn scaler_for(&mut self, key: ScalerKey) -> Result<&mut Scaler> {
        let stale = !matches!(&self.scaler, Some((cached, _)) if *cached == key);
        if stale {
            tracing::debug!(
                width = key.width,
                height = key.height,
                format = ?key.format,
                "building rgba scaler"
            );
            let scaler = Scaler::get(
                key.format,
                key.width,
                key.height,
                Pixel::RGBA,
                key.width,
                key.height,
                Flags::BILINEAR,
            )
            .map_err(|e| Error::convert(format!("sws_getContext failed: {e}")))?;
            self.scaler = Some((key, scaler));
        }

        match &mut self.scaler {
            Some((_, scaler)) => Ok(scaler),
            None => Err(Error::convert("scaler unavailable")),
        }
    }
}

// SAFETY: The SwsContext is owned exclusively and only used through &mut self.
unsafe impl Send for VideoTransform {}

impl std::fmt::Debug for VideoTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoTransform")
            .field("scaler", &self.scaler.as_ref().map(|(key, _)| key))
            .finish()
    }
}
