/*!
    Audio frame conversion to interleaved signed 16-bit PCM.
*/

use std::ffi::c_int;
use std::ptr;

use ffmpeg_next::{ffi, format::Sample, util::frame::audio::Audio as AudioFrameFFmpeg};

use ffmpeg_types::{AudioFrame, BYTES_PER_SAMPLE, Error, Pts, Rational, Result};

/// Channel count used when neither the frame nor the decoder reports one.
const FALLBACK_CHANNELS: u16 = 2;

/// Input shape a resampler was built for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ResamplerKey {
    format: Sample,
    rate: u32,
    channels: u16,
}

/**
    Owned `SwrContext` converting one input shape to S16 interleaved at the
    same rate and channel count.
*/
struct Resampler {
    ctx: *mut ffi::SwrContext,
}

impl Resampler {
    fn new(key: ResamplerKey) -> Result<Self> {
        let rate = key.rate as c_int;

        unsafe {
            let mut layout: ffi::AVChannelLayout = std::mem::zeroed();
            ffi::av_channel_layout_default(&mut layout, key.channels as c_int);

            let mut ctx: *mut ffi::SwrContext = ptr::null_mut();
            let ret = ffi::swr_alloc_set_opts2(
                &mut ctx,
                &layout,
                ffi::AVSampleFormat::AV_SAMPLE_FMT_S16,
                rate,
                &layout,
                key.format.into(),
                rate,
                0,
                ptr::null_mut(),
            );
            ffi::av_channel_layout_uninit(&mut layout);

            if ret < 0 || ctx.is_null() {
                ffi::swr_free(&mut ctx);
                return Err(Error::convert(format!(
                    "swr_alloc_set_opts2 failed: {}",
                    ffmpeg_next::Error::from(ret)
                )));
            }

            let ret = ffi::swr_init(ctx);
            if ret < 0 {
                ffi::swr_free(&mut ctx);
                return Err(Error::convert(format!(
                    "swr_init failed: {}",
                    ffmpeg_next::Error::from(ret)
                )));
            }

            Ok(Self { ctx })
        }
    }

    /// Samples buffered inside the resampler, in units of `rate`.
    fn delay(&self, rate: u32) -> i64 {
        unsafe { ffi::swr_get_delay(self.ctx, rate as i64) }
    }
}

impl Drop for Resampler {
    fn drop(&mut self) {
        unsafe { ffi::swr_free(&mut self.ctx) };
    }
}

/**
    Converts decoded audio frames to interleaved S16 PCM.

    No rate or channel conversion takes place; only the sample format and
    layout change. The resampler is built once the input format is known
    and rebuilt if a frame arrives in a different shape.
*/
pub struct AudioTransform {
    resampler: Option<(ResamplerKey, Resampler)>,
    rate_hint: u32,
    channels_hint: u16,
}

impl AudioTransform {
    /**
        Create a transform for a stream whose decoder reports `format`,
        `sample_rate` and `channels`.

        When the format is already known the resampler is built right away.
        The rate and channel count also serve as fallbacks for frames that
        do not carry their own.
    */
    pub fn new(format: Sample, sample_rate: u32, channels: u16) -> Result<Self> {
        let mut transform = Self {
            resampler: None,
            rate_hint: sample_rate,
            channels_hint: channels,
        };

        if format != Sample::None && sample_rate > 0 {
            let key = ResamplerKey {
                format,
                rate: sample_rate,
                channels: resolve_channels(0, channels),
            };
            transform.resampler_for(key)?;
        }

        Ok(transform)
    }

    /**
        Convert one decoded frame.

        The returned frame's buffer is sized for the resampler's worst case
        output; `samples` holds the count actually produced. Producing no
        samples at all is an error.
    */
    pub fn convert(&mut self, frame: &AudioFrameFFmpeg, time_base: Rational) -> Result<AudioFrame> {
        let (frame_rate, frame_channels) = unsafe {
            let raw = &*frame.as_ptr();
            (raw.sample_rate, raw.ch_layout.nb_channels)
        };

        let rate = if frame_rate > 0 {
            frame_rate as u32
        } else {
            self.rate_hint
        };
        let channels = resolve_channels(frame_channels, self.channels_hint);
        let samples = frame.samples();
        if rate == 0 || samples == 0 {
            return Err(Error::convert(format!(
                "invalid audio frame: {samples} samples at {rate} Hz"
            )));
        }

        let key = ResamplerKey {
            format: frame.format(),
            rate,
            channels,
        };
        let resampler = self.resampler_for(key)?;

        let max = max_output_samples(resampler.delay(rate), samples, rate, rate);
        let mut data = vec![0u8; max * channels as usize * BYTES_PER_SAMPLE];

        let converted = unsafe {
            let mut out = data.as_mut_ptr();
            ffi::swr_convert(
                resampler.ctx,
                &mut out as *mut *mut u8 as _,
                max as c_int,
                (*frame.as_ptr()).extended_data as _,
                samples as c_int,
            )
        };
        if converted < 0 {
            return Err(Error::convert(format!(
                "swr_convert failed: {}",
                ffmpeg_next::Error::from(converted)
            )));
        }
        if converted == 0 {
            return Err(Error::convert("swr_convert returned 0 samples"));
        }

        let pts_ms = frame.timestamp().map(|ts| Pts(ts).to_millis(time_base));
        Ok(AudioFrame::new(data, rate, channels, converted as usize, pts_ms))
    }

    /**
        Drop the resampler, discarding any samples it still buffers.
    */
    pub fn reset(&mut self) {
        self.resampler = None;
    }

    fn resampler_for(&mut self, key: ResamplerKey) -> Result<&mut Resampler> {
        let stale = !matches!(&self.resampler, Some((cached, _)) if *cached == key);
        if stale {
            tracing::debug!(
                format = ?key.format,
                rate = key.rate,
                channels = key.channels,
                "building s16 resampler"
            );
            self.resampler = Some((key, Resampler::new(key)?));
        }

        match &mut self.resampler {
            Some((_, resampler)) => Ok(resampler),
            None => Err(Error::convert("resampler unavailable")),
        }
    }
}

impl std::fmt::Debug for AudioTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioTransform")
            .field("resampler", &self.resampler.as_ref().map(|(key, _)| key))
            .field("rate_hint", &self.rate_hint)
            .field("channels_hint", &self.channels_hint)
            .finish()
    }
}

// SAFETY: The SwrContext is owned exclusively and only used through &mut self.
unsafe impl Send for AudioTransform {}

/**
    Pick the channel count for a frame: its own, else the decoder's, else stereo.
*/
fn resolve_channels(frame_channels: c_int, decoder_channels: u16) -> u16 {
    if frame_channels > 0 {
        frame_channels as u16
    } else if decoder_channels > 0 {
        decoder_channels
    } else {
        FALLBACK_CHANNELS
    }
}

/**
    Upper bound on samples one conversion can produce.

    Buffered delay plus the new input, rescaled from the input rate to the
    output rate and rounded up. Falls back to `samples` if that comes out
    non-positive.
*/
fn max_output_samples(delay: i64, samples: usize, in_rate: u32, out_rate: u32) -> usize {
    let pending = delay as i128 + samples as i128;
    let max = if in_rate == 0 {
        0
    } else {
        let num = pending * out_rate as i128;
        let den = in_rate as i128;
        // Round toward positive infinity
        num.div_euclid(den) + i128::from(num.rem_euclid(den) != 0)
    };

    if max > 0 {
        usize::try_from(max).unwrap_or(samples)
    } else {
        samples
    }
}
