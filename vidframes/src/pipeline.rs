/*!
    FFmpeg-backed implementations of the stage traits.
*/

use ffmpeg_next::Packet;

use ffmpeg_decode::{AudioDecoder, Submitted, VideoDecoder};
use ffmpeg_source::Demuxer;
use ffmpeg_transform::{AudioTransform, VideoTransform};
use ffmpeg_types::{AudioFrame, Demuxed, Error, Result, VideoFrame};

use crate::stage::{FrameStage, PacketSource};

impl PacketSource for Demuxer {
    type Packet = Packet;

    fn next_packet(&mut self) -> Result<Demuxed<Packet>> {
        Demuxer::next_packet(self)
    }

    fn seek_ms(&mut self, target_ms: i64) -> Result<()> {
        Demuxer::seek_ms(self, target_ms)
    }
}

/**
    Video decoder followed by RGBA conversion.
*/
#[derive(Debug)]
pub struct VideoStage {
    decoder: VideoDecoder,
    transform: VideoTransform,
    trace_frames: bool,
}

impl VideoStage {
    /**
        Open a decoder for the demuxer's video stream.
    */
    pub fn open(demuxer: &Demuxer, trace_frames: bool) -> Result<Self> {
        let decoder = VideoDecoder::new(demuxer.video_parameters()?, demuxer.video_time_base())?;
        Ok(Self {
            decoder,
            transform: VideoTransform::new(),
            trace_frames,
        })
    }

    pub fn width(&self) -> u32 {
        self.decoder.width()
    }

    pub fn height(&self) -> u32 {
        self.decoder.height()
    }
}

impl FrameStage for VideoStage {
    type Packet = Packet;
    type Output = VideoFrame;

    fn submit(&mut self, packet: &Packet) -> Result<Submitted> {
        self.decoder.submit(packet)
    }

    fn try_take(&mut self) -> Result<Option<VideoFrame>> {
        let Some(raw) = self.decoder.try_take_frame()? else {
            return Ok(None);
        };

        let frame = self.transform.convert(&raw, self.decoder.time_base())?;
        if self.trace_frames {
            tracing::debug!(
                width = frame.width,
                height = frame.height,
                stride = frame.stride,
                pts_ms = frame.pts_ms_or_unknown(),
                "video frame"
            );
        }
        Ok(Some(frame))
    }

    fn submit_end_of_stream(&mut self) -> Result<()> {
        self.decoder.submit_end_of_stream()
    }

    fn flush(&mut self) {
        self.decoder.flush();
    }
}

/**
    Audio decoder followed by S16 interleaved conversion.
*/
#[derive(Debug)]
pub struct AudioStage {
    decoder: AudioDecoder,
    transform: AudioTransform,
    trace_frames: bool,
}

impl AudioStage {
    /**
        Open a decoder for the demuxer's audio stream, if it has one.
    */
    pub fn open(demuxer: &Demuxer, trace_frames: bool) -> Result<Option<Self>> {
        let (Some(parameters), Some(time_base)) =
            (demuxer.audio_parameters(), demuxer.audio_time_base())
        else {
            return Ok(None);
        };

        let decoder = AudioDecoder::new(parameters, time_base)?;
        let transform = AudioTransform::new(
            decoder.format(),
            decoder.sample_rate(),
            decoder.channels(),
        )
        .map_err(|e| Error::decoder_init(format!("audio converter setup failed: {e}")))?;

        Ok(Some(Self {
            decoder,
            transform,
            trace_frames,
        }))
    }

    pub fn sample_rate(&self) -> u32 {
        self.decoder.sample_rate()
    }

    pub fn channels(&self) -> u16 {
        self.decoder.channels()
    }

    pub fn time_base(&self) -> ffmpeg_types::Rational {
        self.decoder.time_base()
    }
}

impl FrameStage for AudioStage {
    type Packet = Packet;
    type Output = AudioFrame;

    fn submit(&mut self, packet: &Packet) -> Result<Submitted> {
        self.decoder.submit(packet)
    }

    fn try_take(&mut self) -> Result<Option<AudioFrame>> {
        let Some(raw) = self.decoder.try_take_frame()? else {
            return Ok(None);
        };

        let frame = self.transform.convert(&raw, self.decoder.time_base())?;
        if self.trace_frames {
            tracing::debug!(
                samples = frame.samples,
                channels = frame.channels,
                sample_rate = frame.sample_rate,
                pts_ms = frame.pts_ms_or_unknown(),
                "audio frame"
            );
        }
        Ok(Some(frame))
    }

    fn submit_end_of_stream(&mut self) -> Result<()> {
        self.decoder.submit_end_of_stream()
    }

    fn flush(&mut self) {
        self.decoder.flush();
        self.transform.reset();
    }
}
