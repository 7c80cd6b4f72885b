/*!
    Audio decoder implementation.
*/

use ffmpeg_next::{
    Packet, codec,
    codec::decoder::Audio as AudioDecoderFFmpeg,
    format::Sample,
    util::frame::audio::Audio as AudioFrameFFmpeg,
};

use ffmpeg_types::{Error, Rational, Result};

use crate::session::{self, DecodeState, Received, StateTracker, Submitted};

const KIND: &str = "audio";

/**
    Audio decoder.

    Same submit/take protocol as [`crate::VideoDecoder`], producing raw
    audio frames in the codec's native sample format.
*/
pub struct AudioDecoder {
    decoder: AudioDecoderFFmpeg,
    time_base: Rational,
    tracker: StateTracker,
}

impl AudioDecoder {
    /**
        Create a new audio decoder from stream codec parameters.

        # Arguments

        * `parameters` - Codec parameters of the audio stream
        * `time_base` - Time base of the audio stream
    */
    pub fn new(parameters: codec::Parameters, time_base: Rational) -> Result<Self> {
        let decoder = session::open(parameters, KIND)?
            .audio()
            .map_err(|e| Error::decoder_init(format!("failed to open audio decoder: {e}")))?;

        tracing::debug!(
            codec = ?decoder.id(),
            rate = decoder.rate(),
            channels = decoder.channels(),
            format = ?decoder.format(),
            "audio decoder opened"
        );

        Ok(Self {
            decoder,
            time_base,
            tracker: StateTracker::default(),
        })
    }

    /**
        Get the time base for this decoder.
    */
    pub fn time_base(&self) -> Rational {
        self.time_base
    }

    /**
        Get the sample rate of the decoded audio.
    */
    pub fn sample_rate(&self) -> u32 {
        self.decoder.rate()
    }

    /**
        Get the number of channels, 0 if the codec did not say.
    */
    pub fn channels(&self) -> u16 {
        self.decoder.channels() as u16
    }

    /**
        Native sample format, `Sample::None` until the codec knows it.
    */
    pub fn format(&self) -> Sample {
        self.decoder.format()
    }

    pub fn state(&self) -> DecodeState {
        self.tracker.state()
    }

    /**
        Offer a packet to the decoder.
    */
    pub fn submit(&mut self, packet: &Packet) -> Result<Submitted> {
        let outcome = session::send(&mut self.decoder, packet, KIND)?;
        self.tracker.on_submitted(outcome);
        Ok(outcome)
    }

    /**
        Take one decoded frame, if the decoder has one ready.
    */
    pub fn try_take_frame(&mut self) -> Result<Option<AudioFrameFFmpeg>> {
        let mut frame = AudioFrameFFmpeg::empty();
        match session::receive(&mut self.decoder, &mut frame, KIND)? {
            Received::Frame => {
                self.tracker.on_frame();
                Ok(Some(frame))
            }
            Received::Pending => {
                self.tracker.on_empty(false);
                Ok(None)
            }
            Received::Exhausted => {
                self.tracker.on_empty(true);
                Ok(None)
            }
        }
    }

    /**
        Signal that no more packets will follow.
    */
    pub fn submit_end_of_stream(&mut self) -> Result<()> {
        if !self.tracker.end_of_stream_sent() {
            session::send_eof(&mut self.decoder, KIND)?;
        }
        self.tracker.on_end_of_stream();
        Ok(())
    }

    /**
        Discard buffered state. Call this after seeking.
    */
    pub fn flush(&mut self) {
        self.decoder.flush();
        self.tracker.on_flush();
    }
}

impl std::fmt::Debug for AudioDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioDecoder")
            .field("sample_rate", &self.sample_rate())
            .field("channels", &self.channels())
            .field("time_base", &self.time_base)
            .field("state", &self.state())
            .finish()
    }
}
