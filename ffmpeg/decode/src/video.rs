/*!
    Video decoder implementation.
*/

use ffmpeg_next::{
    Packet, codec,
    codec::decoder::Video as VideoDecoderFFmpeg,
    format::Pixel,
    util::frame::video::Video as VideoFrameFFmpeg,
};

use ffmpeg_types::{Error, Rational, Result};

use crate::session::{self, DecodeState, Received, StateTracker, Submitted};

const KIND: &str = "video";

/**
    Video decoder.

    Accepts compressed packets one at a time and hands back raw frames in
    the decoder's native pixel format. Never blocks: when the decoder is
    full, [`VideoDecoder::submit`] reports [`Submitted::Again`] and frames
    must be taken out before the packet is offered again.
*/
pub struct VideoDecoder {
    decoder: VideoDecoderFFmpeg,
    time_base: Rational,
    tracker: StateTracker,
}

impl VideoDecoder {
    /**
        Create a new video decoder from stream codec parameters.

        # Arguments

        * `parameters` - Codec parameters of the video stream
        * `time_base` - Time base of the video stream
    */
    pub fn new(parameters: codec::Parameters, time_base: Rational) -> Result<Self> {
        let decoder = session::open(parameters, KIND)?
            .video()
            .map_err(|e| Error::decoder_init(format!("failed to open video decoder: {e}")))?;

        tracing::debug!(
            codec = ?decoder.id(),
            width = decoder.width(),
            height = decoder.height(),
            format = ?decoder.format(),
            "video decoder opened"
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
        Coded width, as known before the first frame.
    */
    pub fn width(&self) -> u32 {
        self.decoder.width()
    }

    /**
        Coded height, as known before the first frame.
    */
    pub fn height(&self) -> u32 {
        self.decoder.height()
    }

    pub fn format(&self) -> Pixel {
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

        Returns `None` both when more input is needed and once the decoder
        is drained; [`VideoDecoder::state`] tells the two apart.
    */
    pub fn try_take_frame(&mut self) -> Result<Option<VideoFrameFFmpeg>> {
        let mut frame = VideoFrameFFmpeg::empty();
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

        Buffered frames remain available through [`VideoDecoder::try_take_frame`].
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

impl std::fmt::Debug for VideoDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoDecoder")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("format", &self.format())
            .field("time_base", &self.time_base)
            .field("state", &self.state())
            .finish()
    }
}
