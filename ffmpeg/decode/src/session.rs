/*!
    Send/receive protocol shared by the video and audio decoders.
*/

use ffmpeg_next::{
    Packet,
    codec::{self, decoder},
    util::{error::EAGAIN, frame::Frame},
};

use ffmpeg_types::{Error, Result};

/**
    Observable state of a decode stage.

    A stage is `Ready` for input, `HasOutput` while frames may be waiting to
    be taken, and `Drained` once end of stream was signalled and every
    buffered frame has been taken. Only a flush leaves `Drained`.
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DecodeState {
    #[default]
    Ready,
    HasOutput,
    Drained,
}

/**
    Outcome of submitting a packet to a decoder.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Submitted {
    /// The decoder took the packet.
    Accepted,
    /// The decoder is full; take frames out, then submit the same packet again.
    Again,
    /// The decoder rejected the packet as corrupt; it was discarded.
    Dropped,
}

/**
    Tracks [`DecodeState`] transitions for one decoder.
*/
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct StateTracker {
    state: DecodeState,
    end_of_stream: bool,
}

impl StateTracker {
    pub fn state(&self) -> DecodeState {
        self.state
    }

    pub fn end_of_stream_sent(&self) -> bool {
        self.end_of_stream
    }

    pub fn on_submitted(&mut self, outcome: Submitted) {
        if outcome != Submitted::Dropped {
            self.state = DecodeState::HasOutput;
        }
    }

    pub fn on_end_of_stream(&mut self) {
        self.end_of_stream = true;
        if self.state != DecodeState::Drained {
            self.state = DecodeState::HasOutput;
        }
    }

    pub fn on_frame(&mut self) {
        self.state = DecodeState::HasOutput;
    }

    pub fn on_empty(&mut self, exhausted: bool) {
        self.state = if exhausted && self.end_of_stream {
            DecodeState::Drained
        } else {
            DecodeState::Ready
        };
    }

    pub fn on_flush(&mut self) {
        *self = Self::default();
    }
}

/**
    Result of a non-blocking receive.
*/
pub(crate) enum Received {
    Frame,
    /// Nothing buffered right now; more input is needed.
    Pending,
    /// Nothing buffered and nothing will ever be, until a flush.
    Exhausted,
}

/**
    Find a decoder for `parameters` and open it.
*/
pub(crate) fn open(parameters: codec::Parameters, kind: &str) -> Result<decoder::Decoder> {
    let id = parameters.id();
    if ffmpeg_next::decoder::find(id).is_none() {
        return Err(Error::decoder_init(format!(
            "{kind} decoder not found for codec {id:?}"
        )));
    }

    let context = codec::context::Context::from_parameters(parameters).map_err(|e| {
        Error::decoder_init(format!("failed to copy {kind} codec parameters: {e}"))
    })?;

    Ok(context.decoder())
}

pub(crate) fn send(decoder: &mut decoder::Opened, packet: &Packet, kind: &str) -> Result<Submitted> {
    match decoder.send_packet(packet) {
        Ok(()) => Ok(Submitted::Accepted),
        Err(ffmpeg_next::Error::Other { errno }) if errno == EAGAIN => Ok(Submitted::Again),
        Err(ffmpeg_next::Error::InvalidData) => {
            tracing::warn!(kind, "decoder rejected corrupt packet");
            Ok(Submitted::Dropped)
        }
        Err(e) => Err(Error::decode(format!("{kind} send_packet failed: {e}"))),
    }
}

pub(crate) fn send_eof(decoder: &mut decoder::Opened, kind: &str) -> Result<()> {
    match decoder.send_eof() {
        // Already signalled
        Ok(()) | Err(ffmpeg_next::Error::Eof) => Ok(()),
        Err(e) => Err(Error::decode(format!("{kind} send_eof failed: {e}"))),
    }
}

pub(crate) fn receive(decoder: &mut decoder::Opened, frame: &mut Frame, kind: &str) -> Result<Received> {
    match decoder.receive_frame(frame) {
        Ok(()) => Ok(Received::Frame),
        Err(ffmpeg_next::Error::Other { errno }) if errno == EAGAIN => Ok(Received::Pending),
        Err(ffmpeg_next::Error::Eof) => Ok(Received::Exhausted),
        Err(e) => Err(Error::decode(format!("{kind} receive_frame failed: {e}"))),
    }
}
