/*!
    The seams between the scheduler and the pipeline stages.

    The scheduler only talks to these traits, so it can be driven by the
    FFmpeg-backed stages in [`crate::pipeline`] or by scripted stages in
    tests.
*/

use ffmpeg_decode::Submitted;
use ffmpeg_types::{Demuxed, Result};

/**
    Something that hands out compressed packets tagged with a stream role.
*/
pub trait PacketSource {
    type Packet;

    /**
        Read the next packet. Running out is [`Demuxed::EndOfStream`], not an error.
    */
    fn next_packet(&mut self) -> Result<Demuxed<Self::Packet>>;

    /**
        Reposition at the keyframe at or before `target_ms`.
    */
    fn seek_ms(&mut self, target_ms: i64) -> Result<()>;
}

/**
    A decode-and-convert stage for one stream.

    Packets go in through [`FrameStage::submit`]; finished frames come out
    through [`FrameStage::try_take`]. Neither call blocks.
*/
pub trait FrameStage {
    type Packet;
    type Output;

    /**
        Offer a packet. [`Submitted::Again`] means the stage is full and the
        same packet must be offered again after taking output.
    */
    fn submit(&mut self, packet: &Self::Packet) -> Result<Submitted>;

    /**
        Take one finished frame, if there is one.
    */
    fn try_take(&mut self) -> Result<Option<Self::Output>>;

    /**
        Signal that no more packets will follow.
    */
    fn submit_end_of_stream(&mut self) -> Result<()>;

    /**
        Discard everything buffered and accept input again.
    */
    fn flush(&mut self);
}
