/*!
    The pull loop tying a packet source to the video and audio stages.
*/

use ffmpeg_decode::Submitted;
use ffmpeg_types::{AudioFrame, Demuxed, Result, StreamRole, VideoFrame};

use crate::stage::{FrameStage, PacketSource};

/**
    One result of [`Scheduler::next`].
*/
#[derive(Debug)]
pub enum Next {
    Video(VideoFrame),
    Audio(AudioFrame),
    /// No more frames until the next seek.
    EndOfStream,
}

impl Next {
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Self::EndOfStream)
    }
}

/**
    Produces one frame per call by draining stages and feeding them packets.

    Each call first drains the video stage, then the audio stage, and only
    reads a new packet when both are empty. Once the source runs out, both
    stages are told so and drained; after that every call reports end of
    stream until a seek.

    Fields are dropped in declaration order: the held-back packet goes
    first, then the stages, then the source they were created from.
*/
pub struct Scheduler<D: PacketSource, V, A> {
    pending: Option<(StreamRole, D::Packet)>,
    video: V,
    audio: Option<A>,
    source: D,
    end_of_stream: bool,
}

impl<D, V, A> Scheduler<D, V, A>
where
    D: PacketSource,
    V: FrameStage<Packet = D::Packet, Output = VideoFrame>,
    A: FrameStage<Packet = D::Packet, Output = AudioFrame>,
{
    pub fn new(source: D, video: V, audio: Option<A>) -> Self {
        Self {
            pending: None,
            video,
            audio,
            source,
            end_of_stream: false,
        }
    }

    pub fn source(&self) -> &D {
        &self.source
    }

    pub fn video(&self) -> &V {
        &self.video
    }

    pub fn audio(&self) -> Option<&A> {
        self.audio.as_ref()
    }

    /**
        Returns true once the source has run out and both stages were told.
    */
    pub fn is_end_of_stream(&self) -> bool {
        self.end_of_stream
    }

    /**
        Produce the next frame, or end of stream.

        Reads as many packets as it takes; there is no bound other than the
        length of the stream. An error leaves the scheduler usable, but the
        packet being routed when it happened is lost.
    */
    pub fn next(&mut self) -> Result<Next> {
        loop {
            if let Some(frame) = self.video.try_take()? {
                return Ok(Next::Video(frame));
            }
            if let Some(audio) = self.audio.as_mut() {
                if let Some(frame) = audio.try_take()? {
                    return Ok(Next::Audio(frame));
                }
            }

            if self.end_of_stream {
                return Ok(Next::EndOfStream);
            }

            let (role, packet) = match self.pending.take() {
                Some(pending) => pending,
                None => match self.source.next_packet()? {
                    Demuxed::Packet { role, packet } => (role, packet),
                    Demuxed::EndOfStream => {
                        tracing::debug!("source exhausted, draining stages");
                        self.end_of_stream = true;
                        self.video.submit_end_of_stream()?;
                        if let Some(audio) = self.audio.as_mut() {
                            audio.submit_end_of_stream()?;
                        }
                        continue;
                    }
                },
            };

            self.route(role, packet)?;
        }
    }

    /**
        Seek the source, then flush both stages.

        On failure nothing but the source is touched.
    */
    pub fn seek_ms(&mut self, target_ms: i64) -> Result<()> {
        self.source.seek_ms(target_ms)?;

        self.video.flush();
        if let Some(audio) = self.audio.as_mut() {
            audio.flush();
        }
        self.pending = None;
        self.end_of_stream = false;
        Ok(())
    }

    fn route(&mut self, role: StreamRole, packet: D::Packet) -> Result<()> {
        let outcome = match (role, self.audio.as_mut()) {
            (StreamRole::Video, _) => self.video.submit(&packet)?,
            (StreamRole::Audio, Some(audio)) => audio.submit(&packet)?,
            (StreamRole::Audio, None) | (StreamRole::Ignored, _) => return Ok(()),
        };

        if outcome == Submitted::Again {
            self.pending = Some((role, packet));
        }
        Ok(())
    }
}

impl<D, V, A> std::fmt::Debug for Scheduler<D, V, A>
where
    D: PacketSource + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("source", &self.source)
            .field("has_audio", &self.audio.is_some())
            .field("pending", &self.pending.as_ref().map(|(role, _)| role))
            .field("end_of_stream", &self.end_of_stream)
            .finish()
    }
}
