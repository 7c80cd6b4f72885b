/*!
    Demuxed packet routing types.
*/

/**
    Role of the stream a packet belongs to.

    The demuxer resolves raw stream indices into roles, so nothing past the
    demux boundary deals in indices.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamRole {
    /// The selected video stream
    Video,
    /// The selected audio stream
    Audio,
    /// Any stream that was not selected (subtitles, data, extra tracks)
    Ignored,
}

/**
    Outcome of pulling one packet from a demuxer.

    End of stream is a regular outcome here rather than an error.
*/
#[derive(Debug)]
pub enum Demuxed<P> {
    /// A compressed packet and the role of its stream.
    Packet { role: StreamRole, packet: P },
    /// The container has no more packets.
    EndOfStream,
}

impl<P> Demuxed<P> {
    /**
        Returns true if this is the end-of-stream marker.
    */
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Self::EndOfStream)
    }

    /**
        Returns the role of the packet, or None at end of stream.
    */
    pub fn role(&self) -> Option<StreamRole> {
        match self {
            Self::Packet { role, .. } => Some(*role),
            Self::EndOfStream => None,
        }
    }
}
