/*!
    Packet decoding for the frame extraction crates.

    This crate turns compressed packets into raw frames, one packet in and
    zero or more frames out, without ever blocking. Each decoder follows
    the same protocol:

    ```ignore
    use ffmpeg_decode::{Submitted, VideoDecoder};

    let mut decoder = VideoDecoder::new(parameters, time_base)?;

    // Offer a packet; on backpressure take frames out and offer it again
    while decoder.submit(&packet)? == Submitted::Again {
        while let Some(frame) = decoder.try_take_frame()? {
            // Process frame
        }
    }

    // At end of input, drain whatever is still buffered
    decoder.submit_end_of_stream()?;
    while let Some(frame) = decoder.try_take_frame()? {
        // Process frame
    }
    ```

    After seeking the demuxer, call `flush` so no frames from before the
    seek point come out.
*/

pub use ffmpeg_types::{Error, Rational, Result};

mod audio;
mod session;
mod video;

pub use audio::AudioDecoder;
pub use session::{DecodeState, Submitted};
pub use video::VideoDecoder;
