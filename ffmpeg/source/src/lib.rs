/*!
    Container probing and demuxing for the frame extraction crates.

    This crate is the input side of the pipeline. It decides how a file is
    opened, opens it with libavformat, selects the streams to decode, and
    hands out compressed packets tagged with the role of their stream.

    # Custom Container

    Files may carry a 16-byte header (`VID0`, version, payload size) in front
    of an ordinary container. Such files are read through a
    [`PayloadWindow`] so libavformat only ever sees the payload bytes:

    ```ignore
    use ffmpeg_source::{Probe, probe_path};

    match probe_path("clip.video")? {
        Probe::Container { payload_size, .. } => println!("{payload_size} byte payload"),
        Probe::NotContainer => println!("plain media file"),
    }
    ```

    # Demuxing

    ```ignore
    use ffmpeg_source::{Demuxed, Demuxer, StreamRole};

    let mut demuxer = Demuxer::open("clip.video")?;
    loop {
        match demuxer.next_packet()? {
            Demuxed::Packet { role: StreamRole::Video, packet } => { /* decode */ }
            Demuxed::Packet { .. } => {}
            Demuxed::EndOfStream => break,
        }
    }
    ```
*/

pub use ffmpeg_types::{Demuxed, Error, Rational, Result, StreamRole};

mod avio;
mod demuxer;
mod probe;
mod window;

pub use demuxer::Demuxer;
pub use probe::{HEADER_LEN, Header, MAGIC, Probe, SUPPORTED_VERSION, probe, probe_path};
pub use window::{PayloadWindow, Whence};
