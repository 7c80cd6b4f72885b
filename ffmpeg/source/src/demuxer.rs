/*!
    Container demuxing over libavformat.
*/

use std::ffi::{CStr, CString, c_int};
use std::fs::File;
use std::path::Path;
use std::ptr;

use ffmpeg_next::{
    Packet, codec, ffi,
    format::context::Input,
    media::Type as MediaType,
};

use ffmpeg_types::{Demuxed, Error, Pts, Rational, Result, StreamRole};

use crate::avio::CustomIo;
use crate::probe::{Probe, probe};
use crate::window::PayloadWindow;

/**
    An opened container with its video stream and optional audio stream selected.

    Dropping the demuxer closes the container before releasing the custom
    I/O context, if one was used.
*/
pub struct Demuxer {
    input: Input,
    io: Option<CustomIo>,
    video_index: usize,
    audio_index: Option<usize>,
    video_time_base: Rational,
    audio_time_base: Option<Rational>,
    payload_size: Option<u64>,
}

impl Demuxer {
    /**
        Open the file at `path`.

        Files starting with the custom container header are opened through
        their payload window; everything else goes through libavformat's own
        format detection. The best video stream is required, the best audio
        stream is optional.
    */
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        ffmpeg_next::init().map_err(|e| Error::container_open(format!("ffmpeg init failed: {e}")))?;

        // Unreadable files fall through so libavformat reports the failure
        let probed = match File::open(path) {
            Ok(mut file) => match probe(&mut file)? {
                Probe::Container {
                    payload_offset,
                    payload_size,
                } => Some((file, payload_offset, payload_size)),
                Probe::NotContainer => None,
            },
            Err(_) => None,
        };

        let (input, io, payload_size) = match probed {
            Some((file, payload_offset, payload_size)) => {
                tracing::debug!(
                    path = %path.display(),
                    payload_offset,
                    payload_size,
                    "opening custom container payload"
                );
                let window = PayloadWindow::new(file, payload_offset, payload_size);
                let mut io = CustomIo::new(window)?;
                let input = unsafe {
                    open_input(None, Some(&mut io), "avformat_open_input (custom io) failed")?
                };
                (input, Some(io), Some(payload_size))
            }
            None => {
                let url = path
                    .to_str()
                    .and_then(|s| CString::new(s).ok())
                    .ok_or_else(|| {
                        Error::container_open(format!("unusable path: {}", path.display()))
                    })?;
                let input = unsafe { open_input(Some(&url), None, "avformat_open_input failed")? };
                (input, None, None)
            }
        };

        Self::from_input(input, io, payload_size)
    }

    fn from_input(input: Input, io: Option<CustomIo>, payload_size: Option<u64>) -> Result<Self> {
        let video = input
            .streams()
            .best(MediaType::Video)
            .map(|s| (s.index(), rational(s.time_base())));
        let Some((video_index, video_time_base)) = video else {
            // The input must be closed before the I/O context it reads from
            drop(input);
            drop(io);
            return Err(Error::NoVideoStream);
        };

        let audio = input.streams().best(MediaType::Audio);
        let audio_index = audio.as_ref().map(|s| s.index());
        let audio_time_base = audio.as_ref().map(|s| rational(s.time_base()));

        tracing::debug!(
            format = input.format().name(),
            video_index,
            ?audio_index,
            %video_time_base,
            "container opened"
        );

        Ok(Self {
            input,
            io,
            video_index,
            audio_index,
            video_time_base,
            audio_time_base,
            payload_size,
        })
    }

    /**
        Returns true if the file was opened through the custom container header.
    */
    pub fn is_custom_container(&self) -> bool {
        self.io.is_some()
    }

    /**
        Size of the custom container payload, if the file is one.
    */
    pub fn payload_size(&self) -> Option<u64> {
        self.payload_size
    }

    /**
        Returns true if an audio stream was selected.
    */
    pub fn has_audio(&self) -> bool {
        self.audio_index.is_some()
    }

    /**
        Time base of the video stream.
    */
    pub fn video_time_base(&self) -> Rational {
        self.video_time_base
    }

    /**
        Time base of the audio stream, if there is one.
    */
    pub fn audio_time_base(&self) -> Option<Rational> {
        self.audio_time_base
    }

    /**
        Codec parameters of the video stream.
    */
    pub fn video_parameters(&self) -> Result<codec::Parameters> {
        self.input
            .stream(self.video_index)
            .map(|s| s.parameters())
            .ok_or(Error::NoVideoStream)
    }

    /**
        Codec parameters of the audio stream, if there is one.
    */
    pub fn audio_parameters(&self) -> Option<codec::Parameters> {
        self.audio_index
            .and_then(|index| self.input.stream(index))
            .map(|s| s.parameters())
    }

    /**
        Container duration in milliseconds, or 0 if unknown.
    */
    pub fn duration_ms(&self) -> i64 {
        let duration = self.input.duration();
        if duration > 0 {
            duration / 1000
        } else {
            0
        }
    }

    /**
        Best guess at the video frame rate, `0/1` if unknown.
    */
    pub fn frame_rate(&self) -> Rational {
        let Some(stream) = self.input.stream(self.video_index) else {
            return Rational { num: 0, den: 1 };
        };
        let guessed = unsafe {
            ffi::av_guess_frame_rate(
                self.input.as_ptr() as *mut ffi::AVFormatContext,
                stream.as_ptr() as *mut ffi::AVStream,
                ptr::null_mut(),
            )
        };
        if guessed.den == 0 {
            Rational { num: 0, den: 1 }
        } else {
            Rational {
                num: guessed.num,
                den: guessed.den,
            }
        }
    }

    /**
        Read the next packet, tagged with the role of its stream.

        Running out of packets yields [`Demuxed::EndOfStream`]; any other
        read failure is an error.
    */
    pub fn next_packet(&mut self) -> Result<Demuxed<Packet>> {
        let mut packet = Packet::empty();
        match packet.read(&mut self.input) {
            Ok(()) => Ok(Demuxed::Packet {
                role: self.role_of(packet.stream()),
                packet,
            }),
            Err(ffmpeg_next::Error::Eof) => Ok(Demuxed::EndOfStream),
            Err(e) => Err(Error::demux_read(format!("av_read_frame failed: {e}"))),
        }
    }

    /**
        Seek to the keyframe at or before `target_ms` on the video stream.
    */
    pub fn seek_ms(&mut self, target_ms: i64) -> Result<()> {
        let ts = Pts::from_millis(target_ms, self.video_time_base);
        let ret = unsafe {
            ffi::av_seek_frame(
                self.input.as_mut_ptr(),
                self.video_index as c_int,
                ts.0,
                ffi::AVSEEK_FLAG_BACKWARD as c_int,
            )
        };
        if ret < 0 {
            return Err(Error::seek(format!(
                "av_seek_frame failed: {}",
                ffmpeg_next::Error::from(ret)
            )));
        }

        tracing::debug!(target_ms, ts = ts.0, "demuxer seeked");
        Ok(())
    }

    fn role_of(&self, index: usize) -> StreamRole {
        if index == self.video_index {
            StreamRole::Video
        } else if Some(index) == self.audio_index {
            StreamRole::Audio
        } else {
            StreamRole::Ignored
        }
    }
}

impl std::fmt::Debug for Demuxer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Demuxer")
            .field("video_index", &self.video_index)
            .field("audio_index", &self.audio_index)
            .field("video_time_base", &self.video_time_base)
            .field("payload_size", &self.payload_size)
            .finish_non_exhaustive()
    }
}

/**
    Open and inspect an input, either by URL or through a custom I/O context.

    # Safety

    `io`, when given, must outlive the returned input.
*/
unsafe fn open_input(url: Option<&CStr>, io: Option<&mut CustomIo>, context: &str) -> Result<Input> {
    unsafe {
        let mut ctx = ffi::avformat_alloc_context();
        if ctx.is_null() {
            return Err(Error::container_open("failed to alloc format context"));
        }

        if let Some(io) = io {
            (*ctx).pb = io.as_mut_ptr();
            (*ctx).flags |= ffi::AVFMT_FLAG_CUSTOM_IO as c_int;
        }

        // On failure avformat_open_input frees the context itself
        let ret = ffi::avformat_open_input(
            &mut ctx,
            url.map_or(ptr::null(), CStr::as_ptr),
            ptr::null(),
            ptr::null_mut(),
        );
        if ret < 0 {
            return Err(Error::container_open(format!(
                "{context}: {}",
                ffmpeg_next::Error::from(ret)
            )));
        }

        let ret = ffi::avformat_find_stream_info(ctx, ptr::null_mut());
        if ret < 0 {
            ffi::avformat_close_input(&mut ctx);
            return Err(Error::stream_info(format!(
                "avformat_find_stream_info failed: {}",
                ffmpeg_next::Error::from(ret)
            )));
        }

        Ok(Input::wrap(ctx))
    }
}

fn rational(r: ffmpeg_next::Rational) -> Rational {
    Rational {
        num: r.numerator(),
        den: r.denominator(),
    }
}
