/*!
    Frame conversion for the frame extraction crates.

    Decoders output frames in whatever layout the codec prefers; this crate
    converts them into the two layouts handed to callers:
    - **Video**: RGBA, 8 bits per channel, same dimensions as the source
    - **Audio**: signed 16-bit interleaved PCM, same rate and channel count

    Both converters also rescale the frame's best-effort timestamp into
    milliseconds using the stream time base.

    # Video

    ```ignore
    use ffmpeg_transform::VideoTransform;

    let mut transform = VideoTransform::new();
    let frame = transform.convert(&decoded, time_base)?;
    println!("{}x{} rgba, stride {}", frame.width, frame.height, frame.stride);
    ```

    # Audio

    ```ignore
    use ffmpeg_transform::AudioTransform;

    let mut transform = AudioTransform::new(decoder.format(), decoder.sample_rate(), decoder.channels())?;
    let frame = transform.convert(&decoded, time_base)?;
    let samples = frame.to_i16_samples();
    ```

    # Caching

    The scaler and the resampler are built lazily and kept until the input
    shape changes. The scaler is stateless between frames; the resampler
    may hold a few samples of filter history, so call
    `AudioTransform::reset` after seeking.
*/

pub use ffmpeg_types::{AudioFrame, Error, Result, VideoFrame};

mod audio;
mod video;

pub use audio::AudioTransform;
pub use video::VideoTransform;
