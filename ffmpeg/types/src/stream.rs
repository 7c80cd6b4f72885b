/*!
    Stream descriptors reported when a file is opened.
*/

use crate::Rational;

/**
    Parameters of the selected audio stream.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AudioInfo {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Number of channels.
    pub channels: u16,
    /// Time base of the audio stream.
    pub time_base: Rational,
}

/**
    Parameters of an opened file.

    Video is always present; audio is optional.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreamInfo {
    /// Video width in pixels.
    pub width: u32,
    /// Video height in pixels.
    pub height: u32,
    /// Best-guess frame rate (`0/1` if unknown).
    pub frame_rate: Rational,
    /// Container duration in milliseconds (`0` if unknown).
    pub duration_ms: i64,
    /// Time base of the video stream.
    pub video_time_base: Rational,
    /// Audio stream parameters, if the file has an audio stream.
    pub audio: Option<AudioInfo>,
}

impl StreamInfo {
    /**
        Returns true if the file has an audio stream.
    */
    pub fn has_audio(&self) -> bool {
        self.audio.is_some()
    }

    /**
        Returns the frame rate as a float, or None if unknown.
    */
    pub fn fps(&self) -> Option<f64> {
        self.frame_rate.is_valid().then(|| self.frame_rate.to_f64())
    }

    /**
        Returns the audio sample rate, or 0 without audio.
    */
    pub fn sample_rate(&self) -> u32 {
        self.audio.map(|a| a.sample_rate).unwrap_or(0)
    }

    /**
        Returns the audio channel count, or 0 without audio.
    */
    pub fn channels(&self) -> u16 {
        self.audio.map(|a| a.channels).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(audio: Option<AudioInfo>) -> StreamInfo {
        StreamInfo {
            width: 1280,
            height: 720,
            frame_rate: Rational::new(30000, 1001),
            duration_ms: 0,
            video_time_base: Rational::new(1, 90000),
            audio,
        }
    }

    #[test]
    fn without_audio() {
        let info = info(None);
        assert!(!info.has_audio());
        assert_eq!(info.sample_rate(), 0);
        assert_eq!(info.channels(), 0);
    }

    #[test]
    fn with_audio() {
        let info = info(Some(AudioInfo {
            sample_rate: 48000,
            channels: 2,
            time_base: Rational::new(1, 48000),
        }));
        assert!(info.has_audio());
        assert_eq!(info.sample_rate(), 48000);
        assert_eq!(info.channels(), 2);
    }

    #[test]
    fn fps() {
        let mut i = info(None);
        assert!((i.fps().unwrap() - 29.97).abs() < 0.01);

        i.frame_rate = Rational { num: 0, den: 1 };
        assert_eq!(i.fps(), None);
    }
}
