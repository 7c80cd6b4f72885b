//! Fixture files synthesized on the fly, so no binary media is checked in.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub const WIDTH: usize = 32;
pub const HEIGHT: usize = 32;
pub const FPS: usize = 25;
pub const FRAME_MS: i64 = 1000 / FPS as i64;

/// Uncompressed 4:2:0 video in a YUV4MPEG2 stream.
pub fn y4m(frames: usize) -> Vec<u8> {
    let mut out = format!("YUV4MPEG2 W{WIDTH} H{HEIGHT} F{FPS}:1 Ip A1:1 C420jpeg\n").into_bytes();
    let luma = WIDTH * HEIGHT;
    let chroma = luma / 4;
    for n in 0..frames {
        out.extend_from_slice(b"FRAME\n");
        // A gradient that shifts every frame, so frames differ from each other
        out.extend((0..luma).map(|i| ((i + n * 7) % 220 + 16) as u8));
        out.extend(std::iter::repeat_n(128u8, chroma));
        out.extend(std::iter::repeat_n((100 + n % 50) as u8, chroma));
    }
    out
}

/// Mono 16-bit PCM in a RIFF/WAVE file.
pub fn wav(sample_rate: u32, samples: usize) -> Vec<u8> {
    let data_len = (samples * 2) as u32;
    let mut out = Vec::with_capacity(44 + samples * 2);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&1u16.to_le_bytes()); // mono
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&(sample_rate * 2).to_le_bytes());
    out.extend_from_slice(&2u16.to_le_bytes());
    out.extend_from_slice(&16u16.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    for i in 0..samples {
        out.extend_from_slice(&((i % 64) as i16 * 256).to_le_bytes());
    }
    out
}

/// Audio samples per video frame in [`avi`] files.
pub const AVI_SAMPLES_PER_FRAME: usize = 320;
/// Audio rate of [`avi`] files; one video frame of audio at 25 fps.
pub const AVI_SAMPLE_RATE: u32 = (AVI_SAMPLES_PER_FRAME * FPS) as u32;
/// Audio channels of [`avi`] files.
pub const AVI_CHANNELS: u16 = 2;

/// Uncompressed BGR24 video interleaved with stereo 16-bit PCM in an AVI file.
///
/// Each video frame is followed by one frame's worth of audio, so the file
/// holds `frames * AVI_SAMPLES_PER_FRAME` samples per channel.
pub fn avi(frames: usize) -> Vec<u8> {
    let frame_len = WIDTH * HEIGHT * 3;
    let block_align = AVI_CHANNELS as u32 * 2;
    let audio_len = AVI_SAMPLES_PER_FRAME * block_align as usize;

    let bytes_per_second = (frame_len * FPS) as u32 + AVI_SAMPLE_RATE * block_align;
    let mut avih = Vec::new();
    // Main header: timing, flags (has index), frame and stream counts, size
    for v in [
        1_000_000 / FPS as u32,
        bytes_per_second,
        0,
        0x10,
        frames as u32,
        0,
        2,
        frame_len as u32,
        WIDTH as u32,
        HEIGHT as u32,
        0,
        0,
        0,
        0,
    ] {
        avih.extend_from_slice(&v.to_le_bytes());
    }

    let video_strl = list(
        b"strl",
        &[
            chunk(
                b"strh",
                &stream_header(b"vids", 1, FPS as u32, frames as u32, frame_len as u32, 0),
            ),
            chunk(b"strf", &bitmap_info()),
        ]
        .concat(),
    );
    let audio_strl = list(
        b"strl",
        &[
            chunk(
                b"strh",
                &stream_header(
                    b"auds",
                    block_align,
                    AVI_SAMPLE_RATE * block_align,
                    (frames * AVI_SAMPLES_PER_FRAME) as u32,
                    audio_len as u32,
                    block_align,
                ),
            ),
            chunk(b"strf", &wave_format(block_align)),
        ]
        .concat(),
    );
    let hdrl = list(b"hdrl", &[chunk(b"avih", &avih), video_strl, audio_strl].concat());

    let mut movi = Vec::new();
    let mut index = Vec::new();
    for n in 0..frames {
        let video: Vec<u8> = (0..frame_len).map(|i| ((i + n * 7) % 220 + 16) as u8).collect();
        let audio: Vec<u8> = (0..AVI_SAMPLES_PER_FRAME * AVI_CHANNELS as usize)
            .flat_map(|i| (((i + n) % 64) as i16 * 256).to_le_bytes())
            .collect();
        for (id, payload) in [(b"00db", video), (b"01wb", audio)] {
            // Offsets count from the `movi` form type
            index.extend_from_slice(id);
            index.extend_from_slice(&0x10u32.to_le_bytes());
            index.extend_from_slice(&(4 + movi.len() as u32).to_le_bytes());
            index.extend_from_slice(&(payload.len() as u32).to_le_bytes());
            movi.extend_from_slice(&chunk(id, &payload));
        }
    }

    let body = [hdrl, list(b"movi", &movi), chunk(b"idx1", &index)].concat();
    let mut out = b"RIFF".to_vec();
    out.extend_from_slice(&(4 + body.len() as u32).to_le_bytes());
    out.extend_from_slice(b"AVI ");
    out.extend_from_slice(&body);
    out
}

fn chunk(id: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = id.to_vec();
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(payload);
    if payload.len() % 2 == 1 {
        out.push(0);
    }
    out
}

fn list(form: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    chunk(b"LIST", &[form.as_slice(), payload].concat())
}

fn stream_header(
    kind: &[u8; 4],
    scale: u32,
    rate: u32,
    length: u32,
    buffer: u32,
    sample_size: u32,
) -> Vec<u8> {
    let mut out = kind.to_vec();
    out.extend_from_slice(&[0; 4]); // handler
    out.extend_from_slice(&0u32.to_le_bytes()); // flags
    out.extend_from_slice(&0u16.to_le_bytes()); // priority
    out.extend_from_slice(&0u16.to_le_bytes()); // language
    // initial frames, scale, rate, start, length, buffer size, quality, sample size
    for v in [0, scale, rate, 0, length, buffer, u32::MAX, sample_size] {
        out.extend_from_slice(&v.to_le_bytes());
    }
    for v in [0i16, 0, WIDTH as i16, HEIGHT as i16] {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out
}

fn bitmap_info() -> Vec<u8> {
    let mut out = Vec::with_capacity(40);
    out.extend_from_slice(&40u32.to_le_bytes());
    out.extend_from_slice(&(WIDTH as i32).to_le_bytes());
    out.extend_from_slice(&(HEIGHT as i32).to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // planes
    out.extend_from_slice(&24u16.to_le_bytes()); // bits per pixel
    for v in [0u32, (WIDTH * HEIGHT * 3) as u32, 0, 0, 0, 0] {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out
}

fn wave_format(block_align: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(16);
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&AVI_CHANNELS.to_le_bytes());
    out.extend_from_slice(&AVI_SAMPLE_RATE.to_le_bytes());
    out.extend_from_slice(&(AVI_SAMPLE_RATE * block_align).to_le_bytes());
    out.extend_from_slice(&(block_align as u16).to_le_bytes());
    out.extend_from_slice(&16u16.to_le_bytes());
    out
}

/// Prefix `payload` with a custom container header.
pub fn wrap(payload: &[u8], version: u32, declared_size: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(16 + payload.len());
    out.extend_from_slice(b"VID0");
    out.extend_from_slice(&version.to_le_bytes());
    out.extend_from_slice(&declared_size.to_le_bytes());
    out.extend_from_slice(payload);
    out
}

/// Prefix `payload` with a valid header declaring its exact size.
pub fn wrap_exact(payload: &[u8]) -> Vec<u8> {
    wrap(payload, 1, payload.len() as u64)
}

/// A temporary directory holding fixture files.
pub struct Fixtures {
    dir: TempDir,
}

impl Fixtures {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn write(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, bytes).unwrap();
        path
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}
