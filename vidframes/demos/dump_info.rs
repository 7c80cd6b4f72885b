/*!
    Print what a media file contains and its first few frames.

    ```sh
    cargo run --example dump_info -- clip.video
    RUST_LOG=vidframes=debug cargo run --example dump_info -- clip.video
    ```
*/

use std::process::ExitCode;

use tracing::level_filters::LevelFilter;

use vidframes::{Config, Next, Probe, Video, probe_path};

const FRAMES_PER_KIND: usize = 3;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(LevelFilter::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let Some(path) = std::env::args().nth(1) else {
        let program = std::env::args().next().unwrap_or_else(|| "dump_info".into());
        println!("Usage: {program} <video-file>");
        return ExitCode::FAILURE;
    };

    match probe_path(&path) {
        Ok(Probe::Container { payload_size, .. }) => {
            println!("Container: VID0, {payload_size} byte payload")
        }
        Ok(Probe::NotContainer) => println!("Container: none (generic detection)"),
        Err(e) => println!("Container: {e}"),
    }

    let config = Config::new().with_trace_frames(true);
    let mut video = match Video::open_with(&path, config) {
        Ok(video) => video,
        Err(e) => {
            println!("Failed to open video: {e}");
            return ExitCode::FAILURE;
        }
    };

    let info = *video.info();
    println!(
        "Video: {}x{} fps={} duration={}ms",
        info.width, info.height, info.frame_rate, info.duration_ms
    );
    match info.audio {
        Some(audio) => println!("Audio: {} Hz, {} channels", audio.sample_rate, audio.channels),
        None => println!("Audio: none"),
    }

    let (mut video_count, mut audio_count) = (0, 0);
    while video_count < FRAMES_PER_KIND || audio_count < FRAMES_PER_KIND {
        match video.next() {
            Ok(Next::Video(mut frame)) => {
                println!("Video frame {video_count} pts={}ms", frame.pts_ms_or_unknown());
                frame.release();
                video_count += 1;
            }
            Ok(Next::Audio(mut frame)) => {
                println!(
                    "Audio frame {audio_count} pts={}ms samples={}",
                    frame.pts_ms_or_unknown(),
                    frame.samples
                );
                frame.release();
                audio_count += 1;
            }
            Ok(Next::EndOfStream) => {
                println!("EOF");
                break;
            }
            Err(_) => {
                println!("Error: {}", video.last_error());
                break;
            }
        }
    }

    video.close();
    ExitCode::SUCCESS
}
