//! Pulling frames: ordering, end of stream, seeking, frame release.

mod common;

use common::{FRAME_MS, Fixtures, HEIGHT, WIDTH, wrap_exact, y4m};
use vidframes::{Config, Next, Video, VideoFrame};

fn video_frames(video: &mut Video) -> Vec<VideoFrame> {
    let mut frames = Vec::new();
    loop {
        match video.next().unwrap() {
            Next::Video(frame) => frames.push(frame),
            Next::Audio(_) => panic!("file has no audio stream"),
            Next::EndOfStream => return frames,
        }
    }
}

#[test]
fn decodes_every_frame_then_ends() {
    let fx = Fixtures::new();
    let path = fx.write("clip.y4m", &y4m(10));
    let mut video = Video::open(&path).unwrap();

    let frames = video_frames(&mut video);
    assert_eq!(frames.len(), 10);

    for frame in &frames {
        assert_eq!(frame.width, WIDTH as u32);
        assert_eq!(frame.height, HEIGHT as u32);
        assert!(frame.stride >= WIDTH * 4);
        assert_eq!(frame.data().unwrap().len(), frame.stride * HEIGHT);
        assert_eq!(frame.row(0).unwrap().len(), WIDTH * 4);
    }

    // End of stream is sticky
    for _ in 0..3 {
        assert!(video.next().unwrap().is_end_of_stream());
    }
    assert_eq!(video.last_error(), "");
}

#[test]
fn output_is_opaque_rgba() {
    let fx = Fixtures::new();
    let path = fx.write("clip.y4m", &y4m(1));
    let mut video = Video::open(&path).unwrap();

    let frame = video_frames(&mut video).remove(0);
    for y in 0..frame.height {
        let row = frame.row(y).unwrap();
        assert!(row.chunks_exact(4).all(|px| px[3] == 255));
    }
}

#[test]
fn timestamps_follow_the_frame_rate() {
    let fx = Fixtures::new();
    let path = fx.write("clip.y4m", &y4m(10));
    let mut video = Video::open(&path).unwrap();

    let pts: Vec<i64> = video_frames(&mut video)
        .iter()
        .map(|f| f.pts_ms.unwrap())
        .collect();
    let expected: Vec<i64> = (0..10).map(|n| n * FRAME_MS).collect();
    assert_eq!(pts, expected);
}

#[test]
fn wrapped_file_decodes_identically_to_payload() {
    let fx = Fixtures::new();
    let payload = y4m(12);
    let plain = fx.write("plain.y4m", &payload);
    let wrapped = fx.write("wrapped.video", &wrap_exact(&payload));

    let a = video_frames(&mut Video::open(&plain).unwrap());
    let b = video_frames(&mut Video::open(&wrapped).unwrap());

    assert_eq!(a.len(), 12);
    assert_eq!(a, b);
    assert_ne!(a[0].data(), a[1].data());
}

#[test]
fn trailing_bytes_past_the_payload_are_ignored() {
    let fx = Fixtures::new();
    let payload = y4m(4);
    let mut bytes = wrap_exact(&payload);
    bytes.extend_from_slice(b"FRAME\n");
    bytes.extend(std::iter::repeat_n(0u8, WIDTH * HEIGHT * 3 / 2));
    let path = fx.write("trailing.video", &bytes);

    let frames = video_frames(&mut Video::open(&path).unwrap());
    assert_eq!(frames.len(), 4);
}

#[test]
fn seek_lands_at_or_before_target() {
    let fx = Fixtures::new();
    let path = fx.write("clip.y4m", &y4m(25));
    let mut video = Video::open(&path).unwrap();

    // Run to the end first, so the seek also has to clear end of stream
    assert_eq!(video_frames(&mut video).len(), 25);

    let target = 10 * FRAME_MS + FRAME_MS / 2;
    video.seek_ms(target).unwrap();

    let after = video_frames(&mut video);
    assert!(!after.is_empty());
    let first = after[0].pts_ms.unwrap();
    assert!(first <= target, "first frame at {first} ms, target {target} ms");

    let pts: Vec<i64> = after.iter().map(|f| f.pts_ms.unwrap()).collect();
    assert!(pts.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(*pts.last().unwrap(), 24 * FRAME_MS);
}

#[test]
fn seek_back_to_start_replays_everything() {
    let fx = Fixtures::new();
    let path = fx.write("clip.video", &wrap_exact(&y4m(6)));
    let mut video = Video::open(&path).unwrap();

    let first_pass = video_frames(&mut video);
    video.seek_ms(0).unwrap();
    let second_pass = video_frames(&mut video);

    assert_eq!(first_pass, second_pass);
}

#[test]
fn released_frames_are_empty_and_release_twice_is_harmless() {
    let fx = Fixtures::new();
    let path = fx.write("clip.y4m", &y4m(2));
    let mut video = Video::open(&path).unwrap();

    let Next::Video(mut frame) = video.next().unwrap() else {
        panic!("expected a video frame");
    };
    assert!(!frame.is_released());

    frame.release();
    assert!(frame.is_released());
    assert!(frame.data().is_none());
    assert_eq!(frame.width, 0);

    frame.release();
    assert!(frame.is_released());
}

#[test]
fn frame_tracing_does_not_change_output() {
    let fx = Fixtures::new();
    let path = fx.write("clip.y4m", &y4m(3));

    let quiet = video_frames(&mut Video::open(&path).unwrap());
    let config = Config::new().with_trace_frames(true).with_ffmpeg_log_level(None);
    let traced = video_frames(&mut Video::open_with(&path, config).unwrap());

    assert_eq!(quiet, traced);
}

#[test]
fn close_consumes_the_handle() {
    let fx = Fixtures::new();
    let path = fx.write("clip.y4m", &y4m(2));
    let mut video = Video::open(&path).unwrap();
    assert!(matches!(video.next().unwrap(), Next::Video(_)));
    video.close();
}

#[test]
fn handle_can_be_moved_to_a_worker_thread() {
    let fx = Fixtures::new();
    let path = fx.write("clip.y4m", &y4m(5));
    let mut video = Video::open(&path).unwrap();
    assert!(matches!(video.next().unwrap(), Next::Video(_)));

    let frames = std::thread::spawn(move || video_frames(&mut video))
        .join()
        .unwrap();
    assert_eq!(frames.len(), 4);
}
