/*!
    Custom I/O bridge handing a [`PayloadWindow`] to libavformat.
*/

use std::ffi::{c_int, c_void};
use std::fs::File;
use std::io::Read;
use std::slice;

use ffmpeg_next::ffi;
use ffmpeg_next::util::error::EIO;

use ffmpeg_types::{Error, Result};

use crate::window::{PayloadWindow, Whence};

/// Size of the buffer libavformat reads through.
const AVIO_BUFFER_SIZE: usize = 64 * 1024;

/**
    Owns an `AVIOContext` and the window it reads from.

    Must outlive any format context using it; libavformat does not free a
    caller-supplied I/O context when closing the input.
*/
pub(crate) struct CustomIo {
    ctx: *mut ffi::AVIOContext,
    window: *mut PayloadWindow<File>,
}

impl CustomIo {
    /**
        Allocate an I/O context reading from `window`.
    */
    pub fn new(window: PayloadWindow<File>) -> Result<Self> {
        let window = Box::into_raw(Box::new(window));

        unsafe {
            let buffer = ffi::av_malloc(AVIO_BUFFER_SIZE) as *mut u8;
            if buffer.is_null() {
                drop(Box::from_raw(window));
                return Err(Error::container_open("out of memory for avio buffer"));
            }

            let ctx = ffi::avio_alloc_context(
                buffer,
                AVIO_BUFFER_SIZE as c_int,
                0,
                window as *mut c_void,
                Some(read_packet),
                None,
                Some(seek),
            );
            if ctx.is_null() {
                ffi::av_free(buffer as *mut c_void);
                drop(Box::from_raw(window));
                return Err(Error::container_open("failed to create avio context"));
            }

            (*ctx).seekable = ffi::AVIO_SEEKABLE_NORMAL as c_int;

            Ok(Self { ctx, window })
        }
    }

    /**
        Get the raw context pointer.
    */
    pub fn as_mut_ptr(&mut self) -> *mut ffi::AVIOContext {
        self.ctx
    }
}

impl Drop for CustomIo {
    fn drop(&mut self) {
        unsafe {
            if !self.ctx.is_null() {
                // The buffer may have been reallocated by libavformat, so free
                // whatever the context currently points at.
                ffi::av_freep(&mut (*self.ctx).buffer as *mut *mut u8 as *mut c_void);
                ffi::avio_context_free(&mut self.ctx);
            }
            drop(Box::from_raw(self.window));
        }
    }
}

// SAFETY: The context and window are only touched through &mut self or by
// libavformat calls made on the thread that owns the demuxer.
unsafe impl Send for CustomIo {}

unsafe extern "C" fn read_packet(opaque: *mut c_void, buf: *mut u8, buf_size: c_int) -> c_int {
    let window = unsafe { &mut *(opaque as *mut PayloadWindow<File>) };
    if buf_size <= 0 {
        return 0;
    }
    let buf = unsafe { slice::from_raw_parts_mut(buf, buf_size as usize) };

    match window.read(buf) {
        Ok(0) => ffi::AVERROR_EOF,
        Ok(n) => n as c_int,
        Err(e) => {
            tracing::warn!(error = %e, "payload read failed");
            ffi::AVERROR(EIO)
        }
    }
}

unsafe extern "C" fn seek(opaque: *mut c_void, offset: i64, whence: c_int) -> i64 {
    let window = unsafe { &mut *(opaque as *mut PayloadWindow<File>) };

    let whence = whence & !(ffi::AVSEEK_FORCE as c_int);
    let whence = match whence {
        w if w == ffi::AVSEEK_SIZE as c_int => Whence::Size,
        0 => Whence::Start(offset),
        1 => Whence::Current(offset),
        2 => Whence::End(offset),
        _ => return -1,
    };

    match window.seek_to(whence) {
        Ok(pos) => pos as i64,
        Err(e) => {
            tracing::debug!(error = %e, ?whence, "payload seek rejected");
            -1
        }
    }
}
