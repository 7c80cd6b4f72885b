/*!
    A byte range of a larger source, presented as a source of its own.
*/

use std::io::{self, Read, Seek, SeekFrom};

/**
    Seek origin for [`PayloadWindow::seek_to`].

    Mirrors the whence values FFmpeg passes to custom I/O, including the
    size query.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Whence {
    /// Offset from the start of the payload.
    Start(i64),
    /// Offset from the current position.
    Current(i64),
    /// Offset from the end of the payload.
    End(i64),
    /// Report the payload size without moving.
    Size,
}

/**
    The logical window `[offset, offset + size)` of an underlying source.

    Positions are relative to the start of the window. Reads never cross
    the end of the window, and a read at the end yields zero bytes.
*/
#[derive(Debug)]
pub struct PayloadWindow<R> {
    inner: R,
    offset: u64,
    size: u64,
    pos: u64,
}

impl<R: Read + Seek> PayloadWindow<R> {
    /**
        Create a window over `inner` starting at `offset` and spanning `size` bytes.
    */
    pub fn new(inner: R, offset: u64, size: u64) -> Self {
        Self {
            inner,
            offset,
            size,
            pos: 0,
        }
    }

    /**
        Size of the window in bytes.
    */
    pub fn size(&self) -> u64 {
        self.size
    }

    /**
        Current position relative to the start of the window.
    */
    pub fn position(&self) -> u64 {
        self.pos
    }

    /**
        Move within the window.

        `Whence::Size` returns the window size and leaves the position alone.
        Targets past the end are clamped to the end; targets before the start
        are rejected.
    */
    pub fn seek_to(&mut self, whence: Whence) -> io::Result<u64> {
        let (base, delta) = match whence {
            Whence::Size => return Ok(self.size),
            Whence::Start(delta) => (0, delta),
            Whence::Current(delta) => (self.pos, delta),
            Whence::End(delta) => (self.size, delta),
        };

        let target = base as i128 + delta as i128;
        if target < 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek before start of payload",
            ));
        }

        self.pos = target.min(self.size as i128) as u64;
        Ok(self.pos)
    }
}

impl<R: Read + Seek> Read for PayloadWindow<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.size.saturating_sub(self.pos);
        if remaining == 0 || buf.is_empty() {
            return Ok(0);
        }

        let len = usize::try_from(remaining).map_or(buf.len(), |r| r.min(buf.len()));
        self.inner.seek(SeekFrom::Start(self.offset + self.pos))?;
        let got = self.inner.read(&mut buf[..len])?;
        self.pos += got as u64;
        Ok(got)
    }
}

impl<R: Read + Seek> Seek for PayloadWindow<R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let whence = match pos {
            SeekFrom::Start(offset) => Whence::Start(i64::try_from(offset).unwrap_or(i64::MAX)),
            SeekFrom::Current(delta) => Whence::Current(delta),
            SeekFrom::End(delta) => Whence::End(delta),
        };
        self.seek_to(whence)
    }
}
