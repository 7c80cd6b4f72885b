/*!
    Detection of the custom container header.

    The custom container is a 16-byte header followed by the bytes of an
    ordinary container file. All integers are little-endian:

    | offset | size | field                                    |
    |--------|------|------------------------------------------|
    | 0      | 4    | magic, `VID0`                            |
    | 4      | 4    | format version, only `1` is supported    |
    | 8      | 8    | payload size in bytes, `0` = rest of file |
*/

use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use ffmpeg_types::{Error, Result};

/**
    Magic tag at the start of the custom container.
*/
pub const MAGIC: [u8; 4] = *b"VID0";

/**
    Length of the custom container header, which is also the payload offset.
*/
pub const HEADER_LEN: u64 = 16;

/**
    The only header version this crate understands.
*/
pub const SUPPORTED_VERSION: u32 = 1;

/**
    Result of probing a file for the custom container header.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Probe {
    /// No header; the file should be opened with generic format detection.
    NotContainer,
    /// A valid header; the payload occupies the given byte range.
    Container {
        payload_offset: u64,
        payload_size: u64,
    },
}

/**
    Decoded custom container header.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub version: u32,
    /// Declared payload size, `0` meaning "rest of file".
    pub payload_size: u64,
}

impl Header {
    /**
        Create a header for the supported version.
    */
    pub const fn new(payload_size: u64) -> Self {
        Self {
            version: SUPPORTED_VERSION,
            payload_size,
        }
    }

    /**
        Parse a header, returning None if the magic does not match.
    */
    pub fn parse(bytes: &[u8; HEADER_LEN as usize]) -> Option<Self> {
        if bytes[0..4] != MAGIC {
            return None;
        }

        let mut version = [0u8; 4];
        version.copy_from_slice(&bytes[4..8]);
        let mut size = [0u8; 8];
        size.copy_from_slice(&bytes[8..16]);

        Some(Self {
            version: u32::from_le_bytes(version),
            payload_size: u64::from_le_bytes(size),
        })
    }

    /**
        Serialize the header.
    */
    pub fn to_bytes(self) -> [u8; HEADER_LEN as usize] {
        let mut bytes = [0u8; HEADER_LEN as usize];
        bytes[0..4].copy_from_slice(&MAGIC);
        bytes[4..8].copy_from_slice(&self.version.to_le_bytes());
        bytes[8..16].copy_from_slice(&self.payload_size.to_le_bytes());
        bytes
    }
}

/**
    Probe a byte source for the custom container header.

    The source is rewound to the start before returning. A source shorter
    than the header, or one whose magic does not match, is not a container.
    A matching magic with an unsupported version, or a declared payload
    larger than what follows the header, is an error rather than a
    fallback.
*/
pub fn probe<R: Read + Seek>(source: &mut R) -> Result<Probe> {
    source.seek(SeekFrom::Start(0))?;

    let mut bytes = [0u8; HEADER_LEN as usize];
    let filled = read_up_to(source, &mut bytes)?;
    if filled < bytes.len() {
        source.seek(SeekFrom::Start(0))?;
        return Ok(Probe::NotContainer);
    }

    let Some(header) = Header::parse(&bytes) else {
        source.seek(SeekFrom::Start(0))?;
        return Ok(Probe::NotContainer);
    };

    if header.version != SUPPORTED_VERSION {
        return Err(Error::container_invalid(format!(
            "unsupported version {}",
            header.version
        )));
    }

    let total = source.seek(SeekFrom::End(0))?;
    source.seek(SeekFrom::Start(0))?;
    let available = total.saturating_sub(HEADER_LEN);

    let payload_size = match header.payload_size {
        0 => available,
        declared if declared > available => {
            return Err(Error::container_invalid(format!(
                "declared payload of {declared} bytes exceeds the {available} bytes present"
            )));
        }
        declared => declared,
    };

    Ok(Probe::Container {
        payload_offset: HEADER_LEN,
        payload_size,
    })
}

/**
    Probe the file at `path` for the custom container header.
*/
pub fn probe_path(path: impl AsRef<Path>) -> Result<Probe> {
    let mut file = File::open(path)?;
    probe(&mut file)
}

fn read_up_to<R: Read>(source: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use super::*;

    fn wrapped(header: Header, payload: &[u8]) -> Cursor<Vec<u8>> {
        let mut bytes = header.to_bytes().to_vec();
        bytes.extend_from_slice(payload);
        Cursor::new(bytes)
    }

    #[test]
    fn header_round_trip() {
        let header = Header::new(1234);
        let bytes = header.to_bytes();
        assert_eq!(&bytes[0..4], b"VID0");
        assert_eq!(&bytes[4..8], &[1, 0, 0, 0]);
        assert_eq!(Header::parse(&bytes), Some(header));
    }

    #[test]
    fn short_file_is_not_container() {
        let mut source = Cursor::new(b"VID0\x01\x00".to_vec());
        assert_eq!(probe(&mut source).unwrap(), Probe::NotContainer);
    }

    #[test]
    fn other_magic_is_not_container() {
        let mut source = Cursor::new(b"\x1aE\xdf\xa3 some webm bytes here".to_vec());
        assert_eq!(probe(&mut source).unwrap(), Probe::NotContainer);
        assert_eq!(source.position(), 0);
    }

    #[test]
    fn exact_size_is_accepted() {
        let mut source = wrapped(Header::new(5), b"hello");
        assert_eq!(
            probe(&mut source).unwrap(),
            Probe::Container {
                payload_offset: 16,
                payload_size: 5,
            }
        );
    }

    #[test]
    fn smaller_declared_size_is_accepted() {
        let mut source = wrapped(Header::new(3), b"hello");
        assert_eq!(
            probe(&mut source).unwrap(),
            Probe::Container {
                payload_offset: 16,
                payload_size: 3,
            }
        );
    }

    #[test]
    fn zero_size_means_rest_of_file() {
        let mut source = wrapped(Header::new(0), &[7u8; 100]);
        assert_eq!(
            probe(&mut source).unwrap(),
            Probe::Container {
                payload_offset: 16,
                payload_size: 100,
            }
        );
    }

    #[test]
    fn oversized_declaration_is_invalid() {
        let mut source = wrapped(Header::new(6), b"hello");
        let err = probe(&mut source).unwrap_err();
        assert!(matches!(err, Error::ContainerInvalid { .. }));
    }

    #[test]
    fn unsupported_version_is_invalid() {
        let header = Header {
            version: 2,
            payload_size: 0,
        };
        let mut source = wrapped(header, b"hello");
        let err = probe(&mut source).unwrap_err();
        assert!(matches!(err, Error::ContainerInvalid { .. }));
        assert!(err.to_string().contains("version 2"));
    }

    #[test]
    fn probe_path_reads_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&Header::new(0).to_bytes()).unwrap();
        file.write_all(&[0u8; 32]).unwrap();
        file.flush().unwrap();

        assert_eq!(
            probe_path(file.path()).unwrap(),
            Probe::Container {
                payload_offset: 16,
                payload_size: 32,
            }
        );
    }
}
