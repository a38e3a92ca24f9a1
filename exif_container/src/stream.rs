//! The byte stream a container handle reads from and rewrites.
//!
//! Engines never edit a stream piece by piece. They read a contiguous view of
//! the whole container, stage the complete new container in a `Vec<u8>`, and
//! only then call [`MetadataStream::replace`]. A failure before that point
//! leaves the stream untouched.

use std::{
    borrow::Cow,
    fs::File,
    io::{Cursor, Read, Seek, SeekFrom, Write},
};

/// A seekable, writable source of container bytes.
///
/// Implemented for in-memory buffers (`Cursor<Vec<u8>>`) and for files.
pub trait MetadataStream: Read + Write + Seek {
    /// The total length of the stream, in bytes.
    ///
    /// The current position is preserved.
    fn size(&mut self) -> std::io::Result<u64> {
        let pos = self.stream_position()?;
        let end = self.seek(SeekFrom::End(0))?;
        if pos != end {
            self.seek(SeekFrom::Start(pos))?;
        }
        Ok(end)
    }

    /// Whether the current position is at (or past) the end.
    fn is_eof(&mut self) -> std::io::Result<bool> {
        let pos = self.stream_position()?;
        Ok(pos >= self.size()?)
    }

    /// The whole stream as one slice, when it already lives in memory.
    ///
    /// Streams that can't offer this return `None`, and callers fall back to
    /// reading everything into a buffer.
    fn view(&self) -> Option<&[u8]> {
        None
    }

    /// Cuts (or zero-extends) the stream to exactly `len` bytes.
    fn truncate(&mut self, len: u64) -> std::io::Result<()>;

    /// Replaces the entire contents of the stream with `bytes`.
    ///
    /// Afterwards, the position is at the end of the new contents.
    fn replace(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.seek(SeekFrom::Start(0))?;
        self.truncate(0)?;
        self.write_all(bytes)?;
        self.flush()
    }
}

impl MetadataStream for Cursor<Vec<u8>> {
    fn size(&mut self) -> std::io::Result<u64> {
        Ok(self.get_ref().len() as u64)
    }

    fn view(&self) -> Option<&[u8]> {
        Some(self.get_ref().as_slice())
    }

    fn truncate(&mut self, len: u64) -> std::io::Result<()> {
        let len: usize = usize::try_from(len).map_err(|_| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "requested length doesn't fit in memory",
            )
        })?;
        self.get_mut().resize(len, 0_u8);
        if self.position() > len as u64 {
            self.set_position(len as u64);
        }
        Ok(())
    }
}

impl MetadataStream for File {
    fn truncate(&mut self, len: u64) -> std::io::Result<()> {
        self.set_len(len)?;
        if self.stream_position()? > len {
            self.seek(SeekFrom::Start(len))?;
        }
        Ok(())
    }
}

/// Grabs the whole stream as a contiguous slice.
///
/// In-memory streams are borrowed. Anything else is read from the start into
/// an owned buffer.
pub(crate) fn load<S: MetadataStream + ?Sized>(stream: &mut S) -> std::io::Result<Cow<'_, [u8]>> {
    if stream.view().is_none() {
        log::trace!("Stream has no in-memory view. Reading it into a buffer...");
        let mut buf: Vec<u8> = Vec::new();
        stream.seek(SeekFrom::Start(0))?;
        stream.read_to_end(&mut buf)?;
        return Ok(Cow::Owned(buf));
    }

    Ok(Cow::Borrowed(stream.view().unwrap_or_default()))
}
