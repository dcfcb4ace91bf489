//! Interop with `std::io`.
//!
//! [`StdStream`] lets any `std::io` reader/writer be used where a stream is
//! expected; [`IoAdapter`] goes the other way.

use std::io::{Read, Seek, SeekFrom, Write};

use crate::error::{IoError, Result};
use crate::position::{BasePosition, Offset, Position, SeekTarget};
use crate::stream::{BufferedStream, Erasable, InputStream, OutputStream, SeekableStream};

/// A `std::io` value exposed through the stream traits.
///
/// The position is tracked from the bytes transferred, so it is only
/// accurate if nothing else moves the underlying cursor.
#[derive(Debug, Clone, Default)]
pub struct StdStream<T> {
    inner: T,
    position: u64,
    duplicate: Option<fn(&T) -> T>,
}

impl<T> StdStream<T> {
    /// Wrap `inner`, assuming it is positioned at the beginning.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            position: 0,
            duplicate: None,
        }
    }

    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }

    fn advance(&mut self, n: usize) {
        self.position = self.position.saturating_add(n as u64);
    }
}

impl<T: Clone> StdStream<T> {
    /// Wrap `inner` so that erased wrappers can copy it with `T::clone`.
    pub fn duplicable(inner: T) -> Self {
        Self {
            duplicate: Some(T::clone),
            ..Self::new(inner)
        }
    }
}

impl<T: Seek> StdStream<T> {
    /// Wrap `inner`, starting from its current position.
    pub fn from_current(mut inner: T) -> Result<Self> {
        let position = inner
            .stream_position()
            .map_err(|err| IoError::from_io("stream_position", err))?;
        Ok(Self {
            inner,
            position,
            duplicate: None,
        })
    }
}

impl<T: Read> InputStream for StdStream<T> {
    fn read_some(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let n = self
            .inner
            .read(buffer)
            .map_err(|err| IoError::from_io("read_some", err))?;
        self.advance(n);
        Ok(n)
    }
}

impl<T: Write> OutputStream for StdStream<T> {
    fn write_some(&mut self, buffer: &[u8]) -> Result<usize> {
        let n = self
            .inner
            .write(buffer)
            .map_err(|err| IoError::from_io("write_some", err))?;
        self.advance(n);
        Ok(n)
    }
}

impl<T: Write> BufferedStream for StdStream<T> {
    fn flush(&mut self) -> Result<()> {
        self.inner
            .flush()
            .map_err(|err| IoError::from_io("flush", err))
    }
}

impl<T: Seek> SeekableStream for StdStream<T> {
    fn get_position(&self) -> Result<Position> {
        i64::try_from(self.position)
            .map_err(|_| IoError::ValueTooLarge("get_position"))
            .and_then(Position::new)
    }

    fn seek_position(&mut self, target: SeekTarget) -> Result<()> {
        let from = match target {
            SeekTarget::Absolute(position) => SeekFrom::Start(position.get() as u64),
            SeekTarget::Relative(offset) => SeekFrom::Current(offset.get()),
            SeekTarget::Base(BasePosition::Beginning) => SeekFrom::Start(0),
            SeekTarget::Base(BasePosition::Current) => return Ok(()),
            SeekTarget::Base(BasePosition::End) => SeekFrom::End(0),
            SeekTarget::BaseOffset(BasePosition::Beginning, offset) => {
                SeekFrom::Start(Position::ZERO.checked_add(offset)?.get() as u64)
            }
            SeekTarget::BaseOffset(BasePosition::Current, offset) => SeekFrom::Current(offset.get()),
            SeekTarget::BaseOffset(BasePosition::End, offset) => SeekFrom::End(offset.get()),
        };
        self.position = self
            .inner
            .seek(from)
            .map_err(|err| IoError::from_io("seek_position", err))?;
        Ok(())
    }
}

impl<T: Read + Write + Seek + Send + 'static> Erasable for StdStream<T> {
    fn erased_get_position(&self) -> Result<Position> {
        self.get_position()
    }

    fn erased_seek_position(&mut self, target: SeekTarget) -> Result<()> {
        self.seek_position(target)
    }

    fn erased_flush(&mut self) -> Result<()> {
        self.flush()
    }

    fn erased_duplicate(&self) -> Option<Self> {
        let duplicate = self.duplicate?;
        Some(Self {
            inner: duplicate(&self.inner),
            position: self.position,
            duplicate: self.duplicate,
        })
    }
}

/// A stream exposed as `std::io::{Read, Write, Seek}`.
///
/// Streams that stage bytes should be wrapped with [`IoAdapter::buffered`]
/// so that `Write::flush` reaches them; otherwise `flush` does nothing.
#[derive(Debug, Clone, Default)]
pub struct IoAdapter<S> {
    inner: S,
    flush: Option<fn(&mut S) -> Result<()>>,
}

impl<S> IoAdapter<S> {
    /// Wrap a stream whose writes need no flushing.
    pub fn new(inner: S) -> Self {
        Self { inner, flush: None }
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: BufferedStream> IoAdapter<S> {
    /// Wrap a buffered stream; `Write::flush` forwards to its `flush`.
    pub fn buffered(inner: S) -> Self {
        Self {
            inner,
            flush: Some(S::flush),
        }
    }
}

impl<S: InputStream> Read for IoAdapter<S> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        Ok(self.inner.read_some(buf)?)
    }
}

impl<S: OutputStream> Write for IoAdapter<S> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        Ok(self.inner.write_some(buf)?)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self.flush {
            Some(flush) => Ok(flush(&mut self.inner)?),
            None => Ok(()),
        }
    }
}

impl<S: SeekableStream> Seek for IoAdapter<S> {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(n) => {
                let n = i64::try_from(n).map_err(|_| IoError::ValueTooLarge("seek"))?;
                SeekTarget::Absolute(Position::new(n)?)
            }
            SeekFrom::Current(n) => SeekTarget::Relative(Offset::new(n)),
            SeekFrom::End(n) => SeekTarget::BaseOffset(BasePosition::End, Offset::new(n)),
        };
        self.inner.seek_position(target)?;
        Ok(self.inner.get_position()?.get() as u64)
    }
}
