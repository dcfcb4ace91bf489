use crate::error::{IoError, Result};
use crate::position::{Position, SeekTarget};

/// A source of bytes.
pub trait InputStream {
    /// Read up to `buffer.len()` bytes, returning how many were transferred.
    ///
    /// Returns `Ok(0)` only at end of stream or when `buffer` is empty.
    fn read_some(&mut self, buffer: &mut [u8]) -> Result<usize>;
}

/// A sink for bytes.
pub trait OutputStream {
    /// Write up to `buffer.len()` bytes, returning how many were accepted.
    ///
    /// Returns `Ok(0)` only when `buffer` is empty; otherwise progress is made
    /// or an error is returned.
    fn write_some(&mut self, buffer: &[u8]) -> Result<usize>;
}

/// A stream that supports random access.
pub trait SeekableStream {
    /// Current position, in bytes from the beginning.
    fn get_position(&self) -> Result<Position>;

    /// Move to `target`; on failure the position is unchanged.
    fn seek_position(&mut self, target: SeekTarget) -> Result<()>;
}

/// A stream that stages bytes and must be flushed to make them visible.
pub trait BufferedStream {
    /// Make every staged byte visible to the underlying sink.
    fn flush(&mut self) -> Result<()>;
}

/// Shorthand for streams that are both readable and writable.
pub trait InputOutputStream: InputStream + OutputStream {}

impl<T: InputStream + OutputStream + ?Sized> InputOutputStream for T {}

/// Runtime view of the optional capabilities of a stream.
///
/// Erased wrappers cannot see whether the value they hold is seekable,
/// buffered or clonable, so every stream that may be erased describes itself
/// through this trait. The defaults describe a stream with none of those
/// capabilities.
pub trait Erasable: Send + 'static {
    /// Position of a seekable stream; fails with `BadDescriptor` otherwise.
    fn erased_get_position(&self) -> Result<Position> {
        Err(IoError::BadDescriptor("stream is not seekable"))
    }

    /// Seek a seekable stream; fails with `BadDescriptor` otherwise.
    fn erased_seek_position(&mut self, _target: SeekTarget) -> Result<()> {
        Err(IoError::BadDescriptor("stream is not seekable"))
    }

    /// Flush a buffered stream; succeeds without effect otherwise.
    fn erased_flush(&mut self) -> Result<()> {
        Ok(())
    }

    /// Produce an independent copy, or `None` if the type cannot be duplicated.
    fn erased_duplicate(&self) -> Option<Self>
    where
        Self: Sized,
    {
        None
    }
}

impl<S: InputStream + ?Sized> InputStream for &mut S {
    fn read_some(&mut self, buffer: &mut [u8]) -> Result<usize> {
        (**self).read_some(buffer)
    }
}

impl<S: OutputStream + ?Sized> OutputStream for &mut S {
    fn write_some(&mut self, buffer: &[u8]) -> Result<usize> {
        (**self).write_some(buffer)
    }
}

impl<S: SeekableStream + ?Sized> SeekableStream for &mut S {
    fn get_position(&self) -> Result<Position> {
        (**self).get_position()
    }

    fn seek_position(&mut self, target: SeekTarget) -> Result<()> {
        (**self).seek_position(target)
    }
}

impl<S: BufferedStream + ?Sized> BufferedStream for &mut S {
    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

impl<S: InputStream + ?Sized> InputStream for Box<S> {
    fn read_some(&mut self, buffer: &mut [u8]) -> Result<usize> {
        (**self).read_some(buffer)
    }
}

impl<S: OutputStream + ?Sized> OutputStream for Box<S> {
    fn write_some(&mut self, buffer: &[u8]) -> Result<usize> {
        (**self).write_some(buffer)
    }
}

impl<S: SeekableStream + ?Sized> SeekableStream for Box<S> {
    fn get_position(&self) -> Result<Position> {
        (**self).get_position()
    }

    fn seek_position(&mut self, target: SeekTarget) -> Result<()> {
        (**self).seek_position(target)
    }
}

impl<S: BufferedStream + ?Sized> BufferedStream for Box<S> {
    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}
