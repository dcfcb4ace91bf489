use std::fmt;

use parking_lot::{Mutex, MutexGuard};

use crate::error::Result;
use crate::position::{Position, SeekTarget};
use crate::stream::{BufferedStream, Erasable, InputStream, OutputStream, SeekableStream};

/// A stream shared between threads behind one exclusive lock.
///
/// Every operation holds the lock for its whole duration; reads and writes
/// are serialized alike. Operations are available only when the wrapped
/// stream supports them. Both `SynchronizedStream<S>` and
/// `&SynchronizedStream<S>` implement the stream traits, so a shared
/// reference can be handed to generic code such as
/// [`write_raw`](crate::write_raw).
pub struct SynchronizedStream<S> {
    inner: Mutex<S>,
}

impl<S> SynchronizedStream<S> {
    /// Wrap `stream` behind a fresh lock.
    pub fn new(stream: S) -> Self {
        Self {
            inner: Mutex::new(stream),
        }
    }

    /// Hold the lock across several operations.
    pub fn lock(&self) -> MutexGuard<'_, S> {
        self.inner.lock()
    }

    /// Take the lock only if no one else holds it.
    pub fn try_lock(&self) -> Option<MutexGuard<'_, S>> {
        self.inner.try_lock()
    }

    pub fn get_mut(&mut self) -> &mut S {
        self.inner.get_mut()
    }

    /// Unwrap the stream, consuming the lock.
    pub fn into_inner(self) -> S {
        self.inner.into_inner()
    }
}

impl<S: InputStream> SynchronizedStream<S> {
    /// [`InputStream::read_some`] under the lock.
    pub fn read_some(&self, buffer: &mut [u8]) -> Result<usize> {
        self.inner.lock().read_some(buffer)
    }
}

impl<S: OutputStream> SynchronizedStream<S> {
    /// [`OutputStream::write_some`] under the lock.
    pub fn write_some(&self, buffer: &[u8]) -> Result<usize> {
        self.inner.lock().write_some(buffer)
    }
}

impl<S: SeekableStream> SynchronizedStream<S> {
    /// [`SeekableStream::get_position`] under the lock.
    pub fn get_position(&self) -> Result<Position> {
        self.inner.lock().get_position()
    }

    /// [`SeekableStream::seek_position`] under the lock.
    pub fn seek_position(&self, target: SeekTarget) -> Result<()> {
        self.inner.lock().seek_position(target)
    }
}

impl<S: BufferedStream> SynchronizedStream<S> {
    /// [`BufferedStream::flush`] under the lock.
    pub fn flush(&self) -> Result<()> {
        self.inner.lock().flush()
    }
}

impl<S: InputStream> InputStream for SynchronizedStream<S> {
    fn read_some(&mut self, buffer: &mut [u8]) -> Result<usize> {
        self.inner.lock().read_some(buffer)
    }
}

impl<S: InputStream> InputStream for &SynchronizedStream<S> {
    fn read_some(&mut self, buffer: &mut [u8]) -> Result<usize> {
        self.inner.lock().read_some(buffer)
    }
}

impl<S: OutputStream> OutputStream for SynchronizedStream<S> {
    fn write_some(&mut self, buffer: &[u8]) -> Result<usize> {
        self.inner.lock().write_some(buffer)
    }
}

impl<S: OutputStream> OutputStream for &SynchronizedStream<S> {
    fn write_some(&mut self, buffer: &[u8]) -> Result<usize> {
        self.inner.lock().write_some(buffer)
    }
}

impl<S: SeekableStream> SeekableStream for SynchronizedStream<S> {
    fn get_position(&self) -> Result<Position> {
        self.inner.lock().get_position()
    }

    fn seek_position(&mut self, target: SeekTarget) -> Result<()> {
        self.inner.lock().seek_position(target)
    }
}

impl<S: SeekableStream> SeekableStream for &SynchronizedStream<S> {
    fn get_position(&self) -> Result<Position> {
        self.inner.lock().get_position()
    }

    fn seek_position(&mut self, target: SeekTarget) -> Result<()> {
        self.inner.lock().seek_position(target)
    }
}

impl<S: BufferedStream> BufferedStream for SynchronizedStream<S> {
    fn flush(&mut self) -> Result<()> {
        self.inner.lock().flush()
    }
}

impl<S: BufferedStream> BufferedStream for &SynchronizedStream<S> {
    fn flush(&mut self) -> Result<()> {
        self.inner.lock().flush()
    }
}

impl<S: Erasable> Erasable for SynchronizedStream<S> {
    fn erased_get_position(&self) -> Result<Position> {
        self.inner.lock().erased_get_position()
    }

    fn erased_seek_position(&mut self, target: SeekTarget) -> Result<()> {
        self.inner.lock().erased_seek_position(target)
    }

    fn erased_flush(&mut self) -> Result<()> {
        self.inner.lock().erased_flush()
    }

    fn erased_duplicate(&self) -> Option<Self> {
        self.inner.lock().erased_duplicate().map(Self::new)
    }
}

impl<S: Clone> Clone for SynchronizedStream<S> {
    /// Copy the wrapped stream under the source's lock into a fresh lock.
    fn clone(&self) -> Self {
        Self::new(self.inner.lock().clone())
    }

    fn clone_from(&mut self, source: &Self) {
        let value = source.inner.lock().clone();
        *self.inner.get_mut() = value;
    }
}

impl<S: Default> Default for SynchronizedStream<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S: fmt::Debug> fmt::Debug for SynchronizedStream<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_lock() {
            Some(stream) => f
                .debug_struct("SynchronizedStream")
                .field("stream", &*stream)
                .finish(),
            None => f
                .debug_struct("SynchronizedStream")
                .field("stream", &"<locked>")
                .finish(),
        }
    }
}
