//! Streams over growable containers.

use std::collections::TryReserveError;

use bytes::{Bytes, BytesMut};

use crate::cursor::{read_at, write_growable_at, StreamCursor};
use crate::error::Result;
use crate::position::{Position, SeekTarget};
use crate::stream::{Erasable, InputStream, OutputStream, SeekableStream};

/// A byte container that can be resized.
pub trait GrowableBuffer: AsRef<[u8]> + AsMut<[u8]> {
    /// Resize to `len`, filling new bytes with zero.
    ///
    /// Fails without changing the contents if the memory cannot be allocated.
    fn try_resize_zeroed(&mut self, len: usize) -> std::result::Result<(), TryReserveError>;

    /// Drop all contents.
    fn clear_all(&mut self);

    /// Largest length the container can reach.
    fn max_len(&self) -> usize {
        isize::MAX as usize
    }
}

impl GrowableBuffer for Vec<u8> {
    fn try_resize_zeroed(&mut self, len: usize) -> std::result::Result<(), TryReserveError> {
        self.try_reserve(len.saturating_sub(self.len()))?;
        self.resize(len, 0);
        Ok(())
    }

    fn clear_all(&mut self) {
        self.clear();
    }
}

impl GrowableBuffer for BytesMut {
    fn try_resize_zeroed(&mut self, len: usize) -> std::result::Result<(), TryReserveError> {
        let spare = self.capacity() - self.len();
        if len.saturating_sub(self.len()) > spare {
            // BytesMut only grows infallibly; allocate through a Vec and adopt it.
            let mut grown = Vec::new();
            grown.try_reserve_exact(len)?;
            grown.extend_from_slice(&self[..]);
            *self = BytesMut::from(Bytes::from(grown));
        }
        self.resize(len, 0);
        Ok(())
    }

    fn clear_all(&mut self) {
        self.clear();
    }
}

/// Read-only stream over an owned container.
#[derive(Debug, Clone, Default)]
pub struct InputMemoryStream<C = Vec<u8>> {
    buffer: C,
    cursor: StreamCursor,
}

/// Write-only stream that grows its container as needed.
#[derive(Debug, Clone)]
pub struct OutputMemoryStream<C = Vec<u8>> {
    buffer: C,
    cursor: StreamCursor,
    max_size: usize,
}

/// Readable and writable stream that grows its container as needed.
#[derive(Debug, Clone)]
pub struct MemoryStream<C = Vec<u8>> {
    buffer: C,
    cursor: StreamCursor,
    max_size: usize,
}

impl<C: GrowableBuffer> InputMemoryStream<C> {
    /// Stream over `buffer`, positioned at the beginning.
    pub fn new(buffer: C) -> Self {
        Self {
            buffer,
            cursor: StreamCursor::new(),
        }
    }

    /// The whole container, regardless of position.
    pub fn get_buffer(&self) -> &C {
        &self.buffer
    }

    /// Replace the container and rewind to the beginning.
    pub fn set_buffer(&mut self, buffer: C) {
        self.buffer = buffer;
        self.cursor.reset();
    }

    /// Empty the container and rewind to the beginning.
    pub fn reset_buffer(&mut self) {
        self.buffer.clear_all();
        self.cursor.reset();
    }

    pub fn into_inner(self) -> C {
        self.buffer
    }
}

macro_rules! growable_accessors {
    ($($stream:ident),*) => {
        $(
            impl<C: GrowableBuffer> $stream<C> {
                /// Stream over `buffer`, positioned at the beginning.
                pub fn new(buffer: C) -> Self {
                    let max_size = buffer.max_len();
                    Self {
                        buffer,
                        cursor: StreamCursor::new(),
                        max_size,
                    }
                }

                /// Cap the container size; writes that would exceed it fail.
                pub fn with_max_size(mut self, max_size: usize) -> Self {
                    self.max_size = max_size.min(self.buffer.max_len());
                    self
                }

                /// Largest size writes may grow the container to.
                pub fn max_size(&self) -> usize {
                    self.max_size
                }

                /// The whole container, regardless of position.
                pub fn get_buffer(&self) -> &C {
                    &self.buffer
                }

                /// Replace the container and rewind to the beginning.
                pub fn set_buffer(&mut self, buffer: C) {
                    self.buffer = buffer;
                    self.cursor.reset();
                }

                /// Empty the container and rewind to the beginning.
                pub fn reset_buffer(&mut self) {
                    self.buffer.clear_all();
                    self.cursor.reset();
                }

                pub fn into_inner(self) -> C {
                    self.buffer
                }
            }

            impl<C: GrowableBuffer + Default> Default for $stream<C> {
                fn default() -> Self {
                    Self::new(C::default())
                }
            }

            impl<C: GrowableBuffer> OutputStream for $stream<C> {
                fn write_some(&mut self, buffer: &[u8]) -> Result<usize> {
                    write_growable_at(&mut self.buffer, self.max_size, &mut self.cursor, buffer)
                }
            }
        )*
    };
}

growable_accessors!(OutputMemoryStream, MemoryStream);

impl<C: GrowableBuffer> InputStream for InputMemoryStream<C> {
    fn read_some(&mut self, buffer: &mut [u8]) -> Result<usize> {
        read_at(self.buffer.as_ref(), &mut self.cursor, buffer)
    }
}

impl<C: GrowableBuffer> InputStream for MemoryStream<C> {
    fn read_some(&mut self, buffer: &mut [u8]) -> Result<usize> {
        read_at(self.buffer.as_ref(), &mut self.cursor, buffer)
    }
}

macro_rules! memory_seek_and_erase {
    ($($stream:ident),*) => {
        $(
            impl<C: GrowableBuffer> SeekableStream for $stream<C> {
                fn get_position(&self) -> Result<Position> {
                    self.cursor.get_position()
                }

                fn seek_position(&mut self, target: SeekTarget) -> Result<()> {
                    self.cursor.seek(target, self.buffer.as_ref().len())
                }
            }

            impl<C: GrowableBuffer + Clone + Send + 'static> Erasable for $stream<C> {
                fn erased_get_position(&self) -> Result<Position> {
                    self.get_position()
                }

                fn erased_seek_position(&mut self, target: SeekTarget) -> Result<()> {
                    self.seek_position(target)
                }

                fn erased_duplicate(&self) -> Option<Self> {
                    Some(self.clone())
                }
            }
        )*
    };
}

memory_seek_and_erase!(InputMemoryStream, OutputMemoryStream, MemoryStream);
