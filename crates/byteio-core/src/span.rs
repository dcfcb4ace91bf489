//! Fixed-capacity streams over caller-provided storage.
//!
//! Writes never grow the storage: writing at or past its end fails with
//! [`IoError::FileTooLarge`](crate::IoError::FileTooLarge).

use crate::cursor::{read_at, write_fixed_at, StreamCursor};
use crate::error::Result;
use crate::position::{Position, SeekTarget};
use crate::stream::{Erasable, InputStream, OutputStream, SeekableStream};

/// Read-only stream over a byte span.
#[derive(Debug, Clone, Default)]
pub struct InputSpanStream<B> {
    buffer: B,
    cursor: StreamCursor,
}

/// Write-only stream over a fixed-size byte span.
#[derive(Debug, Clone, Default)]
pub struct OutputSpanStream<B> {
    buffer: B,
    cursor: StreamCursor,
}

/// Readable and writable stream over a fixed-size byte span.
#[derive(Debug, Clone, Default)]
pub struct InputOutputSpanStream<B> {
    buffer: B,
    cursor: StreamCursor,
}

impl<B: AsRef<[u8]>> InputSpanStream<B> {
    /// Stream over `buffer`, positioned at the beginning.
    pub fn new(buffer: B) -> Self {
        Self {
            buffer,
            cursor: StreamCursor::new(),
        }
    }

    /// The whole span, regardless of position.
    pub fn get_buffer(&self) -> &[u8] {
        self.buffer.as_ref()
    }

    /// Replace the span and rewind to the beginning.
    pub fn set_buffer(&mut self, buffer: B) {
        self.buffer = buffer;
        self.cursor.reset();
    }

    pub fn into_inner(self) -> B {
        self.buffer
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> OutputSpanStream<B> {
    /// Stream over `buffer`, positioned at the beginning.
    pub fn new(buffer: B) -> Self {
        Self {
            buffer,
            cursor: StreamCursor::new(),
        }
    }

    /// The whole span, regardless of position.
    pub fn get_buffer(&self) -> &[u8] {
        self.buffer.as_ref()
    }

    /// Replace the span and rewind to the beginning.
    pub fn set_buffer(&mut self, buffer: B) {
        self.buffer = buffer;
        self.cursor.reset();
    }

    pub fn into_inner(self) -> B {
        self.buffer
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> InputOutputSpanStream<B> {
    /// Stream over `buffer`, positioned at the beginning.
    pub fn new(buffer: B) -> Self {
        Self {
            buffer,
            cursor: StreamCursor::new(),
        }
    }

    /// The whole span, regardless of position.
    pub fn get_buffer(&self) -> &[u8] {
        self.buffer.as_ref()
    }

    /// Replace the span and rewind to the beginning.
    pub fn set_buffer(&mut self, buffer: B) {
        self.buffer = buffer;
        self.cursor.reset();
    }

    pub fn into_inner(self) -> B {
        self.buffer
    }
}

impl<B: AsRef<[u8]>> InputStream for InputSpanStream<B> {
    fn read_some(&mut self, buffer: &mut [u8]) -> Result<usize> {
        read_at(self.buffer.as_ref(), &mut self.cursor, buffer)
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> OutputStream for OutputSpanStream<B> {
    fn write_some(&mut self, buffer: &[u8]) -> Result<usize> {
        write_fixed_at(self.buffer.as_mut(), &mut self.cursor, buffer)
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> InputStream for InputOutputSpanStream<B> {
    fn read_some(&mut self, buffer: &mut [u8]) -> Result<usize> {
        read_at(self.buffer.as_ref(), &mut self.cursor, buffer)
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> OutputStream for InputOutputSpanStream<B> {
    fn write_some(&mut self, buffer: &[u8]) -> Result<usize> {
        write_fixed_at(self.buffer.as_mut(), &mut self.cursor, buffer)
    }
}

macro_rules! span_seek_and_erase {
    ($($stream:ident),*) => {
        $(
            impl<B: AsRef<[u8]>> SeekableStream for $stream<B> {
                fn get_position(&self) -> Result<Position> {
                    self.cursor.get_position()
                }

                fn seek_position(&mut self, target: SeekTarget) -> Result<()> {
                    self.cursor.seek(target, self.buffer.as_ref().len())
                }
            }

            impl<B: AsRef<[u8]> + Clone + Send + 'static> Erasable for $stream<B> {
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

span_seek_and_erase!(InputSpanStream, OutputSpanStream, InputOutputSpanStream);
