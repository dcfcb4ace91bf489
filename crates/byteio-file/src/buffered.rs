//! Sector-buffered file access.
//!
//! [`BufferedFile`] batches reads and writes through one fixed storage
//! buffer sized to the file system's preferred transfer size. It switches
//! between reading and writing transparently, so any sequence of calls
//! leaves the file exactly as the same calls against an unbuffered
//! [`File`] would.
//!
//! The storage buffer is never used whole after an arbitrary seek: each
//! window starts at `os_position % capacity`, so every flush after the
//! first ends on a multiple of the capacity.

use std::ops::Range;
use std::os::fd::{AsRawFd, RawFd};
use std::path::Path;

use byteio_core::cursor::{read_at, write_fixed_at};
use byteio_core::{
    BufferedStream, Erasable, ErrorKind, InputStream, IoError, Offset, OutputStream, Position,
    Result, SeekTarget, SeekableStream, StreamCursor,
};
use tracing::{debug, trace};

use crate::handle::File;
use crate::options::{Creation, FileOptions, Mode};
use crate::platform::{self, NativeHandle};

/// What the bytes in the window currently are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BufferMode {
    /// Look-ahead read from the file; the OS position is at the window's end.
    Read,
    /// Staged bytes not yet written; the OS position is at the window's start.
    Write,
}

/// A seekable file with a sector-aligned read/write buffer.
#[derive(Debug)]
pub struct BufferedFile {
    file: File,
    storage: Vec<u8>,
    window: Range<usize>,
    cursor: StreamCursor,
    mode: BufferMode,
    buffer_size: Option<usize>,
}

impl BufferedFile {
    /// Open `path` with a buffer sized by its file system.
    pub fn open(path: impl AsRef<Path>, mode: Mode, creation: Creation) -> Result<Self> {
        Self::open_with(
            path,
            &FileOptions {
                mode,
                creation,
                buffer_size: None,
            },
        )
    }

    /// Open `path` as `options` describe.
    pub fn open_with(path: impl AsRef<Path>, options: &FileOptions) -> Result<Self> {
        let file = File::open(path, options.mode, options.creation)?;
        let capacity = match options.buffer_size {
            Some(size) => size.max(1),
            None => file.buffer_size()?,
        };
        Ok(Self::with_storage(file, capacity, options.buffer_size))
    }

    /// Take ownership of `handle`, sizing the buffer from its file system.
    ///
    /// If the size cannot be queried the handle is left with the caller.
    pub fn from_raw_handle(handle: NativeHandle) -> Result<Self> {
        let capacity = platform::get_buffer_size(handle)?;
        Ok(Self::with_storage(
            File::from_raw_handle(handle),
            capacity,
            None,
        ))
    }

    /// Take ownership of `handle` with an explicit buffer size.
    pub fn from_raw_handle_with(handle: NativeHandle, buffer_size: usize) -> Self {
        Self::with_storage(
            File::from_raw_handle(handle),
            buffer_size.max(1),
            Some(buffer_size),
        )
    }

    fn with_storage(file: File, capacity: usize, buffer_size: Option<usize>) -> Self {
        trace!(handle = file.native_handle(), capacity, "allocating file buffer");
        Self {
            file,
            storage: vec![0; capacity],
            window: 0..0,
            cursor: StreamCursor::new(),
            mode: BufferMode::Read,
            buffer_size,
        }
    }

    /// The owned OS handle.
    pub fn native_handle(&self) -> NativeHandle {
        self.file.native_handle()
    }

    /// Size of the storage buffer in bytes.
    pub fn buffer_capacity(&self) -> usize {
        self.storage.len()
    }

    /// Flush, then replace the handle and resize the buffer for it.
    pub fn assign(&mut self, handle: NativeHandle) -> Result<()> {
        self.flush()?;
        self.file.assign(handle);
        let capacity = match self.buffer_size {
            Some(size) => size.max(1),
            None => self.file.buffer_size()?,
        };
        self.storage.clear();
        self.storage.resize(capacity, 0);
        self.clear_window();
        Ok(())
    }

    /// Flush, then give up ownership of the handle.
    pub fn release(&mut self) -> Result<NativeHandle> {
        self.flush()?;
        Ok(self.file.release())
    }

    fn is_buffer_empty(&self) -> bool {
        match self.mode {
            BufferMode::Read => self.cursor.index() >= self.window.len(),
            BufferMode::Write => self.cursor.index() == 0,
        }
    }

    fn clear_window(&mut self) {
        self.window = 0..0;
        self.cursor.reset();
    }

    /// Offset into storage that aligns the window's end with a sector boundary.
    fn sector_offset(&self) -> Result<usize> {
        if self.storage.is_empty() {
            return Err(IoError::BadDescriptor("buffered file has no storage"));
        }
        let position = self.file.get_position()?.to_usize()?;
        Ok(position % self.storage.len())
    }

    fn fill_read_window(&mut self) -> Result<()> {
        let start = self.sector_offset()?;
        let n = self.file.read_some(&mut self.storage[start..])?;
        trace!(start, n, "filled read window");
        self.window = start..start + n;
        self.cursor.reset();
        self.mode = BufferMode::Read;
        Ok(())
    }

    /// Drop the first `n` staged bytes once the OS has accepted them.
    fn consume_staged(&mut self, n: usize) {
        self.window.start += n;
        self.cursor = StreamCursor::at(self.cursor.index() - n);
    }

    fn begin_write_window(&mut self) -> Result<()> {
        let start = self.sector_offset()?;
        trace!(start, end = self.storage.len(), "opened write window");
        self.window = start..self.storage.len();
        self.cursor.reset();
        self.mode = BufferMode::Write;
        Ok(())
    }
}

fn offset_of(n: usize) -> Result<Offset> {
    i64::try_from(n)
        .map(Offset::new)
        .map_err(|_| IoError::ValueTooLarge("get_position"))
}

impl InputStream for BufferedFile {
    fn read_some(&mut self, buffer: &mut [u8]) -> Result<usize> {
        if buffer.is_empty() {
            return Ok(0);
        }
        if self.mode == BufferMode::Write {
            self.flush()?;
            self.fill_read_window()?;
        } else if self.is_buffer_empty() {
            self.fill_read_window()?;
        }
        read_at(&self.storage[self.window.clone()], &mut self.cursor, buffer)
    }
}

impl OutputStream for BufferedFile {
    fn write_some(&mut self, buffer: &[u8]) -> Result<usize> {
        if buffer.is_empty() {
            return Ok(0);
        }
        match self.mode {
            BufferMode::Read => {
                // Drops the look-ahead and moves the OS to the logical position.
                self.flush()?;
                self.begin_write_window()?;
            }
            BufferMode::Write if self.cursor.index() >= self.window.len() => {
                self.flush()?;
                self.begin_write_window()?;
            }
            BufferMode::Write => {}
        }
        let window = self.window.clone();
        write_fixed_at(&mut self.storage[window], &mut self.cursor, buffer)
    }
}

impl SeekableStream for BufferedFile {
    fn get_position(&self) -> Result<Position> {
        let os = self.file.get_position()?;
        let consumed = offset_of(self.cursor.index())?;
        match self.mode {
            BufferMode::Read => os
                .checked_sub(offset_of(self.window.len())?)?
                .checked_add(consumed),
            BufferMode::Write => os.checked_add(consumed),
        }
    }

    fn seek_position(&mut self, target: SeekTarget) -> Result<()> {
        self.flush()?;
        self.file.seek_position(target)
    }
}

impl BufferedStream for BufferedFile {
    fn flush(&mut self) -> Result<()> {
        if self.is_buffer_empty() {
            return Ok(());
        }
        match self.mode {
            BufferMode::Read => {
                let logical = self.get_position()?;
                self.file.seek_position(logical.into())?;
            }
            BufferMode::Write => {
                trace!(bytes = self.cursor.index(), "writing staged bytes");
                // Bytes leave the window as soon as they are written, so a
                // failure part way through keeps only what is still pending.
                while self.cursor.index() > 0 {
                    let staged = self.window.start..self.window.start + self.cursor.index();
                    match self.file.write_some(&self.storage[staged]) {
                        Ok(0) => return Err(IoError::WriteZero("flush")),
                        Ok(n) => self.consume_staged(n),
                        Err(err) if err.kind() == ErrorKind::Interrupted => {
                            trace!("flush interrupted, retrying");
                        }
                        Err(err) => return Err(err),
                    }
                }
            }
        }
        self.clear_window();
        Ok(())
    }
}

impl Erasable for BufferedFile {
    fn erased_get_position(&self) -> Result<Position> {
        self.get_position()
    }

    fn erased_seek_position(&mut self, target: SeekTarget) -> Result<()> {
        self.seek_position(target)
    }

    fn erased_flush(&mut self) -> Result<()> {
        self.flush()
    }
}

impl AsRawFd for BufferedFile {
    fn as_raw_fd(&self) -> RawFd {
        self.native_handle()
    }
}

impl Drop for BufferedFile {
    fn drop(&mut self) {
        if let Err(err) = self.flush() {
            debug!(handle = self.native_handle(), %err, "discarding flush failure on drop");
        }
    }
}
