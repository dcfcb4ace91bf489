//! Unbuffered file handles.

use std::os::fd::{AsRawFd, IntoRawFd, OwnedFd, RawFd};
use std::path::Path;

use byteio_core::{
    Erasable, InputStream, OutputStream, Position, Result, SeekTarget, SeekableStream,
};
use tracing::debug;

use crate::options::{Creation, Mode};
use crate::platform::{self, NativeHandle, INVALID_HANDLE};

/// Sole owner of one native handle.
///
/// The handle is closed exactly once, when the owner is dropped or a new
/// handle is assigned. Close failures are ignored.
#[derive(Debug)]
pub struct BasicFile {
    handle: NativeHandle,
}

impl BasicFile {
    /// Take ownership of `handle`.
    ///
    /// The handle will be closed when the returned value is dropped, so the
    /// caller must not close it or hand it to another owner.
    pub fn from_raw_handle(handle: NativeHandle) -> Self {
        Self { handle }
    }

    /// The owned OS handle.
    pub fn native_handle(&self) -> NativeHandle {
        self.handle
    }

    /// Whether a handle is currently owned.
    pub fn is_valid(&self) -> bool {
        self.handle != INVALID_HANDLE
    }

    /// Close the current handle and take ownership of `handle`.
    pub fn assign(&mut self, handle: NativeHandle) {
        let previous = std::mem::replace(&mut self.handle, handle);
        debug!(previous, handle, "reassigning file handle");
        platform::close_file(previous);
    }

    /// Give up ownership of the handle without closing it.
    pub fn release(&mut self) -> NativeHandle {
        let handle = std::mem::replace(&mut self.handle, INVALID_HANDLE);
        debug!(handle, "released file handle");
        handle
    }
}

impl Default for BasicFile {
    fn default() -> Self {
        Self {
            handle: INVALID_HANDLE,
        }
    }
}

impl Drop for BasicFile {
    fn drop(&mut self) {
        if self.is_valid() {
            debug!(handle = self.handle, "closing file handle");
            platform::close_file(self.handle);
        }
    }
}

impl AsRawFd for BasicFile {
    fn as_raw_fd(&self) -> RawFd {
        self.handle
    }
}

impl From<OwnedFd> for BasicFile {
    fn from(fd: OwnedFd) -> Self {
        Self::from_raw_handle(fd.into_raw_fd())
    }
}

/// An unbuffered, seekable file. Every operation is one OS call.
#[derive(Debug, Default)]
pub struct File {
    handle: BasicFile,
}

impl File {
    /// Open `path` without buffering.
    pub fn open(path: impl AsRef<Path>, mode: Mode, creation: Creation) -> Result<Self> {
        let handle = platform::open_file(path.as_ref(), mode, creation)?;
        Ok(Self::from_raw_handle(handle))
    }

    /// Take ownership of `handle`; see [`BasicFile::from_raw_handle`].
    pub fn from_raw_handle(handle: NativeHandle) -> Self {
        Self {
            handle: BasicFile::from_raw_handle(handle),
        }
    }

    /// The owned OS handle.
    pub fn native_handle(&self) -> NativeHandle {
        self.handle.native_handle()
    }

    /// Close the current handle and take ownership of `handle`.
    pub fn assign(&mut self, handle: NativeHandle) {
        self.handle.assign(handle);
    }

    /// Give up ownership of the handle without closing it.
    pub fn release(&mut self) -> NativeHandle {
        self.handle.release()
    }

    /// Preferred transfer size of the underlying file system.
    pub fn buffer_size(&self) -> Result<usize> {
        platform::get_buffer_size(self.native_handle())
    }
}

impl InputStream for File {
    fn read_some(&mut self, buffer: &mut [u8]) -> Result<usize> {
        platform::read_some(self.native_handle(), buffer)
    }
}

impl OutputStream for File {
    fn write_some(&mut self, buffer: &[u8]) -> Result<usize> {
        platform::write_some(self.native_handle(), buffer)
    }
}

impl SeekableStream for File {
    fn get_position(&self) -> Result<Position> {
        platform::get_position(self.native_handle())
    }

    fn seek_position(&mut self, target: SeekTarget) -> Result<()> {
        platform::seek_position(self.native_handle(), target)
    }
}

impl Erasable for File {
    fn erased_get_position(&self) -> Result<Position> {
        self.get_position()
    }

    fn erased_seek_position(&mut self, target: SeekTarget) -> Result<()> {
        self.seek_position(target)
    }
}

impl AsRawFd for File {
    fn as_raw_fd(&self) -> RawFd {
        self.native_handle()
    }
}

/// A file without random access, such as a terminal or a pipe.
#[derive(Debug, Default)]
pub struct SpecialFile {
    handle: BasicFile,
}

impl SpecialFile {
    /// Take ownership of `handle`; see [`BasicFile::from_raw_handle`].
    pub fn from_raw_handle(handle: NativeHandle) -> Self {
        Self {
            handle: BasicFile::from_raw_handle(handle),
        }
    }

    /// The owned OS handle.
    pub fn native_handle(&self) -> NativeHandle {
        self.handle.native_handle()
    }

    /// Close the current handle and take ownership of `handle`.
    pub fn assign(&mut self, handle: NativeHandle) {
        self.handle.assign(handle);
    }

    /// Give up ownership of the handle without closing it.
    pub fn release(&mut self) -> NativeHandle {
        self.handle.release()
    }
}

impl InputStream for SpecialFile {
    fn read_some(&mut self, buffer: &mut [u8]) -> Result<usize> {
        platform::read_some(self.native_handle(), buffer)
    }
}

impl OutputStream for SpecialFile {
    fn write_some(&mut self, buffer: &[u8]) -> Result<usize> {
        platform::write_some(self.native_handle(), buffer)
    }
}

impl Erasable for SpecialFile {}

impl AsRawFd for SpecialFile {
    fn as_raw_fd(&self) -> RawFd {
        self.native_handle()
    }
}
