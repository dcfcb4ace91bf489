//! Direction-typed buffered file streams.

use std::marker::PhantomData;
use std::os::fd::{AsRawFd, RawFd};
use std::path::Path;

use byteio_core::{
    BufferedStream, Erasable, InputStream, OutputStream, Position, Result, SeekTarget,
    SeekableStream,
};

use crate::buffered::BufferedFile;
use crate::options::{Creation, FileOptions, Mode};
use crate::platform::NativeHandle;

mod sealed {
    pub trait Sealed {}
}

/// Marker for what a [`FileStream`] may do.
pub trait Direction: sealed::Sealed + Send + Sync + 'static {
    const MODE: Mode;
    const CREATION: Creation;
}

/// Directions that allow reading.
pub trait Readable: Direction {}

/// Directions that allow writing.
pub trait Writable: Direction {}

/// Read-only; the file must exist.
#[derive(Debug, Clone, Copy)]
pub enum Input {}

/// Write-only; the file is created if needed.
#[derive(Debug, Clone, Copy)]
pub enum Output {}

/// Read-write; the file is created if needed.
#[derive(Debug, Clone, Copy)]
pub enum InputOutput {}

impl sealed::Sealed for Input {}
impl sealed::Sealed for Output {}
impl sealed::Sealed for InputOutput {}

impl Direction for Input {
    const MODE: Mode = Mode::Read;
    const CREATION: Creation = Creation::OpenExisting;
}

impl Direction for Output {
    const MODE: Mode = Mode::Write;
    const CREATION: Creation = Creation::IfNeeded;
}

impl Direction for InputOutput {
    const MODE: Mode = Mode::Write;
    const CREATION: Creation = Creation::IfNeeded;
}

impl Readable for Input {}
impl Readable for InputOutput {}
impl Writable for Output {}
impl Writable for InputOutput {}

/// A buffered file stream whose direction is fixed at compile time.
///
/// Reading is only available for [`Readable`] directions and writing only
/// for [`Writable`] ones. All directions can seek and flush.
#[derive(Debug)]
pub struct FileStream<D: Direction> {
    file: BufferedFile,
    _direction: PhantomData<D>,
}

/// Read-only file stream.
pub type InputFileStream = FileStream<Input>;
/// Write-only file stream.
pub type OutputFileStream = FileStream<Output>;
/// Readable and writable file stream.
pub type InputOutputFileStream = FileStream<InputOutput>;

impl<D: Direction> FileStream<D> {
    /// Open `path` with the direction's default mode and creation.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(
            path,
            &FileOptions::default()
                .with_mode(D::MODE)
                .with_creation(D::CREATION),
        )
    }

    /// Open `path` with the direction's mode and the remaining `options`.
    ///
    /// `options.mode` is ignored: the direction decides it.
    pub fn open_with(path: impl AsRef<Path>, options: &FileOptions) -> Result<Self> {
        let options = options.clone().with_mode(D::MODE);
        Ok(Self::from_buffered(BufferedFile::open_with(path, &options)?))
    }

    /// Take ownership of `handle`; see [`BufferedFile::from_raw_handle`].
    pub fn from_raw_handle(handle: NativeHandle) -> Result<Self> {
        Ok(Self::from_buffered(BufferedFile::from_raw_handle(handle)?))
    }

    /// Wrap an already open buffered file.
    pub fn from_buffered(file: BufferedFile) -> Self {
        Self {
            file,
            _direction: PhantomData,
        }
    }

    /// The owned OS handle.
    pub fn native_handle(&self) -> NativeHandle {
        self.file.native_handle()
    }

    /// Flush, then take ownership of `handle`; see [`BufferedFile::assign`].
    pub fn assign(&mut self, handle: NativeHandle) -> Result<()> {
        self.file.assign(handle)
    }

    /// Flush, then give up ownership of the handle.
    pub fn release(&mut self) -> Result<NativeHandle> {
        self.file.release()
    }

    /// The underlying buffered file.
    pub fn get_ref(&self) -> &BufferedFile {
        &self.file
    }

    pub fn into_inner(self) -> BufferedFile {
        self.file
    }
}

impl<D: Writable> FileStream<D> {
    /// Open `path` for writing with an explicit creation policy.
    pub fn create(path: impl AsRef<Path>, creation: Creation) -> Result<Self> {
        Self::open_with(path, &FileOptions::default().with_creation(creation))
    }
}

impl<D: Readable> InputStream for FileStream<D> {
    fn read_some(&mut self, buffer: &mut [u8]) -> Result<usize> {
        self.file.read_some(buffer)
    }
}

impl<D: Writable> OutputStream for FileStream<D> {
    fn write_some(&mut self, buffer: &[u8]) -> Result<usize> {
        self.file.write_some(buffer)
    }
}

impl<D: Direction> SeekableStream for FileStream<D> {
    fn get_position(&self) -> Result<Position> {
        self.file.get_position()
    }

    fn seek_position(&mut self, target: SeekTarget) -> Result<()> {
        self.file.seek_position(target)
    }
}

impl<D: Direction> BufferedStream for FileStream<D> {
    fn flush(&mut self) -> Result<()> {
        self.file.flush()
    }
}

impl<D: Direction> Erasable for FileStream<D> {
    fn erased_get_position(&self) -> Result<Position> {
        self.file.get_position()
    }

    fn erased_seek_position(&mut self, target: SeekTarget) -> Result<()> {
        self.file.seek_position(target)
    }

    fn erased_flush(&mut self) -> Result<()> {
        self.file.flush()
    }
}

impl<D: Direction> AsRawFd for FileStream<D> {
    fn as_raw_fd(&self) -> RawFd {
        self.native_handle()
    }
}

#[cfg(test)]
mod tests {
    use byteio_core::{read, write, BasePosition, Context, Format};

    use super::*;

    fn scratch_path(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("byteio-stream-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn typed_values_round_trip_through_a_file() {
        let path = scratch_path("typed.bin");
        {
            let mut out = OutputFileStream::create(&path, Creation::AlwaysNew).unwrap();
            let mut ctx = Context::with_format(&mut out, Format::BIG_ENDIAN);
            write(&0x0102_0304u32, &mut ctx).unwrap();
            write(&-2.5f64, &mut ctx).unwrap();
            write(&true, &mut ctx).unwrap();
            out.flush().unwrap();
        }
        assert_eq!(&std::fs::read(&path).unwrap()[..4], &[1, 2, 3, 4]);

        let mut input = InputFileStream::open(&path).unwrap();
        let mut ctx = Context::with_format(&mut input, Format::BIG_ENDIAN);
        assert_eq!(read::<u32, _>(&mut ctx).unwrap(), 0x0102_0304);
        assert_eq!(read::<f64, _>(&mut ctx).unwrap(), -2.5);
        assert!(read::<bool, _>(&mut ctx).unwrap());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn input_stream_requires_existing_file() {
        let path = scratch_path("absent.bin");
        let _ = std::fs::remove_file(&path);
        assert!(InputFileStream::open(&path).is_err());
    }

    #[test]
    fn input_output_stream_reads_back_its_writes() {
        let path = scratch_path("both.bin");
        let mut stream = InputOutputFileStream::create(&path, Creation::AlwaysNew).unwrap();
        byteio_core::write_raw(&mut stream, b"hello").unwrap();
        stream.seek_position(BasePosition::Beginning.into()).unwrap();
        let mut buf = [0u8; 5];
        byteio_core::read_raw(&mut stream, &mut buf).unwrap();
        assert_eq!(&buf, b"hello");
        assert_eq!(stream.erased_get_position().unwrap().get(), 5);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn open_with_keeps_buffer_size_override() {
        let path = scratch_path("override.bin");
        let options = FileOptions::default()
            .with_creation(Creation::AlwaysNew)
            .with_buffer_size(32);
        let stream = OutputFileStream::open_with(&path, &options).unwrap();
        assert_eq!(stream.get_ref().buffer_capacity(), 32);
        let _ = std::fs::remove_file(&path);
    }
}
