//! File streams for byteio.
//!
//! - [`File`] performs one OS call per operation.
//! - [`BufferedFile`] batches transfers through a sector-aligned buffer while
//!   keeping exact unbuffered semantics, including read/write switches.
//! - [`FileStream`] fixes a buffered file's direction at compile time.
//! - [`standard_input`], [`standard_output`] and [`standard_error`] expose the
//!   process's standard descriptors as shared, type-erased streams.
//!
//! Opening options ([`FileOptions`]) are available on every platform; the
//! streams themselves currently require a Unix target.

pub mod options;

#[cfg(unix)]
pub mod buffered;
#[cfg(unix)]
pub mod handle;
#[cfg(unix)]
pub mod platform;
#[cfg(unix)]
pub mod standard;
#[cfg(unix)]
pub mod stream;

pub use options::{Creation, FileOptions, Mode};

#[cfg(unix)]
pub use buffered::BufferedFile;
#[cfg(unix)]
pub use handle::{BasicFile, File, SpecialFile};
#[cfg(unix)]
pub use platform::{FileKind, NativeHandle, INVALID_HANDLE};
#[cfg(unix)]
pub use standard::{standard_error, standard_input, standard_output};
#[cfg(unix)]
pub use stream::{
    Direction, FileStream, Input, InputFileStream, InputOutput, InputOutputFileStream, Output,
    OutputFileStream, Readable, Writable,
};
