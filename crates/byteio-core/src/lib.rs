//! Capability-based byte streams with format-aware binary encoding.
//!
//! This is the lowest layer of byteio. A stream is any type implementing
//! some subset of:
//! - [`InputStream`]: `read_some`
//! - [`OutputStream`]: `write_some`
//! - [`SeekableStream`]: `get_position` / `seek_position`
//! - [`BufferedStream`]: `flush`
//!
//! On top of those sit the byte-exact transfer loops ([`read_raw`],
//! [`write_raw`]), typed encoding through a [`Context`] ([`read`], [`write`]),
//! in-memory streams, type-erased wrappers and a mutex-guarded decorator for
//! sharing one stream between threads.

pub mod any;
pub mod codec;
pub mod compat;
pub mod context;
pub mod convert;
pub mod cursor;
pub mod error;
pub mod format;
pub mod memory;
pub mod position;
pub mod raw;
pub mod span;
pub mod stream;
pub mod sync;

pub use any::{AnyInputOutputStream, AnyInputStream, AnyOutputStream};
pub use codec::{read, read_bytes, read_into, write, write_bytes, Decode, Encode};
pub use compat::{IoAdapter, StdStream};
pub use context::Context;
pub use convert::{swap_bytes, Primitive};
pub use cursor::StreamCursor;
pub use error::{ErrorKind, IoError, Result};
pub use format::{Endian, FloatFormat, Format};
pub use memory::{GrowableBuffer, InputMemoryStream, MemoryStream, OutputMemoryStream};
pub use position::{BasePosition, Offset, Position, SeekTarget};
pub use raw::{
    read_raw, read_raw_byte, read_raw_iter, read_raw_one, write_raw, write_raw_byte,
    write_raw_iter, write_raw_one, RawByte,
};
pub use span::{InputOutputSpanStream, InputSpanStream, OutputSpanStream};
pub use stream::{
    BufferedStream, Erasable, InputOutputStream, InputStream, OutputStream, SeekableStream,
};
pub use sync::SynchronizedStream;
