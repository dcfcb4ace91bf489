//! Binary stream I/O with explicit byte order and sector-buffered files.
//!
//! byteio reads and writes typed values over byte streams. Streams declare
//! what they can do through small capability traits (read, write, seek,
//! flush); typed transfers go through a [`Context`](stream::Context) that pairs
//! a stream with a [`Format`](stream::Format) describing byte order and float
//! representation.
//!
//! # Crate Structure
//!
//! - [`stream`]: Capability traits, encoding, memory streams, erasure and locking
//! - [`file`]: Unbuffered and buffered files, standard streams (behind `file` feature)
//!
//! # Example
//!
//! ```
//! use byteio::prelude::*;
//!
//! let mut stream = MemoryStream::<Vec<u8>>::default();
//! let mut ctx = Context::with_format(&mut stream, Format::BIG_ENDIAN);
//! write(&42u32, &mut ctx).unwrap();
//! assert_eq!(stream.get_buffer(), &[0, 0, 0, 42]);
//! ```

/// Re-export core stream types.
pub mod stream {
    pub use byteio_core::*;
}

/// Re-export file stream types (requires `file` feature).
#[cfg(feature = "file")]
pub mod file {
    pub use byteio_file::*;
}

/// The traits and types most programs need.
pub mod prelude {
    pub use byteio_core::{
        read, read_raw, write, write_raw, AnyInputOutputStream, AnyInputStream, AnyOutputStream,
        BasePosition, BufferedStream, Context, Decode, Encode, Endian, Erasable, FloatFormat,
        Format, InputOutputSpanStream, InputSpanStream, InputStream, IoError, MemoryStream,
        Offset, OutputSpanStream, OutputStream, Position, SeekTarget, SeekableStream,
        SynchronizedStream,
    };

    #[cfg(all(feature = "file", unix))]
    pub use byteio_file::{
        standard_error, standard_input, standard_output, Creation, InputFileStream,
        InputOutputFileStream, OutputFileStream,
    };
}
