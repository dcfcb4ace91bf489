//! Byte-exact transfers on top of `read_some`/`write_some`.
//!
//! These loops are the only place interrupted operations are retried.

use tracing::trace;

use crate::error::{ErrorKind, IoError, Result};
use crate::stream::{InputStream, OutputStream};

/// A one-byte integral value that can be transferred without conversion.
pub trait RawByte: Copy {
    fn from_raw_byte(byte: u8) -> Self;
    fn to_raw_byte(self) -> u8;
}

impl RawByte for u8 {
    fn from_raw_byte(byte: u8) -> Self {
        byte
    }

    fn to_raw_byte(self) -> u8 {
        self
    }
}

impl RawByte for i8 {
    fn from_raw_byte(byte: u8) -> Self {
        i8::from_ne_bytes([byte])
    }

    fn to_raw_byte(self) -> u8 {
        self.to_ne_bytes()[0]
    }
}

/// Fill `buffer` completely.
///
/// Fails with [`IoError::EndOfStream`] if the stream ends first; bytes read
/// before that point are left in `buffer`.
pub fn read_raw<S: InputStream + ?Sized>(stream: &mut S, buffer: &mut [u8]) -> Result<()> {
    let mut filled = 0usize;
    while filled < buffer.len() {
        match stream.read_some(&mut buffer[filled..]) {
            Ok(0) => return Err(IoError::EndOfStream("read_raw")),
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => {
                trace!(filled, "read interrupted, retrying");
                continue;
            }
            Err(err) => return Err(err),
        }
    }
    Ok(())
}

/// Write all of `buffer`.
pub fn write_raw<S: OutputStream + ?Sized>(stream: &mut S, buffer: &[u8]) -> Result<()> {
    let mut offset = 0usize;
    while offset < buffer.len() {
        match stream.write_some(&buffer[offset..]) {
            Ok(0) => return Err(IoError::WriteZero("write_raw")),
            Ok(n) => offset += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => {
                trace!(offset, "write interrupted, retrying");
                continue;
            }
            Err(err) => return Err(err),
        }
    }
    Ok(())
}

/// Read exactly one byte.
pub fn read_raw_byte<S: InputStream + ?Sized>(stream: &mut S) -> Result<u8> {
    let mut byte = [0u8; 1];
    read_raw(stream, &mut byte)?;
    Ok(byte[0])
}

/// Write exactly one byte.
pub fn write_raw_byte<S: OutputStream + ?Sized>(stream: &mut S, byte: u8) -> Result<()> {
    write_raw(stream, &[byte])
}

/// Read a single `u8` or `i8`.
pub fn read_raw_one<T: RawByte, S: InputStream + ?Sized>(stream: &mut S) -> Result<T> {
    read_raw_byte(stream).map(T::from_raw_byte)
}

/// Write a single `u8` or `i8`.
pub fn write_raw_one<T: RawByte, S: OutputStream + ?Sized>(stream: &mut S, value: T) -> Result<()> {
    write_raw_byte(stream, value.to_raw_byte())
}

/// Fill every slot yielded by `slots`, one byte at a time.
///
/// For destinations that are not contiguous, e.g. a `VecDeque` or a strided view.
pub fn read_raw_iter<'b, S, I>(stream: &mut S, slots: I) -> Result<()>
where
    S: InputStream + ?Sized,
    I: IntoIterator<Item = &'b mut u8>,
{
    for slot in slots {
        *slot = read_raw_byte(stream)?;
    }
    Ok(())
}

/// Write every byte yielded by `bytes`, one at a time.
pub fn write_raw_iter<S, I>(stream: &mut S, bytes: I) -> Result<()>
where
    S: OutputStream + ?Sized,
    I: IntoIterator<Item = u8>,
{
    for byte in bytes {
        write_raw_byte(stream, byte)?;
    }
    Ok(())
}
