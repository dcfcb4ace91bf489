//! Typed reads and writes through a [`Context`].
//!
//! Types describe their own layout by implementing [`Encode`]/[`Decode`];
//! `bool`, integers and floats come with built-in implementations that go
//! through the conversion engine using the context's [`Format`](crate::Format).

use crate::context::Context;
use crate::convert::Primitive;
use crate::error::{IoError, Result};
use crate::raw::{read_raw, write_raw};
use crate::stream::{InputStream, OutputStream};

/// A value that can write itself to a stream.
pub trait Encode {
    fn encode<S: OutputStream + ?Sized>(&self, ctx: &mut Context<'_, S>) -> Result<()>;
}

/// A value that can read itself from a stream.
pub trait Decode: Sized {
    fn decode<S: InputStream + ?Sized>(ctx: &mut Context<'_, S>) -> Result<Self>;
}

/// Write `value` using the context's format.
pub fn write<T, S>(value: &T, ctx: &mut Context<'_, S>) -> Result<()>
where
    T: Encode + ?Sized,
    S: OutputStream + ?Sized,
{
    value.encode(ctx)
}

/// Read a `T` using the context's format.
pub fn read<T, S>(ctx: &mut Context<'_, S>) -> Result<T>
where
    T: Decode,
    S: InputStream + ?Sized,
{
    T::decode(ctx)
}

/// Fill every element of `values` in order using the context's format.
///
/// On failure the elements before the failing one hold decoded values and
/// the rest are unchanged.
pub fn read_into<T, S>(ctx: &mut Context<'_, S>, values: &mut [T]) -> Result<()>
where
    T: Decode,
    S: InputStream + ?Sized,
{
    for value in values {
        *value = T::decode(ctx)?;
    }
    Ok(())
}

/// Write raw bytes through the context's stream; the format does not apply.
pub fn write_bytes<S: OutputStream + ?Sized>(ctx: &mut Context<'_, S>, bytes: &[u8]) -> Result<()> {
    write_raw(ctx.get_stream_mut(), bytes)
}

/// Fill `bytes` from the context's stream; the format does not apply.
pub fn read_bytes<S: InputStream + ?Sized>(
    ctx: &mut Context<'_, S>,
    bytes: &mut [u8],
) -> Result<()> {
    read_raw(ctx.get_stream_mut(), bytes)
}

fn encode_primitive<T, S>(value: T, ctx: &mut Context<'_, S>) -> Result<()>
where
    T: Primitive,
    S: OutputStream + ?Sized,
{
    let bytes = value.to_wire(ctx.get_format());
    write_raw(ctx.get_stream_mut(), bytes.as_ref())
}

fn decode_primitive<T, S>(ctx: &mut Context<'_, S>) -> Result<T>
where
    T: Primitive,
    S: InputStream + ?Sized,
{
    let mut bytes = T::Bytes::default();
    read_raw(ctx.get_stream_mut(), bytes.as_mut())?;
    Ok(T::from_wire(bytes, ctx.get_format()))
}

macro_rules! primitive_codec {
    ($($t:ty),*) => {
        $(
            impl Encode for $t {
                fn encode<S: OutputStream + ?Sized>(&self, ctx: &mut Context<'_, S>) -> Result<()> {
                    encode_primitive(*self, ctx)
                }
            }

            impl Decode for $t {
                fn decode<S: InputStream + ?Sized>(ctx: &mut Context<'_, S>) -> Result<Self> {
                    decode_primitive(ctx)
                }
            }
        )*
    };
}

primitive_codec!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64);

impl Encode for bool {
    fn encode<S: OutputStream + ?Sized>(&self, ctx: &mut Context<'_, S>) -> Result<()> {
        encode_primitive(u8::from(*self), ctx)
    }
}

impl Decode for bool {
    fn decode<S: InputStream + ?Sized>(ctx: &mut Context<'_, S>) -> Result<Self> {
        Ok(decode_primitive::<u8, S>(ctx)? != 0)
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode<S: OutputStream + ?Sized>(&self, ctx: &mut Context<'_, S>) -> Result<()> {
        (**self).encode(ctx)
    }
}

impl<T: Encode> Encode for [T] {
    fn encode<S: OutputStream + ?Sized>(&self, ctx: &mut Context<'_, S>) -> Result<()> {
        for item in self {
            item.encode(ctx)?;
        }
        Ok(())
    }
}

impl<T: Encode, const N: usize> Encode for [T; N] {
    fn encode<S: OutputStream + ?Sized>(&self, ctx: &mut Context<'_, S>) -> Result<()> {
        self.as_slice().encode(ctx)
    }
}

impl<T: Decode, const N: usize> Decode for [T; N] {
    fn decode<S: InputStream + ?Sized>(ctx: &mut Context<'_, S>) -> Result<Self> {
        let mut items = Vec::with_capacity(N);
        for _ in 0..N {
            items.push(T::decode(ctx)?);
        }
        items
            .try_into()
            .map_err(|_| IoError::InvalidArgument("decode"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, IoError};
    use crate::format::{Endian, FloatFormat, Format};

    #[derive(Default)]
    struct Sink(Vec<u8>);

    impl OutputStream for Sink {
        fn write_some(&mut self, buffer: &[u8]) -> Result<usize> {
            self.0.extend_from_slice(buffer);
            Ok(buffer.len())
        }
    }

    struct Source {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl InputStream for Source {
        fn read_some(&mut self, buffer: &mut [u8]) -> Result<usize> {
            let n = (self.bytes.len() - self.pos).min(buffer.len());
            buffer[..n].copy_from_slice(&self.bytes[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    /// A type that prefers its own compact layout.
    #[derive(Debug, PartialEq)]
    struct Point {
        x: i16,
        y: i16,
    }

    impl Encode for Point {
        fn encode<S: OutputStream + ?Sized>(&self, ctx: &mut Context<'_, S>) -> Result<()> {
            // Always big-endian regardless of the caller's format.
            let saved = ctx.get_format();
            ctx.set_format(Format::BIG_ENDIAN);
            let result = write(&self.x, ctx).and_then(|()| write(&self.y, ctx));
            ctx.set_format(saved);
            result
        }
    }

    impl Decode for Point {
        fn decode<S: InputStream + ?Sized>(ctx: &mut Context<'_, S>) -> Result<Self> {
            let saved = ctx.get_format();
            ctx.set_format(Format::BIG_ENDIAN);
            let x = read(ctx);
            let y = read(ctx);
            ctx.set_format(saved);
            Ok(Self { x: x?, y: y? })
        }
    }

    #[test]
    fn u32_42_big_and_little_endian() {
        let mut sink = Sink::default();
        write(&42u32, &mut Context::with_format(&mut sink, Format::BIG_ENDIAN)).unwrap();
        assert_eq!(sink.0, [0, 0, 0, 42]);

        let mut sink = Sink::default();
        write(
            &42u32,
            &mut Context::with_format(&mut sink, Format::LITTLE_ENDIAN),
        )
        .unwrap();
        assert_eq!(sink.0, [42, 0, 0, 0]);
    }

    #[test]
    fn bool_is_one_byte_nonzero_true() {
        let mut sink = Sink::default();
        let mut ctx = Context::new(&mut sink);
        write(&true, &mut ctx).unwrap();
        write(&false, &mut ctx).unwrap();
        assert_eq!(sink.0, [1, 0]);

        let mut source = Source {
            bytes: vec![0, 1, 0x80],
            pos: 0,
        };
        let mut ctx = Context::new(&mut source);
        assert!(!read::<bool, _>(&mut ctx).unwrap());
        assert!(read::<bool, _>(&mut ctx).unwrap());
        assert!(read::<bool, _>(&mut ctx).unwrap());
    }

    #[test]
    fn user_hook_takes_precedence() {
        let point = Point { x: 1, y: -2 };
        let mut sink = Sink::default();
        let mut ctx = Context::with_format(&mut sink, Format::LITTLE_ENDIAN);
        write(&point, &mut ctx).unwrap();
        assert_eq!(ctx.get_format(), Format::LITTLE_ENDIAN);
        assert_eq!(sink.0, [0, 1, 0xFF, 0xFE]);

        let mut source = Source { bytes: sink.0, pos: 0 };
        let decoded: Point = read(&mut Context::new(&mut source)).unwrap();
        assert_eq!(decoded, point);
    }

    #[test]
    fn slices_encode_element_wise() {
        let mut sink = Sink::default();
        let mut ctx = Context::with_format(&mut sink, Format::BIG_ENDIAN);
        write(&[1u16, 2, 3], &mut ctx).unwrap();
        write_bytes(&mut ctx, b"ok").unwrap();
        assert_eq!(sink.0, [0, 1, 0, 2, 0, 3, b'o', b'k']);
    }

    #[test]
    fn arrays_and_slices_decode_element_wise() {
        let mut sink = Sink::default();
        write(&[1u16, 2, 3], &mut Context::with_format(&mut sink, Format::BIG_ENDIAN)).unwrap();
        write(&[-1i8, 7], &mut Context::new(&mut sink)).unwrap();

        let mut source = Source {
            bytes: sink.0,
            pos: 0,
        };
        let mut ctx = Context::with_format(&mut source, Format::BIG_ENDIAN);
        assert_eq!(read::<[u16; 3], _>(&mut ctx).unwrap(), [1, 2, 3]);
        let mut tail = [0i8; 2];
        read_into(&mut ctx, &mut tail).unwrap();
        assert_eq!(tail, [-1, 7]);

        // Too few bytes left for a whole array.
        let err = read::<[u16; 1], _>(&mut ctx).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EndOfStream);
    }

    #[test]
    fn short_read_is_end_of_stream() {
        let mut source = Source {
            bytes: vec![1, 2],
            pos: 0,
        };
        let err: IoError = read::<u32, _>(&mut Context::new(&mut source)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EndOfStream);
    }

    #[test]
    fn floats_through_context() {
        let format = Format::new(Endian::Big, FloatFormat::Iec559);
        let mut sink = Sink::default();
        write(&-0.5f64, &mut Context::with_format(&mut sink, format)).unwrap();
        assert_eq!(sink.0[0], 0xBF);

        let mut source = Source { bytes: sink.0, pos: 0 };
        let value: f64 = read(&mut Context::with_format(&mut source, format)).unwrap();
        assert_eq!(value, -0.5);
    }
}
