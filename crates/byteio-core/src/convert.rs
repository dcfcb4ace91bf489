//! Native ⇄ wire conversion for integers and floating-point values.

use crate::format::{Endian, FloatFormat, Format};

/// Reverse `buffer` in place unless `endianness` is the host byte order.
pub fn swap_bytes(endianness: Endian, buffer: &mut [u8]) {
    if !endianness.is_native() {
        buffer.reverse();
    }
}

/// A fixed-size value with a well-defined wire representation.
pub trait Primitive: Copy + Sized {
    /// Wire representation, always `[u8; SIZE]`.
    type Bytes: AsRef<[u8]> + AsMut<[u8]> + Default;

    const SIZE: usize;

    /// Encode `self` using the layout described by `format`.
    fn to_wire(self, format: Format) -> Self::Bytes;

    /// Decode a value previously produced by [`Primitive::to_wire`] with the same `format`.
    fn from_wire(bytes: Self::Bytes, format: Format) -> Self;
}

macro_rules! byte_primitive {
    ($($t:ty),*) => {
        $(
            // Single bytes have no byte order.
            impl Primitive for $t {
                type Bytes = [u8; 1];

                const SIZE: usize = 1;

                fn to_wire(self, _format: Format) -> [u8; 1] {
                    self.to_ne_bytes()
                }

                fn from_wire(bytes: [u8; 1], _format: Format) -> Self {
                    <$t>::from_ne_bytes(bytes)
                }
            }
        )*
    };
}

macro_rules! integer_primitive {
    ($($t:ty => $unsigned:ty),*) => {
        $(
            impl Primitive for $t {
                type Bytes = [u8; std::mem::size_of::<$t>()];

                const SIZE: usize = std::mem::size_of::<$t>();

                fn to_wire(self, format: Format) -> Self::Bytes {
                    let mut bytes = self.to_ne_bytes();
                    swap_bytes(format.endianness(), &mut bytes);
                    bytes
                }

                fn from_wire(bytes: Self::Bytes, format: Format) -> Self {
                    let endianness = format.endianness();
                    if endianness.is_native() {
                        return <$t>::from_ne_bytes(bytes);
                    }
                    // Accumulate unsigned so the top byte is never sign-extended.
                    let mut value: $unsigned = 0;
                    match endianness {
                        Endian::Little => {
                            for &byte in bytes.iter().rev() {
                                value = (value << 8) | <$unsigned>::from(byte);
                            }
                        }
                        Endian::Big => {
                            for &byte in bytes.iter() {
                                value = (value << 8) | <$unsigned>::from(byte);
                            }
                        }
                    }
                    value as $t
                }
            }
        )*
    };
}

macro_rules! float_primitive {
    ($($t:ty),*) => {
        $(
            impl Primitive for $t {
                type Bytes = [u8; std::mem::size_of::<$t>()];

                const SIZE: usize = std::mem::size_of::<$t>();

                fn to_wire(self, format: Format) -> Self::Bytes {
                    let mut bytes = self.to_ne_bytes();
                    if format.float_format() == FloatFormat::Iec559 {
                        swap_bytes(format.endianness(), &mut bytes);
                    }
                    bytes
                }

                fn from_wire(mut bytes: Self::Bytes, format: Format) -> Self {
                    if format.float_format() == FloatFormat::Iec559 {
                        swap_bytes(format.endianness(), &mut bytes);
                    }
                    <$t>::from_ne_bytes(bytes)
                }
            }
        )*
    };
}

byte_primitive!(u8, i8);

integer_primitive! {
    u16 => u16,
    u32 => u32,
    u64 => u64,
    u128 => u128,
    usize => usize,
    i16 => u16,
    i32 => u32,
    i64 => u64,
    i128 => u128,
    isize => usize
}

float_primitive!(f32, f64);
