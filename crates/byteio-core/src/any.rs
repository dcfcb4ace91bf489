//! Type-erased streams.
//!
//! [`AnyInputStream`], [`AnyOutputStream`] and [`AnyInputOutputStream`] own
//! at most one boxed concrete stream and forward every capability to it. The
//! optional capabilities (seeking, flushing, duplication) are looked up
//! through [`Erasable`], so a held stream that lacks one reports it at call
//! time instead of failing to compile.

use std::any::{type_name, Any};
use std::fmt;

use tracing::debug;

use crate::error::{IoError, Result};
use crate::position::{Position, SeekTarget};
use crate::stream::{BufferedStream, Erasable, InputStream, OutputStream, SeekableStream};

trait ErasedCore: Send {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
    fn type_name(&self) -> &'static str;
    fn get_position(&self) -> Result<Position>;
    fn seek_position(&mut self, target: SeekTarget) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
}

trait ErasedInput: ErasedCore {
    fn read_some(&mut self, buffer: &mut [u8]) -> Result<usize>;
    fn duplicate(&self) -> Option<Box<dyn ErasedInput>>;
}

trait ErasedOutput: ErasedCore {
    fn write_some(&mut self, buffer: &[u8]) -> Result<usize>;
    fn duplicate(&self) -> Option<Box<dyn ErasedOutput>>;
}

trait ErasedInputOutput: ErasedCore {
    fn read_some(&mut self, buffer: &mut [u8]) -> Result<usize>;
    fn write_some(&mut self, buffer: &[u8]) -> Result<usize>;
    fn duplicate(&self) -> Option<Box<dyn ErasedInputOutput>>;
}

struct Holder<S>(S);

impl<S: Erasable> ErasedCore for Holder<S> {
    fn as_any(&self) -> &dyn Any {
        &self.0
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        &mut self.0
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        let Holder(stream) = *self;
        Box::new(stream)
    }

    fn type_name(&self) -> &'static str {
        type_name::<S>()
    }

    fn get_position(&self) -> Result<Position> {
        self.0.erased_get_position()
    }

    fn seek_position(&mut self, target: SeekTarget) -> Result<()> {
        self.0.erased_seek_position(target)
    }

    fn flush(&mut self) -> Result<()> {
        self.0.erased_flush()
    }
}

impl<S: Erasable + InputStream> ErasedInput for Holder<S> {
    fn read_some(&mut self, buffer: &mut [u8]) -> Result<usize> {
        self.0.read_some(buffer)
    }

    fn duplicate(&self) -> Option<Box<dyn ErasedInput>> {
        let copy = self.0.erased_duplicate()?;
        Some(Box::new(Holder(copy)))
    }
}

impl<S: Erasable + OutputStream> ErasedOutput for Holder<S> {
    fn write_some(&mut self, buffer: &[u8]) -> Result<usize> {
        self.0.write_some(buffer)
    }

    fn duplicate(&self) -> Option<Box<dyn ErasedOutput>> {
        let copy = self.0.erased_duplicate()?;
        Some(Box::new(Holder(copy)))
    }
}

impl<S: Erasable + InputStream + OutputStream> ErasedInputOutput for Holder<S> {
    fn read_some(&mut self, buffer: &mut [u8]) -> Result<usize> {
        self.0.read_some(buffer)
    }

    fn write_some(&mut self, buffer: &[u8]) -> Result<usize> {
        self.0.write_some(buffer)
    }

    fn duplicate(&self) -> Option<Box<dyn ErasedInputOutput>> {
        let copy = self.0.erased_duplicate()?;
        Some(Box::new(Holder(copy)))
    }
}

macro_rules! erased_stream {
    ($(#[$doc:meta])* $name:ident, $erased:ident, $($bound:path),+) => {
        $(#[$doc])*
        #[derive(Default)]
        pub struct $name {
            inner: Option<Box<dyn $erased>>,
        }

        impl $name {
            /// Erase `stream`.
            pub fn new<S: Erasable $(+ $bound)+>(stream: S) -> Self {
                Self {
                    inner: Some(Box::new(Holder(stream))),
                }
            }

            /// Whether a stream is held.
            pub fn has_value(&self) -> bool {
                self.inner.is_some()
            }

            /// Name of the held stream type, if any.
            pub fn type_name(&self) -> Option<&'static str> {
                self.inner.as_ref().map(|inner| inner.type_name())
            }

            /// Borrow the held stream as `T`.
            pub fn get<T: 'static>(&self) -> Result<&T> {
                let inner = self.inner.as_ref().ok_or(IoError::EmptyStream)?;
                let actual = inner.type_name();
                inner.as_any().downcast_ref::<T>().ok_or(IoError::TypeMismatch {
                    expected: type_name::<T>(),
                    actual,
                })
            }

            /// Mutably borrow the held stream as `T`.
            pub fn get_mut<T: 'static>(&mut self) -> Result<&mut T> {
                let inner = self.inner.as_mut().ok_or(IoError::EmptyStream)?;
                let actual = inner.type_name();
                inner.as_any_mut().downcast_mut::<T>().ok_or(IoError::TypeMismatch {
                    expected: type_name::<T>(),
                    actual,
                })
            }

            /// Drop the held stream, if any, and hold `stream` instead.
            pub fn emplace<S: Erasable $(+ $bound)+>(&mut self, stream: S) {
                self.emplace_with(|| stream);
            }

            /// Drop the held stream, if any, then hold the stream built by `make`.
            pub fn emplace_with<S, F>(&mut self, make: F)
            where
                S: Erasable $(+ $bound)+,
                F: FnOnce() -> S,
            {
                self.reset();
                self.inner = Some(Box::new(Holder(make())));
            }

            /// Take the held stream out as `T`, leaving the wrapper empty.
            ///
            /// On a type mismatch the wrapper keeps its value.
            pub fn release<T: 'static>(&mut self) -> Result<T> {
                let inner = self.inner.as_ref().ok_or(IoError::EmptyStream)?;
                let actual = inner.type_name();
                let mismatch = IoError::TypeMismatch {
                    expected: type_name::<T>(),
                    actual,
                };
                if !inner.as_any().is::<T>() {
                    return Err(mismatch);
                }
                match self.inner.take().map(|inner| inner.into_any().downcast::<T>()) {
                    Some(Ok(stream)) => Ok(*stream),
                    _ => Err(mismatch),
                }
            }

            /// Drop the held stream, if any.
            pub fn reset(&mut self) {
                self.inner = None;
            }

            pub fn swap(&mut self, other: &mut Self) {
                std::mem::swap(&mut self.inner, &mut other.inner);
            }

            /// Move the held stream into a new wrapper, leaving this one empty.
            pub fn take(&mut self) -> Self {
                Self {
                    inner: self.inner.take(),
                }
            }

            /// Deep-copy the held stream.
            ///
            /// Fails with [`IoError::NotClonable`] if the held type cannot be
            /// duplicated. Cloning an empty wrapper yields an empty wrapper.
            pub fn try_clone(&self) -> Result<Self> {
                let Some(inner) = self.inner.as_ref() else {
                    return Ok(Self::default());
                };
                match inner.duplicate() {
                    Some(copy) => Ok(Self { inner: Some(copy) }),
                    None => {
                        debug!(type_name = inner.type_name(), "held stream cannot be cloned");
                        Err(IoError::NotClonable {
                            type_name: inner.type_name(),
                        })
                    }
                }
            }

            fn held(&self) -> Result<&dyn $erased> {
                self.inner.as_deref().ok_or(IoError::EmptyStream)
            }

            fn held_mut(&mut self) -> Result<&mut (dyn $erased + 'static)> {
                self.inner.as_deref_mut().ok_or(IoError::EmptyStream)
            }
        }

        impl SeekableStream for $name {
            fn get_position(&self) -> Result<Position> {
                self.held()?.get_position()
            }

            fn seek_position(&mut self, target: SeekTarget) -> Result<()> {
                self.held_mut()?.seek_position(target)
            }
        }

        impl BufferedStream for $name {
            fn flush(&mut self) -> Result<()> {
                self.held_mut()?.flush()
            }
        }

        impl Erasable for $name {
            fn erased_get_position(&self) -> Result<Position> {
                self.get_position()
            }

            fn erased_seek_position(&mut self, target: SeekTarget) -> Result<()> {
                self.seek_position(target)
            }

            fn erased_flush(&mut self) -> Result<()> {
                self.flush()
            }

            fn erased_duplicate(&self) -> Option<Self> {
                self.try_clone().ok()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("type", &self.type_name())
                    .finish()
            }
        }
    };
}

erased_stream!(
    /// A readable stream of any concrete type.
    AnyInputStream, ErasedInput, InputStream
);

erased_stream!(
    /// A writable stream of any concrete type.
    AnyOutputStream, ErasedOutput, OutputStream
);

erased_stream!(
    /// A readable and writable stream of any concrete type.
    AnyInputOutputStream, ErasedInputOutput, InputStream, OutputStream
);

impl InputStream for AnyInputStream {
    fn read_some(&mut self, buffer: &mut [u8]) -> Result<usize> {
        self.held_mut()?.read_some(buffer)
    }
}

impl OutputStream for AnyOutputStream {
    fn write_some(&mut self, buffer: &[u8]) -> Result<usize> {
        self.held_mut()?.write_some(buffer)
    }
}

impl InputStream for AnyInputOutputStream {
    fn read_some(&mut self, buffer: &mut [u8]) -> Result<usize> {
        self.held_mut()?.read_some(buffer)
    }
}

impl OutputStream for AnyInputOutputStream {
    fn write_some(&mut self, buffer: &[u8]) -> Result<usize> {
        self.held_mut()?.write_some(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::memory::{MemoryStream, OutputMemoryStream};
    use crate::position::BasePosition;
    use crate::raw::{read_raw, write_raw};
    use crate::span::InputSpanStream;

    /// Owns a resource that must not be duplicated.
    struct UniqueSink {
        written: Vec<u8>,
        flushes: usize,
    }

    impl OutputStream for UniqueSink {
        fn write_some(&mut self, buffer: &[u8]) -> Result<usize> {
            self.written.extend_from_slice(buffer);
            Ok(buffer.len())
        }
    }

    impl Erasable for UniqueSink {
        fn erased_flush(&mut self) -> Result<()> {
            self.flushes += 1;
            Ok(())
        }
    }

    fn unique_sink() -> UniqueSink {
        UniqueSink {
            written: Vec::new(),
            flushes: 0,
        }
    }

    #[test]
    fn forwards_to_held_stream() {
        let mut stream = AnyInputOutputStream::new(MemoryStream::<Vec<u8>>::default());
        write_raw(&mut stream, b"erased").unwrap();
        assert_eq!(stream.get_position().unwrap().get(), 6);

        stream.seek_position(BasePosition::Beginning.into()).unwrap();
        let mut buf = [0u8; 6];
        read_raw(&mut stream, &mut buf).unwrap();
        assert_eq!(&buf, b"erased");
    }

    #[test]
    fn empty_wrapper_fails_every_operation() {
        let mut stream = AnyInputOutputStream::default();
        assert!(!stream.has_value());
        let mut buf = [0u8; 1];
        assert_eq!(
            stream.read_some(&mut buf).unwrap_err().kind(),
            ErrorKind::EmptyStream
        );
        assert_eq!(
            stream.write_some(b"x").unwrap_err().kind(),
            ErrorKind::EmptyStream
        );
        assert_eq!(
            stream.get_position().unwrap_err().kind(),
            ErrorKind::EmptyStream
        );
        assert_eq!(stream.flush().unwrap_err().kind(), ErrorKind::EmptyStream);
    }

    #[test]
    fn missing_capabilities_are_runtime_conditions() {
        let mut stream = AnyOutputStream::new(unique_sink());
        let err = stream
            .seek_position(BasePosition::End.into())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadDescriptor);

        stream.flush().unwrap();
        assert_eq!(stream.get::<UniqueSink>().unwrap().flushes, 1);
    }

    #[test]
    fn clone_of_unclonable_fails_at_the_call() {
        let stream = AnyOutputStream::new(unique_sink());
        let err = stream.try_clone().unwrap_err();
        assert!(matches!(err, IoError::NotClonable { .. }));
        assert!(stream.has_value());
    }

    #[test]
    fn clone_is_a_deep_copy() {
        let mut original = AnyOutputStream::new(OutputMemoryStream::<Vec<u8>>::default());
        write_raw(&mut original, b"one").unwrap();

        let mut copy = original.try_clone().unwrap();
        write_raw(&mut copy, b"two").unwrap();

        let original = original
            .release::<OutputMemoryStream<Vec<u8>>>()
            .unwrap()
            .into_inner();
        let copy = copy.get::<OutputMemoryStream<Vec<u8>>>().unwrap();
        assert_eq!(original, b"one");
        assert_eq!(copy.get_buffer().as_slice(), b"onetwo");
    }

    #[test]
    fn get_with_wrong_type_is_mismatch() {
        let mut stream = AnyInputStream::new(InputSpanStream::new(vec![1u8]));
        let err = stream.get::<MemoryStream<Vec<u8>>>().unwrap_err();
        assert!(matches!(err, IoError::TypeMismatch { .. }));

        let err = stream.release::<MemoryStream<Vec<u8>>>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert!(stream.has_value(), "mismatched release keeps the value");

        let span = stream.release::<InputSpanStream<Vec<u8>>>().unwrap();
        assert_eq!(span.get_buffer(), &[1]);
        assert!(!stream.has_value());
    }

    #[test]
    fn take_leaves_source_empty() {
        let mut source = AnyOutputStream::new(unique_sink());
        let mut target = source.take();
        assert!(!source.has_value());
        write_raw(&mut target, b"moved").unwrap();
        assert_eq!(target.get::<UniqueSink>().unwrap().written, b"moved");
    }

    #[test]
    fn emplace_replaces_value() {
        let mut stream = AnyOutputStream::new(unique_sink());
        stream.emplace(OutputMemoryStream::<Vec<u8>>::default());
        assert!(stream.get::<UniqueSink>().is_err());
        stream.emplace_with(unique_sink);
        assert!(stream.get_mut::<UniqueSink>().is_ok());
    }

    #[test]
    fn swap_exchanges_values() {
        let mut a = AnyInputStream::new(InputSpanStream::new(vec![1u8]));
        let mut b = AnyInputStream::default();
        a.swap(&mut b);
        assert!(!a.has_value());
        assert!(b.type_name().unwrap().contains("InputSpanStream"));
    }
}
