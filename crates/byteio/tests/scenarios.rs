//! End-to-end scenarios through the public facade.

use byteio::prelude::*;
use byteio::stream::{ErrorKind, InputMemoryStream};

#[test]
fn u32_byte_order() {
    let mut stream = MemoryStream::<Vec<u8>>::default();
    let mut ctx = Context::with_format(&mut stream, Format::BIG_ENDIAN);
    write(&42u32, &mut ctx).unwrap();
    assert_eq!(stream.get_buffer(), &[0, 0, 0, 42]);

    let mut stream = MemoryStream::<Vec<u8>>::default();
    let mut ctx = Context::with_format(&mut stream, Format::LITTLE_ENDIAN);
    write(&42u32, &mut ctx).unwrap();
    assert_eq!(stream.get_buffer(), &[42, 0, 0, 0]);
}

#[test]
#[cfg(target_endian = "little")]
fn native_format_is_little_endian_on_this_host() {
    let mut stream = MemoryStream::<Vec<u8>>::default();
    let mut ctx = Context::new(&mut stream);
    write(&42u32, &mut ctx).unwrap();
    assert_eq!(stream.get_buffer(), &[42, 0, 0, 0]);
}

/// A record type that lays itself out on the wire.
#[derive(Debug, PartialEq)]
struct Header {
    version: u16,
    length: u32,
    scale: f32,
}

impl Encode for Header {
    fn encode<S: OutputStream + ?Sized>(&self, ctx: &mut Context<'_, S>) -> byteio::stream::Result<()> {
        write(&self.version, ctx)?;
        write(&self.length, ctx)?;
        write(&self.scale, ctx)
    }
}

impl Decode for Header {
    fn decode<S: InputStream + ?Sized>(ctx: &mut Context<'_, S>) -> byteio::stream::Result<Self> {
        Ok(Self {
            version: read(ctx)?,
            length: read(ctx)?,
            scale: read(ctx)?,
        })
    }
}

#[test]
fn user_types_compose_primitives() {
    let header = Header {
        version: 3,
        length: 0x0A0B_0C0D,
        scale: 1.5,
    };
    let mut buffer = [0u8; 10];
    let mut out = OutputSpanStream::new(&mut buffer[..]);
    write(&header, &mut Context::with_format(&mut out, Format::BIG_ENDIAN)).unwrap();
    assert_eq!(&buffer[..6], &[0, 3, 0x0A, 0x0B, 0x0C, 0x0D]);

    let mut input = InputSpanStream::new(&buffer[..]);
    let decoded: Header = read(&mut Context::with_format(&mut input, Format::BIG_ENDIAN)).unwrap();
    assert_eq!(decoded, header);

    // One byte short of a full header.
    let mut short = InputSpanStream::new(&buffer[..9]);
    let err = read::<Header, _>(&mut Context::with_format(&mut short, Format::BIG_ENDIAN))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EndOfStream);
}

#[test]
fn fixed_span_rejects_overflow() {
    let mut buffer = [0u8; 3];
    let mut out = OutputSpanStream::new(&mut buffer[..]);
    let err = write(&7u32, &mut Context::new(&mut out)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FileTooLarge);
}

#[test]
fn erased_copy_fails_only_at_copy_time() {
    let stream = AnyInputOutputStream::new(MemoryStream::new(vec![1u8, 2, 3]));
    let copy = stream.try_clone().unwrap();
    assert_eq!(copy.get::<MemoryStream<Vec<u8>>>().unwrap().get_buffer(), &[1, 2, 3]);

    #[derive(Debug)]
    struct Unique;

    impl InputStream for Unique {
        fn read_some(&mut self, _buffer: &mut [u8]) -> byteio::stream::Result<usize> {
            Ok(0)
        }
    }

    impl Erasable for Unique {}

    // Construction succeeds; only the copy is refused.
    let stream = AnyInputStream::new(Unique);
    assert!(stream.has_value());
    assert_eq!(stream.try_clone().unwrap_err().kind(), ErrorKind::NotClonable);
}

#[test]
fn erased_wrapper_reports_type_mismatch_and_emptiness() {
    let mut stream = AnyInputStream::new(InputMemoryStream::new(vec![9u8]));
    assert_eq!(
        stream.get::<MemoryStream<Vec<u8>>>().unwrap_err().kind(),
        ErrorKind::TypeMismatch
    );

    let moved = stream.take();
    assert!(moved.has_value());
    let mut buf = [0u8; 1];
    assert_eq!(stream.read_some(&mut buf).unwrap_err().kind(), ErrorKind::EmptyStream);
}

#[test]
fn seek_to_end_reports_length() {
    let mut empty = MemoryStream::<Vec<u8>>::default();
    empty.seek_position(BasePosition::End.into()).unwrap();
    assert_eq!(empty.get_position().unwrap(), Position::ZERO);

    let mut filled = MemoryStream::new(vec![0u8; 17]);
    filled.seek_position(BasePosition::End.into()).unwrap();
    assert_eq!(filled.get_position().unwrap().get(), 17);
}

#[cfg(all(feature = "file", unix))]
mod files {
    use byteio::file::{BufferedFile, FileOptions, Mode};

    use super::*;

    fn scratch_path(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("byteio-scenarios-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn write_close_reopen_read() {
        let path = scratch_path("reopen.bin");
        {
            let mut out = OutputFileStream::create(&path, Creation::AlwaysNew).unwrap();
            write_raw(&mut out, &[1, 2, 3, 4]).unwrap();
        }
        let mut input = InputFileStream::open(&path).unwrap();
        let mut buf = [0u8; 4];
        read_raw(&mut input, &mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3, 4]);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn file_seek_to_end_reports_length() {
        let path = scratch_path("length.bin");
        std::fs::write(&path, vec![0u8; 1000]).unwrap();
        let mut input = InputFileStream::open(&path).unwrap();
        input.seek_position(BasePosition::End.into()).unwrap();
        assert_eq!(input.get_position().unwrap().get(), 1000);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn erased_file_stream_keeps_buffering() {
        let path = scratch_path("erased.bin");
        let options = FileOptions::default()
            .with_mode(Mode::Write)
            .with_creation(Creation::AlwaysNew)
            .with_buffer_size(64);
        let file = BufferedFile::open_with(&path, &options).unwrap();
        let shared = SynchronizedStream::new(AnyOutputStream::new(
            OutputFileStream::from_buffered(file),
        ));

        let mut handle = &shared;
        write_raw(&mut handle, b"shared").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"");
        shared.flush().unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"shared");

        // File streams are not duplicable.
        assert_eq!(
            shared.lock().try_clone().unwrap_err().kind(),
            ErrorKind::NotClonable
        );
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn standard_error_accepts_writes() {
        let mut stderr = standard_error();
        write_raw(&mut stderr, b"").unwrap();
        standard_error().flush().unwrap();
    }
}
