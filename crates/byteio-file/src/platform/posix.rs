use std::ffi::CString;
use std::mem::MaybeUninit;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::io::RawFd;
use std::path::Path;

use byteio_core::{BasePosition, IoError, Position, Result, SeekTarget};
use tracing::debug;

use crate::options::{Creation, Mode};

/// An open file descriptor.
pub type NativeHandle = RawFd;

/// Descriptor value that refers to no file.
pub const INVALID_HANDLE: NativeHandle = -1;

/// Permission bits for newly created files, before the umask.
const CREATE_PERMISSIONS: libc::c_uint = 0o666;

/// Kind of file behind a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Regular,
    CharacterDevice,
    /// Pipes, sockets and anything else without random access.
    Other,
}

/// Open `path` and return its descriptor.
pub fn open_file(path: &Path, mode: Mode, creation: Creation) -> Result<NativeHandle> {
    let mut flags = match mode {
        Mode::Read => libc::O_RDONLY,
        Mode::Write => libc::O_RDWR | libc::O_CREAT,
    };
    match creation {
        Creation::OpenExisting => {}
        Creation::IfNeeded => flags |= libc::O_CREAT,
        Creation::TruncateExisting => flags |= libc::O_TRUNC,
        Creation::AlwaysNew => {
            flags |= libc::O_CREAT;
            if path.exists() {
                debug!(?path, "removing existing file");
                std::fs::remove_file(path).map_err(|source| IoError::System {
                    context: "open_file",
                    source,
                })?;
            }
        }
    }
    flags |= libc::O_CLOEXEC;

    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|_| IoError::InvalidArgument("open_file: path contains NUL"))?;

    // SAFETY: `c_path` is a valid NUL-terminated string that outlives the call,
    // and the mode argument is passed as the promoted `c_uint` that open(2) expects.
    let handle = unsafe { libc::open(c_path.as_ptr(), flags, CREATE_PERMISSIONS) };
    if handle == -1 {
        return Err(IoError::System {
            context: "open_file",
            source: std::io::Error::last_os_error(),
        });
    }
    debug!(?path, ?mode, ?creation, handle, "opened file");
    Ok(handle)
}

/// Close `handle`, ignoring failures. Invalid handles are skipped.
pub fn close_file(handle: NativeHandle) {
    if handle < 0 {
        return;
    }
    // SAFETY: the caller owns `handle` and never uses it after this call.
    unsafe {
        libc::close(handle);
    }
}

/// Current OS file offset of `handle`.
pub fn get_position(handle: NativeHandle) -> Result<Position> {
    // SAFETY: lseek has no memory-safety preconditions; a bad descriptor yields EBADF.
    let result = unsafe { libc::lseek(handle, 0, libc::SEEK_CUR) };
    if result == -1 {
        let err = std::io::Error::last_os_error();
        return Err(match err.raw_os_error() {
            Some(libc::EBADF) => IoError::BadDescriptor("get_position"),
            _ => IoError::System {
                context: "get_position",
                source: err,
            },
        });
    }
    Position::new(i64::from(result))
}

/// Move the OS file offset of `handle`.
pub fn seek_position(handle: NativeHandle, target: SeekTarget) -> Result<()> {
    let (offset, whence) = match target {
        SeekTarget::Absolute(position) => (position.get(), libc::SEEK_SET),
        SeekTarget::Relative(offset) => (offset.get(), libc::SEEK_CUR),
        SeekTarget::Base(BasePosition::Current) => return Ok(()),
        SeekTarget::Base(base) => (0, whence_of(base)),
        SeekTarget::BaseOffset(base, offset) => (offset.get(), whence_of(base)),
    };
    let offset = libc::off_t::try_from(offset)
        .map_err(|_| IoError::ValueTooLarge("seek_position"))?;

    // SAFETY: lseek has no memory-safety preconditions; a bad descriptor yields EBADF.
    let result = unsafe { libc::lseek(handle, offset, whence) };
    if result == -1 {
        let err = std::io::Error::last_os_error();
        return Err(match err.raw_os_error() {
            Some(libc::EBADF) => IoError::BadDescriptor("seek_position"),
            Some(libc::EINVAL) => IoError::InvalidArgument("seek_position"),
            Some(libc::EOVERFLOW) => IoError::ValueTooLarge("seek_position"),
            _ => IoError::System {
                context: "seek_position",
                source: err,
            },
        });
    }
    Ok(())
}

fn whence_of(base: BasePosition) -> libc::c_int {
    match base {
        BasePosition::Beginning => libc::SEEK_SET,
        BasePosition::Current => libc::SEEK_CUR,
        BasePosition::End => libc::SEEK_END,
    }
}

/// One `read(2)` call.
pub fn read_some(handle: NativeHandle, buffer: &mut [u8]) -> Result<usize> {
    if buffer.is_empty() {
        return Ok(0);
    }
    // SAFETY: `buffer` is valid for writes of `buffer.len()` bytes for the
    // duration of the call.
    let result = unsafe { libc::read(handle, buffer.as_mut_ptr().cast(), buffer.len()) };
    if result == -1 {
        let err = std::io::Error::last_os_error();
        return Err(match err.raw_os_error() {
            Some(libc::EBADF) => IoError::BadDescriptor("read_some"),
            Some(libc::EINTR) => IoError::Interrupted("read_some"),
            Some(libc::EIO) => IoError::Physical("read_some"),
            _ => IoError::System {
                context: "read_some",
                source: err,
            },
        });
    }
    Ok(result as usize)
}

/// One `write(2)` call.
pub fn write_some(handle: NativeHandle, buffer: &[u8]) -> Result<usize> {
    if buffer.is_empty() {
        return Ok(0);
    }
    // SAFETY: `buffer` is valid for reads of `buffer.len()` bytes for the
    // duration of the call.
    let result = unsafe { libc::write(handle, buffer.as_ptr().cast(), buffer.len()) };
    if result == -1 {
        let err = std::io::Error::last_os_error();
        return Err(match err.raw_os_error() {
            Some(libc::EBADF) => IoError::BadDescriptor("write_some"),
            Some(libc::EFBIG) => IoError::FileTooLarge("write_some"),
            Some(libc::EINTR) => IoError::Interrupted("write_some"),
            Some(libc::EIO) => IoError::Physical("write_some"),
            _ => IoError::System {
                context: "write_some",
                source: err,
            },
        });
    }
    Ok(result as usize)
}

/// Preferred transfer size of the file system holding `handle`, at least 1.
pub fn get_buffer_size(handle: NativeHandle) -> Result<usize> {
    let mut stats = MaybeUninit::<libc::statvfs>::uninit();
    // SAFETY: `stats` points to writable memory large enough for a statvfs.
    let result = unsafe { libc::fstatvfs(handle, stats.as_mut_ptr()) };
    if result == -1 {
        return Err(IoError::System {
            context: "get_buffer_size",
            source: std::io::Error::last_os_error(),
        });
    }
    // SAFETY: fstatvfs succeeded, so it initialized `stats`.
    let stats = unsafe { stats.assume_init() };
    Ok(usize::try_from(stats.f_bsize).unwrap_or(usize::MAX).max(1))
}

/// Determine what kind of file `handle` refers to.
pub fn classify(handle: NativeHandle) -> Result<FileKind> {
    let mut stats = MaybeUninit::<libc::stat>::uninit();
    // SAFETY: `stats` points to writable memory large enough for a stat.
    let result = unsafe { libc::fstat(handle, stats.as_mut_ptr()) };
    if result == -1 {
        return Err(IoError::System {
            context: "classify",
            source: std::io::Error::last_os_error(),
        });
    }
    // SAFETY: fstat succeeded, so it initialized `stats`.
    let stats = unsafe { stats.assume_init() };
    Ok(match stats.st_mode & libc::S_IFMT {
        libc::S_IFREG => FileKind::Regular,
        libc::S_IFCHR => FileKind::CharacterDevice,
        _ => FileKind::Other,
    })
}

#[cfg(test)]
mod tests {
    use byteio_core::{ErrorKind, Offset};

    use super::*;

    fn scratch_path(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("byteio-posix-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn open_missing_file_for_reading_fails() {
        let path = scratch_path("missing.bin");
        let _ = std::fs::remove_file(&path);
        let err = open_file(&path, Mode::Read, Creation::OpenExisting).unwrap_err();
        assert!(matches!(err, IoError::System { context: "open_file", .. }));
    }

    #[test]
    fn write_seek_read_through_descriptor() {
        let path = scratch_path("descriptor.bin");
        let handle = open_file(&path, Mode::Write, Creation::AlwaysNew).unwrap();

        assert_eq!(write_some(handle, b"abcdef").unwrap(), 6);
        assert_eq!(get_position(handle).unwrap().get(), 6);

        seek_position(handle, SeekTarget::BaseOffset(BasePosition::End, Offset::new(-2))).unwrap();
        let mut buf = [0u8; 8];
        assert_eq!(read_some(handle, &mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], b"ef");

        seek_position(handle, BasePosition::Current.into()).unwrap();
        assert_eq!(get_position(handle).unwrap().get(), 6);

        close_file(handle);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn seek_before_start_is_invalid_argument() {
        let path = scratch_path("negative.bin");
        let handle = open_file(&path, Mode::Write, Creation::AlwaysNew).unwrap();
        let err = seek_position(handle, Offset::new(-1).into()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        close_file(handle);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn bad_descriptor_is_reported() {
        let mut buf = [0u8; 1];
        assert_eq!(
            read_some(INVALID_HANDLE, &mut buf).unwrap_err().kind(),
            ErrorKind::BadDescriptor
        );
        assert_eq!(
            write_some(INVALID_HANDLE, b"x").unwrap_err().kind(),
            ErrorKind::BadDescriptor
        );
        assert_eq!(
            get_position(INVALID_HANDLE).unwrap_err().kind(),
            ErrorKind::BadDescriptor
        );
        // Zero-length transfers never reach the OS.
        assert_eq!(read_some(INVALID_HANDLE, &mut []).unwrap(), 0);
    }

    #[test]
    fn truncate_and_always_new() {
        let path = scratch_path("creation.bin");
        std::fs::write(&path, b"old contents").unwrap();

        let handle = open_file(&path, Mode::Write, Creation::TruncateExisting).unwrap();
        close_file(handle);
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);

        std::fs::write(&path, b"again").unwrap();
        let handle = open_file(&path, Mode::Write, Creation::AlwaysNew).unwrap();
        close_file(handle);
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn regular_file_classification_and_buffer_size() {
        let path = scratch_path("classify.bin");
        let handle = open_file(&path, Mode::Write, Creation::IfNeeded).unwrap();
        assert_eq!(classify(handle).unwrap(), FileKind::Regular);
        assert!(get_buffer_size(handle).unwrap() >= 1);
        close_file(handle);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn pipe_is_not_regular() {
        let mut fds = [0 as libc::c_int; 2];
        // SAFETY: `fds` has room for the two descriptors pipe(2) writes.
        assert_eq!(unsafe { libc::pipe(fds.as_mut_ptr()) }, 0);
        assert_eq!(classify(fds[0]).unwrap(), FileKind::Other);
        close_file(fds[0]);
        close_file(fds[1]);
    }
}
