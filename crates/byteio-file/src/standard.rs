//! Process-wide standard streams.
//!
//! Each accessor classifies its descriptor on first use: a regular file
//! (a redirect such as `prog > out.bin`) becomes a buffered, seekable file
//! stream, anything else a [`SpecialFile`]. The result is erased and wrapped
//! in a [`SynchronizedStream`] so it can be shared between threads.
//!
//! The streams live in statics and are never dropped. Instead, the first use
//! of [`standard_output`] or [`standard_error`] registers an exit hook that
//! flushes whatever output streams exist when the process exits normally.

use std::sync::{Once, OnceLock};

use byteio_core::{AnyInputStream, AnyOutputStream, BufferedStream, SynchronizedStream};
use tracing::{debug, warn};

use crate::handle::SpecialFile;
use crate::platform::{self, FileKind, NativeHandle};
use crate::stream::{InputFileStream, OutputFileStream};

const STDIN: NativeHandle = libc::STDIN_FILENO;
const STDOUT: NativeHandle = libc::STDOUT_FILENO;
const STDERR: NativeHandle = libc::STDERR_FILENO;

static STANDARD_INPUT: OnceLock<SynchronizedStream<AnyInputStream>> = OnceLock::new();
static STANDARD_OUTPUT: OnceLock<SynchronizedStream<AnyOutputStream>> = OnceLock::new();
static STANDARD_ERROR: OnceLock<SynchronizedStream<AnyOutputStream>> = OnceLock::new();
static EXIT_FLUSH: Once = Once::new();

/// Shared standard input, created on first use.
pub fn standard_input() -> &'static SynchronizedStream<AnyInputStream> {
    STANDARD_INPUT.get_or_init(|| SynchronizedStream::new(open_input(STDIN)))
}

/// Shared standard output, created on first use and flushed at exit.
pub fn standard_output() -> &'static SynchronizedStream<AnyOutputStream> {
    STANDARD_OUTPUT.get_or_init(|| {
        register_exit_flush();
        SynchronizedStream::new(open_output(STDOUT))
    })
}

/// Shared standard error, created on first use and flushed at exit.
pub fn standard_error() -> &'static SynchronizedStream<AnyOutputStream> {
    STANDARD_ERROR.get_or_init(|| {
        register_exit_flush();
        SynchronizedStream::new(open_output(STDERR))
    })
}

fn register_exit_flush() {
    EXIT_FLUSH.call_once(|| {
        // SAFETY: `flush_at_exit` is a plain function that takes no arguments
        // and never unwinds.
        if unsafe { libc::atexit(flush_at_exit) } != 0 {
            warn!("cannot register exit flush for standard streams");
        }
    });
}

/// Best-effort flush of the output streams, like `BufferedFile`'s drop.
extern "C" fn flush_at_exit() {
    for stream in [&STANDARD_OUTPUT, &STANDARD_ERROR] {
        let Some(stream) = stream.get() else {
            continue;
        };
        // A thread may still hold the lock while the process exits.
        let Some(mut guard) = stream.try_lock() else {
            debug!("standard stream locked at exit; skipping flush");
            continue;
        };
        if let Err(err) = guard.flush() {
            debug!(%err, "discarding standard stream flush failure at exit");
        }
    }
}

fn is_regular(handle: NativeHandle) -> bool {
    match platform::classify(handle) {
        Ok(kind) => {
            debug!(handle, ?kind, "classified standard stream");
            kind == FileKind::Regular
        }
        Err(err) => {
            warn!(handle, %err, "cannot classify standard stream; treating as special file");
            false
        }
    }
}

fn open_input(handle: NativeHandle) -> AnyInputStream {
    if is_regular(handle) {
        match InputFileStream::from_raw_handle(handle) {
            Ok(stream) => return AnyInputStream::new(stream),
            Err(err) => warn!(handle, %err, "falling back to unbuffered standard input"),
        }
    }
    AnyInputStream::new(SpecialFile::from_raw_handle(handle))
}

fn open_output(handle: NativeHandle) -> AnyOutputStream {
    if is_regular(handle) {
        match OutputFileStream::from_raw_handle(handle) {
            Ok(stream) => return AnyOutputStream::new(stream),
            Err(err) => warn!(handle, %err, "falling back to unbuffered standard stream"),
        }
    }
    AnyOutputStream::new(SpecialFile::from_raw_handle(handle))
}
