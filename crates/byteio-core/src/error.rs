/// Condition reported by an [`IoError`], independent of its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadDescriptor,
    InvalidArgument,
    ValueTooLarge,
    EndOfStream,
    Interrupted,
    Physical,
    FileTooLarge,
    WriteZero,
    EmptyStream,
    TypeMismatch,
    NotClonable,
    System,
}

/// Errors that can occur in stream operations.
///
/// Most variants carry the name of the operation that failed.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// The stream or handle cannot perform the requested operation.
    #[error("{0}: bad file descriptor")]
    BadDescriptor(&'static str),

    /// An argument was out of its domain, e.g. a seek to a negative position.
    #[error("{0}: invalid argument")]
    InvalidArgument(&'static str),

    /// A position or offset overflowed the representable range.
    #[error("{0}: value too large")]
    ValueTooLarge(&'static str),

    /// The stream ended before the requested number of bytes was read.
    #[error("{0}: reached end of file")]
    EndOfStream(&'static str),

    /// The operation was interrupted by a signal and may be retried.
    #[error("{0}: interrupted")]
    Interrupted(&'static str),

    /// The underlying device reported a media failure.
    #[error("{0}: physical error")]
    Physical(&'static str),

    /// A write would exceed the capacity of the target.
    #[error("{0}: file too large")]
    FileTooLarge(&'static str),

    /// A stream accepted zero bytes for a non-empty write.
    #[error("{0}: stream accepted no bytes")]
    WriteZero(&'static str),

    /// An erased stream wrapper was used while holding no value.
    #[error("erased stream is empty")]
    EmptyStream,

    /// An erased stream wrapper holds a different concrete type.
    #[error("erased stream type mismatch (requested {expected}, held {actual})")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// The concrete stream held by an erased wrapper cannot be duplicated.
    #[error("stream of type {type_name} cannot be cloned")]
    NotClonable { type_name: &'static str },

    /// An operating system failure with no dedicated condition.
    #[error("{context}: {source}")]
    System {
        context: &'static str,
        source: std::io::Error,
    },
}

impl IoError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BadDescriptor(_) => ErrorKind::BadDescriptor,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::ValueTooLarge(_) => ErrorKind::ValueTooLarge,
            Self::EndOfStream(_) => ErrorKind::EndOfStream,
            Self::Interrupted(_) => ErrorKind::Interrupted,
            Self::Physical(_) => ErrorKind::Physical,
            Self::FileTooLarge(_) => ErrorKind::FileTooLarge,
            Self::WriteZero(_) => ErrorKind::WriteZero,
            Self::EmptyStream => ErrorKind::EmptyStream,
            Self::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Self::NotClonable { .. } => ErrorKind::NotClonable,
            Self::System { .. } => ErrorKind::System,
        }
    }

    /// Wrap an OS error, mapping the errno values that have a dedicated condition.
    pub fn from_io(context: &'static str, err: std::io::Error) -> Self {
        #[cfg(unix)]
        if let Some(code) = err.raw_os_error() {
            match code {
                libc::EBADF => return Self::BadDescriptor(context),
                libc::EINVAL => return Self::InvalidArgument(context),
                libc::EOVERFLOW => return Self::ValueTooLarge(context),
                libc::EINTR => return Self::Interrupted(context),
                libc::EIO => return Self::Physical(context),
                libc::EFBIG => return Self::FileTooLarge(context),
                _ => return Self::System { context, source: err },
            }
        }

        match err.kind() {
            std::io::ErrorKind::Interrupted => Self::Interrupted(context),
            std::io::ErrorKind::UnexpectedEof => Self::EndOfStream(context),
            std::io::ErrorKind::InvalidInput => Self::InvalidArgument(context),
            std::io::ErrorKind::WriteZero => Self::WriteZero(context),
            _ => Self::System { context, source: err },
        }
    }
}

impl From<std::io::Error> for IoError {
    fn from(err: std::io::Error) -> Self {
        Self::from_io("io", err)
    }
}

impl From<IoError> for std::io::Error {
    fn from(err: IoError) -> Self {
        let kind = match err.kind() {
            ErrorKind::InvalidArgument | ErrorKind::ValueTooLarge | ErrorKind::TypeMismatch => {
                std::io::ErrorKind::InvalidInput
            }
            ErrorKind::EndOfStream => std::io::ErrorKind::UnexpectedEof,
            ErrorKind::Interrupted => std::io::ErrorKind::Interrupted,
            ErrorKind::WriteZero => std::io::ErrorKind::WriteZero,
            ErrorKind::NotClonable => std::io::ErrorKind::Unsupported,
            ErrorKind::BadDescriptor
            | ErrorKind::Physical
            | ErrorKind::FileTooLarge
            | ErrorKind::EmptyStream
            | ErrorKind::System => std::io::ErrorKind::Other,
        };
        match err {
            IoError::System { source, .. } => source,
            other => std::io::Error::new(kind, other),
        }
    }
}

/// Result type for stream operations.
pub type Result<T> = std::result::Result<T, IoError>;
