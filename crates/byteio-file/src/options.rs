/// Access requested when opening a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Mode {
    /// Read-only.
    #[default]
    Read,
    /// Read-write; the file is created if missing.
    Write,
}

/// What to do about an existing (or missing) file when opening it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Creation {
    /// Open the file as it is.
    #[default]
    OpenExisting,
    /// Create the file if it does not exist.
    IfNeeded,
    /// Truncate the file to zero length.
    TruncateExisting,
    /// Remove any existing file and start with an empty one.
    AlwaysNew,
}

/// Configuration for opening a buffered file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FileOptions {
    pub mode: Mode,
    pub creation: Creation,
    /// Buffer size override; `None` uses the size reported by the file system.
    pub buffer_size: Option<usize>,
}

impl FileOptions {
    /// Set the access mode.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the creation policy.
    pub fn with_creation(mut self, creation: Creation) -> Self {
        self.creation = creation;
        self
    }

    /// Override the buffer size. Zero is treated as one byte.
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = Some(buffer_size);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_open_existing_for_reading() {
        let options = FileOptions::default();
        assert_eq!(options.mode, Mode::Read);
        assert_eq!(options.creation, Creation::OpenExisting);
        assert_eq!(options.buffer_size, None);
    }

    #[test]
    fn builder_overrides() {
        let options = FileOptions::default()
            .with_mode(Mode::Write)
            .with_creation(Creation::AlwaysNew)
            .with_buffer_size(16);
        assert_eq!(
            options,
            FileOptions {
                mode: Mode::Write,
                creation: Creation::AlwaysNew,
                buffer_size: Some(16),
            }
        );
    }

    #[test]
    #[cfg(feature = "serde")]
    fn partial_config_fills_defaults() {
        let options: FileOptions =
            serde_json::from_str(r#"{"creation":"truncate_existing"}"#).unwrap();
        assert_eq!(options.mode, Mode::Read);
        assert_eq!(options.creation, Creation::TruncateExisting);
    }
}
