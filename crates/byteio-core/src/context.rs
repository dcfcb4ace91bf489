use crate::format::Format;

/// A borrowed stream paired with the [`Format`] used to encode values on it.
///
/// Contexts are created per call site and own nothing.
#[derive(Debug)]
pub struct Context<'a, S: ?Sized> {
    stream: &'a mut S,
    format: Format,
}

impl<'a, S: ?Sized> Context<'a, S> {
    /// Bind `stream` with the native format.
    pub fn new(stream: &'a mut S) -> Self {
        Self::with_format(stream, Format::default())
    }

    /// Bind `stream` with an explicit format.
    pub fn with_format(stream: &'a mut S, format: Format) -> Self {
        Self { stream, format }
    }

    /// The bound stream.
    pub fn get_stream(&self) -> &S {
        self.stream
    }

    /// The bound stream, for raw transfers.
    pub fn get_stream_mut(&mut self) -> &mut S {
        self.stream
    }

    /// Format applied to subsequent typed reads and writes.
    pub fn get_format(&self) -> Format {
        self.format
    }

    /// Change the format for subsequent typed reads and writes.
    pub fn set_format(&mut self, format: Format) {
        self.format = format;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Endian;

    #[test]
    fn format_can_change_between_calls() {
        let mut backing = Vec::<u8>::new();
        let mut ctx = Context::with_format(&mut backing, Format::BIG_ENDIAN);
        assert_eq!(ctx.get_format().endianness(), Endian::Big);

        ctx.set_format(Format::LITTLE_ENDIAN);
        assert_eq!(ctx.get_format(), Format::LITTLE_ENDIAN);

        ctx.get_stream_mut().push(7);
        assert_eq!(ctx.get_stream(), &vec![7]);
    }
}
