//! Position bookkeeping and bounded copies shared by every in-memory stream.

use tracing::debug;

use crate::error::{IoError, Result};
use crate::memory::GrowableBuffer;
use crate::position::{Position, SeekTarget};

/// Largest index a stream position may reach: `min(Position::MAX, usize::MAX)`.
pub(crate) const MAX_INDEX: usize = if (i64::MAX as u128) < (usize::MAX as u128) {
    i64::MAX as usize
} else {
    usize::MAX
};

/// Current position of an in-memory stream.
///
/// The position may lie past the end of the buffer after a seek; reads
/// there return 0 and growable writes zero-fill the gap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamCursor {
    position: usize,
}

impl StreamCursor {
    /// A cursor at the beginning.
    pub const fn new() -> Self {
        Self { position: 0 }
    }

    /// A cursor already at `index`.
    pub const fn at(index: usize) -> Self {
        Self { position: index }
    }

    /// The position as a buffer index.
    pub fn index(&self) -> usize {
        self.position
    }

    pub fn get_position(&self) -> Result<Position> {
        Position::from_usize(self.position)
    }

    /// Move according to `target`, resolving `End` against `len`.
    pub fn seek(&mut self, target: SeekTarget, len: usize) -> Result<()> {
        let next = target.resolve(self.get_position()?, Position::from_usize(len)?)?;
        self.position = next.to_usize()?;
        Ok(())
    }

    /// Return to the beginning.
    pub fn reset(&mut self) {
        self.position = 0;
    }
}

/// Bytes that can move from `position` toward `limit` without the
/// resulting position leaving the representable range.
fn transfer_len(limit: usize, position: usize, requested: usize) -> usize {
    requested.min(limit - position).min(MAX_INDEX - position)
}

/// Copy from `source` at the cursor into `dest`.
pub fn read_at(source: &[u8], cursor: &mut StreamCursor, dest: &mut [u8]) -> Result<usize> {
    if dest.is_empty() {
        return Ok(0);
    }
    let position = cursor.position;
    if position >= source.len() {
        return Ok(0);
    }
    if position == MAX_INDEX {
        return Err(IoError::ValueTooLarge("read_some"));
    }
    let n = transfer_len(source.len(), position, dest.len());
    dest[..n].copy_from_slice(&source[position..position + n]);
    cursor.position = position + n;
    Ok(n)
}

/// Copy `src` into a fixed-capacity `target` at the cursor.
///
/// Fails with [`IoError::FileTooLarge`] when the cursor is at or past the end.
pub fn write_fixed_at(target: &mut [u8], cursor: &mut StreamCursor, src: &[u8]) -> Result<usize> {
    if src.is_empty() {
        return Ok(0);
    }
    let position = cursor.position;
    if position >= target.len() || position == MAX_INDEX {
        return Err(IoError::FileTooLarge("write_some"));
    }
    let n = transfer_len(target.len(), position, src.len());
    target[position..position + n].copy_from_slice(&src[..n]);
    cursor.position = position + n;
    Ok(n)
}

/// Copy `src` into a growable `target` at the cursor.
///
/// Overwrites in place while inside the current contents; past the end the
/// container grows (zero-filling any gap) up to `max_size`. A gap too large
/// to allocate fails with [`IoError::FileTooLarge`] and leaves the container
/// as it was.
pub fn write_growable_at<C: GrowableBuffer + ?Sized>(
    target: &mut C,
    max_size: usize,
    cursor: &mut StreamCursor,
    src: &[u8],
) -> Result<usize> {
    if src.is_empty() {
        return Ok(0);
    }
    let limit = max_size.min(MAX_INDEX);
    let position = cursor.position;
    if position >= limit {
        return Err(IoError::FileTooLarge("write_some"));
    }
    let len = target.as_ref().len();
    let n = if position < len {
        transfer_len(len, position, src.len())
    } else {
        let n = transfer_len(limit, position, src.len());
        if let Err(err) = target.try_resize_zeroed(position + n) {
            debug!(len = position + n, %err, "cannot grow memory stream");
            return Err(IoError::FileTooLarge("write_some"));
        }
        n
    };
    target.as_mut()[position..position + n].copy_from_slice(&src[..n]);
    cursor.position = position + n;
    Ok(n)
}
