use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, RemAssign, Sub, SubAssign};

use crate::error::{IoError, Result};

/// Absolute, non-negative offset from the beginning of a stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position(i64);

/// Signed distance between two stream positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Offset(i64);

/// Anchor for relative seeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasePosition {
    Beginning,
    Current,
    End,
}

/// One of the four forms a seek can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeekTarget {
    /// Seek to an absolute position.
    Absolute(Position),
    /// Move relative to the current position.
    Relative(Offset),
    /// Seek to an anchor.
    Base(BasePosition),
    /// Seek to an anchor, then move by an offset.
    BaseOffset(BasePosition, Offset),
}

impl Position {
    /// The beginning of a stream.
    pub const ZERO: Self = Self(0);
    /// Largest representable position.
    pub const MAX: Self = Self(i64::MAX);

    /// Create a position, rejecting negative values.
    pub fn new(value: i64) -> Result<Self> {
        if value < 0 {
            return Err(IoError::InvalidArgument("Position::new"));
        }
        Ok(Self(value))
    }

    /// Create a position from a buffer index or length.
    pub fn from_usize(value: usize) -> Result<Self> {
        i64::try_from(value)
            .map(Self)
            .map_err(|_| IoError::ValueTooLarge("Position::from_usize"))
    }

    /// The raw value, always `>= 0`.
    pub const fn get(self) -> i64 {
        self.0
    }

    /// The position as a buffer index.
    pub fn to_usize(self) -> Result<usize> {
        usize::try_from(self.0).map_err(|_| IoError::ValueTooLarge("Position::to_usize"))
    }

    /// `self + offset`, failing instead of wrapping or going negative.
    pub fn checked_add(self, offset: Offset) -> Result<Self> {
        match self.0.checked_add(offset.0) {
            Some(value) if value < 0 => Err(IoError::InvalidArgument("Position::checked_add")),
            Some(value) => Ok(Self(value)),
            None => Err(IoError::ValueTooLarge("Position::checked_add")),
        }
    }

    /// `self - offset`, failing instead of wrapping or going negative.
    pub fn checked_sub(self, offset: Offset) -> Result<Self> {
        match offset.0.checked_neg() {
            Some(negated) => self.checked_add(Offset(negated)),
            // Subtracting i64::MIN always exceeds the maximum.
            None => Err(IoError::ValueTooLarge("Position::checked_sub")),
        }
    }
}

impl Offset {
    /// No movement.
    pub const ZERO: Self = Self(0);

    /// A signed displacement; any value is valid.
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// The raw signed value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl SeekTarget {
    /// Resolve this target against the current position and the logical end.
    pub fn resolve(self, current: Position, end: Position) -> Result<Position> {
        match self {
            Self::Absolute(position) => Ok(position),
            Self::Relative(offset) => current.checked_add(offset),
            Self::Base(base) => Ok(base.resolve(current, end)),
            Self::BaseOffset(base, offset) => base.resolve(current, end).checked_add(offset),
        }
    }
}

impl BasePosition {
    fn resolve(self, current: Position, end: Position) -> Position {
        match self {
            Self::Beginning => Position::ZERO,
            Self::Current => current,
            Self::End => end,
        }
    }
}

impl From<Position> for SeekTarget {
    fn from(position: Position) -> Self {
        Self::Absolute(position)
    }
}

impl From<Offset> for SeekTarget {
    fn from(offset: Offset) -> Self {
        Self::Relative(offset)
    }
}

impl From<BasePosition> for SeekTarget {
    fn from(base: BasePosition) -> Self {
        Self::Base(base)
    }
}

impl From<(BasePosition, Offset)> for SeekTarget {
    fn from((base, offset): (BasePosition, Offset)) -> Self {
        Self::BaseOffset(base, offset)
    }
}

impl From<Position> for i64 {
    fn from(position: Position) -> Self {
        position.0
    }
}

impl From<i64> for Offset {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Offset> for i64 {
    fn from(offset: Offset) -> Self {
        offset.0
    }
}

impl TryFrom<i64> for Position {
    type Error = IoError;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Sub for Position {
    type Output = Offset;

    fn sub(self, rhs: Self) -> Offset {
        // Both operands are non-negative, so the difference cannot overflow.
        Offset(self.0 - rhs.0)
    }
}

impl Neg for Offset {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

macro_rules! offset_ops {
    ($($trait:ident $method:ident $assign_trait:ident $assign_method:ident $rhs:ty => $get:expr;)*) => {
        $(
            impl $trait<$rhs> for Offset {
                type Output = Self;

                fn $method(self, rhs: $rhs) -> Self {
                    Self(self.0.$method(($get)(rhs)))
                }
            }

            impl $assign_trait<$rhs> for Offset {
                fn $assign_method(&mut self, rhs: $rhs) {
                    *self = (*self).$method(rhs);
                }
            }
        )*
    };
}

offset_ops! {
    Add add AddAssign add_assign Offset => |o: Offset| o.0;
    Sub sub SubAssign sub_assign Offset => |o: Offset| o.0;
    Mul mul MulAssign mul_assign i64 => |v: i64| v;
    Div div DivAssign div_assign i64 => |v: i64| v;
    Rem rem RemAssign rem_assign i64 => |v: i64| v;
}
