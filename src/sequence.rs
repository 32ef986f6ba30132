//! 32位 TCP 序列号。
//! 32-bit TCP sequence numbers.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Sub};

/// A 32-bit sequence number with wrapping addition.
///
/// Ordering follows serial number arithmetic (RFC 1982): `a < b` when the
/// forward distance from `a` to `b` is below 2^31, so comparisons keep
/// working after the counter wraps.
///
/// 使用环绕加法的32位序列号。排序遵循 RFC 1982 的序列号算术。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SequenceNumber32(u32);

impl SequenceNumber32 {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u32 {
        self.0
    }
}

impl Add<u32> for SequenceNumber32 {
    type Output = Self;

    fn add(self, rhs: u32) -> Self {
        Self(self.0.wrapping_add(rhs))
    }
}

impl AddAssign<u32> for SequenceNumber32 {
    fn add_assign(&mut self, rhs: u32) {
        self.0 = self.0.wrapping_add(rhs);
    }
}

/// The signed distance from `rhs` to `self`.
impl Sub for SequenceNumber32 {
    type Output = i32;

    fn sub(self, rhs: Self) -> i32 {
        self.0.wrapping_sub(rhs.0) as i32
    }
}

impl PartialOrd for SequenceNumber32 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SequenceNumber32 {
    fn cmp(&self, other: &Self) -> Ordering {
        (*self - *other).cmp(&0)
    }
}

impl fmt::Display for SequenceNumber32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
