//! SVD `bitRange` values.

use std::fmt;

/// An inclusive bit range, written `[msb:lsb]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitRange {
    pub msb: u32,
    pub lsb: u32,
}

impl BitRange {
    /// Range covering `width` bits from `lsb` upward. `None` for a zero
    /// width or a range past `u32::MAX`.
    pub fn new(width: u32, lsb: u32) -> Option<Self> {
        let msb = lsb.checked_add(width.checked_sub(1)?)?;
        Some(Self { msb, lsb })
    }

    /// Parse `[msb:lsb]`; the range must not be inverted.
    pub fn parse(text: &str) -> Option<Self> {
        let inner = text.strip_prefix('[')?.strip_suffix(']')?;
        let (msb, lsb) = inner.split_once(':')?;
        let msb = msb.trim().parse().ok()?;
        let lsb = lsb.trim().parse().ok()?;
        (msb >= lsb).then_some(Self { msb, lsb })
    }

    pub fn width(&self) -> u32 {
        self.msb - self.lsb + 1
    }
}

impl fmt::Display for BitRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}:{}]", self.msb, self.lsb)
    }
}

/// `[lsb+width-1:lsb]` for a field of `width` bits at `lsb`.
pub fn bit_range(width: u32, lsb: u32) -> Option<String> {
    BitRange::new(width, lsb).map(|r| r.to_string())
}
