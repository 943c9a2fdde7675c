//! How a pair window divides its space between its two children.

use casement_common::TreeError;
use serde::{Deserialize, Serialize};

/// Bits of the split "method" word handed in by the embedded program.
pub mod method {
    /// Which child is constrained: 0 = left/above, 1 = right/below.
    pub const SIDE_MASK: u32 = 0x03;
    pub const PROPORTIONAL: u32 = 0x04;
    pub const NO_BORDER: u32 = 0x08;
    /// Set for the above/below family, clear for left/right.
    pub const VERTICAL: u32 = 0x10;
    pub const ALL: u32 = SIDE_MASK | PROPORTIONAL | NO_BORDER | VERTICAL;

    pub const LEFT: u32 = 0x00;
    pub const RIGHT: u32 = 0x01;
    pub const ABOVE: u32 = VERTICAL;
    pub const BELOW: u32 = VERTICAL | 0x01;
    pub const FIXED: u32 = 0x00;
}

/// `Horizontal` places the children side by side; `Vertical` stacks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Where the constrained child sits in reading order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// Left or above.
    Leading,
    /// Right or below.
    Trailing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sizing {
    /// Exact size in the key window's native units.
    Fixed(u32),
    /// Percentage (0-100) of the available extent.
    Proportional(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arrangement {
    pub orientation: Orientation,
    pub sizing: Sizing,
    pub side: Side,
    pub bordered: bool,
}

impl Arrangement {
    /// Decode the individual bit groups of a split method.
    ///
    /// `orientation_bits` and `sizing_bits` are already isolated flags;
    /// `side_bits` is the two-bit side field. Proportional magnitudes are
    /// clamped to 100.
    pub fn from_spec(
        orientation_bits: u32,
        sizing_bits: u32,
        side_bits: u32,
        border_bits: u32,
        magnitude: u32,
    ) -> Result<Self, TreeError> {
        let raw = orientation_bits | sizing_bits | side_bits | border_bits;
        let side = match side_bits {
            0 => Side::Leading,
            1 => Side::Trailing,
            _ => return Err(TreeError::InvalidMethod(raw)),
        };
        let orientation = if orientation_bits != 0 {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        };
        let sizing = if sizing_bits != 0 {
            Sizing::Proportional(magnitude.min(100))
        } else {
            Sizing::Fixed(magnitude)
        };
        Ok(Self {
            orientation,
            sizing,
            side,
            bordered: border_bits == 0,
        })
    }

    /// Decode a whole method word plus its size argument.
    pub fn from_method(raw: u32, size: u32) -> Result<Self, TreeError> {
        if raw & !method::ALL != 0 {
            return Err(TreeError::InvalidMethod(raw));
        }
        Self::from_spec(
            raw & method::VERTICAL,
            raw & method::PROPORTIONAL,
            raw & method::SIDE_MASK,
            raw & method::NO_BORDER,
            size,
        )
    }

    /// Encode back into a method word.
    pub fn method(&self) -> u32 {
        let mut raw = match self.side {
            Side::Leading => 0,
            Side::Trailing => 1,
        };
        if self.orientation == Orientation::Vertical {
            raw |= method::VERTICAL;
        }
        if matches!(self.sizing, Sizing::Proportional(_)) {
            raw |= method::PROPORTIONAL;
        }
        if !self.bordered {
            raw |= method::NO_BORDER;
        }
        raw
    }

    pub fn magnitude(&self) -> u32 {
        match self.sizing {
            Sizing::Fixed(n) | Sizing::Proportional(n) => n,
        }
    }
}
