use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// Pixels per native unit of a window kind, per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitSize {
    pub width: f64,
    pub height: f64,
}

impl UnitSize {
    pub const PIXEL: UnitSize = UnitSize {
        width: 1.0,
        height: 1.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Window kinds as exposed to the embedded program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum WindowKind {
    Pair = 1,
    Blank = 2,
    TextBuffer = 3,
    TextGrid = 4,
    Graphics = 5,
}

impl WindowKind {
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            1 => Some(Self::Pair),
            2 => Some(Self::Blank),
            3 => Some(Self::TextBuffer),
            4 => Some(Self::TextGrid),
            5 => Some(Self::Graphics),
            _ => None,
        }
    }

    pub fn raw(self) -> u32 {
        self as u32
    }

    /// Whether text input requests make sense for this kind.
    pub fn accepts_text_input(self) -> bool {
        matches!(self, Self::TextBuffer | Self::TextGrid)
    }
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pair => "pair",
            Self::Blank => "blank",
            Self::TextBuffer => "text-buffer",
            Self::TextGrid => "text-grid",
            Self::Graphics => "graphics",
        };
        f.write_str(name)
    }
}

/// Special key codes delivered in character and line events.
pub mod keycode {
    pub const UNKNOWN: u32 = 0xffff_ffff;
    pub const LEFT: u32 = 0xffff_fffe;
    pub const RIGHT: u32 = 0xffff_fffd;
    pub const UP: u32 = 0xffff_fffc;
    pub const DOWN: u32 = 0xffff_fffb;
    pub const RETURN: u32 = 0xffff_fffa;
    pub const DELETE: u32 = 0xffff_fff9;
    pub const ESCAPE: u32 = 0xffff_fff8;
    pub const TAB: u32 = 0xffff_fff7;
    pub const FUNC1: u32 = 0xffff_ffef;
    pub const FUNC12: u32 = 0xffff_ffe4;

    /// Keys other than Return that may end line input.
    pub fn is_valid_terminator(key: u32) -> bool {
        key == ESCAPE || (FUNC12..=FUNC1).contains(&key)
    }
}
