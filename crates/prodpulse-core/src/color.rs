//! Embed color palette.
//!
//! The palette is the set of Discord-style integer colors the reports
//! rotate through. Selection is a pure function of a seed (the report
//! hour) so message styling is reproducible in tests.

/// Enumerated palette of embed colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Color {
    Green = 5_763_719,
    Yellow = 16_705_372,
    Red = 15_548_997,
    Rose = 15_418_782,
    Purple = 5_793_266,
    DarkGreen = 1_146_986,
    Pink = 15_277_667,
    Orange = 15_105_570,
    Blue = 3_447_003,
}

pub const PALETTE: [Color; 9] = [
    Color::Green,
    Color::Yellow,
    Color::Red,
    Color::Rose,
    Color::Purple,
    Color::DarkGreen,
    Color::Pink,
    Color::Orange,
    Color::Blue,
];

impl Color {
    /// Integer value for webhook payloads.
    pub fn code(self) -> u32 {
        self as u32
    }
}

/// Pick a palette color for the given seed.
pub fn pick_color(seed: u64) -> Color {
    PALETTE[(seed % PALETTE.len() as u64) as usize]
}
