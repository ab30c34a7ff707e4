use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Color {
    #[serde(rename = "R")]
    Red = 0,
    #[serde(rename = "Y")]
    Yellow = 1,
    #[serde(rename = "G")]
    Green = 2,
    #[serde(rename = "W")]
    White = 3,
    #[serde(rename = "B")]
    Blue = 4,
}

impl Color {
    pub const COUNT: usize = 5;

    pub const ALL: [Color; 5] = [
        Color::Red,
        Color::Yellow,
        Color::Green,
        Color::White,
        Color::Blue,
    ];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Color::Red),
            1 => Some(Color::Yellow),
            2 => Some(Color::Green),
            3 => Some(Color::White),
            4 => Some(Color::Blue),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn symbol(self) -> char {
        match self {
            Color::Red => 'R',
            Color::Yellow => 'Y',
            Color::Green => 'G',
            Color::White => 'W',
            Color::Blue => 'B',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        Color::ALL.into_iter().find(|color| color.symbol() == symbol)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
