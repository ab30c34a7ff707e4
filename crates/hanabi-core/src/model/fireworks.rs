use crate::model::color::Color;
use crate::model::rank::Rank;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Highest height a firework can reach.
pub const MAX_HEIGHT: u8 = Rank::COUNT as u8;

/// Height of every color's firework; 0 means nothing has been played yet.
///
/// Serialised as a `{"R": 0, "Y": 2, ...}` map. Colors missing from the map
/// are treated as unplayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<Color, u8>", into = "BTreeMap<Color, u8>")]
pub struct Fireworks {
    heights: [u8; Color::COUNT],
}

impl Fireworks {
    pub const fn new() -> Self {
        Self {
            heights: [0; Color::COUNT],
        }
    }

    pub fn with_heights(heights: [u8; Color::COUNT]) -> Self {
        let mut fireworks = Self::new();
        for color in Color::ALL {
            fireworks.set_height(color, heights[color.index()]);
        }
        fireworks
    }

    pub const fn height(&self, color: Color) -> u8 {
        self.heights[color.index()]
    }

    pub fn set_height(&mut self, color: Color, height: u8) {
        self.heights[color.index()] = height.min(MAX_HEIGHT);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Color, u8)> + '_ {
        Color::ALL.into_iter().map(|color| (color, self.height(color)))
    }

    /// Number of fireworks at or above `height`.
    pub fn count_at_least(&self, height: u8) -> usize {
        self.heights.iter().filter(|&&h| h >= height).count()
    }
}

impl TryFrom<BTreeMap<Color, u8>> for Fireworks {
    type Error = String;

    fn try_from(map: BTreeMap<Color, u8>) -> Result<Self, Self::Error> {
        let mut fireworks = Fireworks::new();
        for (color, height) in map {
            if height > MAX_HEIGHT {
                return Err(format!(
                    "firework {color} height {height} exceeds {MAX_HEIGHT}"
                ));
            }
            fireworks.set_height(color, height);
        }
        Ok(fireworks)
    }
}

impl From<Fireworks> for BTreeMap<Color, u8> {
    fn from(fireworks: Fireworks) -> Self {
        fireworks.iter().collect()
    }
}
