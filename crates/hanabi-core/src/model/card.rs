use crate::model::color::Color;
use crate::model::fireworks::Fireworks;
use crate::model::rank::Rank;
use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub color: Color,
    pub rank: Rank,
}

impl Card {
    pub const fn new(color: Color, rank: Rank) -> Self {
        Self { color, rank }
    }

    /// Fits exactly on top of its color's firework.
    pub fn is_playable(self, fireworks: &Fireworks) -> bool {
        self.rank.value() == fireworks.height(self.color)
    }

    /// Already played over; can never be played again.
    pub fn is_useless(self, fireworks: &Fireworks) -> bool {
        self.rank.value() < fireworks.height(self.color)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.color, self.rank)
    }
}

#[cfg(test)]
mod tests {
    use super::{Card, Color, Fireworks, Rank};

    #[test]
    fn display_uses_table_notation() {
        assert_eq!(Card::new(Color::Red, Rank::One).to_string(), "R1");
        assert_eq!(Card::new(Color::Blue, Rank::Five).to_string(), "B5");
    }

    #[test]
    fn playable_matches_firework_height() {
        let mut fireworks = Fireworks::new();
        fireworks.set_height(Color::Green, 2);
        assert!(Card::new(Color::Green, Rank::Three).is_playable(&fireworks));
        assert!(!Card::new(Color::Green, Rank::Four).is_playable(&fireworks));
        assert!(Card::new(Color::Red, Rank::One).is_playable(&fireworks));
    }

    #[test]
    fn useless_below_firework_height() {
        let mut fireworks = Fireworks::new();
        fireworks.set_height(Color::White, 2);
        assert!(Card::new(Color::White, Rank::One).is_useless(&fireworks));
        assert!(Card::new(Color::White, Rank::Two).is_useless(&fireworks));
        assert!(!Card::new(Color::White, Rank::Three).is_useless(&fireworks));
        assert!(!Card::new(Color::Yellow, Rank::One).is_useless(&fireworks));
    }
}
