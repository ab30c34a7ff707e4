use crate::model::card::Card;
use crate::model::color::Color;
use crate::model::rank::Rank;
use serde::{Deserialize, Serialize};

/// What a player has been told about one of their slots.
///
/// Only positive information is kept: a revealed color and/or rank. Hints
/// that ruled a value out are not tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Hint {
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default)]
    pub rank: Option<Rank>,
}

impl Hint {
    pub const fn unknown() -> Self {
        Self {
            color: None,
            rank: None,
        }
    }

    pub const fn new(color: Option<Color>, rank: Option<Rank>) -> Self {
        Self { color, rank }
    }

    pub const fn color(color: Color) -> Self {
        Self {
            color: Some(color),
            rank: None,
        }
    }

    pub const fn rank(rank: Rank) -> Self {
        Self {
            color: None,
            rank: Some(rank),
        }
    }

    pub const fn exact(card: Card) -> Self {
        Self {
            color: Some(card.color),
            rank: Some(card.rank),
        }
    }

    /// The card named by the hint when both color and rank are revealed.
    pub fn known_card(&self) -> Option<Card> {
        match (self.color, self.rank) {
            (Some(color), Some(rank)) => Some(Card::new(color, rank)),
            _ => None,
        }
    }

    pub fn matches(&self, card: Card) -> bool {
        self.color.is_none_or(|color| color == card.color)
            && self.rank.is_none_or(|rank| rank == card.rank)
    }
}
