use crate::model::color::Color;
use crate::model::rank::Rank;
use core::fmt;
use serde::{Deserialize, Serialize};

/// A move for the player whose turn it is.
///
/// Serialised in the `{"action_type": "PLAY", "card_index": 0}` shape used by
/// Hanabi environments. Reveal targets are offsets relative to the acting
/// player (1 = next player).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "action_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Play {
        card_index: usize,
    },
    Discard {
        card_index: usize,
    },
    RevealColor {
        color: Color,
        target_offset: usize,
    },
    RevealRank {
        rank: Rank,
        target_offset: usize,
    },
}

impl Action {
    pub const fn is_hint(&self) -> bool {
        matches!(self, Action::RevealColor { .. } | Action::RevealRank { .. })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Play { card_index } => write!(f, "play #{card_index}"),
            Action::Discard { card_index } => write!(f, "discard #{card_index}"),
            Action::RevealColor {
                color,
                target_offset,
            } => write!(f, "reveal {color} to +{target_offset}"),
            Action::RevealRank {
                rank,
                target_offset,
            } => write!(f, "reveal {rank}s to +{target_offset}"),
        }
    }
}
