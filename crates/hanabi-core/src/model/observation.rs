use crate::model::card::Card;
use crate::model::color::Color;
use crate::model::fireworks::Fireworks;
use crate::model::hint::Hint;
use crate::model::rank::Rank;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One player's view of the table at a decision point.
///
/// Every per-player vector is indexed by offset from the observing player:
/// offset 0 is the observer, offset 1 the next player, and so on. The
/// observer's own slots are `None` in `observed_hands`; their contents are
/// only ever inferred.
///
/// Deserialisation validates the shape, so a parsed observation always has
/// one hand and one knowledge row per player with matching lengths, and every
/// partner card visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawObservation", into = "RawObservation")]
pub struct Observation {
    pub current_player_offset: usize,
    pub fireworks: Fireworks,
    pub discard_pile: Vec<Card>,
    pub observed_hands: Vec<Vec<Option<Card>>>,
    pub card_knowledge: Vec<Vec<Hint>>,
    pub information_tokens: u8,
    pub life_tokens: u8,
    pub deck_size: usize,
    pub num_players: usize,
}

impl Observation {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn is_my_turn(&self) -> bool {
        self.current_player_offset == 0
    }

    /// Hints the table has given about the observer's own slots.
    pub fn own_hints(&self) -> &[Hint] {
        self.card_knowledge.first().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn own_hand_size(&self) -> usize {
        self.own_hints().len()
    }

    /// Offsets of every other player, in turn order.
    pub fn partner_offsets(&self) -> impl Iterator<Item = usize> + use<> {
        1..self.num_players
    }

    /// Visible cards of the partner at `offset`, paired with the hints that
    /// partner holds about them.
    pub fn partner_slots(&self, offset: usize) -> impl Iterator<Item = (Card, Hint)> + '_ {
        let hand = self.observed_hands.get(offset).map(Vec::as_slice);
        let knowledge = self.card_knowledge.get(offset).map(Vec::as_slice);
        hand.unwrap_or(&[])
            .iter()
            .zip(knowledge.unwrap_or(&[]).iter())
            .filter_map(|(card, hint)| card.map(|card| (card, *hint)))
    }

    /// Every card visible in a partner's hand.
    pub fn partner_cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.observed_hands
            .iter()
            .skip(1)
            .flat_map(|hand| hand.iter().flatten().copied())
    }

    pub fn validate(&self) -> Result<(), ObservationError> {
        if self.num_players < 2 {
            return Err(ObservationError::TooFewPlayers {
                num_players: self.num_players,
            });
        }
        if self.current_player_offset >= self.num_players {
            return Err(ObservationError::CurrentPlayerOutOfRange {
                offset: self.current_player_offset,
                num_players: self.num_players,
            });
        }
        if self.observed_hands.len() != self.num_players {
            return Err(ObservationError::HandCount {
                expected: self.num_players,
                found: self.observed_hands.len(),
            });
        }
        if self.card_knowledge.len() != self.num_players {
            return Err(ObservationError::KnowledgeCount {
                expected: self.num_players,
                found: self.card_knowledge.len(),
            });
        }
        for (offset, (hand, knowledge)) in self
            .observed_hands
            .iter()
            .zip(self.card_knowledge.iter())
            .enumerate()
        {
            if hand.len() != knowledge.len() {
                return Err(ObservationError::HandSizeMismatch {
                    offset,
                    cards: hand.len(),
                    hints: knowledge.len(),
                });
            }
            if offset == 0 {
                continue;
            }
            if let Some(slot) = hand.iter().position(Option::is_none) {
                return Err(ObservationError::HiddenPartnerCard { offset, slot });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ObservationError {
    #[error("observation needs at least two players, got {num_players}")]
    TooFewPlayers { num_players: usize },
    #[error("current player offset {offset} outside a {num_players}-player table")]
    CurrentPlayerOutOfRange { offset: usize, num_players: usize },
    #[error("expected {expected} observed hands, found {found}")]
    HandCount { expected: usize, found: usize },
    #[error("expected {expected} card knowledge rows, found {found}")]
    KnowledgeCount { expected: usize, found: usize },
    #[error("player +{offset} holds {cards} cards but has {hints} knowledge entries")]
    HandSizeMismatch {
        offset: usize,
        cards: usize,
        hints: usize,
    },
    #[error("card in slot {slot} of player +{offset} is not visible")]
    HiddenPartnerCard { offset: usize, slot: usize },
    #[error("slot {slot} of player +{offset} is neither a card nor hidden")]
    MalformedSlot { offset: usize, slot: usize },
}

/// A hand slot as environments print it: a visible card, or
/// `{"color": null, "rank": -1}` for a card the observer cannot see.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawSlot {
    color: Option<Color>,
    rank: i8,
}

impl RawSlot {
    const HIDDEN: RawSlot = RawSlot {
        color: None,
        rank: -1,
    };

    fn into_card(self) -> Result<Option<Card>, ()> {
        match (self.color, u8::try_from(self.rank).ok().and_then(Rank::from_value)) {
            (Some(color), Some(rank)) => Ok(Some(Card::new(color, rank))),
            (None, None) if self.rank < 0 => Ok(None),
            _ => Err(()),
        }
    }
}

impl From<Option<Card>> for RawSlot {
    fn from(card: Option<Card>) -> Self {
        match card {
            Some(card) => RawSlot {
                color: Some(card.color),
                rank: card.rank.value() as i8,
            },
            None => RawSlot::HIDDEN,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawObservation {
    current_player_offset: usize,
    #[serde(default)]
    fireworks: Fireworks,
    #[serde(default)]
    discard_pile: Vec<Card>,
    observed_hands: Vec<Vec<RawSlot>>,
    card_knowledge: Vec<Vec<Hint>>,
    information_tokens: u8,
    life_tokens: u8,
    deck_size: usize,
    num_players: usize,
}

impl TryFrom<RawObservation> for Observation {
    type Error = ObservationError;

    fn try_from(raw: RawObservation) -> Result<Self, Self::Error> {
        let mut observed_hands = Vec::with_capacity(raw.observed_hands.len());
        for (offset, hand) in raw.observed_hands.into_iter().enumerate() {
            let cards = hand
                .into_iter()
                .enumerate()
                .map(|(slot, raw_slot)| {
                    raw_slot
                        .into_card()
                        .map_err(|()| ObservationError::MalformedSlot { offset, slot })
                })
                .collect::<Result<Vec<_>, _>>()?;
            observed_hands.push(cards);
        }

        let observation = Observation {
            current_player_offset: raw.current_player_offset,
            fireworks: raw.fireworks,
            discard_pile: raw.discard_pile,
            observed_hands,
            card_knowledge: raw.card_knowledge,
            information_tokens: raw.information_tokens,
            life_tokens: raw.life_tokens,
            deck_size: raw.deck_size,
            num_players: raw.num_players,
        };
        observation.validate()?;
        Ok(observation)
    }
}

impl From<Observation> for RawObservation {
    fn from(observation: Observation) -> Self {
        RawObservation {
            current_player_offset: observation.current_player_offset,
            fireworks: observation.fireworks,
            discard_pile: observation.discard_pile,
            observed_hands: observation
                .observed_hands
                .into_iter()
                .map(|hand| hand.into_iter().map(RawSlot::from).collect())
                .collect(),
            card_knowledge: observation.card_knowledge,
            information_tokens: observation.information_tokens,
            life_tokens: observation.life_tokens,
            deck_size: observation.deck_size,
            num_players: observation.num_players,
        }
    }
}
