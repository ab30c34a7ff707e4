//! Turn-zero observations dealt from a shuffled deck, used as fixtures when
//! no recorded observations are supplied.

use hanabi_core::model::deck::Deck;
use hanabi_core::model::fireworks::Fireworks;
use hanabi_core::model::hint::Hint;
use hanabi_core::model::observation::Observation;
use thiserror::Error;

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 5;
pub const STARTING_LIVES: u8 = 3;

pub const fn hand_size(players: usize) -> usize {
    if players <= 3 { 5 } else { 4 }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DealError {
    #[error("cannot deal for {players} players (supported: {MIN_PLAYERS}-{MAX_PLAYERS})")]
    PlayerCount { players: usize },
    #[error("deck holds {available} cards, {needed} needed to deal")]
    ShortDeck { available: usize, needed: usize },
}

/// Deals every player a hand and returns the first player's view before any
/// move has been made.
pub fn opening_observation(
    deck: &mut Deck,
    players: usize,
    information_tokens: u8,
) -> Result<Observation, DealError> {
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players) {
        return Err(DealError::PlayerCount { players });
    }
    let size = hand_size(players);
    let needed = size * players;
    if deck.len() < needed {
        return Err(DealError::ShortDeck {
            available: deck.len(),
            needed,
        });
    }

    let mut observed_hands = Vec::with_capacity(players);
    observed_hands.push(vec![None; size]);
    // the observer's own cards leave the deck too, unseen
    deck.draw(size);
    for _ in 1..players {
        observed_hands.push(deck.draw(size).into_iter().map(Some).collect());
    }

    Ok(Observation {
        current_player_offset: 0,
        fireworks: Fireworks::new(),
        discard_pile: Vec::new(),
        observed_hands,
        card_knowledge: vec![vec![Hint::unknown(); size]; players],
        information_tokens,
        life_tokens: STARTING_LIVES,
        deck_size: deck.len(),
        num_players: players,
    })
}
