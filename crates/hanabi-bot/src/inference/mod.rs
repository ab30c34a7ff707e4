//! Deduction of what the observer's own hand can hold.
//!
//! - `unseen`: the multiset of cards not visible anywhere on the table.
//! - `slots`: per-slot narrowing by hints and the derived probabilities.

mod slots;
mod unseen;

pub use slots::{
    SlotBeliefs, argmax, compute_slot_probabilities, filter_by_hint, filter_by_playability,
    filter_by_unplayability,
};
pub use unseen::{
    color_cards_remaining, compute_unseen_pool, scarcest_colors, unseen_from_observation,
};
