#![deny(warnings)]
pub mod model;

pub use model::action::Action;
pub use model::card::Card;
pub use model::color::Color;
pub use model::counts::CardCounts;
pub use model::deck::Deck;
pub use model::fireworks::Fireworks;
pub use model::hint::Hint;
pub use model::observation::{Observation, ObservationError};
pub use model::rank::Rank;
