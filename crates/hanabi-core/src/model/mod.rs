pub mod action;
pub mod card;
pub mod color;
pub mod counts;
pub mod deck;
pub mod fireworks;
pub mod hint;
pub mod observation;
pub mod rank;
