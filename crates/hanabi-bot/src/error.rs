use thiserror::Error;

/// Fatal outcomes of a decision. None of them are transient: the first two
/// mean the chromosome is broken, the last that the observation contradicts
/// the deck composition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecisionError {
    #[error("rule {code} is not defined")]
    UnrecognizedRule { code: i32 },
    #[error("no rule fired for this game situation (faulty {rules}-rule chromosome)")]
    CascadeExhausted { rules: usize },
    #[error("no unseen card is consistent with the hints on own slot {slot}")]
    InconsistentObservation { slot: usize },
}
