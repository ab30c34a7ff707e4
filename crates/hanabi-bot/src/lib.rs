pub mod error;
pub mod inference;
pub mod policy;

pub use error::DecisionError;
pub use inference::{SlotBeliefs, compute_slot_probabilities, compute_unseen_pool};
pub use policy::{
    AgentParams, Chromosome, Decision, DecisionContext, Policy, Rule, RulePolicy,
};
