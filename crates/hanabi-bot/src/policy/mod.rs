mod chromosome;
mod rule;
mod rule_policy;

pub use chromosome::{Chromosome, ParseChromosomeError};
pub use rule::Rule;
pub use rule_policy::{AgentParams, Decision, DEFAULT_INFORMATION_TOKENS, RulePolicy};

use crate::error::DecisionError;
use crate::inference::SlotBeliefs;
use hanabi_core::model::action::Action;
use hanabi_core::model::counts::CardCounts;
use hanabi_core::model::observation::Observation;

/// Everything a rule may consult when deciding.
#[derive(Debug, Clone, Copy)]
pub struct DecisionContext<'a> {
    pub observation: &'a Observation,
    pub pool: &'a CardCounts,
    pub beliefs: &'a SlotBeliefs,
    pub information_token_cap: u8,
}

impl DecisionContext<'_> {
    pub fn has_hint_tokens(&self) -> bool {
        self.observation.information_tokens > 0
    }

    pub fn below_token_cap(&self) -> bool {
        self.observation.information_tokens < self.information_token_cap
    }
}

/// Interface harnesses drive an agent through.
pub trait Policy: Send + Sync {
    /// Chooses a move, or `None` when the observation is not for the player
    /// to move.
    fn act(&self, observation: &Observation) -> Result<Option<Action>, DecisionError>;
}
