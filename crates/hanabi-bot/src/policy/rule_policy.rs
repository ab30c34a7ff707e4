use super::{Chromosome, DecisionContext, Policy, Rule};
use crate::error::DecisionError;
use crate::inference::{SlotBeliefs, unseen_from_observation};
use hanabi_core::model::action::Action;
use hanabi_core::model::observation::Observation;
use serde::{Deserialize, Serialize};
use tracing::{Level, event};

pub const DEFAULT_INFORMATION_TOKENS: u8 = 8;

/// Immutable agent configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentParams {
    /// Most hint tokens the table can hold; discarding is pointless at the cap.
    #[serde(default = "default_information_tokens")]
    pub information_tokens: u8,
    #[serde(default)]
    pub chromosome: Chromosome,
}

impl Default for AgentParams {
    fn default() -> Self {
        Self {
            information_tokens: DEFAULT_INFORMATION_TOKENS,
            chromosome: Chromosome::default(),
        }
    }
}

fn default_information_tokens() -> u8 {
    DEFAULT_INFORMATION_TOKENS
}

/// The move chosen and the rule that chose it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub action: Action,
    pub rule: Rule,
    /// Code as written in the chromosome.
    pub code: i32,
    /// Index of that code in the chromosome.
    pub position: usize,
}

/// Chromosome-driven rule cascade.
///
/// Each call rebuilds the unseen pool and slot beliefs from the observation,
/// then walks the chromosome in order; the first rule whose guard holds
/// decides. Holds no state between calls.
#[derive(Debug, Clone, Default)]
pub struct RulePolicy {
    params: AgentParams,
}

impl RulePolicy {
    pub fn new(params: AgentParams) -> Self {
        Self { params }
    }

    pub fn with_chromosome(chromosome: Chromosome) -> Self {
        Self::new(AgentParams {
            chromosome,
            ..AgentParams::default()
        })
    }

    pub fn params(&self) -> &AgentParams {
        &self.params
    }

    pub fn chromosome(&self) -> &Chromosome {
        &self.params.chromosome
    }

    pub fn information_token_cap(&self) -> u8 {
        self.params.information_tokens
    }

    pub fn decide(&self, observation: &Observation) -> Result<Option<Decision>, DecisionError> {
        if !observation.is_my_turn() {
            return Ok(None);
        }

        let pool = unseen_from_observation(observation);
        let beliefs = SlotBeliefs::compute(observation.own_hints(), &pool, &observation.fireworks)?;
        let ctx = DecisionContext {
            observation,
            pool: &pool,
            beliefs: &beliefs,
            information_token_cap: self.params.information_tokens,
        };
        log_beliefs(&ctx);

        for (position, code, rule) in self.params.chromosome.rules() {
            let rule = rule?;
            if let Some(action) = rule.evaluate(&ctx) {
                let decision = Decision {
                    action,
                    rule,
                    code,
                    position,
                };
                log_decision(&ctx, &decision);
                return Ok(Some(decision));
            }
        }

        Err(DecisionError::CascadeExhausted {
            rules: self.params.chromosome.len(),
        })
    }

    pub fn act(&self, observation: &Observation) -> Result<Option<Action>, DecisionError> {
        Ok(self.decide(observation)?.map(|decision| decision.action))
    }
}

impl Policy for RulePolicy {
    fn act(&self, observation: &Observation) -> Result<Option<Action>, DecisionError> {
        RulePolicy::act(self, observation)
    }
}

fn log_beliefs(ctx: &DecisionContext<'_>) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }

    let format_probs = |values: &[f64]| {
        values
            .iter()
            .map(|p| format!("{p:.2}"))
            .collect::<Vec<_>>()
            .join(",")
    };

    event!(
        target: "hanabi_bot::beliefs",
        Level::DEBUG,
        pool = ctx.pool.len(),
        playable = %format_probs(ctx.beliefs.playable()),
        useless = %format_probs(ctx.beliefs.useless()),
    );
}

fn log_decision(ctx: &DecisionContext<'_>, decision: &Decision) {
    if !tracing::enabled!(Level::INFO) {
        return;
    }

    let obs = ctx.observation;
    event!(
        target: "hanabi_bot::decision",
        Level::INFO,
        rule = decision.rule.label(),
        code = decision.code,
        position = decision.position,
        hand_size = obs.own_hand_size(),
        pool = ctx.pool.len(),
        information_tokens = obs.information_tokens,
        life_tokens = obs.life_tokens,
        action = %decision.action,
    );
}
