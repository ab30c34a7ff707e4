use super::DecisionContext;
use crate::error::DecisionError;
use crate::inference::{color_cards_remaining, scarcest_colors};
use hanabi_core::model::action::Action;
use hanabi_core::model::rank::Rank;

const HIGH_CONFIDENCE: f64 = 0.8;
const EVEN_ODDS: f64 = 0.5;
/// Fireworks at or above this height count as advanced.
const ADVANCED_HEIGHT: u8 = 3;
const ADVANCED_FIREWORKS: usize = 3;
/// Token count under which the low-token rules apply.
const SCARCE_TOKENS: u8 = 3;
const HINTED_RANK: Rank = Rank::Two;

/// One heuristic of the cascade: a guard over the observation and slot
/// beliefs, and the move it makes when the guard holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rule {
    /// Play the likeliest-playable slot if its chance beats `threshold`.
    PlayProbable { threshold: f64 },
    /// Complete the knowledge of a partner's playable card.
    HintPlayable,
    /// Discard the likeliest-dead slot if its chance beats `threshold`.
    DiscardUseless { threshold: f64 },
    /// Play confidently once three fireworks have reached height 3.
    PlayWhenAdvanced,
    /// Play a fully known card of the color with the fewest copies left.
    PlayScarceColor,
    /// On the last life with few tokens, discard anything possibly dead.
    DiscardOnLastLife,
    /// With every life left and few tokens, play a fully known playable card.
    PlayKnownWhileSafe,
    /// Reveal rank 1 (zero-based, the second card of a color) to a partner
    /// holding one while some firework has not started.
    HintOnes,
    /// Point out cards of a color whose firework is nearly complete.
    HintNearlyComplete,
    /// Add the color to a partner's rank-only hint on a playable card.
    CompleteRankHint,
    /// Discard slot 0, the oldest card.
    DiscardOldest,
    /// Play the likeliest-playable slot unconditionally.
    PlayBestGuess,
}

impl Rule {
    pub fn from_code(code: i32) -> Result<Self, DecisionError> {
        let rule = match code {
            0 => Rule::PlayProbable {
                threshold: HIGH_CONFIDENCE,
            },
            1 => Rule::PlayProbable {
                threshold: EVEN_ODDS,
            },
            2 => Rule::HintPlayable,
            3 | 6 => Rule::DiscardUseless {
                threshold: HIGH_CONFIDENCE,
            },
            4 => Rule::DiscardUseless {
                threshold: EVEN_ODDS,
            },
            5 | 8 => Rule::PlayWhenAdvanced,
            7 => Rule::PlayScarceColor,
            9 => Rule::DiscardOnLastLife,
            10 => Rule::PlayKnownWhileSafe,
            11 => Rule::HintOnes,
            12 => Rule::HintNearlyComplete,
            13 => Rule::CompleteRankHint,
            14 => Rule::DiscardOldest,
            15 => Rule::PlayBestGuess,
            _ => return Err(DecisionError::UnrecognizedRule { code }),
        };
        Ok(rule)
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Rule::PlayProbable { .. } => "play_probable",
            Rule::HintPlayable => "hint_playable",
            Rule::DiscardUseless { .. } => "discard_useless",
            Rule::PlayWhenAdvanced => "play_when_advanced",
            Rule::PlayScarceColor => "play_scarce_color",
            Rule::DiscardOnLastLife => "discard_on_last_life",
            Rule::PlayKnownWhileSafe => "play_known_while_safe",
            Rule::HintOnes => "hint_ones",
            Rule::HintNearlyComplete => "hint_nearly_complete",
            Rule::CompleteRankHint => "complete_rank_hint",
            Rule::DiscardOldest => "discard_oldest",
            Rule::PlayBestGuess => "play_best_guess",
        }
    }

    /// The move this rule makes, or `None` when its guard does not hold.
    pub fn evaluate(&self, ctx: &DecisionContext<'_>) -> Option<Action> {
        match *self {
            Rule::PlayProbable { threshold } => play_above(ctx, threshold),
            Rule::HintPlayable => hint_playable(ctx),
            Rule::DiscardUseless { threshold } => {
                if !ctx.below_token_cap() {
                    return None;
                }
                discard_above(ctx, threshold)
            }
            Rule::PlayWhenAdvanced => {
                let advanced = ctx
                    .observation
                    .fireworks
                    .count_at_least(ADVANCED_HEIGHT);
                if advanced < ADVANCED_FIREWORKS {
                    return None;
                }
                play_above(ctx, HIGH_CONFIDENCE)
            }
            Rule::PlayScarceColor => play_scarce_color(ctx),
            Rule::DiscardOnLastLife => {
                let obs = ctx.observation;
                if obs.life_tokens != 1 || obs.information_tokens >= SCARCE_TOKENS {
                    return None;
                }
                discard_above(ctx, 0.0)
            }
            Rule::PlayKnownWhileSafe => {
                let obs = ctx.observation;
                if obs.life_tokens != 3 || obs.information_tokens >= SCARCE_TOKENS {
                    return None;
                }
                obs.own_hints()
                    .iter()
                    .position(|hint| {
                        hint.known_card()
                            .is_some_and(|card| card.is_playable(&obs.fireworks))
                    })
                    .map(|card_index| Action::Play { card_index })
            }
            Rule::HintOnes => hint_ones(ctx),
            Rule::HintNearlyComplete => hint_nearly_complete(ctx),
            Rule::CompleteRankHint => complete_rank_hint(ctx),
            Rule::DiscardOldest => {
                if !ctx.below_token_cap() || ctx.beliefs.is_empty() {
                    return None;
                }
                Some(Action::Discard { card_index: 0 })
            }
            Rule::PlayBestGuess => ctx
                .beliefs
                .best_playable()
                .map(|card_index| Action::Play { card_index }),
        }
    }
}

fn play_above(ctx: &DecisionContext<'_>, threshold: f64) -> Option<Action> {
    let slot = ctx.beliefs.best_playable()?;
    (ctx.beliefs.playable()[slot] > threshold).then_some(Action::Play { card_index: slot })
}

fn discard_above(ctx: &DecisionContext<'_>, threshold: f64) -> Option<Action> {
    let slot = ctx.beliefs.best_useless()?;
    (ctx.beliefs.useless()[slot] > threshold).then_some(Action::Discard { card_index: slot })
}

fn hint_playable(ctx: &DecisionContext<'_>) -> Option<Action> {
    if !ctx.has_hint_tokens() {
        return None;
    }
    let obs = ctx.observation;
    for target_offset in obs.partner_offsets() {
        for (card, hint) in obs.partner_slots(target_offset) {
            if !card.is_playable(&obs.fireworks) {
                continue;
            }
            if hint.color.is_none() {
                return Some(Action::RevealColor {
                    color: card.color,
                    target_offset,
                });
            }
            if hint.rank.is_none() {
                return Some(Action::RevealRank {
                    rank: card.rank,
                    target_offset,
                });
            }
        }
    }
    None
}

fn play_scarce_color(ctx: &DecisionContext<'_>) -> Option<Action> {
    let obs = ctx.observation;
    let remaining = color_cards_remaining(&obs.discard_pile, &obs.fireworks);
    for color in scarcest_colors(&remaining) {
        for (card_index, hint) in obs.own_hints().iter().enumerate() {
            let Some(card) = hint.known_card() else {
                continue;
            };
            if card.color == color
                && card.is_playable(&obs.fireworks)
                && ctx.beliefs.playable()[card_index] > HIGH_CONFIDENCE
            {
                return Some(Action::Play { card_index });
            }
        }
    }
    None
}

fn hint_ones(ctx: &DecisionContext<'_>) -> Option<Action> {
    let obs = ctx.observation;
    if !ctx.has_hint_tokens() || obs.fireworks.iter().all(|(_, height)| height > 0) {
        return None;
    }
    obs.partner_offsets().find_map(|target_offset| {
        obs.partner_slots(target_offset)
            .any(|(card, hint)| card.rank == HINTED_RANK && hint.rank.is_none())
            .then_some(Action::RevealRank {
                rank: HINTED_RANK,
                target_offset,
            })
    })
}

fn hint_nearly_complete(ctx: &DecisionContext<'_>) -> Option<Action> {
    if !ctx.has_hint_tokens() {
        return None;
    }
    let obs = ctx.observation;
    for (color, height) in obs.fireworks.iter() {
        if height <= ADVANCED_HEIGHT {
            continue;
        }
        for target_offset in obs.partner_offsets() {
            let unhinted = obs
                .partner_slots(target_offset)
                .any(|(card, hint)| card.color == color && hint.color.is_none());
            if unhinted {
                return Some(Action::RevealColor {
                    color,
                    target_offset,
                });
            }
        }
    }
    None
}

fn complete_rank_hint(ctx: &DecisionContext<'_>) -> Option<Action> {
    if !ctx.has_hint_tokens() {
        return None;
    }
    let obs = ctx.observation;
    obs.partner_offsets().find_map(|target_offset| {
        obs.partner_slots(target_offset)
            .find(|(card, hint)| {
                hint.rank.is_some() && hint.color.is_none() && card.is_playable(&obs.fireworks)
            })
            .map(|(card, _)| Action::RevealColor {
                color: card.color,
                target_offset,
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::{SlotBeliefs, unseen_from_observation};
    use hanabi_core::model::card::Card;
    use hanabi_core::model::color::Color;
    use hanabi_core::model::fireworks::Fireworks;
    use hanabi_core::model::hint::Hint;
    use hanabi_core::model::observation::Observation;

    fn card(color: Color, rank: u8) -> Card {
        Card::new(color, Rank::from_value(rank).unwrap())
    }

    fn observation(own: Vec<Hint>, partner: Vec<(Card, Hint)>) -> Observation {
        Observation {
            current_player_offset: 0,
            fireworks: Fireworks::new(),
            discard_pile: Vec::new(),
            observed_hands: vec![
                vec![None; own.len()],
                partner.iter().map(|(card, _)| Some(*card)).collect(),
            ],
            card_knowledge: vec![own, partner.iter().map(|(_, hint)| *hint).collect()],
            information_tokens: 8,
            life_tokens: 3,
            deck_size: 30,
            num_players: 2,
        }
    }

    /// Three-player table: the observer holds two unknown cards.
    fn three_player(plus_one: Vec<(Card, Hint)>, plus_two: Vec<(Card, Hint)>) -> Observation {
        let partners = [plus_one, plus_two];
        let mut observed_hands = vec![vec![None; 2]];
        let mut card_knowledge = vec![vec![Hint::unknown(); 2]];
        for hand in &partners {
            observed_hands.push(hand.iter().map(|(card, _)| Some(*card)).collect());
            card_knowledge.push(hand.iter().map(|(_, hint)| *hint).collect());
        }
        Observation {
            current_player_offset: 0,
            fireworks: Fireworks::new(),
            discard_pile: Vec::new(),
            observed_hands,
            card_knowledge,
            information_tokens: 8,
            life_tokens: 3,
            deck_size: 30,
            num_players: 3,
        }
    }

    fn evaluate(rule: Rule, obs: &Observation) -> Option<Action> {
        let pool = unseen_from_observation(obs);
        let beliefs = SlotBeliefs::compute(obs.own_hints(), &pool, &obs.fireworks).unwrap();
        let ctx = DecisionContext {
            observation: obs,
            pool: &pool,
            beliefs: &beliefs,
            information_token_cap: 8,
        };
        rule.evaluate(&ctx)
    }

    #[test]
    fn decodes_every_defined_code() {
        for code in 0..=15 {
            assert!(Rule::from_code(code).is_ok(), "code {code}");
        }
        assert_eq!(
            Rule::from_code(16),
            Err(DecisionError::UnrecognizedRule { code: 16 })
        );
        assert_eq!(Rule::from_code(3), Rule::from_code(6));
        assert_eq!(Rule::from_code(5), Rule::from_code(8));
        assert_ne!(Rule::from_code(0), Rule::from_code(1));
    }

    #[test]
    fn play_probable_respects_threshold() {
        // a rank-one hint on an empty table: 15 of 15 ones are playable
        let obs = observation(vec![Hint::unknown(), Hint::rank(Rank::One)], vec![]);
        assert_eq!(
            evaluate(Rule::from_code(0).unwrap(), &obs),
            Some(Action::Play { card_index: 1 })
        );

        // an unknown card is playable 30% of the time
        let obs = observation(vec![Hint::unknown()], vec![]);
        assert_eq!(evaluate(Rule::from_code(1).unwrap(), &obs), None);
    }

    #[test]
    fn hint_playable_reveals_missing_field() {
        let obs = observation(
            vec![Hint::unknown()],
            vec![
                (card(Color::Red, 2), Hint::unknown()),
                (card(Color::Green, 0), Hint::rank(Rank::One)),
            ],
        );
        assert_eq!(
            evaluate(Rule::HintPlayable, &obs),
            Some(Action::RevealColor {
                color: Color::Green,
                target_offset: 1
            })
        );

        let obs = observation(
            vec![Hint::unknown()],
            vec![(card(Color::Green, 0), Hint::color(Color::Green))],
        );
        assert_eq!(
            evaluate(Rule::HintPlayable, &obs),
            Some(Action::RevealRank {
                rank: Rank::One,
                target_offset: 1
            })
        );
    }

    #[test]
    fn hint_playable_skips_fully_known_cards_and_needs_tokens() {
        let green_one = card(Color::Green, 0);
        let mut obs = observation(vec![Hint::unknown()], vec![(green_one, Hint::exact(green_one))]);
        assert_eq!(evaluate(Rule::HintPlayable, &obs), None);

        obs.card_knowledge[1][0] = Hint::unknown();
        obs.information_tokens = 0;
        assert_eq!(evaluate(Rule::HintPlayable, &obs), None);
    }

    #[test]
    fn discard_useless_requires_room_under_cap() {
        let mut obs = observation(vec![Hint::unknown(), Hint::rank(Rank::One)], vec![]);
        obs.fireworks = Fireworks::with_heights([1, 1, 1, 1, 1]);
        obs.information_tokens = 8;
        assert_eq!(evaluate(Rule::from_code(3).unwrap(), &obs), None);

        obs.information_tokens = 7;
        assert_eq!(
            evaluate(Rule::from_code(3).unwrap(), &obs),
            Some(Action::Discard { card_index: 1 })
        );
    }

    #[test]
    fn play_when_advanced_needs_three_tall_fireworks() {
        let mut obs = observation(vec![Hint::exact(card(Color::Red, 3))], vec![]);
        obs.fireworks = Fireworks::with_heights([3, 3, 2, 0, 0]);
        assert_eq!(evaluate(Rule::PlayWhenAdvanced, &obs), None);

        obs.fireworks = Fireworks::with_heights([3, 3, 3, 0, 0]);
        assert_eq!(
            evaluate(Rule::PlayWhenAdvanced, &obs),
            Some(Action::Play { card_index: 0 })
        );
    }

    #[test]
    fn play_scarce_color_targets_fewest_remaining() {
        let mut obs = observation(
            vec![
                Hint::exact(card(Color::Red, 0)),
                Hint::exact(card(Color::White, 2)),
            ],
            vec![],
        );
        obs.fireworks = Fireworks::with_heights([0, 0, 0, 2, 0]);
        assert_eq!(
            evaluate(Rule::PlayScarceColor, &obs),
            Some(Action::Play { card_index: 1 })
        );

        // white is scarcest, but the known white card is not next
        obs.card_knowledge[0][1] = Hint::exact(card(Color::White, 3));
        assert_eq!(evaluate(Rule::PlayScarceColor, &obs), None);
    }

    #[test]
    fn discard_on_last_life_takes_any_dead_chance() {
        let mut obs = observation(vec![Hint::unknown(), Hint::color(Color::Red)], vec![]);
        obs.fireworks = Fireworks::with_heights([2, 0, 0, 0, 0]);
        obs.life_tokens = 1;
        obs.information_tokens = 2;
        assert_eq!(
            evaluate(Rule::DiscardOnLastLife, &obs),
            Some(Action::Discard { card_index: 1 })
        );

        obs.information_tokens = 3;
        assert_eq!(evaluate(Rule::DiscardOnLastLife, &obs), None);
    }

    #[test]
    fn play_known_while_safe_needs_full_lives_and_few_tokens() {
        let mut obs = observation(
            vec![Hint::rank(Rank::One), Hint::exact(card(Color::Blue, 0))],
            vec![],
        );
        obs.information_tokens = 2;
        assert_eq!(
            evaluate(Rule::PlayKnownWhileSafe, &obs),
            Some(Action::Play { card_index: 1 })
        );

        obs.life_tokens = 2;
        assert_eq!(evaluate(Rule::PlayKnownWhileSafe, &obs), None);
    }

    #[test]
    fn hint_ones_reveals_rank_one_to_unhinted_holder() {
        let obs = observation(
            vec![Hint::unknown()],
            vec![(card(Color::Yellow, 1), Hint::unknown())],
        );
        assert_eq!(
            evaluate(Rule::HintOnes, &obs),
            Some(Action::RevealRank {
                rank: Rank::Two,
                target_offset: 1
            })
        );

        let mut obs = obs;
        obs.fireworks = Fireworks::with_heights([1, 1, 1, 1, 1]);
        assert_eq!(evaluate(Rule::HintOnes, &obs), None);
    }

    #[test]
    fn hint_nearly_complete_points_at_color() {
        let mut obs = observation(
            vec![Hint::unknown()],
            vec![
                (card(Color::Blue, 4), Hint::color(Color::Blue)),
                (card(Color::Green, 4), Hint::rank(Rank::Five)),
            ],
        );
        obs.fireworks = Fireworks::with_heights([0, 0, 4, 0, 4]);
        assert_eq!(
            evaluate(Rule::HintNearlyComplete, &obs),
            Some(Action::RevealColor {
                color: Color::Green,
                target_offset: 1
            })
        );

        obs.fireworks = Fireworks::with_heights([0, 0, 3, 0, 4]);
        assert_eq!(evaluate(Rule::HintNearlyComplete, &obs), None);
    }

    #[test]
    fn complete_rank_hint_reveals_true_color() {
        let obs = observation(
            vec![Hint::unknown()],
            vec![
                (card(Color::Red, 1), Hint::rank(Rank::Two)),
                (card(Color::White, 0), Hint::rank(Rank::One)),
            ],
        );
        assert_eq!(
            evaluate(Rule::CompleteRankHint, &obs),
            Some(Action::RevealColor {
                color: Color::White,
                target_offset: 1
            })
        );
    }

    #[test]
    fn discard_oldest_and_best_guess() {
        let mut obs = observation(vec![Hint::unknown(), Hint::rank(Rank::One)], vec![]);
        obs.information_tokens = 7;
        assert_eq!(
            evaluate(Rule::DiscardOldest, &obs),
            Some(Action::Discard { card_index: 0 })
        );
        obs.information_tokens = 8;
        assert_eq!(evaluate(Rule::DiscardOldest, &obs), None);
        assert_eq!(
            evaluate(Rule::PlayBestGuess, &obs),
            Some(Action::Play { card_index: 1 })
        );
    }

    #[test]
    fn empty_hand_fires_nothing() {
        let obs = observation(vec![], vec![]);
        assert_eq!(evaluate(Rule::PlayBestGuess, &obs), None);
        let mut obs = obs;
        obs.information_tokens = 0;
        assert_eq!(evaluate(Rule::DiscardOldest, &obs), None);
    }

    #[test]
    fn hint_playable_moves_on_to_later_partner() {
        let obs = three_player(
            vec![
                (card(Color::Red, 2), Hint::unknown()),
                (card(Color::Blue, 0), Hint::exact(card(Color::Blue, 0))),
            ],
            vec![
                (card(Color::White, 3), Hint::unknown()),
                (card(Color::Yellow, 0), Hint::unknown()),
            ],
        );
        assert!(obs.validate().is_ok());
        assert_eq!(
            evaluate(Rule::HintPlayable, &obs),
            Some(Action::RevealColor {
                color: Color::Yellow,
                target_offset: 2
            })
        );
    }

    #[test]
    fn hint_ones_skips_holders_already_told_the_rank() {
        let obs = three_player(
            vec![(card(Color::Green, 1), Hint::rank(Rank::Two))],
            vec![
                (card(Color::Red, 3), Hint::unknown()),
                (card(Color::Blue, 1), Hint::unknown()),
            ],
        );
        assert_eq!(
            evaluate(Rule::HintOnes, &obs),
            Some(Action::RevealRank {
                rank: Rank::Two,
                target_offset: 2
            })
        );
    }

    #[test]
    fn hint_ones_declines_when_every_rank_one_is_hinted() {
        let obs = three_player(
            vec![(card(Color::Green, 1), Hint::rank(Rank::Two))],
            vec![
                (card(Color::Red, 3), Hint::unknown()),
                (card(Color::Blue, 1), Hint::new(Some(Color::Blue), Some(Rank::Two))),
            ],
        );
        assert_eq!(evaluate(Rule::HintOnes, &obs), None);
    }

    #[test]
    fn hint_nearly_complete_targets_second_partner() {
        let mut obs = three_player(
            vec![(card(Color::Blue, 4), Hint::color(Color::Blue))],
            vec![
                (card(Color::Green, 2), Hint::unknown()),
                (card(Color::Blue, 1), Hint::rank(Rank::Two)),
            ],
        );
        obs.fireworks = Fireworks::with_heights([0, 0, 0, 0, 4]);
        assert_eq!(
            evaluate(Rule::HintNearlyComplete, &obs),
            Some(Action::RevealColor {
                color: Color::Blue,
                target_offset: 2
            })
        );
    }

    #[test]
    fn complete_rank_hint_targets_second_partner() {
        let obs = three_player(
            vec![
                (card(Color::Red, 1), Hint::rank(Rank::Two)),
                (card(Color::Yellow, 0), Hint::exact(card(Color::Yellow, 0))),
            ],
            vec![
                (card(Color::Green, 3), Hint::unknown()),
                (card(Color::White, 0), Hint::rank(Rank::One)),
            ],
        );
        assert_eq!(
            evaluate(Rule::CompleteRankHint, &obs),
            Some(Action::RevealColor {
                color: Color::White,
                target_offset: 2
            })
        );
    }
}
