use crate::error::DecisionError;
use hanabi_core::model::counts::CardCounts;
use hanabi_core::model::fireworks::Fireworks;
use hanabi_core::model::hint::Hint;

/// Cards in `pool` consistent with the revealed fields of `hint`.
pub fn filter_by_hint(pool: &CardCounts, hint: &Hint) -> CardCounts {
    pool.filter(|card| hint.matches(card))
}

/// Cards that fit exactly on their color's firework.
pub fn filter_by_playability(cards: &CardCounts, fireworks: &Fireworks) -> CardCounts {
    cards.filter(|card| card.is_playable(fireworks))
}

/// Cards whose rank has already been played over.
pub fn filter_by_unplayability(cards: &CardCounts, fireworks: &Fireworks) -> CardCounts {
    cards.filter(|card| card.is_useless(fireworks))
}

/// Index of the first maximum.
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, &value) in values.iter().enumerate() {
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((index, value)),
        }
    }
    best.map(|(index, _)| index)
}

/// What each of the observer's own slots may hold, and how likely it is to
/// be playable now or dead for good.
///
/// Probabilities are plain frequencies over the slot's possible cards; they
/// ignore correlations between slots.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotBeliefs {
    possible: Vec<CardCounts>,
    playable: Vec<f64>,
    useless: Vec<f64>,
}

impl SlotBeliefs {
    pub fn compute(
        own_hints: &[Hint],
        pool: &CardCounts,
        fireworks: &Fireworks,
    ) -> Result<Self, DecisionError> {
        let mut possible = Vec::with_capacity(own_hints.len());
        let mut playable = Vec::with_capacity(own_hints.len());
        let mut useless = Vec::with_capacity(own_hints.len());

        for (slot, hint) in own_hints.iter().enumerate() {
            let candidates = filter_by_hint(pool, hint);
            let total = candidates.len();
            if total == 0 {
                return Err(DecisionError::InconsistentObservation { slot });
            }
            let total = total as f64;
            playable.push(filter_by_playability(&candidates, fireworks).len() as f64 / total);
            useless.push(filter_by_unplayability(&candidates, fireworks).len() as f64 / total);
            possible.push(candidates);
        }

        Ok(Self {
            possible,
            playable,
            useless,
        })
    }

    pub fn len(&self) -> usize {
        self.possible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.possible.is_empty()
    }

    pub fn possible(&self, slot: usize) -> Option<&CardCounts> {
        self.possible.get(slot)
    }

    pub fn playable(&self) -> &[f64] {
        &self.playable
    }

    pub fn useless(&self) -> &[f64] {
        &self.useless
    }

    pub fn max_playable(&self) -> Option<f64> {
        self.best_playable().map(|slot| self.playable[slot])
    }

    pub fn max_useless(&self) -> Option<f64> {
        self.best_useless().map(|slot| self.useless[slot])
    }

    pub fn best_playable(&self) -> Option<usize> {
        argmax(&self.playable)
    }

    pub fn best_useless(&self) -> Option<usize> {
        argmax(&self.useless)
    }
}

pub fn compute_slot_probabilities(
    own_hints: &[Hint],
    pool: &CardCounts,
    fireworks: &Fireworks,
) -> Result<SlotBeliefs, DecisionError> {
    SlotBeliefs::compute(own_hints, pool, fireworks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::compute_unseen_pool;
    use hanabi_core::model::card::Card;
    use hanabi_core::model::color::Color;
    use hanabi_core::model::rank::Rank;

    #[test]
    fn argmax_prefers_lowest_index_on_ties() {
        assert_eq!(argmax(&[0.2, 0.7, 0.7, 0.1]), Some(1));
        assert_eq!(argmax(&[0.0, 0.0]), Some(0));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn hint_filter_is_idempotent() {
        let pool = CardCounts::full_deck();
        let hint = Hint::new(Some(Color::Yellow), None);
        let once = filter_by_hint(&pool, &hint);
        assert_eq!(once.len(), 10);
        assert_eq!(filter_by_hint(&once, &hint), once);
    }

    #[test]
    fn playable_and_useless_are_disjoint() {
        let pool = CardCounts::full_deck();
        let fireworks = Fireworks::with_heights([0, 1, 2, 3, 5]);
        let playable = filter_by_playability(&pool, &fireworks);
        let useless = filter_by_unplayability(&pool, &fireworks);
        for card in playable.iter() {
            assert_eq!(useless.count(card), 0, "{card} classified both ways");
        }
        // one rank playable for every unfinished color
        assert_eq!(playable.distinct().count(), 4);
        // blue is complete, so every blue card is dead
        assert_eq!(useless.by_color(Color::Blue), 10);
    }

    #[test]
    fn fully_known_playable_slot_is_certain() {
        let pool = compute_unseen_pool(&[], std::iter::empty(), &Fireworks::new());
        let hints = [
            Hint::exact(Card::new(Color::Red, Rank::One)),
            Hint::unknown(),
        ];
        let beliefs = compute_slot_probabilities(&hints, &pool, &Fireworks::new()).unwrap();
        assert_eq!(beliefs.len(), 2);
        assert_eq!(beliefs.playable()[0], 1.0);
        assert_eq!(beliefs.useless()[0], 0.0);
        // fifteen ones in fifty cards
        assert!((beliefs.playable()[1] - 0.3).abs() < 1e-12);
        assert_eq!(beliefs.best_playable(), Some(0));
        assert_eq!(beliefs.max_useless(), Some(0.0));
    }

    #[test]
    fn rank_hint_mixes_live_and_dead_cards() {
        let fireworks = Fireworks::with_heights([1, 1, 0, 0, 0]);
        let pool = compute_unseen_pool(&[], std::iter::empty(), &fireworks);
        let hints = [Hint::rank(Rank::One)];
        let beliefs = compute_slot_probabilities(&hints, &pool, &fireworks).unwrap();
        // two red and two yellow ones left (dead), three each of G/W/B (live)
        assert_eq!(beliefs.possible(0).map(CardCounts::len), Some(13));
        assert!((beliefs.useless()[0] - 4.0 / 13.0).abs() < 1e-12);
        assert!((beliefs.playable()[0] - 9.0 / 13.0).abs() < 1e-12);
    }

    #[test]
    fn empty_candidate_set_is_reported() {
        let five = Card::new(Color::Blue, Rank::Five);
        let pool = compute_unseen_pool(&[five], std::iter::empty(), &Fireworks::new());
        let hints = [Hint::unknown(), Hint::exact(five)];
        let err = compute_slot_probabilities(&hints, &pool, &Fireworks::new()).unwrap_err();
        assert_eq!(err, DecisionError::InconsistentObservation { slot: 1 });
    }

    #[test]
    fn empty_hand_has_no_best_slot() {
        let beliefs =
            compute_slot_probabilities(&[], &CardCounts::full_deck(), &Fireworks::new()).unwrap();
        assert!(beliefs.is_empty());
        assert_eq!(beliefs.best_playable(), None);
        assert_eq!(beliefs.max_playable(), None);
    }
}
