use hanabi_core::model::card::Card;
use hanabi_core::model::color::Color;
use hanabi_core::model::counts::CardCounts;
use hanabi_core::model::fireworks::Fireworks;
use hanabi_core::model::observation::Observation;
use hanabi_core::model::rank::Rank;

/// Cards the observer has never seen: whatever is in their own hand or still
/// in the draw pile.
///
/// Starts from the full deck and removes one copy per discarded card, per
/// card visible in a partner's hand, and per rank below each firework's
/// height. A card that is already gone is skipped rather than reported; a
/// malformed observation can therefore under-subtract.
pub fn compute_unseen_pool<I>(
    discard_pile: &[Card],
    partner_cards: I,
    fireworks: &Fireworks,
) -> CardCounts
where
    I: IntoIterator<Item = Card>,
{
    let mut pool = CardCounts::full_deck();
    for &card in discard_pile {
        pool.remove_one(card);
    }
    for card in partner_cards {
        pool.remove_one(card);
    }
    for (color, height) in fireworks.iter() {
        for rank in Rank::ORDERED.into_iter().take(usize::from(height)) {
            pool.remove_one(Card::new(color, rank));
        }
    }
    pool
}

pub fn unseen_from_observation(observation: &Observation) -> CardCounts {
    compute_unseen_pool(
        &observation.discard_pile,
        observation.partner_cards(),
        &observation.fireworks,
    )
}

/// Copies of each color neither discarded nor played, indexed by
/// [`Color::index`].
pub fn color_cards_remaining(
    discard_pile: &[Card],
    fireworks: &Fireworks,
) -> [usize; Color::COUNT] {
    let full = CardCounts::full_deck();
    let mut remaining = Color::ALL.map(|color| full.by_color(color));
    for card in discard_pile {
        let left = &mut remaining[card.color.index()];
        *left = left.saturating_sub(1);
    }
    for (color, height) in fireworks.iter() {
        let left = &mut remaining[color.index()];
        *left = left.saturating_sub(usize::from(height));
    }
    remaining
}

/// Colors tied for the fewest remaining copies, in [`Color::ALL`] order.
pub fn scarcest_colors(remaining: &[usize; Color::COUNT]) -> Vec<Color> {
    let Some(&fewest) = remaining.iter().min() else {
        return Vec::new();
    };
    Color::ALL
        .into_iter()
        .filter(|color| remaining[color.index()] == fewest)
        .collect()
}
