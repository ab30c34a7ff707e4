use crate::model::card::Card;
use crate::model::color::Color;
use crate::model::rank::Rank;

/// Multiset of cards indexed by color and rank.
///
/// Iteration order is deterministic: colors in [`Color::ALL`] order, ranks
/// ascending, each instance yielded once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CardCounts {
    counts: [[u8; Rank::COUNT]; Color::COUNT],
}

impl CardCounts {
    pub const fn empty() -> Self {
        Self {
            counts: [[0; Rank::COUNT]; Color::COUNT],
        }
    }

    /// The 50-card deck composition.
    pub fn full_deck() -> Self {
        let mut counts = Self::empty();
        for color in Color::ALL {
            for rank in Rank::ORDERED {
                counts.counts[color.index()][rank.index()] = rank.copies();
            }
        }
        counts
    }

    pub fn count(&self, card: Card) -> u8 {
        self.counts[card.color.index()][card.rank.index()]
    }

    pub fn add(&mut self, card: Card) {
        let slot = &mut self.counts[card.color.index()][card.rank.index()];
        *slot = slot.saturating_add(1);
    }

    /// Removes one instance; returns `false` when none was present.
    pub fn remove_one(&mut self, card: Card) -> bool {
        let slot = &mut self.counts[card.color.index()][card.rank.index()];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    pub fn len(&self) -> usize {
        self.counts
            .iter()
            .flat_map(|row| row.iter())
            .map(|&count| usize::from(count))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Instances of `color`, across all ranks.
    pub fn by_color(&self, color: Color) -> usize {
        self.counts[color.index()]
            .iter()
            .map(|&count| usize::from(count))
            .sum()
    }

    /// Keeps every instance of the card identities accepted by `keep`.
    pub fn filter<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(Card) -> bool,
    {
        let mut filtered = *self;
        for color in Color::ALL {
            for rank in Rank::ORDERED {
                if !keep(Card::new(color, rank)) {
                    filtered.counts[color.index()][rank.index()] = 0;
                }
            }
        }
        filtered
    }

    /// Distinct card identities with their multiplicity.
    pub fn distinct(&self) -> impl Iterator<Item = (Card, u8)> + '_ {
        Color::ALL.into_iter().flat_map(move |color| {
            Rank::ORDERED.into_iter().filter_map(move |rank| {
                let count = self.counts[color.index()][rank.index()];
                (count > 0).then_some((Card::new(color, rank), count))
            })
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Card> + '_ {
        self.distinct()
            .flat_map(|(card, count)| std::iter::repeat_n(card, usize::from(count)))
    }
}

impl FromIterator<Card> for CardCounts {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        let mut counts = CardCounts::empty();
        for card in iter {
            counts.add(card);
        }
        counts
    }
}
