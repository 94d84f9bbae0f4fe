//! Bounded, newest-first ledger of completed rounds.

use std::collections::VecDeque;

use crate::Round;

/// Number of rounds the ledger keeps.
pub const HISTORY_CAPACITY: usize = 10;

/// Most-recent-first sequence of rounds, never longer than [`HISTORY_CAPACITY`].
///
/// Appending at capacity evicts the oldest round. There is no other way to
/// remove an entry, and insertion order is the only order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    rounds: VecDeque<Round>,
}

impl History {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rounds: VecDeque::with_capacity(HISTORY_CAPACITY + 1),
        }
    }

    pub fn append(&mut self, round: Round) {
        self.rounds.push_front(round);
        self.rounds.truncate(HISTORY_CAPACITY);
    }

    /// Newest-first view of the ledger.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Round> {
        self.rounds.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Round> + DoubleEndedIterator {
        self.rounds.iter()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&Round> {
        self.rounds.front()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a Round;
    type IntoIter = std::collections::vec_deque::Iter<'a, Round>;

    fn into_iter(self) -> Self::IntoIter {
        self.rounds.iter()
    }
}
