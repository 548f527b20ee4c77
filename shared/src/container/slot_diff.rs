use std::collections::HashSet;

use crate::ElementKey;

/// Membership changes between two successive states of a slot array.
///
/// Each element appears at most once in `added` or `removed`, no matter how
/// many slots it occupies. An element present in both states is in neither
/// list even if it moved to another index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotDiff<E: ElementKey> {
    removed: Vec<E>,
    added: Vec<E>,
    changed: bool,
}

impl<E: ElementKey> SlotDiff<E> {
    pub fn between(previous: &[Option<E>], current: &[Option<E>]) -> Self {
        let changed = previous != current;
        if !changed {
            return Self {
                removed: Vec::new(),
                added: Vec::new(),
                changed,
            };
        }

        let previous_set: HashSet<E> = previous.iter().flatten().copied().collect();
        let current_set: HashSet<E> = current.iter().flatten().copied().collect();

        let removed = distinct_missing(previous, &current_set);
        let added = distinct_missing(current, &previous_set);

        Self {
            removed,
            added,
            changed,
        }
    }

    /// Elements gone from the new state, ascending by their previous index
    pub fn removed(&self) -> &[E] {
        &self.removed
    }

    /// Elements new to the current state, ascending by their current index
    pub fn added(&self) -> &[E] {
        &self.added
    }

    /// Whether any slot, or the slot count, differs
    pub fn is_changed(&self) -> bool {
        self.changed
    }
}

fn distinct_missing<E: ElementKey>(slots: &[Option<E>], other: &HashSet<E>) -> Vec<E> {
    let mut seen = HashSet::new();
    slots
        .iter()
        .flatten()
        .filter(|element| !other.contains(*element) && seen.insert(**element))
        .copied()
        .collect()
}
