use crate::{container::error::SlotError, ElementKey, SlotIndex};

/// Fixed-length ordered sequence of optional element keys.
///
/// The length always equals the slot count; removing an element leaves its
/// slot empty rather than shifting later slots down.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotArray<E: ElementKey> {
    slots: Vec<Option<E>>,
}

impl<E: ElementKey> SlotArray<E> {
    pub fn new(slot_count: SlotIndex) -> Result<Self, SlotError> {
        if slot_count < 1 {
            return Err(SlotError::InvalidSlotCount { slot_count });
        }
        Ok(Self {
            slots: vec![None; usize::from(slot_count)],
        })
    }

    pub fn slot_count(&self) -> SlotIndex {
        // length is bounded by SlotIndex on every path that sets it
        self.slots.len() as SlotIndex
    }

    pub fn is_valid_index(&self, index: SlotIndex) -> bool {
        usize::from(index) < self.slots.len()
    }

    pub fn check_index(&self, index: SlotIndex) -> Result<(), SlotError> {
        if self.is_valid_index(index) {
            Ok(())
        } else {
            Err(SlotError::IndexOutOfRange {
                index,
                slot_count: self.slot_count(),
            })
        }
    }

    pub fn get(&self, index: SlotIndex) -> Option<E> {
        self.slots.get(usize::from(index)).copied().flatten()
    }

    pub fn as_slice(&self) -> &[Option<E>] {
        &self.slots
    }

    pub fn contains(&self, element: &E) -> bool {
        self.index_of(element).is_some()
    }

    /// Lowest index holding `element`
    pub fn index_of(&self, element: &E) -> Option<SlotIndex> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref() == Some(element))
            .map(|index| index as SlotIndex)
    }

    /// Lowest empty index, by linear scan
    pub fn first_available_index(&self) -> Option<SlotIndex> {
        self.slots
            .iter()
            .position(Option::is_none)
            .map(|index| index as SlotIndex)
    }

    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn snapshot(&self) -> SlotSnapshot<E> {
        SlotSnapshot {
            slots: self.slots.clone(),
        }
    }

    pub(crate) fn set(&mut self, index: SlotIndex, element: Option<E>) -> Option<E> {
        std::mem::replace(&mut self.slots[usize::from(index)], element)
    }

    pub(crate) fn swap(&mut self, index_a: SlotIndex, index_b: SlotIndex) {
        self.slots.swap(usize::from(index_a), usize::from(index_b));
    }

    /// Truncates or pads with empty slots. Callers clear any occupied slots
    /// past the new end beforehand.
    pub(crate) fn resize(&mut self, slot_count: SlotIndex) -> Result<(), SlotError> {
        if slot_count < 1 {
            return Err(SlotError::InvalidSlotCount { slot_count });
        }
        self.slots.resize(usize::from(slot_count), None);
        Ok(())
    }

    /// Wholesale replacement with a replicated copy
    pub(crate) fn replace(&mut self, slots: Vec<Option<E>>) -> Result<(), SlotError> {
        if slots.len() != self.slots.len() {
            return Err(SlotError::SnapshotLengthMismatch {
                expected: self.slot_count(),
                actual: slots.len(),
            });
        }
        self.slots = slots;
        Ok(())
    }
}

/// Copy of a slot array taken right before a change, kept only until the
/// following diff pass has run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotSnapshot<E: ElementKey> {
    slots: Vec<Option<E>>,
}

impl<E: ElementKey> SlotSnapshot<E> {
    pub fn as_slice(&self) -> &[Option<E>] {
        &self.slots
    }
}
