use crate::{container::slot_array::SlotArray, ContainerKey, ElementKey, SlotIndex};

/// Read-only view of a container, handed to element hooks
#[derive(Clone, Copy)]
pub struct ContainerRef<'c, E: ElementKey> {
    key: ContainerKey,
    slots: &'c SlotArray<E>,
}

impl<'c, E: ElementKey> ContainerRef<'c, E> {
    pub(crate) fn new(key: ContainerKey, slots: &'c SlotArray<E>) -> Self {
        Self { key, slots }
    }

    pub fn key(&self) -> ContainerKey {
        self.key
    }

    pub fn slot_count(&self) -> SlotIndex {
        self.slots.slot_count()
    }

    pub fn element(&self, index: SlotIndex) -> Option<E> {
        self.slots.get(index)
    }

    pub fn elements(&self) -> Vec<Option<E>> {
        self.slots.as_slice().to_vec()
    }

    pub fn has_element(&self, element: &E) -> bool {
        self.slots.contains(element)
    }

    pub fn element_index(&self, element: &E) -> Option<SlotIndex> {
        self.slots.index_of(element)
    }
}
