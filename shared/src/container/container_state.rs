use crate::{
    container::{
        container_ref::ContainerRef,
        error::SlotError,
        notifier::UpdateNotifier,
        replication::ContainerUpdate,
        slot_array::{SlotArray, SlotSnapshot},
        slot_diff::SlotDiff,
    },
    ContainerKey, ElementKey, ElementWorldMut,
};

/// Slots plus observers: the part of a container common to both roles
pub(crate) struct ContainerState<E: ElementKey> {
    pub(crate) key: ContainerKey,
    pub(crate) slots: SlotArray<E>,
    pub(crate) notifier: UpdateNotifier,
}

impl<E: ElementKey> ContainerState<E> {
    pub(crate) fn new(key: ContainerKey, slots: SlotArray<E>) -> Self {
        Self {
            key,
            slots,
            notifier: UpdateNotifier::new(),
        }
    }

    pub(crate) fn container_ref(&self) -> ContainerRef<'_, E> {
        ContainerRef::new(self.key, &self.slots)
    }

    /// Diff pass: compares the current slots against `previous`, fires
    /// removal hooks, then addition hooks, then notifies observers once.
    /// Returns whether anything changed.
    pub(crate) fn run_diff<W: ElementWorldMut<E>>(
        &mut self,
        world: &mut W,
        previous: SlotSnapshot<E>,
    ) -> bool {
        let diff = SlotDiff::between(previous.as_slice(), self.slots.as_slice());
        if !diff.is_changed() {
            return false;
        }

        for element in diff.removed() {
            if let Some(hooks) = world.container_element(element) {
                hooks.on_removed_from_container(ContainerRef::new(self.key, &self.slots));
            }
        }
        for element in diff.added() {
            if let Some(hooks) = world.container_element(element) {
                hooks.on_added_to_container(ContainerRef::new(self.key, &self.slots));
            }
        }

        self.notifier.notify(&self.key);
        true
    }

    /// Overwrites the local copy with replicated state. The update is applied
    /// whole or not at all.
    pub(crate) fn apply_update<W: ElementWorldMut<E>>(
        &mut self,
        world: &mut W,
        update: ContainerUpdate<E>,
    ) -> Result<bool, SlotError> {
        let previous = self.slots.snapshot();

        let mut next = self.slots.clone();
        if let Some(slot_count) = update.slot_count {
            next.resize(slot_count)?;
        }
        if let Some(slots) = update.slots {
            next.replace(slots)?;
        }
        self.slots = next;

        Ok(self.run_diff(world, previous))
    }
}
