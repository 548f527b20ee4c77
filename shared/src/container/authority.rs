use std::collections::HashSet;

use log::{debug, info, warn};

use crate::{
    container::{container_state::ContainerState, error::SlotError, replication::DirtyFlags},
    messages::container_request::ContainerRequest,
    ElementKey, ElementKind, ElementWorldMut, SlotIndex,
};

/// Authority-only bookkeeping for a container: what must be replicated
/// next, and which default elements the container still owns.
pub struct SlotAuthority<E: ElementKey> {
    dirty: DirtyFlags,
    default_elements: Vec<ElementKind>,
    defaults_initialized: bool,
    owned_defaults: HashSet<E>,
}

impl<E: ElementKey> SlotAuthority<E> {
    pub(crate) fn new(default_elements: Vec<ElementKind>) -> Self {
        Self {
            dirty: DirtyFlags::default(),
            default_elements,
            defaults_initialized: false,
            owned_defaults: HashSet::new(),
        }
    }

    pub fn dirty(&self) -> &DirtyFlags {
        &self.dirty
    }

    pub(crate) fn take_dirty(&mut self) -> DirtyFlags {
        std::mem::take(&mut self.dirty)
    }

    pub fn owns_element(&self, element: &E) -> bool {
        self.owned_defaults.contains(element)
    }

    pub(crate) fn take_owned_defaults(&mut self) -> HashSet<E> {
        std::mem::take(&mut self.owned_defaults)
    }
}

/// Validates and applies mutations. Only reachable on the authority node.
///
/// Every successful operation marks the replicated state dirty and runs a
/// diff pass against the pre-mutation snapshot before returning. A rejected
/// operation leaves slots, dirty flags and observers untouched.
pub struct AuthorityMut<'c, E: ElementKey> {
    authority: &'c mut SlotAuthority<E>,
    state: &'c mut ContainerState<E>,
}

impl<'c, E: ElementKey> AuthorityMut<'c, E> {
    pub(crate) fn new(
        authority: &'c mut SlotAuthority<E>,
        state: &'c mut ContainerState<E>,
    ) -> Self {
        Self { authority, state }
    }

    pub fn apply<W: ElementWorldMut<E>>(
        &mut self,
        world: &mut W,
        request: ContainerRequest<E>,
    ) -> Result<(), SlotError> {
        match request {
            ContainerRequest::AddElement { element, index } => {
                self.add_element(world, element, index).map(|_| ())
            }
            ContainerRequest::RemoveElement { element, index } => {
                self.remove_element(world, &element, index)
            }
            ContainerRequest::RemoveElementByIndex { index } => {
                self.remove_element_by_index(world, index).map(|_| ())
            }
            ContainerRequest::SwapElement { index_a, index_b } => {
                self.swap_element(world, index_a, index_b)
            }
            ContainerRequest::SetSlotCount { slot_count } => {
                self.set_slot_count(world, slot_count)
            }
        }
    }

    /// Inserts `element` at `index`, or at the first empty slot when `index`
    /// is `None`. An occupied target slot is vacated first, through
    /// [`Self::remove_element`], as a separate diff pass. Returns the slot
    /// the element landed in.
    pub fn add_element<W: ElementWorldMut<E>>(
        &mut self,
        world: &mut W,
        element: E,
        index: Option<SlotIndex>,
    ) -> Result<SlotIndex, SlotError> {
        let slots = &self.state.slots;
        let index = match index {
            Some(index) => {
                slots.check_index(index)?;
                index
            }
            None => slots
                .first_available_index()
                .ok_or(SlotError::ContainerFull {
                    slot_count: slots.slot_count(),
                })?,
        };

        if let Some(occupant) = slots.get(index) {
            if occupant == element {
                return Err(SlotError::ElementAlreadyInSlot {
                    element: format!("{:?}", element),
                    index,
                });
            }
            self.remove_element(world, &occupant, index)?;
        }

        self.write_slot(world, index, Some(element));
        Ok(index)
    }

    /// Clears `index` only if it currently holds exactly `element`
    pub fn remove_element<W: ElementWorldMut<E>>(
        &mut self,
        world: &mut W,
        element: &E,
        index: SlotIndex,
    ) -> Result<(), SlotError> {
        let slots = &self.state.slots;
        slots.check_index(index)?;

        let Some(occupant) = slots.get(index) else {
            return Err(SlotError::SlotEmpty { index });
        };
        if occupant != *element {
            return Err(SlotError::ElementMismatch {
                index,
                expected: format!("{:?}", element),
                found: format!("{:?}", occupant),
            });
        }

        self.write_slot(world, index, None);
        Ok(())
    }

    /// Clears `index` whatever it holds, returning the removed element
    pub fn remove_element_by_index<W: ElementWorldMut<E>>(
        &mut self,
        world: &mut W,
        index: SlotIndex,
    ) -> Result<E, SlotError> {
        let slots = &self.state.slots;
        slots.check_index(index)?;

        let Some(occupant) = slots.get(index) else {
            return Err(SlotError::SlotEmpty { index });
        };

        self.write_slot(world, index, None);
        Ok(occupant)
    }

    /// Exchanges the occupants of two occupied slots in one step. Both
    /// elements stay members, so no element hooks fire.
    pub fn swap_element<W: ElementWorldMut<E>>(
        &mut self,
        world: &mut W,
        index_a: SlotIndex,
        index_b: SlotIndex,
    ) -> Result<(), SlotError> {
        let slots = &self.state.slots;
        slots.check_index(index_a)?;
        slots.check_index(index_b)?;

        let Some(element_a) = slots.get(index_a) else {
            return Err(SlotError::SlotEmpty { index: index_a });
        };
        let Some(element_b) = slots.get(index_b) else {
            return Err(SlotError::SlotEmpty { index: index_b });
        };
        if element_a == element_b {
            return Err(SlotError::SameElement { index_a, index_b });
        }

        let previous = self.state.slots.snapshot();
        self.state.slots.swap(index_a, index_b);
        self.authority.dirty.slots = true;
        self.state.run_diff(world, previous);
        Ok(())
    }

    /// Changes the number of slots. Shrinking first clears every occupied
    /// slot at or past the new count, lowest index first, each as its own
    /// diff pass. Growing appends empty slots and clears nothing.
    pub fn set_slot_count<W: ElementWorldMut<E>>(
        &mut self,
        world: &mut W,
        slot_count: SlotIndex,
    ) -> Result<(), SlotError> {
        if slot_count < 1 {
            return Err(SlotError::InvalidSlotCount { slot_count });
        }
        let current_count = self.state.slots.slot_count();
        if slot_count == current_count {
            return Ok(());
        }

        for index in slot_count..current_count {
            if self.state.slots.get(index).is_some() {
                self.remove_element_by_index(world, index)?;
            }
        }

        let previous = self.state.slots.snapshot();
        self.state.slots.resize(slot_count)?;
        self.authority.dirty.slot_count = true;
        self.state.run_diff(world, previous);

        info!(
            "Container {:?}: slot count changed from {} to {}",
            self.state.key, current_count, slot_count
        );
        Ok(())
    }

    /// Instantiates each configured default kind into the first empty slot.
    /// An entity that can't be added is despawned straight away. Returns how
    /// many defaults were added.
    pub fn init_default_elements<W: ElementWorldMut<E>>(
        &mut self,
        world: &mut W,
    ) -> Result<usize, SlotError> {
        if self.authority.defaults_initialized {
            return Err(SlotError::DefaultsAlreadyInitialized);
        }
        self.authority.defaults_initialized = true;

        let kinds = self.authority.default_elements.clone();
        let mut added = 0;
        for kind in kinds.iter() {
            let Some(element) = world.spawn_element(kind) else {
                warn!(
                    "Container {:?}: world could not spawn default element of {:?}",
                    self.state.key, kind
                );
                continue;
            };

            match self.add_element(world, element, None) {
                Ok(index) => {
                    debug!(
                        "Container {:?}: default element {:?} of {:?} added at slot {}",
                        self.state.key, element, kind, index
                    );
                    self.authority.owned_defaults.insert(element);
                    added += 1;
                }
                Err(error) => {
                    warn!(
                        "Container {:?}: despawning default element {:?}, {}",
                        self.state.key, element, error
                    );
                    world.despawn_element(&element);
                }
            }
        }

        Ok(added)
    }

    fn write_slot<W: ElementWorldMut<E>>(
        &mut self,
        world: &mut W,
        index: SlotIndex,
        element: Option<E>,
    ) {
        let previous = self.state.slots.snapshot();
        let replaced = self.state.slots.set(index, element);
        self.authority.dirty.slots = true;

        // a default leaving the container becomes the world's to manage
        if let Some(replaced) = replaced {
            if !self.state.slots.contains(&replaced) {
                self.authority.owned_defaults.remove(&replaced);
            }
        }

        self.state.run_diff(world, previous);
    }
}
