use crate::{container::error::SlotError, ElementKind, SlotIndex};

pub const DEFAULT_SLOT_COUNT: SlotIndex = 8;

/// Contains Config properties which will be used to create a Container
#[derive(Clone, Debug)]
pub struct ContainerConfig {
    /// Number of slots the container starts with. Must be at least 1.
    pub slot_count: SlotIndex,
    /// Kinds of entity the authority instantiates into the container once,
    /// when default elements are initialized, each into the first empty slot.
    pub default_elements: Vec<ElementKind>,
}

impl ContainerConfig {
    pub fn new(slot_count: SlotIndex) -> Self {
        Self {
            slot_count,
            default_elements: Vec::new(),
        }
    }

    pub fn with_default_element(mut self, kind: ElementKind) -> Self {
        self.default_elements.push(kind);
        self
    }

    pub fn validate(&self) -> Result<(), SlotError> {
        if self.slot_count < 1 {
            return Err(SlotError::InvalidSlotCount {
                slot_count: self.slot_count,
            });
        }
        Ok(())
    }
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SLOT_COUNT)
    }
}
