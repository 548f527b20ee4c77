use thiserror::Error;

use crate::SlotIndex;

/// Outcome of a rejected container operation.
///
/// None of these are fatal; a rejected operation leaves the container and
/// its observers untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    /// Slot count must be at least 1
    #[error("Invalid slot count {slot_count}, a container needs at least one slot")]
    InvalidSlotCount { slot_count: SlotIndex },

    #[error("Slot index {index} out of range for container with {slot_count} slots")]
    IndexOutOfRange { index: SlotIndex, slot_count: SlotIndex },

    /// Add without an index found no empty slot
    #[error("Container is full, all {slot_count} slots are occupied")]
    ContainerFull { slot_count: SlotIndex },

    #[error("Slot {index} is empty")]
    SlotEmpty { index: SlotIndex },

    /// The slot is occupied by a different element than the one named
    #[error("Slot {index} holds {found}, not {expected}")]
    ElementMismatch {
        index: SlotIndex,
        expected: String,
        found: String,
    },

    #[error("Element {element} already occupies slot {index}")]
    ElementAlreadyInSlot { element: String, index: SlotIndex },

    #[error("Slots {index_a} and {index_b} hold the same element")]
    SameElement { index_a: SlotIndex, index_b: SlotIndex },

    #[error("Element {element} is not held by this container")]
    ElementNotHeld { element: String },

    #[error("Cannot {operation} on a proxy container, only the authority may")]
    NotAuthority { operation: &'static str },

    #[error("Cannot {operation} on the authority container, only proxies receive replicated state")]
    NotProxy { operation: &'static str },

    #[error("Default elements have already been initialized")]
    DefaultsAlreadyInitialized,

    /// A replicated snapshot doesn't match its own slot count
    #[error("Replicated snapshot holds {actual} slots, expected {expected}")]
    SnapshotLengthMismatch { expected: SlotIndex, actual: usize },
}
