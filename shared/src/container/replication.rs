use naia_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::{
    container::slot_array::SlotArray,
    element::element_key::{de_slots, ser_slots},
    packet_writer::measure,
    types::{de_optional_slot_index, ser_optional_slot_index},
    ElementKey, SlotIndex,
};

/// Replicated properties of a container, marked dirty by the authority and
/// cleared once sent. The slot count is tracked apart from slot contents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DirtyFlags {
    pub slots: bool,
    pub slot_count: bool,
}

impl DirtyFlags {
    pub fn is_clear(&self) -> bool {
        !self.slots && !self.slot_count
    }
}

/// State change sent from the authority to proxies. Absent parts are
/// unchanged since the previous update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerUpdate<E: ElementKey> {
    pub slot_count: Option<SlotIndex>,
    pub slots: Option<Vec<Option<E>>>,
}

impl<E: ElementKey> ContainerUpdate<E> {
    pub fn full(slots: &SlotArray<E>) -> Self {
        Self {
            slot_count: Some(slots.slot_count()),
            slots: Some(slots.as_slice().to_vec()),
        }
    }

    pub(crate) fn from_dirty(dirty: &DirtyFlags, slots: &SlotArray<E>) -> Self {
        Self {
            slot_count: dirty.slot_count.then(|| slots.slot_count()),
            slots: dirty.slots.then(|| slots.as_slice().to_vec()),
        }
    }
}

impl<E: ElementKey> Serde for ContainerUpdate<E> {
    fn ser(&self, writer: &mut dyn BitWrite) {
        ser_optional_slot_index(self.slot_count, writer);
        self.slots.is_some().ser(writer);
        if let Some(slots) = &self.slots {
            ser_slots(slots, writer);
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let slot_count = de_optional_slot_index(reader)?;
        let slots = if bool::de(reader)? {
            Some(de_slots(reader)?)
        } else {
            None
        };
        Ok(Self { slot_count, slots })
    }

    fn bit_length(&self) -> u32 {
        measure(|writer| self.ser(writer))
    }
}
