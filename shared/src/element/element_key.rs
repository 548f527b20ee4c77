use std::{fmt::Debug, hash::Hash};

use naia_serde::{BitReader, BitWrite, Serde, SerdeErr, UnsignedVariableInteger};

use crate::{
    types::{de_slot_index, ser_slot_index},
    SlotIndex,
};

/// Opaque handle to an entity living outside the container.
///
/// Two handles refer to the same entity if and only if they compare equal.
/// The `u64` form is what travels on the wire, so every node must resolve
/// the same value to the same entity.
pub trait ElementKey: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    fn to_u64(&self) -> u64;
    fn from_u64(value: u64) -> Self;
}

type ElementInteger = UnsignedVariableInteger<7>;

pub(crate) fn ser_element<E: ElementKey>(element: &E, writer: &mut dyn BitWrite) {
    ElementInteger::new(element.to_u64()).ser(writer);
}

pub(crate) fn de_element<E: ElementKey>(reader: &mut BitReader) -> Result<E, SerdeErr> {
    let value = ElementInteger::de(reader)?.get();
    let value = u64::try_from(value).map_err(|_| SerdeErr)?;
    Ok(E::from_u64(value))
}

/// Slot count, then a presence bit per slot followed by its element
pub(crate) fn ser_slots<E: ElementKey>(slots: &[Option<E>], writer: &mut dyn BitWrite) {
    // slot arrays never outgrow SlotIndex, anything past it is not sent
    let count = SlotIndex::try_from(slots.len()).unwrap_or(SlotIndex::MAX);
    ser_slot_index(count, writer);
    for slot in &slots[..usize::from(count)] {
        slot.is_some().ser(writer);
        if let Some(element) = slot {
            ser_element(element, writer);
        }
    }
}

pub(crate) fn de_slots<E: ElementKey>(reader: &mut BitReader) -> Result<Vec<Option<E>>, SerdeErr> {
    let count = de_slot_index(reader)?;
    let mut slots = Vec::with_capacity(usize::from(count));
    for _ in 0..count {
        if bool::de(reader)? {
            slots.push(Some(de_element(reader)?));
        } else {
            slots.push(None);
        }
    }
    Ok(slots)
}
