use naia_serde::{BitReader, BitWrite, Serde, SerdeErr, UnsignedVariableInteger};

/// Addresses one slot of a container
pub type SlotIndex = u16;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContainerRole {
    Authority,
    Proxy,
}

/// Identifies the same container on every node holding a copy of it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerKey(u16);

// Hand-expanded equivalent of `#[derive(SerdeInternal)]`: naia-serde-derive 0.24
// emits suffixed tuple indices (`self.0usize`) which current rustc rejects.
impl Serde for ContainerKey {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.0.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self(Serde::de(reader)?))
    }

    fn bit_length(&self) -> u32 {
        self.0.bit_length()
    }
}

impl ContainerKey {
    pub fn new(value: u16) -> Self {
        Self(value)
    }

    pub fn to_u16(&self) -> u16 {
        self.0
    }
}

type SlotIndexInteger = UnsignedVariableInteger<5>;

pub(crate) fn ser_slot_index(index: SlotIndex, writer: &mut dyn BitWrite) {
    SlotIndexInteger::new(index).ser(writer);
}

pub(crate) fn de_slot_index(reader: &mut BitReader) -> Result<SlotIndex, SerdeErr> {
    let value = SlotIndexInteger::de(reader)?.get();
    SlotIndex::try_from(value).map_err(|_| SerdeErr)
}

pub(crate) fn ser_optional_slot_index(index: Option<SlotIndex>, writer: &mut dyn BitWrite) {
    index.map(SlotIndexInteger::new).ser(writer);
}

pub(crate) fn de_optional_slot_index(
    reader: &mut BitReader,
) -> Result<Option<SlotIndex>, SerdeErr> {
    match Option::<SlotIndexInteger>::de(reader)? {
        Some(value) => SlotIndex::try_from(value.get())
            .map(Some)
            .map_err(|_| SerdeErr),
        None => Ok(None),
    }
}
