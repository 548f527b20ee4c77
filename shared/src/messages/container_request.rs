use naia_serde::{BitReader, BitWrite, Serde, SerdeErr, SerdeInternal};

use crate::{
    element::element_key::{de_element, ser_element},
    packet_writer::{measure, PacketWriter},
    types::{de_optional_slot_index, de_slot_index, ser_optional_slot_index, ser_slot_index},
    ContainerKey, ElementKey, SlotIndex,
};

/// A mutation of a container, as requested by any node. Proxies forward
/// these unevaluated; only the authority validates and applies them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContainerRequest<E: ElementKey> {
    /// `index: None` targets the first empty slot
    AddElement { element: E, index: Option<SlotIndex> },
    RemoveElement { element: E, index: SlotIndex },
    RemoveElementByIndex { index: SlotIndex },
    SwapElement { index_a: SlotIndex, index_b: SlotIndex },
    SetSlotCount { slot_count: SlotIndex },
}

/// Wire tag of a [`ContainerRequest`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, SerdeInternal)]
enum RequestKind {
    AddElement,
    RemoveElement,
    RemoveElementByIndex,
    SwapElement,
    SetSlotCount,
}

impl<E: ElementKey> ContainerRequest<E> {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddElement { .. } => "add_element",
            Self::RemoveElement { .. } => "remove_element",
            Self::RemoveElementByIndex { .. } => "remove_element_by_index",
            Self::SwapElement { .. } => "swap_element",
            Self::SetSlotCount { .. } => "set_slot_count",
        }
    }

    fn kind(&self) -> RequestKind {
        match self {
            Self::AddElement { .. } => RequestKind::AddElement,
            Self::RemoveElement { .. } => RequestKind::RemoveElement,
            Self::RemoveElementByIndex { .. } => RequestKind::RemoveElementByIndex,
            Self::SwapElement { .. } => RequestKind::SwapElement,
            Self::SetSlotCount { .. } => RequestKind::SetSlotCount,
        }
    }
}

impl<E: ElementKey> Serde for ContainerRequest<E> {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.kind().ser(writer);
        match self {
            Self::AddElement { element, index } => {
                ser_element(element, writer);
                ser_optional_slot_index(*index, writer);
            }
            Self::RemoveElement { element, index } => {
                ser_element(element, writer);
                ser_slot_index(*index, writer);
            }
            Self::RemoveElementByIndex { index } => {
                ser_slot_index(*index, writer);
            }
            Self::SwapElement { index_a, index_b } => {
                ser_slot_index(*index_a, writer);
                ser_slot_index(*index_b, writer);
            }
            Self::SetSlotCount { slot_count } => {
                ser_slot_index(*slot_count, writer);
            }
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        match RequestKind::de(reader)? {
            RequestKind::AddElement => {
                let element = de_element(reader)?;
                let index = de_optional_slot_index(reader)?;
                Ok(Self::AddElement { element, index })
            }
            RequestKind::RemoveElement => {
                let element = de_element(reader)?;
                let index = de_slot_index(reader)?;
                Ok(Self::RemoveElement { element, index })
            }
            RequestKind::RemoveElementByIndex => Ok(Self::RemoveElementByIndex {
                index: de_slot_index(reader)?,
            }),
            RequestKind::SwapElement => {
                let index_a = de_slot_index(reader)?;
                let index_b = de_slot_index(reader)?;
                Ok(Self::SwapElement { index_a, index_b })
            }
            RequestKind::SetSlotCount => Ok(Self::SetSlotCount {
                slot_count: de_slot_index(reader)?,
            }),
        }
    }

    fn bit_length(&self) -> u32 {
        measure(|writer| self.ser(writer))
    }
}

/// Packet sent from a proxy to the authority
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerRequestMessage<E: ElementKey> {
    pub container: ContainerKey,
    pub request: ContainerRequest<E>,
}

impl<E: ElementKey> ContainerRequestMessage<E> {
    pub fn new(container: ContainerKey, request: ContainerRequest<E>) -> Self {
        Self { container, request }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = PacketWriter::new();
        self.ser(&mut writer);
        writer.to_bytes()
    }

    pub fn from_bytes(payload: &[u8]) -> Result<Self, SerdeErr> {
        let mut reader = BitReader::new(payload);
        Self::de(&mut reader)
    }
}

impl<E: ElementKey> Serde for ContainerRequestMessage<E> {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.container.ser(writer);
        self.request.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let container = ContainerKey::de(reader)?;
        let request = ContainerRequest::de(reader)?;
        Ok(Self { container, request })
    }

    fn bit_length(&self) -> u32 {
        self.container.bit_length() + self.request.bit_length()
    }
}
