use naia_serde::{BitReader, BitWrite, Serde, SerdeErr, SerdeInternal};

use crate::{
    element::element_key::{de_slots, ser_slots},
    packet_writer::{measure, PacketWriter},
    ContainerKey, ContainerUpdate, ElementKey,
};

/// Packet sent from the authority to a proxy
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReplicationMessage<E: ElementKey> {
    /// The container came into scope; carries its entire slot array
    Spawn {
        container: ContainerKey,
        slots: Vec<Option<E>>,
    },
    Update {
        container: ContainerKey,
        update: ContainerUpdate<E>,
    },
    Despawn { container: ContainerKey },
}

/// Wire tag of a [`ReplicationMessage`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, SerdeInternal)]
enum ReplicationKind {
    Spawn,
    Update,
    Despawn,
}

impl<E: ElementKey> ReplicationMessage<E> {
    pub fn container(&self) -> ContainerKey {
        match self {
            Self::Spawn { container, .. } => *container,
            Self::Update { container, .. } => *container,
            Self::Despawn { container } => *container,
        }
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

impl<E: ElementKey> ReplicationMessage<E> {
    fn kind(&self) -> ReplicationKind {
        match self {
            Self::Spawn { .. } => ReplicationKind::Spawn,
            Self::Update { .. } => ReplicationKind::Update,
            Self::Despawn { .. } => ReplicationKind::Despawn,
        }
    }
}

impl<E: ElementKey> Serde for ReplicationMessage<E> {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.kind().ser(writer);
        self.container().ser(writer);
        match self {
            Self::Spawn { slots, .. } => ser_slots(slots, writer),
            Self::Update { update, .. } => update.ser(writer),
            Self::Despawn { .. } => {}
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let kind = ReplicationKind::de(reader)?;
        let container = ContainerKey::de(reader)?;
        match kind {
            ReplicationKind::Spawn => Ok(Self::Spawn {
                container,
                slots: de_slots(reader)?,
            }),
            ReplicationKind::Update => Ok(Self::Update {
                container,
                update: ContainerUpdate::de(reader)?,
            }),
            ReplicationKind::Despawn => Ok(Self::Despawn { container }),
        }
    }

    fn bit_length(&self) -> u32 {
        measure(|writer| self.ser(writer))
    }
}
