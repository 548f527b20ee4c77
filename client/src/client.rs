use std::{collections::BTreeMap, sync::Arc};

use log::{debug, info, warn};

use slotsync_shared::{
    transport::{PacketReceiver, PacketSender},
    ContainerKey, ContainerUpdate, ElementKey, ElementWorldMut, PacketGateway,
    ReplicationMessage, SlotContainer, SlotIndex,
};

use crate::ClientError;

/// Holds a proxy for every container the server has sent.
///
/// Mutations made through [`Self::container_mut`] are forwarded to the
/// server and have no local effect until the resulting state is read by
/// [`Self::receive_all_updates`].
pub struct ContainerClient<E: ElementKey> {
    // Transport
    sender: Arc<dyn PacketSender>,
    receiver: Box<dyn PacketReceiver>,
    // Containers
    containers: BTreeMap<ContainerKey, SlotContainer<E>>,
    // Events
    errors: Vec<ClientError>,
}

impl<E: ElementKey> ContainerClient<E> {
    pub fn new(sender: Box<dyn PacketSender>, receiver: Box<dyn PacketReceiver>) -> Self {
        Self {
            sender: Arc::from(sender),
            receiver,
            containers: BTreeMap::new(),
            errors: Vec::new(),
        }
    }

    /// Reads every pending replication message and applies it. Returns how
    /// many messages were applied.
    pub fn receive_all_updates<W: ElementWorldMut<E>>(&mut self, world: &mut W) -> usize {
        let mut applied = 0;
        loop {
            let message = match self.receiver.receive() {
                Ok(Some(payload)) => ReplicationMessage::<E>::from_bytes(payload),
                Ok(None) => break,
                Err(_) => {
                    warn!("ContainerClient: server channel closed");
                    self.errors.push(ClientError::ServerChannelClosed);
                    break;
                }
            };

            let result = match message {
                Ok(message) => self.apply_message(world, message),
                Err(error) => {
                    debug!("ContainerClient: undecodable packet, {:?}", error);
                    Err(ClientError::MalformedMessage)
                }
            };
            match result {
                Ok(()) => applied += 1,
                Err(error) => {
                    warn!("ContainerClient: {}", error);
                    self.errors.push(error);
                }
            }
        }
        applied
    }

    fn apply_message<W: ElementWorldMut<E>>(
        &mut self,
        world: &mut W,
        message: ReplicationMessage<E>,
    ) -> Result<(), ClientError> {
        match message {
            ReplicationMessage::Spawn { container, slots } => {
                if self.containers.contains_key(&container) {
                    return Err(ClientError::ContainerAlreadySpawned { container });
                }
                let slot_count = SlotIndex::try_from(slots.len())
                    .map_err(|_| ClientError::MalformedMessage)?;

                let gateway = Box::new(PacketGateway::new(self.sender.clone()));
                let mut proxy = SlotContainer::new_proxy(container, slot_count, gateway)
                    .map_err(|error| ClientError::InvalidState { container, error })?;
                let update = ContainerUpdate {
                    slot_count: Some(slot_count),
                    slots: Some(slots),
                };
                proxy
                    .apply_update(world, update)
                    .map_err(|error| ClientError::InvalidState { container, error })?;

                info!(
                    "Container {:?}: proxy spawned with {} slots",
                    container, slot_count
                );
                self.containers.insert(container, proxy);
            }
            ReplicationMessage::Update { container, update } => {
                let Some(proxy) = self.containers.get_mut(&container) else {
                    return Err(ClientError::ContainerNotFound { container });
                };
                let changed = proxy
                    .apply_update(world, update)
                    .map_err(|error| ClientError::InvalidState { container, error })?;
                debug!("Container {:?}: update applied, changed: {}", container, changed);
            }
            ReplicationMessage::Despawn { container } => {
                if self.containers.remove(&container).is_none() {
                    return Err(ClientError::ContainerNotFound { container });
                }
                info!("Container {:?}: proxy despawned", container);
            }
        }
        Ok(())
    }

    pub fn container(&self, key: &ContainerKey) -> Option<&SlotContainer<E>> {
        self.containers.get(key)
    }

    /// Mutations made through the returned proxy are forwarded to the server
    pub fn container_mut(&mut self, key: &ContainerKey) -> Option<&mut SlotContainer<E>> {
        self.containers.get_mut(key)
    }

    pub fn container_keys(&self) -> Vec<ContainerKey> {
        self.containers.keys().copied().collect()
    }

    /// Errors collected since the last call
    pub fn take_errors(&mut self) -> Vec<ClientError> {
        std::mem::take(&mut self.errors)
    }
}
