use std::collections::BTreeMap;

use log::{debug, info, warn};

use slotsync_shared::{
    transport::{PacketReceiver, PacketSender},
    ContainerConfig, ContainerKey, ContainerRequestMessage, ElementKey, ElementWorldMut,
    ReplicationMessage, SlotContainer,
};

use crate::{
    proxy::{ProxyConnection, ProxyKey},
    ServerConfig, ServerError,
};

/// Hosts authoritative containers and keeps every connected proxy in sync
/// with them.
///
/// Requests forwarded by proxies are applied in the order they are read,
/// proxies visited in ascending key order. Changes are sent out only when
/// [`Self::send_all_updates`] is called.
pub struct ContainerServer<E: ElementKey> {
    server_config: ServerConfig,
    // Containers
    containers: BTreeMap<ContainerKey, SlotContainer<E>>,
    next_container_key: Option<u16>,
    // Proxies
    proxies: BTreeMap<ProxyKey, ProxyConnection>,
    next_proxy_key: Option<u16>,
    // Events
    errors: Vec<ServerError>,
}

impl<E: ElementKey> ContainerServer<E> {
    pub fn new(server_config: ServerConfig) -> Self {
        Self {
            server_config,
            containers: BTreeMap::new(),
            next_container_key: Some(0),
            proxies: BTreeMap::new(),
            next_proxy_key: Some(0),
            errors: Vec::new(),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.server_config
    }

    // Containers

    /// Creates an authoritative container, populates its defaults and
    /// announces it to every connected proxy
    pub fn spawn_container<W: ElementWorldMut<E>>(
        &mut self,
        world: &mut W,
        config: &ContainerConfig,
    ) -> Result<ContainerKey, ServerError> {
        let Some(raw_key) = self.next_container_key else {
            return Err(ServerError::ContainerKeysExhausted);
        };
        let key = ContainerKey::new(raw_key);
        let mut container = SlotContainer::new_authority(key, config)?;
        self.next_container_key = raw_key.checked_add(1);

        let defaults = container.init_default_elements(world)?;
        // the Spawn message below already carries the populated slots
        let _ = container.take_update();

        info!(
            "Container {:?}: spawned with {} slots, {} default elements",
            key,
            container.slot_count(),
            defaults
        );

        let message = ReplicationMessage::Spawn {
            container: key,
            slots: container.elements(),
        };
        self.containers.insert(key, container);
        self.broadcast(&message);

        Ok(key)
    }

    /// Spawns a container using [`ServerConfig::container`]
    pub fn spawn_default_container<W: ElementWorldMut<E>>(
        &mut self,
        world: &mut W,
    ) -> Result<ContainerKey, ServerError> {
        let config = self.server_config.container.clone();
        self.spawn_container(world, &config)
    }

    /// Tells every proxy to drop the container, then destroys it
    pub fn despawn_container<W: ElementWorldMut<E>>(
        &mut self,
        world: &mut W,
        key: &ContainerKey,
    ) -> Result<(), ServerError> {
        let Some(container) = self.containers.remove(key) else {
            return Err(ServerError::ContainerNotFound { container: *key });
        };
        self.broadcast(&ReplicationMessage::Despawn { container: *key });
        container.destroy(world);
        Ok(())
    }

    pub fn container(&self, key: &ContainerKey) -> Option<&SlotContainer<E>> {
        self.containers.get(key)
    }

    pub fn container_mut(&mut self, key: &ContainerKey) -> Option<&mut SlotContainer<E>> {
        self.containers.get_mut(key)
    }

    pub fn container_keys(&self) -> Vec<ContainerKey> {
        self.containers.keys().copied().collect()
    }

    // Proxies

    /// Registers a proxy's transport. If configured, every existing
    /// container is sent to it straight away.
    pub fn connect_proxy(
        &mut self,
        sender: Box<dyn PacketSender>,
        receiver: Box<dyn PacketReceiver>,
    ) -> Result<ProxyKey, ServerError> {
        let Some(raw_key) = self.next_proxy_key else {
            return Err(ServerError::ProxyKeysExhausted);
        };
        let key = ProxyKey::new(raw_key);
        self.next_proxy_key = raw_key.checked_add(1);

        let connection = ProxyConnection::new(sender, receiver);
        if self.server_config.send_spawns_on_connect {
            for (container_key, container) in self.containers.iter() {
                let message = ReplicationMessage::Spawn {
                    container: *container_key,
                    slots: container.elements(),
                };
                if connection.sender.send(&message.to_bytes()).is_err() {
                    warn!(
                        "Proxy {:?}: failed to send spawn of {:?}",
                        key, container_key
                    );
                    self.errors.push(ServerError::SendFailed { proxy: key });
                }
            }
        }

        info!("Proxy {:?}: connected", key);
        self.proxies.insert(key, connection);
        Ok(key)
    }

    pub fn disconnect_proxy(&mut self, key: &ProxyKey) -> Result<(), ServerError> {
        if self.proxies.remove(key).is_none() {
            return Err(ServerError::ProxyNotFound { proxy: *key });
        }
        info!("Proxy {:?}: disconnected", key);
        Ok(())
    }

    pub fn proxy_keys(&self) -> Vec<ProxyKey> {
        self.proxies.keys().copied().collect()
    }

    // Messages

    /// Reads every pending request from every proxy and applies it to the
    /// target container. Returns the number of requests dispatched.
    /// Undecodable packets and unknown containers are recorded as errors;
    /// a proxy whose channel is closed is disconnected.
    pub fn receive_all_requests<W: ElementWorldMut<E>>(&mut self, world: &mut W) -> usize {
        let mut dispatched = 0;
        let mut closed = Vec::new();

        for (proxy_key, connection) in self.proxies.iter_mut() {
            loop {
                let message = match connection.receiver.receive() {
                    Ok(Some(payload)) => ContainerRequestMessage::<E>::from_bytes(payload),
                    Ok(None) => break,
                    Err(_) => {
                        closed.push(*proxy_key);
                        break;
                    }
                };

                let message = match message {
                    Ok(message) => message,
                    Err(error) => {
                        warn!("Proxy {:?}: malformed request, {:?}", proxy_key, error);
                        self.errors
                            .push(ServerError::MalformedRequest { proxy: *proxy_key });
                        continue;
                    }
                };

                let ContainerRequestMessage { container, request } = message;
                let Some(slot_container) = self.containers.get_mut(&container) else {
                    warn!(
                        "Proxy {:?}: request {} for unknown container {:?}",
                        proxy_key,
                        request.name(),
                        container
                    );
                    self.errors.push(ServerError::ContainerNotFound { container });
                    continue;
                };

                debug!(
                    "Proxy {:?}: applying {} to {:?}",
                    proxy_key,
                    request.name(),
                    container
                );
                slot_container.dispatch(world, request);
                dispatched += 1;
            }
        }

        for proxy_key in closed {
            self.proxies.remove(&proxy_key);
            warn!("Proxy {:?}: channel closed, disconnecting", proxy_key);
            self.errors
                .push(ServerError::ProxyChannelClosed { proxy: proxy_key });
        }

        dispatched
    }

    /// Sends each dirty container's pending changes to every proxy
    pub fn send_all_updates(&mut self) {
        let mut messages = Vec::new();
        for (key, container) in self.containers.iter_mut() {
            if let Some(update) = container.take_update() {
                messages.push(ReplicationMessage::Update {
                    container: *key,
                    update,
                });
            }
        }

        for message in messages.iter() {
            self.broadcast(message);
        }
    }

    /// Errors collected since the last call
    pub fn take_errors(&mut self) -> Vec<ServerError> {
        std::mem::take(&mut self.errors)
    }

    fn broadcast(&mut self, message: &ReplicationMessage<E>) {
        if self.proxies.is_empty() {
            return;
        }
        let payload = message.to_bytes();
        for (proxy_key, connection) in self.proxies.iter() {
            if connection.sender.send(&payload).is_err() {
                warn!(
                    "Proxy {:?}: failed to send message for {:?}",
                    proxy_key,
                    message.container()
                );
                self.errors
                    .push(ServerError::SendFailed { proxy: *proxy_key });
            }
        }
    }
}
