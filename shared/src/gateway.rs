use std::sync::Arc;

use log::{debug, warn};

use crate::{
    messages::container_request::{ContainerRequest, ContainerRequestMessage},
    transport::PacketSender,
    ContainerKey, ElementKey,
};

/// One-way channel from a proxy container to its authority.
///
/// Forwarding is fire-and-forget: nothing comes back on this path, the
/// outcome is only ever observed through later replicated state.
pub trait RemoteInvocationGateway<E: ElementKey>: Send {
    fn forward(&mut self, container: &ContainerKey, request: ContainerRequest<E>);
}

/// Gateway which writes each request as its own packet
pub struct PacketGateway {
    sender: Arc<dyn PacketSender>,
}

impl PacketGateway {
    pub fn new(sender: Arc<dyn PacketSender>) -> Self {
        Self { sender }
    }
}

impl<E: ElementKey> RemoteInvocationGateway<E> for PacketGateway {
    fn forward(&mut self, container: &ContainerKey, request: ContainerRequest<E>) {
        debug!(
            "PacketGateway: forwarding {} for Container {:?}",
            request.name(),
            container
        );
        let message = ContainerRequestMessage::new(*container, request);
        if self.sender.send(&message.to_bytes()).is_err() {
            warn!(
                "PacketGateway: transport closed, dropping request for Container {:?}",
                container
            );
        }
    }
}
