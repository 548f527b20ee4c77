use slotsync_shared::transport::{PacketReceiver, PacketSender};

/// Identifies one connected proxy node
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProxyKey(u16);

impl ProxyKey {
    pub(crate) fn new(value: u16) -> Self {
        Self(value)
    }

    pub fn to_u16(&self) -> u16 {
        self.0
    }
}

/// Both directions of the transport to a single proxy
pub(crate) struct ProxyConnection {
    pub(crate) sender: Box<dyn PacketSender>,
    pub(crate) receiver: Box<dyn PacketReceiver>,
}

impl ProxyConnection {
    pub(crate) fn new(sender: Box<dyn PacketSender>, receiver: Box<dyn PacketReceiver>) -> Self {
        Self { sender, receiver }
    }
}
