//! Packet transport used to carry forwarded requests and replication
//! messages. Implementations must be reliable and preserve order.

mod error;

cfg_if! {
    if #[cfg(feature = "transport_channel")] {
        mod channel;
        pub use channel::PacketChannel;
    }
}

pub use error::{RecvError, SendError};

/// Used to send packets to the remote end
pub trait PacketSender: Send + Sync {
    /// Sends a packet, does not block
    fn send(&self, payload: &[u8]) -> Result<(), SendError>;
}

/// Used to receive packets from the remote end
pub trait PacketReceiver: Send {
    /// Receives the next packet, if one has arrived
    fn receive(&mut self) -> Result<Option<&[u8]>, RecvError>;
}
