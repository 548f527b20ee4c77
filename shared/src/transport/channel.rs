use smol::channel::{self, Receiver, Sender, TryRecvError};

use super::{PacketReceiver, PacketSender, RecvError, SendError};

/// In-memory, reliable & ordered packet transport
pub struct PacketChannel;

impl PacketChannel {
    pub fn unbounded() -> (Box<dyn PacketSender>, Box<dyn PacketReceiver>) {
        let (packet_sender, packet_receiver) = channel::unbounded();
        let packet_receiver = PacketChannelReceiver::new(packet_receiver);
        (Box::new(packet_sender), Box::new(packet_receiver))
    }
}

impl PacketSender for Sender<Box<[u8]>> {
    fn send(&self, payload: &[u8]) -> Result<(), SendError> {
        self.try_send(payload.into()).map_err(|_| SendError)
    }
}

struct PacketChannelReceiver {
    receiver: Receiver<Box<[u8]>>,
    current_payload: Option<Box<[u8]>>,
}

impl PacketChannelReceiver {
    fn new(receiver: Receiver<Box<[u8]>>) -> Self {
        Self {
            receiver,
            current_payload: None,
        }
    }
}

impl PacketReceiver for PacketChannelReceiver {
    fn receive(&mut self) -> Result<Option<&[u8]>, RecvError> {
        match self.receiver.try_recv() {
            Ok(payload) => {
                self.current_payload = Some(payload);
                Ok(self.current_payload.as_deref())
            }
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Closed) => Err(RecvError),
        }
    }
}
