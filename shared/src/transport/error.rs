use thiserror::Error;

/// The transport could not accept an outgoing packet
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to send packet, the transport is closed")]
pub struct SendError;

/// The transport failed while receiving
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to receive packet, the transport is closed")]
pub struct RecvError;
