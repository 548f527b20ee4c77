use thiserror::Error;

use slotsync_shared::{ContainerKey, SlotError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("Malformed replication message")]
    MalformedMessage,

    #[error("Update for container {container:?}, which was never spawned")]
    ContainerNotFound { container: ContainerKey },

    #[error("Container {container:?} was spawned twice")]
    ContainerAlreadySpawned { container: ContainerKey },

    #[error("Replicated state for container {container:?} was rejected: {error}")]
    InvalidState {
        container: ContainerKey,
        error: SlotError,
    },

    #[error("Channel from the server is closed")]
    ServerChannelClosed,
}
