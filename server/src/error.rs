use thiserror::Error;

use slotsync_shared::{ContainerKey, SlotError};

use crate::ProxyKey;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServerError {
    #[error("Container {container:?} does not exist on this server")]
    ContainerNotFound { container: ContainerKey },

    /// Every container key is in use
    #[error("No container keys left to assign")]
    ContainerKeysExhausted,

    /// Every proxy key is in use
    #[error("No proxy keys left to assign")]
    ProxyKeysExhausted,

    #[error("Proxy {proxy:?} is not connected")]
    ProxyNotFound { proxy: ProxyKey },

    #[error("Malformed request from proxy {proxy:?}")]
    MalformedRequest { proxy: ProxyKey },

    #[error("Channel from proxy {proxy:?} is closed")]
    ProxyChannelClosed { proxy: ProxyKey },

    #[error("Failed to send replication message to proxy {proxy:?}")]
    SendFailed { proxy: ProxyKey },

    #[error(transparent)]
    Slot(#[from] SlotError),
}
