//! # Slotsync Server
//! Hosts the authoritative copy of each slot container, applies mutation
//! requests forwarded by connected proxies in arrival order, and sends the
//! resulting state back out on every replication pulse.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use slotsync_shared::{
        transport::{PacketReceiver, PacketSender},
        ContainerConfig, ContainerElement, ContainerKey, ContainerRef, ElementKey, ElementKind,
        ElementWorldMut, ElementWorldRef, SlotContainer, SlotError, SlotIndex,
    };
}

mod error;
mod proxy;
mod server;

pub use error::ServerError;
pub use proxy::ProxyKey;
pub use server::{ContainerServer, ServerConfig};
